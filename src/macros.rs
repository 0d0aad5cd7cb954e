pub use enclose::*;

/// `derived!((a, b) source, value => body)` builds a [`crate::Derived`]
/// from `source`, cloning `a` and `b` into the derivation.
#[macro_export]
macro_rules! derived {
    (( $($d_tt:tt)* ) $source:expr, $v:ident => $($b:tt)*) => {
        $crate::Derived::new(&$source, $crate::macros::enclose!(($( $d_tt )*) move |$v: &_| { $($b)* }))
    };
    ($source:expr, $v:ident => $($b:tt)*) => {
        $crate::Derived::new(&$source, move |$v: &_| { $($b)* })
    };
}

/// `subscribe!((a, b) store, value => body)` subscribes to `store`,
/// cloning `a` and `b` into the callback.
#[macro_export]
macro_rules! subscribe {
    (( $($d_tt:tt)* ) $source:expr, $v:ident => $($b:tt)*) => {
        $source.subscribe($crate::macros::enclose!(($( $d_tt )*) move |$v: &_| { $($b)* }))
    };
    ($source:expr, $v:ident => $($b:tt)*) => {
        $source.subscribe(move |$v: &_| { $($b)* })
    };
}
