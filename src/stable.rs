use std::cell::{Ref, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

/// A long-lived slot that always holds the latest value.
///
/// The owner calls [`StableValue::set`] on every update; closures that
/// captured a clone of the handle read the fresh value without being
/// recreated.
pub struct StableValue<T> {
	slot: Rc<RefCell<T>>,
}

/// Latest-callback slot.
pub type StableFn<A> = StableValue<Rc<dyn Fn(&A)>>;

impl<T> Clone for StableValue<T> {
	fn clone(&self) -> Self {
		Self {
			slot: self.slot.clone(),
		}
	}
}

impl<T> StableValue<T> {
	pub fn new(value: T) -> Self {
		StableValue {
			slot: Rc::new(RefCell::new(value)),
		}
	}

	#[inline]
	pub fn set(&self, value: T) {
		*self.slot.borrow_mut() = value;
	}

	#[inline]
	pub fn current(&self) -> Ref<'_, T> {
		self.slot.borrow()
	}

	#[inline]
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.slot.borrow().clone()
	}

	#[inline]
	pub fn with<R>(&self, func: impl FnOnce(&T) -> R) -> R {
		func(&self.slot.borrow())
	}

	pub fn ptr_eq(&self, other: &StableValue<T>) -> bool {
		Rc::ptr_eq(&self.slot, &other.slot)
	}
}

impl<A: 'static> StableValue<Rc<dyn Fn(&A)>> {
	pub fn from_fn(func: impl Fn(&A) + 'static) -> Self {
		StableValue::new(Rc::new(func))
	}

	pub fn set_fn(&self, func: impl Fn(&A) + 'static) {
		self.set(Rc::new(func));
	}

	/// Invoke the latest callback. The slot is not borrowed while it
	/// runs, so the callback may replace itself.
	pub fn call(&self, arg: &A) {
		let func = self.get();
		func(arg)
	}
}

impl<T> Debug for StableValue<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.slot.borrow().fmt(f)
	}
}
