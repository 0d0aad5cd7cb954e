use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use crate::observable::{Callback, Observable, Ref, Value};
use crate::{Store, Subscription};

/// A read-only store whose value is `derive(source)`.
///
/// The value is computed once on construction and again on every source
/// notification, synchronously. A recomputed value equal to the previous
/// one is not republished.
///
/// The upstream subscription lives as long as some handle to this store
/// does, or until [`Derived::dispose`] is called. Subscribers only hold a
/// weak reference, so keep a handle around for as long as you subscribe.
pub struct Derived<T> {
	body: Rc<DerivedBody<T>>,
}

struct DerivedBody<T> {
	store: Store<T>,
	upstream: RefCell<Option<Subscription>>,
}

impl<T> Clone for Derived<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> Derived<T>
where
	T: PartialEq + Clone + 'static,
{
	pub fn new<R, S>(source: &S, derive: impl Fn(&R) -> T + 'static) -> Self
	where
		S: Observable<R> + ?Sized,
		R: 'static,
	{
		let initial = derive(&*source.snapshot());
		let store = Store::new(initial);

		let target = store.downgrade();
		let upstream = source.subscribe(Box::new(move |value: &R| {
			if let Some(store) = target.upgrade() {
				store.set(derive(value));
			}
		}));

		Derived {
			body: Rc::new(DerivedBody {
				store,
				upstream: RefCell::new(Some(upstream)),
			}),
		}
	}

	#[inline]
	pub fn get(&self) -> T {
		self.body.store.get()
	}

	#[inline]
	pub fn with<R>(&self, func: impl FnOnce(&T) -> R) -> R {
		self.body.store.with(func)
	}

	#[inline]
	pub fn snapshot(&self) -> Ref<'_, T> {
		self.body.store.snapshot()
	}

	#[must_use]
	pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
		self.body.store.subscribe(callback)
	}

	pub fn map<R, F>(&self, func: F) -> Derived<R>
	where
		F: Fn(&T) -> R + 'static,
		R: PartialEq + Clone + 'static,
	{
		Derived::new(self, func)
	}

	/// Stop following the source. The value stays at whatever was
	/// last computed.
	pub fn dispose(&self) {
		let upstream = self.body.upstream.borrow_mut().take();
		if let Some(upstream) = upstream {
			upstream.unsubscribe();
			tracing::debug!("derived store disposed");
		}
	}

	pub fn is_disposed(&self) -> bool {
		self.body.upstream.borrow().is_none()
	}
}

impl<T> Observable<T> for DerivedBody<T>
where
	T: Clone + 'static,
{
	fn snapshot(&self) -> Ref<'_, T> {
		self.store.snapshot()
	}

	fn subscribe(&self, callback: Callback<T>) -> Subscription {
		Observable::subscribe(&self.store, callback)
	}
}

impl<T> Observable<T> for Derived<T>
where
	T: Clone + 'static,
{
	fn snapshot(&self) -> Ref<'_, T> {
		self.body.store.snapshot()
	}

	fn subscribe(&self, callback: Callback<T>) -> Subscription {
		Observable::subscribe(&self.body.store, callback)
	}
}

impl<T> From<Derived<T>> for Value<T>
where
	T: Clone + 'static,
{
	fn from(derived: Derived<T>) -> Self {
		Value::new(derived.body)
	}
}

impl<T> Debug for Derived<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Derived")
			.field("store", &self.body.store)
			.field("disposed", &self.body.upstream.borrow().is_none())
			.finish()
	}
}
