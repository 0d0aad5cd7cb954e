use std::ops::Deref;
use std::rc::Rc;

use crate::Subscription;

/// Callback invoked with the new value after every change.
pub type Callback<T> = Box<dyn Fn(&T)>;

/// The contract the rendering layer consumes: read the current
/// value and get told when it changes.
pub trait Observable<T>: 'static {
	/// Current value. Must not be held across a mutation
	/// of the same observable.
	fn snapshot(&self) -> Ref<'_, T>;

	/// Value to render before any client-side state is available.
	fn server_snapshot(&self) -> Ref<'_, T> {
		self.snapshot()
	}

	/// Register `callback`. It stays registered until the returned
	/// subscription is dropped or explicitly unsubscribed.
	fn subscribe(&self, callback: Callback<T>) -> Subscription;
}

pub struct Value<T> {
	value: Rc<dyn Observable<T>>,
}

impl<T> Clone for Value<T> {
	fn clone(&self) -> Self {
		Value {
			value: self.value.clone(),
		}
	}
}

impl<T> Value<T>
where
	T: 'static,
{
	pub fn new(value: Rc<dyn Observable<T>>) -> Self {
		Value { value }
	}

	#[inline]
	pub fn snapshot(&self) -> Ref<'_, T> {
		self.value.snapshot()
	}

	#[inline]
	pub fn server_snapshot(&self) -> Ref<'_, T> {
		self.value.server_snapshot()
	}

	#[inline]
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.snapshot().clone()
	}

	#[must_use]
	pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
		self.value.subscribe(Box::new(callback))
	}
}

impl<T: 'static> Observable<T> for Value<T> {
	fn snapshot(&self) -> Ref<'_, T> {
		self.value.snapshot()
	}

	fn server_snapshot(&self) -> Ref<'_, T> {
		self.value.server_snapshot()
	}

	fn subscribe(&self, callback: Callback<T>) -> Subscription {
		self.value.subscribe(callback)
	}
}

pub enum Ref<'a, T> {
	Ref(&'a T),
	Cell(std::cell::Ref<'a, T>),
}

impl<'a, T> Deref for Ref<'a, T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		match self {
			Ref::Cell(guard) => guard.deref(),
			Ref::Ref(t) => t,
		}
	}
}

impl<'a, T> std::fmt::Debug for Ref<'a, T>
where
	T: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.deref().fmt(f)
	}
}
