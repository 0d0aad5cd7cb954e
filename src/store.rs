use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::observable::{Callback, Observable, Ref, Value};
use crate::subscription::{Subscription, Unsubscribe};
use crate::Derived;

/// A single mutable value with change notification.
///
/// Cloning a `Store` yields another handle to the same cell.
pub struct Store<T> {
	body: Rc<StoreBody<T>>,
}

pub(crate) struct WeakStore<T> {
	body: Weak<StoreBody<T>>,
}

pub struct StoreBody<T> {
	value: RefCell<T>,
	version: Cell<u64>,
	equals: fn(&T, &T) -> bool,
	inner: RefCell<StoreInner<T>>,
}

struct StoreInner<T> {
	subscribers: SmallVec<[Subscriber<T>; 2]>,
	next_id: u64,
	this: Weak<StoreBody<T>>,
}

struct Subscriber<T> {
	id: u64,
	active: Rc<Cell<bool>>,
	callback: Rc<dyn Fn(&T)>,
}

impl<T> Clone for Subscriber<T> {
	fn clone(&self) -> Self {
		Subscriber {
			id: self.id,
			active: self.active.clone(),
			callback: self.callback.clone(),
		}
	}
}

impl<T> Clone for Store<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> Default for Store<T>
where
	T: Default + PartialEq + Clone + 'static,
{
	fn default() -> Self {
		Store::new(Default::default())
	}
}

impl<T> Store<T>
where
	T: Clone + 'static,
{
	pub fn new(value: T) -> Self
	where
		T: PartialEq,
	{
		Self::new_with_equals(value, |a, b| a == b)
	}

	/// Like [`Store::new`], but `equals` decides whether a new value
	/// counts as a change.
	pub fn new_with_equals(value: T, equals: fn(&T, &T) -> bool) -> Self {
		Store {
			body: Rc::new_cyclic(|this| StoreBody {
				value: RefCell::new(value),
				version: Cell::new(0),
				equals,
				inner: RefCell::new(StoreInner {
					subscribers: SmallVec::new(),
					next_id: 1,
					this: this.clone(),
				}),
			}),
		}
	}

	#[inline]
	pub fn get(&self) -> T {
		self.body.value.borrow().clone()
	}

	#[inline]
	pub fn with<R>(&self, func: impl FnOnce(&T) -> R) -> R {
		func(&self.body.value.borrow())
	}

	#[inline]
	pub fn snapshot(&self) -> Ref<'_, T> {
		self.body.snapshot()
	}

	#[inline]
	pub fn set(&self, value: T) {
		self.body.set(value);
	}

	/// Set `value`, returning what the store held before.
	pub fn replace(&self, value: T) -> T {
		let previous = self.get();
		self.body.set(value);
		previous
	}

	#[inline]
	pub fn update(&self, func: impl FnOnce(&T) -> T) {
		let next = self.with(func);
		self.body.set(next);
	}

	#[inline]
	pub fn modify(&self, func: impl FnOnce(&mut T)) {
		let mut next = self.get();
		func(&mut next);
		self.body.set(next);
	}

	#[must_use]
	pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
		self.body.subscribe(Rc::new(callback))
	}

	pub fn subscriber_count(&self) -> usize {
		self.body.inner.borrow().subscribers.len()
	}

	pub fn map<R, F>(&self, func: F) -> Derived<R>
	where
		F: Fn(&T) -> R + 'static,
		R: PartialEq + Clone + 'static,
	{
		Derived::new(self, func)
	}

	pub fn ptr_eq(&self, other: &Store<T>) -> bool {
		Rc::ptr_eq(&self.body, &other.body)
	}

	pub(crate) fn downgrade(&self) -> WeakStore<T> {
		WeakStore {
			body: Rc::downgrade(&self.body),
		}
	}
}

impl<T> WeakStore<T> {
	pub(crate) fn upgrade(&self) -> Option<Store<T>> {
		self.body.upgrade().map(|body| Store { body })
	}
}

impl<T> StoreBody<T>
where
	T: Clone + 'static,
{
	pub fn snapshot(&self) -> Ref<'_, T> {
		Ref::Cell(self.value.borrow())
	}

	fn set(&self, next: T) {
		{
			let mut value = self.value.borrow_mut();
			if (self.equals)(&value, &next) {
				return;
			}
			*value = next;
		}

		self.version.set(self.version.get() + 1);
		self.notify();
	}

	fn notify(&self) {
		let version = self.version.get();
		let subscribers = self.inner.borrow().subscribers.clone();
		if subscribers.is_empty() {
			return;
		}

		let value = self.value.borrow().clone();
		tracing::trace!(version, subscribers = subscribers.len(), "notify");

		for subscriber in subscribers {
			// A subscriber wrote a newer value; its own round already
			// reached everyone still registered.
			if self.version.get() != version {
				break;
			}

			if subscriber.active.get() {
				(subscriber.callback)(&value);
			}
		}
	}

	fn subscribe(&self, callback: Rc<dyn Fn(&T)>) -> Subscription {
		let mut inner = self.inner.borrow_mut();
		let id = inner.next_id;
		inner.next_id += 1;

		let active = Rc::new(Cell::new(true));
		inner.subscribers.push(Subscriber {
			id,
			active: active.clone(),
			callback,
		});

		let owner = inner.this.clone() as Weak<dyn Unsubscribe>;
		Subscription::new(id, active, owner)
	}
}

impl<T> Unsubscribe for StoreBody<T> {
	fn unsubscribe(&self, id: u64) {
		self.inner.borrow_mut().subscribers.retain(|s| s.id != id);
	}
}

impl<T> Observable<T> for StoreBody<T>
where
	T: Clone + 'static,
{
	fn snapshot(&self) -> Ref<'_, T> {
		StoreBody::snapshot(self)
	}

	fn subscribe(&self, callback: Callback<T>) -> Subscription {
		StoreBody::subscribe(self, Rc::from(callback))
	}
}

impl<T> Observable<T> for Store<T>
where
	T: Clone + 'static,
{
	fn snapshot(&self) -> Ref<'_, T> {
		self.body.snapshot()
	}

	fn subscribe(&self, callback: Callback<T>) -> Subscription {
		self.body.subscribe(Rc::from(callback))
	}
}

impl<T> From<Store<T>> for Value<T>
where
	T: Clone + 'static,
{
	fn from(store: Store<T>) -> Self {
		Value::new(store.body)
	}
}

impl<T> Debug for Store<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Store")
			.field("value", &*self.body.value.borrow())
			.field("version", &self.body.version.get())
			.finish()
	}
}
