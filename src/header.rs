use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::observable::{Callback, Observable, Ref, Value};
use crate::{Store, Subscription};

/// Stack of header contents. The visible header is whatever was pushed
/// last and is still alive.
pub struct HeaderStack<C> {
	body: Rc<HeaderBody<C>>,
}

struct HeaderBody<C> {
	entries: RefCell<Vec<(u64, C)>>,
	next_id: Cell<u64>,
	current: Store<Option<C>>,
}

impl<C> Clone for HeaderStack<C> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<C> Default for HeaderStack<C>
where
	C: PartialEq + Clone + 'static,
{
	fn default() -> Self {
		HeaderStack::new()
	}
}

impl<C> HeaderStack<C>
where
	C: PartialEq + Clone + 'static,
{
	pub fn new() -> Self {
		HeaderStack {
			body: Rc::new(HeaderBody {
				entries: RefCell::new(Vec::new()),
				next_id: Cell::new(0),
				current: Store::new(None),
			}),
		}
	}

	#[must_use = "the content is removed when the entry is dropped"]
	pub fn push(&self, content: C) -> HeaderEntry<C> {
		let id = self.body.next_id.get() + 1;
		self.body.next_id.set(id);
		self.body.entries.borrow_mut().push((id, content));
		self.body.publish();

		HeaderEntry {
			id,
			stack: Rc::downgrade(&self.body),
		}
	}

	#[inline]
	pub fn current(&self) -> Option<C> {
		self.body.current.get()
	}

	pub fn len(&self) -> usize {
		self.body.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.body.entries.borrow().is_empty()
	}

	#[must_use]
	pub fn subscribe(&self, callback: impl Fn(&Option<C>) + 'static) -> Subscription {
		self.body.current.subscribe(callback)
	}

	pub fn observe(&self) -> Value<Option<C>> {
		self.body.current.clone().into()
	}
}

impl<C> HeaderBody<C>
where
	C: PartialEq + Clone + 'static,
{
	fn publish(&self) {
		let top = self.entries.borrow().last().map(|(_, content)| content.clone());
		self.current.set(top);
	}
}

impl<C> Observable<Option<C>> for HeaderStack<C>
where
	C: Clone + 'static,
{
	fn snapshot(&self) -> Ref<'_, Option<C>> {
		self.body.current.snapshot()
	}

	fn subscribe(&self, callback: Callback<Option<C>>) -> Subscription {
		Observable::subscribe(&self.body.current, callback)
	}
}

/// One pushed header content. Dropping it removes the content from the
/// stack, wherever it sits.
pub struct HeaderEntry<C>
where
	C: PartialEq + Clone + 'static,
{
	id: u64,
	stack: Weak<HeaderBody<C>>,
}

impl<C> HeaderEntry<C>
where
	C: PartialEq + Clone + 'static,
{
	/// Replace this entry's content in place.
	pub fn set(&self, content: C) {
		let Some(stack) = self.stack.upgrade() else {
			return;
		};

		{
			let mut entries = stack.entries.borrow_mut();
			if let Some(entry) = entries.iter_mut().find(|(id, _)| *id == self.id) {
				entry.1 = content;
			}
		}
		stack.publish();
	}

	pub fn remove(self) {
		std::mem::drop(self)
	}
}

impl<C> Drop for HeaderEntry<C>
where
	C: PartialEq + Clone + 'static,
{
	fn drop(&mut self) {
		if let Some(stack) = self.stack.upgrade() {
			stack.entries.borrow_mut().retain(|(id, _)| *id != self.id);
			stack.publish();
		}
	}
}

impl<C> std::fmt::Debug for HeaderStack<C>
where
	C: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HeaderStack")
			.field("entries", &*self.body.entries.borrow())
			.finish()
	}
}
