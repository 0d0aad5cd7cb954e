use std::cell::Cell;
use std::rc::{Rc, Weak};

pub(crate) trait Unsubscribe {
	fn unsubscribe(&self, id: u64);
}

/// Handle to a registered callback.
///
/// Dropping the handle removes the callback. A callback removed while a
/// notification round is running is not called again, not even later in
/// that same round.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
	id: u64,
	active: Rc<Cell<bool>>,
	owner: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
	pub(crate) fn new(id: u64, active: Rc<Cell<bool>>, owner: Weak<dyn Unsubscribe>) -> Self {
		Subscription {
			id,
			active,
			owner: Some(owner),
		}
	}

	/// A subscription that is not attached to anything.
	pub fn empty() -> Self {
		Subscription {
			id: 0,
			active: Rc::new(Cell::new(false)),
			owner: None,
		}
	}

	pub fn is_active(&self) -> bool {
		self.active.get()
	}

	pub fn unsubscribe(self) {
		std::mem::drop(self)
	}

	/// Keep the callback registered for as long as its source lives.
	pub fn detach(mut self) {
		self.owner = None;
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(owner) = self.owner.take() {
			self.active.set(false);
			if let Some(owner) = owner.upgrade() {
				owner.unsubscribe(self.id);
			}
		}
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("id", &self.id)
			.field("active", &self.active.get())
			.finish()
	}
}
