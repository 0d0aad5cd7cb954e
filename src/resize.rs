use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::subscription::Unsubscribe;
use crate::{StableFn, Subscription};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ResizeEvent {
	pub width: u32,
	pub height: u32,
}

/// Fan-out list for viewport resize notifications.
///
/// Listeners are [`StableFn`] slots, so a listener can swap its callback
/// without registering again.
#[derive(Clone, Default)]
pub struct ResizeRegistry {
	body: Rc<RegistryBody>,
}

#[derive(Default)]
struct RegistryBody {
	listeners: RefCell<SmallVec<[Listener; 4]>>,
	next_id: Cell<u64>,
}

#[derive(Clone)]
struct Listener {
	id: u64,
	active: Rc<Cell<bool>>,
	callback: StableFn<ResizeEvent>,
}

impl ResizeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn register(&self, callback: StableFn<ResizeEvent>) -> Subscription {
		let id = self.body.next_id.get() + 1;
		self.body.next_id.set(id);

		let active = Rc::new(Cell::new(true));
		self.body.listeners.borrow_mut().push(Listener {
			id,
			active: active.clone(),
			callback,
		});

		let owner = Rc::downgrade(&self.body) as Weak<dyn Unsubscribe>;
		Subscription::new(id, active, owner)
	}

	/// Deliver `event` to every listener registered before the call.
	pub fn dispatch(&self, event: ResizeEvent) {
		let listeners = self.body.listeners.borrow().clone();
		tracing::trace!(
			width = event.width,
			height = event.height,
			listeners = listeners.len(),
			"resize"
		);

		for listener in listeners {
			if listener.active.get() {
				listener.callback.call(&event);
			}
		}
	}

	pub fn len(&self) -> usize {
		self.body.listeners.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.body.listeners.borrow().is_empty()
	}
}

impl Unsubscribe for RegistryBody {
	fn unsubscribe(&self, id: u64) {
		self.listeners.borrow_mut().retain(|l| l.id != id);
	}
}

impl std::fmt::Debug for ResizeRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResizeRegistry")
			.field("listeners", &self.len())
			.finish()
	}
}
