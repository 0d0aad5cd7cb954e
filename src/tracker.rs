use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use fxhash::FxHashSet;

use crate::observable::{Callback, Observable, Ref, Value};
use crate::{Store, Subscription};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Opaque identity for one registration with a [`Tracker`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Token(u64);

impl Token {
	pub fn new() -> Self {
		Token(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for Token {
	fn default() -> Self {
		Token::new()
	}
}

/// A boolean store that is `true` while at least one token is registered.
///
/// Adding a token twice counts once. Two unrelated registrations that
/// share a token are indistinguishable: the first `remove` clears both.
pub struct Tracker<K = Token> {
	body: Rc<TrackerBody<K>>,
}

struct TrackerBody<K> {
	tokens: RefCell<FxHashSet<K>>,
	active: Store<bool>,
}

impl<K> Clone for Tracker<K> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<K> Default for Tracker<K>
where
	K: Hash + Eq + 'static,
{
	fn default() -> Self {
		Tracker::new()
	}
}

impl<K> Tracker<K>
where
	K: Hash + Eq + 'static,
{
	pub fn new() -> Self {
		Tracker {
			body: Rc::new(TrackerBody {
				tokens: RefCell::new(FxHashSet::default()),
				active: Store::new(false),
			}),
		}
	}

	pub fn add(&self, token: K) {
		let active = {
			let mut tokens = self.body.tokens.borrow_mut();
			tokens.insert(token);
			!tokens.is_empty()
		};
		self.publish(active);
	}

	pub fn remove(&self, token: &K) {
		let active = {
			let mut tokens = self.body.tokens.borrow_mut();
			tokens.remove(token);
			!tokens.is_empty()
		};
		self.publish(active);
	}

	fn publish(&self, active: bool) {
		if self.body.active.get() != active {
			tracing::trace!(active, "tracker changed");
		}
		self.body.active.set(active);
	}

	#[inline]
	pub fn is_active(&self) -> bool {
		self.body.active.get()
	}

	#[inline]
	pub fn snapshot(&self) -> Ref<'_, bool> {
		self.body.active.snapshot()
	}

	pub fn contains(&self, token: &K) -> bool {
		self.body.tokens.borrow().contains(token)
	}

	pub fn len(&self) -> usize {
		self.body.tokens.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.body.tokens.borrow().is_empty()
	}

	#[must_use]
	pub fn subscribe(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
		self.body.active.subscribe(callback)
	}

	pub fn observe(&self) -> Value<bool> {
		self.body.active.clone().into()
	}
}

impl Tracker<Token> {
	/// A handle owning a fresh token, initially inactive.
	pub fn handle(&self) -> TrackerHandle {
		TrackerHandle {
			tracker: self.clone(),
			token: Token::new(),
			active: Cell::new(false),
		}
	}

	/// A handle that is active until it is dropped.
	#[must_use = "the activity ends when the handle is dropped"]
	pub fn track(&self) -> TrackerHandle {
		let handle = self.handle();
		handle.set_active(true);
		handle
	}

	/// Run `func` with the tracker held active. The token is removed on
	/// every exit path, unwinding included.
	pub fn track_while<R>(&self, func: impl FnOnce() -> R) -> R {
		let _handle = self.track();
		func()
	}
}

impl<K> Observable<bool> for Tracker<K>
where
	K: Hash + Eq + 'static,
{
	fn snapshot(&self) -> Ref<'_, bool> {
		self.body.active.snapshot()
	}

	fn subscribe(&self, callback: Callback<bool>) -> Subscription {
		Observable::subscribe(&self.body.active, callback)
	}
}

impl<K> Debug for Tracker<K>
where
	K: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Tracker")
			.field("tokens", &*self.body.tokens.borrow())
			.field("active", &self.body.active.get())
			.finish()
	}
}

/// One caller's registration with a [`Tracker`].
///
/// Mirrors a condition that switches on and off over the caller's
/// lifetime; dropping the handle always removes the token.
pub struct TrackerHandle {
	tracker: Tracker<Token>,
	token: Token,
	active: Cell<bool>,
}

impl TrackerHandle {
	pub fn set_active(&self, active: bool) {
		if self.active.replace(active) == active {
			return;
		}

		if active {
			self.tracker.add(self.token.clone());
		} else {
			self.tracker.remove(&self.token);
		}
	}

	pub fn is_active(&self) -> bool {
		self.active.get()
	}

	pub fn token(&self) -> &Token {
		&self.token
	}

	pub fn release(self) {
		std::mem::drop(self)
	}
}

impl Drop for TrackerHandle {
	fn drop(&mut self) {
		if self.active.get() {
			self.tracker.remove(&self.token);
		}
	}
}

impl Debug for TrackerHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TrackerHandle")
			.field("token", &self.token)
			.field("active", &self.active.get())
			.finish()
	}
}
