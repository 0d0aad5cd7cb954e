use std::fmt::{Debug, Display};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::observable::{Callback, Observable, Ref, Value};
use crate::{Store, Subscription};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
	Upload,
	#[default]
	Scan,
	Input,
}

impl ScanMode {
	pub const ALL: [ScanMode; 3] = [ScanMode::Upload, ScanMode::Scan, ScanMode::Input];

	pub fn as_str(self) -> &'static str {
		match self {
			ScanMode::Upload => "upload",
			ScanMode::Scan => "scan",
			ScanMode::Input => "input",
		}
	}
}

impl Display for ScanMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A store holding one of a fixed, ordered list of options.
pub struct Selector<T> {
	options: Rc<[T]>,
	store: Store<T>,
}

impl<T> Clone for Selector<T> {
	fn clone(&self) -> Self {
		Self {
			options: self.options.clone(),
			store: self.store.clone(),
		}
	}
}

impl Selector<ScanMode> {
	pub fn scan_modes(initial: ScanMode) -> Self {
		Selector::new(ScanMode::ALL, initial)
	}
}

impl<T> Selector<T>
where
	T: PartialEq + Clone + 'static,
{
	pub fn new(options: impl Into<Rc<[T]>>, initial: T) -> Self {
		Selector {
			options: options.into(),
			store: Store::new(initial),
		}
	}

	#[inline]
	pub fn get(&self) -> T {
		self.store.get()
	}

	#[inline]
	pub fn snapshot(&self) -> Ref<'_, T> {
		self.store.snapshot()
	}

	pub fn options(&self) -> &[T] {
		&self.options
	}

	/// Position of the current value, `None` if it is not one of the
	/// options.
	pub fn index(&self) -> Option<usize> {
		self.store
			.with(|current| self.options.iter().position(|option| option == current))
	}

	pub fn select(&self, value: T) {
		self.store.set(value);
	}

	/// Step `by` positions through the options.
	///
	/// Stepping past either end lands on the fallback: the first option
	/// when moving forward, the last when moving backward. A current value
	/// that is not among the options is treated as sitting on that same
	/// fallback.
	pub fn move_by(&self, by: isize) {
		let len = self.options.len();
		if len == 0 {
			return;
		}

		let fallback = if by > 0 { 0 } else { len - 1 };
		let start = self.index().unwrap_or(fallback);

		let next = isize::try_from(start)
			.ok()
			.and_then(|start| start.checked_add(by))
			.and_then(|next| usize::try_from(next).ok())
			.filter(|next| *next < len)
			.unwrap_or(fallback);

		self.store.set(self.options[next].clone());
	}

	pub fn next(&self) {
		self.move_by(1)
	}

	pub fn previous(&self) {
		self.move_by(-1)
	}

	#[must_use]
	pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
		self.store.subscribe(callback)
	}

	pub fn observe(&self) -> Value<T> {
		self.store.clone().into()
	}
}

impl<T> Observable<T> for Selector<T>
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

impl<T> Debug for Selector<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Selector")
			.field("options", &self.options)
			.field("store", &self.store)
			.finish()
	}
}
