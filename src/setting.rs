use std::fmt::Debug;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};
use crate::observable::{Callback, Observable, Ref, Value};
use crate::{KeyValueStorage, Store, Subscription};

/// A persisted store.
///
/// The durable value is read once, on construction. A missing key is
/// seeded with the default. Every [`Setting::set`] writes through
/// synchronously after the in-memory value has changed.
pub struct Setting<T> {
	body: Rc<SettingBody<T>>,
}

struct SettingBody<T> {
	key: String,
	default: T,
	store: Store<T>,
	storage: Rc<dyn KeyValueStorage>,
}

impl<T> Clone for Setting<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> Setting<T>
where
	T: Serialize + DeserializeOwned + PartialEq + Clone + 'static,
{
	pub fn new(storage: Rc<dyn KeyValueStorage>, key: impl Into<String>, default: T) -> Self {
		let key = key.into();

		let value = match load::<T>(&*storage, &key) {
			Ok(Some(value)) => value,
			Ok(None) => {
				persist(&*storage, &key, &default);
				default.clone()
			}
			Err(err @ StorageError::Decode { .. }) => {
				tracing::warn!(%key, error = %err, "discarding stored setting");
				persist(&*storage, &key, &default);
				default.clone()
			}
			Err(err) => {
				tracing::warn!(%key, error = %err, "setting storage unavailable");
				default.clone()
			}
		};

		Setting {
			body: Rc::new(SettingBody {
				key,
				default,
				store: Store::new(value),
				storage,
			}),
		}
	}

	#[inline]
	pub fn get(&self) -> T {
		self.body.store.get()
	}

	#[inline]
	pub fn snapshot(&self) -> Ref<'_, T> {
		self.body.store.snapshot()
	}

	pub fn set(&self, value: T) {
		self.body.store.set(value);
		// A subscriber may have written again during the round above.
		persist(&*self.body.storage, &self.body.key, &*self.body.store.snapshot());
	}

	pub fn update(&self, func: impl FnOnce(&T) -> T) {
		let next = self.body.store.with(func);
		self.set(next);
	}

	#[must_use]
	pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
		self.body.store.subscribe(callback)
	}

	pub fn key(&self) -> &str {
		&self.body.key
	}

	pub fn default_value(&self) -> &T {
		&self.body.default
	}

	pub fn observe(&self) -> Value<T> {
		Value::new(self.body.clone())
	}
}

impl Setting<bool> {
	pub fn toggle(&self) {
		self.update(|value| !*value);
	}
}

fn load<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Result<Option<T>> {
	let Some(text) = storage.get(key)? else {
		return Ok(None);
	};

	serde_json::from_str(&text)
		.map(Some)
		.map_err(|source| StorageError::Decode {
			key: key.to_owned(),
			source,
		})
}

fn persist<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, value: &T) {
	let result = serde_json::to_string(value)
		.map_err(|source| StorageError::Encode {
			key: key.to_owned(),
			source,
		})
		.and_then(|text| storage.set(key, &text));

	match result {
		Ok(()) => tracing::debug!(%key, "setting persisted"),
		Err(err) => tracing::warn!(%key, error = %err, "failed to persist setting"),
	}
}

impl<T> Observable<T> for SettingBody<T>
where
	T: Clone + 'static,
{
	fn snapshot(&self) -> Ref<'_, T> {
		self.store.snapshot()
	}

	fn server_snapshot(&self) -> Ref<'_, T> {
		Ref::Ref(&self.default)
	}

	fn subscribe(&self, callback: Callback<T>) -> Subscription {
		Observable::subscribe(&self.store, callback)
	}
}

impl<T> Observable<T> for Setting<T>
where
	T: Clone + 'static,
{
	fn snapshot(&self) -> Ref<'_, T> {
		self.body.snapshot()
	}

	fn server_snapshot(&self) -> Ref<'_, T> {
		self.body.server_snapshot()
	}

	fn subscribe(&self, callback: Callback<T>) -> Subscription {
		Observable::subscribe(&*self.body, callback)
	}
}

impl<T> From<Setting<T>> for Value<T>
where
	T: Clone + 'static,
{
	fn from(setting: Setting<T>) -> Self {
		Value::new(setting.body)
	}
}

impl<T> Debug for Setting<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Setting")
			.field("key", &self.body.key)
			.field("default", &self.body.default)
			.field("store", &self.body.store)
			.finish()
	}
}
