use std::path::PathBuf;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{
	FileStorage, HeaderStack, KeyValueStorage, MemoryStorage, ResizeRegistry, ScanMode, Selector,
	Setting, Tracker,
};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
	pub initial_scan_mode: ScanMode,
	/// Where settings are persisted. Settings live in memory when unset.
	pub storage_path: Option<PathBuf>,
}

impl AppConfig {
	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}
}

/// Long-lived application state, built once at start-up and handed to
/// whatever needs it.
#[derive(Clone)]
pub struct AppState {
	pub loading: Tracker,
	pub scan_mode: Selector<ScanMode>,
	pub resize: ResizeRegistry,
	pub header: HeaderStack<String>,
	storage: Rc<dyn KeyValueStorage>,
}

impl AppState {
	pub fn new(config: &AppConfig, storage: Rc<dyn KeyValueStorage>) -> Self {
		AppState {
			loading: Tracker::new(),
			scan_mode: Selector::scan_modes(config.initial_scan_mode),
			resize: ResizeRegistry::new(),
			header: HeaderStack::new(),
			storage,
		}
	}

	pub fn open(config: &AppConfig) -> Result<Self> {
		let storage: Rc<dyn KeyValueStorage> = match &config.storage_path {
			Some(path) => Rc::new(FileStorage::open(path)?),
			None => Rc::new(MemoryStorage::new()),
		};

		tracing::debug!(scan_mode = %config.initial_scan_mode, "app state created");
		Ok(AppState::new(config, storage))
	}

	pub fn setting<T>(&self, key: &str, default: T) -> Setting<T>
	where
		T: Serialize + DeserializeOwned + PartialEq + Clone + 'static,
	{
		Setting::new(self.storage.clone(), key, default)
	}

	pub fn storage(&self) -> Rc<dyn KeyValueStorage> {
		self.storage.clone()
	}
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("loading", &self.loading)
			.field("scan_mode", &self.scan_mode)
			.field("resize", &self.resize)
			.field("header", &self.header)
			.finish()
	}
}
