use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;

use crate::error::{Result, StorageError};

/// Durable string key-value surface backing [`crate::Setting`].
pub trait KeyValueStorage {
	fn get(&self, key: &str) -> Result<Option<String>>;
	fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Default, Debug)]
pub struct MemoryStorage {
	entries: RefCell<FxHashMap<String, String>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}

impl KeyValueStorage for MemoryStorage {
	fn get(&self, key: &str) -> Result<Option<String>> {
		Ok(self.entries.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		self.entries
			.borrow_mut()
			.insert(key.to_owned(), value.to_owned());
		Ok(())
	}
}

/// A JSON object on disk. Reads are served from memory; every write
/// rewrites the file.
#[derive(Debug)]
pub struct FileStorage {
	path: PathBuf,
	entries: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let entries = match std::fs::read_to_string(&path) {
			Ok(text) if text.trim().is_empty() => BTreeMap::new(),
			Ok(text) => serde_json::from_str(&text).map_err(|source| StorageError::Parse {
				path: path.clone(),
				source,
			})?,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
			Err(source) => return Err(StorageError::Io { path, source }),
		};

		tracing::debug!(path = %path.display(), entries = entries.len(), "storage opened");

		Ok(FileStorage {
			path,
			entries: RefCell::new(entries),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn temp_path(&self) -> PathBuf {
		let mut name = self.path.file_name().unwrap_or_default().to_os_string();
		name.push(".tmp");
		self.path.with_file_name(name)
	}

	/// Writes the whole map to a sibling temp file and renames it over the
	/// target, so the file on disk is always a complete document.
	fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
		let text =
			serde_json::to_string_pretty(entries).map_err(|source| StorageError::Serialize {
				path: self.path.clone(),
				source,
			})?;

		let temp = self.temp_path();
		std::fs::write(&temp, text).map_err(|source| StorageError::Io {
			path: temp.clone(),
			source,
		})?;
		std::fs::rename(&temp, &self.path).map_err(|source| StorageError::Io {
			path: self.path.clone(),
			source,
		})
	}
}

impl KeyValueStorage for FileStorage {
	fn get(&self, key: &str) -> Result<Option<String>> {
		Ok(self.entries.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		let mut entries = self.entries.borrow_mut();
		entries.insert(key.to_owned(), value.to_owned());
		self.flush(&entries)
	}
}
