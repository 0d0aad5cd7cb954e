use std::path::PathBuf;

use thiserror::Error;

/// Failures of the durable key-value surface.
///
/// The reactive core itself never fails; only persistence does.
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("failed to access {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to serialize entries for {path}: {source}")]
	Serialize {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("value stored under `{key}` is not valid: {source}")]
	Decode {
		key: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("value for `{key}` cannot be encoded: {source}")]
	Encode {
		key: String,
		#[source]
		source: serde_json::Error,
	},
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;
