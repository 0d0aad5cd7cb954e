pub mod macros;

mod app;
mod derived;
mod error;
mod header;
mod observable;
mod resize;
mod selector;
mod setting;
mod stable;
mod storage;
mod store;
mod subscription;
mod tracker;

pub use app::{AppConfig, AppState};
pub use derived::Derived;
pub use error::{Result, StorageError};
pub use header::{HeaderEntry, HeaderStack};
pub use observable::{Callback, Observable, Ref, Value};
pub use resize::{ResizeEvent, ResizeRegistry};
pub use selector::{ScanMode, Selector};
pub use setting::Setting;
pub use stable::{StableFn, StableValue};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::Store;
pub use subscription::Subscription;
pub use tracker::{Token, Tracker, TrackerHandle};
