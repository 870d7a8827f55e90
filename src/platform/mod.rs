//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Key/value storage (LocalStorage on web)

pub mod storage;
pub mod time;

pub use storage::{MemoryStorage, Storage, default_storage};
pub use time::now_ms;
