mod storage;
mod error;

pub use storage::{Config, DEFAULT_TTL, FileStore, MAX_KEY_LEN, MAX_VALUE_UNITS};
pub use error::{Result, StoreError};
