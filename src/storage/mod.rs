use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use config::Config;
pub use handle::FileStore;

mod async_handle;
mod codec;
mod config;
mod file_lock;
mod fs_utils;
mod handle;
mod limits;
mod ops;
mod utils;

pub const MAX_KEY_LEN: usize = 32;
pub const MAX_VALUE_UNITS: usize = 16_000;
/// TTL used when the caller passes `None`. Not special-cased by the expiry
/// check, so a record saved with it is already expired on the next read.
pub const DEFAULT_TTL: i64 = -1;

// { "<key>": { "value": .., "ttl": .., "createdAt": .. }, .. }
pub(crate) type Document = HashMap<String, Record>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Record {
    pub(crate) value: Value,
    pub(crate) ttl: i64,
    #[serde(rename = "createdAt")]
    pub(crate) created_at: i64,
}

impl Record {
    pub(crate) fn is_expired(&self, now: i64) -> bool {
        now > self.created_at.saturating_add(self.ttl)
    }
}
