use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::storage::{codec, DEFAULT_TTL, fs_utils, ops, utils};
use crate::storage::file_lock::WriteLock;
use crate::storage::handle::{prepare, FileStore};

// Non-blocking twins of the operations in handle.rs. File I/O goes through
// tokio::fs and the write lock is taken on the blocking pool.
impl FileStore {
    pub async fn save_async<V>(&self, key: &str, value: &V, ttl: Option<i64>) -> Result<String> where V: Serialize + ?Sized {
        let value = prepare(key, value)?;
        let _lock = self.lock_async().await?;

        let raw = fs_utils::read_document_async(self.path()).await?;
        let mut doc = codec::decode(&raw)?;
        ops::insert(&mut doc, key, value, ttl.unwrap_or(DEFAULT_TTL), utils::timestamp())?;

        let encoded = codec::encode(&doc)?;
        fs_utils::write_atomic_async(self.path(), &encoded, self.conf.sync_on_write).await?;
        Ok(key.to_string())
    }

    pub async fn get_async(&self, key: &str) -> Result<Value> {
        let raw = fs_utils::read_document_async(self.path()).await?;
        let doc = codec::decode(&raw)?;
        ops::lookup(&doc, key, utils::timestamp())
    }

    pub async fn get_as_async<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        serde_json::from_value(self.get_async(key).await?).map_err(StoreError::Decode)
    }

    pub async fn delete_async(&self, key: &str) -> Result<()> {
        let _lock = self.lock_async().await?;

        let raw = fs_utils::read_document_async(self.path()).await?;
        if raw.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        let mut doc = codec::decode(&raw)?;
        ops::remove(&mut doc, key, utils::timestamp())?;

        let encoded = codec::encode(&doc)?;
        fs_utils::write_atomic_async(self.path(), &encoded, self.conf.sync_on_write).await
    }

    async fn lock_async(&self) -> Result<Option<WriteLock>> {
        if !self.conf.lock_writes {
            return Ok(None);
        }
        WriteLock::acquire_async(&self.conf.lock_path()).await.map(Some)
    }
}
