use std::fs;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::storage::{codec, DEFAULT_TTL, fs_utils, limits, ops, utils};
use crate::storage::config::Config;
use crate::storage::file_lock::WriteLock;

/// Handle to one JSON document on disk.
///
/// Nothing is cached between calls: every operation reads the whole document
/// again, and every mutation rewrites it.
#[derive(Debug, Clone)]
pub struct FileStore {
    pub(super) conf: Config,
}

impl FileStore {
    /// Opens the store named `name`, see [`Config::for_name`].
    pub fn open(name: &str) -> Result<Self> {
        Self::with_config(Config::for_name(name)?)
    }

    pub fn with_config(conf: Config) -> Result<Self> {
        fs::create_dir_all(conf.dir())?;

        match OpenOptions::new().write(true).create_new(true).open(&conf.path) {
            Ok(mut file) => {
                file.write_all(b"{}")?;
                debug!("initialized empty store at {}", conf.path.display());
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        Ok(FileStore { conf })
    }

    pub fn path(&self) -> &Path {
        &self.conf.path
    }

    pub fn dir(&self) -> &Path {
        self.conf.dir()
    }

    pub fn config(&self) -> &Config {
        &self.conf
    }

    /// Inserts `value` under `key` and returns the key.
    ///
    /// `ttl` defaults to [`DEFAULT_TTL`]. Fails with `DuplicateKey` if the key
    /// is present in the document, expired or not.
    pub fn save<V>(&self, key: &str, value: &V, ttl: Option<i64>) -> Result<String> where V: Serialize + ?Sized {
        let value = prepare(key, value)?;
        let _lock = self.lock()?;

        let raw = fs_utils::read_document(self.path())?;
        let mut doc = codec::decode(&raw)?;
        ops::insert(&mut doc, key, value, ttl.unwrap_or(DEFAULT_TTL), utils::timestamp())?;

        let encoded = codec::encode(&doc)?;
        fs_utils::write_atomic(self.path(), &encoded, self.conf.sync_on_write)?;
        Ok(key.to_string())
    }

    pub fn get(&self, key: &str) -> Result<Value> {
        let raw = fs_utils::read_document(self.path())?;
        let doc = codec::decode(&raw)?;
        ops::lookup(&doc, key, utils::timestamp())
    }

    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        serde_json::from_value(self.get(key)?).map_err(StoreError::Decode)
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        let _lock = self.lock()?;

        let raw = fs_utils::read_document(self.path())?;
        if raw.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        let mut doc = codec::decode(&raw)?;
        ops::remove(&mut doc, key, utils::timestamp())?;

        let encoded = codec::encode(&doc)?;
        fs_utils::write_atomic(self.path(), &encoded, self.conf.sync_on_write)
    }

    fn lock(&self) -> Result<Option<WriteLock>> {
        if !self.conf.lock_writes {
            return Ok(None);
        }
        WriteLock::acquire(&self.conf.lock_path()).map(Some)
    }
}

/// Validates limits and takes an owned snapshot of the caller's value.
pub(super) fn prepare<V>(key: &str, value: &V) -> Result<Value> where V: Serialize + ?Sized {
    let value = serde_json::to_value(value).map_err(StoreError::Encode)?;
    limits::check(key, &value)?;
    Ok(value)
}
