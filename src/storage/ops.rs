use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::storage::{Document, Record};

pub(crate) fn lookup(doc: &Document, key: &str, now: i64) -> Result<Value> {
    let record = doc.get(key).ok_or(StoreError::NotFound)?;
    if record.is_expired(now) {
        return Err(StoreError::Expired);
    }
    Ok(record.value.clone())
}

/// Inserts a new record. An existing key is never replaced, even once it has
/// expired.
pub(crate) fn insert(doc: &mut Document, key: &str, value: Value, ttl: i64, now: i64) -> Result<()> {
    if doc.contains_key(key) {
        return Err(StoreError::DuplicateKey);
    }
    doc.insert(key.to_string(), Record { value, ttl, created_at: now });
    Ok(())
}

pub(crate) fn remove(doc: &mut Document, key: &str, now: i64) -> Result<()> {
    let record = doc.get(key).ok_or(StoreError::NotFound)?;
    if record.is_expired(now) {
        return Err(StoreError::ExpiredDelete);
    }
    doc.remove(key);
    Ok(())
}
