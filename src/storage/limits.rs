use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::storage::{MAX_KEY_LEN, MAX_VALUE_UNITS};

const NUMBER_UNITS: usize = 8;
const BOOL_UNITS: usize = 4;
const CHAR_UNITS: usize = 2;

/// Estimated size of a value in abstract units, not bytes.
///
/// Numbers weigh 8, booleans 4, every UTF-16 code unit of a string 2, and
/// null nothing. Arrays and objects are the sum of their members; object keys
/// are not counted.
pub(crate) fn estimate_size(val: &Value) -> usize {
    match val {
        Value::Null => 0,
        Value::Bool(_) => BOOL_UNITS,
        Value::Number(_) => NUMBER_UNITS,
        Value::String(s) => utf16_len(s) * CHAR_UNITS,
        Value::Array(items) => items.iter().map(estimate_size).sum(),
        Value::Object(members) => members.values().map(estimate_size).sum(),
    }
}

pub(crate) fn check(key: &str, val: &Value) -> Result<()> {
    if utf16_len(key) > MAX_KEY_LEN || estimate_size(val) > MAX_VALUE_UNITS {
        return Err(StoreError::Limit);
    }
    Ok(())
}

#[inline]
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}
