use crate::error::{Result, StoreError};
use crate::storage::Document;

pub(crate) fn decode(raw: &str) -> Result<Document> {
    if raw.is_empty() {
        return Ok(Document::new());
    }
    serde_json::from_str(raw).map_err(StoreError::Decode)
}

pub(crate) fn encode(doc: &Document) -> Result<String> {
    // serde_json's pretty printer indents with two spaces
    serde_json::to_string_pretty(doc).map_err(StoreError::Encode)
}
