use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Key Not Found")]
    NotFound,

    #[error("Key Expired")]
    Expired,

    #[error("Key Expired, Unable To Delete")]
    ExpiredDelete,

    #[error("Key Already exists")]
    DuplicateKey,

    #[error("File is Empty")]
    EmptyStore,

    #[error("Either Key or Value Size Limit Breached")]
    Limit,

    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("permission denied: {} is not writable", .0.display())]
    Permission(PathBuf),

    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),
}
