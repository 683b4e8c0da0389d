use anyhow::Context;
use log::info;
use serde_json::json;

use jsonkv::{FileStore, StoreError};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "store".to_string());
    let store = FileStore::open(&name).with_context(|| format!("cannot open store `{}`", name))?;
    info!("using {}", store.path().display());

    let key = "a1";
    match store.save(key, &json!({"a1": "a2"}), Some(60)) {
        Ok(k) => println!("saved: `{}`", k),
        Err(StoreError::DuplicateKey) => println!("key already exists: `{}`", key),
        Err(e) => return Err(e).context("save failed"),
    }

    match store.get(key) {
        Ok(val) => println!("key found: `{}`", val),
        Err(e @ (StoreError::NotFound | StoreError::Expired)) => println!("{}: `{}`", e, key),
        Err(e) => return Err(e).context("get failed"),
    }

    match store.delete(key) {
        Ok(()) => println!("deleted: `{}`", key),
        Err(e @ (StoreError::NotFound | StoreError::ExpiredDelete)) => println!("{}: `{}`", e, key),
        Err(e) => return Err(e).context("delete failed"),
    }

    Ok(())
}
