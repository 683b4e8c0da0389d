use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, warn};

use crate::error::{Result, StoreError};

/// Exclusive advisory lock on the sidecar `<document>.lock` file, released on drop.
///
/// flock locks belong to the open file description, so two guards conflict
/// even inside one process.
#[derive(Debug)]
pub(crate) struct WriteLock {
    file: fs::File,
    path: PathBuf,
}

impl WriteLock {
    pub(crate) fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        file.lock_exclusive()?;
        debug!("write lock acquired: {}", path.display());

        Ok(WriteLock { file, path: path.to_path_buf() })
    }

    pub(crate) async fn acquire_async(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::acquire(&path))
            .await
            .map_err(|e| StoreError::IOError(io::Error::new(io::ErrorKind::Other, e)))?
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("cannot release write lock {}: {:?}", self.path.display(), e);
        }
    }
}
