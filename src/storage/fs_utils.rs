use std::ffi::OsString;
use std::fs;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{trace, warn};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{Result, StoreError};

pub(crate) fn read_document(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub(crate) async fn read_document_async(path: &Path) -> Result<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Replaces `path` with `contents` through a uniquely named temp file in the
/// same directory, so readers see either the old or the new document.
pub(crate) fn write_atomic(path: &Path, contents: &str, sync: bool) -> Result<()> {
    check_writable(path)?;

    let tmp = temp_path(path);
    let res = (|| -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
        file.write_all(contents.as_bytes())?;
        if sync {
            file.sync_all()?;
        }
        fs::rename(&tmp, path)
    })();

    if let Err(e) = res {
        discard(&tmp);
        return Err(e.into());
    }
    trace!("document written to {}", path.display());
    Ok(())
}

pub(crate) async fn write_atomic_async(path: &Path, contents: &str, sync: bool) -> Result<()> {
    check_writable_async(path).await?;

    let tmp = temp_path(path);
    let res = async {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .await?;
        file.write_all(contents.as_bytes()).await?;
        if sync {
            file.sync_all().await?;
        } else {
            file.flush().await?;
        }
        drop(file);
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = res {
        discard_async(&tmp).await;
        return Err(e.into());
    }
    trace!("document written to {}", path.display());
    Ok(())
}

/// A missing target is fine, the rename creates it.
pub(crate) fn check_writable(path: &Path) -> Result<()> {
    check_access(path, is_writable)
}

fn check_access<F>(path: &Path, writable: F) -> Result<()> where F: Fn(&Path) -> bool {
    match fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
        Ok(_) if writable(path) => Ok(()),
        Ok(_) => Err(StoreError::Permission(path.to_path_buf())),
    }
}

async fn check_writable_async(path: &Path) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || check_writable(&path))
        .await
        .map_err(|e| StoreError::IOError(io::Error::new(io::ErrorKind::Other, e)))?
}

#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    fs::metadata(path).map(|m| !m.permissions().readonly()).unwrap_or(false)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!("{}.tmp", Uuid::new_v4()));
    PathBuf::from(name)
}

fn discard(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("cannot remove temp file {}: {}", tmp.display(), e);
        }
    }
}

async fn discard_async(tmp: &Path) {
    if let Err(e) = tokio::fs::remove_file(tmp).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("cannot remove temp file {}: {}", tmp.display(), e);
        }
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempdir::TempDir;

    use crate::error::StoreError;

    use super::{check_access, check_writable, temp_path, write_atomic, write_atomic_async};

    #[test]
    fn it_should_replace_file_contents() {
        let dir = TempDir::new("jsonkv-").unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "{}").unwrap();

        write_atomic(&path, "{\"a\": 1}", true).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\": 1}");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1, "temp file left behind");
    }

    #[test]
    fn it_should_create_missing_target() {
        let dir = TempDir::new("jsonkv-").unwrap();
        let path = dir.path().join("new.json");

        assert!(check_writable(&path).is_ok());
        write_atomic(&path, "{}", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn it_should_fail_when_directory_is_gone() {
        let dir = TempDir::new("jsonkv-").unwrap();
        let path = dir.path().join("missing").join("doc.json");

        assert!(write_atomic(&path, "{}", false).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn it_should_refuse_unwritable_target() {
        let dir = TempDir::new("jsonkv-").unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "{}").unwrap();

        let err = check_access(&path, |_| false).unwrap_err();
        assert!(matches!(err, StoreError::Permission(ref p) if p == &path));
        assert_eq!(err.to_string(), format!("permission denied: {} is not writable", path.display()));

        // missing targets skip the access check
        assert!(check_access(&dir.path().join("new.json"), |_| false).is_ok());
    }

    #[tokio::test]
    async fn it_should_clean_up_temp_file_when_rename_fails() {
        let dir = TempDir::new("jsonkv-").unwrap();
        let path = dir.path().join("doc.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        assert!(write_atomic_async(&path, "{}", false).await.is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1, "temp file left behind");
    }

    #[test]
    fn it_should_use_unique_temp_names() {
        let dir = TempDir::new("jsonkv-").unwrap();
        let path = dir.path().join("doc.json");
        let a = temp_path(&path);
        let b = temp_path(&path);

        assert_ne!(a, b);
        assert_eq!(a.parent(), path.parent());
        assert!(a.to_string_lossy().ends_with(".tmp"));
    }

    #[tokio::test]
    async fn it_should_replace_file_contents_async() {
        let dir = TempDir::new("jsonkv-").unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "{}").unwrap();

        write_atomic_async(&path, "{\"b\": 2}", false).await.unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"b\": 2}");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
