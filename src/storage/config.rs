use std::env;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const DEFAULT_NAME: &str = "store";
const EXTENSION: &str = ".json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the `.json` document.
    pub path: PathBuf,
    /// Hold an exclusive advisory lock around every load-mutate-store cycle.
    pub lock_writes: bool,
    /// fsync the temporary file before it is renamed over the document.
    pub sync_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            lock_writes: true,
            sync_on_write: false,
        }
    }
}

impl Config {
    /// Resolves a store name like `data/users` or `data/users.json` to
    /// `<cwd>/data/users.json`. Absolute names are kept as they are.
    pub fn for_name(name: &str) -> Result<Self> {
        let stem = name.strip_suffix(EXTENSION).unwrap_or(name);
        let stem = Path::new(stem);
        let absolute = if stem.is_absolute() {
            stem.to_path_buf()
        } else {
            env::current_dir()?.join(stem)
        };

        let dir = absolute.parent().map(Path::to_path_buf).unwrap_or_default();
        let base = absolute
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        Ok(Self {
            path: dir.join(format!("{base}{EXTENSION}")),
            ..Default::default()
        })
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub(crate) fn lock_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::Config;

    #[test]
    fn it_should_resolve_absolute_name() {
        let conf = Config::for_name("/tmp/foo/bar").unwrap();

        assert_eq!(conf.dir(), Path::new("/tmp/foo"));
        assert_eq!(conf.path, Path::new("/tmp/foo/bar.json"));
    }

    #[test]
    fn it_should_strip_json_extension() {
        let conf = Config::for_name("/tmp/foo/bar.json").unwrap();
        assert_eq!(conf.path, Path::new("/tmp/foo/bar.json"));
    }

    #[test]
    fn it_should_resolve_relative_name_against_cwd() {
        let conf = Config::for_name("dataTest").unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(conf.path, cwd.join("dataTest.json"));
        assert!(conf.lock_writes);
        assert!(!conf.sync_on_write);
    }

    #[test]
    fn it_should_put_lock_file_next_to_document() {
        let conf = Config::for_name("/tmp/foo/bar").unwrap();
        assert_eq!(conf.lock_path(), Path::new("/tmp/foo/bar.json.lock"));
    }
}
