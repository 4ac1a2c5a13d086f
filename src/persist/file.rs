//! File-per-key storage with write-to-temp-then-rename updates.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use super::{KvStorage, PersistError, PersistResult};

/// Stores each key as `<dir>/<key>.json`.
///
/// A `set` writes a uniquely named temp file in `dir`, syncs it, then
/// persists it over the target, so readers see either the old blob or the
/// new one. A failed `set` removes its temp file.
#[derive(Debug, Clone)]
pub struct FileKvStorage {
    dir: PathBuf,
}

impl FileKvStorage {
    /// Opens `dir`, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> PersistResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PersistResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
        if !valid {
            return Err(PersistError::Message(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KvStorage for FileKvStorage {
    fn get(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> PersistResult<()> {
        let path = self.path_for(key)?;

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}
