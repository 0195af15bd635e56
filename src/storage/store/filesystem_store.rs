//! A synchronous filesystem store.

use parking_lot::RwLock;
use thiserror::Error;
use walkdir::WalkDir;

use std::{
    collections::HashMap,
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::storage::{
    Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits, StorageError, StoreKey,
    StoreKeyError, StoreKeys, StoreKeysPrefixes, StorePrefix, StorePrefixes,
    WritableStorageTraits,
};

/// A synchronous file system store.
///
/// Each store key maps to a file relative to the base path of the store, so a Zarr V2 hierarchy is laid out as a directory tree (a "directory store").
#[derive(Debug)]
pub struct FilesystemStore {
    base_path: PathBuf,
    sort: bool,
    readonly: bool,
    files: Mutex<HashMap<StoreKey, Arc<RwLock<()>>>>,
}

impl FilesystemStore {
    /// Create a new file system store at a given `base_path`.
    ///
    /// The base directory is created lazily by the first write.
    ///
    /// # Errors
    /// Returns a [`FilesystemStoreCreateError`] if `base_directory`:
    ///   - is not valid, or
    ///   - it points to an existing file rather than a directory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, FilesystemStoreCreateError> {
        let base_path = base_path.as_ref().to_path_buf();
        if base_path.to_str().is_none() {
            return Err(FilesystemStoreCreateError::InvalidBasePath(base_path));
        }

        let readonly = if base_path.exists() {
            let md = std::fs::metadata(&base_path).map_err(FilesystemStoreCreateError::IOError)?;
            if !md.is_dir() {
                return Err(FilesystemStoreCreateError::NotADirectory(base_path));
            }
            md.permissions().readonly()
        } else {
            // the path does not exist, so try and create it. If this succeeds, the filesystem is not read only
            std::fs::create_dir_all(&base_path).map_err(FilesystemStoreCreateError::IOError)?;
            std::fs::remove_dir(&base_path)?;
            false
        };

        Ok(Self {
            base_path,
            sort: false,
            readonly,
            files: Mutex::default(),
        })
    }

    /// Makes the store sort directories/files in [`list_dir`](ListableStorageTraits::list_dir).
    #[must_use]
    pub const fn sorted(mut self) -> Self {
        self.sort = true;
        self
    }

    /// The base path of the store.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Maps a [`StoreKey`] to a filesystem [`PathBuf`].
    #[must_use]
    pub fn key_to_fspath(&self, key: &StoreKey) -> PathBuf {
        let mut path = self.base_path.clone();
        path.push(key.as_str());
        path
    }

    /// Maps a filesystem [`PathBuf`] to a [`StoreKey`].
    fn fspath_to_key(&self, path: &Path) -> Result<StoreKey, StoreKeyError> {
        let path = pathdiff::diff_paths(path, &self.base_path)
            .ok_or_else(|| StoreKeyError::from(path.to_string_lossy().to_string()))?;
        StoreKey::new(path.to_string_lossy().replace('\\', "/"))
    }

    /// Maps a store [`StorePrefix`] to a filesystem [`PathBuf`].
    #[must_use]
    pub fn prefix_to_fs_path(&self, prefix: &StorePrefix) -> PathBuf {
        let mut path = self.base_path.clone();
        path.push(prefix.as_str());
        path
    }

    fn get_file_mutex(&self, key: &StoreKey) -> Result<Arc<RwLock<()>>, StorageError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| StorageError::from("filesystem store lock poisoned"))?;
        let file = files
            .entry(key.clone())
            .or_insert_with(|| Arc::new(RwLock::default()))
            .clone();
        drop(files);
        Ok(file)
    }
}

impl ReadableStorageTraits for FilesystemStore {
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        let file = self.get_file_mutex(key)?;
        let _lock = file.read();

        let mut file = match File::open(self.key_to_fspath(key)) {
            Ok(file) => file,
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    return Ok(None);
                }
                return Err(err.into());
            }
        };
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(Some(Bytes::from(buffer)))
    }

    fn size_key(&self, key: &StoreKey) -> Result<Option<u64>, StorageError> {
        let key_path = self.key_to_fspath(key);
        std::fs::metadata(key_path).map_or_else(|_| Ok(None), |metadata| Ok(Some(metadata.len())))
    }
}

impl WritableStorageTraits for FilesystemStore {
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        if self.readonly {
            return Err(StorageError::ReadOnly);
        }

        let file = self.get_file_mutex(key)?;
        let _lock = file.write();

        let key_path = self.key_to_fspath(key);
        if let Some(parent) = key_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(key_path)?;
        file.write_all(&value)?;
        Ok(())
    }

    fn erase(&self, key: &StoreKey) -> Result<(), StorageError> {
        if self.readonly {
            return Err(StorageError::ReadOnly);
        }

        let file = self.get_file_mutex(key)?;
        let _lock = file.write();

        match std::fs::remove_file(self.key_to_fspath(key)) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError> {
        if self.readonly {
            return Err(StorageError::ReadOnly);
        }

        let _lock = self.files.lock(); // lock all operations

        match std::fs::remove_dir_all(self.prefix_to_fs_path(prefix)) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl ListableStorageTraits for FilesystemStore {
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        Ok(WalkDir::new(self.prefix_to_fs_path(prefix))
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|v| v.path().is_file())
            .filter_map(|v| self.fspath_to_key(v.path()).ok())
            .collect())
    }

    fn list_dir(&self, prefix: &StorePrefix) -> Result<StoreKeysPrefixes, StorageError> {
        let prefix_path = self.prefix_to_fs_path(prefix);
        let mut keys: StoreKeys = vec![];
        let mut prefixes: StorePrefixes = vec![];
        if let Ok(dir) = std::fs::read_dir(prefix_path) {
            for entry in dir {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().to_string();
                if entry.path().is_dir() {
                    prefixes.push(StorePrefix::new(format!("{}{name}/", prefix.as_str()))?);
                } else {
                    keys.push(StoreKey::new(format!("{}{name}", prefix.as_str()))?);
                }
            }
        }
        if self.sort {
            keys.sort();
            prefixes.sort();
        }

        Ok(StoreKeysPrefixes::new(keys, prefixes))
    }
}

/// A filesystem store creation error.
#[derive(Debug, Error)]
pub enum FilesystemStoreCreateError {
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// The path is not valid on this system.
    #[error("base path {0} is not valid")]
    InvalidBasePath(PathBuf),
    /// The path exists and is not a directory.
    #[error("base path {0} exists and is not a directory")]
    NotADirectory(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn filesystem_write_read_list() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let store = FilesystemStore::new(path.path().join("store.zarr"))?.sorted();

        store.set(&StoreKey::new("a/b")?, Bytes::from_static(&[0, 1, 2]))?;
        store.set(&StoreKey::new("a/c")?, Bytes::from_static(&[3]))?;
        store.set(&StoreKey::new(".zgroup")?, Bytes::from_static(b"{}"))?;

        assert_eq!(store.get(&StoreKey::new("a/b")?)?.unwrap().as_ref(), &[0, 1, 2]);
        assert!(store.get(&StoreKey::new("a/d")?)?.is_none());
        assert_eq!(store.size_key(&StoreKey::new("a/c")?)?, Some(1));

        assert_eq!(
            store.list()?,
            vec![
                StoreKey::new(".zgroup")?,
                StoreKey::new("a/b")?,
                StoreKey::new("a/c")?
            ]
        );
        let list_dir = store.list_dir(&StorePrefix::root())?;
        assert_eq!(list_dir.keys(), &[StoreKey::new(".zgroup")?]);
        assert_eq!(list_dir.prefixes(), &[StorePrefix::new("a/")?]);

        store.erase(&StoreKey::new("a/b")?)?;
        store.erase(&StoreKey::new("a/b")?)?;
        assert!(store.get(&StoreKey::new("a/b")?)?.is_none());

        store.erase_prefix(&StorePrefix::root())?;
        assert!(store.list()?.is_empty());
        assert!(!store.base_path().exists());
        Ok(())
    }

    #[test]
    fn filesystem_not_a_directory() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let file_path = path.path().join("file");
        std::fs::write(&file_path, b"")?;
        assert!(matches!(
            FilesystemStore::new(&file_path),
            Err(FilesystemStoreCreateError::NotADirectory(_))
        ));
        Ok(())
    }
}
