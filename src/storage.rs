//! Zarr V2 storage.
//!
//! A store holds the keys of a Zarr hierarchy: node metadata documents (`.zgroup`, `.zarray`, `.zattrs`), the consolidated metadata index (`.zmetadata`), and encoded chunks.
//!
//! This module defines the abstract store interfaces, the [filesystem](store::FilesystemStore) and [in-memory](store::MemoryStore) stores, and the key helpers used to lay out a V2 hierarchy.

mod storage_sync;
pub mod store;
mod store_key;
mod store_prefix;

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

use crate::{
    metadata::v2::ChunkKeySeparator,
    node::{NodePath, NodePathError},
};

pub use store_key::{StoreKey, StoreKeyError, StoreKeys};
pub use store_prefix::{StorePrefix, StorePrefixError, StorePrefixes};

pub use self::storage_sync::{
    create_array, create_group, retrieve_chunk, store_chunk, ListableStorageTraits,
    ReadableListableStorageTraits, ReadableStorageTraits, ReadableWritableListableStorageTraits,
    ReadableWritableStorageTraits, WritableStorageTraits,
};

/// The type for bytes used in store set and get methods.
///
/// An alias for [`bytes::Bytes`].
pub type Bytes = bytes::Bytes;

/// An alias for bytes which may or may not be available.
///
/// When a value is read from a store, it returns `MaybeBytes` which is [`None`] if the key is not available.
pub type MaybeBytes = Option<Bytes>;

/// [`StoreKeys`] and [`StorePrefixes`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StoreKeysPrefixes {
    keys: StoreKeys,
    prefixes: StorePrefixes,
}

impl StoreKeysPrefixes {
    /// Create a new [`StoreKeysPrefixes`].
    #[must_use]
    pub fn new(keys: StoreKeys, prefixes: StorePrefixes) -> Self {
        Self { keys, prefixes }
    }

    /// Returns the keys.
    #[must_use]
    pub const fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Returns the prefixes.
    #[must_use]
    pub const fn prefixes(&self) -> &StorePrefixes {
        &self.prefixes
    }
}

/// A storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A write operation was attempted on a read only store.
    #[error("a write operation was attempted on a read only store")]
    ReadOnly,
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// An error serialising or parsing the metadata for a key.
    #[error("error parsing metadata for {0}: {1}")]
    InvalidMetadata(StoreKey, String),
    /// An invalid store prefix.
    #[error("invalid store prefix {0}")]
    StorePrefixError(#[from] StorePrefixError),
    /// An invalid store key.
    #[error("invalid store key {0}")]
    InvalidStoreKey(#[from] StoreKeyError),
    /// An invalid node path.
    #[error("invalid node path {0}")]
    NodePathError(#[from] NodePathError),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

/// The V2 array metadata file name.
pub const ARRAY_METADATA_V2_KEY: &str = ".zarray";

/// The V2 group metadata file name.
pub const GROUP_METADATA_V2_KEY: &str = ".zgroup";

/// The V2 user-defined attributes file name.
pub const ATTRIBUTES_V2_KEY: &str = ".zattrs";

/// The V2 consolidated metadata file name.
pub const CONSOLIDATED_METADATA_V2_KEY: &str = ".zmetadata";

/// Return the metadata key given a node path for a specified metadata file name (e.g. `.zarray`, `.zgroup`, `.zattrs`).
#[must_use]
fn meta_key_any(path: &NodePath, metadata_file_name: &str) -> StoreKey {
    let path = path.as_str();
    if path.eq("/") {
        unsafe { StoreKey::new_unchecked(metadata_file_name.to_string()) }
    } else {
        let path = path.strip_prefix('/').unwrap_or(path);
        unsafe { StoreKey::new_unchecked(format!("{path}/{metadata_file_name}")) }
    }
}

/// Return the Zarr V2 array metadata key (`.zarray`) given a node path.
#[must_use]
pub fn meta_key_v2_array(path: &NodePath) -> StoreKey {
    meta_key_any(path, ARRAY_METADATA_V2_KEY)
}

/// Return the Zarr V2 group metadata key (`.zgroup`) given a node path.
#[must_use]
pub fn meta_key_v2_group(path: &NodePath) -> StoreKey {
    meta_key_any(path, GROUP_METADATA_V2_KEY)
}

/// Return the Zarr V2 user-defined attributes key (`.zattrs`) given a node path.
#[must_use]
pub fn meta_key_v2_attributes(path: &NodePath) -> StoreKey {
    meta_key_any(path, ATTRIBUTES_V2_KEY)
}

/// Return the consolidated metadata key (`.zmetadata`) of the hierarchy rooted at `path`.
#[must_use]
pub fn meta_key_v2_consolidated(path: &NodePath) -> StoreKey {
    meta_key_any(path, CONSOLIDATED_METADATA_V2_KEY)
}

/// Return the Zarr V2 chunk key of the chunk at `chunk_grid_indices`, joined by `separator`.
///
/// A zero-dimensional array has a single chunk with key `0`.
#[must_use]
pub fn chunk_key_v2(chunk_grid_indices: &[u64], separator: ChunkKeySeparator) -> String {
    if chunk_grid_indices.is_empty() {
        "0".to_string()
    } else {
        chunk_grid_indices.iter().join(&separator.to_string())
    }
}

/// Return the data key given a node path, chunk grid coordinates and the chunk key separator.
#[must_use]
pub fn data_key(
    path: &NodePath,
    chunk_grid_indices: &[u64],
    separator: ChunkKeySeparator,
) -> StoreKey {
    let path = path.as_str();
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut key_path = PathBuf::from(path);
    key_path.push(chunk_key_v2(chunk_grid_indices, separator));
    unsafe { StoreKey::new_unchecked(key_path.to_string_lossy().replace('\\', "/")) }
}
