use tracing::debug;

use crate::{
    metadata::v2::{ArrayMetadataV2, ChunkKeySeparator, GroupMetadataV2},
    node::NodePath,
};

use super::{
    data_key, meta_key_v2_array, meta_key_v2_attributes, meta_key_v2_group, Bytes, MaybeBytes,
    StorageError, StoreKey, StoreKeys, StoreKeysPrefixes, StorePrefix,
};

/// Readable storage traits.
pub trait ReadableStorageTraits: Send + Sync {
    /// Retrieve the value (bytes) associated with a given [`StoreKey`].
    ///
    /// Returns [`None`] if the key is not found.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError>;

    /// Return the size in bytes of the value at `key`.
    ///
    /// Returns [`None`] if the key is not found.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn size_key(&self, key: &StoreKey) -> Result<Option<u64>, StorageError>;
}

/// Listable storage traits.
pub trait ListableStorageTraits: Send + Sync {
    /// Retrieve all [`StoreKeys`] in the store, sorted.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying error with the store.
    fn list(&self) -> Result<StoreKeys, StorageError> {
        self.list_prefix(&StorePrefix::root())
    }

    /// Retrieve all [`StoreKeys`] with a given [`StorePrefix`], sorted.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the prefix is not a directory or there is an underlying error with the store.
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError>;

    /// Retrieve all [`StoreKeys`] and [`StorePrefix`] which are direct children of [`StorePrefix`].
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the prefix is not a directory or there is an underlying error with the store.
    fn list_dir(&self, prefix: &StorePrefix) -> Result<StoreKeysPrefixes, StorageError>;
}

/// Writable storage traits.
pub trait WritableStorageTraits: Send + Sync {
    /// Store bytes at a [`StoreKey`], replacing any existing value.
    ///
    /// # Errors
    /// Returns a [`StorageError`] on failure to store.
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError>;

    /// Erase a [`StoreKey`].
    ///
    /// Succeeds if the key does not exist.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn erase(&self, key: &StoreKey) -> Result<(), StorageError>;

    /// Erase all [`StoreKey`] under [`StorePrefix`].
    ///
    /// Erasing the root prefix empties the store.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError>;
}

/// A supertrait of [`ReadableStorageTraits`] and [`WritableStorageTraits`].
pub trait ReadableWritableStorageTraits: ReadableStorageTraits + WritableStorageTraits {}

impl<T> ReadableWritableStorageTraits for T where T: ReadableStorageTraits + WritableStorageTraits {}

/// A supertrait of [`ReadableStorageTraits`] and [`ListableStorageTraits`].
pub trait ReadableListableStorageTraits: ReadableStorageTraits + ListableStorageTraits {}

impl<T> ReadableListableStorageTraits for T where T: ReadableStorageTraits + ListableStorageTraits {}

/// A supertrait of [`ReadableWritableStorageTraits`] and [`ListableStorageTraits`].
pub trait ReadableWritableListableStorageTraits:
    ReadableWritableStorageTraits + ListableStorageTraits
{
}

impl<T> ReadableWritableListableStorageTraits for T where
    T: ReadableWritableStorageTraits + ListableStorageTraits
{
}

fn set_json<TStorage: ?Sized + WritableStorageTraits, T: serde::Serialize>(
    storage: &TStorage,
    key: &StoreKey,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|err| StorageError::InvalidMetadata(key.clone(), err.to_string()))?;
    debug!(key = %key, bytes = json.len(), "writing metadata");
    storage.set(key, json.into())
}

/// Create a group.
///
/// Writes `.zgroup`, and `.zattrs` if the group has attributes.
///
/// # Errors
/// Returns a [`StorageError`] if there is an underlying error with the store.
pub fn create_group<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    path: &NodePath,
    group: &GroupMetadataV2,
) -> Result<(), StorageError> {
    if !group.attributes.is_empty() {
        set_json(storage, &meta_key_v2_attributes(path), &group.attributes)?;
    }
    set_json(storage, &meta_key_v2_group(path), group)
}

/// Create an array.
///
/// Writes `.zarray`, and `.zattrs` if the array has attributes.
///
/// # Errors
/// Returns a [`StorageError`] if there is an underlying error with the store.
pub fn create_array<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    path: &NodePath,
    array: &ArrayMetadataV2,
) -> Result<(), StorageError> {
    if !array.attributes.is_empty() {
        set_json(storage, &meta_key_v2_attributes(path), &array.attributes)?;
    }
    set_json(storage, &meta_key_v2_array(path), array)
}

/// Store an encoded chunk.
///
/// # Errors
/// Returns a [`StorageError`] if there is an underlying error with the store.
pub fn store_chunk<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    array_path: &NodePath,
    chunk_grid_indices: &[u64],
    separator: ChunkKeySeparator,
    chunk_encoded: Bytes,
) -> Result<(), StorageError> {
    let key = data_key(array_path, chunk_grid_indices, separator);
    debug!(key = %key, bytes = chunk_encoded.len(), "writing chunk");
    storage.set(&key, chunk_encoded)
}

/// Retrieve an encoded chunk.
///
/// Returns [`None`] if the chunk has not been written.
///
/// # Errors
/// Returns a [`StorageError`] if there is an underlying error with the store.
pub fn retrieve_chunk<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    array_path: &NodePath,
    chunk_grid_indices: &[u64],
    separator: ChunkKeySeparator,
) -> Result<MaybeBytes, StorageError> {
    storage.get(&data_key(array_path, chunk_grid_indices, separator))
}
