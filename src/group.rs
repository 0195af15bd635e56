//! Zarr groups.
//!
//! A Zarr group is a node in a Zarr hierarchy.
//! It can have associated attributes and may have child nodes (groups or [`arrays`](crate::array)).
//! See <https://zarr-specs.readthedocs.io/en/latest/v2/v2.0.html#groups>.
//!
//! Use [`GroupBuilder`] to setup a new group, or use [`Group::open`] to read an existing group.
//!
//! A V2 group is marked by a `.zgroup` document, its attributes are stored in an accompanying `.zattrs` document. For example:
//! ```json
//! {
//!     "description": "scalars",
//!     "eggs": 42
//! }
//! ```

mod group_builder;

use std::sync::Arc;

use derive_more::Display;
use thiserror::Error;

use crate::{
    metadata::{v2::GroupMetadataV2, Attributes},
    node::{read_node_metadata, NodeMetadata, NodePath, NodePathError},
    storage::{ReadableStorageTraits, StorageError, WritableStorageTraits},
};

pub use self::group_builder::GroupBuilder;

/// A Zarr V2 group.
#[derive(Clone, Debug, Display)]
#[display(
    "path {path} attributes {}",
    serde_json::to_string(&metadata.attributes).unwrap_or_default()
)]
pub struct Group<TStorage: ?Sized> {
    /// The storage.
    storage: Arc<TStorage>,
    /// The path of the group in the store.
    path: NodePath,
    /// The metadata.
    metadata: GroupMetadataV2,
}

impl<TStorage: ?Sized> Group<TStorage> {
    /// Create a group in `storage` at `path` with `metadata`.
    /// This does **not** write to the store, use [`store_metadata`](Group<WritableStorageTraits>::store_metadata) to write `metadata` to `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`GroupCreateError`] if `path` is invalid.
    pub fn new_with_metadata(
        storage: Arc<TStorage>,
        path: &str,
        metadata: GroupMetadataV2,
    ) -> Result<Self, GroupCreateError> {
        let path = NodePath::new(path)?;
        Ok(Self {
            storage,
            path,
            metadata,
        })
    }

    /// Get path.
    #[must_use]
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Get attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.metadata.attributes
    }

    /// Get metadata.
    #[must_use]
    pub const fn metadata(&self) -> &GroupMetadataV2 {
        &self.metadata
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Group<TStorage> {
    /// Open an existing group in `storage` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GroupCreateError`] if there is a storage error, the metadata is invalid, or there is no group at `path`.
    pub fn open(storage: Arc<TStorage>, path: &str) -> Result<Self, GroupCreateError> {
        let node_path = NodePath::new(path)?;
        match read_node_metadata(&*storage, &node_path)? {
            Some(NodeMetadata::Group(metadata)) => Self::new_with_metadata(storage, path, metadata),
            _ => Err(GroupCreateError::MissingMetadata(node_path)),
        }
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> Group<TStorage> {
    /// Store metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if there is an underlying store error.
    pub fn store_metadata(&self) -> Result<(), StorageError> {
        tracing::debug!(path = %self.path, "storing group metadata");
        crate::storage::create_group(&*self.storage, self.path(), &self.metadata)
    }
}

/// A group creation error.
#[derive(Debug, Error)]
pub enum GroupCreateError {
    /// An invalid node path
    #[error(transparent)]
    NodePathError(#[from] NodePathError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// Missing metadata.
    #[error("group metadata is missing at {0}")]
    MissingMetadata(NodePath),
}

#[cfg(test)]
mod tests {
    use crate::storage::{store::MemoryStore, StoreKey};

    use super::*;

    #[test]
    fn group_store_and_open() {
        let store = Arc::new(MemoryStore::new());
        let mut attributes = Attributes::new();
        attributes.insert("spam".to_string(), "ham".into());
        attributes.insert("eggs".to_string(), 42.into());
        let group = GroupBuilder::new()
            .attributes(attributes.clone())
            .build(store.clone(), "/group")
            .unwrap();
        group.store_metadata().unwrap();

        let zgroup = store.get(&StoreKey::new("group/.zgroup").unwrap()).unwrap().unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&zgroup).unwrap(),
            serde_json::json!({"zarr_format": 2})
        );

        let group = Group::open(store, "/group").unwrap();
        assert_eq!(group.attributes(), &attributes);
        assert_eq!(group.path().as_str(), "/group");
        assert_eq!(
            group.to_string(),
            r#"path /group attributes {"spam":"ham","eggs":42}"#
        );
    }

    #[test]
    fn group_without_attributes_has_no_zattrs() {
        let store = Arc::new(MemoryStore::new());
        GroupBuilder::new()
            .build(store.clone(), "/")
            .unwrap()
            .store_metadata()
            .unwrap();
        assert!(store.get(&StoreKey::new(".zattrs").unwrap()).unwrap().is_none());
        assert!(Group::open(store.clone(), "/").unwrap().attributes().is_empty());
        assert!(matches!(
            Group::open(store, "/missing"),
            Err(GroupCreateError::MissingMetadata(_))
        ));
    }

    #[test]
    fn group_invalid_path() {
        let store = Arc::new(MemoryStore::new());
        assert!(matches!(
            GroupBuilder::new().build(store, "group"),
            Err(GroupCreateError::NodePathError(_))
        ));
    }
}
