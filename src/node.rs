//! Zarr nodes.
//!
//! A node in a Zarr hierarchy represents either an [`Array`](crate::array::Array) or a [`Group`](crate::group::Group).
//!
//! A [`Node`] has an associated [`NodePath`], [`NodeMetadata`], and children.
//!
//! The [`Node::hierarchy_tree`] function can be used to create a string representation of the hierarchy below a node.

mod node_name;
mod node_path;

pub use node_name::{NodeName, NodeNameError};
pub use node_path::{NodePath, NodePathError};
use thiserror::Error;

use crate::{
    metadata::v2::{ArrayMetadataV2, GroupMetadataV2},
    storage::{
        meta_key_v2_array, meta_key_v2_attributes, meta_key_v2_group, ListableStorageTraits,
        ReadableStorageTraits, StorageError, StoreKey, StorePrefix,
    },
};

/// Node metadata ([`ArrayMetadataV2`] or [`GroupMetadataV2`]), with attributes merged in from `.zattrs`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NodeMetadata {
    /// Array metadata.
    Array(ArrayMetadataV2),
    /// Group metadata.
    Group(GroupMetadataV2),
}

impl NodeMetadata {
    /// The user attributes of the node.
    #[must_use]
    pub fn attributes(&self) -> &serde_json::Map<String, serde_json::Value> {
        match self {
            Self::Array(array) => &array.attributes,
            Self::Group(group) => &group.attributes,
        }
    }
}

/// A Zarr hierarchy node.
#[derive(Debug)]
pub struct Node {
    /// Node path.
    path: NodePath,
    /// Node metadata.
    metadata: NodeMetadata,
    /// Node children, sorted by name.
    ///
    /// Only group nodes can have children.
    children: Vec<Node>,
}

/// A node creation error.
#[derive(Debug, Error)]
pub enum NodeCreateError {
    /// An invalid node path
    #[error(transparent)]
    NodePathError(#[from] NodePathError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// Neither `.zarray` nor `.zgroup` exists at the node path.
    #[error("no array or group metadata at {0}")]
    MissingMetadata(NodePath),
}

fn get_json<TStorage: ?Sized + ReadableStorageTraits, T: serde::de::DeserializeOwned>(
    storage: &TStorage,
    key: &StoreKey,
) -> Result<Option<T>, StorageError> {
    storage
        .get(key)?
        .map(|bytes| {
            serde_json::from_slice(&bytes)
                .map_err(|err| StorageError::InvalidMetadata(key.clone(), err.to_string()))
        })
        .transpose()
}

/// Read the metadata of the node at `path`.
///
/// Returns [`None`] if there is no `.zarray` or `.zgroup` at `path`.
///
/// # Errors
/// Returns a [`StorageError`] if there is an underlying store error or the metadata is invalid.
pub fn read_node_metadata<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    path: &NodePath,
) -> Result<Option<NodeMetadata>, StorageError> {
    let attributes: serde_json::Map<String, serde_json::Value> =
        get_json(storage, &meta_key_v2_attributes(path))?.unwrap_or_default();
    if let Some(array) = get_json::<_, ArrayMetadataV2>(storage, &meta_key_v2_array(path))? {
        Ok(Some(NodeMetadata::Array(array.with_attributes(attributes))))
    } else if let Some(group) = get_json::<_, GroupMetadataV2>(storage, &meta_key_v2_group(path))?
    {
        Ok(Some(NodeMetadata::Group(group.with_attributes(attributes))))
    } else {
        Ok(None)
    }
}

impl Node {
    /// Open the node at `path` and read its metadata and children from `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeCreateError`] if metadata is missing or invalid or there is a failure to list child nodes.
    pub fn open<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &TStorage,
        path: &str,
    ) -> Result<Self, NodeCreateError> {
        let path: NodePath = path.try_into()?;
        let metadata = read_node_metadata(storage, &path)?
            .ok_or_else(|| NodeCreateError::MissingMetadata(path.clone()))?;
        let children = match metadata {
            NodeMetadata::Array(_) => Vec::default(),
            NodeMetadata::Group(_) => {
                let mut children = Vec::new();
                let list_dir = storage.list_dir(&StorePrefix::from(&path))?;
                for prefix in list_dir.prefixes() {
                    let child_path = NodePath::try_from(prefix)?;
                    match Self::open(storage, child_path.as_str()) {
                        Ok(child) => children.push(child),
                        // directories without metadata are not nodes
                        Err(NodeCreateError::MissingMetadata(_)) => {}
                        Err(err) => return Err(err),
                    }
                }
                children.sort_by(|a, b| a.path.cmp(&b.path));
                children
            }
        };
        Ok(Self {
            path,
            metadata,
            children,
        })
    }

    /// Returns the path of the node.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Returns the metadata of the node.
    #[must_use]
    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// Returns the children of the node.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Indicates if a node is the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    /// Return a tree representation of a hierarchy as a string.
    ///
    /// Arrays are annotated with their shape and data type.
    /// For example:
    /// ```text
    /// /
    ///   arrays
    ///     floats
    ///       float32 [2, 3] <f4
    /// ```
    #[must_use]
    pub fn hierarchy_tree(&self) -> String {
        fn print_metadata(name: &str, string: &mut String, metadata: &NodeMetadata) {
            match metadata {
                NodeMetadata::Array(array_metadata) => {
                    string.push_str(&format!(
                        "{} {:?} {}",
                        name, array_metadata.shape, array_metadata.dtype
                    ));
                }
                NodeMetadata::Group(_) => {
                    string.push_str(name);
                }
            };
            string.push('\n');
        }

        fn update_tree(string: &mut String, children: &[Node], depth: usize) {
            for child in children {
                string.push_str(&" ".repeat(depth * 2));
                print_metadata(child.path.name(), string, &child.metadata);
                update_tree(string, &child.children, depth + 1);
            }
        }

        let mut string = String::default();
        print_metadata(if self.is_root() { "/" } else { self.path.name() }, &mut string, &self.metadata);
        update_tree(&mut string, &self.children, 1);
        string
    }
}
