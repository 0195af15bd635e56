use derive_more::Display;
use thiserror::Error;

use crate::storage::StorePrefix;

use super::NodeName;

/// A Zarr hierarchy node path.
///
/// A path starts with `/`, e.g. `/` for the root group and `/arrays/ints/int8` for an array two groups below it.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct NodePath(String);

/// An invalid node path.
#[derive(Debug, Error)]
#[error("invalid node path {0}")]
pub struct NodePathError(String);

impl NodePath {
    /// Create a new Zarr node path from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NodePathError`] if `path` is not valid according to [`NodePath::validate`()].
    pub fn new(path: &str) -> Result<Self, NodePathError> {
        if Self::validate(path) {
            Ok(Self(path.to_string()))
        } else {
            Err(NodePathError(path.to_string()))
        }
    }

    /// The root node.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Extracts a string slice containing the node path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the root node path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The name of the node, the empty string for the root node.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// The path of the child called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NodePathError`] if `name` is not a valid [`NodeName`].
    pub fn child(&self, name: &str) -> Result<Self, NodePathError> {
        if name.is_empty() || !NodeName::validate(name) {
            return Err(NodePathError(format!("{}/{name}", self.0.trim_end_matches('/'))));
        }
        if self.is_root() {
            Ok(Self(format!("/{name}")))
        } else {
            Ok(Self(format!("{}/{name}", self.0)))
        }
    }

    /// Validates a path.
    ///
    /// A path always starts with `/`, and a non-root path cannot end with `/` or contain an empty node name (`//`).
    #[must_use]
    pub fn validate(path: &str) -> bool {
        path.eq("/") || (path.starts_with('/') && !path.ends_with('/') && !path.contains("//"))
    }
}

impl TryFrom<&str> for NodePath {
    type Error = NodePathError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl TryFrom<&StorePrefix> for NodePath {
    type Error = NodePathError;

    fn try_from(prefix: &StorePrefix) -> Result<Self, Self::Error> {
        let prefix = prefix.as_str();
        let path = "/".to_string() + prefix.strip_suffix('/').unwrap_or(prefix);
        Self::new(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_path() {
        assert!(NodePath::new("/").is_ok());
        assert!(NodePath::new("/a/b").is_ok());
        assert_eq!(NodePath::new("/a/b").unwrap().to_string(), "/a/b");
        assert!(NodePath::new("/a/b/").is_err());
        assert_eq!(
            NodePath::new("/a/b/").unwrap_err().to_string(),
            "invalid node path /a/b/"
        );
        assert!(NodePath::new("/a//b").is_err());
        assert!(NodePath::new("a").is_err());
    }

    #[test]
    fn node_path_child() {
        let arrays = NodePath::root().child("arrays").unwrap();
        assert_eq!(arrays.as_str(), "/arrays");
        let ints = arrays.child("ints").unwrap();
        assert_eq!(ints.as_str(), "/arrays/ints");
        assert_eq!(ints.name(), "ints");
        assert_eq!(NodePath::root().name(), "");
        assert!(ints.child("a/b").is_err());
        assert!(ints.child("..").is_err());
        assert!(ints.child("").is_err());
    }

    #[test]
    fn node_path_from_prefix() {
        let prefix = StorePrefix::new("arrays/misc/").unwrap();
        assert_eq!(NodePath::try_from(&prefix).unwrap().as_str(), "/arrays/misc");
        assert!(NodePath::try_from(&StorePrefix::root()).unwrap().is_root());
    }
}
