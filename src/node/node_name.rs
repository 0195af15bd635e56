use derive_more::Display;
use thiserror::Error;

/// A Zarr hierarchy node name.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub struct NodeName(String);

/// An invalid node name.
#[derive(Debug, Error)]
#[error("invalid node name {0}")]
pub struct NodeNameError(String);

impl NodeName {
    /// Create a new Zarr node name from `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeNameError`] if `name` is not valid according to [`NodeName::validate`()].
    pub fn new(name: &str) -> Result<Self, NodeNameError> {
        if Self::validate(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(NodeNameError(name.to_string()))
        }
    }

    /// The root node.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Extracts a string slice containing the node name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a node name.
    ///
    /// The root node has the empty name "". Any other name
    /// - must not include the character "/",
    /// - must not be a string composed only of period characters, e.g. "." or "..", and
    /// - must not start with the reserved prefix "__", and
    /// - must not be a Zarr V2 metadata key, e.g. ".zarray".
    #[must_use]
    pub fn validate(node_name: &str) -> bool {
        node_name.is_empty()
            || (!node_name.contains('/')
                && !node_name.starts_with("__")
                && !node_name.replace('.', "").is_empty()
                && !matches!(node_name, ".zarray" | ".zgroup" | ".zattrs" | ".zmetadata"))
    }

    /// Indicates if a node has the root node name ("").
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}
