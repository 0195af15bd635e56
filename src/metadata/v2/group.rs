use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::metadata::Attributes;

/// Zarr V2 group metadata.
///
/// The `.zgroup` document only holds the format version, user attributes live in `.zattrs`.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug, Display)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct GroupMetadataV2 {
    /// An integer defining the version of the storage specification to which the group adheres. Must be `2`.
    pub zarr_format: monostate::MustBe!(2u64),
    /// User defined attributes, stored in a separate `.zattrs` document.
    #[serde(skip)]
    pub attributes: Attributes,
}

impl Default for GroupMetadataV2 {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupMetadataV2 {
    /// Create Zarr V2 group metadata.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zarr_format: monostate::MustBe!(2u64),
            attributes: Attributes::new(),
        }
    }

    /// Set the user attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}
