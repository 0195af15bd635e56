use std::sync::Arc;

use crate::metadata::{v2::GroupMetadataV2, Attributes};

use super::{Group, GroupCreateError};

/// A [`Group`] builder.
#[derive(Debug)]
pub struct GroupBuilder {
    metadata: GroupMetadataV2,
}

impl Default for GroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupBuilder {
    /// Create a new group builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: GroupMetadataV2::default(),
        }
    }

    /// Set the attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.metadata.attributes = attributes;
        self
    }

    /// Build into a [`Group`].
    ///
    /// # Errors
    ///
    /// Returns [`GroupCreateError`] if the group could not be created.
    pub fn build<TStorage: ?Sized>(
        self,
        storage: Arc<TStorage>,
        path: &str,
    ) -> Result<Group<TStorage>, GroupCreateError> {
        Group::new_with_metadata(storage, path, self.metadata)
    }
}
