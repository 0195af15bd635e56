use std::collections::BTreeMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    node::NodePath,
    storage::{
        meta_key_v2_consolidated, ListableStorageTraits, ReadableStorageTraits, StorageError,
        StorePrefix, WritableStorageTraits, ARRAY_METADATA_V2_KEY, ATTRIBUTES_V2_KEY,
        GROUP_METADATA_V2_KEY,
    },
};

/// Zarr V2 consolidated metadata, the `.zmetadata` document at the root of a hierarchy.
///
/// An example `JSON` document:
/// ```json
/// {
///     "metadata": {
///         ".zgroup": {
///             "zarr_format": 2
///         },
///         "scalars/.zgroup": {
///             "zarr_format": 2
///         }
///     },
///     "zarr_consolidated_format": 1
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Display)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct ConsolidatedMetadataV2 {
    /// A mapping from metadata store key to the JSON document stored at that key.
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// The consolidated metadata format version. Must be `1`.
    pub zarr_consolidated_format: monostate::MustBe!(1u64),
}

impl Default for ConsolidatedMetadataV2 {
    fn default() -> Self {
        Self {
            metadata: BTreeMap::default(),
            zarr_consolidated_format: monostate::MustBe!(1u64),
        }
    }
}

/// Gather every `.zgroup`, `.zarray` and `.zattrs` document in `storage` and write them to `.zmetadata` at the root.
///
/// Returns the consolidated metadata that was written.
///
/// # Errors
/// Returns a [`StorageError`] if there is an underlying error with the store or a metadata document is not valid JSON.
pub fn consolidate_metadata<
    TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits + WritableStorageTraits,
>(
    storage: &TStorage,
) -> Result<ConsolidatedMetadataV2, StorageError> {
    let mut consolidated = ConsolidatedMetadataV2::default();
    for key in storage.list_prefix(&StorePrefix::root())? {
        if !matches!(
            key.file_name(),
            ARRAY_METADATA_V2_KEY | GROUP_METADATA_V2_KEY | ATTRIBUTES_V2_KEY
        ) {
            continue;
        }
        let Some(bytes) = storage.get(&key)? else {
            continue;
        };
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|err| StorageError::InvalidMetadata(key.clone(), err.to_string()))?;
        consolidated.metadata.insert(key.as_str().to_string(), value);
    }

    let key = meta_key_v2_consolidated(&NodePath::root());
    let json = serde_json::to_vec_pretty(&consolidated)
        .map_err(|err| StorageError::InvalidMetadata(key.clone(), err.to_string()))?;
    debug!(key = %key, entries = consolidated.metadata.len(), "consolidating metadata");
    storage.set(&key, json.into())?;
    Ok(consolidated)
}

#[cfg(test)]
mod tests {
    use crate::{
        metadata::v2::GroupMetadataV2,
        storage::{create_group, store::MemoryStore, StoreKey},
    };

    use super::*;

    #[test]
    fn consolidate_memory_store() {
        let store = MemoryStore::new();
        let mut attributes = crate::metadata::Attributes::new();
        attributes.insert("description".to_string(), "scalars".into());
        create_group(&store, &NodePath::root(), &GroupMetadataV2::new()).unwrap();
        create_group(
            &store,
            &NodePath::new("/scalars").unwrap(),
            &GroupMetadataV2::new().with_attributes(attributes),
        )
        .unwrap();
        store
            .set(&StoreKey::new("scalars/data").unwrap(), vec![0u8].into())
            .unwrap();

        let consolidated = consolidate_metadata(&store).unwrap();
        assert_eq!(
            consolidated.metadata.keys().collect::<Vec<_>>(),
            vec![".zgroup", "scalars/.zattrs", "scalars/.zgroup"]
        );
        assert_eq!(
            consolidated.metadata["scalars/.zattrs"]["description"],
            "scalars"
        );

        // consolidating again does not include the previous index
        let again = consolidate_metadata(&store).unwrap();
        assert_eq!(again, consolidated);

        let bytes = store
            .get(&StoreKey::new(".zmetadata").unwrap())
            .unwrap()
            .unwrap();
        let parsed: ConsolidatedMetadataV2 = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, consolidated);
    }
}
