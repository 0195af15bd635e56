//! Zarr V2 arrays.
//!
//! An array is a node in a Zarr hierarchy used to hold multidimensional array data and associated metadata.
//! See <https://zarr-specs.readthedocs.io/en/latest/v2/v2.0.html#arrays>.
//!
//! Use [`ArrayBuilder`] to setup a new array, or use [`Array::open`] for an existing array.
//! Chunks are stored uncompressed in C order with little-endian elements.

mod array_builder;
mod array_errors;
mod array_sync;
pub mod chunk_grid;
pub mod data_type;
mod element;

use std::sync::Arc;

pub use self::{
    array_builder::ArrayBuilder,
    array_errors::{ArrayCreateError, ArrayError},
    data_type::DataType,
    element::{Element, ElementOwned},
};

use crate::{
    metadata::{
        v2::{ArrayMetadataV2, ArrayMetadataV2Order, FillValueMetadataV2},
        Attributes, ChunkShape,
    },
    node::NodePath,
};

pub use crate::metadata::ArrayShape;

/// An ND index to an element in an array.
pub type ArrayIndices = Vec<u64>;

/// A Zarr V2 array.
///
/// ### Initialisation
///
/// A *new* array can be initialised with an [`ArrayBuilder`] or [`Array::new_with_metadata`].
/// Array metadata must be written explicitly to the store with [`store_metadata`](Array::store_metadata).
///
/// An *existing* array can be initialised with [`Array::open`], its metadata is read from the store.
///
/// ### Methods
/// Array operations are divided into several categories based on the traits implemented for the backing [storage](crate::storage):
///  - [`ReadableStorageTraits`](crate::storage::ReadableStorageTraits): read array data and metadata
///    - [`retrieve_chunk`](Array::retrieve_chunk)
///    - [`retrieve_array_bytes`](Array::retrieve_array_bytes) / [`retrieve_array_elements`](Array::retrieve_array_elements)
///  - [`WritableStorageTraits`](crate::storage::WritableStorageTraits): write array data and metadata
///    - [`store_metadata`](Array::store_metadata)
///    - [`store_chunk`](Array::store_chunk)
///    - [`store_array_bytes`](Array::store_array_bytes) / [`store_array_elements`](Array::store_array_elements)
///
/// Chunks that have not been written read as the fill value.
#[derive(Debug)]
pub struct Array<TStorage: ?Sized> {
    /// The storage (including storage transformers).
    storage: Arc<TStorage>,
    /// The path of the array in a store.
    path: NodePath,
    /// The data type of the Zarr array.
    data_type: DataType,
    /// The bytes of a single fill value element.
    fill_value: Vec<u8>,
    /// The array metadata.
    metadata: ArrayMetadataV2,
}

impl<TStorage: ?Sized> Array<TStorage> {
    /// Create an array in `storage` at `path` with `metadata`.
    /// This does **not** write to the store, use [`store_metadata`](Array<WritableStorageTraits>::store_metadata) to write `metadata` to `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayCreateError`] if:
    ///  - the data type or fill value are unsupported or incompatible,
    ///  - the chunk shape dimensionality does not match the array shape,
    ///  - the array has a compressor or filters, or is in F order, or
    ///  - `path` is invalid.
    pub fn new_with_metadata(
        storage: Arc<TStorage>,
        path: &str,
        metadata: ArrayMetadataV2,
    ) -> Result<Self, ArrayCreateError> {
        let path = NodePath::new(path)?;
        validate_raw_layout(&metadata)?;
        let data_type = DataType::from_metadata(&metadata.dtype)?;
        let fill_value = data_type.fill_value_bytes(&metadata.fill_value)?;
        if metadata.chunks.len() != metadata.shape.len() {
            return Err(ArrayCreateError::InvalidChunkGridDimensionality(
                metadata.chunks.len(),
                metadata.shape.len(),
            ));
        }
        Ok(Self {
            storage,
            path,
            data_type,
            fill_value,
            metadata,
        })
    }

    /// Get the node path.
    #[must_use]
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Get the data type.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Get the fill value metadata.
    #[must_use]
    pub const fn fill_value(&self) -> &FillValueMetadataV2 {
        &self.metadata.fill_value
    }

    /// Get the array shape.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.metadata.shape
    }

    /// Get the array dimensionality.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.metadata.shape.len()
    }

    /// Get the chunk shape.
    #[must_use]
    pub const fn chunk_shape(&self) -> &ChunkShape {
        &self.metadata.chunks
    }

    /// Get the number of chunks along each dimension.
    #[must_use]
    pub fn chunk_grid_shape(&self) -> ArrayShape {
        chunk_grid::chunk_grid_shape(&self.metadata.shape, &self.metadata.chunks)
            .unwrap_or_default()
    }

    /// Get the attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.metadata.attributes
    }

    /// Return the array metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ArrayMetadataV2 {
        &self.metadata
    }

    /// Return the size in bytes of a decoded chunk.
    fn chunk_size_bytes(&self) -> usize {
        usize::try_from(self.metadata.chunks.num_elements()).unwrap_or(usize::MAX)
            * self.data_type.size()
    }

    /// Return the size in bytes of the whole array.
    fn array_size_bytes(&self) -> u64 {
        self.metadata.shape.iter().product::<u64>() * self.data_type.size() as u64
    }

    fn validate_chunk_indices(&self, chunk_indices: &[u64]) -> Result<(), ArrayError> {
        let chunk_grid_shape = self.chunk_grid_shape();
        if chunk_indices.len() == chunk_grid_shape.len()
            && std::iter::zip(chunk_indices, &chunk_grid_shape).all(|(index, size)| index < size)
        {
            Ok(())
        } else {
            Err(ArrayError::InvalidChunkGridIndicesError(
                chunk_indices.to_vec(),
                chunk_grid_shape,
            ))
        }
    }
}

/// Chunks are read and written as raw C order bytes.
fn validate_raw_layout(metadata: &ArrayMetadataV2) -> Result<(), ArrayCreateError> {
    if let Some(compressor) = &metadata.compressor {
        return Err(ArrayCreateError::UnsupportedZarrV2Array(format!(
            "compressor {}",
            serde_json::Value::Object(compressor.clone())
        )));
    }
    if metadata.filters.as_ref().is_some_and(|filters| !filters.is_empty()) {
        return Err(ArrayCreateError::UnsupportedZarrV2Array(
            "filters".to_string(),
        ));
    }
    if metadata.order == ArrayMetadataV2Order::F && metadata.shape.len() > 1 {
        return Err(ArrayCreateError::UnsupportedZarrV2Array(
            "F order".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::storage::store::MemoryStore;

    use super::*;

    #[test]
    fn array_invalid_chunk_dimensionality() {
        let store = Arc::new(MemoryStore::new());
        let metadata = ArrayMetadataV2::new(
            vec![2, 3],
            vec![2].try_into().unwrap(),
            DataType::Int8.metadata(),
            FillValueMetadataV2::Null,
        );
        assert!(matches!(
            Array::new_with_metadata(store, "/a", metadata),
            Err(ArrayCreateError::InvalidChunkGridDimensionality(1, 2))
        ));
    }

    #[test]
    fn array_incompatible_fill_value() {
        let store = Arc::new(MemoryStore::new());
        let metadata = ArrayMetadataV2::new(
            vec![],
            ChunkShape::try_from(Vec::<u64>::new()).unwrap(),
            DataType::UInt8.metadata(),
            FillValueMetadataV2::from_i64(-1),
        );
        assert!(matches!(
            Array::new_with_metadata(store, "/a", metadata),
            Err(ArrayCreateError::InvalidFillValue(_))
        ));
    }

    fn unsupported(metadata: ArrayMetadataV2) -> Option<String> {
        let store = Arc::new(MemoryStore::new());
        match Array::new_with_metadata(store, "/a", metadata) {
            Err(ArrayCreateError::UnsupportedZarrV2Array(reason)) => Some(reason),
            _ => None,
        }
    }

    fn uint8_2x2() -> ArrayMetadataV2 {
        ArrayMetadataV2::new(
            vec![2, 2],
            vec![2, 2].try_into().unwrap(),
            DataType::UInt8.metadata(),
            FillValueMetadataV2::from_u64(0),
        )
    }

    #[test]
    fn array_compressor_unsupported() {
        let mut metadata = uint8_2x2();
        let serde_json::Value::Object(zlib) = serde_json::json!({"id": "zlib", "level": 1}) else {
            unreachable!()
        };
        metadata.compressor = Some(zlib);
        assert_eq!(
            unsupported(metadata).as_deref(),
            Some(r#"compressor {"id":"zlib","level":1}"#)
        );
    }

    #[test]
    fn array_filters_unsupported() {
        let mut metadata = uint8_2x2();
        let serde_json::Value::Object(delta) = serde_json::json!({"id": "delta", "dtype": "|u1"})
        else {
            unreachable!()
        };
        metadata.filters = Some(vec![delta]);
        assert_eq!(unsupported(metadata).as_deref(), Some("filters"));

        let mut metadata = uint8_2x2();
        metadata.filters = Some(vec![]);
        assert_eq!(unsupported(metadata), None);
    }

    #[test]
    fn array_f_order_unsupported() {
        let mut metadata = uint8_2x2();
        metadata.order = ArrayMetadataV2Order::F;
        assert_eq!(unsupported(metadata).as_deref(), Some("F order"));

        let mut metadata = ArrayMetadataV2::new(
            vec![4],
            vec![2].try_into().unwrap(),
            DataType::UInt8.metadata(),
            FillValueMetadataV2::from_u64(0),
        );
        metadata.order = ArrayMetadataV2Order::F;
        assert_eq!(unsupported(metadata), None);
    }
}
