use std::sync::Arc;

use crate::metadata::{
    v2::{ArrayMetadataV2, FillValueMetadataV2},
    Attributes, ChunkShape,
};

use super::{Array, ArrayCreateError, ArrayShape, DataType};

/// An [`Array`] builder.
///
/// The array builder is initialised from an array shape, data type, chunk shape, and fill value.
/// The fill value is part of the array metadata from the start, so the first `.zarray` written already carries it.
///  - Chunks are uncompressed with no filters, in C order.
///  - Chunk keys use the `.` separator.
///  - Attributes are empty.
///
/// Use the methods in the array builder to change the configuration away from these defaults, and then build the array at a path of some storage with [`ArrayBuilder::build`].
/// Note that [`build`](ArrayBuilder::build) does not modify the store; the array metadata has to be explicitly written with [`Array::store_metadata`].
///
/// For example:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # use std::sync::Arc;
/// use zarrs_fixtures::array::{ArrayBuilder, DataType};
/// use zarrs_fixtures::metadata::v2::FillValueMetadataV2;
/// # let store = Arc::new(zarrs_fixtures::storage::store::MemoryStore::new());
/// let array = ArrayBuilder::new(
///     vec![], // a zero-dimensional array
///     DataType::Float64,
///     Vec::<u64>::new().try_into()?,
///     FillValueMetadataV2::from_f64(3.14159),
/// )
/// .build(store.clone(), "/scalars/pi")?;
/// array.store_metadata()?; // write metadata to the store
/// array.store_array_elements(&[1.0f64])?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ArrayBuilder {
    /// Array shape.
    pub shape: ArrayShape,
    /// Data type.
    pub data_type: DataType,
    /// Chunk shape.
    pub chunk_shape: ChunkShape,
    /// Fill value.
    pub fill_value: FillValueMetadataV2,
    /// Attributes.
    pub attributes: Attributes,
}

impl ArrayBuilder {
    /// Create a new array builder.
    #[must_use]
    pub fn new(
        shape: ArrayShape,
        data_type: DataType,
        chunk_shape: ChunkShape,
        fill_value: FillValueMetadataV2,
    ) -> Self {
        Self {
            shape,
            data_type,
            chunk_shape,
            fill_value,
            attributes: Attributes::default(),
        }
    }

    /// Set the shape.
    pub fn shape(&mut self, shape: ArrayShape) -> &mut Self {
        self.shape = shape;
        self
    }

    /// Set the fill value.
    pub fn fill_value(&mut self, fill_value: FillValueMetadataV2) -> &mut Self {
        self.fill_value = fill_value;
        self
    }

    /// Set the user defined attributes.
    ///
    /// If left unmodified, the user defined attributes of the array will be empty.
    pub fn attributes(&mut self, attributes: Attributes) -> &mut Self {
        self.attributes = attributes;
        self
    }

    /// Return the array metadata described by the builder.
    #[must_use]
    pub fn build_metadata(&self) -> ArrayMetadataV2 {
        ArrayMetadataV2::new(
            self.shape.clone(),
            self.chunk_shape.clone(),
            self.data_type.metadata(),
            self.fill_value.clone(),
        )
        .with_attributes(self.attributes.clone())
    }

    /// Build into an [`Array`].
    ///
    /// # Errors
    ///
    /// Returns [`ArrayCreateError`] if there is an error creating the array.
    /// This can be due to a storage error, an invalid path, or a problem with array configuration.
    pub fn build<TStorage: ?Sized>(
        &self,
        storage: Arc<TStorage>,
        path: &str,
    ) -> Result<Array<TStorage>, ArrayCreateError> {
        Array::new_with_metadata(storage, path, self.build_metadata())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::store::MemoryStore;

    use super::*;

    #[test]
    fn array_builder() {
        let mut attributes = Attributes::new();
        attributes.insert("description".to_string(), "ints".into());

        let mut builder = ArrayBuilder::new(
            vec![2, 3],
            DataType::Int32,
            vec![2, 2].try_into().unwrap(),
            FillValueMetadataV2::Null,
        );
        builder.attributes(attributes);
        builder.fill_value(FillValueMetadataV2::from_i64(-1));

        let storage = Arc::new(MemoryStore::new());
        let array = builder.build(storage, "/arrays/ints/int32").unwrap();
        assert_eq!(array.shape(), &[2, 3]);
        assert_eq!(array.data_type(), &DataType::Int32);
        assert_eq!(array.fill_value(), &FillValueMetadataV2::from_i64(-1));
        assert_eq!(array.chunk_grid_shape(), vec![1, 2]);
        assert_eq!(array.attributes()["description"], "ints");
        assert_eq!(array.metadata().dtype.as_str(), "<i4");

        builder.shape(vec![2]);
        assert!(builder.build(Arc::new(MemoryStore::new()), "/a").is_err());
    }
}
