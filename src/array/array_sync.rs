use std::sync::Arc;

use tracing::debug;

use crate::{
    node::{read_node_metadata, NodeMetadata, NodePath},
    storage::{ReadableStorageTraits, StorageError, WritableStorageTraits},
};

use super::{
    chunk_grid::{chunk_origin, indices_iter, ravel_indices},
    Array, ArrayCreateError, ArrayError, Element, ElementOwned,
};

impl<TStorage: ?Sized + ReadableStorageTraits> Array<TStorage> {
    /// Open an existing array in `storage` at `path`.
    /// The metadata is read from the `.zarray` and `.zattrs` documents of the array.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayCreateError`] if there is a storage error, the metadata is invalid, or there is no array at `path`.
    pub fn open(storage: Arc<TStorage>, path: &str) -> Result<Self, ArrayCreateError> {
        let node_path = NodePath::new(path)?;
        match read_node_metadata(&*storage, &node_path)? {
            Some(NodeMetadata::Array(metadata)) => Self::new_with_metadata(storage, path, metadata),
            _ => Err(ArrayCreateError::MissingMetadata(node_path)),
        }
    }

    /// Read the chunk at `chunk_indices` into its bytes.
    ///
    /// A chunk that has not been written is filled with the fill value.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if
    ///  - `chunk_indices` are invalid,
    ///  - the stored chunk has an unexpected size, or
    ///  - there is an underlying store error.
    pub fn retrieve_chunk(&self, chunk_indices: &[u64]) -> Result<Vec<u8>, ArrayError> {
        self.validate_chunk_indices(chunk_indices)?;
        let chunk_size = self.chunk_size_bytes();
        let chunk_encoded = crate::storage::retrieve_chunk(
            &*self.storage,
            self.path(),
            chunk_indices,
            self.metadata.dimension_separator,
        )?;
        if let Some(chunk_encoded) = chunk_encoded {
            if chunk_encoded.len() == chunk_size {
                Ok(chunk_encoded.to_vec())
            } else {
                Err(ArrayError::UnexpectedChunkDecodedSize(
                    chunk_encoded.len(),
                    chunk_size,
                ))
            }
        } else {
            let num_elements = chunk_size / self.data_type.size().max(1);
            Ok(self.fill_value.repeat(num_elements))
        }
    }

    /// Read the entire array into its bytes in C order.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a chunk cannot be retrieved.
    pub fn retrieve_array_bytes(&self) -> Result<Vec<u8>, ArrayError> {
        let element_size = self.data_type.size();
        let array_size = usize::try_from(self.array_size_bytes()).unwrap_or(usize::MAX);
        let mut array_bytes = vec![0u8; array_size];
        let chunk_shape = self.chunk_shape().to_array_shape();
        for chunk_indices in indices_iter(&self.chunk_grid_shape()) {
            let chunk_bytes = self.retrieve_chunk(&chunk_indices)?;
            self.for_each_chunk_element(&chunk_indices, &chunk_shape, |chunk_offset, array_offset| {
                array_bytes[array_offset..array_offset + element_size]
                    .copy_from_slice(&chunk_bytes[chunk_offset..chunk_offset + element_size]);
            });
        }
        Ok(array_bytes)
    }

    /// Read the entire array into a vector of its elements in C order.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the element type does not match the data type or a chunk cannot be retrieved.
    pub fn retrieve_array_elements<T: ElementOwned>(&self) -> Result<Vec<T>, ArrayError> {
        T::validate_data_type(self.data_type())?;
        let bytes = self.retrieve_array_bytes()?;
        T::from_array_bytes(self.data_type(), &bytes)
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> Array<TStorage> {
    /// Store metadata.
    ///
    /// # Errors
    /// Returns [`StorageError`] if there is an underlying store error.
    pub fn store_metadata(&self) -> Result<(), StorageError> {
        debug!(path = %self.path(), dtype = %self.metadata.dtype, "storing array metadata");
        crate::storage::create_array(&*self.storage, self.path(), &self.metadata)
    }

    /// Store `chunk_bytes` at `chunk_indices`.
    ///
    /// Chunks are always written, even if they only hold the fill value.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if
    ///  - `chunk_indices` are invalid,
    ///  - the length of `chunk_bytes` is not equal to the expected length (the product of the number of elements in the chunk and the data type size in bytes), or
    ///  - there is an underlying store error.
    pub fn store_chunk(&self, chunk_indices: &[u64], chunk_bytes: Vec<u8>) -> Result<(), ArrayError> {
        self.validate_chunk_indices(chunk_indices)?;
        let chunk_size = self.chunk_size_bytes();
        if chunk_bytes.len() != chunk_size {
            return Err(ArrayError::InvalidBytesInputSize(
                chunk_bytes.len(),
                chunk_size as u64,
            ));
        }
        crate::storage::store_chunk(
            &*self.storage,
            self.path(),
            chunk_indices,
            self.metadata.dimension_separator,
            chunk_bytes.into(),
        )
        .map_err(ArrayError::StorageError)
    }

    /// Store the entire array from its bytes in C order.
    ///
    /// The array is split into chunks. Elements of edge chunks beyond the array shape hold the fill value.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the length of `array_bytes` does not match the array size or there is an underlying store error.
    pub fn store_array_bytes(&self, array_bytes: &[u8]) -> Result<(), ArrayError> {
        let array_size = self.array_size_bytes();
        if array_bytes.len() as u64 != array_size {
            return Err(ArrayError::InvalidBytesInputSize(
                array_bytes.len(),
                array_size,
            ));
        }
        let element_size = self.data_type.size();
        let chunk_shape = self.chunk_shape().to_array_shape();
        let num_elements = self.chunk_size_bytes() / element_size.max(1);
        for chunk_indices in indices_iter(&self.chunk_grid_shape()) {
            let mut chunk_bytes = self.fill_value.repeat(num_elements);
            self.for_each_chunk_element(&chunk_indices, &chunk_shape, |chunk_offset, array_offset| {
                chunk_bytes[chunk_offset..chunk_offset + element_size]
                    .copy_from_slice(&array_bytes[array_offset..array_offset + element_size]);
            });
            self.store_chunk(&chunk_indices, chunk_bytes)?;
        }
        Ok(())
    }

    /// Store the entire array from a slice of its elements in C order.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the element type does not match the data type, the number of elements is incorrect, or there is an underlying store error.
    pub fn store_array_elements<T: Element>(&self, elements: &[T]) -> Result<(), ArrayError> {
        let bytes = T::into_array_bytes(self.data_type(), elements)?;
        self.store_array_bytes(&bytes)
    }
}

impl<TStorage: ?Sized> Array<TStorage> {
    /// Call `f(chunk_byte_offset, array_byte_offset)` for every in-bounds element of the chunk at `chunk_indices`.
    fn for_each_chunk_element(
        &self,
        chunk_indices: &[u64],
        chunk_shape: &[u64],
        mut f: impl FnMut(usize, usize),
    ) {
        let element_size = self.data_type.size();
        let array_shape = self.shape();
        let origin = chunk_origin(chunk_indices, self.chunk_shape());
        for chunk_element in indices_iter(chunk_shape) {
            let array_element: Vec<u64> = std::iter::zip(&origin, &chunk_element)
                .map(|(origin, index)| origin + index)
                .collect();
            if std::iter::zip(&array_element, array_shape).any(|(index, size)| index >= size) {
                continue;
            }
            #[allow(clippy::cast_possible_truncation)]
            let chunk_offset = ravel_indices(&chunk_element, chunk_shape) as usize * element_size;
            #[allow(clippy::cast_possible_truncation)]
            let array_offset = ravel_indices(&array_element, array_shape) as usize * element_size;
            f(chunk_offset, array_offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        array::{ArrayBuilder, DataType},
        metadata::v2::FillValueMetadataV2,
        storage::{store::MemoryStore, ReadableStorageTraits, StoreKey, WritableStorageTraits},
    };

    use super::*;

    #[test]
    fn array_edge_chunks_padded() {
        let store = Arc::new(MemoryStore::new());
        let array = ArrayBuilder::new(
            vec![2, 3],
            DataType::UInt8,
            vec![2, 2].try_into().unwrap(),
            FillValueMetadataV2::from_u64(9),
        )
        .build(store.clone(), "/ints")
        .unwrap();
        array.store_metadata().unwrap();
        array.store_array_elements::<u8>(&[1, 2, 3, 4, 5, 6]).unwrap();

        let chunk_0_0 = store.get(&StoreKey::new("ints/0.0").unwrap()).unwrap().unwrap();
        assert_eq!(chunk_0_0.as_ref(), &[1, 2, 4, 5]);
        let chunk_0_1 = store.get(&StoreKey::new("ints/0.1").unwrap()).unwrap().unwrap();
        assert_eq!(chunk_0_1.as_ref(), &[3, 9, 6, 9]);

        let array = Array::open(store, "/ints").unwrap();
        assert_eq!(
            array.retrieve_array_elements::<u8>().unwrap(),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn array_unwritten_chunks_read_fill_value() {
        let store = Arc::new(MemoryStore::new());
        let array = ArrayBuilder::new(
            vec![],
            DataType::Float64,
            Vec::<u64>::new().try_into().unwrap(),
            FillValueMetadataV2::from_f64(3.14159),
        )
        .build(store.clone(), "/fill_pi")
        .unwrap();
        array.store_metadata().unwrap();
        assert!(store.get(&StoreKey::new("fill_pi/0").unwrap()).unwrap().is_none());
        assert_eq!(
            array.retrieve_array_elements::<f64>().unwrap(),
            vec![3.14159]
        );

        array.store_array_elements(&[1.0f64]).unwrap();
        let chunk = store.get(&StoreKey::new("fill_pi/0").unwrap()).unwrap().unwrap();
        assert_eq!(chunk.as_ref(), &1.0f64.to_le_bytes());
    }

    #[test]
    fn array_invalid_inputs() {
        let store = Arc::new(MemoryStore::new());
        let array = ArrayBuilder::new(
            vec![2, 3],
            DataType::Int16,
            vec![2, 2].try_into().unwrap(),
            FillValueMetadataV2::Null,
        )
        .build(store, "/a")
        .unwrap();
        assert!(matches!(
            array.store_chunk(&[0, 2], vec![0; 8]),
            Err(ArrayError::InvalidChunkGridIndicesError(_, _))
        ));
        assert!(matches!(
            array.store_chunk(&[0, 1], vec![0; 7]),
            Err(ArrayError::InvalidBytesInputSize(7, 8))
        ));
        assert!(matches!(
            array.store_array_elements::<i8>(&[0; 6]),
            Err(ArrayError::IncompatibleElementType)
        ));
        assert!(matches!(
            array.store_array_elements::<i16>(&[0; 5]),
            Err(ArrayError::InvalidBytesInputSize(10, 12))
        ));
    }

    #[test]
    fn array_open_missing() {
        let store = Arc::new(MemoryStore::new());
        assert!(matches!(
            Array::open(store, "/missing"),
            Err(ArrayCreateError::MissingMetadata(_))
        ));
    }

    #[test]
    fn array_slash_separated_chunk_keys() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                &StoreKey::new("a/.zarray").unwrap(),
                br#"{"chunks":[2,2],"compressor":null,"dimension_separator":"/","dtype":"|u1","fill_value":0,"filters":null,"order":"C","shape":[2,2],"zarr_format":2}"#
                    .as_slice()
                    .into(),
            )
            .unwrap();
        store
            .set(&StoreKey::new("a/0/0").unwrap(), vec![1u8, 2, 3, 4].into())
            .unwrap();
        let array = Array::open(store.clone(), "/a").unwrap();
        assert_eq!(
            array.retrieve_array_elements::<u8>().unwrap(),
            vec![1, 2, 3, 4]
        );

        array.store_array_elements::<u8>(&[5, 6, 7, 8]).unwrap();
        assert_eq!(
            store.get(&StoreKey::new("a/0/0").unwrap()).unwrap().unwrap().as_ref(),
            &[5, 6, 7, 8]
        );
        assert!(store.get(&StoreKey::new("a/0.0").unwrap()).unwrap().is_none());
    }

    #[test]
    fn array_open_compressed_unsupported() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                &StoreKey::new("a/.zarray").unwrap(),
                br#"{"chunks":[2],"compressor":{"id":"zlib","level":1},"dtype":"|u1","fill_value":0,"filters":null,"order":"C","shape":[2],"zarr_format":2}"#
                    .as_slice()
                    .into(),
            )
            .unwrap();
        assert!(matches!(
            Array::open(store, "/a"),
            Err(ArrayCreateError::UnsupportedZarrV2Array(_))
        ));
    }
}
