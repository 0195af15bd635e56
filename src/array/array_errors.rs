use thiserror::Error;

use crate::{
    node::{NodePath, NodePathError},
    storage::StorageError,
};

use super::{
    data_type::{IncompatibleFillValueError, UnsupportedDataTypeError},
    ArrayIndices, ArrayShape,
};

/// An array creation error.
#[derive(Debug, Error)]
pub enum ArrayCreateError {
    /// An invalid node path
    #[error(transparent)]
    NodePathError(#[from] NodePathError),
    /// Unsupported data type.
    #[error(transparent)]
    DataTypeCreateError(#[from] UnsupportedDataTypeError),
    /// Invalid fill value.
    #[error(transparent)]
    InvalidFillValue(#[from] IncompatibleFillValueError),
    /// The dimensionality of the chunk shape does not match the array shape.
    #[error("chunk shape dimensionality {0} does not match array dimensionality {1}")]
    InvalidChunkGridDimensionality(usize, usize),
    /// Storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// Missing metadata.
    #[error("array metadata is missing at {0}")]
    MissingMetadata(NodePath),
    /// The Zarr V2 array is unsupported.
    #[error("unsupported Zarr V2 array: {0}")]
    UnsupportedZarrV2Array(String),
}

/// Array errors.
#[derive(Debug, Error)]
pub enum ArrayError {
    /// A store error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// Invalid chunk grid indices.
    #[error("chunk grid indices {0:?} are not valid for a chunk grid with shape {1:?}")]
    InvalidChunkGridIndicesError(ArrayIndices, ArrayShape),
    /// An unexpected chunk decoded size.
    #[error("got chunk decoded size {0}, expected {1}")]
    UnexpectedChunkDecodedSize(usize, usize),
    /// An unexpected bytes input size.
    #[error("got bytes with size {0}, expected {1}")]
    InvalidBytesInputSize(usize, u64),
    /// Bytes that are not a whole number of elements.
    #[error("got {0} bytes, not a multiple of the element size {1}")]
    InvalidElementBytes(usize, usize),
    /// Incompatible element type.
    #[error("the element types does not match the data type")]
    IncompatibleElementType,
    /// An element that does not fit in a fixed-length data type.
    #[error("element {0:?} is longer than the fixed length {1}")]
    ElementTooLong(String, usize),
}
