use std::num::NonZeroU64;

use derive_more::Deref;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The shape of a chunk. All dimensions must be non-zero.
///
/// A zero-dimensional array has an empty chunk shape holding a single element.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug, Deref)]
#[serde(transparent)]
pub struct ChunkShape(Vec<NonZeroU64>);

/// A chunk shape with a zero dimension.
#[derive(Debug, Error)]
#[error("chunk shape {0:?} has a zero dimension")]
pub struct ZeroChunkDimensionError(Vec<u64>);

impl ChunkShape {
    /// The chunk shape of a zero-dimensional array.
    #[must_use]
    pub const fn scalar() -> Self {
        Self(Vec::new())
    }

    /// Return the number of elements.
    ///
    /// Equal to the product of the components of its shape.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.0.iter().copied().map(NonZeroU64::get).product::<u64>()
    }

    /// Return the chunk shape as a [`Vec<u64>`].
    #[must_use]
    pub fn to_array_shape(&self) -> Vec<u64> {
        self.0.iter().copied().map(NonZeroU64::get).collect()
    }
}

impl TryFrom<Vec<u64>> for ChunkShape {
    type Error = ZeroChunkDimensionError;

    fn try_from(value: Vec<u64>) -> Result<Self, Self::Error> {
        value
            .iter()
            .map(|&size| NonZeroU64::new(size))
            .collect::<Option<Vec<_>>>()
            .map(Self)
            .ok_or(ZeroChunkDimensionError(value))
    }
}

impl TryFrom<&[u64]> for ChunkShape {
    type Error = ZeroChunkDimensionError;

    fn try_from(value: &[u64]) -> Result<Self, Self::Error> {
        value.to_vec().try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_shape() {
        let chunk_shape: ChunkShape = vec![2, 2].try_into().unwrap();
        assert_eq!(chunk_shape.num_elements(), 4);
        assert_eq!(chunk_shape.to_array_shape(), vec![2, 2]);
        assert_eq!(serde_json::to_string(&chunk_shape).unwrap(), "[2,2]");

        let scalar = ChunkShape::try_from(Vec::<u64>::new()).unwrap();
        assert_eq!(scalar, ChunkShape::scalar());
        assert_eq!(scalar.num_elements(), 1);
        assert!(scalar.is_empty());

        assert_eq!(
            ChunkShape::try_from(vec![2, 0]).unwrap_err().to_string(),
            "chunk shape [2, 0] has a zero dimension"
        );
    }
}
