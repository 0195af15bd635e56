//! The regular chunk grid of a Zarr V2 array.
//!
//! A V2 array is divided into chunks of a fixed shape.
//! Chunks at the upper edge of each dimension may extend past the array shape, the out-of-bounds elements hold the fill value.

use itertools::{Either, Itertools};

use crate::metadata::ChunkShape;

use super::{ArrayIndices, ArrayShape};

/// Return the number of chunks along each dimension of an array with `array_shape` and `chunk_shape`.
///
/// Returns [`None`] if the dimensionality of `array_shape` and `chunk_shape` differ.
#[must_use]
pub fn chunk_grid_shape(array_shape: &[u64], chunk_shape: &ChunkShape) -> Option<ArrayShape> {
    (array_shape.len() == chunk_shape.len()).then(|| {
        std::iter::zip(array_shape, chunk_shape.iter())
            .map(|(&size, chunk_size)| size.div_ceil(chunk_size.get()))
            .collect()
    })
}

/// Return the array indices of the first element of the chunk at `chunk_indices`.
#[must_use]
pub fn chunk_origin(chunk_indices: &[u64], chunk_shape: &ChunkShape) -> ArrayIndices {
    std::iter::zip(chunk_indices, chunk_shape.iter())
        .map(|(&index, chunk_size)| index * chunk_size.get())
        .collect()
}

/// Iterate over all indices within `shape` in C order (the last dimension varies fastest).
///
/// A zero-dimensional shape has a single empty index.
pub fn indices_iter(shape: &[u64]) -> impl Iterator<Item = ArrayIndices> + '_ {
    if shape.is_empty() {
        Either::Left(std::iter::once(ArrayIndices::new()))
    } else {
        Either::Right(shape.iter().map(|&size| 0..size).multi_cartesian_product())
    }
}

/// Return the linear C order index of `indices` within `shape`.
#[must_use]
pub fn ravel_indices(indices: &[u64], shape: &[u64]) -> u64 {
    std::iter::zip(indices, shape).fold(0, |linear, (&index, &size)| linear * size + index)
}
