//! Zarr V2 metadata.
//!
//! Serialisation and deserialisation of the `.zarray`, `.zgroup`, `.zattrs`, and `.zmetadata` documents of a Zarr V2 hierarchy.
//!
//! See <https://zarr-specs.readthedocs.io/en/latest/v2/v2.0.html>.

mod chunk_shape;
pub mod v2;

pub use chunk_shape::{ChunkShape, ZeroChunkDimensionError};

/// An array shape.
pub type ArrayShape = Vec<u64>;

/// User attributes of a node.
pub type Attributes = serde_json::Map<String, serde_json::Value>;
