//! Zarr stores.
//!
//! [`FilesystemStore`] writes fixtures to disk; [`MemoryStore`] backs the unit tests.

mod filesystem_store;
mod memory_store;

pub use filesystem_store::{FilesystemStore, FilesystemStoreCreateError};
pub use memory_store::MemoryStore;
