//! Sample Zarr V2 fixtures for compatibility testing.
//!
//! Two kinds of fixture can be generated:
//!  - [`FixtureType::Zarr`]: a richly structured hierarchy of scalars and typed arrays written directly with this crate ([`create_native`]).
//!  - [`FixtureType::Xarray`]: a small labelled dataset written both as a classic netCDF file and as an `xarray` style Zarr hierarchy ([`create_comparison`]).
//!
//! Output paths are derived from a requested file name with [`derive_base_path`], and [`generate`] ties the steps together.
//! Every fixture is created fresh: prior content at the output paths is replaced rather than merged.

mod comparison;
mod filename;
mod native;

use std::path::{Path, PathBuf};

use derive_more::Display;
use thiserror::Error;
use tracing::debug;

use crate::{
    array::{ArrayCreateError, ArrayError},
    dataset::DatasetError,
    group::GroupCreateError,
    metadata::ZeroChunkDimensionError,
    storage::{store::FilesystemStoreCreateError, StorageError},
};

pub use self::{
    comparison::create_comparison,
    filename::{default_filename, derive_base_path},
    native::create_native,
};

/// The extension of a Zarr hierarchy.
pub const ZARR_EXTENSION: &str = ".zarr";

/// The extension of a netCDF file.
pub const NETCDF_EXTENSION: &str = ".nc";

/// A fixture operation.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, clap::ValueEnum)]
pub enum Operation {
    /// Create a fixture.
    #[display("create")]
    Create,
}

/// A fixture type.
///
/// The rendered name prefixes the file name of every output.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum FixtureType {
    /// A hierarchy written natively with this crate.
    #[display("zarr")]
    Zarr,
    /// A netCDF file and Zarr hierarchy written from the same labelled dataset.
    #[display("xarray")]
    Xarray,
}

/// The paths of a generated fixture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixturePaths {
    /// The derived base path, without any extension.
    pub base: PathBuf,
    /// The written outputs.
    pub outputs: Vec<PathBuf>,
}

/// A fixture generation error.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The output store could not be created.
    #[error(transparent)]
    FilesystemStoreCreateError(#[from] FilesystemStoreCreateError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// A group could not be created.
    #[error(transparent)]
    GroupCreateError(#[from] GroupCreateError),
    /// An array could not be created.
    #[error(transparent)]
    ArrayCreateError(#[from] ArrayCreateError),
    /// An invalid chunk shape.
    #[error(transparent)]
    InvalidChunkShape(#[from] ZeroChunkDimensionError),
    /// An array could not be written.
    #[error(transparent)]
    ArrayError(#[from] ArrayError),
    /// A dataset could not be written.
    #[error(transparent)]
    DatasetError(#[from] DatasetError),
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

/// Append `extension` to `base`, keeping any dots already in the file name.
#[must_use]
pub fn with_extension(base: &Path, extension: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(extension);
    path.into()
}

/// Generate a fixture of `fixture_type`.
///
/// The base path is derived from `filename` (or [`default_filename`]) with [`derive_base_path`].
/// Metadata is always consolidated, `consolidate` is accepted for command line compatibility.
///
/// # Errors
/// Returns a [`FixtureError`] if any output cannot be written.
pub fn generate(
    operation: Operation,
    fixture_type: FixtureType,
    filename: Option<&Path>,
    consolidate: bool,
) -> Result<FixturePaths, FixtureError> {
    let requested = filename.map_or_else(|| PathBuf::from(default_filename()), Path::to_path_buf);
    let base = derive_base_path(&requested, fixture_type);
    if !consolidate {
        debug!("consolidating metadata regardless of --consolidate");
    }
    debug!(%operation, %fixture_type, base = %base.display(), "generating fixture");

    let outputs = match (operation, fixture_type) {
        (Operation::Create, FixtureType::Zarr) => vec![create_native(&base, true)?],
        (Operation::Create, FixtureType::Xarray) => {
            let (netcdf, zarr) = create_comparison(&base)?;
            vec![netcdf, zarr]
        }
    };
    Ok(FixturePaths { base, outputs })
}
