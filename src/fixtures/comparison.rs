use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::info;

use crate::{
    dataset::{Dataset, Variable, VariableData},
    storage::store::FilesystemStore,
};

use super::{with_extension, FixtureError, NETCDF_EXTENSION, ZARR_EXTENSION};

/// The labelled dataset shared by both comparison outputs.
fn comparison_dataset() -> Result<Dataset, FixtureError> {
    let mut dataset = Dataset::new();
    dataset.add_variable("int8", Variable::scalar(VariableData::Int8(vec![i8::MAX])))?;
    Ok(dataset)
}

/// Create the comparison fixture at `<base>.nc` and `<base>.zarr`, replacing any existing content.
///
/// Both outputs hold the scalar variable `int8 = 127`.
/// The Zarr hierarchy follows the `xarray` conventions and always has consolidated metadata.
///
/// # Errors
/// Returns a [`FixtureError`] if either output cannot be written.
pub fn create_comparison(base: &Path) -> Result<(PathBuf, PathBuf), FixtureError> {
    let dataset = comparison_dataset()?;

    let netcdf_path = with_extension(base, NETCDF_EXTENSION);
    dataset.to_netcdf(&netcdf_path)?;

    let zarr_path = with_extension(base, ZARR_EXTENSION);
    let store = Arc::new(FilesystemStore::new(&zarr_path)?);
    dataset.to_zarr(store, true)?;

    info!(netcdf = %netcdf_path.display(), zarr = %zarr_path.display(), "created comparison fixture");
    Ok((netcdf_path, zarr_path))
}
