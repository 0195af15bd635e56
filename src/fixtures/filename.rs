use std::path::{Path, PathBuf};

use super::{FixtureType, NETCDF_EXTENSION, ZARR_EXTENSION};

/// The file name used when none is requested, derived from the crate version.
#[must_use]
pub fn default_filename() -> String {
    format!("fixtures-v{}", crate::version::version_str())
}

/// Derive the base path of a fixture from a `requested` file name.
///
/// 1. An existing directory (or a path without a file name) is replaced by [`default_filename`] inside it.
/// 2. The file name is prefixed with `<fixture_type>-`, unless it already has that prefix.
/// 3. Trailing `.zarr` and `.nc` extensions are stripped until none remain.
///
/// The result carries no extension, and deriving from a derived path returns it unchanged.
#[must_use]
pub fn derive_base_path(requested: &Path, fixture_type: FixtureType) -> PathBuf {
    let requested = if requested.is_dir() || requested.file_name().is_none() {
        requested.join(default_filename())
    } else {
        requested.to_path_buf()
    };

    let Some(name) = requested.file_name() else {
        return requested;
    };
    let prefix = format!("{fixture_type}-");
    let name = name.to_string_lossy();
    let mut name = if name.starts_with(&prefix) {
        name.into_owned()
    } else {
        format!("{prefix}{name}")
    };
    while let Some(stripped) = name
        .strip_suffix(ZARR_EXTENSION)
        .or_else(|| name.strip_suffix(NETCDF_EXTENSION))
    {
        name = stripped.to_string();
    }
    requested.with_file_name(name)
}
