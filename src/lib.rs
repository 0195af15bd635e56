//! `zarrs_fixtures` generates Zarr V2 compatibility fixtures and assembles `configure` commands for library builds.
//!
//! ## Fixtures
//! The [`fixtures`] module writes sample hierarchies that other Zarr implementations can be tested against:
//!  - a native hierarchy of zero-dimensional scalars and small chunked arrays of every numeric, string, and byte string data type, and
//!  - a comparison dataset written both as a classic netCDF file and as an `xarray` style Zarr hierarchy.
//!
//! The hierarchies are written with a small synchronous Zarr V2 implementation:
//!  - [`storage`]: stores ([`FilesystemStore`](storage::store::FilesystemStore), [`MemoryStore`](storage::store::MemoryStore)) and the storage traits,
//!  - [`metadata`]: `.zarray`, `.zgroup`, `.zattrs`, and consolidated `.zmetadata` documents,
//!  - [`group`] and [`array`]: Zarr groups and arrays,
//!  - [`node`]: node paths and hierarchy traversal.
//!
//! Classic netCDF files are written by [`netcdf`], and [`dataset`] holds labelled datasets that can be written in both formats.
//!
//! ## Configure
//! The [`configure`] module assembles the command line of a library `configure` script from a build target, link mode, and a few switches.
//! Environment specific paths are externalised into [`ConfigurePaths`](configure::ConfigurePaths).
//!
//! ## Binaries
//!  - `zarr_fixture create <zarr|xarray> [filename] [--consolidate]`
//!  - `configure_wrapper [--m32|--m64] [--static|--shared] [--full] [-d] [-e] [--config <file>]`
//!
//! Both binaries log with [`tracing`], filtered by the `RUST_LOG` environment variable.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]

pub mod array;
pub mod configure;
pub mod dataset;
pub mod fixtures;
pub mod group;
pub mod metadata;
pub mod netcdf;
pub mod node;
pub mod storage;
pub mod version;
