use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info};

use crate::{
    array::{ArrayBuilder, DataType},
    group::GroupBuilder,
    metadata::{
        v2::{consolidate_metadata, FillValueMetadataV2},
        Attributes, ChunkShape,
    },
    storage::{store::FilesystemStore, StorePrefix, WritableStorageTraits},
    version::{rustc_version_str, version_str},
};

use super::{with_extension, FixtureError, ZARR_EXTENSION};

const PI: f64 = 3.14159;

const HELLO_WORLD: &str = "hello world";

static INT_DATA_TYPES: [(&str, DataType); 8] = [
    ("int8", DataType::Int8),
    ("int16", DataType::Int16),
    ("int32", DataType::Int32),
    ("int64", DataType::Int64),
    ("uint8", DataType::UInt8),
    ("uint16", DataType::UInt16),
    ("uint32", DataType::UInt32),
    ("uint64", DataType::UInt64),
];

static FLOAT_DATA_TYPES: [(&str, DataType); 2] =
    [("float32", DataType::Float32), ("float64", DataType::Float64)];

fn description(description: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("description".to_string(), description.into());
    attributes
}

fn scalar(data_type: DataType, fill_value: FillValueMetadataV2) -> ArrayBuilder {
    ArrayBuilder::new(vec![], data_type, ChunkShape::scalar(), fill_value)
}

/// Create the native fixture hierarchy at `<base>.zarr`, replacing any existing content.
///
/// ```text
/// /                  description, rustc version, zarrs_fixtures version, 1
/// ├── scalars        pi, uint8, int, fill_pi
/// └── arrays
///     ├── ints       int8 .. uint64 (2x3, chunked 2x2)
///     ├── floats     float32, float64 (2x3, chunked 2x2)
///     └── misc       string, bytes
/// ```
///
/// Arrays without data write no chunks, so reading them returns their fill value.
///
/// # Errors
/// Returns a [`FixtureError`] if the store cannot be created or written.
pub fn create_native(base: &Path, consolidate: bool) -> Result<PathBuf, FixtureError> {
    let path = with_extension(base, ZARR_EXTENSION);
    let store = Arc::new(FilesystemStore::new(&path)?);
    store.erase_prefix(&StorePrefix::root())?;

    let mut attributes = description("compatibility fixtures written by zarrs_fixtures");
    attributes.insert("rustc version".to_string(), rustc_version_str().into());
    attributes.insert("zarrs_fixtures version".to_string(), version_str().into());
    attributes.insert(1.to_string(), 1.into());
    GroupBuilder::new()
        .attributes(attributes)
        .build(store.clone(), "/")?
        .store_metadata()?;

    // scalars
    GroupBuilder::new()
        .attributes(description("scalars"))
        .build(store.clone(), "/scalars")?
        .store_metadata()?;

    let pi = scalar(DataType::Float64, FillValueMetadataV2::from_f64(PI))
        .build(store.clone(), "/scalars/pi")?;
    pi.store_metadata()?;
    pi.store_array_elements(&[1.0f64])?;

    scalar(DataType::UInt8, FillValueMetadataV2::from_u64(0))
        .build(store.clone(), "/scalars/uint8")?
        .store_metadata()?;

    let int = scalar(DataType::Int64, FillValueMetadataV2::from_i64(0))
        .build(store.clone(), "/scalars/int")?;
    int.store_metadata()?;
    int.store_array_elements(&[3i64])?;

    scalar(DataType::Float64, FillValueMetadataV2::from_f64(PI))
        .build(store.clone(), "/scalars/fill_pi")?
        .store_metadata()?;

    // arrays
    GroupBuilder::new()
        .attributes(description("arrays"))
        .build(store.clone(), "/arrays")?
        .store_metadata()?;

    for (group, data_types) in [
        ("ints", INT_DATA_TYPES.as_slice()),
        ("floats", FLOAT_DATA_TYPES.as_slice()),
    ] {
        let group_path = format!("/arrays/{group}");
        GroupBuilder::new()
            .attributes(description(group))
            .build(store.clone(), &group_path)?
            .store_metadata()?;
        for (name, data_type) in data_types {
            ArrayBuilder::new(
                vec![2, 3],
                data_type.clone(),
                vec![2, 2].try_into()?,
                FillValueMetadataV2::Null,
            )
            .build(store.clone(), &format!("{group_path}/{name}"))?
            .store_metadata()?;
        }
    }

    GroupBuilder::new()
        .attributes(description("misc"))
        .build(store.clone(), "/arrays/misc")?
        .store_metadata()?;

    let string = scalar(
        DataType::FixedUnicode(HELLO_WORLD.chars().count()),
        FillValueMetadataV2::String(String::new()),
    )
    .build(store.clone(), "/arrays/misc/string")?;
    string.store_metadata()?;
    string.store_array_elements(&[HELLO_WORLD])?;

    let bytes = scalar(
        DataType::FixedBytes(HELLO_WORLD.len()),
        FillValueMetadataV2::String(String::new()),
    )
    .build(store.clone(), "/arrays/misc/bytes")?;
    bytes.store_metadata()?;
    bytes.store_array_elements(&[HELLO_WORLD.as_bytes()])?;

    if consolidate {
        consolidate_metadata(&*store)?;
    } else {
        debug!("skipping metadata consolidation");
    }
    info!(path = %path.display(), consolidate, "created native fixture");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use crate::{array::Array, group::Group, metadata::v2::ConsolidatedMetadataV2};

    use super::*;

    #[test]
    fn native_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_native(&dir.path().join("zarr-demo"), true).unwrap();
        assert_eq!(path, dir.path().join("zarr-demo.zarr"));

        let store = Arc::new(FilesystemStore::new(&path).unwrap());
        let root = Group::open(store.clone(), "/").unwrap();
        assert_eq!(root.attributes()["1"], 1);
        assert_eq!(root.attributes()["zarrs_fixtures version"], version_str());

        let pi = Array::open(store.clone(), "/scalars/pi").unwrap();
        assert_eq!(pi.fill_value(), &FillValueMetadataV2::from_f64(PI));
        assert_eq!(pi.retrieve_array_elements::<f64>().unwrap(), vec![1.0]);
        let fill_pi = Array::open(store.clone(), "/scalars/fill_pi").unwrap();
        assert_eq!(fill_pi.retrieve_array_elements::<f64>().unwrap(), vec![PI]);
        let int = Array::open(store.clone(), "/scalars/int").unwrap();
        assert_eq!(int.retrieve_array_elements::<i64>().unwrap(), vec![3]);

        let uint64 = Array::open(store.clone(), "/arrays/ints/uint64").unwrap();
        assert_eq!(uint64.metadata().dtype.as_str(), "<u8");
        assert_eq!(uint64.chunk_grid_shape(), vec![1, 2]);
        assert!(!path.join("arrays/ints/uint64/0.0").exists());

        let string = Array::open(store.clone(), "/arrays/misc/string").unwrap();
        assert_eq!(string.metadata().dtype.as_str(), "<U11");
        let bytes = std::fs::read(path.join("arrays/misc/bytes/0")).unwrap();
        assert_eq!(bytes, b"hello world");

        let consolidated: ConsolidatedMetadataV2 =
            serde_json::from_slice(&std::fs::read(path.join(".zmetadata")).unwrap()).unwrap();
        assert!(consolidated.metadata.contains_key("arrays/floats/float32/.zarray"));
        assert!(consolidated.metadata.contains_key("scalars/.zattrs"));
    }

    #[test]
    fn native_fixture_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("zarr-demo.zarr/stale");
        std::fs::create_dir_all(&stale).unwrap();
        create_native(&dir.path().join("zarr-demo"), false).unwrap();
        assert!(!stale.exists());
        assert!(!dir.path().join("zarr-demo.zarr/.zmetadata").exists());
    }
}
