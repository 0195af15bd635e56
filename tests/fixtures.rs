use std::{path::Path, sync::Arc};

use serde_json::json;
use zarrs_fixtures::{
    array::Array,
    fixtures::{generate, FixtureType, Operation},
    group::Group,
    metadata::v2::ConsolidatedMetadataV2,
    storage::store::FilesystemStore,
};

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[test]
fn generate_native() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let paths = generate(
        Operation::Create,
        FixtureType::Zarr,
        Some(dir.path().join("demo.zarr").as_path()),
        false,
    )?;
    let zarr = dir.path().join("zarr-demo.zarr");
    assert_eq!(paths.base, dir.path().join("zarr-demo"));
    assert_eq!(paths.outputs, vec![zarr.clone()]);

    assert_eq!(read_json(&zarr.join(".zgroup")), json!({"zarr_format": 2}));
    assert_eq!(
        std::fs::read_to_string(zarr.join("arrays/ints/int8/.zarray"))?,
        r#"{
  "chunks": [
    2,
    2
  ],
  "compressor": null,
  "dimension_separator": ".",
  "dtype": "|i1",
  "fill_value": null,
  "filters": null,
  "order": "C",
  "shape": [
    2,
    3
  ],
  "zarr_format": 2
}"#
    );
    assert_eq!(
        read_json(&zarr.join("scalars/.zattrs")),
        json!({"description": "scalars"})
    );
    assert_eq!(read_json(&zarr.join("scalars/fill_pi/.zarray"))["fill_value"], 3.14159);
    assert!(!zarr.join("scalars/fill_pi/0").exists());
    assert_eq!(std::fs::read(zarr.join("scalars/pi/0"))?, 1.0f64.to_le_bytes());
    assert_eq!(std::fs::read(zarr.join("scalars/int/0"))?, 3i64.to_le_bytes());

    let consolidated: ConsolidatedMetadataV2 =
        serde_json::from_value(read_json(&zarr.join(".zmetadata")))?;
    let groups: Vec<&str> = consolidated
        .metadata
        .keys()
        .filter_map(|key| key.strip_suffix(".zgroup"))
        .collect();
    assert_eq!(
        groups,
        ["", "arrays/", "arrays/floats/", "arrays/ints/", "arrays/misc/", "scalars/"]
    );
    assert_eq!(
        consolidated.metadata[".zattrs"]["1"],
        json!(1),
        "integer keyed root attribute"
    );
    assert_eq!(
        consolidated
            .metadata
            .keys()
            .filter(|key| key.ends_with(".zarray"))
            .count(),
        16
    );

    let store = Arc::new(FilesystemStore::new(&zarr)?);
    let misc = Group::open(store.clone(), "/arrays/misc")?;
    assert_eq!(misc.attributes()["description"], "misc");
    let string = Array::open(store.clone(), "/arrays/misc/string")?;
    let mut expected = Vec::new();
    for c in "hello world".chars() {
        expected.extend((c as u32).to_le_bytes());
    }
    assert_eq!(string.retrieve_array_bytes()?, expected);
    let uint8 = Array::open(store, "/scalars/uint8")?;
    assert_eq!(uint8.retrieve_array_elements::<u8>()?, vec![0]);
    Ok(())
}

#[test]
fn generate_native_twice() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let requested = dir.path().join("twice");
    let first = generate(Operation::Create, FixtureType::Zarr, Some(requested.as_path()), true)?;
    let zmetadata = std::fs::read(first.outputs[0].join(".zmetadata"))?;
    let second = generate(Operation::Create, FixtureType::Zarr, Some(first.base.as_path()), true)?;
    assert_eq!(first, second);
    assert_eq!(std::fs::read(second.outputs[0].join(".zmetadata"))?, zmetadata);
    Ok(())
}

#[test]
fn generate_comparison() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let paths = generate(
        Operation::Create,
        FixtureType::Xarray,
        Some(dir.path().join("demo").as_path()),
        true,
    )?;
    let netcdf = dir.path().join("xarray-demo.nc");
    let zarr = dir.path().join("xarray-demo.zarr");
    assert_eq!(paths.outputs, vec![netcdf.clone(), zarr.clone()]);

    let bytes = std::fs::read(netcdf)?;
    assert_eq!(&bytes[..8], b"CDF\x01\0\0\0\0");
    assert_eq!(&bytes[bytes.len() - 4..], &[127, 0, 0, 0]);

    assert_eq!(
        read_json(&zarr.join("int8/.zattrs")),
        json!({"_ARRAY_DIMENSIONS": []})
    );
    assert_eq!(read_json(&zarr.join("int8/.zarray"))["dtype"], "|i1");
    assert_eq!(std::fs::read(zarr.join("int8/0"))?, [127]);
    assert_eq!(
        read_json(&zarr.join(".zmetadata"))["zarr_consolidated_format"],
        1
    );
    Ok(())
}

#[test]
fn generate_into_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("zarr-blocked.zarr"), b"not a directory").unwrap();
    assert!(generate(
        Operation::Create,
        FixtureType::Zarr,
        Some(dir.path().join("blocked").as_path()),
        true,
    )
    .is_err());
}
