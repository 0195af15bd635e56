//! Zarr V2 metadata documents.

mod array;
mod consolidated;
mod group;

pub use array::{
    ArrayMetadataV2, ArrayMetadataV2Order, ChunkKeySeparator, CodecMetadataV2,
    DataTypeMetadataV2, FillValueMetadataV2,
};
pub use consolidated::{consolidate_metadata, ConsolidatedMetadataV2};
pub use group::GroupMetadataV2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_v2_zarr_python() {
        let json = r#"
            {
                "chunks": [
                    2,
                    2
                ],
                "compressor": null,
                "dtype": "<i2",
                "fill_value": null,
                "filters": null,
                "order": "C",
                "shape": [
                    2,
                    3
                ],
                "zarr_format": 2
            }"#;
        let array_metadata_v2: ArrayMetadataV2 = serde_json::from_str(json).unwrap();
        assert_eq!(array_metadata_v2.shape, vec![2, 3]);
        assert_eq!(array_metadata_v2.chunks.to_array_shape(), vec![2, 2]);
        assert_eq!(array_metadata_v2.dtype.as_str(), "<i2");
        assert_eq!(array_metadata_v2.fill_value, FillValueMetadataV2::Null);
        assert_eq!(
            array_metadata_v2.dimension_separator,
            ChunkKeySeparator::Dot
        );
        assert!(array_metadata_v2.attributes.is_empty());
    }

    #[test]
    fn group_v2_invalid_format() {
        assert!(serde_json::from_str::<GroupMetadataV2>(r#"{"zarr_format": 3}"#).is_err());
        assert!(serde_json::from_str::<GroupMetadataV2>(r#"{"zarr_format": 2}"#).is_ok());
    }
}
