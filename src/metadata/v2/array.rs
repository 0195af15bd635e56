use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::metadata::{ArrayShape, Attributes, ChunkShape};

/// The configuration of a Zarr V2 compressor or filter, e.g. `{"id": "zlib", "level": 1}`.
pub type CodecMetadataV2 = serde_json::Map<String, serde_json::Value>;

/// Zarr V2 array metadata.
///
/// Fields are declared in sorted order so that the `.zarray` document matches the key order written by `zarr-python`.
///
/// An example `JSON` document for an uncompressed Zarr V2 array:
/// ```json
/// {
///     "chunks": [
///         2,
///         2
///     ],
///     "compressor": null,
///     "dimension_separator": ".",
///     "dtype": "<f4",
///     "fill_value": null,
///     "filters": null,
///     "order": "C",
///     "shape": [
///         2,
///         3
///     ],
///     "zarr_format": 2
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Display)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct ArrayMetadataV2 {
    /// A list of integers defining the length of each dimension of a chunk of the array.
    pub chunks: ChunkShape,
    /// A JSON object identifying the primary compression codec and providing configuration parameters, or null if no compressor is to be used.
    pub compressor: Option<CodecMetadataV2>,
    /// Either "." or "/", defining the separator placed between the dimensions of a chunk key.
    #[serde(default)]
    pub dimension_separator: ChunkKeySeparator,
    /// The data type of the Zarr array.
    pub dtype: DataTypeMetadataV2,
    /// A scalar value providing the default value to use for uninitialized portions of the array, or null if no fill value is to be used.
    pub fill_value: FillValueMetadataV2,
    /// A list of JSON objects providing codec configurations, or null if no filters are to be applied.
    #[serde(default)]
    pub filters: Option<Vec<CodecMetadataV2>>,
    /// Either "C" or "F", defining the layout of bytes within each chunk of the array.
    pub order: ArrayMetadataV2Order,
    /// An array of integers providing the length of each dimension of the Zarr array.
    pub shape: ArrayShape,
    /// An integer defining the version of the storage specification to which the array adheres. Must be `2`.
    pub zarr_format: monostate::MustBe!(2u64),
    /// User defined attributes, stored in a separate `.zattrs` document.
    #[serde(skip)]
    pub attributes: Attributes,
}

impl ArrayMetadataV2 {
    /// Create Zarr V2 array metadata.
    ///
    /// Defaults to:
    /// - no compressor or filters,
    /// - C order,
    /// - a "." dimension separator, and
    /// - empty attributes.
    #[must_use]
    pub fn new(
        shape: ArrayShape,
        chunks: ChunkShape,
        dtype: DataTypeMetadataV2,
        fill_value: FillValueMetadataV2,
    ) -> Self {
        Self {
            chunks,
            compressor: None,
            dimension_separator: ChunkKeySeparator::Dot,
            dtype,
            fill_value,
            filters: None,
            order: ArrayMetadataV2Order::C,
            shape,
            zarr_format: monostate::MustBe!(2u64),
            attributes: Attributes::default(),
        }
    }

    /// Set the user attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// The separator placed between chunk grid indices in a chunk key.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default, Display)]
pub enum ChunkKeySeparator {
    /// The '.' character.
    #[default]
    #[serde(rename = ".")]
    #[display(".")]
    Dot,
    /// The '/' character.
    #[serde(rename = "/")]
    #[display("/")]
    Slash,
}

/// Zarr V2 data type metadata, a `numpy` type string such as `<f8`, `|u1`, or `<U11`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Display, From)]
#[serde(transparent)]
#[from(String, &str)]
pub struct DataTypeMetadataV2(String);

impl DataTypeMetadataV2 {
    /// Extracts a string slice containing the data type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Zarr V2 fill value metadata.
///
/// Provides the default value to use for uninitialized portions of the array, or null if no fill value is to be used.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FillValueMetadataV2 {
    /// No fill value.
    Null,
    /// NaN (not-a-number).
    NaN,
    /// Positive infinity.
    Infinity,
    /// Negative infinity.
    NegInfinity,
    /// A number.
    Number(serde_json::Number),
    /// A string.
    String(String),
}

impl FillValueMetadataV2 {
    /// Create a fill value from a floating point number, mapping non-finite values to their string forms.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::NaN
        } else if value == f64::INFINITY {
            Self::Infinity
        } else if value == f64::NEG_INFINITY {
            Self::NegInfinity
        } else {
            serde_json::Number::from_f64(value).map_or(Self::NaN, Self::Number)
        }
    }

    /// Create a fill value from a signed integer.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self::Number(value.into())
    }

    /// Create a fill value from an unsigned integer.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl<'de> serde::Deserialize<'de> for FillValueMetadataV2 {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FillValueMetadataV2Type {
            String(String),
            Number(serde_json::Number),
            Null,
        }
        let fill_value = FillValueMetadataV2Type::deserialize(d)?;
        match fill_value {
            FillValueMetadataV2Type::String(string) => match string.as_str() {
                "NaN" => Ok(Self::NaN),
                "Infinity" => Ok(Self::Infinity),
                "-Infinity" => Ok(Self::NegInfinity),
                _ => Ok(Self::String(string)),
            },
            FillValueMetadataV2Type::Number(number) => Ok(Self::Number(number)),
            FillValueMetadataV2Type::Null => Ok(Self::Null),
        }
    }
}

impl Serialize for FillValueMetadataV2 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::NaN => serializer.serialize_str("NaN"),
            Self::Infinity => serializer.serialize_str("Infinity"),
            Self::NegInfinity => serializer.serialize_str("-Infinity"),
            Self::Number(number) => number.serialize(serializer),
            Self::String(string) => string.serialize(serializer),
        }
    }
}

/// Zarr V2 order metadata. Indicates the layout of bytes within a chunk.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArrayMetadataV2Order {
    /// Row-major order. The last dimension varies fastest.
    C,
    /// Column-major order. The first dimension varies fastest.
    F,
}
