//! Zarr V2 data types.
//!
//! See <https://zarr-specs.readthedocs.io/en/latest/v2/v2.0.html#data-type-encoding>.
//! Multi-byte types are always encoded little-endian.

use base64::{prelude::BASE64_STANDARD, Engine};
use derive_more::From;
use thiserror::Error;

use crate::metadata::v2::{DataTypeMetadataV2, FillValueMetadataV2};

/// A data type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[rustfmt::skip]
pub enum DataType {
    /// `|i1` Integer in `[-2^7, 2^7-1]`.
    Int8,
    /// `<i2` Integer in `[-2^15, 2^15-1]`.
    Int16,
    /// `<i4` Integer in `[-2^31, 2^31-1]`.
    Int32,
    /// `<i8` Integer in `[-2^63, 2^63-1]`.
    Int64,
    /// `|u1` Integer in `[0, 2^8-1]`.
    UInt8,
    /// `<u2` Integer in `[0, 2^16-1]`.
    UInt16,
    /// `<u4` Integer in `[0, 2^32-1]`.
    UInt32,
    /// `<u8` Integer in `[0, 2^64-1]`.
    UInt64,
    /// `<f4` IEEE 754 single-precision floating point.
    Float32,
    /// `<f8` IEEE 754 double-precision floating point.
    Float64,
    /// `|S*` Fixed-length byte string, the stored usize is the length in bytes.
    FixedBytes(usize),
    /// `<U*` Fixed-length unicode string, the stored usize is the length in code points (UTF-32).
    FixedUnicode(usize),
}

/// An unsupported data type error.
#[derive(Debug, Error, From)]
#[error("unsupported data type {0}")]
pub struct UnsupportedDataTypeError(String);

/// A fill value incompatibility error.
#[derive(Debug, Error)]
#[error("incompatible fill value {} for data type {0}", serde_json::to_string(.1).unwrap_or_default())]
pub struct IncompatibleFillValueError(String, FillValueMetadataV2);

impl IncompatibleFillValueError {
    /// Create a new incompatible fill value error.
    #[must_use]
    pub const fn new(data_type_name: String, fill_value: FillValueMetadataV2) -> Self {
        Self(data_type_name, fill_value)
    }
}

impl DataType {
    /// Returns the name of the data type.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Int8 => "int8".to_string(),
            Self::Int16 => "int16".to_string(),
            Self::Int32 => "int32".to_string(),
            Self::Int64 => "int64".to_string(),
            Self::UInt8 => "uint8".to_string(),
            Self::UInt16 => "uint16".to_string(),
            Self::UInt32 => "uint32".to_string(),
            Self::UInt64 => "uint64".to_string(),
            Self::Float32 => "float32".to_string(),
            Self::Float64 => "float64".to_string(),
            Self::FixedBytes(length) => format!("bytes{length}"),
            Self::FixedUnicode(length) => format!("unicode{length}"),
        }
    }

    /// Returns the size in bytes of an element of the data type.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
            Self::FixedBytes(length) => *length,
            Self::FixedUnicode(length) => *length * 4,
        }
    }

    /// Returns the Zarr V2 `dtype` of the data type, e.g. `<f8`.
    #[must_use]
    pub fn metadata(&self) -> DataTypeMetadataV2 {
        match self {
            Self::Int8 => "|i1".into(),
            Self::Int16 => "<i2".into(),
            Self::Int32 => "<i4".into(),
            Self::Int64 => "<i8".into(),
            Self::UInt8 => "|u1".into(),
            Self::UInt16 => "<u2".into(),
            Self::UInt32 => "<u4".into(),
            Self::UInt64 => "<u8".into(),
            Self::Float32 => "<f4".into(),
            Self::Float64 => "<f8".into(),
            Self::FixedBytes(length) => format!("|S{length}").into(),
            Self::FixedUnicode(length) => format!("<U{length}").into(),
        }
    }

    /// Create a data type from Zarr V2 `dtype` metadata.
    ///
    /// Single byte types may use either the `|` or `<` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedDataTypeError`] if the data type is not supported.
    pub fn from_metadata(metadata: &DataTypeMetadataV2) -> Result<Self, UnsupportedDataTypeError> {
        let dtype = metadata.as_str();
        let unsupported = || UnsupportedDataTypeError(dtype.to_string());
        let mut chars = dtype.chars();
        let endianness = chars.next().ok_or_else(unsupported)?;
        let kind = chars.as_str();
        let data_type = match (endianness, kind) {
            ('|' | '<', "i1") => Self::Int8,
            ('<', "i2") => Self::Int16,
            ('<', "i4") => Self::Int32,
            ('<', "i8") => Self::Int64,
            ('|' | '<', "u1") => Self::UInt8,
            ('<', "u2") => Self::UInt16,
            ('<', "u4") => Self::UInt32,
            ('<', "u8") => Self::UInt64,
            ('<', "f4") => Self::Float32,
            ('<', "f8") => Self::Float64,
            ('|', kind) if kind.starts_with('S') => Self::FixedBytes(
                kind.trim_start_matches('S')
                    .parse()
                    .map_err(|_| unsupported())?,
            ),
            ('<', kind) if kind.starts_with('U') => Self::FixedUnicode(
                kind.trim_start_matches('U')
                    .parse()
                    .map_err(|_| unsupported())?,
            ),
            _ => return Err(unsupported()),
        };
        Ok(data_type)
    }

    /// Return the little-endian bytes of a single element equal to `fill_value`.
    ///
    /// A `null` fill value is encoded as zeros.
    ///
    /// # Errors
    ///
    /// Returns [`IncompatibleFillValueError`] if the fill value is incompatible with the data type.
    pub fn fill_value_bytes(
        &self,
        fill_value: &FillValueMetadataV2,
    ) -> Result<Vec<u8>, IncompatibleFillValueError> {
        let err = || IncompatibleFillValueError::new(self.name(), fill_value.clone());
        if fill_value == &FillValueMetadataV2::Null {
            return Ok(vec![0; self.size()]);
        }

        macro_rules! int_fill {
            ($t:ty) => {{
                let FillValueMetadataV2::Number(number) = fill_value else {
                    return Err(err());
                };
                let value = if let Some(int) = number.as_i64() {
                    <$t>::try_from(int).ok()
                } else {
                    number.as_u64().and_then(|uint| <$t>::try_from(uint).ok())
                };
                value.ok_or_else(err)?.to_le_bytes().to_vec()
            }};
        }

        macro_rules! float_fill {
            ($t:ty) => {{
                let value: $t = match fill_value {
                    FillValueMetadataV2::NaN => <$t>::NAN,
                    FillValueMetadataV2::Infinity => <$t>::INFINITY,
                    FillValueMetadataV2::NegInfinity => <$t>::NEG_INFINITY,
                    #[allow(clippy::cast_possible_truncation)]
                    FillValueMetadataV2::Number(number) => number.as_f64().ok_or_else(err)? as $t,
                    _ => return Err(err()),
                };
                value.to_le_bytes().to_vec()
            }};
        }

        let bytes = match self {
            Self::Int8 => int_fill!(i8),
            Self::Int16 => int_fill!(i16),
            Self::Int32 => int_fill!(i32),
            Self::Int64 => int_fill!(i64),
            Self::UInt8 => int_fill!(u8),
            Self::UInt16 => int_fill!(u16),
            Self::UInt32 => int_fill!(u32),
            Self::UInt64 => int_fill!(u64),
            Self::Float32 => float_fill!(f32),
            Self::Float64 => float_fill!(f64),
            // byte string fill values are base64 encoded and zero padded
            Self::FixedBytes(length) => match fill_value {
                FillValueMetadataV2::String(string) => {
                    let mut bytes = BASE64_STANDARD.decode(string).map_err(|_| err())?;
                    if bytes.len() > *length {
                        return Err(err());
                    }
                    bytes.resize(*length, 0);
                    bytes
                }
                _ => return Err(err()),
            },
            Self::FixedUnicode(length) => match fill_value {
                FillValueMetadataV2::String(string) => {
                    encode_fixed_unicode(string, *length).ok_or_else(err)?
                }
                _ => return Err(err()),
            },
        };
        Ok(bytes)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Encode `string` as `length` UTF-32LE code points, padded with zeros.
///
/// Returns [`None`] if `string` has more than `length` code points.
#[must_use]
pub fn encode_fixed_unicode(string: &str, length: usize) -> Option<Vec<u8>> {
    if string.chars().count() > length {
        return None;
    }
    let mut bytes: Vec<u8> = string
        .chars()
        .flat_map(|c| u32::from(c).to_le_bytes())
        .collect();
    bytes.resize(length * 4, 0);
    Some(bytes)
}

/// Encode `value` as a fixed-length byte string of `length` bytes, padded with zeros.
///
/// Returns [`None`] if `value` is longer than `length`.
#[must_use]
pub fn encode_fixed_bytes(value: &[u8], length: usize) -> Option<Vec<u8>> {
    if value.len() > length {
        return None;
    }
    let mut bytes = value.to_vec();
    bytes.resize(length, 0);
    Some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_metadata() {
        for data_type in [
            DataType::Int8,
            DataType::Int16,
            DataType::Int32,
            DataType::Int64,
            DataType::UInt8,
            DataType::UInt16,
            DataType::UInt32,
            DataType::UInt64,
            DataType::Float32,
            DataType::Float64,
            DataType::FixedBytes(11),
            DataType::FixedUnicode(11),
        ] {
            assert_eq!(
                DataType::from_metadata(&data_type.metadata()).unwrap(),
                data_type
            );
        }
        assert_eq!(DataType::FixedUnicode(11).metadata().as_str(), "<U11");
        assert_eq!(DataType::FixedUnicode(11).size(), 44);
        assert_eq!(
            DataType::from_metadata(&"<u1".into()).unwrap(),
            DataType::UInt8
        );
        assert!(DataType::from_metadata(&">f8".into()).is_err());
        assert!(DataType::from_metadata(&"|Sx".into()).is_err());
        assert!(DataType::from_metadata(&"".into()).is_err());
    }

    #[test]
    fn fill_value_bytes() {
        assert_eq!(
            DataType::Float64
                .fill_value_bytes(&FillValueMetadataV2::from_f64(3.14159))
                .unwrap(),
            3.14159f64.to_le_bytes()
        );
        assert_eq!(
            DataType::Float32
                .fill_value_bytes(&FillValueMetadataV2::NaN)
                .unwrap(),
            f32::NAN.to_le_bytes()
        );
        assert_eq!(
            DataType::UInt16
                .fill_value_bytes(&FillValueMetadataV2::Null)
                .unwrap(),
            vec![0, 0]
        );
        assert_eq!(
            DataType::Int8
                .fill_value_bytes(&FillValueMetadataV2::from_i64(-1))
                .unwrap(),
            vec![255]
        );
        assert!(DataType::Int8
            .fill_value_bytes(&FillValueMetadataV2::from_i64(128))
            .is_err());
        assert!(DataType::UInt8
            .fill_value_bytes(&FillValueMetadataV2::NaN)
            .is_err());
        assert_eq!(
            DataType::FixedUnicode(2)
                .fill_value_bytes(&FillValueMetadataV2::String(String::new()))
                .unwrap(),
            vec![0; 8]
        );
    }

    #[test]
    fn fill_value_bytes_base64() {
        let fixed_bytes = DataType::FixedBytes(4);
        assert_eq!(
            fixed_bytes
                .fill_value_bytes(&FillValueMetadataV2::String(String::new()))
                .unwrap(),
            vec![0; 4]
        );
        assert_eq!(
            fixed_bytes
                .fill_value_bytes(&FillValueMetadataV2::String("aGk=".to_string()))
                .unwrap(),
            b"hi\0\0"
        );
        assert_eq!(
            fixed_bytes
                .fill_value_bytes(&FillValueMetadataV2::String("AQIDBA==".to_string()))
                .unwrap(),
            [1, 2, 3, 4]
        );
        assert!(fixed_bytes
            .fill_value_bytes(&FillValueMetadataV2::String("aGVsbG8=".to_string()))
            .is_err());
        assert!(fixed_bytes
            .fill_value_bytes(&FillValueMetadataV2::String("not base64!".to_string()))
            .is_err());
        assert!(fixed_bytes
            .fill_value_bytes(&FillValueMetadataV2::from_u64(0))
            .is_err());
    }

    #[test]
    fn fixed_strings() {
        assert_eq!(
            encode_fixed_unicode("hi", 3).unwrap(),
            vec![b'h', 0, 0, 0, b'i', 0, 0, 0, 0, 0, 0, 0]
        );
        assert!(encode_fixed_unicode("hello", 3).is_none());
        assert_eq!(encode_fixed_bytes(b"ab", 3).unwrap(), b"ab\0");
        assert!(encode_fixed_bytes(b"abcd", 3).is_none());
    }
}
