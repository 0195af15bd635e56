use ArrayError::IncompatibleElementType as IET;

use super::{
    data_type::{encode_fixed_bytes, encode_fixed_unicode},
    ArrayError, DataType,
};

/// A trait representing an array element type.
pub trait Element: Sized {
    /// Validate the data type.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the data type is incompatible with [`Element`].
    fn validate_data_type(data_type: &DataType) -> Result<(), ArrayError>;

    /// Encode a slice of elements into little-endian bytes.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the data type is incompatible with [`Element`] or an element cannot be encoded.
    fn into_array_bytes(data_type: &DataType, elements: &[Self]) -> Result<Vec<u8>, ArrayError>;
}

/// A trait representing an owned array element type.
pub trait ElementOwned: Element {
    /// Decode little-endian bytes into a [`Vec<ElementOwned>`].
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the data type is incompatible with [`Element`].
    fn from_array_bytes(data_type: &DataType, bytes: &[u8]) -> Result<Vec<Self>, ArrayError>;
}

macro_rules! impl_element_pod {
    ($raw_type:ty, $pattern:pat) => {
        impl Element for $raw_type {
            fn validate_data_type(data_type: &DataType) -> Result<(), ArrayError> {
                if matches!(data_type, $pattern) {
                    Ok(())
                } else {
                    Err(IET)
                }
            }

            fn into_array_bytes(
                data_type: &DataType,
                elements: &[Self],
            ) -> Result<Vec<u8>, ArrayError> {
                Self::validate_data_type(data_type)?;
                Ok(elements.iter().flat_map(|e| e.to_le_bytes()).collect())
            }
        }

        impl ElementOwned for $raw_type {
            fn from_array_bytes(
                data_type: &DataType,
                bytes: &[u8],
            ) -> Result<Vec<Self>, ArrayError> {
                Self::validate_data_type(data_type)?;
                const SIZE: usize = std::mem::size_of::<$raw_type>();
                if bytes.len() % SIZE != 0 {
                    return Err(ArrayError::InvalidElementBytes(bytes.len(), SIZE));
                }
                Ok(bytes
                    .chunks_exact(SIZE)
                    .map(|chunk| {
                        let mut element = [0u8; SIZE];
                        element.copy_from_slice(chunk);
                        <$raw_type>::from_le_bytes(element)
                    })
                    .collect())
            }
        }
    };
}

impl_element_pod!(i8, DataType::Int8);
impl_element_pod!(i16, DataType::Int16);
impl_element_pod!(i32, DataType::Int32);
impl_element_pod!(i64, DataType::Int64);
impl_element_pod!(u8, DataType::UInt8);
impl_element_pod!(u16, DataType::UInt16);
impl_element_pod!(u32, DataType::UInt32);
impl_element_pod!(u64, DataType::UInt64);
impl_element_pod!(f32, DataType::Float32);
impl_element_pod!(f64, DataType::Float64);

impl Element for &str {
    fn validate_data_type(data_type: &DataType) -> Result<(), ArrayError> {
        if matches!(data_type, DataType::FixedUnicode(_) | DataType::FixedBytes(_)) {
            Ok(())
        } else {
            Err(IET)
        }
    }

    fn into_array_bytes(data_type: &DataType, elements: &[Self]) -> Result<Vec<u8>, ArrayError> {
        match data_type {
            DataType::FixedUnicode(length) => elements
                .iter()
                .map(|string| {
                    encode_fixed_unicode(string, *length)
                        .ok_or_else(|| ArrayError::ElementTooLong(string.to_string(), *length))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|elements| elements.concat()),
            DataType::FixedBytes(_) => {
                let elements: Vec<&[u8]> = elements.iter().map(|string| string.as_bytes()).collect();
                <&[u8]>::into_array_bytes(data_type, &elements)
            }
            _ => Err(IET),
        }
    }
}

impl Element for &[u8] {
    fn validate_data_type(data_type: &DataType) -> Result<(), ArrayError> {
        if matches!(data_type, DataType::FixedBytes(_)) {
            Ok(())
        } else {
            Err(IET)
        }
    }

    fn into_array_bytes(data_type: &DataType, elements: &[Self]) -> Result<Vec<u8>, ArrayError> {
        let DataType::FixedBytes(length) = data_type else {
            return Err(IET);
        };
        elements
            .iter()
            .map(|bytes| {
                encode_fixed_bytes(bytes, *length).ok_or_else(|| {
                    ArrayError::ElementTooLong(String::from_utf8_lossy(bytes).into_owned(), *length)
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|elements| elements.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_pod() {
        let bytes = f64::into_array_bytes(&DataType::Float64, &[1.0, 3.14159]).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..8], &1.0f64.to_le_bytes());
        assert_eq!(
            f64::from_array_bytes(&DataType::Float64, &bytes).unwrap(),
            vec![1.0, 3.14159]
        );
        assert!(matches!(
            i8::into_array_bytes(&DataType::UInt8, &[1]),
            Err(ArrayError::IncompatibleElementType)
        ));
        assert_eq!(
            i16::into_array_bytes(&DataType::Int16, &[-2]).unwrap(),
            vec![0xfe, 0xff]
        );
    }

    #[test]
    fn element_strings() {
        let unicode = <&str>::into_array_bytes(&DataType::FixedUnicode(11), &["hello world"]).unwrap();
        assert_eq!(unicode.len(), 44);
        assert_eq!(&unicode[..4], &[b'h', 0, 0, 0]);

        let bytes = <&[u8]>::into_array_bytes(&DataType::FixedBytes(11), &[b"hello world".as_slice()]).unwrap();
        assert_eq!(bytes, b"hello world");

        let padded = <&str>::into_array_bytes(&DataType::FixedBytes(4), &["ab"]).unwrap();
        assert_eq!(padded, b"ab\0\0");

        assert!(matches!(
            <&str>::into_array_bytes(&DataType::FixedUnicode(2), &["abc"]),
            Err(ArrayError::ElementTooLong(_, 2))
        ));
        assert!(<&str>::into_array_bytes(&DataType::Int8, &["a"]).is_err());
    }
}
