//! Classic netCDF (CDF-1) files.
//!
//! A minimal writer for the legacy self-describing netCDF format: fixed-size dimensions, global and variable attributes, and fixed-size variables.
//! Record (unlimited) dimensions are not supported, so `numrecs` is always zero.
//!
//! The file is a big-endian header followed by the data of each variable:
//! ```text
//! netcdf_file = header data
//! header      = magic numrecs dim_list gatt_list var_list
//! magic       = 'C' 'D' 'F' VERSION_BYTE
//! dim_list    = ABSENT | NC_DIMENSION nelems [dim ...]
//! att_list    = ABSENT | NC_ATTRIBUTE nelems [attr ...]
//! var_list    = ABSENT | NC_VARIABLE nelems [var ...]
//! var         = name nelems [dimid ...] vatt_list nc_type vsize begin
//! ```
//! Names, attribute values and variable data are padded to 4 byte boundaries.

use std::path::Path;

use bytes::{BufMut, BytesMut};
use thiserror::Error;
use tracing::debug;

use crate::storage::Bytes;

const MAGIC: &[u8; 4] = b"CDF\x01";
const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;
const ALIGN: usize = 4;

/// A classic netCDF external data type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NcType {
    /// `NC_BYTE` 8-bit signed integer.
    Byte,
    /// `NC_CHAR` 8-bit character.
    Char,
    /// `NC_SHORT` 16-bit signed integer.
    Short,
    /// `NC_INT` 32-bit signed integer.
    Int,
    /// `NC_FLOAT` IEEE 754 single-precision floating point.
    Float,
    /// `NC_DOUBLE` IEEE 754 double-precision floating point.
    Double,
}

impl NcType {
    /// The type code written in the header.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Char => 2,
            Self::Short => 3,
            Self::Int => 4,
            Self::Float => 5,
            Self::Double => 6,
        }
    }

    /// The size in bytes of a single value.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::Char => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Double => 8,
        }
    }
}

/// Typed values of an attribute or variable.
#[derive(Clone, Debug, PartialEq)]
pub enum NcValues {
    /// `NC_BYTE` values.
    Byte(Vec<i8>),
    /// `NC_CHAR` values.
    Char(Vec<u8>),
    /// `NC_SHORT` values.
    Short(Vec<i16>),
    /// `NC_INT` values.
    Int(Vec<i32>),
    /// `NC_FLOAT` values.
    Float(Vec<f32>),
    /// `NC_DOUBLE` values.
    Double(Vec<f64>),
}

impl From<&str> for NcValues {
    fn from(text: &str) -> Self {
        Self::Char(text.as_bytes().to_vec())
    }
}

impl NcValues {
    /// The external type of the values.
    #[must_use]
    pub const fn nc_type(&self) -> NcType {
        match self {
            Self::Byte(_) => NcType::Byte,
            Self::Char(_) => NcType::Char,
            Self::Short(_) => NcType::Short,
            Self::Int(_) => NcType::Int,
            Self::Float(_) => NcType::Float,
            Self::Double(_) => NcType::Double,
        }
    }

    /// The number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(values) => values.len(),
            Self::Char(values) => values.len(),
            Self::Short(values) => values.len(),
            Self::Int(values) => values.len(),
            Self::Float(values) => values.len(),
            Self::Double(values) => values.len(),
        }
    }

    /// Returns true if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the values big-endian followed by zero padding to a 4 byte boundary.
    fn put_padded(&self, buf: &mut BytesMut) {
        let start = buf.len();
        match self {
            Self::Byte(values) => values.iter().for_each(|&v| buf.put_i8(v)),
            Self::Char(values) => buf.put_slice(values),
            Self::Short(values) => values.iter().for_each(|&v| buf.put_i16(v)),
            Self::Int(values) => values.iter().for_each(|&v| buf.put_i32(v)),
            Self::Float(values) => values.iter().for_each(|&v| buf.put_f32(v)),
            Self::Double(values) => values.iter().for_each(|&v| buf.put_f64(v)),
        }
        buf.put_bytes(0, padding(buf.len() - start));
    }
}

/// A netCDF error.
#[derive(Debug, Error)]
pub enum NetcdfError {
    /// An invalid dimension, attribute or variable name.
    #[error("invalid netCDF name {0:?}")]
    InvalidName(String),
    /// A name used twice in the same namespace.
    #[error("duplicate netCDF name {0:?}")]
    DuplicateName(String),
    /// A variable refers to a dimension that has not been defined.
    #[error("variable {0:?} refers to unknown dimension {1:?}")]
    UnknownDimension(String, String),
    /// The number of values does not match the variable shape.
    #[error("variable {0:?} has {1} values, expected {2}")]
    ShapeMismatch(String, usize, u64),
    /// A data type that cannot be represented in a classic file.
    #[error("data type {0} is not supported by the classic netCDF format")]
    UnsupportedType(String),
    /// A size or offset that does not fit in the 32-bit classic format.
    #[error("{0} exceeds the 32-bit limit of the classic netCDF format")]
    SizeOverflow(String),
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

/// A named fixed-length dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NcDimension {
    /// The dimension name.
    pub name: String,
    /// The dimension length.
    pub length: u32,
}

/// A named attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct NcAttribute {
    /// The attribute name.
    pub name: String,
    /// The attribute values.
    pub values: NcValues,
}

/// A fixed-size variable.
#[derive(Clone, Debug, PartialEq)]
pub struct NcVariable {
    /// The variable name.
    pub name: String,
    /// Dimension ids, in order.
    pub dimension_ids: Vec<usize>,
    /// Variable attributes.
    pub attributes: Vec<NcAttribute>,
    /// Variable data, C order.
    pub values: NcValues,
}

/// An in-memory classic netCDF file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NcFile {
    dimensions: Vec<NcDimension>,
    attributes: Vec<NcAttribute>,
    variables: Vec<NcVariable>,
}

fn padding(length: usize) -> usize {
    (ALIGN - length % ALIGN) % ALIGN
}

fn validate_name(name: &str) -> Result<(), NetcdfError> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
        && !name.contains('/')
        && !name.ends_with(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(NetcdfError::InvalidName(name.to_string()))
    }
}

fn to_u32(value: usize, what: impl FnOnce() -> String) -> Result<u32, NetcdfError> {
    u32::try_from(value).map_err(|_| NetcdfError::SizeOverflow(what()))
}

fn put_name(buf: &mut BytesMut, name: &str) -> Result<(), NetcdfError> {
    buf.put_u32(to_u32(name.len(), || format!("name {name:?}"))?);
    buf.put_slice(name.as_bytes());
    buf.put_bytes(0, padding(name.len()));
    Ok(())
}

fn put_attributes(buf: &mut BytesMut, attributes: &[NcAttribute]) -> Result<(), NetcdfError> {
    if attributes.is_empty() {
        buf.put_u32(0);
        buf.put_u32(0);
        return Ok(());
    }
    buf.put_u32(NC_ATTRIBUTE);
    buf.put_u32(to_u32(attributes.len(), || "attribute count".to_string())?);
    for attribute in attributes {
        put_name(buf, &attribute.name)?;
        buf.put_u32(attribute.values.nc_type().code());
        buf.put_u32(to_u32(attribute.values.len(), || {
            format!("attribute {:?}", attribute.name)
        })?);
        attribute.values.put_padded(buf);
    }
    Ok(())
}

impl NcFile {
    /// Create an empty file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dimensions.
    #[must_use]
    pub fn dimensions(&self) -> &[NcDimension] {
        &self.dimensions
    }

    /// Returns the variables.
    #[must_use]
    pub fn variables(&self) -> &[NcVariable] {
        &self.variables
    }

    /// Define a fixed-length dimension and return its id.
    ///
    /// # Errors
    /// Returns a [`NetcdfError`] if the name is invalid or already defined, or the length exceeds 32 bits.
    pub fn add_dimension(&mut self, name: &str, length: u64) -> Result<usize, NetcdfError> {
        validate_name(name)?;
        if self.dimensions.iter().any(|dimension| dimension.name == name) {
            return Err(NetcdfError::DuplicateName(name.to_string()));
        }
        let length =
            u32::try_from(length).map_err(|_| NetcdfError::SizeOverflow(format!("dimension {name:?}")))?;
        self.dimensions.push(NcDimension {
            name: name.to_string(),
            length,
        });
        Ok(self.dimensions.len() - 1)
    }

    /// Add a global attribute.
    ///
    /// # Errors
    /// Returns a [`NetcdfError`] if the name is invalid or already defined.
    pub fn add_attribute(&mut self, name: &str, values: NcValues) -> Result<(), NetcdfError> {
        validate_name(name)?;
        if self.attributes.iter().any(|attribute| attribute.name == name) {
            return Err(NetcdfError::DuplicateName(name.to_string()));
        }
        self.attributes.push(NcAttribute {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    /// Add a variable over the named `dimensions`.
    ///
    /// A variable with no dimensions is a scalar holding one value.
    ///
    /// # Errors
    /// Returns a [`NetcdfError`] if
    ///  - the name is invalid or already defined,
    ///  - a dimension is not defined, or
    ///  - the number of values does not match the product of the dimension lengths.
    pub fn add_variable(
        &mut self,
        name: &str,
        dimensions: &[&str],
        values: NcValues,
        attributes: Vec<NcAttribute>,
    ) -> Result<(), NetcdfError> {
        validate_name(name)?;
        if self.variables.iter().any(|variable| variable.name == name) {
            return Err(NetcdfError::DuplicateName(name.to_string()));
        }
        for attribute in &attributes {
            validate_name(&attribute.name)?;
        }
        let dimension_ids = dimensions
            .iter()
            .map(|dimension| {
                self.dimensions
                    .iter()
                    .position(|d| d.name == *dimension)
                    .ok_or_else(|| {
                        NetcdfError::UnknownDimension(name.to_string(), (*dimension).to_string())
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let expected: u64 = dimension_ids
            .iter()
            .map(|&id| u64::from(self.dimensions[id].length))
            .product();
        if values.len() as u64 != expected {
            return Err(NetcdfError::ShapeMismatch(
                name.to_string(),
                values.len(),
                expected,
            ));
        }
        self.variables.push(NcVariable {
            name: name.to_string(),
            dimension_ids,
            attributes,
            values,
        });
        Ok(())
    }

    fn put_header(&self, buf: &mut BytesMut, begins: &[u32]) -> Result<(), NetcdfError> {
        buf.put_slice(MAGIC);
        buf.put_u32(0); // numrecs

        if self.dimensions.is_empty() {
            buf.put_u32(0);
            buf.put_u32(0);
        } else {
            buf.put_u32(NC_DIMENSION);
            buf.put_u32(to_u32(self.dimensions.len(), || "dimension count".to_string())?);
            for dimension in &self.dimensions {
                put_name(buf, &dimension.name)?;
                buf.put_u32(dimension.length);
            }
        }

        put_attributes(buf, &self.attributes)?;

        if self.variables.is_empty() {
            buf.put_u32(0);
            buf.put_u32(0);
        } else {
            buf.put_u32(NC_VARIABLE);
            buf.put_u32(to_u32(self.variables.len(), || "variable count".to_string())?);
            for (variable, &begin) in std::iter::zip(&self.variables, begins) {
                put_name(buf, &variable.name)?;
                buf.put_u32(to_u32(variable.dimension_ids.len(), || {
                    format!("variable {:?} rank", variable.name)
                })?);
                for &id in &variable.dimension_ids {
                    buf.put_u32(to_u32(id, || "dimension id".to_string())?);
                }
                put_attributes(buf, &variable.attributes)?;
                buf.put_u32(variable.values.nc_type().code());
                buf.put_u32(Self::vsize(variable)?);
                buf.put_u32(begin);
            }
        }
        Ok(())
    }

    fn vsize(variable: &NcVariable) -> Result<u32, NetcdfError> {
        let size = variable.values.len() * variable.values.nc_type().size();
        to_u32(size + padding(size), || format!("variable {:?}", variable.name))
    }

    /// Encode the file.
    ///
    /// # Errors
    /// Returns [`NetcdfError::SizeOverflow`] if a size or offset does not fit in the classic format.
    pub fn to_bytes(&self) -> Result<Bytes, NetcdfError> {
        // the header length does not depend on the begin offsets
        let mut header = BytesMut::new();
        self.put_header(&mut header, &vec![0; self.variables.len()])?;

        let mut begins = Vec::with_capacity(self.variables.len());
        let mut offset = header.len() as u64;
        for variable in &self.variables {
            begins.push(
                u32::try_from(offset)
                    .map_err(|_| NetcdfError::SizeOverflow(format!("variable {:?}", variable.name)))?,
            );
            offset += u64::from(Self::vsize(variable)?);
        }

        let mut buf = BytesMut::with_capacity(usize::try_from(offset).unwrap_or_default());
        self.put_header(&mut buf, &begins)?;
        for variable in &self.variables {
            variable.values.put_padded(&mut buf);
        }
        Ok(buf.freeze())
    }

    /// Write the file to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns a [`NetcdfError`] if the file cannot be encoded or written.
    pub fn write(&self, path: &Path) -> Result<(), NetcdfError> {
        let bytes = self.to_bytes()?;
        debug!(path = %path.display(), bytes = bytes.len(), "writing netCDF file");
        std::fs::write(path, &bytes)?;
        Ok(())
    }
}
