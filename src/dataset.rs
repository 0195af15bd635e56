//! In-memory labelled datasets.
//!
//! A [`Dataset`] is a collection of named dimensions, global attributes, and variables defined over those dimensions.
//! It can be written both as a classic netCDF file ([`Dataset::to_netcdf`]) and as a Zarr V2 hierarchy ([`Dataset::to_zarr`]).
//!
//! The Zarr representation follows the `xarray` conventions:
//!  - every variable is an array in the root group, stored as a single chunk,
//!  - the dimension names of a variable are stored in its `_ARRAY_DIMENSIONS` attribute, and
//!  - floating point variables use a `NaN` fill value, integer variables a `null` fill value.

use std::{path::Path, sync::Arc};

use thiserror::Error;
use tracing::info;

use crate::{
    array::{ArrayBuilder, ArrayCreateError, ArrayError, DataType},
    group::{GroupBuilder, GroupCreateError},
    metadata::{
        v2::{consolidate_metadata, FillValueMetadataV2},
        Attributes, ChunkShape,
    },
    netcdf::{NcAttribute, NcFile, NcValues, NetcdfError},
    storage::{
        ReadableWritableListableStorageTraits, StorageError, StorePrefix, WritableStorageTraits,
    },
};

/// The attribute holding the dimension names of a variable in a Zarr hierarchy.
pub const ARRAY_DIMENSIONS_ATTRIBUTE: &str = "_ARRAY_DIMENSIONS";

/// The typed data of a variable, in C order.
#[derive(Clone, Debug, PartialEq)]
pub enum VariableData {
    /// `int8` data.
    Int8(Vec<i8>),
    /// `int16` data.
    Int16(Vec<i16>),
    /// `int32` data.
    Int32(Vec<i32>),
    /// `int64` data.
    Int64(Vec<i64>),
    /// `uint8` data.
    UInt8(Vec<u8>),
    /// `float32` data.
    Float32(Vec<f32>),
    /// `float64` data.
    Float64(Vec<f64>),
}

macro_rules! variable_data_dispatch {
    ($self:expr, $values:ident => $body:expr) => {
        match $self {
            VariableData::Int8($values) => $body,
            VariableData::Int16($values) => $body,
            VariableData::Int32($values) => $body,
            VariableData::Int64($values) => $body,
            VariableData::UInt8($values) => $body,
            VariableData::Float32($values) => $body,
            VariableData::Float64($values) => $body,
        }
    };
}

impl VariableData {
    /// The Zarr data type of the data.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Int8(_) => DataType::Int8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt8(_) => DataType::UInt8,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
        }
    }

    /// The number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        variable_data_dispatch!(self, values => values.len())
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fill value `xarray` writes for the data type.
    fn fill_value(&self) -> FillValueMetadataV2 {
        match self {
            Self::Float32(_) | Self::Float64(_) => FillValueMetadataV2::NaN,
            _ => FillValueMetadataV2::Null,
        }
    }

    /// Convert to classic netCDF values.
    ///
    /// # Errors
    /// Returns [`NetcdfError::UnsupportedType`] for unsigned and 64-bit integers, which the classic format cannot hold.
    pub fn to_nc_values(&self) -> Result<NcValues, NetcdfError> {
        match self {
            Self::Int8(values) => Ok(NcValues::Byte(values.clone())),
            Self::Int16(values) => Ok(NcValues::Short(values.clone())),
            Self::Int32(values) => Ok(NcValues::Int(values.clone())),
            Self::Float32(values) => Ok(NcValues::Float(values.clone())),
            Self::Float64(values) => Ok(NcValues::Double(values.clone())),
            Self::Int64(_) | Self::UInt8(_) => {
                Err(NetcdfError::UnsupportedType(self.data_type().name()))
            }
        }
    }
}

/// A variable: data over named dimensions, with attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    dimensions: Vec<String>,
    data: VariableData,
    attributes: Attributes,
}

impl Variable {
    /// Create a variable over `dimensions`.
    #[must_use]
    pub fn new(dimensions: Vec<String>, data: VariableData) -> Self {
        Self {
            dimensions,
            data,
            attributes: Attributes::new(),
        }
    }

    /// Create a zero-dimensional variable holding a single value.
    #[must_use]
    pub fn scalar(data: VariableData) -> Self {
        Self::new(vec![], data)
    }

    /// Set the variable attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// The dimension names.
    #[must_use]
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// The data.
    #[must_use]
    pub const fn data(&self) -> &VariableData {
        &self.data
    }

    /// The attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A dataset error.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A variable refers to an undefined dimension.
    #[error("variable {0:?} refers to unknown dimension {1:?}")]
    UnknownDimension(String, String),
    /// The number of elements does not match the variable shape.
    #[error("variable {0:?} has {1} elements, expected {2}")]
    ShapeMismatch(String, usize, u64),
    /// An attribute that cannot be written to a classic netCDF file.
    #[error("attribute {0:?} cannot be represented in a netCDF file")]
    UnsupportedAttribute(String),
    /// A netCDF error.
    #[error(transparent)]
    NetcdfError(#[from] NetcdfError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// A group creation error.
    #[error(transparent)]
    GroupCreateError(#[from] GroupCreateError),
    /// An array creation error.
    #[error(transparent)]
    ArrayCreateError(#[from] ArrayCreateError),
    /// An array error.
    #[error(transparent)]
    ArrayError(#[from] ArrayError),
}

/// An in-memory dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    attributes: Attributes,
    dimensions: Vec<(String, u64)>,
    variables: Vec<(String, Variable)>,
}

impl Dataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Define a dimension, replacing any existing dimension with the same name.
    pub fn add_dimension(&mut self, name: &str, length: u64) -> &mut Self {
        self.dimensions.retain(|(existing, _)| existing != name);
        self.dimensions.push((name.to_string(), length));
        self
    }

    /// Add a variable, replacing any existing variable with the same name.
    ///
    /// # Errors
    /// Returns a [`DatasetError`] if the variable refers to an unknown dimension or its data does not match its shape.
    pub fn add_variable(&mut self, name: &str, variable: Variable) -> Result<&mut Self, DatasetError> {
        let shape = self.shape(name, &variable)?;
        let expected: u64 = shape.iter().product();
        if variable.data.len() as u64 != expected {
            return Err(DatasetError::ShapeMismatch(
                name.to_string(),
                variable.data.len(),
                expected,
            ));
        }
        self.variables.retain(|(existing, _)| existing != name);
        self.variables.push((name.to_string(), variable));
        Ok(self)
    }

    /// Get a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, variable)| variable)
    }

    /// The global attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn shape(&self, name: &str, variable: &Variable) -> Result<Vec<u64>, DatasetError> {
        variable
            .dimensions
            .iter()
            .map(|dimension| {
                self.dimensions
                    .iter()
                    .find(|(existing, _)| existing == dimension)
                    .map(|(_, length)| *length)
                    .ok_or_else(|| DatasetError::UnknownDimension(name.to_string(), dimension.clone()))
            })
            .collect()
    }

    /// Build the classic netCDF representation of the dataset.
    ///
    /// # Errors
    /// Returns a [`DatasetError`] if a variable or attribute cannot be represented in the classic format.
    pub fn to_nc_file(&self) -> Result<NcFile, DatasetError> {
        let mut file = NcFile::new();
        for (name, length) in &self.dimensions {
            file.add_dimension(name, *length)?;
        }
        for (name, value) in &self.attributes {
            file.add_attribute(name, attribute_to_nc_values(name, value)?)?;
        }
        for (name, variable) in &self.variables {
            let attributes = variable
                .attributes
                .iter()
                .map(|(name, value)| {
                    Ok(NcAttribute {
                        name: name.clone(),
                        values: attribute_to_nc_values(name, value)?,
                    })
                })
                .collect::<Result<Vec<_>, DatasetError>>()?;
            let dimensions: Vec<&str> = variable.dimensions.iter().map(String::as_str).collect();
            file.add_variable(name, &dimensions, variable.data.to_nc_values()?, attributes)?;
        }
        Ok(file)
    }

    /// Write the dataset to a classic netCDF file at `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns a [`DatasetError`] if the dataset cannot be represented in the classic format or the file cannot be written.
    pub fn to_netcdf(&self, path: &Path) -> Result<(), DatasetError> {
        self.to_nc_file()?.write(path)?;
        info!(path = %path.display(), variables = self.variables.len(), "wrote netCDF dataset");
        Ok(())
    }

    /// Write the dataset to `storage` as a Zarr V2 hierarchy, replacing any existing content.
    ///
    /// If `consolidated` is set, the metadata of the hierarchy is consolidated into `.zmetadata`.
    ///
    /// # Errors
    /// Returns a [`DatasetError`] if there is an underlying store error.
    pub fn to_zarr<TStorage: ?Sized + ReadableWritableListableStorageTraits>(
        &self,
        storage: Arc<TStorage>,
        consolidated: bool,
    ) -> Result<(), DatasetError> {
        storage.erase_prefix(&StorePrefix::root())?;
        GroupBuilder::new()
            .attributes(self.attributes.clone())
            .build(storage.clone(), "/")?
            .store_metadata()?;

        for (name, variable) in &self.variables {
            let shape = self.shape(name, variable)?;
            let chunk_shape: Vec<u64> = shape.iter().map(|&length| length.max(1)).collect();
            let chunk_shape = ChunkShape::try_from(chunk_shape)
                .map_err(|_| DatasetError::ShapeMismatch(name.clone(), variable.data.len(), 0))?;
            let mut attributes = variable.attributes.clone();
            attributes.insert(
                ARRAY_DIMENSIONS_ATTRIBUTE.to_string(),
                variable.dimensions.clone().into(),
            );
            let array = ArrayBuilder::new(
                shape,
                variable.data.data_type(),
                chunk_shape,
                variable.data.fill_value(),
            )
            .attributes(attributes)
            .build(storage.clone(), &format!("/{name}"))?;
            array.store_metadata()?;
            variable_data_dispatch!(&variable.data, values => array.store_array_elements(values))?;
        }

        if consolidated {
            consolidate_metadata(&*storage)?;
        }
        info!(variables = self.variables.len(), consolidated, "wrote zarr dataset");
        Ok(())
    }
}

fn attribute_to_nc_values(name: &str, value: &serde_json::Value) -> Result<NcValues, DatasetError> {
    let unsupported = || DatasetError::UnsupportedAttribute(name.to_string());
    let number_values = |numbers: &[serde_json::Value]| -> Option<NcValues> {
        let ints = numbers
            .iter()
            .map(|n| n.as_i64().and_then(|i| i32::try_from(i).ok()))
            .collect::<Option<Vec<_>>>();
        ints.map(NcValues::Int).or_else(|| {
            numbers
                .iter()
                .map(serde_json::Value::as_f64)
                .collect::<Option<Vec<_>>>()
                .map(NcValues::Double)
        })
    };
    match value {
        serde_json::Value::String(string) => Ok(string.as_str().into()),
        serde_json::Value::Bool(flag) => Ok(NcValues::Byte(vec![i8::from(*flag)])),
        serde_json::Value::Number(_) => {
            number_values(std::slice::from_ref(value)).ok_or_else(unsupported)
        }
        serde_json::Value::Array(values) if !values.is_empty() => {
            number_values(values).ok_or_else(unsupported)
        }
        _ => Err(unsupported()),
    }
}
