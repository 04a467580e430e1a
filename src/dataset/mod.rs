//! In-memory NetCDF datasets
//!
//! A [`Dataset`] is a full copy of a NetCDF file: its dimensions, numeric
//! variables and attributes. Cropping and period merging operate on this
//! structure and write a fresh file instead of editing the input in place.
//!
//! ## Module Organization
//!
//! - [`array`]: type-erased variable payloads
//! - [`io`]: reading from and writing to NetCDF files
//! - [`ops`]: label-based selection and concatenation

pub mod array;
pub mod io;
pub mod ops;

pub use array::VarData;

use netcdf::AttributeValue;

/// Name of the dimension period merges concatenate along.
pub const TIME_DIM: &str = "time";

/// Named dimension and its length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

/// Attribute name and value, in file order
pub type Attributes = Vec<(String, AttributeValue)>;

/// A variable with its dimension names, data and attributes
#[derive(Debug, Clone)]
pub struct DataVariable {
    pub name: String,
    pub dims: Vec<String>,
    pub data: VarData,
    pub attributes: Attributes,
}

impl DataVariable {
    /// Position of `dim` among this variable's dimensions.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// String value of an attribute, if present and textual.
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, value)| match value {
                AttributeValue::Str(s) => Some(s.as_str()),
                _ => None,
            })
    }
}

/// Dimensions, variables and global attributes of a NetCDF file
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<DataVariable>,
    pub attributes: Attributes,
}

impl Dataset {
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&DataVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Values of a one-dimensional coordinate variable as `f64`.
    pub fn coordinate_values(&self, name: &str) -> Option<Vec<f64>> {
        self.variable(name)
            .filter(|v| v.dims.len() == 1)
            .map(|v| v.data.to_f64_vec())
    }

    /// Replaces or appends a global attribute.
    pub fn set_attribute<V: Into<AttributeValue>>(&mut self, name: &str, value: V) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Prepends a line to the `history` global attribute.
    pub fn record_history(&mut self, line: &str) {
        let previous = self.attributes.iter().find_map(|(n, v)| match v {
            AttributeValue::Str(s) if n == "history" => Some(s.clone()),
            _ => None,
        });
        let history = match previous {
            Some(prev) if !prev.is_empty() => format!("{line}\n{prev}"),
            _ => line.to_string(),
        };
        self.set_attribute("history", history);
    }

    /// True when any dimension has zero length.
    pub fn is_empty(&self) -> bool {
        self.dimensions.iter().any(|d| d.len == 0)
    }
}
