//! NetCDF reading and writing for [`Dataset`]
//!
//! Reading copies every numeric variable into memory. Writing always creates
//! a new file; dimensions are written with fixed lengths.

use super::array::{with_array, VarData};
use super::{Attributes, DataVariable, Dataset, Dimension};
use crate::errors::Result;
use ndarray::ArrayD;
use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::{Attribute, FileMut, NcTypeDescriptor, Variable};
use std::path::Path;
use tracing::{debug, warn};

/// Deflate level applied to multi-dimensional variables on write.
const DEFLATE_LEVEL: i32 = 5;

impl Dataset {
    /// Reads the whole file at `path` into memory.
    pub fn open(path: &Path) -> Result<Dataset> {
        let file = netcdf::open(path)?;

        let dimensions = file
            .dimensions()
            .map(|d| Dimension {
                name: d.name(),
                len: d.len(),
            })
            .collect();

        let mut variables = Vec::new();
        for var in file.variables() {
            match read_data(&var)? {
                Some(data) => variables.push(DataVariable {
                    name: var.name(),
                    dims: var.dimensions().iter().map(|d| d.name()).collect(),
                    data,
                    attributes: collect_attributes(var.attributes())?,
                }),
                None => warn!(
                    file = %path.display(),
                    variable = %var.name(),
                    vartype = ?var.vartype(),
                    "Skipping variable with unsupported type"
                ),
            }
        }

        let attributes = collect_attributes(file.attributes())?;

        debug!(
            file = %path.display(),
            dimensions = ?file.dimensions().map(|d| d.name()).collect::<Vec<_>>(),
            variables = variables.len(),
            "Loaded dataset"
        );

        Ok(Dataset {
            dimensions,
            variables,
            attributes,
        })
    }

    /// Creates a new NetCDF file at `path` holding this dataset.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = netcdf::create(path)?;

        for dim in &self.dimensions {
            file.add_dimension(&dim.name, dim.len)?;
        }

        for (name, value) in &self.attributes {
            file.add_attribute(name, value.clone())?;
        }

        for var in &self.variables {
            with_array!(&var.data, arr => write_variable(&mut file, var, arr))?;
        }

        Ok(())
    }
}

fn read_data(var: &Variable) -> Result<Option<VarData>> {
    let data = match var.vartype() {
        NcVariableType::Int(IntType::I8) => VarData::I8(var.get::<i8, _>(..)?),
        NcVariableType::Int(IntType::U8) => VarData::U8(var.get::<u8, _>(..)?),
        NcVariableType::Int(IntType::I16) => VarData::I16(var.get::<i16, _>(..)?),
        NcVariableType::Int(IntType::U16) => VarData::U16(var.get::<u16, _>(..)?),
        NcVariableType::Int(IntType::I32) => VarData::I32(var.get::<i32, _>(..)?),
        NcVariableType::Int(IntType::U32) => VarData::U32(var.get::<u32, _>(..)?),
        NcVariableType::Int(IntType::I64) => VarData::I64(var.get::<i64, _>(..)?),
        NcVariableType::Int(IntType::U64) => VarData::U64(var.get::<u64, _>(..)?),
        NcVariableType::Float(FloatType::F32) => VarData::F32(var.get::<f32, _>(..)?),
        NcVariableType::Float(FloatType::F64) => VarData::F64(var.get::<f64, _>(..)?),
        _ => return Ok(None),
    };
    Ok(Some(data))
}

fn collect_attributes<'a>(attrs: impl Iterator<Item = Attribute<'a>>) -> Result<Attributes> {
    let mut out = Vec::new();
    for attr in attrs {
        out.push((attr.name().to_string(), attr.value()?));
    }
    Ok(out)
}

fn write_variable<T: NcTypeDescriptor + Copy>(
    file: &mut FileMut,
    var: &DataVariable,
    data: &ArrayD<T>,
) -> Result<()> {
    let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
    let mut out = file.add_variable::<T>(&var.name, &dims)?;

    // Zero-length dimensions are stored as unlimited and cannot be chunked.
    if dims.len() > 1 && !data.is_empty() {
        out.set_compression(DEFLATE_LEVEL, true)?;
    }
    for (name, value) in &var.attributes {
        out.put_attribute(name, value.clone())?;
    }
    // `put` only accepts contiguous C-order buffers.
    let data = data.as_standard_layout();
    if dims.is_empty() {
        out.put(data.view(), &[] as &[usize])?;
    } else if !data.is_empty() {
        out.put(data.view(), ..)?;
    }
    Ok(())
}
