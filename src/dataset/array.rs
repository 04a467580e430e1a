//! Type-erased n-dimensional variable data

use crate::errors::{Result, ScraperError};
use ndarray::{ArrayD, Axis};

/// Variable payload in one of the numeric NetCDF types
#[derive(Debug, Clone, PartialEq)]
pub enum VarData {
    I8(ArrayD<i8>),
    U8(ArrayD<u8>),
    I16(ArrayD<i16>),
    U16(ArrayD<u16>),
    I32(ArrayD<i32>),
    U32(ArrayD<u32>),
    I64(ArrayD<i64>),
    U64(ArrayD<u64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

/// Applies `$body` to the inner array and re-wraps the result in the same variant.
macro_rules! map_array {
    ($data:expr, $arr:ident => $body:expr) => {
        match $data {
            VarData::I8($arr) => VarData::I8($body),
            VarData::U8($arr) => VarData::U8($body),
            VarData::I16($arr) => VarData::I16($body),
            VarData::U16($arr) => VarData::U16($body),
            VarData::I32($arr) => VarData::I32($body),
            VarData::U32($arr) => VarData::U32($body),
            VarData::I64($arr) => VarData::I64($body),
            VarData::U64($arr) => VarData::U64($body),
            VarData::F32($arr) => VarData::F32($body),
            VarData::F64($arr) => VarData::F64($body),
        }
    };
}

/// Applies `$body` to the inner array, whatever its element type.
macro_rules! with_array {
    ($data:expr, $arr:ident => $body:expr) => {
        match $data {
            VarData::I8($arr) => $body,
            VarData::U8($arr) => $body,
            VarData::I16($arr) => $body,
            VarData::U16($arr) => $body,
            VarData::I32($arr) => $body,
            VarData::U32($arr) => $body,
            VarData::I64($arr) => $body,
            VarData::U64($arr) => $body,
            VarData::F32($arr) => $body,
            VarData::F64($arr) => $body,
        }
    };
}

pub(crate) use with_array;

macro_rules! concat_parts {
    ($parts:expr, $axis:expr, $($variant:ident),+) => {
        match $parts[0] {
            $(VarData::$variant(_) => {
                let views = $parts
                    .iter()
                    .map(|part| match part {
                        VarData::$variant(arr) => Ok(arr.view()),
                        other => Err(ScraperError::conflict(format!(
                            "cannot concatenate {} data with {}",
                            stringify!($variant),
                            other.type_name()
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                VarData::$variant(ndarray::concatenate(Axis($axis), &views)?)
            })+
        }
    };
}

impl VarData {
    pub fn shape(&self) -> &[usize] {
        with_array!(self, arr => arr.shape())
    }

    pub fn len(&self) -> usize {
        with_array!(self, arr => arr.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            VarData::I8(_) => "i8",
            VarData::U8(_) => "u8",
            VarData::I16(_) => "i16",
            VarData::U16(_) => "u16",
            VarData::I32(_) => "i32",
            VarData::U32(_) => "u32",
            VarData::I64(_) => "i64",
            VarData::U64(_) => "u64",
            VarData::F32(_) => "f32",
            VarData::F64(_) => "f64",
        }
    }

    /// Keeps only `indices` along `axis`, in the given order.
    ///
    /// The result is always in standard (C) layout, which NetCDF writes require.
    pub fn select(&self, axis: usize, indices: &[usize]) -> VarData {
        map_array!(self, arr => arr
            .select(Axis(axis), indices)
            .as_standard_layout()
            .into_owned())
    }

    pub fn is_standard_layout(&self) -> bool {
        with_array!(self, arr => arr.is_standard_layout())
    }

    /// Joins `parts` end to end along `axis`. All parts must share a type.
    pub fn concatenate(parts: &[&VarData], axis: usize) -> Result<VarData> {
        if parts.is_empty() {
            return Err(ScraperError::conflict("nothing to concatenate"));
        }
        Ok(concat_parts!(parts, axis, I8, U8, I16, U16, I32, U32, I64, U64, F32, F64))
    }

    /// Flattened values widened to `f64`, used for coordinate lookups.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            VarData::I8(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::U8(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::I16(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::U16(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::I32(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::U32(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::I64(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::U64(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::F32(arr) => arr.iter().map(|&v| v as f64).collect(),
            VarData::F64(arr) => arr.iter().copied().collect(),
        }
    }
}
