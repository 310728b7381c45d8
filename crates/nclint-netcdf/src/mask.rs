//! Missing-value conventions applied on read.
//!
//! An element is masked when it equals `_FillValue` (or, without one, the
//! type's default fill value, except for byte types), equals any
//! `missing_value`, falls outside `valid_min`/`valid_max`/`valid_range`, or
//! is NaN. Packed data (`scale_factor`, `add_offset`) is unpacked after
//! masking. Character data is never masked.

use ndarray::{ArrayD, IxDyn};
use nclint_model::{Attributes, MaskedArray, NcType, Variable};

use crate::error::{NetcdfError, Result};

/// Missing-value rules of one variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskRules {
    fill: Option<f64>,
    missing: Vec<f64>,
    valid_min: Option<f64>,
    valid_max: Option<f64>,
    scale: Option<f64>,
    offset: Option<f64>,
    mask_nan: bool,
}

impl MaskRules {
    pub fn for_variable(variable: &Variable) -> Self {
        let attrs = &variable.attributes;
        if variable.nc_type == NcType::Char {
            return Self::default();
        }
        let fill = number(attrs, "_FillValue").or_else(|| {
            (!matches!(variable.nc_type, NcType::Byte | NcType::UByte))
                .then(|| variable.nc_type.default_fill())
        });
        let missing = attrs
            .get("missing_value")
            .and_then(|value| value.as_numbers())
            .map(<[f64]>::to_vec)
            .unwrap_or_default();
        let range = attrs
            .get("valid_range")
            .and_then(|value| value.as_numbers())
            .filter(|values| values.len() == 2);
        let valid_min = range
            .map(|values| values[0])
            .or_else(|| number(attrs, "valid_min"));
        let valid_max = range
            .map(|values| values[1])
            .or_else(|| number(attrs, "valid_max"));
        Self {
            fill,
            missing,
            valid_min,
            valid_max,
            scale: number(attrs, "scale_factor"),
            offset: number(attrs, "add_offset"),
            mask_nan: matches!(variable.nc_type, NcType::Float | NcType::Double),
        }
    }

    fn is_missing(&self, value: f64) -> bool {
        (self.mask_nan && value.is_nan())
            || self.fill == Some(value)
            || self.missing.contains(&value)
            || self.valid_min.is_some_and(|min| value < min)
            || self.valid_max.is_some_and(|max| value > max)
    }

    fn unpack(&self, value: f64) -> f64 {
        value * self.scale.unwrap_or(1.0) + self.offset.unwrap_or(0.0)
    }

    /// Packed representation of `value`, the inverse of unpacking.
    pub fn pack(&self, value: f64) -> f64 {
        (value - self.offset.unwrap_or(0.0)) / self.scale.unwrap_or(1.0)
    }

    /// Value written in place of a masked element.
    pub fn fill_value(variable: &Variable) -> f64 {
        number(&variable.attributes, "_FillValue").unwrap_or_else(|| variable.nc_type.default_fill())
    }

    /// Build a masked array from raw (packed) values.
    pub fn apply(&self, raw: Vec<f64>, shape: &[usize]) -> Result<MaskedArray> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), raw)
            .map_err(|e| NetcdfError::invalid_format(format!("data shape: {e}")))?;
        let mask = data.mapv(|value| self.is_missing(value));
        let data = if self.scale.is_some() || self.offset.is_some() {
            data.mapv(|value| self.unpack(value))
        } else {
            data
        };
        MaskedArray::with_mask(data, mask)
            .map_err(|e| NetcdfError::invalid_format(format!("mask shape: {e}")))
    }
}

fn number(attrs: &Attributes, name: &str) -> Option<f64> {
    attrs.get(name).and_then(|value| value.first_number())
}
