//! In-memory dataset.
//!
//! Used to build fixtures: tests evaluate checks against it directly, and
//! the NetCDF writer serialises it to disk.

use crate::array::MaskedArray;
use crate::attributes::{AttrValue, Attributes};
use crate::dataset::{Dataset, Dimension, Variable};
use crate::error::{DatasetError, Result};
use crate::types::NcType;

#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    attributes: Attributes,
    dimensions: Vec<Dimension>,
    variables: Vec<Variable>,
    data: Vec<MaskedArray>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(name, value);
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<AttrValue> {
        self.attributes.remove(name)
    }

    /// Add a fixed-size dimension.
    pub fn add_dimension(&mut self, name: &str, len: usize) -> Result<()> {
        self.push_dimension(Dimension::new(name, len))
    }

    /// Add the record dimension. A dataset holds at most one.
    pub fn add_unlimited_dimension(&mut self, name: &str, len: usize) -> Result<()> {
        if self.dimensions.iter().any(|dim| dim.unlimited) {
            return Err(DatasetError::Duplicate {
                kind: "unlimited dimension",
                name: name.to_string(),
            });
        }
        self.push_dimension(Dimension::unlimited(name, len))
    }

    fn push_dimension(&mut self, dimension: Dimension) -> Result<()> {
        if self.dimension(&dimension.name).is_some() {
            return Err(DatasetError::Duplicate {
                kind: "dimension",
                name: dimension.name,
            });
        }
        self.dimensions.push(dimension);
        Ok(())
    }

    /// Add a variable over existing dimensions. The data shape must match
    /// the dimension lengths. Returns the new variable so callers can attach
    /// attributes.
    pub fn add_variable(
        &mut self,
        name: &str,
        dimensions: &[&str],
        nc_type: NcType,
        data: MaskedArray,
    ) -> Result<&mut Variable> {
        if self.variable(name).is_some() {
            return Err(DatasetError::Duplicate {
                kind: "variable",
                name: name.to_string(),
            });
        }
        let mut shape = Vec::with_capacity(dimensions.len());
        for dim_name in dimensions {
            let dim = self
                .dimension(dim_name)
                .ok_or_else(|| DatasetError::dimension_not_found(*dim_name))?;
            shape.push(dim.len);
        }
        if data.shape() != shape.as_slice() {
            return Err(DatasetError::ShapeMismatch {
                name: name.to_string(),
                expected: shape,
                actual: data.shape().to_vec(),
            });
        }
        self.variables.push(Variable {
            name: name.to_string(),
            dimensions: dimensions.iter().map(|dim| (*dim).to_string()).collect(),
            shape,
            nc_type,
            attributes: Attributes::new(),
        });
        self.data.push(data);
        let last = self.variables.len() - 1;
        Ok(&mut self.variables[last])
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|var| var.name == name)
    }

    pub fn data(&self, name: &str) -> Option<&MaskedArray> {
        let idx = self.index_of(name)?;
        self.data.get(idx)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|var| var.name == name)
    }
}

impl Dataset for MemoryDataset {
    fn global_attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn read(&self, variable: &Variable) -> Result<MaskedArray> {
        self.data(&variable.name)
            .cloned()
            .ok_or_else(|| DatasetError::variable_not_found(&variable.name))
    }

    fn read_layer(&self, variable: &Variable, index: usize) -> Result<MaskedArray> {
        let data = self
            .data(&variable.name)
            .ok_or_else(|| DatasetError::variable_not_found(&variable.name))?;
        let Some(len) = variable.len() else {
            return Err(DatasetError::ScalarVariable {
                name: variable.name.clone(),
            });
        };
        data.layer(index).ok_or_else(|| DatasetError::LayerOutOfBounds {
            name: variable.name.clone(),
            index,
            len,
        })
    }
}
