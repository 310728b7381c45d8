//! The read-only file handle contract shared by every backend.

use serde::Serialize;

use crate::array::MaskedArray;
use crate::attributes::{AttrValue, Attributes};
use crate::error::Result;
use crate::types::NcType;

/// A named dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
    /// True for the record (unlimited) dimension.
    pub unlimited: bool,
}

impl Dimension {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
            unlimited: false,
        }
    }

    pub fn unlimited(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
            unlimited: true,
        }
    }
}

/// Variable metadata. Data is read through [`Dataset::read`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub dimensions: Vec<String>,
    pub shape: Vec<usize>,
    pub nc_type: NcType,
    pub attributes: Attributes,
}

impl Variable {
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// A coordinate variable is one-dimensional and named after its dimension.
    pub fn is_coordinate(&self) -> bool {
        self.dimensions.len() == 1 && self.dimensions[0] == self.name
    }

    /// Length of the leftmost axis; `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        self.shape.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }
}

/// Read-only view of an open gridded dataset.
///
/// Implementations keep variables and dimensions in file order; the checks
/// rely on that order for reproducible diagnostics.
pub trait Dataset {
    /// File-level attributes.
    fn global_attributes(&self) -> &Attributes;

    fn dimensions(&self) -> &[Dimension];

    fn variables(&self) -> &[Variable];

    /// Read the full data of `variable`.
    fn read(&self, variable: &Variable) -> Result<MaskedArray>;

    /// Read the slab at `index` along the leftmost axis of `variable`.
    fn read_layer(&self, variable: &Variable, index: usize) -> Result<MaskedArray>;

    fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables().iter().find(|var| var.name == name)
    }

    fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions().iter().find(|dim| dim.name == name)
    }

    fn has_global_attribute(&self, name: &str) -> bool {
        self.global_attributes().contains(name)
    }
}
