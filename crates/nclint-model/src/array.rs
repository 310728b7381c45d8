//! Masked N-dimensional arrays.
//!
//! A [`MaskedArray`] pairs an `f64` array with an optional boolean mask
//! (`true` = missing). The mask is only kept when at least one element is
//! masked, so [`MaskedArray::is_masked`] answers both "is this a masked
//! array" and "does it hold a missing value".

use ndarray::{ArrayD, Axis, ErrorKind, IxDyn, ShapeError};

#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray {
    data: ArrayD<f64>,
    mask: Option<ArrayD<bool>>,
}

impl MaskedArray {
    /// Wrap data with no missing values.
    pub fn new(data: ArrayD<f64>) -> Self {
        Self { data, mask: None }
    }

    pub fn from_shape_vec(shape: &[usize], values: Vec<f64>) -> Result<Self, ShapeError> {
        Ok(Self::new(ArrayD::from_shape_vec(IxDyn(shape), values)?))
    }

    /// Array of `shape` with every element set to `value`.
    pub fn filled(shape: &[usize], value: f64) -> Self {
        Self::new(ArrayD::from_elem(IxDyn(shape), value))
    }

    /// Pair data with an explicit mask of the same shape.
    pub fn with_mask(data: ArrayD<f64>, mask: ArrayD<bool>) -> Result<Self, ShapeError> {
        if data.shape() != mask.shape() {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape));
        }
        Ok(Self::normalized(data, mask))
    }

    /// Mask every element for which `predicate` holds.
    pub fn masked_where(data: ArrayD<f64>, predicate: impl Fn(f64) -> bool) -> Self {
        let mask = data.mapv(predicate);
        Self::normalized(data, mask)
    }

    /// The same data with every element masked.
    pub fn fully_masked(self) -> Self {
        let mask = ArrayD::from_elem(self.data.raw_dim(), true);
        Self::normalized(self.data, mask)
    }

    fn normalized(data: ArrayD<f64>, mask: ArrayD<bool>) -> Self {
        let mask = mask.iter().any(|&masked| masked).then_some(mask);
        Self { data, mask }
    }

    /// Mask or unmask the element at `index`. Returns false when the index
    /// is out of bounds.
    pub fn set_masked(&mut self, index: &[usize], masked: bool) -> bool {
        if self.data.get(index).is_none() {
            return false;
        }
        let mut mask = self
            .mask
            .take()
            .unwrap_or_else(|| ArrayD::from_elem(self.data.raw_dim(), false));
        if let Some(cell) = mask.get_mut(index) {
            *cell = masked;
        }
        self.mask = mask.iter().any(|&m| m).then_some(mask);
        true
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn mask(&self) -> Option<&ArrayD<bool>> {
        self.mask.as_ref()
    }

    /// True when at least one element is masked.
    pub fn is_masked(&self) -> bool {
        self.mask.is_some()
    }

    /// True when the array is masked and every element is missing.
    pub fn all_masked(&self) -> bool {
        self.mask
            .as_ref()
            .is_some_and(|mask| mask.iter().all(|&masked| masked))
    }

    pub fn masked_count(&self) -> usize {
        self.mask
            .as_ref()
            .map_or(0, |mask| mask.iter().filter(|&&masked| masked).count())
    }

    pub fn is_masked_at(&self, index: &[usize]) -> bool {
        self.mask
            .as_ref()
            .and_then(|mask| mask.get(index).copied())
            .unwrap_or(false)
    }

    /// Sub-array at `index` along the leftmost axis.
    pub fn layer(&self, index: usize) -> Option<Self> {
        if self.data.ndim() == 0 || index >= self.data.shape()[0] {
            return None;
        }
        let data = self.data.index_axis(Axis(0), index).to_owned();
        match &self.mask {
            Some(mask) => {
                let mask = mask.index_axis(Axis(0), index).to_owned();
                Some(Self::normalized(data, mask))
            }
            None => Some(Self::new(data)),
        }
    }

    /// Elements in logical order, `None` where masked.
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        let mut mask = self.mask.as_ref().map(|mask| mask.iter());
        self.data.iter().map(move |&value| {
            let masked = mask
                .as_mut()
                .and_then(Iterator::next)
                .copied()
                .unwrap_or(false);
            (!masked).then_some(value)
        })
    }

    /// Unmasked elements in logical order.
    pub fn compressed(&self) -> Vec<f64> {
        self.values().flatten().collect()
    }
}

impl From<ArrayD<f64>> for MaskedArray {
    fn from(data: ArrayD<f64>) -> Self {
        Self::new(data)
    }
}
