use thiserror::Error;

/// Errors raised while reading from a [`Dataset`](crate::Dataset).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("variable not found: {name}")]
    VariableNotFound { name: String },

    #[error("dimension not found: {name}")]
    DimensionNotFound { name: String },

    #[error("variable {name} is a scalar and has no layers")]
    ScalarVariable { name: String },

    #[error("layer {index} out of bounds for variable {name} with {len} layers")]
    LayerOutOfBounds {
        name: String,
        index: usize,
        len: usize,
    },

    #[error("shape mismatch for {name}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("duplicate {kind} name: {name}")]
    Duplicate { kind: &'static str, name: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by a file-format backend.
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

impl DatasetError {
    pub fn variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }

    pub fn dimension_not_found(name: impl Into<String>) -> Self {
        Self::DimensionNotFound { name: name.into() }
    }
}
