//! Error types for check registration and evaluation.

use nclint_model::DatasetError;
use thiserror::Error;

/// Errors raised while building or querying a check registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Requested check is not registered.
    #[error("NetCDF check '{name}' does not exist")]
    UnknownCheck { name: String },

    #[error("check '{name}' is already registered")]
    Duplicate { name: String },

    /// Composite refers to a check that is not registered before it.
    #[error("check '{name}' refers to '{component}', which is not registered before it")]
    UnknownComponent { name: String, component: String },

    /// Accumulating composite over a check without missing-attribute lists.
    #[error("check '{name}' accumulates '{component}', which is not an attribute check")]
    NotAttributeCheck { name: String, component: String },

    #[error("composite check '{name}' has no components")]
    EmptyComposite { name: String },
}

/// Errors raised while evaluating a processability property.
///
/// These never escape a check: they become the reason of a failing
/// outcome.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("no time variable found")]
    NoTimeVariable,

    #[error("several time variables found: {}", names.join(", "))]
    AmbiguousTimeVariable { names: Vec<String> },

    #[error("time variable {variable} has no units attribute")]
    MissingTimeUnits { variable: String },

    #[error("unsupported time units '{units}'")]
    TimeUnits { units: String },

    #[error("unsupported calendar '{calendar}'")]
    Calendar { calendar: String },

    #[error("time value {value} is out of range for the {calendar} calendar")]
    DateOutOfRange { value: f64, calendar: String },

    #[error("time variable {variable} has no unmasked values")]
    NoTimeValues { variable: String },

    #[error("missing global attribute '{name}'")]
    MissingAttribute { name: String },

    #[error("no dependent variables found")]
    NoDependentVariables,

    #[error(transparent)]
    Read(#[from] DatasetError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_check_message() {
        let err = RegistryError::UnknownCheck {
            name: "layer_two_missing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "NetCDF check 'layer_two_missing' does not exist"
        );
    }

    #[test]
    fn test_ambiguous_time_message() {
        let err = PropertyError::AmbiguousTimeVariable {
            names: vec!["t1".to_string(), "t2".to_string()],
        };
        assert_eq!(err.to_string(), "several time variables found: t1, t2");
    }
}
