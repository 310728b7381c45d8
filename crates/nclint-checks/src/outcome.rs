//! Check outcomes.
//!
//! Every check produces an [`Outcome`]; the variant of [`Detail`] carried by
//! a failure depends on the kind of check, but callers only ever need
//! [`Outcome::passed`] / [`Outcome::failed`] to decide the verdict.

use std::fmt;

use nclint_standards::Table;
use serde::Serialize;

/// Result of evaluating one check against one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail(Detail),
}

impl Outcome {
    /// Boolean check result: `true` means the problem was found.
    pub fn from_flag(problem: bool) -> Self {
        if problem {
            Self::Fail(Detail::None)
        } else {
            Self::Pass
        }
    }

    /// Accumulating attribute check result. Empty means pass.
    pub fn from_missing(missing: Vec<MissingAttribute>) -> Self {
        if missing.is_empty() {
            Self::Pass
        } else {
            Self::Fail(Detail::Missing(missing))
        }
    }

    /// Names of offending items. Empty means pass.
    pub fn from_names(names: Vec<String>) -> Self {
        if names.is_empty() {
            Self::Pass
        } else {
            Self::Fail(Detail::Names(names))
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn failed(&self) -> bool {
        !self.passed()
    }

    pub fn detail(&self) -> Option<&Detail> {
        match self {
            Self::Pass => None,
            Self::Fail(detail) => Some(detail),
        }
    }
}

/// Why a check failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Detail {
    /// Boolean check; nothing more to say.
    None,
    /// Missing global attributes, in requirement order.
    Missing(Vec<MissingAttribute>),
    /// Offending dimension or variable names.
    Names(Vec<String>),
    /// A processing prerequisite that is unavailable.
    Reason { name: String, reason: String },
}

/// A required attribute that is absent, tagged with its source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingAttribute {
    pub name: String,
    pub table: Option<Table>,
}

impl MissingAttribute {
    pub fn new(name: impl Into<String>, table: Option<Table>) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

impl fmt::Display for MissingAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table {
            Some(table) => write!(f, "{} ({table})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("true"),
            Self::Missing(missing) => {
                for (idx, attr) in missing.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{attr}")?;
                }
                Ok(())
            }
            Self::Names(names) => f.write_str(&names.join(", ")),
            Self::Reason { name, reason } => write!(f, "{name}: {reason}"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("passed"),
            Self::Fail(detail) => write!(f, "{detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_pass() {
        assert!(Outcome::from_missing(Vec::new()).passed());
        assert!(Outcome::from_names(Vec::new()).passed());
        assert!(Outcome::from_flag(false).passed());
        assert!(Outcome::from_flag(true).failed());
    }

    #[test]
    fn test_detail_display() {
        let outcome = Outcome::from_missing(vec![
            MissingAttribute::new("hydromodel_type", Some(Table::E)),
            MissingAttribute::new("title", Some(Table::Cf)),
        ]);
        assert_eq!(
            outcome.to_string(),
            "hydromodel_type (Table E), title (CF)"
        );

        let reason = Detail::Reason {
            name: "time_var".to_string(),
            reason: "no time variable found".to_string(),
        };
        assert_eq!(reason.to_string(), "time_var: no time variable found");
        assert_eq!(
            Detail::Names(vec!["lat".into(), "lon".into()]).to_string(),
            "lat, lon"
        );
    }

    #[test]
    fn test_serialize_failure() {
        let outcome = Outcome::from_names(vec!["time".to_string()]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "fail");
        assert_eq!(json["detail"]["kind"], "names");
    }
}
