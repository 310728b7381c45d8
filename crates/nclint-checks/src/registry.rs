//! Check registry.
//!
//! Checks are registered once, in a fixed order, and looked up by name.
//! Composite checks refer to their components by name; a component must be
//! registered before the composite that uses it, so the composition graph
//! can never contain a cycle.

use std::collections::HashMap;
use std::fmt;

use nclint_model::{Dataset, DatasetError};
use nclint_standards::AttributeSet;

use crate::error::RegistryError;
use crate::outcome::{Detail, MissingAttribute, Outcome};
use crate::presence::missing_from_set;

/// Function evaluated by a [`CheckKind::Predicate`] check.
pub type CheckFn = dyn Fn(&dyn Dataset) -> Result<Outcome, DatasetError> + Send + Sync;

/// How a check computes its outcome.
pub enum CheckKind {
    /// Accumulating presence check over one attribute set.
    Attributes(&'static AttributeSet),
    /// Arbitrary check over the dataset.
    Predicate(Box<CheckFn>),
    /// Every component evaluated; missing attribute lists concatenated,
    /// duplicate names collapsed (first occurrence kept).
    AllOf(Vec<String>),
    /// Components evaluated in order; the first failure is returned and the
    /// rest are skipped.
    AnyOf(Vec<String>),
}

impl CheckKind {
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&dyn Dataset) -> Result<Outcome, DatasetError> + Send + Sync + 'static,
    {
        Self::Predicate(Box::new(check))
    }

    pub fn all_of(components: &[&str]) -> Self {
        Self::AllOf(components.iter().map(ToString::to_string).collect())
    }

    pub fn any_of(components: &[&str]) -> Self {
        Self::AnyOf(components.iter().map(ToString::to_string).collect())
    }

    /// True when the check yields missing-attribute lists.
    fn accumulates(&self) -> bool {
        matches!(self, Self::Attributes(_) | Self::AllOf(_))
    }

    fn components(&self) -> &[String] {
        match self {
            Self::AllOf(names) | Self::AnyOf(names) => names,
            Self::Attributes(_) | Self::Predicate(_) => &[],
        }
    }
}

impl fmt::Debug for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attributes(set) => f.debug_tuple("Attributes").field(&set.role()).finish(),
            Self::Predicate(_) => f.write_str("Predicate"),
            Self::AllOf(names) => f.debug_tuple("AllOf").field(names).finish(),
            Self::AnyOf(names) => f.debug_tuple("AnyOf").field(names).finish(),
        }
    }
}

/// A named, documented check.
#[derive(Debug)]
pub struct Check {
    name: String,
    doc: String,
    kind: CheckKind,
}

impl Check {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full description.
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// First line of the description.
    pub fn summary(&self) -> &str {
        self.doc.lines().next().unwrap_or_default()
    }

    pub fn kind(&self) -> &CheckKind {
        &self.kind
    }
}

/// Name to check mapping, in registration order.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    checks: Vec<Check>,
    index: HashMap<String, usize>,
}

impl CheckRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check.
    ///
    /// Fails on a duplicate name, on a composite with no components or with
    /// a component that is not registered yet, and on an [`CheckKind::AllOf`]
    /// over a check that does not produce missing-attribute lists.
    pub fn register(
        &mut self,
        name: &str,
        kind: CheckKind,
        doc: impl Into<String>,
    ) -> Result<(), RegistryError> {
        if self.index.contains_key(name) {
            return Err(RegistryError::Duplicate {
                name: name.to_string(),
            });
        }
        if matches!(kind, CheckKind::AllOf(_) | CheckKind::AnyOf(_))
            && kind.components().is_empty()
        {
            return Err(RegistryError::EmptyComposite {
                name: name.to_string(),
            });
        }
        for component in kind.components() {
            let Some(check) = self.get(component) else {
                return Err(RegistryError::UnknownComponent {
                    name: name.to_string(),
                    component: component.clone(),
                });
            };
            if matches!(kind, CheckKind::AllOf(_)) && !check.kind.accumulates() {
                return Err(RegistryError::NotAttributeCheck {
                    name: name.to_string(),
                    component: component.clone(),
                });
            }
        }

        self.index.insert(name.to_string(), self.checks.len());
        self.checks.push(Check {
            name: name.to_string(),
            doc: doc.into(),
            kind,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Check> {
        self.index.get(name).map(|&idx| &self.checks[idx])
    }

    /// Look up a check by name.
    pub fn lookup(&self, name: &str) -> Result<&Check, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::UnknownCheck {
            name: name.to_string(),
        })
    }

    /// Look up every name of a comma-separated list, failing on the first
    /// unknown one. Names are matched exactly, whitespace included.
    pub fn resolve(&self, list: &str) -> Result<Vec<&Check>, RegistryError> {
        list.split(',').map(|name| self.lookup(name)).collect()
    }

    /// Check names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(Check::name)
    }

    /// `(name, doc)` pairs in registration order.
    pub fn list_with_docs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.checks.iter().map(|check| (check.name(), check.doc()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Evaluate `check` against `dataset`.
    pub fn evaluate(&self, check: &Check, dataset: &dyn Dataset) -> Result<Outcome, DatasetError> {
        match &check.kind {
            CheckKind::Attributes(set) => Ok(Outcome::from_missing(missing_from_set(
                dataset.global_attributes(),
                set,
            ))),
            CheckKind::Predicate(predicate) => predicate(dataset),
            CheckKind::AllOf(components) => {
                let mut missing: Vec<MissingAttribute> = Vec::new();
                for component in components {
                    let outcome = self.evaluate(self.component(component), dataset)?;
                    if let Outcome::Fail(Detail::Missing(found)) = outcome {
                        for attr in found {
                            if !missing.iter().any(|m| m.name == attr.name) {
                                missing.push(attr);
                            }
                        }
                    }
                }
                Ok(Outcome::from_missing(missing))
            }
            CheckKind::AnyOf(components) => {
                for component in components {
                    let outcome = self.evaluate(self.component(component), dataset)?;
                    if outcome.failed() {
                        return Ok(outcome);
                    }
                }
                Ok(Outcome::Pass)
            }
        }
    }

    /// Collapsed union of the global attribute names `check` requires.
    pub fn required_attributes(&self, check: &Check) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        self.collect_required(check, &mut names);
        names
    }

    fn collect_required(&self, check: &Check, names: &mut Vec<String>) {
        match &check.kind {
            CheckKind::Attributes(set) => {
                for name in set.iter() {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
            }
            CheckKind::Predicate(_) => {}
            CheckKind::AllOf(components) | CheckKind::AnyOf(components) => {
                for component in components {
                    self.collect_required(self.component(component), names);
                }
            }
        }
    }

    fn component(&self, name: &str) -> &Check {
        // Components are validated in `register` and checks are never removed.
        &self.checks[self.index[name]]
    }
}

#[cfg(test)]
mod tests {
    use nclint_model::MemoryDataset;
    use nclint_standards::{CF, MODEL_FORCING_GENERAL_MANDATORY};

    use super::*;

    fn registry() -> CheckRegistry {
        let mut registry = CheckRegistry::new();
        registry
            .register("cf", CheckKind::Attributes(&CF), "CF attributes")
            .unwrap();
        registry
            .register(
                "forcing",
                CheckKind::Attributes(&MODEL_FORCING_GENERAL_MANDATORY),
                "forcing",
            )
            .unwrap();
        registry
            .register(
                "always",
                CheckKind::predicate(|_| Ok(Outcome::from_flag(true))),
                "always fails",
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = registry();
        let err = registry
            .register("cf", CheckKind::Attributes(&CF), "again")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { .. }));
    }

    #[test]
    fn test_component_must_exist() {
        let mut registry = registry();
        let err = registry
            .register("later", CheckKind::any_of(&["cf", "later"]), "self reference")
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnknownComponent { ref component, .. } if component == "later"
        ));
        assert!(registry.get("later").is_none());
    }

    #[test]
    fn test_all_of_needs_attribute_checks() {
        let mut registry = registry();
        let err = registry
            .register("mixed", CheckKind::all_of(&["cf", "always"]), "mixed")
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAttributeCheck { .. }));
        let err = registry
            .register("empty", CheckKind::AnyOf(Vec::new()), "empty")
            .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyComposite { .. }));
    }

    #[test]
    fn test_resolve() {
        let registry = registry();
        let checks = registry.resolve("cf,always").unwrap();
        assert_eq!(checks.len(), 2);
        let err = registry.resolve("cf,nope,always").unwrap_err();
        assert_eq!(err.to_string(), "NetCDF check 'nope' does not exist");
    }

    #[test]
    fn test_resolve_matches_names_exactly() {
        let registry = registry();
        let err = registry.resolve("cf, always").unwrap_err();
        assert_eq!(err.to_string(), "NetCDF check ' always' does not exist");
        assert!(registry.resolve("cf,").is_err());
    }

    #[test]
    fn test_all_of_collapses_duplicates() {
        let mut registry = registry();
        registry
            .register("both", CheckKind::all_of(&["cf", "forcing", "cf"]), "both")
            .unwrap();
        let ds = MemoryDataset::new().with_attribute("title", "t");
        let both = registry.lookup("both").unwrap();
        let outcome = registry.evaluate(both, &ds).unwrap();
        let Some(Detail::Missing(missing)) = outcome.detail() else {
            panic!("expected missing attributes, got {outcome:?}");
        };
        let names: Vec<&str> = missing.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            ["institution", "source", "history", "references", "comment", "forcing_type"]
        );
        assert_eq!(
            registry.required_attributes(both).len(),
            CF.len() + MODEL_FORCING_GENERAL_MANDATORY.len()
        );
    }

    #[test]
    fn test_names_in_registration_order() {
        let registry = registry();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["cf", "forcing", "always"]);
        assert_eq!(registry.lookup("cf").unwrap().summary(), "CF attributes");
    }
}
