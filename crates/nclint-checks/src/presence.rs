//! Attribute presence rule.

use nclint_model::Attributes;
use nclint_standards::AttributeSet;

use crate::outcome::MissingAttribute;

/// Names in `required` that `attributes` has no key for, in `required`
/// order. Presence only: an empty-string value counts as present.
pub fn missing_attrs<'a, I>(attributes: &Attributes, required: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    required
        .into_iter()
        .filter(|name| !attributes.contains(name))
        .collect()
}

/// [`missing_attrs`] over an attribute set, tagged with the set's table.
pub fn missing_from_set(attributes: &Attributes, set: &AttributeSet) -> Vec<MissingAttribute> {
    missing_attrs(attributes, set.iter())
        .into_iter()
        .map(|name| MissingAttribute::new(name, set.table()))
        .collect()
}
