//! Attribute values and ordered attribute lists.

use std::fmt;

use serde::Serialize;

use crate::types::NcType;

/// Value of a global or per-variable attribute.
///
/// Character attributes are decoded to text; every numeric attribute is
/// widened to `f64` and keeps its external type so writers can restore it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Numbers { nc_type: NcType, values: Vec<f64> },
}

impl AttrValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(nc_type: NcType, value: f64) -> Self {
        Self::Numbers {
            nc_type,
            values: vec![value],
        }
    }

    pub fn numbers(nc_type: NcType, values: Vec<f64>) -> Self {
        Self::Numbers { nc_type, values }
    }

    pub fn nc_type(&self) -> NcType {
        match self {
            Self::Text(_) => NcType::Char,
            Self::Numbers { nc_type, .. } => *nc_type,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Numbers { .. } => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Self::Text(_) => None,
            Self::Numbers { values, .. } => Some(values),
        }
    }

    pub fn first_number(&self) -> Option<f64> {
        self.as_numbers().and_then(|values| values.first().copied())
    }

    /// Number of stored elements (bytes for text).
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Numbers { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Numbers { nc_type, values } => {
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    if nc_type.is_integer() {
                        write!(f, "{}", *value as i128)?;
                    } else {
                        write!(f, "{value}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::number(NcType::Double, value)
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        Self::number(NcType::Float, f64::from(value))
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::number(NcType::Int, f64::from(value))
    }
}

/// A named attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

/// Attributes in file order. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attributes {
    items: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.items
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| &attr.value)
    }

    /// Presence test only; the value is never inspected.
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|attr| attr.name == name)
    }

    /// Text value of `name`, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_text)
    }

    /// Insert or replace `name`, keeping its position when replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.items.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => self.items.push(Attribute { name, value }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let idx = self.items.iter().position(|attr| attr.name == name)?;
        Some(self.items.remove(idx).value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.items.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|attr| attr.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<N: Into<String>, V: Into<AttrValue>> FromIterator<(N, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut attrs = Attributes::new();
        attrs.insert("title", "first");
        attrs.insert("contact", "someone");
        attrs.insert("title", "second");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["title", "contact"]);
        assert_eq!(attrs.text("title"), Some("second"));
    }

    #[test]
    fn test_empty_text_is_present() {
        let attrs: Attributes = [("comment", "")].into_iter().collect();
        assert!(attrs.contains("comment"));
        assert!(!attrs.contains("history"));
    }

    #[test]
    fn test_display_numbers() {
        let value = AttrValue::numbers(NcType::Int, vec![1.0, 2.0]);
        assert_eq!(value.to_string(), "1, 2");
        let value = AttrValue::from(0.5);
        assert_eq!(value.to_string(), "0.5");
    }
}
