//! Ordered key-value metadata attached to directives and postings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Amount;

/// A metadata value.
///
/// Exactly the nine cases a metadata value can take: a free string, an
/// account reference, a currency code, a tag reference, a calendar
/// date, a decimal number, a complete [`Amount`], a boolean, or the
/// null value produced by a key with no value (`key:`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaValue {
    /// String value
    String(String),
    /// Account reference
    Account(String),
    /// Currency code
    Currency(String),
    /// Tag reference
    Tag(String),
    /// Date value
    Date(NaiveDate),
    /// Numeric value
    Number(Decimal),
    /// Boolean value
    Bool(bool),
    /// Amount value
    Amount(Amount),
    /// Null value, produced by an empty metadata value (`key:`)
    None,
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Account(a) => write!(f, "{a}"),
            Self::Currency(c) => write!(f, "{c}"),
            Self::Tag(t) => write!(f, "#{t}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Amount(a) => write!(f, "{a}"),
            Self::None => write!(f, "None"),
        }
    }
}

/// An ordered key-value map, attached to directives and postings.
///
/// Insertion order is preserved so consumers can reproduce the
/// metadata block the way it was written. [`Metadata::insert_first`]
/// implements the duplicate-key rule: the first value assigned to a
/// key wins, and later assignments are reported to the caller instead
/// of silently overwriting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata(Vec<(String, MetaValue)>);

impl Metadata {
    /// Create an empty metadata map.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a key-value pair, overwriting any existing value.
    ///
    /// Prefer [`Metadata::insert_first`] when the duplicate-key
    /// diagnostic rule matters; this method exists for callers (tests,
    /// builders) constructing metadata directly.
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        let key = key.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Insert a key-value pair, keeping the first value on a
    /// duplicate key.
    ///
    /// Returns `true` if `key` already had a value (so the caller can
    /// emit a duplicate-key diagnostic), `false` if this is the first
    /// time `key` was seen.
    #[must_use = "a duplicate key should usually produce a diagnostic"]
    pub fn insert_first(&mut self, key: impl Into<String>, value: MetaValue) -> bool {
        let key = key.into();
        if self.0.iter().any(|(k, _)| *k == key) {
            true
        } else {
            self.0.push((key, value));
            false
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Check whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a str, &'a MetaValue);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, MetaValue)>,
        fn(&'a (String, MetaValue)) -> (&'a str, &'a MetaValue),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, MetaValue)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (String, MetaValue)>>(iter: T) -> Self {
        let mut meta = Self::new();
        for (k, v) in iter {
            meta.insert(k, v);
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_insert_first_keeps_first() {
        let mut meta = Metadata::new();
        assert!(!meta.insert_first("category", MetaValue::String("food".into())));
        assert!(meta.insert_first("category", MetaValue::String("drink".into())));
        assert_eq!(meta.get("category"), Some(&MetaValue::String("food".into())));
    }

    #[test]
    fn test_metadata_preserves_order() {
        let mut meta = Metadata::new();
        meta.insert("b", MetaValue::None);
        meta.insert("a", MetaValue::None);
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_metadata_display_none_value() {
        assert_eq!(format!("{}", MetaValue::None), "None");
    }
}
