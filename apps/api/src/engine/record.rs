//! Scorable records — the caller-supplied input to every scoring call.
//!
//! A record is an id plus a flat map of named attributes. The engine never
//! persists a record; it is constructed, scored, and discarded within one
//! request.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single attribute value on a record.
///
/// Untagged so handler JSON maps naturally: `true` → Bool, `42.5` → Number,
/// `"2025-06-01"` → Date, `["a","b"]` → Tags, any other string → Text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Tags(Vec<String>),
    Text(String),
}

/// An opaque domain entity (offer, contact, response entry, metric set)
/// identified by an id and a mapping of named attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorableRecord {
    pub id: String,
    pub attrs: BTreeMap<String, AttrValue>,
}

impl ScorableRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_number(mut self, name: &str, value: f64) -> Self {
        self.attrs.insert(name.to_string(), AttrValue::Number(value));
        self
    }

    pub fn with_bool(mut self, name: &str, value: bool) -> Self {
        self.attrs.insert(name.to_string(), AttrValue::Bool(value));
        self
    }

    pub fn with_date(mut self, name: &str, value: NaiveDate) -> Self {
        self.attrs.insert(name.to_string(), AttrValue::Date(value));
        self
    }

    pub fn with_tags(mut self, name: &str, tags: Vec<String>) -> Self {
        self.attrs.insert(name.to_string(), AttrValue::Tags(tags));
        self
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .insert(name.to_string(), AttrValue::Text(value.to_string()));
        self
    }

    /// Numeric attribute, or None if absent or differently typed.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.attrs.get(name) {
            Some(AttrValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.attrs.get(name) {
            Some(AttrValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.attrs.get(name) {
            Some(AttrValue::Date(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn tags(&self, name: &str) -> Option<&[String]> {
        match self.attrs.get(name) {
            Some(AttrValue::Tags(t)) => Some(t.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors_return_none_on_type_mismatch() {
        let record = ScorableRecord::new("r1")
            .with_text("salary", "lots")
            .with_number("pto", 20.0);

        assert_eq!(record.number("salary"), None);
        assert_eq!(record.number("pto"), Some(20.0));
        assert_eq!(record.number("absent"), None);
    }

    #[test]
    fn test_attr_value_deserializes_untagged() {
        let record: ScorableRecord = serde_json::from_str(
            r#"{
                "id": "offer-1",
                "attrs": {
                    "remote": true,
                    "total_compensation": 150000,
                    "start_date": "2025-06-01",
                    "tags": ["rust", "backend"],
                    "company": "Acme"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(record.flag("remote"), Some(true));
        assert_eq!(record.number("total_compensation"), Some(150000.0));
        assert_eq!(
            record.date("start_date"),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert_eq!(record.tags("tags").map(|t| t.len()), Some(2));
        assert!(matches!(
            record.attrs.get("company"),
            Some(AttrValue::Text(_))
        ));
    }
}
