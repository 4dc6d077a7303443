//! Minimal field diffs.

use crate::error::UpdateError;
use crate::payload::supplied;
use mercy_store::Document;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Field assignments staged for a single write.
///
/// A field is staged only when the payload supplies a non-empty value that
/// decodes into the field's type and differs from the current value. The
/// payload's own JSON representation is what gets written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    fields: Document,
}

impl Diff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `field` if the payload's value differs from `current`.
    pub fn stage<T>(&mut self, payload: &Document, field: &str, current: &T) -> Result<(), UpdateError>
    where
        T: DeserializeOwned + PartialEq,
    {
        self.stage_by(payload, field, |new: &T| new != current)
    }

    /// Stage `field` if `changed` holds for the decoded payload value.
    pub fn stage_by<T, F>(&mut self, payload: &Document, field: &str, changed: F) -> Result<(), UpdateError>
    where
        T: DeserializeOwned,
        F: FnOnce(&T) -> bool,
    {
        let Some(raw) = supplied(payload, field) else {
            return Ok(());
        };
        let value: T = serde_json::from_value(raw.clone()).map_err(|_| UpdateError::InvalidField {
            field: field.to_string(),
        })?;
        if changed(&value) {
            self.fields.insert(field.to_string(), raw.clone());
        }
        Ok(())
    }

    /// Stage a precomputed value unconditionally.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn into_fields(self) -> Document {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_unchanged_and_absent_fields_are_skipped() {
        let p = payload(json!({"name": "A", "price": 20}));
        let mut diff = Diff::new();
        diff.stage(&p, "name", &"A".to_string()).unwrap();
        diff.stage(&p, "price", &Some(10.0_f64)).unwrap();
        diff.stage(&p, "rent", &Some(1.0_f64)).unwrap();

        assert_eq!(diff.into_fields(), payload(json!({"price": 20})));
    }

    #[test]
    fn test_empty_values_are_not_supplied() {
        let p = payload(json!({"name": "", "phone": null}));
        let mut diff = Diff::new();
        diff.stage(&p, "name", &"A".to_string()).unwrap();
        diff.stage(&p, "phone", &Some("1".to_string())).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn test_false_is_a_real_value() {
        let p = payload(json!({"active": false}));
        let mut diff = Diff::new();
        diff.stage(&p, "active", &true).unwrap();
        assert_eq!(diff.get("active"), Some(&json!(false)));
    }

    #[test]
    fn test_type_mismatch_is_invalid() {
        let p = payload(json!({"poorLv": "high"}));
        let mut diff = Diff::new();
        let err = diff.stage(&p, "poorLv", &Some(1_u32)).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidField { field } if field == "poorLv"));
    }

    #[test]
    fn test_stage_by_custom_comparison() {
        let p = payload(json!({"tags": ["b", "a"]}));
        let current = vec!["a".to_string(), "b".to_string()];
        let mut diff = Diff::new();
        diff.stage_by(&p, "tags", |new: &Vec<String>| {
            let mut sorted = new.clone();
            sorted.sort();
            sorted != current
        })
        .unwrap();
        assert!(diff.is_empty());
    }
}
