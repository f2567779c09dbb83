use serde_json::Value as JsonValue;

use super::record::{Fields, Record};

/// One field predicate. String filters match by case-insensitive substring,
/// everything else by equality; the tag makes that choice visible in the
/// type instead of inferred from the value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Exact equality on the JSON value. A missing field never matches.
    Equals(JsonValue),
    /// Case-insensitive substring match. Non-string fields never match.
    Contains(String),
}

impl FilterValue {
    /// Default tagging for an untyped filter value: strings become
    /// substring searches, everything else exact matches.
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::String(needle) => Self::Contains(needle),
            other => Self::Equals(other),
        }
    }

    pub fn matches(&self, actual: Option<&JsonValue>) -> bool {
        match self {
            Self::Equals(expected) => actual.is_some_and(|value| value == expected),
            Self::Contains(needle) => actual
                .and_then(JsonValue::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
        }
    }
}

/// Conjunction of field predicates. An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<(String, FilterValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every field with the default semantics, for callers passing
    /// plain field maps: substring search for strings, equality otherwise.
    pub fn from_fields(fields: Fields) -> Self {
        let predicates = fields
            .into_iter()
            .map(|(field, value)| (field, FilterValue::from_json(value)))
            .collect();
        Self { predicates }
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.predicates
            .push((field.into(), FilterValue::Equals(value.into())));
        self
    }

    pub fn contains(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.predicates
            .push((field.into(), FilterValue::Contains(needle.into())));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.predicates
            .iter()
            .all(|(field, predicate)| predicate.matches(record.get(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_filters_match_substring_case_insensitive() {
        let rec = record(json!({"id": 1, "make": "Toyota"}));
        assert!(Filter::new().contains("make", "toy").matches(&rec));
        assert!(Filter::new().contains("make", "YOTA").matches(&rec));
        assert!(!Filter::new().contains("make", "honda").matches(&rec));
    }

    #[test]
    fn test_non_string_filters_match_by_equality() {
        let rec = record(json!({"id": 1, "year": 2022}));
        assert!(Filter::new().equals("year", 2022).matches(&rec));
        assert!(!Filter::new().equals("year", 202).matches(&rec));
        assert!(!Filter::new().equals("year", 2023).matches(&rec));
    }

    #[test]
    fn test_from_fields_defaults_strings_to_substring() {
        let rec = record(json!({"id": 1, "make": "Toyota", "year": 2022}));
        let fields = match json!({"make": "toy", "year": 2022}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(Filter::from_fields(fields).matches(&rec));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let rec = record(json!({"id": 1}));
        assert!(!Filter::new().equals("year", 2022).matches(&rec));
        assert!(!Filter::new().contains("make", "toy").matches(&rec));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let rec = record(json!({"id": 1}));
        assert!(Filter::new().matches(&rec));
    }
}
