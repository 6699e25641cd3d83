// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::{Map, Value};

use crate::RecordId;

/// Keys probed, in order, for a record's identifier.
pub const ID_KEYS: [&str; 2] = ["_id", "id"];

/// One row of a remote collection. The field map is kept as returned by the
/// server; only the identifier is lifted out.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        Self::from_fields(fields)
    }

    pub fn from_fields(fields: Map<String, Value>) -> Option<Self> {
        let id = ID_KEYS
            .iter()
            .find_map(|key| fields.get(*key).and_then(id_from_value))?;
        Some(Self { id, fields })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Field value, with JSON `null` treated the same as a missing key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    pub fn text(&self, key: &str) -> String {
        self.field(key).map(stringify).unwrap_or_default()
    }

    pub fn list(&self, key: &str) -> &[Value] {
        self.field(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn id_from_value(value: &Value) -> Option<RecordId> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(RecordId::new(text.as_str())),
        Value::Number(number) => Some(RecordId::new(number_text(number))),
        _ => None,
    }
}

/// Display text for a JSON value: strings verbatim, integral numbers without
/// a fraction, arrays comma-joined.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_text(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Integral value of a JSON number, accepting floats with no fractional part.
pub fn integral_value(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    let float = number.as_f64()?;
    if float.fract() == 0.0 && float.is_finite() && float.abs() < i64::MAX as f64 {
        return Some(float as i64);
    }
    None
}

fn number_text(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(float) = number.as_f64()
        && float.fract() == 0.0
        && float.abs() < i64::MAX as f64
    {
        return (float as i64).to_string();
    }
    number.to_string()
}

#[cfg(test)]
mod tests {
    use super::{Record, integral_value, stringify};
    use crate::RecordId;
    use serde_json::json;

    #[test]
    fn identifier_prefers_document_id_over_plain_id() {
        let record = Record::from_value(json!({"_id": "abc", "id": 7})).expect("record");
        assert_eq!(record.id(), &RecordId::from("abc"));
    }

    #[test]
    fn numeric_identifier_is_rendered_in_decimal() {
        let record = Record::from_value(json!({"id": 42, "name": "Beach Inn"})).expect("record");
        assert_eq!(record.id().as_str(), "42");
    }

    #[test]
    fn values_without_identifier_are_rejected() {
        assert!(Record::from_value(json!({"name": "nameless"})).is_none());
        assert!(Record::from_value(json!({"_id": "  "})).is_none());
        assert!(Record::from_value(json!(["not", "an", "object"])).is_none());
    }

    #[test]
    fn null_fields_read_as_missing() {
        let record = Record::from_value(json!({"_id": "1", "city": null})).expect("record");
        assert!(record.field("city").is_none());
        assert_eq!(record.text("city"), "");
        assert!(record.list("city").is_empty());
    }

    #[test]
    fn stringify_matches_display_conventions() {
        assert_eq!(stringify(&json!(4.0)), "4");
        assert_eq!(stringify(&json!(4.5)), "4.5");
        assert_eq!(stringify(&json!(["a", "b"])), "a,b");
        assert_eq!(stringify(&json!(true)), "true");
    }

    #[test]
    fn integral_value_accepts_whole_floats_only() {
        assert_eq!(integral_value(&json!(3)), Some(3));
        assert_eq!(integral_value(&json!(3.0)), Some(3));
        assert_eq!(integral_value(&json!(3.5)), None);
        assert_eq!(integral_value(&json!("3")), None);
    }
}
