use crate::payload::Event;
use buzz_pie_common::UNKNOWN_CATEGORY;
use serde_json::Value;

/// Canonical grouping key for one field of an event. Never empty.
pub fn category_key(event: &Event, field: &str) -> String {
    normalize_category(event.get(field))
}

pub fn normalize_category(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN_CATEGORY.to_owned(),
        Some(Value::String(s)) => {
            let key = s.trim().to_lowercase();
            if key.is_empty() {
                UNKNOWN_CATEGORY.to_owned()
            } else {
                key
            }
        }
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        // nested values keep their compact JSON text
        Some(other) => other.to_string(),
    }
}
