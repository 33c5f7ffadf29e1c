use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One outage window as reported by the backend. Every field is optional and
/// shown as-is, the backend shape is only checked for presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageRecord {
    pub street: Option<String>,
    pub area: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub reason: Option<String>,
}

impl OutageRecord {
    /// Lenient conversion of a single array element. Elements that are not
    /// objects become records with every field absent.
    pub fn from_json(value: &Value) -> Self {
        Self {
            street: text_field(value, "street"),
            area: text_field(value, "area"),
            from: text_field(value, "from"),
            to: text_field(value, "to"),
            reason: text_field(value, "reason"),
        }
    }

    /// A successful body that is not an array counts as "no outages".
    pub fn list_from_json(body: &Value) -> Vec<Self> {
        match body {
            Value::Array(items) => items.iter().map(Self::from_json).collect_vec(),
            _ => vec![],
        }
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Absent and empty values are treated alike when picking what to display.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}
