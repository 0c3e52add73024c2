use serde_json::Value;

/// Canonicalize the `tech` field.
///
/// A list has each element stringified and trimmed; a string is split on commas
/// and each segment trimmed. Empty results are dropped and order is preserved.
/// Anything else normalizes to an empty list. The function never fails and
/// applying it to its own output returns that output unchanged.
pub fn normalize_tech(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(stringify)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => split_tech(s),
        _ => Vec::new(),
    }
}

/// Split a comma-separated tech string
pub fn split_tech(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn stringify(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// URLs are stored trimmed; an empty value means "not set"
pub fn normalize_url(raw: &str) -> String {
    raw.trim().to_string()
}
