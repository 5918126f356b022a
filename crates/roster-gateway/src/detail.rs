//! Message extraction from non-2xx response bodies.

use serde_json::Value;

/// Text to show for a failed request.
///
/// The body's `detail` when it is a string, or each item of a `detail` list
/// (its `msg`, or the item itself) joined by ", ". Any other body falls back
/// to `HTTP <status>: <reason>`.
#[must_use]
pub fn error_message(status: u16, reason: &str, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(from_detail)
        .unwrap_or_else(|| format!("HTTP {status}: {reason}"))
}

fn from_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|item| match item.get("msg") {
                    Some(msg) => text(msg),
                    None => text(item),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
