use serde_json::Value;

/// Pulls a human readable message out of a JSON error body.
///
/// Looks at `message`, then `error` (a string or an object carrying its own
/// `message`), and falls back to `HTTP <status>`.
pub fn extract_error_message(status: u16, body: &str) -> String {
    parse_error_message(body).unwrap_or_else(|| format!("HTTP {}", status))
}

fn parse_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let message = match object.get("message").and_then(Value::as_str) {
        Some(message) => Some(message.to_string()),
        None => match object.get("error")? {
            Value::String(error) => Some(error.clone()),
            Value::Object(inner) => inner.get("message").and_then(Value::as_str).map(str::to_string),
            _ => None,
        },
    };

    message.filter(|m| !m.trim().is_empty())
}
