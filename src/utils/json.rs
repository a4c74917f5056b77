use anyhow::Result;
use serde::Serialize;

// Convert any `Serialize` type into an indented JSON string (log output).
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let json_value: serde_json::Value = serde_json::to_value(value)?;
    let pretty_json: String = serde_json::to_string_pretty(&json_value)?;
    Ok(pretty_json)
}
