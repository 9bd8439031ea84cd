//! Raw reply conversion
//!
//! The `execute` escape hatch forwards arbitrary commands, so its reply
//! can be any shape the server produces, including the wrapped RESP3
//! forms (maps, doubles, verbatim strings). This module converts a
//! `redis::Value` tree into plain JSON for the rendering layer, and
//! provides the payload accessor used to unwrap status-ish replies.

use serde_json::Value as Json;

/// Unwrap the textual payload of a status-like reply.
///
/// Handles the plain RESP2 shapes and the wrapped RESP3 ones; returns
/// `None` for replies that carry no text.
pub fn text_payload(value: &redis::Value) -> Option<String> {
    match value {
        redis::Value::SimpleString(s) => Some(s.clone()),
        redis::Value::Okay => Some("OK".to_string()),
        redis::Value::BulkString(data) => Some(String::from_utf8_lossy(data).to_string()),
        redis::Value::VerbatimString { format: _, text } => Some(text.clone()),
        _ => None,
    }
}

/// Convert a raw reply into plain JSON
pub fn to_json(value: &redis::Value) -> Json {
    match value {
        redis::Value::Nil => Json::Null,
        redis::Value::Int(n) => Json::Number((*n).into()),
        redis::Value::BulkString(data) => Json::String(String::from_utf8_lossy(data).to_string()),
        redis::Value::Okay => Json::String("OK".to_string()),
        redis::Value::SimpleString(s) => Json::String(s.clone()),
        redis::Value::Double(d) => serde_json::Number::from_f64(*d)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        redis::Value::Boolean(b) => Json::Bool(*b),
        redis::Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        redis::Value::Set(items) => Json::Array(items.iter().map(to_json).collect()),
        redis::Value::Map(entries) => {
            let mut map = serde_json::Map::new();
            for (k, v) in entries {
                let key = match to_json(k) {
                    Json::String(s) => s,
                    other => other.to_string(),
                };
                map.insert(key, to_json(v));
            }
            Json::Object(map)
        }
        redis::Value::BigNumber(bn) => Json::String(format!("{bn:?}")),
        redis::Value::VerbatimString { format: _, text } => Json::String(text.clone()),
        redis::Value::ServerError(err) => Json::String(format!("ERROR: {err:?}")),
        redis::Value::Attribute { data, attributes: _ } => to_json(data),
        redis::Value::Push { kind: _, data } => Json::Array(data.iter().map(to_json).collect()),
    }
}
