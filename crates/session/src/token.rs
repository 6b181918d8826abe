//! Token decoding
//!
//! Tokens reach storage either as the bare string, as a JSON string literal, or
//! wrapped in an object like `{"token": "..."}`. [`decode_token`] tells these
//! apart; [`clean_token`] is the lenient form used on every read.

use serde_json::Value;
use thiserror::Error;

/// Why a raw value could not be decoded as a JSON-encoded token
#[derive(Error, Debug)]
pub enum TokenDecodeError {
    #[error("value is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("JSON object has no string `token` field")]
    MissingTokenField,

    #[error("JSON value of type {0} cannot hold a token")]
    Unsupported(&'static str),
}

/// Decode a stored value as JSON and pull the token out of it.
pub fn decode_token(raw: &str) -> Result<String, TokenDecodeError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::String(token) => Ok(token),
        Value::Number(_) => Err(TokenDecodeError::Unsupported("number")),
        Value::Bool(_) => Err(TokenDecodeError::Unsupported("bool")),
        Value::Object(map) => match map.get("token") {
            Some(Value::String(token)) => Ok(token.clone()),
            _ => Err(TokenDecodeError::MissingTokenField),
        },
        Value::Null => Err(TokenDecodeError::Unsupported("null")),
        Value::Array(_) => Err(TokenDecodeError::Unsupported("array")),
    }
}

/// Remove one leading and one trailing `"`, then surrounding whitespace.
pub fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    value.trim()
}

/// Decode `raw`, falling back to the raw text when it is not a JSON token.
pub fn clean_token(raw: &str) -> String {
    let decoded = decode_token(raw).unwrap_or_else(|e| {
        log::trace!("[SESSION] using raw token value ({})", e);
        raw.to_string()
    });
    strip_quotes(&decoded).to_string()
}
