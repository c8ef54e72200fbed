//! Serde types for NoteHub error responses and their conversion into
//! [`RemoteError`].

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::RemoteError;

/// Error body. Both fields are optional and `message` is not always a string.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
  pub message: Option<Value>,
  pub validation: Option<Value>,
}

impl ApiErrorBody {
  /// Parse an error body, treating anything that is not a JSON object as empty
  pub fn parse(body: &[u8]) -> Self {
    serde_json::from_slice(body).unwrap_or_default()
  }
}

/// Build the error for a non-2xx response.
///
/// The body's `message` wins when it is a non-empty string, otherwise the
/// operation's fallback text is used.
pub fn remote_error(status: StatusCode, body: &[u8], fallback: &str) -> RemoteError {
  let parsed = ApiErrorBody::parse(body);
  let message = parsed
    .message
    .as_ref()
    .and_then(Value::as_str)
    .filter(|m| !m.is_empty())
    .unwrap_or(fallback)
    .to_string();

  RemoteError {
    message,
    validation: parsed.validation,
    status: Some(status.as_u16()),
  }
}
