//! Error taxonomy shared by the service, the controller and the view.

use std::fmt;
use thiserror::Error;

/// Failure of a remote call: a non-2xx response, a transport error, or a body
/// that could not be decoded.
///
/// `Clone` so one in-flight result can be handed to every caller awaiting the
/// same cache key.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RemoteError {
  /// User-facing message
  pub message: String,
  /// The `validation` field of the error body, if the server sent one
  pub validation: Option<serde_json::Value>,
  /// HTTP status, absent for transport failures
  pub status: Option<u16>,
}

impl RemoteError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      validation: None,
      status: None,
    }
  }
}

/// Fields of the create-note form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Title,
  Content,
  Tag,
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Field::Title => "title",
      Field::Content => "content",
      Field::Tag => "tag",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: Field,
  pub message: &'static str,
}

/// Local validation failure, raised before anything is sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.summary())]
pub struct ValidationErrors {
  pub errors: Vec<FieldError>,
}

impl ValidationErrors {
  /// First message for the given field, for inline display
  pub fn for_field(&self, field: Field) -> Option<&'static str> {
    self
      .errors
      .iter()
      .find(|e| e.field == field)
      .map(|e| e.message)
  }

  fn summary(&self) -> String {
    self
      .errors
      .iter()
      .map(|e| format!("{}: {}", e.field, e.message))
      .collect::<Vec<_>>()
      .join("; ")
  }
}

/// Configuration problems that do not stop the client from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("NoteHub token is not set. Set NOTEHUB_TOKEN or `token` in the config file.")]
  MissingToken,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_remote_error_displays_message() {
    let err = RemoteError::new("Server error");
    assert_eq!(err.to_string(), "Server error");
    assert_eq!(err.status, None);
  }

  #[test]
  fn test_validation_errors_lookup_and_display() {
    let errors = ValidationErrors {
      errors: vec![
        FieldError {
          field: Field::Title,
          message: "Title must be at least 3 characters",
        },
        FieldError {
          field: Field::Content,
          message: "Content must be at most 500 characters",
        },
      ],
    };

    assert_eq!(
      errors.for_field(Field::Title),
      Some("Title must be at least 3 characters")
    );
    assert_eq!(errors.for_field(Field::Tag), None);
    assert_eq!(
      errors.to_string(),
      "title: Title must be at least 3 characters; content: Content must be at most 500 characters"
    );
  }
}
