//! Local validation of the create-note form.

use crate::error::{Field, FieldError, ValidationErrors};

use super::types::{CreateNotePayload, Tag};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 50;
pub const CONTENT_MAX: usize = 500;

/// Raw form state before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
  pub title: String,
  pub content: String,
  pub tag: Option<Tag>,
}

impl NoteDraft {
  /// Check every field and build the payload, or report all failing fields.
  ///
  /// Lengths are counted in characters.
  pub fn validate(&self) -> Result<CreateNotePayload, ValidationErrors> {
    let mut errors = Vec::new();

    let title_len = self.title.chars().count();
    if title_len == 0 {
      errors.push(FieldError {
        field: Field::Title,
        message: "Title is required",
      });
    } else if title_len < TITLE_MIN {
      errors.push(FieldError {
        field: Field::Title,
        message: "Title must be at least 3 characters",
      });
    } else if title_len > TITLE_MAX {
      errors.push(FieldError {
        field: Field::Title,
        message: "Title must be at most 50 characters",
      });
    }

    if self.content.chars().count() > CONTENT_MAX {
      errors.push(FieldError {
        field: Field::Content,
        message: "Content must be at most 500 characters",
      });
    }

    if self.tag.is_none() {
      errors.push(FieldError {
        field: Field::Tag,
        message: "Tag is required",
      });
    }

    match self.tag {
      Some(tag) if errors.is_empty() => Ok(CreateNotePayload {
        title: self.title.clone(),
        content: self.content.clone(),
        tag,
      }),
      _ => Err(ValidationErrors { errors }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft(title: &str, content: &str, tag: Option<Tag>) -> NoteDraft {
    NoteDraft {
      title: title.to_string(),
      content: content.to_string(),
      tag,
    }
  }

  #[test]
  fn test_valid_draft_builds_payload() {
    let payload = draft("Standup", "", Some(Tag::Meeting)).validate().unwrap();
    assert_eq!(payload.title, "Standup");
    assert_eq!(payload.tag, Tag::Meeting);
  }

  #[test]
  fn test_short_title_is_rejected() {
    let errors = draft("Hi", "", Some(Tag::Todo)).validate().unwrap_err();
    assert_eq!(
      errors.for_field(Field::Title),
      Some("Title must be at least 3 characters")
    );
  }

  #[test]
  fn test_title_length_bounds() {
    assert!(draft("abc", "", Some(Tag::Todo)).validate().is_ok());
    assert!(draft(&"a".repeat(50), "", Some(Tag::Todo)).validate().is_ok());
    let errors = draft(&"a".repeat(51), "", Some(Tag::Todo))
      .validate()
      .unwrap_err();
    assert_eq!(
      errors.for_field(Field::Title),
      Some("Title must be at most 50 characters")
    );
  }

  #[test]
  fn test_lengths_count_characters_not_bytes() {
    // Three characters, nine bytes
    assert!(draft("日本語", "", Some(Tag::Personal)).validate().is_ok());
  }

  #[test]
  fn test_all_failing_fields_are_reported() {
    let errors = draft("", &"x".repeat(501), None).validate().unwrap_err();
    assert_eq!(errors.for_field(Field::Title), Some("Title is required"));
    assert_eq!(
      errors.for_field(Field::Content),
      Some("Content must be at most 500 characters")
    );
    assert_eq!(errors.for_field(Field::Tag), Some("Tag is required"));
  }
}
