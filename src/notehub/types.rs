use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tag {
  #[default]
  Todo,
  Work,
  Personal,
  Meeting,
  Shopping,
}

impl Tag {
  pub const ALL: [Tag; 5] = [
    Tag::Todo,
    Tag::Work,
    Tag::Personal,
    Tag::Meeting,
    Tag::Shopping,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Tag::Todo => "Todo",
      Tag::Work => "Work",
      Tag::Personal => "Personal",
      Tag::Meeting => "Meeting",
      Tag::Shopping => "Shopping",
    }
  }

  /// Next tag in selection order, wrapping around
  pub fn next(self) -> Tag {
    let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  /// Previous tag in selection order, wrapping around
  pub fn prev(self) -> Tag {
    let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
    Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

/// A note as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
  pub id: u64,
  pub title: String,
  #[serde(default)]
  pub content: String,
  pub tag: Tag,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// One page of notes, in server order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedNotes {
  #[serde(default)]
  pub notes: Vec<Note>,
  #[serde(default)]
  pub total_pages: u32,
  /// Not every deployment echoes the page back
  #[serde(default)]
  pub current_page: Option<u32>,
}

/// Body of a create request, only built from a validated draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateNotePayload {
  pub title: String,
  pub content: String,
  pub tag: Tag,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteNoteResponse {
  pub message: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tag_cycles_in_both_directions() {
    assert_eq!(Tag::Todo.next(), Tag::Work);
    assert_eq!(Tag::Shopping.next(), Tag::Todo);
    assert_eq!(Tag::Todo.prev(), Tag::Shopping);
  }

  #[test]
  fn test_paginated_notes_from_wire() {
    let body = r#"{
      "notes": [{
        "id": 42,
        "title": "Groceries",
        "content": "milk, eggs",
        "tag": "Shopping",
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-02T08:30:00Z"
      }],
      "totalPages": 3
    }"#;

    let page: PaginatedNotes = serde_json::from_str(body).unwrap();
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, None);
    assert_eq!(page.notes[0].id, 42);
    assert_eq!(page.notes[0].tag, Tag::Shopping);
  }

  #[test]
  fn test_payload_serializes_tag_by_name() {
    let payload = CreateNotePayload {
      title: "Standup".to_string(),
      content: String::new(),
      tag: Tag::Meeting,
    };
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(
      json,
      serde_json::json!({"title": "Standup", "content": "", "tag": "Meeting"})
    );
  }
}
