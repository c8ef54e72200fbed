//! Cache keys for NoteHub queries.

use crate::cache::{QueryCache, QueryKey};
use crate::error::RemoteError;

use super::types::PaginatedNotes;

/// Family shared by every notes page/search key
pub const NOTES_FAMILY: &str = "notes";

/// Key of one notes listing.
///
/// The search term is kept verbatim: "todo" and "todo " are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotesKey {
  pub page: u32,
  pub search: String,
}

impl NotesKey {
  pub fn new(page: u32, search: impl Into<String>) -> Self {
    Self {
      page,
      search: search.into(),
    }
  }
}

impl QueryKey for NotesKey {
  fn family(&self) -> &'static str {
    NOTES_FAMILY
  }

  fn description(&self) -> String {
    if self.search.is_empty() {
      format!("notes page {}", self.page)
    } else {
      format!("notes page {} matching {:?}", self.page, self.search)
    }
  }
}

/// Cache of notes listings
pub type NoteCache = QueryCache<NotesKey, PaginatedNotes, RemoteError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_search_terms_are_not_normalized() {
    assert_ne!(NotesKey::new(1, "todo"), NotesKey::new(1, "todo "));
    assert_ne!(NotesKey::new(1, "Todo"), NotesKey::new(1, "todo"));
    assert_eq!(NotesKey::new(2, "x").family(), NOTES_FAMILY);
  }

  #[test]
  fn test_description() {
    assert_eq!(NotesKey::new(3, "").description(), "notes page 3");
    assert_eq!(
      NotesKey::new(1, "milk").description(),
      "notes page 1 matching \"milk\""
    );
  }
}
