//! Note collection controller.
//!
//! Owns the page and search selection, keeps the active cache key requested,
//! runs create/delete writes and invalidates the notes cache when they land.
//! The view only reads [`NotesView`] and calls the intent methods.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::debounce::Debouncer;
use crate::error::{RemoteError, ValidationErrors};
use crate::mutation::Mutation;
use crate::notehub::cache::{NoteCache, NotesKey, NOTES_FAMILY};
use crate::notehub::client::NoteService;
use crate::notehub::types::{DeleteNoteResponse, Note};
use crate::notehub::validation::NoteDraft;

/// Page and search selection.
///
/// Two inputs drive it: a page change and a settled search term. A settled
/// term that differs from the last one observed starts over at page 1; the
/// same term settling again leaves the page alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
  page: u32,
  search: String,
}

impl BrowseState {
  pub fn new() -> Self {
    Self {
      page: 1,
      search: String::new(),
    }
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  /// Select a page; pages start at 1
  pub fn set_page(&mut self, page: u32) {
    self.page = page.max(1);
  }

  /// Apply a settled search term. Returns whether the selection changed.
  pub fn settle_search(&mut self, term: String) -> bool {
    if term == self.search {
      return false;
    }
    self.search = term;
    self.page = 1;
    true
  }

  /// Cache key of the listing currently on screen
  pub fn active_key(&self) -> NotesKey {
    NotesKey::new(self.page, self.search.clone())
  }
}

impl Default for BrowseState {
  fn default() -> Self {
    Self::new()
  }
}

/// Everything the view needs to render the collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotesView {
  pub notes: Vec<Note>,
  pub total_pages: u32,
  pub current_page: u32,
  /// Raw search input, which may not have settled yet
  pub search: String,
  /// Raw input is waiting to settle
  pub is_searching: bool,
  /// No data for the active listing yet
  pub is_loading: bool,
  /// Refetch in flight while older data is shown
  pub is_fetching: bool,
  pub is_error: bool,
  pub error_message: Option<String>,
  pub is_creating: bool,
  pub is_deleting: bool,
  /// Last create/delete failure, cleared by the next successful write
  pub mutation_error: Option<String>,
}

/// Outcomes the view may react to
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEvent {
  /// The create form can be closed
  NoteCreated(Note),
  NoteDeleted { id: u64, message: String },
  MutationFailed(String),
}

pub struct NoteCollection<S: NoteService> {
  service: S,
  cache: NoteCache,
  per_page: u32,
  state: BrowseState,
  raw_search: String,
  debouncer: Debouncer<String>,
  /// Key last handed to the cache; `None` forces a new request
  requested: Option<NotesKey>,
  create: Mutation<Note>,
  delete: Mutation<(u64, DeleteNoteResponse)>,
  mutation_error: Option<String>,
}

impl<S: NoteService> NoteCollection<S> {
  pub fn new(service: S, cache: NoteCache, per_page: u32, debounce: Duration) -> Self {
    Self {
      service,
      cache,
      per_page,
      state: BrowseState::new(),
      raw_search: String::new(),
      debouncer: Debouncer::new(debounce),
      requested: None,
      create: Mutation::new(),
      delete: Mutation::new(),
      mutation_error: None,
    }
  }

  /// Jump to a page. Not debounced.
  pub fn change_page(&mut self, page: u32) {
    self.state.set_page(page);
    self.sync();
  }

  pub fn next_page(&mut self) {
    let total = self.total_pages();
    if self.state.page() < total {
      self.change_page(self.state.page() + 1);
    }
  }

  pub fn prev_page(&mut self) {
    if self.state.page() > 1 {
      self.change_page(self.state.page() - 1);
    }
  }

  /// Record raw search input; it is applied once it settles
  pub fn change_search(&mut self, raw: &str) {
    self.raw_search = raw.to_string();
    self.debouncer.push(self.raw_search.clone());
  }

  /// Apply pending search input without waiting for it to settle
  pub fn submit_search(&mut self) {
    if let Some(term) = self.debouncer.flush() {
      self.apply_search(term);
    }
  }

  /// Refetch the active listing, even if it is still fresh
  pub fn refetch(&mut self) {
    self.cache.invalidate(&self.state.active_key());
    self.requested = None;
    self.sync();
  }

  /// Validate a draft and submit it.
  ///
  /// Invalid drafts are returned as errors and never reach the server. A
  /// second create while one is in flight is ignored.
  pub fn create_note(&mut self, draft: &NoteDraft) -> Result<(), ValidationErrors> {
    let payload = draft.validate()?;
    let service = self.service.clone();
    if !self
      .create
      .mutate(async move { service.create_note(&payload).await })
    {
      debug!("Create ignored, another create is in flight");
    }
    Ok(())
  }

  /// Delete a note. Ignored while another delete is in flight.
  pub fn delete_note(&mut self, id: u64) {
    let service = self.service.clone();
    if !self
      .delete
      .mutate(async move { service.delete_note(id).await.map(|resp| (id, resp)) })
    {
      debug!(id, "Delete ignored, another delete is in flight");
    }
  }

  /// Advance the controller: apply settled search input, collect finished
  /// writes and make sure the active listing has been requested.
  ///
  /// Call on every event loop tick.
  pub fn tick(&mut self) -> Vec<CollectionEvent> {
    let mut events = Vec::new();

    if let Some(term) = self.debouncer.poll(Instant::now()) {
      self.apply_search(term);
    }

    if let Some(outcome) = self.create.poll() {
      match outcome {
        Ok(note) => {
          info!(id = note.id, "Note created");
          self.after_write();
          events.push(CollectionEvent::NoteCreated(note));
        }
        Err(e) => events.push(self.write_failed("Failed to create note", e)),
      }
    }

    if let Some(outcome) = self.delete.poll() {
      match outcome {
        Ok((id, resp)) => {
          info!(id, "Note deleted");
          self.after_write();
          events.push(CollectionEvent::NoteDeleted {
            id,
            message: resp.message,
          });
        }
        Err(e) => events.push(self.write_failed("Failed to delete note", e)),
      }
    }

    self.clamp_page();
    self.sync();
    events
  }

  /// State of the active listing for rendering.
  ///
  /// Only data cached under the active key is returned, so results for pages
  /// or searches that are no longer selected never show up here.
  pub fn view(&self) -> NotesView {
    let snapshot = self.cache.snapshot(&self.state.active_key());
    let is_loading = snapshot.is_loading();
    let is_fetching = snapshot.is_revalidating();
    let is_error = snapshot.is_error();
    let (notes, total_pages) = snapshot
      .data
      .map(|page| (page.notes, page.total_pages))
      .unwrap_or_default();

    NotesView {
      notes,
      total_pages,
      current_page: self.state.page(),
      search: self.raw_search.clone(),
      is_searching: self.debouncer.is_pending(),
      is_loading,
      is_fetching,
      is_error,
      error_message: snapshot.error.map(|e| e.message),
      is_creating: self.create.is_pending(),
      is_deleting: self.delete.is_pending(),
      mutation_error: self.mutation_error.clone(),
    }
  }

  /// Drop every cached listing. In-flight fetches finish into nothing.
  pub fn shutdown(&mut self) {
    if !self.cache.is_empty() {
      debug!(entries = self.cache.len(), "Clearing notes cache");
      self.cache.clear();
    }
    self.requested = None;
  }

  fn total_pages(&self) -> u32 {
    self
      .cache
      .snapshot(&self.state.active_key())
      .data
      .map(|page| page.total_pages)
      .unwrap_or(0)
  }

  /// Step back to the last page when a settled listing has fewer pages
  /// than the selected one, e.g. after deleting the only note on it.
  fn clamp_page(&mut self) {
    let snapshot = self.cache.snapshot(&self.state.active_key());
    if snapshot.is_fetching() {
      return;
    }
    let Some(total_pages) = snapshot.data.map(|page| page.total_pages) else {
      return;
    };

    let last = total_pages.max(1);
    if self.state.page() > last {
      debug!(page = self.state.page(), last, "Selected page no longer exists");
      self.state.set_page(last);
    }
  }

  fn apply_search(&mut self, term: String) {
    if self.state.settle_search(term) {
      debug!(search = self.state.search(), "Search settled");
      self.sync();
    }
  }

  fn after_write(&mut self) {
    self.mutation_error = None;
    self.cache.invalidate_family(NOTES_FAMILY);
    self.requested = None;
  }

  fn write_failed(&mut self, context: &str, err: RemoteError) -> CollectionEvent {
    error!("{}: {}", context, err.message);
    if let Some(validation) = &err.validation {
      error!("Validation details: {}", validation);
    }
    self.mutation_error = Some(err.message.clone());
    CollectionEvent::MutationFailed(err.message)
  }

  /// Request the active key from the cache if it has not been requested yet.
  fn sync(&mut self) {
    let key = self.state.active_key();
    if self.requested.as_ref() == Some(&key) {
      return;
    }

    let service = self.service.clone();
    let per_page = self.per_page;
    let (page, search) = (key.page, key.search.clone());
    self.cache.request(&key, move || async move {
      service.list_notes(page, per_page, &search).await
    });
    self.requested = Some(key);
  }
}
