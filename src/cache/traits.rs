//! Core traits and types for the query cache.

use std::hash::Hash;

/// Trait for keys the query cache can store results under.
///
/// Keys belong to a family (e.g. "notes") so that every page/search
/// combination of one resource can be invalidated together.
pub trait QueryKey: Clone + Eq + Hash + Send + Sync + 'static {
  /// Discriminator shared by all keys of the same resource
  fn family(&self) -> &'static str;

  /// Human-readable description for logs
  fn description(&self) -> String;
}

/// Lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
  /// A fetch is in flight; previous data (if any) is still readable
  Pending,
  /// Data is within the freshness window
  Fresh,
  /// Data is older than the freshness window, or was invalidated
  Stale,
  /// The last fetch failed; previous data (if any) is still readable
  Error,
}

/// Point-in-time view of a cache entry, handed to readers.
#[derive(Debug, Clone)]
pub struct Snapshot<T, E> {
  /// Last successfully fetched data
  pub data: Option<T>,
  /// `None` when nothing was ever requested for the key
  pub status: Option<EntryStatus>,
  /// Error from the last failed fetch
  pub error: Option<E>,
}

impl<T, E> Snapshot<T, E> {
  pub fn absent() -> Self {
    Self {
      data: None,
      status: None,
      error: None,
    }
  }

  /// Nothing to show yet: no data and no error
  pub fn is_loading(&self) -> bool {
    self.data.is_none() && !self.is_error()
  }

  /// A fetch is in flight
  pub fn is_fetching(&self) -> bool {
    self.status == Some(EntryStatus::Pending)
  }

  /// A fetch is in flight while older data is being shown
  pub fn is_revalidating(&self) -> bool {
    self.is_fetching() && self.data.is_some()
  }

  pub fn is_error(&self) -> bool {
    self.status == Some(EntryStatus::Error)
  }
}
