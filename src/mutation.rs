//! Tracking for remote writes.
//!
//! Modelled on TanStack Query's `useMutation`: a `Mutation<T>` runs one write
//! at a time on the runtime and the owner polls it from the event loop tick.
//!
//! # Example
//!
//! ```ignore
//! let mut create = Mutation::new();
//! let client = client.clone();
//! create.mutate(async move { client.create_note(&payload).await });
//!
//! // In event loop tick
//! if let Some(outcome) = create.poll() {
//!     // Settled: invalidate caches, report errors
//! }
//! ```

use std::future::Future;
use tokio::sync::oneshot;

use crate::error::RemoteError;

/// A single-flight remote write.
pub struct Mutation<T> {
  /// Outcome of the write in flight, if any
  receiver: Option<oneshot::Receiver<Result<T, RemoteError>>>,
}

impl<T: Send + 'static> Mutation<T> {
  pub fn new() -> Self {
    Self { receiver: None }
  }

  pub fn is_pending(&self) -> bool {
    self.receiver.is_some()
  }

  /// Start a write unless one is already in flight.
  ///
  /// Returns whether the write was started.
  pub fn mutate<Fut>(&mut self, future: Fut) -> bool
  where
    Fut: Future<Output = Result<T, RemoteError>> + Send + 'static,
  {
    if self.is_pending() {
      return false;
    }

    let (tx, rx) = oneshot::channel();
    self.receiver = Some(rx);

    tokio::spawn(async move {
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(future.await);
    });
    true
  }

  /// Poll for the outcome of a pending write.
  ///
  /// Returns the outcome once, on the poll where the write settles.
  pub fn poll(&mut self) -> Option<Result<T, RemoteError>> {
    let receiver = self.receiver.as_mut()?;

    let outcome = match receiver.try_recv() {
      Ok(outcome) => outcome,
      Err(oneshot::error::TryRecvError::Empty) => return None,
      Err(oneshot::error::TryRecvError::Closed) => {
        // Task dropped without sending
        Err(RemoteError::new("Request was cancelled"))
      }
    };

    self.receiver = None;
    Some(outcome)
  }
}

impl<T: Send + 'static> Default for Mutation<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> std::fmt::Debug for Mutation<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Mutation")
      .field("pending", &self.receiver.is_some())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn test_mutation_success() {
    let mut mutation = Mutation::new();
    assert!(!mutation.is_pending());

    assert!(mutation.mutate(async { Ok(42) }));
    assert!(mutation.is_pending());

    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(mutation.poll(), Some(Ok(42)));
    assert!(!mutation.is_pending());
    // Outcome is handed out once
    assert_eq!(mutation.poll(), None);
  }

  #[tokio::test]
  async fn test_mutation_error() {
    let mut mutation: Mutation<u32> = Mutation::new();
    mutation.mutate(async { Err(RemoteError::new("Failed to delete note")) });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let outcome = mutation.poll().unwrap();
    assert_eq!(outcome.unwrap_err().message, "Failed to delete note");
    assert!(!mutation.is_pending());

    // A failed write does not block the next one
    assert!(mutation.mutate(async { Ok(3) }));
  }

  #[tokio::test]
  async fn test_mutate_while_pending_is_noop() {
    let mut mutation = Mutation::new();
    assert!(mutation.mutate(async {
      tokio::time::sleep(Duration::from_millis(50)).await;
      Ok(1)
    }));
    assert!(!mutation.mutate(async { Ok(2) }));
    assert_eq!(mutation.poll(), None);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(mutation.poll(), Some(Ok(1)));
  }
}
