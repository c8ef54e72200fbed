//! Debouncing for rapidly changing input.

use std::time::Duration;
use tokio::time::Instant;

/// Default quiet period before a value settles
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Turns a stream of raw values into settled values.
///
/// Every `push` restarts the delay. `poll` hands out the latest value once no
/// new value has arrived for `delay`; values that were superseded before that
/// are never handed out.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
  delay: Duration,
  pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  /// Record a new raw value, restarting the delay
  pub fn push(&mut self, value: T) {
    self.push_at(value, Instant::now());
  }

  pub fn push_at(&mut self, value: T, now: Instant) {
    self.pending = Some((value, now + self.delay));
  }

  /// Take the pending value if it has settled by `now`
  pub fn poll(&mut self, now: Instant) -> Option<T> {
    match &self.pending {
      Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
      _ => None,
    }
  }

  /// Take the pending value immediately, skipping the rest of the delay
  pub fn flush(&mut self) -> Option<T> {
    self.pending.take().map(|(value, _)| value)
  }

  /// A value was pushed and has not been handed out yet
  pub fn is_pending(&self) -> bool {
    self.pending.is_some()
  }
}

impl<T> Default for Debouncer<T> {
  fn default() -> Self {
    Self::new(DEFAULT_DELAY)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const MS: Duration = Duration::from_millis(1);

  #[test]
  fn test_value_settles_after_delay() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(500 * MS);

    debouncer.push_at("milk", start);
    assert_eq!(debouncer.poll(start + 499 * MS), None);
    assert_eq!(debouncer.poll(start + 500 * MS), Some("milk"));
    // Handed out once
    assert_eq!(debouncer.poll(start + 900 * MS), None);
  }

  #[test]
  fn test_burst_only_emits_last_value() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(500 * MS);
    let mut emitted = Vec::new();

    for (i, value) in ["m", "mi", "mil", "milk"].into_iter().enumerate() {
      let at = start + (i as u32) * 100 * MS;
      debouncer.push_at(value, at);
      emitted.extend(debouncer.poll(at + 50 * MS));
    }
    emitted.extend(debouncer.poll(start + 799 * MS));
    emitted.extend(debouncer.poll(start + 800 * MS));

    assert_eq!(emitted, vec!["milk"]);
  }

  #[test]
  fn test_push_restarts_the_delay() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(500 * MS);

    debouncer.push_at(1, start);
    debouncer.push_at(2, start + 400 * MS);
    assert_eq!(debouncer.poll(start + 600 * MS), None);
    assert_eq!(debouncer.poll(start + 899 * MS), None);
    assert_eq!(debouncer.poll(start + 900 * MS), Some(2));
  }

  #[test]
  fn test_flush_skips_the_delay() {
    let mut debouncer = Debouncer::default();
    debouncer.push(String::from("work"));
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.flush().as_deref(), Some("work"));
    assert!(!debouncer.is_pending());
  }
}
