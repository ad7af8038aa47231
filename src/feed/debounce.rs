//! Debounce policy for type-to-search.

use std::time::{Duration, Instant};

/// Queries shorter than this are never dispatched.
pub const MIN_QUERY_LEN: usize = 2;

/// Turns raw text-change events into search dispatches.
///
/// Each keystroke drops any pending deadline. Text of length >= 2 arms a
/// fixed-delay deadline carrying the trimmed text; cleared input dispatches
/// immediately (back to the home feed); a single character does nothing.
/// An explicit submit bypasses the delay and always wins over a pending
/// deadline. Elapsed deadlines are observed via `poll` from the event loop.
#[derive(Debug)]
pub struct QueryDebouncer {
  delay: Duration,
  pending: Option<PendingQuery>,
}

#[derive(Debug)]
struct PendingQuery {
  deadline: Instant,
  query: String,
}

impl QueryDebouncer {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  /// React to a keystroke. Returns a query to dispatch immediately, which
  /// only happens when the input was cleared.
  pub fn text_changed(&mut self, text: &str) -> Option<String> {
    self.pending = None;

    if text.is_empty() {
      return Some(String::new());
    }

    if text.chars().count() >= MIN_QUERY_LEN {
      self.pending = Some(PendingQuery {
        deadline: Instant::now() + self.delay,
        query: text.trim().to_string(),
      });
    }

    None
  }

  /// Explicit submit: cancels any pending deadline and returns the trimmed
  /// text for immediate dispatch, unless it is empty.
  pub fn submit(&mut self, text: &str) -> Option<String> {
    self.pending = None;

    let trimmed = text.trim();
    if trimmed.is_empty() {
      None
    } else {
      Some(trimmed.to_string())
    }
  }

  /// Take the pending query if its deadline has passed.
  pub fn poll(&mut self, now: Instant) -> Option<String> {
    if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
      return self.pending.take().map(|p| p.query);
    }
    None
  }

  /// Drop any pending deadline (disposal).
  pub fn cancel(&mut self) {
    self.pending = None;
  }
}
