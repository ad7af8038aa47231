use crate::flickr::Photo;

/// Lifecycle phase of the feed.
///
/// One enumerated phase replaces the original loading/loadingMore/refreshing
/// boolean flags; invalid combinations cannot be represented and all UI
/// flags derive from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  /// Constructed, nothing requested yet
  Idle,
  /// First page for the current query is in flight
  LoadingInitial,
  /// A result set is on screen
  Ready,
  /// Next page is in flight, current list stays visible
  LoadingMore,
  /// Explicit refresh of the first page is in flight
  Refreshing,
  /// Initial or refresh load failed; list is empty, retry available
  Error,
}

impl Phase {
  /// Any request in flight.
  pub fn is_loading(&self) -> bool {
    matches!(
      self,
      Phase::LoadingInitial | Phase::LoadingMore | Phase::Refreshing
    )
  }

  /// A first-page load (initial or refresh) in flight.
  pub fn is_first_page_load(&self) -> bool {
    matches!(self, Phase::LoadingInitial | Phase::Refreshing)
  }
}

/// Snapshot published to the UI.
///
/// Invariant: `photos` never contains two entries with the same id.
#[derive(Debug, Clone)]
pub struct FeedState {
  pub phase: Phase,
  /// Current query; empty means the home feed
  pub query: String,
  /// Last successfully applied page number
  pub page: u32,
  pub photos: Vec<Photo>,
  pub has_more: bool,
  /// Blocking message in `Error` phase, inline message after a failed
  /// load-more in `Ready`
  pub error_message: Option<String>,
}

impl FeedState {
  pub fn new() -> Self {
    Self {
      phase: Phase::Idle,
      query: String::new(),
      page: 1,
      photos: Vec::new(),
      has_more: true,
      error_message: None,
    }
  }
}

impl Default for FeedState {
  fn default() -> Self {
    Self::new()
  }
}
