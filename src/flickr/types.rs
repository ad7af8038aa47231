use serde::{Deserialize, Serialize};

/// A single photo as shown in the feed.
///
/// Immutable once fetched. `id` is unique within a query's accumulated
/// result set; `secret` only participates in list keying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
  pub id: String,
  pub url: String,
  pub title: String,
  pub secret: String,
}

/// One page of photos as returned by the service.
#[derive(Debug, Clone)]
pub struct PageResult {
  pub photos: Vec<Photo>,
  pub page_number: u32,
  pub total_pages: u32,
}

impl PageResult {
  /// Whether more pages exist beyond this one.
  pub fn has_more(&self) -> bool {
    self.page_number < self.total_pages
  }
}
