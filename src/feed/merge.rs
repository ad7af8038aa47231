//! Pure merge policies for paginated results.

use std::collections::HashSet;

use crate::flickr::Photo;

/// Append `incoming` to `existing`, dropping incoming photos whose id is
/// already present. The order of `existing` is never altered and the
/// relative order of surviving incoming photos is preserved.
pub fn merge_append(existing: Vec<Photo>, incoming: Vec<Photo>) -> Vec<Photo> {
  let mut seen: HashSet<String> = existing.iter().map(|p| p.id.clone()).collect();
  let mut merged = existing;

  for photo in incoming {
    if seen.insert(photo.id.clone()) {
      merged.push(photo);
    }
  }

  merged
}

/// First-page loads replace the list wholesale.
pub fn merge_replace(incoming: Vec<Photo>) -> Vec<Photo> {
  incoming
}
