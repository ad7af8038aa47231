//! Flickr REST API client and domain types.

mod api_types;
mod client;
mod error;
mod types;

pub use client::FlickrClient;
pub use error::{ApiFailure, FetchError};
pub use types::{PageResult, Photo};
