//! Serde-deserializable types matching Flickr REST API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;

use super::types::{PageResult, Photo};

/// Top-level envelope of every Flickr REST response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
  pub stat: String,
  /// Error description, present when `stat != "ok"`
  pub message: Option<String>,
  pub photos: Option<ApiPhotoPage>,
}

/// The `photos` object of a search/getRecent response.
#[derive(Debug, Deserialize)]
pub struct ApiPhotoPage {
  pub page: u32,
  pub pages: u32,
  #[serde(default)]
  pub photo: Vec<ApiPhoto>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPhoto {
  pub id: String,
  #[serde(default)]
  pub secret: String,
  #[serde(default)]
  pub title: String,
  pub url_s: Option<String>,
  pub url_m: Option<String>,
  pub url_l: Option<String>,
}

impl ApiPhoto {
  /// Smallest usable image URL, if any size was returned.
  fn image_url(&self) -> Option<&str> {
    self
      .url_s
      .as_deref()
      .or(self.url_m.as_deref())
      .or(self.url_l.as_deref())
  }

  /// Convert to a domain photo. Records without a usable URL are dropped.
  fn into_photo(self) -> Option<Photo> {
    let url = self.image_url()?.to_string();
    let title = if self.title.is_empty() {
      "Untitled".to_string()
    } else {
      self.title
    };
    Some(Photo {
      id: self.id,
      url,
      title,
      secret: self.secret,
    })
  }
}

impl ApiPhotoPage {
  /// Convert to a domain page, filtering out records without an image URL.
  pub fn into_page_result(self) -> PageResult {
    PageResult {
      page_number: self.page,
      total_pages: self.pages,
      photos: self
        .photo
        .into_iter()
        .filter_map(ApiPhoto::into_photo)
        .collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const PAGE_JSON: &str = r#"{
    "photos": {
      "page": 2,
      "pages": 5,
      "perpage": 20,
      "total": 93,
      "photo": [
        {"id": "1", "secret": "aa", "title": "Sunrise", "url_s": "https://live.example/1_s.jpg"},
        {"id": "2", "secret": "bb", "title": "No sizes here"},
        {"id": "3", "secret": "cc", "title": "", "url_m": "https://live.example/3_m.jpg"}
      ]
    },
    "stat": "ok"
  }"#;

  #[test]
  fn test_parse_page_and_filter_urlless_records() {
    let response: ApiResponse = serde_json::from_str(PAGE_JSON).unwrap();
    assert_eq!(response.stat, "ok");

    let page = response.photos.unwrap().into_page_result();
    assert_eq!(page.page_number, 2);
    assert_eq!(page.total_pages, 5);
    // Record "2" has no url_* field and must be dropped
    assert_eq!(page.photos.len(), 2);
    assert_eq!(page.photos[0].id, "1");
    assert_eq!(page.photos[0].url, "https://live.example/1_s.jpg");
  }

  #[test]
  fn test_empty_title_becomes_untitled() {
    let response: ApiResponse = serde_json::from_str(PAGE_JSON).unwrap();
    let page = response.photos.unwrap().into_page_result();
    assert_eq!(page.photos[1].id, "3");
    assert_eq!(page.photos[1].title, "Untitled");
  }

  #[test]
  fn test_url_fallback_prefers_small() {
    let photo = ApiPhoto {
      id: "9".into(),
      secret: "s".into(),
      title: "t".into(),
      url_s: Some("small".into()),
      url_m: Some("medium".into()),
      url_l: None,
    };
    assert_eq!(photo.into_photo().unwrap().url, "small");
  }

  #[test]
  fn test_parse_error_envelope() {
    let json = r#"{"stat": "fail", "code": 100, "message": "Invalid API Key"}"#;
    let response: ApiResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.stat, "fail");
    assert_eq!(response.message.as_deref(), Some("Invalid API Key"));
    assert!(response.photos.is_none());
  }
}
