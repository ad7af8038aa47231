//! Typed failure taxonomy for page fetches.

use thiserror::Error;

/// Why a page fetch failed.
///
/// `Cancelled` is absorbed at the controller boundary and never reaches the
/// user. The remaining variants map to generic, non-leaking user messages;
/// raw transport/service text only goes to logs.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The operation was superseded or the controller was disposed.
  #[error("request cancelled")]
  Cancelled,

  /// The request exceeded the wall-clock limit.
  #[error("request timed out")]
  Timeout,

  /// Transport-level failure (DNS, connect, TLS, read).
  #[error("network failure: {0}")]
  Network(String),

  /// The service answered, but not with a usable page.
  #[error("service error: {0}")]
  Api(ApiFailure),
}

/// Service-level failure detail.
#[derive(Debug, Error)]
pub enum ApiFailure {
  /// Body did not parse as the expected response shape.
  #[error("malformed response")]
  Malformed,

  /// `stat` was not "ok". The message is service-provided and logged only.
  #[error("rejected: {message}")]
  Rejected { message: String },
}

impl FetchError {
  pub fn is_cancelled(&self) -> bool {
    matches!(self, FetchError::Cancelled)
  }

  /// Generic user-facing message. Never includes raw error text; the
  /// malformed-payload case stays distinguishable.
  pub fn user_message(&self) -> &'static str {
    match self {
      FetchError::Cancelled => "Request cancelled.",
      FetchError::Timeout => "The request timed out.",
      FetchError::Network(_) => "Network failure.",
      FetchError::Api(ApiFailure::Malformed) => "Malformed response from the photo service.",
      FetchError::Api(ApiFailure::Rejected { .. }) => "The photo service rejected the request.",
    }
  }

  /// Classify a reqwest error. `without_url` keeps the api_key-bearing
  /// request URL out of logs.
  pub(crate) fn from_transport(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      FetchError::Timeout
    } else if err.is_decode() {
      FetchError::Api(ApiFailure::Malformed)
    } else {
      FetchError::Network(err.without_url().to_string())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_user_messages_do_not_leak_service_text() {
    let err = FetchError::Api(ApiFailure::Rejected {
      message: "Invalid API Key (Key has expired)".to_string(),
    });
    assert!(!err.user_message().contains("API Key"));
  }

  #[test]
  fn test_malformed_is_distinguishable() {
    let malformed = FetchError::Api(ApiFailure::Malformed).user_message();
    let rejected = FetchError::Api(ApiFailure::Rejected {
      message: String::new(),
    })
    .user_message();
    assert_ne!(malformed, rejected);
    assert!(malformed.contains("Malformed"));
  }
}
