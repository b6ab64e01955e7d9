//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use clanreg_core::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error(transparent)]
  Registry(#[from] Error),
}

fn status_of(e: &Error) -> StatusCode {
  match e {
    Error::InvalidCountry(_) | Error::InvalidId(_) => StatusCode::BAD_REQUEST,
    Error::NotFound(_)
    | Error::NotFoundUpstream(_)
    | Error::LanguagesUnavailable(_)
    | Error::NoRecords
    | Error::SeedFileMissing(_) => StatusCode::NOT_FOUND,
    Error::DuplicateId(_) | Error::DuplicateTag(_) => StatusCode::CONFLICT,
    Error::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
    _ => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Registry(e) => status_of(e),
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
