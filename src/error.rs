//! Maps the judge crate's typed errors onto the HTTP boundary: every
//! 4xx/5xx response body is `{ "error": <message> }`, per the taxonomy in
//! the error handling design.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub struct ApiError(pub skillcode_judge::Error);

#[derive(Serialize)]
struct ErrorBody {
  error: String,
}

impl From<skillcode_judge::Error> for ApiError {
  fn from(err: skillcode_judge::Error) -> Self {
    return Self(err);
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = if self.0.is_not_found() {
      StatusCode::NOT_FOUND
    } else if self.0.is_client_error() {
      StatusCode::BAD_REQUEST
    } else {
      StatusCode::INTERNAL_SERVER_ERROR
    };

    log::error!("request failed: {}", self.0);

    return (
      status,
      Json(ErrorBody {
        error: self.0.to_string(),
      }),
    )
      .into_response();
  }
}
