//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::QueryRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler or extractor.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("X-Organization-ID header is required")]
  MissingTenant,

  #[error("invalid parameter: {0}")]
  InvalidParameter(String),

  #[error("rate limit exceeded, retry later")]
  RateLimited { retry_after_secs: u64 },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Stable machine-readable discriminant included in error bodies.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::MissingTenant => "missing_tenant",
      Self::InvalidParameter(_) => "invalid_parameter",
      Self::RateLimited { .. } => "rate_limited",
      Self::Store(_) => "store_unavailable",
    }
  }
}

impl From<roster_core::Error> for ApiError {
  fn from(e: roster_core::Error) -> Self {
    use roster_core::Error as E;
    match e {
      E::MissingTenant => Self::MissingTenant,
      E::InvalidParameter(m) => Self::InvalidParameter(m),
      E::RateLimited { .. } => Self::RateLimited { retry_after_secs: 60 },
      E::StoreUnavailable(e) => Self::Store(e),
    }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::InvalidParameter(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::MissingTenant | ApiError::InvalidParameter(_) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let body = Json(json!({ "error": self.to_string(), "kind": self.kind() }));
    let mut res = (status, body).into_response();
    if let ApiError::RateLimited { retry_after_secs } = self {
      res
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use axum::{extract::Query, http::Uri};

  use super::*;

  #[tokio::test]
  async fn query_rejection_becomes_json_invalid_parameter() {
    let uri: Uri = "/search?limit=ten".parse().unwrap();
    let rejection =
      Query::<HashMap<String, u32>>::try_from_uri(&uri).unwrap_err();

    let err = ApiError::from(rejection);
    assert_eq!(err.kind(), "invalid_parameter");

    let res = err.into_response();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
      .await
      .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "invalid_parameter");
  }
}
