//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No tenant identity was supplied with the request.
  #[error("organization id is required")]
  MissingTenant,

  #[error("invalid parameter: {0}")]
  InvalidParameter(String),

  /// Admission denied by the rate limiter. The caller should back off.
  #[error("rate limit exceeded for {identifier}")]
  RateLimited { identifier: String },

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
