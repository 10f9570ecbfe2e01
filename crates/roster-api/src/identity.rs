//! Request identity and rate-limit admission extractors.
//!
//! The tenant comes from `X-Organization-ID` (required). The client comes
//! from `X-Client-ID`, falling back to the peer address when the server was
//! started with connect info, and to `unknown` otherwise.

use std::net::SocketAddr;

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::{HeaderMap, request::Parts},
};
use roster_core::store::PeopleStore;

use crate::{AppState, error::ApiError};

pub const TENANT_HEADER: &str = "x-organization-id";
pub const CLIENT_HEADER: &str = "x-client-id";

/// Who is calling: the tenant whose data is read and the client being
/// rate-limited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
  pub tenant_id: String,
  pub client_id: String,
}

impl ClientIdentity {
  /// Key under which the rate limiter tracks this caller.
  pub fn rate_limit_key(&self) -> String {
    format!("{}:{}", self.tenant_id, self.client_id)
  }

  pub fn from_parts(parts: &Parts) -> Result<Self, ApiError> {
    let tenant_id = header_str(&parts.headers, TENANT_HEADER)?
      .ok_or(ApiError::MissingTenant)?;

    let client_id = match header_str(&parts.headers, CLIENT_HEADER)? {
      Some(c) => c,
      None => parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned()),
    };

    Ok(Self { tenant_id, client_id })
  }
}

/// A trimmed, non-empty header value.
fn header_str(headers: &HeaderMap, name: &str) -> Result<Option<String>, ApiError> {
  let Some(value) = headers.get(name) else {
    return Ok(None);
  };
  let s = value
    .to_str()
    .map_err(|_| ApiError::InvalidParameter(format!("{name} is not valid ASCII")))?
    .trim();
  Ok((!s.is_empty()).then(|| s.to_owned()))
}

impl<S> FromRequestParts<AppState<S>> for ClientIdentity
where
  S: PeopleStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Self::from_parts(parts)
  }
}

/// Present in a handler means the caller was identified and admitted by the
/// rate limiter.
#[derive(Debug)]
pub struct Admitted(pub ClientIdentity);

impl<S> FromRequestParts<AppState<S>> for Admitted
where
  S: PeopleStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let identity = ClientIdentity::from_parts(parts)?;
    let key = identity.rate_limit_key();
    if let Err(e) = state.limiter.check(&key) {
      tracing::warn!(client = %key, "rate limit exceeded");
      return Err(e.into());
    }
    Ok(Admitted(identity))
  }
}

#[cfg(test)]
mod tests {
  use std::net::{IpAddr, Ipv4Addr};

  use axum::{body::Body, http::Request};

  use super::*;

  fn parts(headers: &[(&str, &str)]) -> Parts {
    let mut builder = Request::builder();
    for (k, v) in headers {
      builder = builder.header(*k, *v);
    }
    builder.body(Body::empty()).unwrap().into_parts().0
  }

  #[test]
  fn tenant_and_client_headers() {
    let id = ClientIdentity::from_parts(&parts(&[
      ("X-Organization-ID", "org_1"),
      ("X-Client-ID", "dashboard"),
    ]))
    .unwrap();
    assert_eq!(id.tenant_id, "org_1");
    assert_eq!(id.rate_limit_key(), "org_1:dashboard");
  }

  #[test]
  fn missing_or_blank_tenant() {
    for p in [parts(&[]), parts(&[("X-Organization-ID", "  ")])] {
      assert!(matches!(
        ClientIdentity::from_parts(&p),
        Err(ApiError::MissingTenant)
      ));
    }
  }

  #[test]
  fn client_falls_back_to_peer_then_unknown() {
    let mut p = parts(&[("X-Organization-ID", "org_1")]);
    assert_eq!(ClientIdentity::from_parts(&p).unwrap().client_id, "unknown");

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 4242);
    p.extensions.insert(ConnectInfo(addr));
    assert_eq!(ClientIdentity::from_parts(&p).unwrap().client_id, "10.0.0.7");
  }
}
