//! JSON search API for the people roster.
//!
//! Exposes an axum [`Router`] backed by any
//! [`roster_core::store::PeopleStore`]. Every data endpoint requires an
//! `X-Organization-ID` header and is rate-limited per tenant and client.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Service banner |
//! | `GET`  | `/search` | Filtered, paginated, column-projected people |
//! | `GET`  | `/filters` | Available filter values for the tenant |

pub mod error;
pub mod filters;
pub mod identity;
pub mod search;

pub use error::ApiError;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{Json, Router, routing::get};
use roster_core::{
  columns::ColumnPolicy,
  engine::SearchEngine,
  ratelimit::{DEFAULT_REQUESTS_PER_MINUTE, RateLimiter},
  store::PeopleStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub rate_limit: RateLimitConfig,
  pub columns:    ColumnPolicy,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "0.0.0.0".to_owned(),
      port:       8000,
      store_path: PathBuf::from("roster.db"),
      rate_limit: RateLimitConfig::default(),
      columns:    ColumnPolicy::default(),
    }
  }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RateLimitConfig {
  /// Admissions per client per minute; `0` disables limiting.
  pub requests_per_minute:   u32,
  /// How often idle clients are swept from the limiter.
  pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
  fn default() -> Self {
    Self {
      requests_per_minute:   DEFAULT_REQUESTS_PER_MINUTE,
      cleanup_interval_secs: 60,
    }
  }
}

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ROSTER";

/// Load [`ServerConfig`] from the TOML file at `path` (optional) overlaid
/// with `ROSTER_*` environment variables. Nested keys are joined with a
/// double underscore: `ROSTER_RATE_LIMIT__REQUESTS_PER_MINUTE=20`.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  load_config_with_env(path, None)
}

/// Like [`load_config`], reading variables from `env` instead of the
/// process environment when given.
pub fn load_config_with_env(
  path: &Path,
  env: Option<config::Map<String, String>>,
) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .source(env),
    )
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PeopleStore> {
  pub engine:  SearchEngine<S>,
  pub limiter: Arc<RateLimiter>,
  pub config:  Arc<ServerConfig>,
}

impl<S: PeopleStore> AppState<S> {
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    let limiter: RateLimiter = RateLimiter::new(config.rate_limit.requests_per_minute);
    Self {
      engine:  SearchEngine::new(store, Arc::new(config.columns.clone())),
      limiter: Arc::new(limiter),
      config:  Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PeopleStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(root))
    .route("/search", get(search::handler::<S>))
    .route("/filters", get(filters::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn root() -> Json<Value> { Json(json!({ "message": "Roster search API" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
