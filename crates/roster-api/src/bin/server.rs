//! roster-api server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) and
//! `ROSTER_*` environment variables, opens the SQLite store, and serves the
//! search API over HTTP.
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `ROSTER_RATE_LIMIT__REQUESTS_PER_MINUTE=20`.

use std::{
  net::SocketAddr,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use roster_api::AppState;
use roster_core::ratelimit::RateLimiter;
use roster_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster people search server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Populate an empty store with sample people for `org_1` and `org_2`.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = roster_api::load_config(&cli.config)?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.seed {
    let seeded = store.seed_if_empty().await.context("failed to seed store")?;
    tracing::info!(seeded, "seeded store");
  }

  let state = AppState::new(Arc::new(store), server_cfg.clone());
  spawn_cleanup(
    state.limiter.clone(),
    Duration::from_secs(server_cfg.rate_limit.cleanup_interval_secs.max(1)),
  );

  let app = roster_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(
    requests_per_minute = server_cfg.rate_limit.requests_per_minute,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await
  .context("server error")?;

  Ok(())
}

/// Periodically drop clients with no admissions left in the window.
fn spawn_cleanup(limiter: Arc<RateLimiter>, every: Duration) {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
      ticker.tick().await;
      let removed = limiter.cleanup_old_requests();
      if removed > 0 {
        tracing::debug!(removed, tracked = limiter.tracked(), "rate limiter cleanup");
      }
    }
  });
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
