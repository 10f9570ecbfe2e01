//! Sliding-window admission control keyed by client identifier.
//!
//! State is process-local: it is lost on restart and is not shared between
//! instances.

use std::{
  collections::VecDeque,
  time::{Duration, Instant},
};

use dashmap::DashMap;

use crate::{Error, Result};

pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 100;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

// ─── Window ──────────────────────────────────────────────────────────────────

/// Per-identifier admission history.
///
/// A timestamp `t` is inside the window at `now` when `now - t < window`.
pub trait AdmissionWindow: Default + Send + Sync {
  /// Prune, then admit and record `now` if fewer than `limit` admissions
  /// remain inside the window. A rejection records nothing.
  fn try_admit(&mut self, now: Instant, window: Duration, limit: u32) -> bool;

  /// Drop admissions that have left the window.
  fn prune(&mut self, now: Instant, window: Duration);

  fn is_empty(&self) -> bool;
}

/// The timestamps of every admission still inside the window. Pruning is
/// linear in the number retained.
#[derive(Debug, Default, Clone)]
pub struct SlidingLog {
  stamps: VecDeque<Instant>,
}

impl AdmissionWindow for SlidingLog {
  fn try_admit(&mut self, now: Instant, window: Duration, limit: u32) -> bool {
    self.prune(now, window);
    if self.stamps.len() < limit as usize {
      self.stamps.push_back(now);
      true
    } else {
      false
    }
  }

  fn prune(&mut self, now: Instant, window: Duration) {
    self
      .stamps
      .retain(|&t| now.saturating_duration_since(t) < window);
  }

  fn is_empty(&self) -> bool { self.stamps.is_empty() }
}

// ─── Limiter ─────────────────────────────────────────────────────────────────

/// Admits at most `limit` requests per identifier in any trailing window.
///
/// Windows live in a sharded map; the shard lock is held across the
/// check-then-record step, so concurrent calls for one identifier can never
/// admit more than `limit`. A limit of zero disables limiting.
#[derive(Debug)]
pub struct RateLimiter<W = SlidingLog> {
  windows: DashMap<String, W>,
  limit:   u32,
  window:  Duration,
}

impl<W: AdmissionWindow> RateLimiter<W> {
  pub fn new(limit: u32) -> Self { Self::with_window(limit, DEFAULT_WINDOW) }

  pub fn with_window(limit: u32, window: Duration) -> Self {
    Self { windows: DashMap::new(), limit, window }
  }

  pub fn limit(&self) -> u32 { self.limit }

  pub fn window(&self) -> Duration { self.window }

  /// Admit or reject one request for `identifier` now.
  pub fn is_allowed(&self, identifier: &str) -> bool {
    self.is_allowed_at(identifier, Instant::now())
  }

  /// Admit or reject one request for `identifier` as of `now`.
  pub fn is_allowed_at(&self, identifier: &str, now: Instant) -> bool {
    if self.limit == 0 {
      return true;
    }
    if let Some(mut w) = self.windows.get_mut(identifier) {
      return w.try_admit(now, self.window, self.limit);
    }
    self
      .windows
      .entry(identifier.to_owned())
      .or_default()
      .try_admit(now, self.window, self.limit)
  }

  /// Like [`Self::is_allowed`], but as a [`Result`] carrying
  /// [`Error::RateLimited`].
  pub fn check(&self, identifier: &str) -> Result<()> {
    if self.is_allowed(identifier) {
      Ok(())
    } else {
      Err(Error::RateLimited { identifier: identifier.to_owned() })
    }
  }

  /// Prune every identifier and forget those left empty. Meant for a
  /// periodic background task, not the request path. Returns how many
  /// identifiers were removed.
  pub fn cleanup_old_requests(&self) -> usize {
    self.cleanup_at(Instant::now())
  }

  pub fn cleanup_at(&self, now: Instant) -> usize {
    let before = self.windows.len();
    self.windows.retain(|_, w| {
      w.prune(now, self.window);
      !w.is_empty()
    });
    before.saturating_sub(self.windows.len())
  }

  /// Number of identifiers currently holding state.
  pub fn tracked(&self) -> usize { self.windows.len() }
}

impl Default for RateLimiter {
  fn default() -> Self { Self::new(DEFAULT_REQUESTS_PER_MINUTE) }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::atomic::{AtomicU32, Ordering},
    thread,
  };

  use super::*;

  #[test]
  fn admits_up_to_limit_then_rejects() {
    let limiter: RateLimiter = RateLimiter::new(10);
    for _ in 0..10 {
      assert!(limiter.is_allowed("test_client"));
    }
    assert!(!limiter.is_allowed("test_client"));
  }

  #[test]
  fn identifiers_are_isolated() {
    let limiter: RateLimiter = RateLimiter::new(2);
    assert!(limiter.is_allowed("client_1"));
    assert!(limiter.is_allowed("client_2"));
    assert!(limiter.is_allowed("client_1"));
    assert!(limiter.is_allowed("client_2"));
    assert!(!limiter.is_allowed("client_1"));
    assert!(!limiter.is_allowed("client_2"));
    assert!(limiter.is_allowed("client_3"));
  }

  #[test]
  fn window_slides() {
    let limiter: RateLimiter = RateLimiter::new(3);
    let t0 = Instant::now();
    assert!(limiter.is_allowed_at("a", t0));
    assert!(limiter.is_allowed_at("a", t0 + Duration::from_secs(10)));
    assert!(limiter.is_allowed_at("a", t0 + Duration::from_secs(20)));
    assert!(!limiter.is_allowed_at("a", t0 + Duration::from_secs(59)));

    // Exactly 60s after the first admission it has left the window.
    assert!(limiter.is_allowed_at("a", t0 + Duration::from_secs(60)));
    assert!(!limiter.is_allowed_at("a", t0 + Duration::from_secs(61)));
    assert!(limiter.is_allowed_at("a", t0 + Duration::from_secs(71)));
  }

  #[test]
  fn rejections_do_not_extend_the_window() {
    let limiter: RateLimiter = RateLimiter::new(1);
    let t0 = Instant::now();
    assert!(limiter.is_allowed_at("a", t0));
    for s in 1..60 {
      assert!(!limiter.is_allowed_at("a", t0 + Duration::from_secs(s)));
    }
    assert!(limiter.is_allowed_at("a", t0 + Duration::from_secs(60)));
  }

  #[test]
  fn check_reports_identifier() {
    let limiter: RateLimiter = RateLimiter::new(1);
    assert!(limiter.check("org_1:10.0.0.1").is_ok());
    match limiter.check("org_1:10.0.0.1") {
      Err(Error::RateLimited { identifier }) => {
        assert_eq!(identifier, "org_1:10.0.0.1")
      }
      other => panic!("expected RateLimited, got {other:?}"),
    }
  }

  #[test]
  fn zero_limit_disables_limiting() {
    let limiter: RateLimiter = RateLimiter::new(0);
    for _ in 0..1000 {
      assert!(limiter.is_allowed("a"));
    }
    assert_eq!(limiter.tracked(), 0);
  }

  #[test]
  fn cleanup_drops_idle_identifiers() {
    let limiter: RateLimiter = RateLimiter::new(5);
    let t0 = Instant::now();
    assert!(limiter.is_allowed_at("old", t0));
    assert!(limiter.is_allowed_at("fresh", t0 + Duration::from_secs(30)));
    assert_eq!(limiter.tracked(), 2);

    assert_eq!(limiter.cleanup_at(t0 + Duration::from_secs(65)), 1);
    assert_eq!(limiter.tracked(), 1);
    assert_eq!(limiter.cleanup_at(t0 + Duration::from_secs(90)), 1);
    assert_eq!(limiter.tracked(), 0);
  }

  #[test]
  fn concurrent_callers_cannot_exceed_limit() {
    let limiter: RateLimiter = RateLimiter::new(100);
    let admitted = AtomicU32::new(0);
    thread::scope(|s| {
      for _ in 0..8 {
        s.spawn(|| {
          for _ in 0..50 {
            if limiter.is_allowed("shared") {
              admitted.fetch_add(1, Ordering::Relaxed);
            }
          }
        });
      }
    });
    assert_eq!(admitted.load(Ordering::Relaxed), 100);
  }
}
