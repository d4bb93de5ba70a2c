use agency_domain::config::RateLimitConfig;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::client_ip::ClientIp;

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Per-key fixed-window request counter.
///
/// A window opens on the first request for a key and closes `window` later; the
/// next request after that opens a fresh one. Expired windows are dropped by
/// [`FixedWindowLimiter::sweep`], usually driven by [`FixedWindowLimiter::spawn_sweeper`].
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<FxHashMap<String, Window>>,
}

impl FixedWindowLimiter {
    /// `max_requests` is clamped to at least one, `window` to at least one second.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window: window.max(Duration::from_secs(1)),
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        Self::new(cfg.max_requests, Duration::from_secs(cfg.window_secs))
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub const fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Number of tracked keys, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    /// Counts one request for `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut entries = self.entries.lock();

        match entries.get_mut(key) {
            Some(window) if now <= window.reset_at => {
                if window.count >= self.max_requests {
                    return Decision::Limited { retry_after: self.window };
                }
                window.count += 1;
                Decision::Allowed { remaining: self.max_requests - window.count }
            },
            _ => {
                entries.insert(key.to_owned(), Window { count: 1, reset_at: now + self.window });
                Decision::Allowed { remaining: self.max_requests - 1 }
            },
        }
    }

    /// Drops expired windows, returning how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, window| now <= window.reset_at);
        before - entries.len()
    }

    /// Spawns the periodic cleanup, ticking once per window.
    ///
    /// The task holds only a weak reference and stops once the limiter is dropped;
    /// dropping the returned [`SweepTask`] stops it as well.
    #[must_use = "dropping the handle stops the sweeper"]
    pub fn spawn_sweeper(self: &Arc<Self>) -> SweepTask {
        let limiter: Weak<Self> = Arc::downgrade(self);
        let period = self.window;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(limiter) = limiter.upgrade() else { break };
                let removed = limiter.sweep();
                if removed > 0 {
                    debug!(removed, tracked = limiter.len(), "Swept expired rate-limit windows");
                }
            }
        });

        SweepTask { handle }
    }
}

/// Handle to the background sweep; aborts the task on drop.
#[derive(Debug)]
pub struct SweepTask {
    handle: JoinHandle<()>,
}

impl SweepTask {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Axum middleware rejecting over-limit clients with `429 Too Many Requests`.
///
/// ```rust,ignore
/// let limiter = Arc::new(FixedWindowLimiter::new(10, Duration::from_secs(60)));
/// let app = Router::new()
///     .route("/", get(handler))
///     .layer(axum::middleware::from_fn_with_state(limiter, rate_limit));
/// ```
pub async fn rate_limit(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    ClientIp(ip): ClientIp,
    req: Request,
    next: Next,
) -> Response {
    match limiter.check(&ip) {
        Decision::Allowed { .. } => next.run(req).await,
        Decision::Limited { retry_after } => {
            warn!(ip = %ip, path = %req.uri().path(), "Rate limit exceeded");
            too_many_requests(retry_after)
        },
    }
}

fn too_many_requests(retry_after: Duration) -> Response {
    let secs = retry_after.as_secs();
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, secs.to_string())],
        Json(json!({
            "error": "Too many requests. Please try again later.",
            "retryAfter": secs,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_degenerate_limits() {
        let limiter = FixedWindowLimiter::new(0, Duration::ZERO);
        assert_eq!(limiter.max_requests(), 1);
        assert_eq!(limiter.window(), Duration::from_secs(1));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("10.0.0.1", now).is_allowed());
        assert!(!limiter.check_at("10.0.0.1", now).is_allowed());
        assert!(limiter.check_at("10.0.0.2", now).is_allowed());
    }

    #[test]
    fn remaining_counts_down() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        assert_eq!(limiter.check_at("k", now), Decision::Allowed { remaining: 2 });
        assert_eq!(limiter.check_at("k", now), Decision::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at("k", now), Decision::Allowed { remaining: 0 });
        assert_eq!(
            limiter.check_at("k", now),
            Decision::Limited { retry_after: Duration::from_secs(60) }
        );
    }
}
