//! HTTP security layer: client IP resolution, fixed-window rate limiting,
//! request size guard and response hardening headers.

pub mod client_ip;
pub mod headers;
pub mod rate_limit;

pub use client_ip::{ClientIp, client_ip};
pub use headers::{BodyLimit, SecurityHeaders, limit_request_size, security_headers};
pub use rate_limit::{Decision, FixedWindowLimiter, SweepTask, rate_limit};

use agency_domain::config::AppConfig;
use axum::Router;
use axum::middleware::from_fn_with_state;
use std::sync::Arc;

/// Everything the security middleware stack needs, built once from config.
#[derive(Debug, Clone)]
pub struct SecurityLayer {
    pub limiter: Arc<FixedWindowLimiter>,
    pub headers: Arc<SecurityHeaders>,
    pub body_limit: BodyLimit,
}

impl SecurityLayer {
    #[must_use]
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            limiter: Arc::new(FixedWindowLimiter::from_config(&cfg.security.rate_limit)),
            headers: Arc::new(SecurityHeaders::from_config(&cfg.security, &cfg.client.api_url)),
            body_limit: BodyLimit(cfg.security.max_body_bytes),
        }
    }

    /// Wraps `router` with the full stack: size guard and hardening headers outside,
    /// rate limiting inside.
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.harden(self.rate_limited(router))
    }

    /// Counts every request reaching `router` against the per-IP budget.
    ///
    /// Apply it to API and dynamic routes only; static assets merged in afterwards
    /// stay outside the budget.
    pub fn rate_limited<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(from_fn_with_state(self.limiter.clone(), rate_limit))
    }

    /// Rejects oversized requests and adds the hardening headers to every response.
    pub fn harden<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .layer(from_fn_with_state(self.headers.clone(), security_headers))
            .layer(from_fn_with_state(self.body_limit, limit_request_size))
    }
}
