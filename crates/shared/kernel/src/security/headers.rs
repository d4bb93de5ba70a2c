use agency_domain::config::SecurityConfig;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

const X_XSS_PROTECTION: HeaderName = HeaderName::from_static("x-xss-protection");
const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");
const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");

const DEV_CONNECT_SRC: &str = "'self' http://localhost:8000 http://127.0.0.1:8000 \
    ws://localhost:3000 ws://127.0.0.1:3000 ws://localhost:* ws://127.0.0.1:*";

/// Precomputed response hardening headers.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    csp: HeaderValue,
}

impl SecurityHeaders {
    /// Builds the policy from config; `api_url` supplies the origin when
    /// `security.api_origin` is unset.
    #[must_use]
    pub fn from_config(cfg: &SecurityConfig, api_url: &str) -> Self {
        let origin = cfg.api_origin.clone().unwrap_or_else(|| api_origin(api_url));
        let policy = content_security_policy(&origin, cfg.development);

        let csp = HeaderValue::from_str(&policy).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid CSP header, falling back to self-only policy");
            HeaderValue::from_static("default-src 'self'")
        });

        Self { csp }
    }

    #[must_use]
    pub fn content_security_policy(&self) -> &str {
        self.csp.to_str().unwrap_or_default()
    }

    fn apply(&self, response: &mut Response) {
        let headers = response.headers_mut();
        headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
        headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
        headers.insert(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        );
        headers.insert(
            PERMISSIONS_POLICY,
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        );
        headers.insert(header::CONTENT_SECURITY_POLICY, self.csp.clone());
        headers.remove(X_POWERED_BY);
        headers.remove(header::SERVER);
    }
}

/// Extracts the scheme+host+port origin of the API base URL.
///
/// Unparseable values fall back to everything before `/api`.
#[must_use]
pub fn api_origin(api_url: &str) -> String {
    url::Url::parse(api_url).map_or_else(
        |_| api_url.split("/api").next().unwrap_or(api_url).to_owned(),
        |url| url.origin().ascii_serialization(),
    )
}

#[must_use]
pub fn content_security_policy(api_origin: &str, development: bool) -> String {
    let connect_src =
        if development { DEV_CONNECT_SRC.to_owned() } else { format!("'self' {api_origin}") };

    let directives = [
        "default-src 'self'".to_owned(),
        "script-src 'self' 'unsafe-inline' 'unsafe-eval'".to_owned(),
        "style-src 'self' 'unsafe-inline'".to_owned(),
        "img-src 'self' data: blob: https:".to_owned(),
        "font-src 'self' data:".to_owned(),
        format!("connect-src {connect_src}"),
        "frame-ancestors 'self'".to_owned(),
        "base-uri 'self'".to_owned(),
        format!("form-action 'self' {api_origin}"),
    ];

    format!("{};", directives.join("; "))
}

/// Axum middleware adding [`SecurityHeaders`] to every response that passes through.
pub async fn security_headers(
    State(headers): State<Arc<SecurityHeaders>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    headers.apply(&mut response);
    response
}

/// Upper bound for a request's declared `Content-Length`.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub u64);

/// Rejects requests declaring a body larger than [`BodyLimit`] with `413`.
///
/// Only the header is inspected; a missing or unparseable length passes.
pub async fn limit_request_size(
    State(BodyLimit(limit)): State<BodyLimit>,
    req: Request,
    next: Next,
) -> Response {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    if let Some(size) = declared.filter(|&size| size > limit) {
        warn!(size, limit, path = %req.uri().path(), "Request entity too large");
        return (StatusCode::PAYLOAD_TOO_LARGE, Json(json!({ "error": "Request entity too large" })))
            .into_response();
    }

    next.run(req).await
}
