#![cfg(feature = "server")]

use agency_domain::config::AppConfig;
use agency_kernel::server::ApiState;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

fn app() -> Router {
    let mut cfg = AppConfig::default();
    cfg.site.base_url = "https://staging.example.org/".to_owned();

    let slice = agency_seo::init(&cfg.site).expect("seo slice");
    let state = ApiState::builder().config(cfg).register_slice(slice).build().expect("state");
    let (router, _) = agency_seo::server::router().with_state(state).split_for_parts();
    router
}

async fn fetch(uri: &str) -> (StatusCode, String, String) {
    let res = app().oneshot(Request::get(uri).body(Body::empty()).expect("request")).await.expect("response");
    let status = res.status();
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    (status, content_type, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn sitemap_uses_configured_origin() {
    let (status, content_type, body) = fetch("/sitemap.xml").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/xml");
    assert!(body.contains("<loc>https://staging.example.org</loc>"));
    assert!(body.contains("<loc>https://staging.example.org/our-work</loc>"));
}

#[tokio::test]
async fn robots_points_at_sitemap() {
    let (status, content_type, body) = fetch("/robots.txt").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/plain"));
    assert!(body.starts_with("User-Agent: *\n"));
    assert!(body.contains("Sitemap: https://staging.example.org/sitemap.xml\n"));
}

#[tokio::test]
async fn missing_slice_is_not_found() {
    let state = ApiState::builder().config(AppConfig::default()).build().expect("state");
    let (router, _): (Router, _) = agency_seo::server::router().with_state(state).split_for_parts();

    let res = router
        .oneshot(Request::get("/robots.txt").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
