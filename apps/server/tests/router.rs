use agency::domain::config::AppConfig;
use agency_server::Server;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app_with(cfg: AppConfig) -> Router {
    Server::builder().config(cfg).build().expect("server").router()
}

fn app() -> Router {
    app_with(AppConfig::default())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).header("x-forwarded-for", "198.51.100.20").body(Body::empty()).expect("request")
}

async fn text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn health_is_nested_under_api() {
    let res = app().oneshot(get("/api/health")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert!(res.headers().contains_key(header::CONTENT_SECURITY_POLICY));

    let body: Value = serde_json::from_str(&text(res).await).expect("json");
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn crawler_documents_are_served_at_the_root() {
    let mut cfg = AppConfig::default();
    cfg.site.base_url = "https://agency.test".to_owned();
    let app = app_with(cfg);

    let res = app.clone().oneshot(get("/robots.txt")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    assert!(text(res).await.contains("Sitemap: https://agency.test/sitemap.xml"));

    let res = app.oneshot(get("/sitemap.xml")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    assert!(text(res).await.contains("<loc>https://agency.test/our-work</loc>"));
}

#[tokio::test]
async fn contact_submission_through_full_stack() {
    let body = json!({
        "name": "Full Stack",
        "email": "stack@example.com",
        "message": "Hello from the integration test.",
    });
    let req = Request::post("/api/contacts/")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "198.51.100.21")
        .body(Body::from(body.to_string()))
        .expect("request");

    let res = app().oneshot(req).await.expect("response");
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn api_docs_describe_every_route() {
    let res = app().oneshot(get("/api/docs")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);

    let html = text(res).await;
    assert!(html.contains("/api/contacts/{id}/mark_processed/"));
    assert!(html.contains("/api/health"));
    assert!(html.contains("/robots.txt"));
}

#[tokio::test]
async fn eleventh_request_is_limited_across_routes() {
    let app = app();

    for uri in ["/api/health", "/robots.txt"].iter().cycle().take(10) {
        let res = app.clone().oneshot(get(uri)).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
    }

    let res = app.oneshot(get("/sitemap.xml")).await.expect("response");
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.headers()[header::RETRY_AFTER], "60");
}

#[tokio::test]
async fn unknown_route_without_static_dir_is_404() {
    let res = app().oneshot(get("/our-work")).await.expect("response");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_dir_serves_unmatched_routes() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), "<h1>Averon</h1>").expect("write index");

    let mut cfg = AppConfig::default();
    cfg.site.static_dir = Some(dir.path().to_path_buf());
    let app = app_with(cfg);

    let res = app.clone().oneshot(get("/")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(text(res).await, "<h1>Averon</h1>");

    let res = app.oneshot(get("/api/health")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn missing_static_dir_fails_build() {
    let mut cfg = AppConfig::default();
    cfg.site.static_dir = Some("/definitely/not/here".into());

    let err = Server::builder().config(cfg).build().expect_err("missing dir");
    assert!(err.to_string().contains("Static directory not found"));
}

#[tokio::test]
async fn static_assets_do_not_spend_the_rate_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    for i in 0..12 {
        std::fs::write(dir.path().join(format!("a{i}.css")), "body{}").expect("write asset");
    }

    let mut cfg = AppConfig::default();
    cfg.site.static_dir = Some(dir.path().to_path_buf());
    let app = app_with(cfg);

    for i in 0..12 {
        let res = app.clone().oneshot(get(&format!("/a{i}.css"))).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK, "asset {i}");
        assert_eq!(res.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    let res = app.oneshot(get("/api/health")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
}
