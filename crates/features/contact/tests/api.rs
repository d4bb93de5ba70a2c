#![cfg(feature = "server")]

use agency_contact::ContactData;
use agency_contact::sanitize::sanitize_contact;
use agency_contact::server::{self, SUBMITTED_MESSAGE};
use agency_domain::config::{AppConfig, NotifyConfig, SmtpConfig};
use agency_kernel::server::ApiState;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

const TOKEN: &str = "s3cret-admin";

fn app_with(cfg: AppConfig) -> Router {
    let slice = server::init(&cfg.contact).expect("contact slice");
    let state = ApiState::builder().config(cfg).register_slice(slice).build().expect("state");
    let (router, _) = server::router().with_state(state).split_for_parts();
    router
}

fn app() -> Router {
    let mut cfg = AppConfig::default();
    cfg.contact.admin_token = Some(TOKEN.to_owned());
    app_with(cfg)
}

fn submit(body: &Value) -> Request<Body> {
    submit_from("203.0.113.1, 198.51.100.1", body)
}

fn submit_from(forwarded_for: &str, body: &Value) -> Request<Body> {
    Request::post("/contacts/")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", forwarded_for)
        .header(header::USER_AGENT, "Mozilla/5.0 Test Browser")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn admin_get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut req = Request::get(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    req.body(Body::empty()).expect("request")
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn valid() -> Value {
    json!({
        "name": "API Test User",
        "email": "APITest@Example.com",
        "message": "<p>This is an API test</p> message & more.",
    })
}

#[tokio::test]
async fn valid_submission_is_stored_sanitized() {
    let app = app();

    let res = app.clone().oneshot(submit(&valid())).await.expect("response");
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = json_body(res).await;
    assert_eq!(body["message"], SUBMITTED_MESSAGE);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["email"], "apitest@example.com");
    assert_eq!(body["data"]["message"], "This is an API test message &amp; more.");
    assert_eq!(body["email_sent"], false);

    let res = app.oneshot(admin_get("/contacts/1/", Some(TOKEN))).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    let record = json_body(res).await;
    assert_eq!(record["ip_address"], "203.0.113.1");
    assert_eq!(record["user_agent"], "Mozilla/5.0 Test Browser");
    assert_eq!(record["is_processed"], false);
}

#[tokio::test]
async fn invalid_submission_lists_every_field() {
    let res = app()
        .oneshot(submit(&json!({ "name": "A", "email": "invalid-email", "message": "Short" })))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = json_body(res).await;
    assert!(body["message"].as_str().is_some_and(|m| m.starts_with("Name must be 2-50 characters")));
    for field in ["name", "email", "message"] {
        assert!(body["errors"][field].is_array(), "missing errors for {field}");
    }
}

#[tokio::test]
async fn missing_fields_are_validation_errors() {
    let res = app().oneshot(submit(&json!({ "name": "Test User" }))).await.expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = json_body(res).await;
    assert!(body["errors"].get("name").is_none());
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn spam_is_rejected() {
    let mut spam = valid();
    spam["message"] = json!("Buy viagra now for cheap prices and free delivery!");

    let res = app().oneshot(submit(&spam)).await.expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(res).await["errors"]["message"].is_array());

    let mut disposable = valid();
    disposable["email"] = json!("test@tempmail.com");
    let res = app().oneshot(submit(&disposable)).await.expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let req = Request::post("/contacts/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");

    let res = app().oneshot(req).await.expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_routes_require_the_token() {
    let app = app();
    app.clone().oneshot(submit(&valid())).await.expect("response");

    for uri in ["/contacts/", "/contacts/1/", "/contacts/unprocessed/"] {
        let res = app.clone().oneshot(admin_get(uri, None)).await.expect("response");
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{uri} without token");

        let res = app.clone().oneshot(admin_get(uri, Some("wrong"))).await.expect("response");
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{uri} with wrong token");

        let res = app.clone().oneshot(admin_get(uri, Some(TOKEN))).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK, "{uri} with token");
    }
}

#[tokio::test]
async fn admin_routes_are_closed_without_configured_token() {
    let app = app_with(AppConfig::default());
    let res = app.oneshot(admin_get("/contacts/", Some(""))).await.expect("response");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn processing_moves_records_out_of_unprocessed() {
    let app = app();
    for _ in 0..2 {
        app.clone().oneshot(submit(&valid())).await.expect("response");
    }

    let req = Request::post("/contacts/1/mark_processed/")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .expect("request");
    let res = app.clone().oneshot(req).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    let record = json_body(res).await;
    assert_eq!(record["is_processed"], true);
    assert!(record["processed_at"].is_string());

    let res = app.clone().oneshot(admin_get("/contacts/unprocessed/", Some(TOKEN))).await.expect("response");
    let pending = json_body(res).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));
    assert_eq!(pending[0]["id"], 2);

    let res = app.oneshot(admin_get("/contacts/42/", Some(TOKEN))).await.expect("response");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notification_failure_does_not_fail_submission() {
    let mut cfg = AppConfig::default();
    cfg.contact.notify = NotifyConfig::Smtp(SmtpConfig {
        host: "localhost".to_owned(),
        port: 1,
        ..SmtpConfig::default()
    });

    let res = app_with(cfg).oneshot(submit(&valid())).await.expect("response");
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(json_body(res).await["email_sent"], false);
}

#[tokio::test]
async fn client_sanitized_payload_is_accepted_and_escaped_once() {
    let data = ContactData::new(
        "Mary-Jane O'Neil",
        "mary@example.com",
        "See https://example.com & tell me \"what\" you think.",
    );
    let body = serde_json::to_value(sanitize_contact(&data)).expect("payload");

    let res = app().oneshot(submit(&body)).await.expect("response");
    assert_eq!(res.status(), StatusCode::CREATED);

    let response = json_body(res).await;
    let stored = &response["data"];
    assert_eq!(stored["name"], "Mary-Jane O&#x27;Neil");
    assert_eq!(
        stored["message"],
        "See https:&#x2F;&#x2F;example.com &amp; tell me &quot;what&quot; you think."
    );

    let mut expected = body;
    expected["id"] = json!(1);
    assert_eq!(stored, &expected);
}

#[tokio::test]
async fn markup_in_name_is_stripped_before_validation() {
    let mut body = valid();
    body["name"] = json!("<b>John</b> <i>Doe</i>");

    let res = app().oneshot(submit(&body)).await.expect("response");
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(json_body(res).await["data"]["name"], "John Doe");
}

#[tokio::test]
async fn fourth_submission_per_hour_is_throttled() {
    let app = app();

    for _ in 0..3 {
        let res = app.clone().oneshot(submit(&valid())).await.expect("response");
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = app.clone().oneshot(submit(&valid())).await.expect("response");
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.headers()[header::RETRY_AFTER], "3600");
    assert_eq!(
        json_body(res).await["message"],
        "Request was throttled. Expected available in 3600 seconds."
    );

    let res = app.oneshot(submit_from("198.51.100.77", &valid())).await.expect("response");
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn submission_budget_is_configurable() {
    let mut cfg = AppConfig::default();
    cfg.contact.submit_limit.max_requests = 1;
    let app = app_with(cfg);

    let res = app.clone().oneshot(submit(&valid())).await.expect("response");
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.oneshot(submit(&valid())).await.expect("response");
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
}
