use agency_domain::config::{
    AppConfig, ClientConfig, ContactConfig, NotifyConfig, RateLimitConfig, SecurityConfig,
    ServerConfig, SiteConfig,
};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 8000);
    assert!(server.ssl.is_none());

    let limits = RateLimitConfig::default();
    assert_eq!(limits.max_requests, 10);
    assert_eq!(limits.window_secs, 60);

    let security = SecurityConfig::default();
    assert_eq!(security.max_body_bytes, 1024 * 1024);
    assert!(!security.development);

    let client = ClientConfig::default();
    assert_eq!(client.api_url, "http://localhost:8000/api");
    assert_eq!(client.timeout_secs, 30);
    assert_eq!(client.max_retries, 3);
    assert_eq!(client.retry_delay_ms, 1000);

    let contact = ContactConfig::default();
    assert!(contact.admin_token.is_none());
    assert!(contact.screening);
    assert!(matches!(contact.notify, NotifyConfig::Log));
    assert_eq!(contact.submit_limit.max_requests, 3);
    assert_eq!(contact.submit_limit.window_secs, 3600);

    assert_eq!(SiteConfig::default().base_url, "https://averon.agency");
}

#[test]
fn app_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "site": { "base_url": "https://example.org", "static_dir": "/srv/site" },
        "security": { "rate_limit": { "max_requests": 5 }, "development": true },
        "contact": {
            "admin_token": "secret",
            "notify": { "kind": "smtp", "host": "smtp.example.org", "to": "team@example.org" }
        }
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.site.base_url, "https://example.org");
    assert_eq!(cfg.site.static_dir.as_deref(), Some(std::path::Path::new("/srv/site")));
    assert_eq!(cfg.security.rate_limit.max_requests, 5);
    assert_eq!(cfg.security.rate_limit.window_secs, 60);
    assert!(cfg.security.development);
    assert_eq!(cfg.contact.admin_token.as_deref(), Some("secret"));

    let NotifyConfig::Smtp(smtp) = &cfg.contact.notify else {
        panic!("expected smtp notifier, got {:?}", cfg.contact.notify);
    };
    assert_eq!(smtp.host, "smtp.example.org");
    assert_eq!(smtp.port, 587);
    assert_eq!(smtp.to, "team@example.org");

    // Untouched sections keep their defaults.
    assert_eq!(cfg.client.max_retries, 3);
}

#[test]
fn config_clone_on_write() {
    let base = AppConfig::default();
    let mut tweaked = base.clone();
    tweaked.server.port = 9000;

    assert_eq!(base.server.port, 8000);
    assert_eq!(tweaked.server.port, 9000);
}
