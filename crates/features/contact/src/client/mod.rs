//! HTTP client for the contact API.
//!
//! ```rust,no_run
//! use agency_contact::ContactData;
//! use agency_contact::client::ApiClient;
//!
//! # async fn run() -> Result<(), agency_contact::client::ClientError> {
//! let client = ApiClient::new("http://localhost:8000/api")?;
//! let response = client
//!     .submit_contact(&ContactData::new("Jane Smith", "jane@example.com", "Hello from the docs!"))
//!     .await?;
//! println!("stored as #{}", response.data.id);
//! # Ok(())
//! # }
//! ```

mod error;
mod retry;

pub use error::{ClientError, TIMEOUT_MESSAGE};
pub use retry::RetryPolicy;

use crate::model::{ContactData, ContactRecord, ContactResponse};
use crate::sanitize::sanitize_contact;
use crate::validation::InputValidator;
use agency_domain::config::ClientConfig;
use agency_domain::constants::DEFAULT_API_URL;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, instrument, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateless REST client: no cookie store, every attempt bounded by a timeout,
/// transient failures retried with exponential backoff.
///
/// Clones share one cancellation signal, so [`ApiClient::cancel_all_requests`] reaches
/// requests started from any clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    timeout: Duration,
    retry: RetryPolicy,
    cancel: Arc<Notify>,
}

impl ApiClient {
    /// Builds a client for `base_url` (e.g. `https://api.example.org/api`).
    ///
    /// # Errors
    /// Returns [`ClientError::Build`] if the HTTP backend cannot be initialized.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|source| ClientError::Build { source })?;
        Ok(Self::with_http(http, base_url.as_ref()))
    }

    /// Client for the local development backend at `http://localhost:8000/api`.
    ///
    /// # Errors
    /// Returns [`ClientError::Build`] if the HTTP backend cannot be initialized.
    pub fn local() -> Result<Self, ClientError> {
        Self::new(DEFAULT_API_URL)
    }

    /// # Errors
    /// Returns [`ClientError::Build`] if the HTTP backend cannot be initialized.
    pub fn from_config(cfg: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(&cfg.api_url)?
            .with_timeout(Duration::from_secs(cfg.timeout_secs))
            .with_retry_policy(RetryPolicy::new(
                cfg.max_retries,
                Duration::from_millis(cfg.retry_delay_ms),
            )))
    }

    fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            cancel: Arc::new(Notify::new()),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Validates, sanitizes and posts a submission to `{base}/contacts/`.
    ///
    /// # Errors
    /// [`ClientError::Validation`] before any network traffic; otherwise the terminal
    /// transport or HTTP error after retries.
    #[instrument(skip_all, fields(base_url = %self.base_url))]
    pub async fn submit_contact(&self, data: &ContactData) -> Result<ContactResponse, ClientError> {
        InputValidator::validate_contact(data)?;
        let payload = sanitize_contact(data);
        let url = format!("{}/contacts/", self.base_url);

        self.execute(|http| http.post(&url).json(&payload)).await
    }

    /// Lists stored submissions via the admin endpoint.
    ///
    /// # Errors
    /// The terminal transport or HTTP error after retries (`403` for a bad token).
    #[instrument(skip_all, fields(base_url = %self.base_url))]
    pub async fn get_contacts(&self, token: &str) -> Result<Vec<ContactRecord>, ClientError> {
        let url = format!("{}/contacts/", self.base_url);
        self.execute(|http| http.get(&url).bearer_auth(token)).await
    }

    /// Aborts every request currently in flight on this client or its clones.
    ///
    /// Requests started afterwards are unaffected.
    pub fn cancel_all_requests(&self) {
        debug!("Cancelling in-flight requests");
        self.cancel.notify_waiters();
    }

    async fn execute<T, F>(&self, build: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        tokio::select! {
            biased;
            () = &mut cancelled => Err(ClientError::Cancelled),
            res = self.with_retry(&build) => res,
        }
    }

    async fn with_retry<T, F>(&self, build: &F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            match self.attempt(build).await {
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt);
                    attempt += 1;
                    warn!(attempt, delay_ms = delay.as_millis(), error = %err, "Request failed, retrying");
                    tokio::time::sleep(delay).await;
                },
                res => return res,
            }
        }
    }

    async fn attempt<T, F>(&self, build: &F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let request = async {
            let response = build(&self.http)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|source| {
                    if source.is_timeout() { ClientError::Timeout } else { ClientError::Network { source } }
                })?;
            Self::read(response).await
        };

        tokio::time::timeout(self.timeout, request).await.map_err(|_| ClientError::Timeout)?
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|source| ClientError::Decode { source });
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Http { status: status.as_u16(), message: error_message(status.as_u16(), &body) })
    }
}

/// Picks the server-provided text out of an error body: `message`, then `error`,
/// else a generic status line.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .into_iter()
                .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}
