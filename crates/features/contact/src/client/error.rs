use crate::validation::ValidationError;

pub const TIMEOUT_MESSAGE: &str = "Request timeout. Please try again.";

/// Failures surfaced by [`super::ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,
    #[error("Request cancelled.")]
    Cancelled,
    /// Non-2xx answer, carrying the server-provided text.
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Network error: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid response body: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
    #[error("Client setup failed: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Server errors and transport failures are worth another attempt; timeouts are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status >= 500,
            Self::Network { .. } => true,
            _ => false,
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
