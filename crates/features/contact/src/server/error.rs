use crate::validation::ValidationError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::error;

fn format_context(context: Option<&Cow<'static, str>>) -> Cow<'static, str> {
    context.map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

/// Errors raised by the contact backend.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Malformed request body: {0}")]
    Malformed(#[from] JsonRejection),
    #[error("Admin authentication required")]
    Forbidden,
    #[error("Contact not found")]
    NotFound { id: u64 },
    #[error("Request was throttled. Expected available in {} seconds.", .retry_after.as_secs())]
    Throttled { retry_after: Duration },
    #[error("Invalid mail address{}: {source}", format_context(.context.as_ref()))]
    Address {
        #[source]
        source: lettre::address::AddressError,
        context: Option<Cow<'static, str>>,
    },
    #[error("Mail build error{}: {source}", format_context(.context.as_ref()))]
    Mail {
        #[source]
        source: lettre::error::Error,
        context: Option<Cow<'static, str>>,
    },
    #[error("SMTP error{}: {source}", format_context(.context.as_ref()))]
    Smtp {
        #[source]
        source: lettre::transport::smtp::Error,
        context: Option<Cow<'static, str>>,
    },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal contact error{}: {message}", format_context(.context.as_ref()))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<agency_kernel::server::ApiStateError> for ContactError {
    fn from(e: agency_kernel::server::ApiStateError) -> Self {
        Self::Internal { message: e.to_string().into(), context: Some("slice registry".into()) }
    }
}

/// Body of every non-2xx contact answer.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub errors: BTreeMap<&'static str, Vec<&'static str>>,
}

impl ContactError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => ErrorBody { message: e.to_string(), errors: e.by_field() },
            Self::Malformed(_) | Self::Forbidden | Self::NotFound { .. } | Self::Throttled { .. } => {
                ErrorBody { message: self.to_string(), errors: BTreeMap::new() }
            },
            _ => {
                error!(error = %self, "Contact request failed");
                ErrorBody { message: "Internal server error".to_owned(), errors: BTreeMap::new() }
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Self::Throttled { retry_after } = self {
            response.headers_mut().insert(header::RETRY_AFTER, retry_after.as_secs().into());
        }
        response
    }
}
