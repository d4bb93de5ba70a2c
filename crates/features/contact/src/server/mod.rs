//! Contact submission backend: handlers, store and notifications.

mod auth;
mod error;
mod handlers;
mod notifier;
mod store;

pub use auth::Admin;
pub use error::{ContactError, ErrorBody};
pub use handlers::SUBMITTED_MESSAGE;
pub use notifier::{Notifier, SmtpNotifier};
pub use store::{ContactStore, Origin, USER_AGENT_MAX_CHARS};

use agency_domain::config::ContactConfig;
use agency_domain::registry::{FeatureSlice, InitializedSlice};
use agency_kernel::security::FixedWindowLimiter;
use agency_kernel::server::ApiState;
use std::any::Any;
use std::ops::Deref;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Contact feature state.
#[derive(Debug)]
pub struct ContactInner {
    pub store: ContactStore,
    pub notifier: Notifier,
    pub admin_token: Option<String>,
    pub screening: bool,
    /// Per-IP submission budget.
    pub submit_limiter: Arc<FixedWindowLimiter>,
}

#[derive(Debug, Clone)]
pub struct Contact {
    inner: Arc<ContactInner>,
}

impl Contact {
    #[must_use]
    pub fn new(inner: ContactInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for Contact {
    type Target = ContactInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FeatureSlice for Contact {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Initialize the contact feature.
///
/// # Errors
/// Returns an error if the notification channel cannot be configured.
pub fn init(cfg: &ContactConfig) -> Result<InitializedSlice, ContactError> {
    let notifier = Notifier::from_config(&cfg.notify)?;

    if cfg.admin_token.as_deref().is_none_or(str::is_empty) {
        tracing::warn!("No contact.admin_token configured, admin endpoints will refuse all requests");
    }

    let slice = Contact::new(ContactInner {
        store: ContactStore::new(),
        notifier,
        admin_token: cfg.admin_token.clone(),
        screening: cfg.screening,
        submit_limiter: Arc::new(FixedWindowLimiter::from_config(&cfg.submit_limit)),
    });

    tracing::info!(
        screening = cfg.screening,
        submit_limit = cfg.submit_limit.max_requests,
        submit_window_secs = cfg.submit_limit.window_secs,
        "Contact server slice initialized"
    );
    Ok(InitializedSlice::new(slice))
}

/// Public submission endpoint plus the admin listing routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::submit_contact, handlers::list_contacts))
        .routes(routes!(handlers::list_unprocessed))
        .routes(routes!(handlers::get_contact))
        .routes(routes!(handlers::mark_processed))
}
