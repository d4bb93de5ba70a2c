use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The name/email/message triple a visitor submits.
///
/// Missing JSON fields deserialize as empty strings so they surface as
/// per-field validation errors rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct ContactData {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactData {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), message: message.into() }
    }
}

/// A stored submission, as the admin endpoints return it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ContactRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
}

impl ContactRecord {
    #[must_use]
    pub fn submitted(&self) -> SubmittedContact {
        SubmittedContact {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        }
    }
}

/// Public view of a freshly stored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct SubmittedContact {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Body of a `201 Created` answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ContactResponse {
    pub message: String,
    pub data: SubmittedContact,
    #[serde(default)]
    pub email_sent: bool,
}
