use crate::model::{ContactData, ContactRecord};
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Longest `User-Agent` kept with a submission, in characters.
pub const USER_AGENT_MAX_CHARS: usize = 500;

/// Request metadata recorded next to a submission.
#[derive(Debug, Clone, Default)]
pub struct Origin {
    pub ip_address: String,
    pub user_agent: Option<String>,
}

/// Process-local submission store. Ids start at 1 and never repeat.
#[derive(Debug, Default)]
pub struct ContactStore {
    records: RwLock<Vec<ContactRecord>>,
    next_id: AtomicU64,
}

impl ContactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an already sanitized submission.
    pub fn insert(&self, data: ContactData, origin: Origin) -> ContactRecord {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let record = ContactRecord {
            id,
            name: data.name,
            email: data.email,
            message: data.message,
            ip_address: origin.ip_address,
            user_agent: origin.user_agent.map(|ua| ua.chars().take(USER_AGENT_MAX_CHARS).collect()),
            created_at: Utc::now(),
            is_processed: false,
            processed_at: None,
        };

        self.records.write().push(record.clone());
        record
    }

    /// All submissions, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<ContactRecord> {
        self.records.read().iter().rev().cloned().collect()
    }

    #[must_use]
    pub fn unprocessed(&self) -> Vec<ContactRecord> {
        self.records.read().iter().rev().filter(|r| !r.is_processed).cloned().collect()
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<ContactRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    /// Flags a submission as handled. The first processing time is kept on repeat calls.
    pub fn mark_processed(&self, id: u64) -> Option<ContactRecord> {
        let mut records = self.records.write();
        let record = records.iter_mut().find(|r| r.id == id)?;
        if !record.is_processed {
            record.is_processed = true;
            record.processed_at = Some(Utc::now());
        }
        Some(record.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }
}
