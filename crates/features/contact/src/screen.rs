//! Spam screening applied by the backend after validation.

use crate::model::ContactData;
use crate::validation::{Field, ValidationError};

pub const DISPOSABLE_EMAIL_ERROR: &str = "Disposable email addresses are not allowed";
pub const PROHIBITED_CONTENT_ERROR: &str = "Message contains prohibited content";
pub const EXCESSIVE_SYMBOLS_ERROR: &str = "Message contains excessive symbols";

const DISPOSABLE_DOMAINS: &[&str] = &[
    "tempmail.com",
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "throwaway.email",
    "yopmail.com",
    "trashmail.com",
];

const BLOCKED_WORDS: &[&str] = &["viagra", "cialis", "casino", "lottery", "payday loan"];

/// Identical punctuation characters in a row that count as spam.
const SYMBOL_RUN: usize = 4;

/// Rejects disposable mailboxes, blocked words and long punctuation runs.
///
/// # Errors
/// Returns the first rule the submission breaks.
pub fn screen(data: &ContactData) -> Result<(), ValidationError> {
    if is_disposable(&data.email) {
        return Err(ValidationError::single(Field::Email, DISPOSABLE_EMAIL_ERROR));
    }

    let message = data.message.to_lowercase();
    if BLOCKED_WORDS.iter().any(|word| message.contains(word)) {
        return Err(ValidationError::single(Field::Message, PROHIBITED_CONTENT_ERROR));
    }

    if has_symbol_run(&data.message, SYMBOL_RUN) {
        return Err(ValidationError::single(Field::Message, EXCESSIVE_SYMBOLS_ERROR));
    }

    Ok(())
}

#[must_use]
pub fn is_disposable(email: &str) -> bool {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim().to_lowercase())
        .is_some_and(|domain| DISPOSABLE_DOMAINS.contains(&domain.as_str()))
}

fn has_symbol_run(text: &str, len: usize) -> bool {
    let mut run = 0;
    let mut prev = None;

    for c in text.chars() {
        if c.is_ascii_punctuation() && prev == Some(c) {
            run += 1;
        } else {
            run = 1;
        }
        if c.is_ascii_punctuation() && run >= len {
            return true;
        }
        prev = Some(c);
    }
    false
}
