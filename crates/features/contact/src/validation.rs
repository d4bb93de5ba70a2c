//! Contact input rules.
//!
//! Every failing field contributes one message; the rendered error joins them with `". "`
//! in field order (name, email, message).
//!
//! Lengths are measured in UTF-16 code units, the unit browser form limits use, so an emoji
//! outside the Basic Multilingual Plane counts twice.

use crate::model::ContactData;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use strum_macros::{Display, IntoStaticStr};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 5000;

pub const NAME_ERROR: &str =
    "Name must be 2-50 characters and contain only letters, spaces, and hyphens";
pub const EMAIL_ERROR: &str = "Please provide a valid email address";
pub const MESSAGE_ERROR: &str = "Message must be between 10 and 5000 characters";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Submission field a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// One or more fields failed validation or screening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    #[must_use]
    pub fn single(field: Field, message: &'static str) -> Self {
        Self { errors: vec![FieldError { field, message }] }
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn has_field(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages grouped per field name, the shape of a `400` body's `errors` map.
    #[must_use]
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<&'static str>> {
        let mut map: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
        for e in &self.errors {
            map.entry(e.field.into()).or_default().push(e.message);
        }
        map
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(". ")?;
            }
            f.write_str(e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Stateless rule set shared by the client and the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator;

impl InputValidator {
    /// Letters, whitespace, hyphens and apostrophes; 2 to 50 characters. Checked untrimmed.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        let len = utf16_len(name);
        (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len)
            && name.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\'')
    }

    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        utf16_len(email) <= EMAIL_MAX_CHARS && EMAIL_RE.is_match(email)
    }

    #[must_use]
    pub fn is_valid_message(message: &str) -> bool {
        (MESSAGE_MIN_CHARS..=MESSAGE_MAX_CHARS).contains(&utf16_len(message))
    }

    /// Checks all three fields, collecting every failure.
    ///
    /// # Errors
    /// Returns [`ValidationError`] listing each failing field.
    pub fn validate_contact(data: &ContactData) -> Result<(), ValidationError> {
        let checks = [
            (Field::Name, Self::is_valid_name(&data.name), NAME_ERROR),
            (Field::Email, Self::is_valid_email(&data.email), EMAIL_ERROR),
            (Field::Message, Self::is_valid_message(&data.message), MESSAGE_ERROR),
        ];

        let errors: Vec<FieldError> = checks
            .into_iter()
            .filter(|(_, ok, _)| !ok)
            .map(|(field, _, message)| FieldError { field, message })
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(ValidationError { errors }) }
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_count_utf16_units() {
        assert!(InputValidator::is_valid_message(&"\u{1F600}".repeat(5)));
        assert!(!InputValidator::is_valid_message(&"\u{1F600}".repeat(4)));
        assert!(InputValidator::is_valid_message(&"\u{1F600}".repeat(2500)));
        assert!(!InputValidator::is_valid_message(&format!("{}x", "\u{1F600}".repeat(2500))));
        assert!(InputValidator::is_valid_message(&"é".repeat(10)));
    }

    #[test]
    fn names() {
        assert!(InputValidator::is_valid_name("Jo"));
        assert!(InputValidator::is_valid_name("Mary-Jane O'Neil"));
        assert!(!InputValidator::is_valid_name("J"));
        assert!(!InputValidator::is_valid_name("John123"));
        assert!(!InputValidator::is_valid_name("<b>John</b>"));
        assert!(!InputValidator::is_valid_name(&"A".repeat(51)));
    }

    #[test]
    fn emails() {
        assert!(InputValidator::is_valid_email("jane.smith@example.com"));
        assert!(!InputValidator::is_valid_email("invalid-email"));
        assert!(!InputValidator::is_valid_email("a b@example.com"));
        assert!(!InputValidator::is_valid_email("user@localhost"));
        assert!(!InputValidator::is_valid_email(&format!("{}@example.com", "a".repeat(250))));
    }

    #[test]
    fn messages_join_in_field_order() {
        let data = ContactData::new("A", "invalid-email", "Short");
        let err = InputValidator::validate_contact(&data).expect_err("all fields invalid");

        assert_eq!(
            err.to_string(),
            "Name must be 2-50 characters and contain only letters, spaces, and hyphens. \
             Please provide a valid email address. \
             Message must be between 10 and 5000 characters"
        );
        assert_eq!(err.by_field().keys().copied().collect::<Vec<_>>(), ["email", "message", "name"]);
    }

    #[test]
    fn only_failing_fields_are_reported() {
        let data = ContactData::new("Jane Smith", "jane@example.com", "too short");
        let err = InputValidator::validate_contact(&data).expect_err("message too short");

        assert_eq!(err.errors().len(), 1);
        assert!(err.has_field(Field::Message));
        assert_eq!(err.to_string(), MESSAGE_ERROR);
    }
}
