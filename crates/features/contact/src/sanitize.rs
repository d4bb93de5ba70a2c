use crate::model::ContactData;
use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&(amp|lt|gt|quot|apos|#x27|#39|#x2F|#47);").expect("Invalid entity regex")
});

/// Trims, strips `<...>` tags and entity-escapes `& < > " ' /`.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    let stripped = TAG_RE.replace_all(input.trim(), "");
    escape_html(&stripped)
}

#[must_use]
pub fn sanitize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

#[must_use]
pub fn sanitize_contact(data: &ContactData) -> ContactData {
    ContactData {
        name: sanitize_text(&data.name),
        email: sanitize_email(&data.email),
        message: sanitize_text(&data.message),
    }
}

/// Reverses [`sanitize_text`]'s escaping in a single pass, so `&amp;lt;` becomes `&lt;`.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    ENTITY_RE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            match caps[1].to_ascii_lowercase().as_str() {
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                "#x2f" | "#47" => "/",
                _ => "'",
            }
        })
        .into_owned()
}

/// Canonical plain-text form of a submission, raw or already sanitized: entities decoded,
/// tags stripped, surrounding whitespace trimmed, email lower-cased.
///
/// Validation runs on this form; [`sanitize_contact`] of it is what gets stored.
#[must_use]
pub fn normalize_contact(data: &ContactData) -> ContactData {
    let plain = |text: &str| TAG_RE.replace_all(&decode_entities(text), "").trim().to_owned();
    ContactData {
        name: plain(&data.name),
        email: sanitize_email(&decode_entities(&data.email)),
        message: plain(&data.message),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}
