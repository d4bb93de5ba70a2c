use std::borrow::Cow;

fn format_context(context: Option<&Cow<'static, str>>) -> Cow<'static, str> {
    context.map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

/// A specialized [`SeoError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum SeoError {
    #[error("XML write error{}: {source}", format_context(.context.as_ref()))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },
    #[error("XML error{}: {source}", format_context(.context.as_ref()))]
    Xml {
        #[source]
        source: quick_xml::Error,
        context: Option<Cow<'static, str>>,
    },
    #[error("Invalid sitemap entry{}: {message}", format_context(.context.as_ref()))]
    InvalidEntry { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<std::io::Error> for SeoError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

impl From<quick_xml::Error> for SeoError {
    fn from(source: quick_xml::Error) -> Self {
        Self::Xml { source, context: None }
    }
}

impl From<std::string::FromUtf8Error> for SeoError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::InvalidEntry { message: e.to_string().into(), context: Some("utf-8 output".into()) }
    }
}
