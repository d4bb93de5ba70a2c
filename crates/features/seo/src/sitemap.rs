//! sitemaps.org `urlset` documents.

use crate::{SeoError, normalize_base_url};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// How often a page is expected to change (`<changefreq>`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub change_frequency: Option<ChangeFrequency>,
    /// Relative importance in `0.0..=1.0`.
    pub priority: Option<f32>,
}

impl SitemapEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), last_modified: None, change_frequency: None, priority: None }
    }

    #[must_use]
    pub fn last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }

    #[must_use]
    pub fn change_frequency(mut self, freq: ChangeFrequency) -> Self {
        self.change_frequency = Some(freq);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sitemap {
    pub entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// The published pages: the home page and `/our-work`, both weekly.
    #[must_use]
    pub fn for_site(base_url: &str, now: DateTime<Utc>) -> Self {
        let base = normalize_base_url(base_url);
        Self {
            entries: vec![
                SitemapEntry::new(base)
                    .last_modified(now)
                    .change_frequency(ChangeFrequency::Weekly)
                    .priority(1.0),
                SitemapEntry::new(format!("{base}/our-work"))
                    .last_modified(now)
                    .change_frequency(ChangeFrequency::Weekly)
                    .priority(0.9),
            ],
        }
    }

    #[must_use]
    pub fn with_entry(mut self, entry: SitemapEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Renders the `urlset` document.
    ///
    /// # Errors
    /// Returns [`SeoError::InvalidEntry`] for an empty URL or a priority outside `0.0..=1.0`,
    /// and an I/O or XML error if writing fails.
    pub fn to_xml(&self) -> Result<String, SeoError> {
        for entry in &self.entries {
            entry.validate()?;
        }

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.create_element("urlset").with_attribute(("xmlns", SITEMAP_NS)).write_inner_content(
            |w| {
                for entry in &self.entries {
                    w.create_element("url").write_inner_content(|w| {
                        w.create_element("loc").write_text_content(BytesText::new(&entry.url))?;
                        if let Some(at) = entry.last_modified {
                            let lastmod = at.to_rfc3339_opts(SecondsFormat::Millis, true);
                            w.create_element("lastmod").write_text_content(BytesText::new(&lastmod))?;
                        }
                        if let Some(freq) = entry.change_frequency {
                            w.create_element("changefreq")
                                .write_text_content(BytesText::new(freq.into()))?;
                        }
                        if let Some(priority) = entry.priority {
                            w.create_element("priority")
                                .write_text_content(BytesText::new(&priority.to_string()))?;
                        }
                        Ok(())
                    })?;
                }
                Ok(())
            },
        )?;

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}

impl SitemapEntry {
    fn validate(&self) -> Result<(), SeoError> {
        if self.url.trim().is_empty() {
            return Err(SeoError::InvalidEntry { message: "empty url".into(), context: None });
        }
        if let Some(priority) = self.priority.filter(|p| !(0.0..=1.0).contains(p)) {
            return Err(SeoError::InvalidEntry {
                message: format!("priority {priority} outside 0.0..=1.0").into(),
                context: Some(self.url.clone().into()),
            });
        }
        Ok(())
    }
}
