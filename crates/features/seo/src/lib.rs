//! SEO feature slice: the site's `sitemap.xml` and `robots.txt`.
//!
//! Both documents are plain data ([`Sitemap`], [`Robots`]) with renderers, so the same
//! output can be served by the backend (`server` feature) or written to disk at build time.

mod error;
pub mod robots;
pub mod sitemap;

#[cfg(feature = "server")]
pub mod server;

pub use error::SeoError;
pub use robots::{Robots, RobotsRule};
pub use sitemap::{ChangeFrequency, Sitemap, SitemapEntry};

#[cfg(feature = "server")]
pub use server::{Seo, init};

/// Canonical form of a site origin: trimmed, without trailing slashes.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> &str {
    base_url.trim().trim_end_matches('/')
}
