//! `robots.txt` rule groups.

use crate::normalize_base_url;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

const SEO_CRAWLERS: [&str; 5] = ["AhrefsBot", "SemrushBot", "DotBot", "MJ12bot", "BLEXBot"];
const SCRAPERS: [&str; 4] = ["SiteSnagger", "WebCopier", "WebStripper", "HTTrack"];

/// One `User-Agent` group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsRule {
    pub user_agents: Vec<String>,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

impl RobotsRule {
    pub fn for_agents<I, S>(agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { user_agents: agents.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    #[must_use]
    pub fn allow(mut self, path: impl Into<String>) -> Self {
        self.allow.push(path.into());
        self
    }

    #[must_use]
    pub fn disallow(mut self, path: impl Into<String>) -> Self {
        self.disallow.push(path.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robots {
    pub rules: Vec<RobotsRule>,
    pub host: Option<String>,
    pub sitemaps: Vec<String>,
}

impl Robots {
    /// Open to search engines, closed to SEO crawlers and site copiers.
    #[must_use]
    pub fn for_site(base_url: &str) -> Self {
        let base = normalize_base_url(base_url);
        Self {
            rules: vec![
                RobotsRule::for_agents(["*"])
                    .allow("/")
                    .disallow("/api/")
                    .disallow("/_next/")
                    .disallow("/admin/"),
                RobotsRule::for_agents(["Googlebot"]).allow("/").disallow("/api/").disallow("/_next/"),
                RobotsRule::for_agents(["Googlebot-Image"]).allow("/"),
                RobotsRule::for_agents(SEO_CRAWLERS).disallow("/"),
                RobotsRule::for_agents(SCRAPERS).disallow("/"),
            ],
            host: Some(base.to_owned()),
            sitemaps: vec![format!("{base}/sitemap.xml")],
        }
    }
}

impl fmt::Display for Robots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for rule in &self.rules {
            for agent in &rule.user_agents {
                writeln!(out, "User-Agent: {agent}")?;
            }
            for path in &rule.allow {
                writeln!(out, "Allow: {path}")?;
            }
            for path in &rule.disallow {
                writeln!(out, "Disallow: {path}")?;
            }
            out.push('\n');
        }
        if let Some(host) = &self.host {
            writeln!(out, "Host: {host}")?;
        }
        for sitemap in &self.sitemaps {
            writeln!(out, "Sitemap: {sitemap}")?;
        }
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_groups_render_in_order() {
        let txt = Robots::for_site("https://averon.agency/").to_string();

        assert!(txt.starts_with(
            "User-Agent: *\nAllow: /\nDisallow: /api/\nDisallow: /_next/\nDisallow: /admin/\n\n\
             User-Agent: Googlebot\nAllow: /\nDisallow: /api/\nDisallow: /_next/\n\n\
             User-Agent: Googlebot-Image\nAllow: /\n\n"
        ));
        assert!(txt.contains(
            "User-Agent: AhrefsBot\nUser-Agent: SemrushBot\nUser-Agent: DotBot\n\
             User-Agent: MJ12bot\nUser-Agent: BLEXBot\nDisallow: /\n"
        ));
        assert!(txt.contains("User-Agent: HTTrack\nDisallow: /\n"));
        assert!(txt.ends_with(
            "Host: https://averon.agency\nSitemap: https://averon.agency/sitemap.xml\n"
        ));
    }

    #[test]
    fn empty_robots_renders_nothing() {
        assert_eq!(Robots::default().to_string(), "");
    }
}
