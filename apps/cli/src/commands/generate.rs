use crate::args::GenerateArgs;
use agency::domain::config::SiteConfig;
use agency::features::seo::{Robots, Sitemap, normalize_base_url};
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn run(site: &SiteConfig, args: &GenerateArgs) -> Result<()> {
    let base = normalize_base_url(args.base_url.as_deref().unwrap_or(&site.base_url));
    anyhow::ensure!(!base.is_empty(), "Site base URL must not be empty");

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let sitemap = Sitemap::for_site(base, Utc::now()).to_xml().context("Failed to render sitemap")?;
    write(&args.out.join("sitemap.xml"), &sitemap)?;
    write(&args.out.join("robots.txt"), &Robots::for_site(base).to_string())?;

    info!(base_url = base, out = %args.out.display(), "Generated crawler documents");
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
