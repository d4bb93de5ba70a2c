//! Shared string constants (OpenAPI tags, env names, defaults).

pub const SYSTEM_TAG: &str = "System";
pub const CONTACT_TAG: &str = "Contact";
pub const SEO_TAG: &str = "SEO";

/// Backend origin consumed by the contact client.
pub const API_URL_ENV: &str = "NEXT_PUBLIC_API_URL";
/// Canonical public origin of the site.
pub const SITE_URL_ENV: &str = "NEXT_PUBLIC_SITE_URL";
/// Prefix for layered `AGENCY__SECTION__KEY` overrides.
pub const ENV_PREFIX: &str = "AGENCY";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SITE_URL: &str = "https://averon.agency";
/// Path of the config file (extension optional); `server.*` in the working directory otherwise.
pub const CONFIG_PATH_ENV: &str = "AGENCY_CONFIG";
