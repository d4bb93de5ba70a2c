use agency_domain::constants::{API_URL_ENV, ENV_PREFIX, SITE_URL_ENV};
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Custom error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error ({context}): {source}")]
    Config {
        #[source]
        source: config::ConfigError,
        context: &'static str,
    },
}

/// Config keys that may be set through the site's public environment variables.
const PUBLIC_ALIASES: [(&str, &str); 2] =
    [(API_URL_ENV, "client.api_url"), (SITE_URL_ENV, "site.base_url")];

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Base File**: `path` (required when given) or `server.{toml,json,..}` in the working
///    directory (optional, so tools can run on defaults alone).
/// 2. **Environment Overrides**: variables prefixed with `AGENCY__`, nested with double
///    underscores (e.g. `AGENCY__SECURITY__MAX_BODY_BYTES` maps to `security.max_body_bytes`).
/// 3. **Public aliases**: `NEXT_PUBLIC_API_URL` and `NEXT_PUBLIC_SITE_URL` set
///    `client.api_url` and `site.base_url`.
///
/// # Errors
/// Returns an error if an explicitly requested file is missing, a source cannot be parsed,
/// or the merged values do not match the structure of `T`.
///
/// # Example
/// ```rust
/// use agency_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) =
        path.map_or_else(|| (PathBuf::from("server"), false), |p| (p.as_ref().to_path_buf(), true));

    let mut builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    for (key, value) in public_env_overrides(|name| std::env::var(name).ok()) {
        debug!(key, "Applying public environment override");
        builder = builder
            .set_override(key, value)
            .map_err(|source| ConfigError::Config { source, context: "Invalid override" })?;
    }

    info!(path = %effective_path.display(), required, "Loading config");

    builder
        .build()
        .map_err(|source| ConfigError::Config { source, context: "Failed to build config" })?
        .try_deserialize::<T>()
        .map_err(|source| ConfigError::Config { source, context: "Failed to deserialize config" })
}

/// Resolves the public `NEXT_PUBLIC_*` variables into config keys.
///
/// Empty values are ignored so an exported-but-blank variable does not wipe a file setting.
pub fn public_env_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    PUBLIC_ALIASES
        .iter()
        .filter_map(|(env, key)| {
            lookup(env)
                .map(|v| v.trim().trim_end_matches('/').to_owned())
                .filter(|v| !v.is_empty())
                .map(|v| (*key, v))
        })
        .collect()
}
