//! Facade crate for the agency site features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `agency` with the desired feature flags (`server`/`client`).
//! - Call `agency::init` (server) to register feature slices.

pub use agency_domain as domain;
pub use agency_kernel as kernel;

/// Feature registry for runtime introspection.
pub mod features {
    pub use agency_contact as contact;
    pub use agency_seo as seo;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "client")]
        "client",
        #[cfg(feature = "server")]
        "contact",
        #[cfg(feature = "server")]
        "seo",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use agency_contact::server::router as contact_router;
        pub use agency_kernel::server::system_router;
        pub use agency_seo::server::router as seo_router;
    }
}

/// Failure while bootstrapping a feature slice.
#[cfg(feature = "server")]
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Contact slice: {0}")]
    Contact(#[from] agency_contact::ContactError),
    #[error("SEO slice: {0}")]
    Seo(#[from] agency_seo::SeoError),
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    config: &domain::config::AppConfig,
) -> Result<Vec<domain::registry::InitializedSlice>, InitError> {
    Ok(vec![features::contact::init(&config.contact)?, features::seo::init(&config.site)?])
}
