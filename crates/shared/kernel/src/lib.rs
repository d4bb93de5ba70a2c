//! Kernel utilities shared across slices.
//! Keep this crate lightweight: config loading, the API state container and the
//! HTTP security layer (client IP, fixed-window rate limiting, size guard, headers).
//!
//! ## Config loading
//! ```rust,ignore
//! use agency_kernel::config::load_config;
//! use agency_kernel::domain::config::AppConfig;
//!
//! let cfg: AppConfig = load_config(Some("server"))?;
//! ```
pub mod config;
#[cfg(feature = "server")]
pub mod security;
#[cfg(feature = "server")]
pub mod server;

pub use agency_domain as domain;
