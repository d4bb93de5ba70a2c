//! Contact feature slice.
//!
//! The shared half (always compiled) owns the submission model and the rules every
//! submission must pass: [`validation`], [`sanitize`] and spam [`screen`]ing.
//! On top of it:
//! * `client`: [`client::ApiClient`], a retrying, cancellable HTTP client for the contact API.
//! * `server`: the axum handlers, the in-memory store and new-submission notifications.

pub mod model;
pub mod sanitize;
pub mod screen;
pub mod validation;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "server")]
pub mod server;

pub use model::{ContactData, ContactRecord, ContactResponse, SubmittedContact};
pub use validation::{Field, InputValidator, ValidationError};

#[cfg(feature = "server")]
pub use server::{Contact, ContactError, init};
