use super::Contact;
use super::error::ContactError;
use agency_kernel::server::ApiState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

/// Guard for admin routes: `Authorization: Bearer <contact.admin_token>`.
///
/// Without a configured token every request is refused.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

impl FromRequestParts<ApiState> for Admin {
    type Rejection = ContactError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let contact = state.try_get_slice::<Contact>()?;
        let Some(expected) = contact.admin_token.as_deref().filter(|t| !t.is_empty()) else {
            return Err(ContactError::Forbidden);
        };

        let provided = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        if provided == Some(expected) {
            Ok(Self)
        } else {
            warn!(path = %parts.uri.path(), "Rejected admin request");
            Err(ContactError::Forbidden)
        }
    }
}
