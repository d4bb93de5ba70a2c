use super::Contact;
use super::auth::Admin;
use super::error::{ContactError, ErrorBody};
use super::store::Origin;
use crate::model::{ContactData, ContactRecord, ContactResponse};
use crate::sanitize::{normalize_contact, sanitize_contact};
use crate::screen::screen;
use crate::validation::InputValidator;
use agency_domain::constants::CONTACT_TAG;
use agency_kernel::security::{ClientIp, Decision};
use agency_kernel::server::ApiState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use tracing::{debug, info, warn};

pub const SUBMITTED_MESSAGE: &str = "Contact form submitted successfully";

#[utoipa::path(
    post,
    path = "/contacts/",
    request_body = ContactData,
    responses(
        (status = CREATED, description = "Submission stored", body = ContactResponse),
        (status = BAD_REQUEST, description = "Validation or spam screening failed", body = ErrorBody),
        (status = TOO_MANY_REQUESTS, description = "Rate limit or submission budget exceeded", body = ErrorBody),
    ),
    tag = CONTACT_TAG,
)]
pub(super) async fn submit_contact(
    State(state): State<ApiState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    payload: Result<Json<ContactData>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactResponse>), ContactError> {
    let contact = state.try_get_slice::<Contact>()?;
    if let Decision::Limited { retry_after } = contact.submit_limiter.check(&ip) {
        warn!(ip = %ip, "Contact submission throttled");
        return Err(ContactError::Throttled { retry_after });
    }

    let Json(data) = payload?;
    let data = normalize_contact(&data);

    let checked = InputValidator::validate_contact(&data)
        .and_then(|()| if contact.screening { screen(&data) } else { Ok(()) });
    if let Err(e) = checked {
        debug!(ip = %ip, error = %e, "Contact submission rejected");
        return Err(e.into());
    }

    let user_agent =
        headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()).map(str::to_owned);
    let record = contact.store.insert(sanitize_contact(&data), Origin { ip_address: ip, user_agent });
    info!(id = record.id, "Contact form submitted");

    let email_sent = contact.notifier.notify(&record).await.unwrap_or_else(|e| {
        warn!(id = record.id, error = %e, "Failed to send contact notification");
        false
    });

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: SUBMITTED_MESSAGE.to_owned(),
            data: record.submitted(),
            email_sent,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/contacts/",
    responses(
        (status = OK, description = "All submissions, newest first", body = [ContactRecord]),
        (status = FORBIDDEN, description = "Missing or wrong admin token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CONTACT_TAG,
)]
#[allow(clippy::unused_async)]
pub(super) async fn list_contacts(
    _: Admin,
    State(state): State<ApiState>,
) -> Result<Json<Vec<ContactRecord>>, ContactError> {
    Ok(Json(state.try_get_slice::<Contact>()?.store.list()))
}

#[utoipa::path(
    get,
    path = "/contacts/unprocessed/",
    responses(
        (status = OK, description = "Submissions not yet handled", body = [ContactRecord]),
        (status = FORBIDDEN, description = "Missing or wrong admin token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CONTACT_TAG,
)]
#[allow(clippy::unused_async)]
pub(super) async fn list_unprocessed(
    _: Admin,
    State(state): State<ApiState>,
) -> Result<Json<Vec<ContactRecord>>, ContactError> {
    Ok(Json(state.try_get_slice::<Contact>()?.store.unprocessed()))
}

#[utoipa::path(
    get,
    path = "/contacts/{id}/",
    params(("id" = u64, Path, description = "Submission id")),
    responses(
        (status = OK, description = "The submission", body = ContactRecord),
        (status = FORBIDDEN, description = "Missing or wrong admin token", body = ErrorBody),
        (status = NOT_FOUND, description = "No such submission", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CONTACT_TAG,
)]
#[allow(clippy::unused_async)]
pub(super) async fn get_contact(
    _: Admin,
    State(state): State<ApiState>,
    Path(id): Path<u64>,
) -> Result<Json<ContactRecord>, ContactError> {
    let contact = state.try_get_slice::<Contact>()?;
    contact.store.get(id).map(Json).ok_or(ContactError::NotFound { id })
}

#[utoipa::path(
    post,
    path = "/contacts/{id}/mark_processed/",
    params(("id" = u64, Path, description = "Submission id")),
    responses(
        (status = OK, description = "The updated submission", body = ContactRecord),
        (status = FORBIDDEN, description = "Missing or wrong admin token", body = ErrorBody),
        (status = NOT_FOUND, description = "No such submission", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CONTACT_TAG,
)]
#[allow(clippy::unused_async)]
pub(super) async fn mark_processed(
    _: Admin,
    State(state): State<ApiState>,
    Path(id): Path<u64>,
) -> Result<Json<ContactRecord>, ContactError> {
    let contact = state.try_get_slice::<Contact>()?;
    let record = contact.store.mark_processed(id).ok_or(ContactError::NotFound { id })?;
    info!(id, "Contact marked as processed");
    Ok(Json(record))
}
