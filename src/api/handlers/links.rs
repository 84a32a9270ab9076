//! Handlers for owner link management (create, list, update).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::create_link::{CreateLinkRequest, CreateLinkResponse, CreatedLink};
use crate::api::dto::list_links::ListLinksResponse;
use crate::api::dto::update_link::{UpdateLinkRequest, UpdateLinkResponse};
use crate::api::middleware::auth::OwnerId;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the authenticated owner.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Errors
///
/// Returns 400 when `longUrl` is missing or empty, 500 when the store fails
/// or code generation exhausts its retries.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(&owner_id, payload.long_url)
        .await?;

    let short_url = format!("{}/{}", state.base_url(), link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            success: true,
            data: CreatedLink { link, short_url },
        }),
    ))
}

/// Lists the authenticated owner's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
) -> Result<Json<ListLinksResponse>, AppError> {
    let links = state.link_service.list_links(&owner_id).await?;

    Ok(Json(ListLinksResponse {
        success: true,
        data: links,
    }))
}

/// Partially updates one of the owner's links.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// # Errors
///
/// Returns 404 when the id does not exist *or* belongs to another owner —
/// the two cases are indistinguishable by design. Returns 400 for an empty
/// patch or an empty `longUrl`.
pub async fn update_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<UpdateLinkResponse>, AppError> {
    payload.validate()?;

    state
        .link_service
        .update_link(&owner_id, id, payload.into())
        .await?;

    Ok(Json(UpdateLinkResponse {
        success: true,
        message: "URL updated",
    }))
}
