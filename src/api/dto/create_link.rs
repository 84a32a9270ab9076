//! DTOs for the link creation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request body for `POST /api/links`.
///
/// Only presence is validated; the target is stored as given.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, message = "longUrl is required"))]
    pub long_url: String,
}

/// `201 Created` response body.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub success: bool,
    pub data: CreatedLink,
}

/// The created record plus its fully-qualified short URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLink {
    #[serde(flatten)]
    pub link: ShortLink,
    pub short_url: String,
}
