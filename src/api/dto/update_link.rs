//! DTOs for the link update endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLinkPatch;

/// Request body for `PATCH /api/links/{id}`.
///
/// Both fields optional; absent fields stay unchanged. An entirely empty
/// body is rejected by the service.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, message = "longUrl must not be empty"))]
    pub long_url: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateLinkRequest> for ShortLinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        ShortLinkPatch {
            long_url: req.long_url,
            is_active: req.is_active,
        }
    }
}

/// `200 OK` acknowledgement.
#[derive(Debug, Serialize)]
pub struct UpdateLinkResponse {
    pub success: bool,
    pub message: &'static str,
}
