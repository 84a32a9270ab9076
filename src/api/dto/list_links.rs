//! DTO for the owner link listing endpoint.

use serde::Serialize;

use crate::domain::entities::ShortLink;

/// `200 OK` response body for `GET /api/links`, newest first.
#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub success: bool,
    pub data: Vec<ShortLink>,
}
