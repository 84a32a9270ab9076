//! Short link entity: the mapping between a short code and a long URL.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened URL owned by a single principal.
///
/// `total_clicks` is mutated only by the resolution path via an atomic
/// store-side increment; owners can change `long_url` and `is_active` but
/// never the counter or the code.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub owner_id: String,
    /// Deactivated links stop resolving but are never hard-deleted.
    pub is_active: bool,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub short_code: String,
    pub long_url: String,
    pub owner_id: String,
}

/// Owner-scoped partial update.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ShortLinkPatch {
    pub long_url: Option<String>,
    pub is_active: Option<bool>,
}

impl ShortLinkPatch {
    /// Returns true when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.long_url.is_none() && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_link() -> ShortLink {
        ShortLink {
            id: 1,
            short_code: "abc_D-1".to_string(),
            long_url: "https://example.com/a".to_string(),
            owner_id: "owner-a".to_string(),
            is_active: true,
            total_clicks: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample_link()).unwrap();

        assert_eq!(json["shortCode"], "abc_D-1");
        assert_eq!(json["longUrl"], "https://example.com/a");
        assert_eq!(json["ownerId"], "owner-a");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["totalClicks"], 0);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ShortLinkPatch::default().is_empty());

        let patch = ShortLinkPatch {
            long_url: None,
            is_active: Some(false),
        };
        assert!(!patch.is_empty());
    }
}
