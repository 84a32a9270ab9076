//! Request/response data transfer objects.

pub mod create_link;
pub mod health;
pub mod list_links;
pub mod update_link;
