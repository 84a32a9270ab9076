//! HTTP request handlers.

pub mod health;
pub mod links;
pub mod redirect;

pub use health::health_handler;
pub use links::{create_link_handler, list_links_handler, update_link_handler};
pub use redirect::redirect_handler;
