//! Repository traits defining data access contracts.
//!
//! Traits live in the domain layer; implementations live in
//! [`crate::infrastructure::persistence`]. Handlers and services depend only
//! on the traits, which keeps the store swappable for test doubles.

pub mod short_link_repository;

pub use short_link_repository::ShortLinkRepository;

#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
