//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic. Creation and
//! partial-update inputs use dedicated structs ([`NewShortLink`],
//! [`ShortLinkPatch`]) rather than mutating the entity in place.

pub mod short_link;

pub use short_link::{NewShortLink, ShortLink, ShortLinkPatch};
