//! Infrastructure layer: external system integrations.

pub mod cache;
pub mod persistence;
pub mod ratelimit;
