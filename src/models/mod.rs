//! Data models for the TourAI service
//!
//! All values are request-scoped; nothing here is persisted.
//! - Place: a named stop with optional resolved coordinates
//! - Route: walking segments between consecutive stops and their total

pub mod place;
pub mod route;

// Re-export all public types for convenient access
pub use place::{Coordinates, Place};
pub use route::{NO_ROUTE_TEXT, Segment, WalkingSummary};
