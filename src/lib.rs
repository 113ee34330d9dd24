//! `TourAI` - Walking tour planning backend
//!
//! Turns a free-text travel request into an ordered walking itinerary: a
//! language model picks the places, Google Maps geocodes them and measures
//! the walks between them, and the model narrates the finished route.

pub mod api;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod itinerary;
pub mod llm;
pub mod logging;
pub mod maps;
pub mod models;
pub mod narrator;
pub mod routing;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::TourAiConfig;
pub use error::TourAiError;
pub use geocoding::{GeocodeOutcome, Geocoder, GeocodingProvider};
pub use itinerary::{ItineraryGenerator, PlaceNames};
pub use llm::{LanguageModel, OpenAiClient};
pub use maps::GoogleMapsClient;
pub use models::{Coordinates, Place, Segment, WalkingSummary};
pub use narrator::Narrator;
pub use routing::{RouteOutcome, RoutingProvider, WalkingRouter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TourAiError>;
