//! Walking route models: per-pair segments and their aggregate

use serde::{Deserialize, Serialize};

/// Text of a segment for which no walking route could be determined
pub const NO_ROUTE_TEXT: &str = "No route found";

/// Walking connection between two consecutive places.
///
/// `distance_m` is `None` exactly when `text` is [`NO_ROUTE_TEXT`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Segment {
    pub from: String,
    pub to: String,
    /// Walking distance in meters
    pub distance_m: Option<u64>,
    /// Provider's human-readable distance, e.g. "1.2 km"
    pub text: String,
}

impl Segment {
    #[must_use]
    pub fn routed(
        from: impl Into<String>,
        to: impl Into<String>,
        distance_m: u64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            distance_m: Some(distance_m),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn no_route(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            distance_m: None,
            text: NO_ROUTE_TEXT.to_string(),
        }
    }
}

/// Ordered segments of an itinerary plus the total walking distance
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct WalkingSummary {
    pub segments: Vec<Segment>,
    /// Sum of all known segment distances in meters
    pub total_distance: u64,
}

impl WalkingSummary {
    /// Build a summary; segments without a distance contribute nothing
    #[must_use]
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let total_distance = segments.iter().filter_map(|s| s.distance_m).sum();
        Self {
            segments,
            total_distance,
        }
    }
}
