//! Walking distances between consecutive itinerary stops

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::Result;
use crate::models::{Coordinates, Place, Segment, WalkingSummary};

/// Result of a single walking-route lookup
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// First leg of the first route
    Found { distance_m: u64, text: String },
    NoRoute,
}

/// A routing backend answering walking-mode queries
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Fail before any lookup when the provider cannot be used at all
    fn check_credentials(&self) -> Result<()> {
        Ok(())
    }

    async fn walking_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteOutcome>;
}

/// Computes a [`WalkingSummary`] for an ordered list of places
pub struct WalkingRouter {
    provider: Arc<dyn RoutingProvider>,
}

impl WalkingRouter {
    pub fn new(provider: Arc<dyn RoutingProvider>) -> Self {
        Self { provider }
    }

    /// One segment per adjacent pair, in input order.
    ///
    /// The request boundary guarantees at least two places; fewer simply
    /// produce an empty summary.
    pub async fn compute(&self, places: &[Place]) -> Result<WalkingSummary> {
        self.provider.check_credentials()?;

        let mut segments = Vec::with_capacity(places.len().saturating_sub(1));
        for pair in places.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            segments.push(self.segment(from, to).await?);
        }

        let summary = WalkingSummary::from_segments(segments);
        info!(
            segments = summary.segments.len(),
            total_distance = summary.total_distance,
            "Computed walking distances"
        );
        Ok(summary)
    }

    async fn segment(&self, from: &Place, to: &Place) -> Result<Segment> {
        let (Some(origin), Some(destination)) = (from.coordinates(), to.coordinates()) else {
            debug!(from = %from.name, to = %to.name, "Skipping routing for unresolved place");
            return Ok(Segment::no_route(&from.name, &to.name));
        };

        match self.provider.walking_route(origin, destination).await {
            Ok(RouteOutcome::Found { distance_m, text }) => {
                Ok(Segment::routed(&from.name, &to.name, distance_m, text))
            }
            Ok(RouteOutcome::NoRoute) => {
                warn!(from = %from.name, to = %to.name, "No walking route");
                Ok(Segment::no_route(&from.name, &to.name))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(from = %from.name, to = %to.name, error = %e, "Routing lookup failed");
                Ok(Segment::no_route(&from.name, &to.name))
            }
        }
    }
}
