//! Place name geocoding
//!
//! Resolves the generated place names (and the caller's starting location)
//! into [`Place`] values. A lookup that fails or finds nothing yields a place
//! without coordinates; only a missing credential aborts the batch.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::Result;
use crate::models::{Coordinates, Place};

/// Result of a single geocoding lookup
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    /// Coordinates of the provider's first (best) match
    Found(Coordinates),
    NotFound,
}

/// A geocoding backend that maps a free-text address to coordinates
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Fail before any lookup when the provider cannot be used at all
    fn check_credentials(&self) -> Result<()> {
        Ok(())
    }

    async fn geocode(&self, address: &str) -> Result<GeocodeOutcome>;
}

/// Extract the bare city name used as geocoding context.
///
/// `"300 Stepney Way, London"` becomes `"London"`; a string without a comma
/// is used unchanged. Blank input gives no context.
#[must_use]
pub fn extract_city(location: &str) -> Option<&str> {
    let city = match location.rsplit_once(',') {
        Some((_, last)) => last.trim(),
        None => location,
    };
    (!city.trim().is_empty()).then_some(city)
}

/// Batch geocoder for itinerary stops
pub struct Geocoder {
    provider: Arc<dyn GeocodingProvider>,
}

impl Geocoder {
    pub fn new(provider: Arc<dyn GeocodingProvider>) -> Self {
        Self { provider }
    }

    /// Resolve `names` in order, prefixed by `start_location` when given.
    ///
    /// The start location is looked up verbatim; every other name gets the
    /// city extracted from `city` appended as `"{name}, {city}"`.
    pub async fn resolve(
        &self,
        names: &[String],
        city: Option<&str>,
        start_location: Option<&str>,
    ) -> Result<Vec<Place>> {
        self.provider.check_credentials()?;

        let start_location = start_location.filter(|s| !s.trim().is_empty());
        let mut places = Vec::with_capacity(names.len() + usize::from(start_location.is_some()));

        if let Some(start) = start_location {
            places.push(self.lookup(start, start).await?);
        }

        let city_name = city.and_then(extract_city);
        debug!(?city_name, "Using city context");

        for name in names {
            let query = match city_name {
                Some(city) => format!("{name}, {city}"),
                None => name.clone(),
            };
            places.push(self.lookup(name, &query).await?);
        }

        let resolved = places.iter().filter(|p| p.coordinates().is_some()).count();
        info!(total = places.len(), resolved, "Geocoded itinerary places");
        Ok(places)
    }

    async fn lookup(&self, name: &str, query: &str) -> Result<Place> {
        match self.provider.geocode(query).await {
            Ok(GeocodeOutcome::Found(coordinates)) => Ok(Place::resolved(name, coordinates)),
            Ok(GeocodeOutcome::NotFound) => {
                warn!(query, "No geocoding match");
                Ok(Place::unresolved(name))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(query, error = %e, "Geocoding lookup failed");
                Ok(Place::unresolved(name))
            }
        }
    }
}
