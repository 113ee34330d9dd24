//! Google Maps client for geocoding and walking directions
//!
//! Only responses with `status == "OK"` and a non-empty result list count as
//! matches; every other answer is reported as a miss. A missing API key is a
//! configuration error raised before any request is sent.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::MapsConfig;
use crate::geocoding::{GeocodeOutcome, GeocodingProvider};
use crate::models::Coordinates;
use crate::routing::{RouteOutcome, RoutingProvider};
use crate::{Result, TourAiError};

const STATUS_OK: &str = "OK";

/// Google Maps Platform API client
pub struct GoogleMapsClient {
    http: Client,
    api_key: Option<String>,
    geocode_url: String,
    directions_url: String,
}

impl GoogleMapsClient {
    /// Create a new client from configuration
    pub fn from_config(config: &MapsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("TourAI/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TourAiError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            geocode_url: config.geocode_url.clone(),
            directions_url: config.directions_url.clone(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| TourAiError::config("GOOGLE_MAPS_API_KEY not set in environment"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TourAiError::api(format!("Maps request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TourAiError::api(format!("Maps API returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| TourAiError::api(format!("Invalid maps response: {e}")))
    }
}

#[async_trait]
impl GeocodingProvider for GoogleMapsClient {
    fn check_credentials(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeocodeOutcome> {
        let url = format!(
            "{}?address={}&key={}",
            self.geocode_url,
            urlencoding::encode(address),
            urlencoding::encode(self.api_key()?)
        );

        let response: GeocodeResponse = self.get_json(url).await?;
        debug!(status = %response.status, results = response.results.len(), "Geocoding response");

        if response.status != STATUS_OK {
            return Ok(GeocodeOutcome::NotFound);
        }
        Ok(response
            .results
            .into_iter()
            .next()
            .map_or(GeocodeOutcome::NotFound, |r| {
                GeocodeOutcome::Found(Coordinates::new(
                    r.geometry.location.lat,
                    r.geometry.location.lng,
                ))
            }))
    }
}

#[async_trait]
impl RoutingProvider for GoogleMapsClient {
    fn check_credentials(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    #[instrument(skip(self))]
    async fn walking_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteOutcome> {
        let url = format!(
            "{}?origin={}&destination={}&mode=walking&key={}",
            self.directions_url,
            urlencoding::encode(&origin.to_query()),
            urlencoding::encode(&destination.to_query()),
            urlencoding::encode(self.api_key()?)
        );

        let response: DirectionsResponse = self.get_json(url).await?;
        debug!(status = %response.status, routes = response.routes.len(), "Directions response");

        if response.status != STATUS_OK {
            return Ok(RouteOutcome::NoRoute);
        }
        Ok(response
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .map_or(RouteOutcome::NoRoute, |leg| RouteOutcome::Found {
                distance_m: leg.distance.value,
                text: leg.distance.text,
            }))
    }
}

/// Geocoding API response structures
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Directions API response structures
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u64,
}
