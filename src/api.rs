//! HTTP boundary: the `/chat`, `/walking_distances` and `/route_summary` operations
//!
//! Handlers are stateless; [`AppState`] only carries the provider-backed
//! components built once at startup.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::config::TourAiConfig;
use crate::geocoding::{Geocoder, GeocodingProvider};
use crate::itinerary::{ItineraryGenerator, PlaceNames};
use crate::llm::{LanguageModel, OpenAiClient};
use crate::maps::GoogleMapsClient;
use crate::models::{Place, WalkingSummary};
use crate::narrator::Narrator;
use crate::routing::{RoutingProvider, WalkingRouter};
use crate::{Result, TourAiError};

pub const NO_PLACES_MESSAGE: &str = "No places found for your request.";
pub const TOO_FEW_PLACES_MESSAGE: &str = "At least two places required.";

/// Components shared by all requests
#[derive(Clone)]
pub struct AppState {
    generator: Arc<ItineraryGenerator>,
    geocoder: Arc<Geocoder>,
    router: Arc<WalkingRouter>,
    narrator: Arc<Narrator>,
}

impl AppState {
    /// Wire the components to the given providers
    pub fn new(
        model: Arc<dyn LanguageModel>,
        geocoding: Arc<dyn GeocodingProvider>,
        routing: Arc<dyn RoutingProvider>,
    ) -> Self {
        Self {
            generator: Arc::new(ItineraryGenerator::new(model.clone())),
            geocoder: Arc::new(Geocoder::new(geocoding)),
            router: Arc::new(WalkingRouter::new(routing)),
            narrator: Arc::new(Narrator::new(model)),
        }
    }

    /// Build the OpenAI and Google Maps clients from configuration
    pub fn from_config(config: &TourAiConfig) -> Result<Self> {
        let model = Arc::new(OpenAiClient::from_config(&config.llm)?);
        let maps = Arc::new(GoogleMapsClient::from_config(&config.maps)?);
        Ok(Self::new(model, maps.clone(), maps))
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub profile: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChatResponse {
    Places { places: Vec<Place> },
    NoPlaces { error: String },
}

#[derive(Debug, Deserialize)]
pub struct WalkingDistancesRequest {
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
pub struct RouteSummaryRequest {
    #[serde(default)]
    pub request_info: String,
    #[serde(default = "empty_array")]
    pub places: Value,
    #[serde(default = "empty_object")]
    pub walking_info: Value,
}

fn empty_array() -> Value {
    json!([])
}

fn empty_object() -> Value {
    json!({})
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteSummaryResponse {
    pub summary: String,
}

/// Error returned by a handler, rendered as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError(TourAiError);

impl From<TourAiError> for ApiError {
    fn from(err: TourAiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TourAiError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/walking_distances", post(walking_distances))
        .route("/route_summary", post(route_summary))
        .with_state(state)
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    info!(location = %request.location, "Itinerary requested");

    let names = state
        .generator
        .generate(
            &request.message,
            Some(request.location.as_str()),
            Some(request.profile.as_str()),
        )
        .await?;

    let PlaceNames::Found(names) = names else {
        return Ok(Json(ChatResponse::NoPlaces {
            error: NO_PLACES_MESSAGE.to_string(),
        }));
    };

    // The caller's location is both the first stop and the city context.
    let places = state
        .geocoder
        .resolve(&names, Some(request.location.as_str()), Some(request.location.as_str()))
        .await?;

    Ok(Json(ChatResponse::Places { places }))
}

async fn walking_distances(
    State(state): State<AppState>,
    Json(request): Json<WalkingDistancesRequest>,
) -> std::result::Result<Json<WalkingSummary>, ApiError> {
    if request.places.len() < 2 {
        return Err(TourAiError::validation(TOO_FEW_PLACES_MESSAGE).into());
    }

    let summary = state.router.compute(&request.places).await?;
    Ok(Json(summary))
}

async fn route_summary(
    State(state): State<AppState>,
    Json(request): Json<RouteSummaryRequest>,
) -> std::result::Result<Json<RouteSummaryResponse>, ApiError> {
    let summary = state
        .narrator
        .summarize(&request.request_info, &request.places, &request.walking_info)
        .await?;
    Ok(Json(RouteSummaryResponse { summary }))
}
