//! End-to-end tests of the HTTP operations against in-memory providers

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use tourai::config::ServerConfig;
use tourai::{
    AppState, Coordinates, GeocodeOutcome, GeocodingProvider, LanguageModel, Result, RouteOutcome,
    RoutingProvider, TourAiError, web,
};

/// Replies with a fixed text and records every prompt
struct FakeModel {
    reply: String,
    prompts: Mutex<Vec<(String, String)>>,
}

impl FakeModel {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_message.to_string()));
        Ok(self.reply.clone())
    }
}

/// Geocodes from a lookup table and records the queries it received
#[derive(Default)]
struct FakeMaps {
    places: HashMap<String, Coordinates>,
    distances: Vec<u64>,
    missing_key: bool,
    geocode_queries: Mutex<Vec<String>>,
    route_calls: Mutex<usize>,
}

impl FakeMaps {
    fn barcelona() -> Self {
        let places = [
            ("Hotel Arts, Barcelona", 41.3869, 2.1963),
            ("Park Güell, Barcelona", 41.4145, 2.1527),
            ("Sagrada Familia, Barcelona", 41.4036, 2.1744),
        ]
        .into_iter()
        .map(|(name, lat, lng)| (name.to_string(), Coordinates::new(lat, lng)))
        .collect();
        Self {
            places,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.missing_key {
            return Err(TourAiError::config("GOOGLE_MAPS_API_KEY not set in environment"));
        }
        Ok(())
    }
}

#[async_trait]
impl GeocodingProvider for FakeMaps {
    fn check_credentials(&self) -> Result<()> {
        self.check()
    }

    async fn geocode(&self, address: &str) -> Result<GeocodeOutcome> {
        self.geocode_queries.lock().unwrap().push(address.to_string());
        Ok(self
            .places
            .get(address)
            .map_or(GeocodeOutcome::NotFound, |c| GeocodeOutcome::Found(*c)))
    }
}

#[async_trait]
impl RoutingProvider for FakeMaps {
    fn check_credentials(&self) -> Result<()> {
        self.check()
    }

    async fn walking_route(&self, _: Coordinates, _: Coordinates) -> Result<RouteOutcome> {
        let mut calls = self.route_calls.lock().unwrap();
        let outcome = match self.distances.get(*calls) {
            Some(&distance_m) => RouteOutcome::Found {
                distance_m,
                text: format!("{:.1} km", distance_m as f64 / 1000.0),
            },
            None => RouteOutcome::NoRoute,
        };
        *calls += 1;
        Ok(outcome)
    }
}

fn app(model: Arc<FakeModel>, maps: Arc<FakeMaps>) -> axum::Router {
    let state = AppState::new(model, maps.clone(), maps);
    web::app(&ServerConfig::default(), state)
}

async fn post(app: axum::Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_chat_end_to_end_barcelona() {
    let model = FakeModel::new(r#"["Park Güell", "Sagrada Familia"]"#);
    let maps = Arc::new(FakeMaps::barcelona());

    let (status, body) = post(
        app(model.clone(), maps.clone()),
        "/chat",
        json!({"message": "fun day in Barcelona", "location": "Hotel Arts, Barcelona", "profile": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"places": [
            {"name": "Hotel Arts, Barcelona", "lat": 41.3869, "lng": 2.1963},
            {"name": "Park Güell", "lat": 41.4145, "lng": 2.1527},
            {"name": "Sagrada Familia", "lat": 41.4036, "lng": 2.1744}
        ]})
    );
    assert_eq!(
        *maps.geocode_queries.lock().unwrap(),
        vec![
            "Hotel Arts, Barcelona",
            "Park Güell, Barcelona",
            "Sagrada Familia, Barcelona"
        ]
    );

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts[0].1, "fun day in Barcelona");
    assert!(prompts[0].0.contains("Current location: Hotel Arts, Barcelona"));
    assert!(!prompts[0].0.contains("User preferences"));
}

#[tokio::test]
async fn test_chat_unparseable_reply_is_empty_result() {
    for reply in ["I'd suggest the Louvre!", r#"{"places": ["Louvre"]}"#, "[]"] {
        let maps = Arc::new(FakeMaps::default());
        let (status, body) = post(
            app(FakeModel::new(reply), maps.clone()),
            "/chat",
            json!({"message": "museums", "location": "Paris"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": "No places found for your request."}));
        assert!(maps.geocode_queries.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_chat_unmatched_places_have_null_coordinates() {
    let maps = Arc::new(FakeMaps::barcelona());
    let (status, body) = post(
        app(FakeModel::new(r#"["Atlantis"]"#), maps),
        "/chat",
        json!({"message": "lost city", "location": "Barcelona"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let places = body["places"].as_array().unwrap();
    assert_eq!(places.len(), 2);
    assert_eq!(places[1], json!({"name": "Atlantis", "lat": null, "lng": null}));
}

#[tokio::test]
async fn test_chat_missing_maps_key_is_server_error() {
    let maps = Arc::new(FakeMaps {
        missing_key: true,
        ..FakeMaps::barcelona()
    });
    let (status, body) = post(
        app(FakeModel::new(r#"["Park Güell"]"#), maps),
        "/chat",
        json!({"message": "fun day", "location": "Barcelona"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Configuration error"));
}

#[tokio::test]
async fn test_walking_distances_rejects_fewer_than_two_places() {
    for places in [json!([]), json!([{"name": "Solo", "lat": 1.0, "lng": 2.0}])] {
        let maps = Arc::new(FakeMaps {
            distances: vec![100],
            ..FakeMaps::default()
        });
        let (status, body) = post(
            app(FakeModel::new(""), maps.clone()),
            "/walking_distances",
            json!({ "places": places }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "At least two places required."}));
        assert_eq!(*maps.route_calls.lock().unwrap(), 0);
    }
}

#[tokio::test]
async fn test_walking_distances_summary() {
    let maps = Arc::new(FakeMaps {
        distances: vec![1200, 900],
        ..FakeMaps::default()
    });
    let (status, body) = post(
        app(FakeModel::new(""), maps),
        "/walking_distances",
        json!({"places": [
            {"name": "A", "lat": 41.38, "lng": 2.19},
            {"name": "B", "lat": 41.41, "lng": 2.15},
            {"name": "C", "lat": 41.40, "lng": 2.17},
            {"name": "D", "lat": 41.39, "lng": 2.16}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "segments": [
                {"from": "A", "to": "B", "distance_m": 1200, "text": "1.2 km"},
                {"from": "B", "to": "C", "distance_m": 900, "text": "0.9 km"},
                {"from": "C", "to": "D", "distance_m": null, "text": "No route found"}
            ],
            "total_distance": 2100
        })
    );
}

#[tokio::test]
async fn test_route_summary_returns_model_text() {
    let model = FakeModel::new("What a walk!\n- Stop 1: Park Güell");
    let (status, body) = post(
        app(model.clone(), Arc::new(FakeMaps::default())),
        "/route_summary",
        json!({
            "request_info": "fun day in Barcelona",
            "places": [{"name": "Park Güell", "lat": 41.41, "lng": 2.15}],
            "walking_info": {"segments": [], "total_distance": 0}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"summary": "What a walk!\n- Stop 1: Park Güell"}));
    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].1.contains("Request: fun day in Barcelona"));
    assert!(prompts[0].1.contains("\"total_distance\":0"));
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/walking_distances")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app(FakeModel::new(""), Arc::new(FakeMaps::default()))
        .oneshot(request)
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_requests_are_traced_under_tower_http() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("tower_http=debug"))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (status, _) = post(
        app(FakeModel::new("ok"), Arc::new(FakeMaps::default())),
        "/route_summary",
        json!({"request_info": "walk"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("tower_http"));
    assert!(output.contains("finished processing request"));
}
