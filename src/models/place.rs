//! Place model for named stops and their coordinates

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format as the `lat,lng` pair the mapping provider expects
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// A stop on the itinerary.
///
/// `lat` and `lng` are either both set or both `null`; a place the geocoder
/// could not match keeps its name and carries no coordinates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    /// Name as requested (not the provider's formatted address)
    pub name: String,
    /// Latitude in decimal degrees
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in decimal degrees
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Place {
    /// Create a place resolved to the given coordinates
    #[must_use]
    pub fn resolved(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            lat: Some(coordinates.lat),
            lng: Some(coordinates.lng),
        }
    }

    /// Create a place the geocoder could not match
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lat: None,
            lng: None,
        }
    }

    /// Coordinates, if both components are present
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unresolved_place_serializes_nulls() {
        let place = Place::unresolved("Atlantis");
        let value = serde_json::to_value(&place).unwrap();
        assert_eq!(value, json!({"name": "Atlantis", "lat": null, "lng": null}));
    }

    #[test]
    fn test_place_without_coordinate_fields_deserializes() {
        let place: Place = serde_json::from_value(json!({"name": "Somewhere"})).unwrap();
        assert_eq!(place, Place::unresolved("Somewhere"));
        assert!(place.coordinates().is_none());
    }

    #[test]
    fn test_half_resolved_place_has_no_coordinates() {
        let place = Place {
            name: "Half".to_string(),
            lat: Some(41.0),
            lng: None,
        };
        assert!(place.coordinates().is_none());
    }

    #[test]
    fn test_coordinates_query_format() {
        let place = Place::resolved("Park Güell", Coordinates::new(41.4145, 2.1527));
        assert_eq!(place.coordinates().unwrap().to_query(), "41.4145,2.1527");
    }
}
