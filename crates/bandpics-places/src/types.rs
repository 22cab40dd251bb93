use bandpics_core::{haversine_distance, Coordinate};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::PlacesError;
use crate::profile::{RankPreference, SearchType};

/// Radius used when the caller does not supply one.
pub const DEFAULT_RADIUS_METERS: f64 = 50.0;

/// Largest circle the provider accepts for a nearby search.
pub const MAX_RADIUS_METERS: f64 = 50_000.0;

// ---------------------------------------------------------------------------
// Request side
// ---------------------------------------------------------------------------

/// A validated nearby-search request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyRequest {
    center: Coordinate,
    search_type: SearchType,
    radius_meters: f64,
}

impl NearbyRequest {
    /// Builds a request after checking the center and radius.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidArgument`] when the center is outside
    /// valid latitude/longitude ranges, or the radius is not a finite value
    /// in `(0, MAX_RADIUS_METERS]`.
    pub fn new(
        center: Coordinate,
        search_type: SearchType,
        radius_meters: f64,
    ) -> Result<Self, PlacesError> {
        if !center.is_valid() {
            return Err(PlacesError::InvalidArgument(format!(
                "center must have latitude in [-90, 90] and longitude in [-180, 180], got ({}, {})",
                center.latitude, center.longitude
            )));
        }
        if !radius_meters.is_finite() || radius_meters <= 0.0 || radius_meters > MAX_RADIUS_METERS
        {
            return Err(PlacesError::InvalidArgument(format!(
                "radius must be greater than 0 and at most {MAX_RADIUS_METERS} meters, got {radius_meters}"
            )));
        }

        Ok(Self {
            center,
            search_type,
            radius_meters,
        })
    }

    /// Default search type and radius around `center`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidArgument`] for an out-of-range center.
    pub fn around(center: Coordinate) -> Result<Self, PlacesError> {
        Self::new(center, SearchType::default(), DEFAULT_RADIUS_METERS)
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    #[must_use]
    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    #[must_use]
    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub(crate) fn location_restriction(&self) -> LocationRestriction {
        LocationRestriction {
            circle: Circle {
                center: self.center,
                radius: self.radius_meters,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    pub center: Coordinate,
    pub radius: f64,
}

/// Search area sent to the provider and echoed back in the result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

/// Wire body of `POST /v1/places:searchNearby`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchNearbyBody<'a> {
    pub included_types: &'a [&'a str],
    pub location_restriction: LocationRestriction,
    pub rank_preference: RankPreference,
}

// ---------------------------------------------------------------------------
// Response side
// ---------------------------------------------------------------------------

/// A place returned by the provider, plus its distance from the search center.
///
/// Only `location` is interpreted. `display_name` and `address_components`
/// stay as raw JSON because the provider's shapes for them vary by locale;
/// fields outside the field mask land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<serde_json::Value>,
    #[serde(
        default,
        alias = "formatted_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub formatted_address: Option<String>,
    #[serde(
        default,
        alias = "address_components",
        skip_serializing_if = "Option::is_none"
    )]
    pub address_components: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    /// Meters from the search center; `null` when the provider gave no location.
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Place {
    pub(crate) fn with_distance_from(mut self, center: Coordinate) -> Self {
        self.distance = self.location.map(|loc| haversine_distance(center, loc));
        self
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

/// Successful search: the annotated places and the parameters that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySearchResult {
    pub places: Vec<Place>,
    pub location_restriction: LocationRestriction,
    pub search_type_name: &'static str,
    pub included_types: Vec<String>,
    pub rank_preference: RankPreference,
}

/// A non-200 answer from the provider, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRejection {
    pub status: u16,
    /// Raw `Content-Type` header, if the provider sent one.
    pub content_type: Option<String>,
    /// Body bytes exactly as received.
    pub body: Bytes,
}

/// Result of one round trip to the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum NearbyOutcome {
    Found(NearbySearchResult),
    Rejected(ProviderRejection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_out_of_range_center() {
        let err = NearbyRequest::new(Coordinate::new(91.0, 0.0), SearchType::Default, 50.0)
            .unwrap_err();
        assert!(matches!(err, PlacesError::InvalidArgument(_)), "{err:?}");
    }

    #[test]
    fn request_rejects_bad_radius() {
        let center = Coordinate::new(12.34, 56.78);
        for radius in [0.0, -5.0, f64::NAN, f64::INFINITY, MAX_RADIUS_METERS + 1.0] {
            let result = NearbyRequest::new(center, SearchType::Default, radius);
            assert!(
                matches!(result, Err(PlacesError::InvalidArgument(_))),
                "radius {radius} should be rejected"
            );
        }
    }

    #[test]
    fn around_uses_defaults() {
        let req = NearbyRequest::around(Coordinate::new(12.34, 56.78)).unwrap();
        assert_eq!(req.search_type(), SearchType::Default);
        assert!((req.radius_meters() - DEFAULT_RADIUS_METERS).abs() < f64::EPSILON);
    }

    #[test]
    fn request_body_matches_provider_shape() {
        let req = NearbyRequest::new(Coordinate::new(12.34, 56.78), SearchType::Expanded, 120.0)
            .unwrap();
        let profile = req.search_type().profile();
        let body = SearchNearbyBody {
            included_types: profile.included_types,
            location_restriction: req.location_restriction(),
            rank_preference: profile.rank_preference,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["includedTypes"].as_array().map(Vec::len), Some(11));
        assert_eq!(json["rankPreference"], "POPULARITY");
        assert_eq!(
            json["locationRestriction"],
            serde_json::json!({
                "circle": {
                    "center": {"latitude": 12.34, "longitude": 56.78},
                    "radius": 120.0
                }
            })
        );
    }

    #[test]
    fn place_without_location_gets_null_distance() {
        let place: Place = serde_json::from_value(serde_json::json!({
            "name": "places/abc",
            "types": ["bar"]
        }))
        .unwrap();
        let place = place.with_distance_from(Coordinate::new(0.0, 0.0));
        assert!(place.distance.is_none());

        let json = serde_json::to_value(&place).unwrap();
        assert!(json.get("distance").is_some_and(serde_json::Value::is_null));
    }

    #[test]
    fn place_accepts_snake_case_address_fields_and_keeps_extras() {
        let place: Place = serde_json::from_value(serde_json::json!({
            "name": "places/abc",
            "displayName": {"text": "The Commodore", "languageCode": "en"},
            "formatted_address": "868 Granville St, Vancouver",
            "address_components": [{"longText": "Vancouver"}],
            "location": {"latitude": 49.2813, "longitude": -123.1222},
            "rating": 4.6
        }))
        .unwrap();
        assert_eq!(
            place.formatted_address.as_deref(),
            Some("868 Granville St, Vancouver")
        );
        assert!(place.address_components.is_some());
        assert_eq!(place.extra.get("rating"), Some(&serde_json::json!(4.6)));

        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(json["formattedAddress"], "868 Granville St, Vancouver");
        assert_eq!(json["displayName"]["text"], "The Commodore");
        assert_eq!(json["rating"], 4.6);
    }

    #[test]
    fn response_without_places_is_empty() {
        let parsed: SearchNearbyResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.places.is_empty());
    }
}
