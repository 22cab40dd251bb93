//! HTTP client for the Google Places `searchNearby` endpoint.
//!
//! Wraps `reqwest` with API-key handling, the response field mask, and
//! distance annotation of each returned place. One call issues exactly one
//! request: no retries and no caching.

use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, StatusCode, Url};

use crate::error::PlacesError;
use crate::types::{
    NearbyOutcome, NearbyRequest, NearbySearchResult, ProviderRejection, SearchNearbyBody,
    SearchNearbyResponse,
};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com";
const SEARCH_NEARBY_PATH: &str = "v1/places:searchNearby";

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Response fields requested from the provider.
pub const FIELD_MASK: &str = "places.name,places.displayName,places.formatted_address,places.address_components,places.types,places.location";

/// Client for the places nearby-search API.
///
/// Cheap to share: hold it in an `Arc` and call [`PlacesClient::find_nearby`]
/// from as many tasks as needed.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a client pointed at the production places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] for a blank key,
    /// [`PlacesError::ZeroTimeout`] when `timeout_secs` is 0, or
    /// [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] for a blank key,
    /// [`PlacesError::ZeroTimeout`] when `timeout_secs` is 0,
    /// [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse, or
    /// [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(PlacesError::MissingApiKey);
        }
        if timeout_secs == 0 {
            return Err(PlacesError::ZeroTimeout);
        }

        let raw = format!("{}/{SEARCH_NEARBY_PATH}", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&raw).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("bandpics/0.1 (nearby-venues)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Full URL of the nearby-search endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Searches for places around the request center and annotates each with
    /// its Haversine distance in meters.
    ///
    /// Dropping the returned future aborts the outbound request.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure, timeout, or an unreadable body.
    /// - [`PlacesError::Deserialize`] if a 200 body is not the expected JSON.
    ///
    /// A non-200 status is returned as [`NearbyOutcome::Rejected`], not as an error.
    pub async fn find_nearby(&self, request: &NearbyRequest) -> Result<NearbyOutcome, PlacesError> {
        let search_type = request.search_type();
        let profile = search_type.profile();
        let location_restriction = request.location_restriction();

        let body = SearchNearbyBody {
            included_types: profile.included_types,
            location_restriction,
            rank_preference: profile.rank_preference,
        };

        tracing::debug!(
            search_type = %search_type,
            latitude = request.center().latitude,
            longitude = request.center().longitude,
            radius_meters = request.radius_meters(),
            "places nearby search"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(FIELD_MASK_HEADER, FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            tracing::warn!(
                status = status.as_u16(),
                search_type = %search_type,
                "places provider rejected nearby search"
            );
            return Ok(NearbyOutcome::Rejected(ProviderRejection {
                status: status.as_u16(),
                content_type,
                body,
            }));
        }

        let parsed: SearchNearbyResponse =
            serde_json::from_slice(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("searchNearby({search_type})"),
                source: e,
            })?;

        let center = request.center();
        let places: Vec<_> = parsed
            .places
            .into_iter()
            .map(|place| place.with_distance_from(center))
            .collect();

        tracing::debug!(count = places.len(), "places nearby search complete");

        Ok(NearbyOutcome::Found(NearbySearchResult {
            places,
            location_restriction,
            search_type_name: search_type.name(),
            included_types: profile
                .included_types
                .iter()
                .map(|t| (*t).to_owned())
                .collect(),
            rank_preference: profile.rank_preference,
        }))
    }
}
