use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use bandpics_core::{AppConfig, Coordinate};
use bandpics_places::{
    NearbyOutcome, NearbyRequest, PlacesClient, PlacesError, ProviderRejection, SearchType,
    DEFAULT_RADIUS_METERS,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Builds the places client from configuration.
///
/// A missing key or an unusable base URL disables nearby search only; the
/// rest of the API keeps serving.
pub fn places_client_from_config(config: &AppConfig) -> Option<Arc<PlacesClient>> {
    let Some(api_key) = config.google_maps_api_key.as_deref() else {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set; nearby places search disabled");
        return None;
    };

    match PlacesClient::with_base_url(api_key, config.places_timeout_secs, &config.places_base_url)
    {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::error!(error = %e, "places client misconfigured; nearby places search disabled");
            None
        }
    }
}

// Numbers arrive as strings so parse failures use the API error shape
// instead of axum's plain-text query rejection.
#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub search_type: Option<String>,
    pub radius: Option<String>,
}

fn parse_f64(req_id: &str, field: &str, raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    value.parse::<f64>().map(Some).map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("'{field}' must be a number, got '{value}'"),
        )
    })
}

fn require_f64(req_id: &str, field: &str, raw: Option<&str>) -> Result<f64, ApiError> {
    parse_f64(req_id, field, raw)?.ok_or_else(|| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("'{field}' is required"),
        )
    })
}

fn map_places_error(req_id: &str, error: &PlacesError) -> ApiError {
    match error {
        PlacesError::InvalidArgument(msg) => ApiError::new(req_id, "validation_error", msg.clone()),
        PlacesError::MissingApiKey
        | PlacesError::ZeroTimeout
        | PlacesError::InvalidBaseUrl { .. } => {
            tracing::error!(error = %error, "places client misconfigured");
            ApiError::new(req_id, "places_unavailable", "nearby search is not configured")
        }
        PlacesError::Http(_) | PlacesError::Deserialize { .. } => {
            tracing::error!(error = %error, "places provider request failed");
            ApiError::new(req_id, "upstream_error", "places provider request failed")
        }
    }
}

/// Relays a provider rejection with its own status, content type and body bytes.
fn forward_rejection(rejection: ProviderRejection) -> Response {
    let status = StatusCode::from_u16(rejection.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, Body::from(rejection.body)).into_response();
    if let Some(content_type) = rejection
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
    {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}

/// GET /api/v1/places/nearby — venues around a point, with distances.
pub(super) async fn find_nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearbyQuery>,
) -> Result<Response, ApiError> {
    let rid = &req_id.0;

    let Some(client) = state.places.as_deref() else {
        return Err(ApiError::new(
            rid,
            "places_unavailable",
            "nearby search is not configured: GOOGLE_MAPS_API_KEY is not set",
        ));
    };

    let latitude = require_f64(rid, "latitude", params.latitude.as_deref())?;
    let longitude = require_f64(rid, "longitude", params.longitude.as_deref())?;
    let radius =
        parse_f64(rid, "radius", params.radius.as_deref())?.unwrap_or(DEFAULT_RADIUS_METERS);
    let search_type = SearchType::from_query(params.search_type.as_deref());

    let request = NearbyRequest::new(Coordinate::new(latitude, longitude), search_type, radius)
        .map_err(|e| map_places_error(rid, &e))?;

    match client.find_nearby(&request).await {
        Ok(NearbyOutcome::Found(result)) => Ok(Json(ApiResponse {
            data: result,
            meta: ResponseMeta::new(req_id.0.clone()),
        })
        .into_response()),
        Ok(NearbyOutcome::Rejected(rejection)) => Ok(forward_rejection(rejection)),
        Err(e) => Err(map_places_error(rid, &e)),
    }
}
