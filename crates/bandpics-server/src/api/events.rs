//! Live event CRUD handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use bandpics_db::{LiveEventChanges, LiveEventRow};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Event fields for create and update. Absent and `null` fields are both ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(in crate::api) struct LiveEventBody {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "eventDate")]
    pub event_date: Option<String>,
    pub location: Option<serde_json::Value>,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(in crate::api) struct EmbeddedEvent {
    pub event: LiveEventBody,
}

/// Request body: `{"event": {...}}`, or the event fields at the top level.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(in crate::api) enum LiveEventPayload {
    Embedded(EmbeddedEvent),
    Flat(LiveEventBody),
}

impl LiveEventPayload {
    pub(in crate::api) fn into_body(self) -> LiveEventBody {
        match self {
            Self::Embedded(embedded) => embedded.event,
            Self::Flat(body) => body,
        }
    }
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct LiveEventItem {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LiveEventRow> for LiveEventItem {
    fn from(row: LiveEventRow) -> Self {
        Self {
            id: row.public_id,
            name: row.name,
            description: row.description,
            event_date: row.event_date,
            location: row.location,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct DeleteEventResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn parse_event_id(req_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("'{raw}' is not a valid event id"),
        )
    })
}

fn read_payload(
    req_id: &str,
    payload: Result<Json<LiveEventPayload>, JsonRejection>,
) -> Result<LiveEventBody, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        ApiError::new(
            req_id,
            "validation_error",
            format!(
                "body must be {{\"event\": {{...}}}} with fields name, description, \
                 event_date, location, data: {}",
                rejection.body_text()
            ),
        )
    })?;
    Ok(payload.into_body())
}

pub(in crate::api) fn into_changes(
    req_id: &str,
    body: LiveEventBody,
) -> Result<LiveEventChanges, ApiError> {
    let event_date = body
        .event_date
        .as_deref()
        .map(str::trim)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ApiError::new(
                    req_id,
                    "validation_error",
                    format!("event_date must be YYYY-MM-DD, got '{raw}'"),
                )
            })
        })
        .transpose()?;

    Ok(LiveEventChanges {
        name: body.name,
        description: body.description,
        event_date,
        location: body.location,
        data: body.data,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/events
pub(super) async fn list_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<LiveEventItem>>>, ApiError> {
    let rows = bandpics_db::list_live_events(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(LiveEventItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/events/{event_id}
pub(super) async fn get_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(event_id): Path<String>,
) -> Result<Json<ApiResponse<LiveEventItem>>, ApiError> {
    let rid = &req_id.0;
    let public_id = parse_event_id(rid, &event_id)?;

    let row = bandpics_db::get_live_event(&state.pool, public_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| map_db_error(rid.clone(), &bandpics_db::DbError::NotFound))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/events
pub(super) async fn create_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<LiveEventPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<LiveEventItem>>), ApiError> {
    let rid = &req_id.0;
    let changes = into_changes(rid, read_payload(rid, payload)?)?;

    let row = bandpics_db::create_live_event(&state.pool, &changes)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(event_id = %row.public_id, "live event created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: row.into(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PATCH /api/v1/events/{event_id}
pub(super) async fn update_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(event_id): Path<String>,
    payload: Result<Json<LiveEventPayload>, JsonRejection>,
) -> Result<Json<ApiResponse<LiveEventItem>>, ApiError> {
    let rid = &req_id.0;
    let public_id = parse_event_id(rid, &event_id)?;
    let changes = into_changes(rid, read_payload(rid, payload)?)?;

    if changes.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "at least one field must be provided",
        ));
    }

    let row = bandpics_db::update_live_event(&state.pool, public_id, &changes)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/events/{event_id}
pub(super) async fn delete_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(event_id): Path<String>,
) -> Result<Json<ApiResponse<DeleteEventResponse>>, ApiError> {
    let rid = &req_id.0;
    let public_id = parse_event_id(rid, &event_id)?;

    bandpics_db::delete_live_event(&state.pool, public_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(event_id = %public_id, "live event deleted");

    Ok(Json(ApiResponse {
        data: DeleteEventResponse {
            message: "Event deleted successfully",
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
