//! Event CRUD, sync, and date-filter endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use calsync_core::{Event, EventDraft, EventPatch};

use crate::auth::Authenticated;
use crate::routes::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/sync", post(sync_events))
        .route("/api/events/{id}", put(update_event).delete(delete_event))
        .route("/api/events/date/{date}", get(events_on_date))
}

/// GET /api/events - The full collection.
async fn list_events(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<Event>>, ApiError> {
    auth.require(&["read"])?;
    Ok(Json(state.store.load_all()))
}

/// POST /api/events - Create one event.
async fn create_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    auth.require(&["create"])?;
    let event = state.store.create(draft)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/{id} - Patch an existing event.
async fn update_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    auth.require(&["update"])?;
    let event = state.store.update(&id, patch)?;
    Ok(Json(event))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth.require(&["delete"])?;
    state.store.delete(&id)?;
    Ok(Json(MessageResponse {
        message: "Event deleted".to_string(),
    }))
}

/// Request body for wholesale synchronization.
#[derive(Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub events: Vec<EventDraft>,
}

#[derive(Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub count: usize,
}

/// POST /api/events/sync - Replace the entire collection.
async fn sync_events(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    auth.require(&["sync"])?;
    let count = state.store.sync(req.events)?;
    Ok(Json(SyncResponse {
        message: "Events synchronized".to_string(),
        count,
    }))
}

/// GET /api/events/date/{date} - Events whose start begins with the date.
async fn events_on_date(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(date): Path<String>,
) -> Result<Json<Vec<Event>>, ApiError> {
    auth.require(&["read"])?;
    Ok(Json(state.store.events_on(&date)))
}
