//! Server metadata and token-listing endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::Serialize;

use calsync_core::permissions::{KNOWN_PERMISSIONS, WILDCARD};

use crate::auth::{Authenticated, mask_token};
use crate::routes::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/info", get(server_info))
        .route("/api/permissions", get(list_permissions))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub events_count: usize,
    pub storage: String,
    pub user_permissions: Vec<String>,
    pub endpoints: Vec<&'static str>,
}

/// GET /api/info - Server metadata plus the caller's own permissions.
async fn server_info(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ServerInfo>, ApiError> {
    auth.require(&["read"])?;
    Ok(Json(ServerInfo {
        name: "Calendar Sync Server",
        version: env!("CARGO_PKG_VERSION"),
        events_count: state.store.load_all().len(),
        storage: format!("File system ({})", state.store.path().display()),
        user_permissions: auth.permissions().to_vec(),
        endpoints: vec![
            "GET /api/events - List all events (requires: read)",
            "POST /api/events/sync - Synchronize events (requires: sync)",
            "POST /api/events - Create an event (requires: create)",
            "PUT /api/events/{id} - Update an event (requires: update)",
            "DELETE /api/events/{id} - Delete an event (requires: delete)",
            "GET /api/events/date/{date} - Events on a date (requires: read)",
        ],
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    /// Masked form only; raw tokens never leave the config file.
    pub token: String,
    pub permissions: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsResponse {
    pub available_permissions: Vec<&'static str>,
    pub tokens: Vec<TokenEntry>,
}

/// GET /api/permissions - Configured tokens (masked) and their grants.
/// Wildcard tokens only.
async fn list_permissions(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<PermissionsResponse>, ApiError> {
    auth.require(&[WILDCARD])?;
    let tokens = state
        .gate
        .entries()
        .map(|(token, set)| TokenEntry {
            token: mask_token(token),
            permissions: set.to_vec(),
        })
        .collect();
    Ok(Json(PermissionsResponse {
        available_permissions: KNOWN_PERMISSIONS.to_vec(),
        tokens,
    }))
}
