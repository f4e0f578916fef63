use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PreferenceResponse {
    key: String,
    value: Option<String>,
}

#[derive(Deserialize)]
pub struct PreferenceUpdate {
    pub value: String,
}

// GET /api/preferences/:key
pub async fn get_preference(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<PreferenceResponse>, BookingError> {
    let value = state.preferences.get(&key)?;
    Ok(Json(PreferenceResponse { key, value }))
}

// PUT /api/preferences/:key
pub async fn set_preference(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(update): Json<PreferenceUpdate>,
) -> Result<Json<PreferenceResponse>, BookingError> {
    if key.trim().is_empty() {
        return Err(BookingError::validation("key", "is required"));
    }
    state.preferences.set(&key, &update.value)?;
    Ok(Json(PreferenceResponse {
        key,
        value: Some(update.value),
    }))
}

// DELETE /api/preferences/:key
pub async fn delete_preference(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<StatusCode, BookingError> {
    if state.preferences.remove(&key)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(BookingError::NotFound(format!("preference {key}")))
    }
}
