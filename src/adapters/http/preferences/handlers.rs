//! HTTP handlers for the preference endpoints.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use crate::adapters::http::pairings::dto::{ErrorResponse, PreferencesDto};
use crate::adapters::http::DEFAULT_USER_ID;
use crate::domain::PreferenceProfile;
use crate::ports::PreferenceStore;

/// Shared state for the preference endpoints.
#[derive(Clone)]
pub struct PreferencesState {
    pub store: Arc<dyn PreferenceStore>,
}

impl PreferencesState {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Serialize)]
struct SaveResponse {
    success: bool,
}

/// GET /api/preferences - the stored profile, or defaults when absent.
/// A store failure also answers with defaults so the capture flow is
/// never blocked by the preference record.
pub async fn get_preferences(State(state): State<PreferencesState>) -> impl IntoResponse {
    let profile = match state.store.get(DEFAULT_USER_ID).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(error = %err, "failed to load preferences, using defaults");
            PreferenceProfile::default()
        }
    };
    Json(PreferencesDto::from(profile)).into_response()
}

/// PUT /api/preferences - save the profile.
pub async fn save_preferences(
    State(state): State<PreferencesState>,
    Json(dto): Json<PreferencesDto>,
) -> impl IntoResponse {
    let profile: PreferenceProfile = dto.into();
    match state.store.save(DEFAULT_USER_ID, &profile).await {
        Ok(()) => Json(SaveResponse { success: true }).into_response(),
        Err(err) => {
            warn!(error = %err, "failed to save preferences");
            Json(ErrorResponse::new("Failed to save preferences")).into_response()
        }
    }
}
