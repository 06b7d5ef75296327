//! HTTP routes for the preference endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{get_preferences, save_preferences, PreferencesState};

/// Creates the preferences router.
pub fn preferences_routes(state: PreferencesState) -> Router {
    Router::new()
        .route("/", get(get_preferences))
        .route("/", put(save_preferences))
        .with_state(state)
}
