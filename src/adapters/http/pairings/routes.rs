//! HTTP routes for the pairing endpoints.

use axum::{routing::post, Router};

use super::handlers::{generate_pairings, refine_pairings, PairingsState};

/// Creates the pairings router.
pub fn pairings_routes(state: PairingsState) -> Router {
    Router::new()
        .route("/", post(generate_pairings))
        .route("/refine", post(refine_pairings))
        .with_state(state)
}
