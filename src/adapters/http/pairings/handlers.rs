//! HTTP handlers for the pairing endpoints.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use base64::{engine::general_purpose, Engine};
use tracing::warn;

use crate::application::{
    GeneratePairingsInput, PairingOutcome, PairingService, RefinePairingsInput,
};
use crate::domain::PairingError;
use crate::ports::StorageError;

use super::dto::{
    ErrorResponse, GeneratePairingsRequest, PairingsResponse, RefinePairingsRequest,
};

/// Shared state for the pairing endpoints.
#[derive(Clone)]
pub struct PairingsState {
    pub service: Arc<PairingService>,
}

impl PairingsState {
    pub fn new(service: Arc<PairingService>) -> Self {
        Self { service }
    }
}

/// POST /api/pairings - upload the captured pages and generate the first
/// recommendation set of a session.
pub async fn generate_pairings(
    State(state): State<PairingsState>,
    Json(req): Json<GeneratePairingsRequest>,
) -> impl IntoResponse {
    let input = match decode_request(req) {
        Ok(input) => input,
        Err(err) => return failure(&err),
    };

    match state.service.generate_pairings(input).await {
        Ok(outcome) => success(outcome),
        Err(err) => failure(&err),
    }
}

/// POST /api/pairings/refine - new set under the same session, no
/// re-upload.
pub async fn refine_pairings(
    State(state): State<PairingsState>,
    Json(req): Json<RefinePairingsRequest>,
) -> impl IntoResponse {
    let input = RefinePairingsInput {
        session_id: req.session_id,
        refinement: req.refinement,
        previous_recommendations: req.previous_recommendations,
        menu_image_urls: req.menu_image_urls,
        wine_list_image_urls: req.wine_list_image_urls,
        preferences: req.preferences.into(),
    };

    match state.service.refine_pairings(input).await {
        Ok(outcome) => success(outcome),
        Err(err) => failure(&err),
    }
}

fn success(outcome: PairingOutcome) -> axum::response::Response {
    Json(PairingsResponse {
        success: true,
        recommendations: outcome.recommendations,
        session_id: outcome.session_id,
        menu_image_urls: outcome.menu_image_urls,
        wine_list_image_urls: outcome.wine_list_image_urls,
    })
    .into_response()
}

/// Every failure answers with the uniform envelope; the client decides
/// whether to re-tap. Internal detail stays in the logs.
fn failure(err: &PairingError) -> axum::response::Response {
    warn!(error = %err, "pairing operation failed");
    Json(ErrorResponse::new(err.user_message())).into_response()
}

fn decode_request(req: GeneratePairingsRequest) -> Result<GeneratePairingsInput, PairingError> {
    let menu_images = decode_pages(&req.menu_images)?;
    let wine_list_images = decode_pages(&req.wine_list_images)?;

    Ok(GeneratePairingsInput {
        menu_images,
        wine_list_images,
        preferences: req.preferences.into(),
        occasion: req.occasion,
    })
}

fn decode_pages(pages: &[String]) -> Result<Vec<Vec<u8>>, PairingError> {
    pages.iter().map(|p| decode_image(p)).collect()
}

/// Decodes one base64-encoded page, stripping an optional data-URL prefix.
fn decode_image(payload: &str) -> Result<Vec<u8>, PairingError> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:image/") => rest,
        _ => payload,
    };

    general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| PairingError::Upload(StorageError::InvalidPayload(e.to_string())))
}
