//! Request/response DTOs for the pairing endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::{PreferenceProfile, PriceSensitivity, Recommendation, SessionId};

/// User preferences as sent by the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreferencesDto {
    #[serde(default)]
    pub cuisine_styles: Vec<String>,
    #[serde(default)]
    pub price_sensitivity: PriceSensitivity,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

impl From<PreferencesDto> for PreferenceProfile {
    fn from(dto: PreferencesDto) -> Self {
        PreferenceProfile::new(
            dto.cuisine_styles,
            dto.price_sensitivity,
            dto.allergies,
            dto.dislikes,
        )
    }
}

impl From<PreferenceProfile> for PreferencesDto {
    fn from(profile: PreferenceProfile) -> Self {
        Self {
            cuisine_styles: profile.cuisine_styles,
            price_sensitivity: profile.price_sensitivity,
            allergies: profile.allergies,
            dislikes: profile.dislikes,
        }
    }
}

/// POST /api/pairings - captured pages arrive base64-encoded, one entry
/// per page, optionally wrapped in a `data:image/...;base64,` prefix.
#[derive(Debug, Deserialize)]
pub struct GeneratePairingsRequest {
    pub menu_images: Vec<String>,
    pub wine_list_images: Vec<String>,
    pub preferences: PreferencesDto,
    #[serde(default)]
    pub occasion: Option<String>,
}

/// POST /api/pairings/refine - the caller resends the accumulated context.
#[derive(Debug, Deserialize)]
pub struct RefinePairingsRequest {
    pub session_id: SessionId,
    pub refinement: String,
    pub previous_recommendations: Vec<Recommendation>,
    pub menu_image_urls: Vec<String>,
    pub wine_list_image_urls: Vec<String>,
    pub preferences: PreferencesDto,
}

/// Successful pairing response.
#[derive(Debug, Serialize)]
pub struct PairingsResponse {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
    pub session_id: SessionId,
    pub menu_image_urls: Vec<String>,
    pub wine_list_image_urls: Vec<String>,
}

/// The uniform failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
