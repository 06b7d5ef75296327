//! Pairing Provider Port - interface for the multimodal generative model.
//!
//! The provider translates a structured pairing request into a single model
//! call and returns the raw textual response. It owns prompt construction;
//! it does not parse or validate the payload - that is the validator's job.
//! The provider is stateless per call: a refinement resubmits the full image
//! set, preferences, and prior recommendations in-band.
//!
//! No retries happen at this layer. A transport-level failure propagates as
//! a [`ProviderError`] to the caller.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{PreferenceProfile, Recommendation, SessionId};

/// The stable, dereferenceable image references for one session: ordered
/// page URLs per document type. Immutable once a pairing session starts;
/// the identical set is resubmitted on every refinement call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    pub menu_urls: Vec<String>,
    pub wine_list_urls: Vec<String>,
}

impl ImageSet {
    pub fn new(menu_urls: Vec<String>, wine_list_urls: Vec<String>) -> Self {
        Self {
            menu_urls,
            wine_list_urls,
        }
    }
}

/// Request for an initial generation (no session yet).
#[derive(Debug, Clone)]
pub struct PairingRequest {
    pub images: ImageSet,
    pub preferences: PreferenceProfile,
    /// Optional occasion/mood hint appended to the user turn.
    pub occasion: Option<String>,
}

/// Request for a refinement turn under an existing session.
#[derive(Debug, Clone)]
pub struct RefinementRequest {
    pub session_id: SessionId,
    /// The refinement instruction, passed through verbatim.
    pub refinement: String,
    /// The full prior recommendation list - novelty of the refined set
    /// depends entirely on re-supplying this in-band.
    pub previous_recommendations: Vec<Recommendation>,
    pub images: ImageSet,
    pub preferences: PreferenceProfile,
}

/// Port for the generative-model call.
///
/// Implementations build the prompt contract around the request and return
/// the model's raw text. One concrete adapter plus a mock; alternate
/// providers substitute behind this trait.
#[async_trait]
pub trait PairingProvider: Send + Sync {
    /// First call of a session: images + preferences, no prior context.
    async fn generate(&self, request: &PairingRequest) -> Result<String, ProviderError>;

    /// Refinement turn: same image and preference context, plus the prior
    /// recommendations and the user's instruction.
    async fn refine(&self, request: &RefinementRequest) -> Result<String, ProviderError>;
}

/// Transport-level provider failures.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider returned a server error.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// The request was rejected as invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transport envelope (not the pairing payload) could not be read.
    #[error("response envelope error: {0}")]
    Envelope(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_transport_detail() {
        let err = ProviderError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(err.to_string(), "rate limited: retry after 30s");

        let err = ProviderError::Network("connection reset".to_string());
        assert_eq!(err.to_string(), "network error: connection reset");
    }

    #[test]
    fn image_set_preserves_page_order() {
        let set = ImageSet::new(
            vec!["a/1.jpg".into(), "a/2.jpg".into()],
            vec!["b/1.jpg".into()],
        );
        assert_eq!(set.menu_urls.len(), 2);
        assert_eq!(set.menu_urls[0], "a/1.jpg");
        assert_eq!(set.wine_list_urls.len(), 1);
    }
}
