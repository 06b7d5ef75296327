//! The pairing failure taxonomy.
//!
//! Every failure crossing the orchestration boundary is one of these
//! variants, and each maps to a stable user-facing message. Nothing here is
//! retried automatically - retry is a user-initiated action.

use thiserror::Error;

use crate::ports::{ProviderError, StorageError};

/// Failures of the generate/refine pipeline.
#[derive(Debug, Error)]
pub enum PairingError {
    /// One or more images failed to reach storage. Partial uploads are not
    /// cleaned up; the user re-attempts the whole capture step.
    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),

    /// The generative-model call itself failed (network/auth/quota).
    #[error("provider failure: {0}")]
    Provider(#[from] ProviderError),

    /// The model explicitly reported it cannot read an image. Carries the
    /// model's own diagnostic message.
    #[error("unreadable input: {message}")]
    UnreadableInput { message: String },

    /// The response could not be parsed as the expected JSON shape.
    #[error("malformed model response")]
    MalformedResponse,

    /// Parse succeeded but no usable recommendations were present.
    #[error("no recommendations in response")]
    EmptyRecommendations,
}

impl PairingError {
    /// The message shown to the diner. Transport details are deliberately
    /// flattened to a generic message; unreadable-input failures pass the
    /// model's diagnostic through so the user knows to retake the photo.
    pub fn user_message(&self) -> String {
        match self {
            PairingError::Upload(_) => {
                "Failed to upload photo. Please check your connection and try again.".to_string()
            }
            PairingError::Provider(_) => {
                "Something went wrong generating pairings. Please try again.".to_string()
            }
            PairingError::UnreadableInput { message } => format!(
                "Could not read the menu or wine list. {}",
                if message.is_empty() {
                    "Please try taking clearer photos with good lighting."
                } else {
                    message
                }
            ),
            PairingError::MalformedResponse => {
                "We couldn't understand the AI response. Please try again.".to_string()
            }
            PairingError::EmptyRecommendations => {
                "No pairings found. Please ensure both images show a food menu and wine list."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_input_carries_model_diagnostic() {
        let err = PairingError::UnreadableInput {
            message: "The image is too dark".to_string(),
        };
        assert!(err.user_message().contains("too dark"));
        assert!(err.user_message().starts_with("Could not read"));
    }

    #[test]
    fn unreadable_input_with_empty_message_suggests_retake() {
        let err = PairingError::UnreadableInput {
            message: String::new(),
        };
        assert!(err.user_message().contains("clearer photos"));
    }

    #[test]
    fn upload_failure_mentions_connection() {
        let err = PairingError::Upload(StorageError::Network("timed out".to_string()));
        assert!(err.user_message().contains("check your connection"));
    }

    #[test]
    fn provider_failure_is_generic() {
        let err = PairingError::Provider(ProviderError::AuthenticationFailed);
        let msg = err.user_message();
        assert!(!msg.contains("auth"), "transport detail leaked: {msg}");
    }

    #[test]
    fn empty_recommendations_asks_for_both_documents() {
        let msg = PairingError::EmptyRecommendations.user_message();
        assert!(msg.contains("food menu and wine list"));
    }
}
