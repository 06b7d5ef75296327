//! Session/Refinement Coordinator.
//!
//! Stitches the stateless provider and validator into the two public
//! operations: `generate_pairings` (upload fan-out, then one model call,
//! then validation) and `refine_pairings` (no re-upload; the caller
//! threads the URLs and prior recommendations back in). No failure is
//! retried here - retry is a user-initiated action.

use chrono::Utc;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::validator;
use crate::domain::{
    ImageDocument, PairingError, PreferenceProfile, Recommendation, SessionId,
};
use crate::ports::{
    ImageSet, ImageStorage, PairingProvider, PairingRequest, RefinementRequest,
};

/// Input to the initial generation: raw captured pages per document type.
#[derive(Debug, Clone)]
pub struct GeneratePairingsInput {
    pub menu_images: Vec<Vec<u8>>,
    pub wine_list_images: Vec<Vec<u8>>,
    pub preferences: PreferenceProfile,
    pub occasion: Option<String>,
}

/// Input to a refinement turn: the caller resends everything accumulated
/// so far, since no server-side session state exists.
#[derive(Debug, Clone)]
pub struct RefinePairingsInput {
    pub session_id: SessionId,
    pub refinement: String,
    pub previous_recommendations: Vec<Recommendation>,
    pub menu_image_urls: Vec<String>,
    pub wine_list_image_urls: Vec<String>,
    pub preferences: PreferenceProfile,
}

/// The successful outcome of either operation. URL lists are returned so
/// the caller can thread them back into refinement without re-uploading.
#[derive(Debug, Clone)]
pub struct PairingOutcome {
    pub recommendations: Vec<Recommendation>,
    pub session_id: SessionId,
    pub menu_image_urls: Vec<String>,
    pub wine_list_image_urls: Vec<String>,
}

/// Orchestrates upload, generation, refinement and validation.
pub struct PairingService {
    provider: Arc<dyn PairingProvider>,
    storage: Arc<dyn ImageStorage>,
}

impl PairingService {
    /// Creates a service over a provider and a storage adapter.
    pub fn new(provider: Arc<dyn PairingProvider>, storage: Arc<dyn ImageStorage>) -> Self {
        Self { provider, storage }
    }

    /// First operation of a session: uploads every page, calls the
    /// provider once, validates, and mints a session id.
    pub async fn generate_pairings(
        &self,
        input: GeneratePairingsInput,
    ) -> Result<PairingOutcome, PairingError> {
        let batch = Utc::now().timestamp_millis();

        // Fan out uploads within and across document types; the first
        // failure aborts the whole operation. Partial uploads are not
        // cleaned up.
        let (menu_urls, wine_list_urls) = tokio::try_join!(
            self.upload_document(ImageDocument::Menu, batch, input.menu_images),
            self.upload_document(ImageDocument::WineList, batch, input.wine_list_images),
        )?;

        debug!(
            menu_pages = menu_urls.len(),
            wine_pages = wine_list_urls.len(),
            "all pages uploaded, requesting pairings"
        );

        let request = PairingRequest {
            images: ImageSet::new(menu_urls.clone(), wine_list_urls.clone()),
            preferences: input.preferences.clone(),
            occasion: input.occasion,
        };

        let raw = self.provider.generate(&request).await?;
        let set = validator::normalize_response(&raw, None)?;
        validator::scan_for_allergen_mentions(&set, &input.preferences.allergies);

        info!(session_id = %set.session_id, "pairing session started");

        Ok(PairingOutcome {
            recommendations: set.recommendations,
            session_id: set.session_id,
            menu_image_urls: menu_urls,
            wine_list_image_urls: wine_list_urls,
        })
    }

    /// Refinement turn: reuses the URLs the caller already holds and the
    /// same session id; the refined output obeys the same contract as
    /// initial generation.
    pub async fn refine_pairings(
        &self,
        input: RefinePairingsInput,
    ) -> Result<PairingOutcome, PairingError> {
        let request = RefinementRequest {
            session_id: input.session_id,
            refinement: input.refinement,
            previous_recommendations: input.previous_recommendations,
            images: ImageSet::new(
                input.menu_image_urls.clone(),
                input.wine_list_image_urls.clone(),
            ),
            preferences: input.preferences.clone(),
        };

        let raw = self.provider.refine(&request).await?;
        let set = validator::normalize_response(&raw, Some(input.session_id))?;
        validator::scan_for_allergen_mentions(&set, &input.preferences.allergies);

        info!(session_id = %set.session_id, "pairing session refined");

        Ok(PairingOutcome {
            recommendations: set.recommendations,
            session_id: set.session_id,
            menu_image_urls: input.menu_image_urls,
            wine_list_image_urls: input.wine_list_image_urls,
        })
    }

    /// Uploads all pages of one document concurrently, preserving page
    /// order in the returned URLs.
    async fn upload_document(
        &self,
        document: ImageDocument,
        batch: i64,
        pages: Vec<Vec<u8>>,
    ) -> Result<Vec<String>, PairingError> {
        let uploads = pages.into_iter().enumerate().map(|(i, bytes)| {
            let object_name = format!("{}-{}-{}.jpg", document.slug(), batch, i + 1);
            let storage = Arc::clone(&self.storage);
            async move { storage.upload(&object_name, bytes).await }
        });

        let uploaded = try_join_all(uploads).await?;
        Ok(uploaded.into_iter().map(|u| u.url).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockPairingProvider;
    use crate::adapters::storage::InMemoryStorage;
    use crate::domain::PriceSensitivity;
    use crate::ports::ProviderError;

    const THREE_PAIRINGS: &str = r#"{
        "recommendations": [
            {"food_name": "Duck Confit", "wine_name": "Pinot Noir", "reasoning": "Earthy.", "price_indicator": "££", "rank": 1},
            {"food_name": "Sea Bass", "wine_name": "Chablis", "reasoning": "Bright.", "price_indicator": "£", "rank": 2},
            {"food_name": "Ribeye", "wine_name": "Malbec", "reasoning": "Bold.", "price_indicator": "£££", "rank": 3}
        ]
    }"#;

    fn service_with(provider: MockPairingProvider) -> (PairingService, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let service = PairingService::new(Arc::new(provider), storage.clone());
        (service, storage)
    }

    fn generate_input(pages: usize) -> GeneratePairingsInput {
        GeneratePairingsInput {
            menu_images: vec![vec![0xFF; 8]; pages],
            wine_list_images: vec![vec![0xAA; 8]; pages],
            preferences: PreferenceProfile::default(),
            occasion: None,
        }
    }

    #[tokio::test]
    async fn generate_uploads_all_pages_and_returns_urls() {
        let provider = MockPairingProvider::new().with_output(THREE_PAIRINGS);
        let (service, storage) = service_with(provider);

        let outcome = service.generate_pairings(generate_input(2)).await.unwrap();

        assert_eq!(outcome.recommendations.len(), 3);
        assert_eq!(outcome.menu_image_urls.len(), 2);
        assert_eq!(outcome.wine_list_image_urls.len(), 2);
        assert_eq!(storage.object_count().await, 4);
        // Page order survives the concurrent fan-out.
        assert!(outcome.menu_image_urls[0].contains("-1.jpg"));
        assert!(outcome.menu_image_urls[1].contains("-2.jpg"));
    }

    #[tokio::test]
    async fn upload_failure_aborts_before_any_provider_call() {
        let provider = MockPairingProvider::new().with_output(THREE_PAIRINGS);
        let (service, storage) = service_with(provider.clone());
        storage.fail_next_upload().await;

        let err = service.generate_pairings(generate_input(1)).await.unwrap_err();
        assert!(matches!(err, PairingError::Upload(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_transport_failure_propagates() {
        let provider =
            MockPairingProvider::new().with_error(ProviderError::Unavailable("down".into()));
        let (service, _) = service_with(provider);

        let err = service.generate_pairings(generate_input(1)).await.unwrap_err();
        assert!(matches!(err, PairingError::Provider(_)));
    }

    #[tokio::test]
    async fn refine_reuses_session_and_urls_without_uploading() {
        let provider = MockPairingProvider::new()
            .with_output(THREE_PAIRINGS)
            .with_output(THREE_PAIRINGS);
        let (service, storage) = service_with(provider.clone());

        let first = service.generate_pairings(generate_input(1)).await.unwrap();
        let uploaded_before_refine = storage.object_count().await;

        let refined = service
            .refine_pairings(RefinePairingsInput {
                session_id: first.session_id,
                refinement: "Lighter".to_string(),
                previous_recommendations: first.recommendations.clone(),
                menu_image_urls: first.menu_image_urls.clone(),
                wine_list_image_urls: first.wine_list_image_urls.clone(),
                preferences: PreferenceProfile::default(),
            })
            .await
            .unwrap();

        assert_eq!(refined.session_id, first.session_id);
        assert_eq!(refined.menu_image_urls, first.menu_image_urls);
        assert_eq!(storage.object_count().await, uploaded_before_refine);
    }

    #[tokio::test]
    async fn refine_passes_prior_recommendations_to_provider() {
        let provider = MockPairingProvider::new()
            .with_output(THREE_PAIRINGS)
            .with_output(THREE_PAIRINGS);
        let (service, _) = service_with(provider.clone());

        let first = service.generate_pairings(generate_input(1)).await.unwrap();
        service
            .refine_pairings(RefinePairingsInput {
                session_id: first.session_id,
                refinement: "Red only".to_string(),
                previous_recommendations: first.recommendations.clone(),
                menu_image_urls: first.menu_image_urls,
                wine_list_image_urls: first.wine_list_image_urls,
                preferences: PreferenceProfile::default(),
            })
            .await
            .unwrap();

        use crate::adapters::ai::RecordedCall;
        let calls = provider.calls();
        match &calls[1] {
            RecordedCall::Refine(r) => {
                assert_eq!(r.refinement, "Red only");
                assert_eq!(r.previous_recommendations.len(), 3);
            }
            _ => panic!("expected second call to be a refinement"),
        }
    }

    #[tokio::test]
    async fn unreadable_response_surfaces_model_message() {
        let provider = MockPairingProvider::new()
            .with_output(r#"{"error": "unreadable", "message": "too dark"}"#);
        let (service, _) = service_with(provider);

        let err = service.generate_pairings(generate_input(1)).await.unwrap_err();
        match err {
            PairingError::UnreadableInput { message } => assert_eq!(message, "too dark"),
            other => panic!("expected UnreadableInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn budget_profile_is_forwarded_to_provider() {
        let provider = MockPairingProvider::new().with_output(THREE_PAIRINGS);
        let (service, _) = service_with(provider.clone());

        let mut input = generate_input(1);
        input.preferences = PreferenceProfile::new(
            vec![],
            PriceSensitivity::Budget,
            vec!["peanut".to_string()],
            vec![],
        );
        service.generate_pairings(input).await.unwrap();

        use crate::adapters::ai::RecordedCall;
        match &provider.calls()[0] {
            RecordedCall::Generate(r) => {
                assert_eq!(r.preferences.price_sensitivity, PriceSensitivity::Budget);
                assert_eq!(r.preferences.allergies, vec!["peanut"]);
            }
            _ => panic!("expected a generate call"),
        }
    }
}
