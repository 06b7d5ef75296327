//! In-memory preference store - test double.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::PreferenceProfile;
use crate::ports::{PreferenceStore, PreferenceStoreError};

/// Keeps preference profiles in a map, defaulting when absent.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferenceStore {
    profiles: Arc<RwLock<HashMap<Uuid, PreferenceProfile>>>,
}

impl InMemoryPreferenceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, user_id: Uuid) -> Result<PreferenceProfile, PreferenceStoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(
        &self,
        user_id: Uuid,
        profile: &PreferenceProfile,
    ) -> Result<(), PreferenceStoreError> {
        self.profiles.write().await.insert(user_id, profile.clone());
        Ok(())
    }
}
