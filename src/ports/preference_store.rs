//! Preference Store Port - the single per-user preference record.
//!
//! Simple key-value CRUD. The core treats the record as an opaque input
//! structure; absence yields the default profile.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::PreferenceProfile;

/// Port for persisting the user's dining preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Loads the profile for a user, or the default profile when no record
    /// exists.
    async fn get(&self, user_id: Uuid) -> Result<PreferenceProfile, PreferenceStoreError>;

    /// Saves (inserts or updates) the profile for a user.
    async fn save(
        &self,
        user_id: Uuid,
        profile: &PreferenceProfile,
    ) -> Result<(), PreferenceStoreError>;
}

/// Preference persistence failures.
#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for PreferenceStoreError {
    fn from(err: sqlx::Error) -> Self {
        PreferenceStoreError::Database(err.to_string())
    }
}
