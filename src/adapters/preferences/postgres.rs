//! Postgres preference store - one row per user, upserted on save.
//!
//! Schema:
//!
//! ```sql
//! CREATE TABLE preferences (
//!     user_id           UUID PRIMARY KEY,
//!     cuisine_styles    TEXT[] NOT NULL DEFAULT '{}',
//!     price_sensitivity TEXT NOT NULL DEFAULT 'moderate',
//!     allergies         TEXT[] NOT NULL DEFAULT '{}',
//!     dislikes          TEXT[] NOT NULL DEFAULT '{}',
//!     updated_at        TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{PreferenceProfile, PriceSensitivity};
use crate::ports::{PreferenceStore, PreferenceStoreError};

/// Preference store backed by a Postgres pool.
pub struct PostgresPreferenceStore {
    pool: PgPool,
}

impl PostgresPreferenceStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PostgresPreferenceStore {
    async fn get(&self, user_id: Uuid) -> Result<PreferenceProfile, PreferenceStoreError> {
        let row = sqlx::query(
            "SELECT cuisine_styles, price_sensitivity, allergies, dislikes \
             FROM preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            // No record yet: defaults, matching the public contract.
            return Ok(PreferenceProfile::default());
        };

        let cuisine_styles: Vec<String> = row.try_get("cuisine_styles").map_err(sqlx::Error::from)?;
        let sensitivity: String = row.try_get("price_sensitivity").map_err(sqlx::Error::from)?;
        let allergies: Vec<String> = row.try_get("allergies").map_err(sqlx::Error::from)?;
        let dislikes: Vec<String> = row.try_get("dislikes").map_err(sqlx::Error::from)?;

        let price_sensitivity =
            PriceSensitivity::from_str(&sensitivity).unwrap_or(PriceSensitivity::Moderate);

        Ok(PreferenceProfile::new(
            cuisine_styles,
            price_sensitivity,
            allergies,
            dislikes,
        ))
    }

    async fn save(
        &self,
        user_id: Uuid,
        profile: &PreferenceProfile,
    ) -> Result<(), PreferenceStoreError> {
        sqlx::query(
            "INSERT INTO preferences (user_id, cuisine_styles, price_sensitivity, allergies, dislikes, updated_at) \
             VALUES ($1, $2, $3, $4, $5, now()) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 cuisine_styles = EXCLUDED.cuisine_styles, \
                 price_sensitivity = EXCLUDED.price_sensitivity, \
                 allergies = EXCLUDED.allergies, \
                 dislikes = EXCLUDED.dislikes, \
                 updated_at = now()",
        )
        .bind(user_id)
        .bind(&profile.cuisine_styles)
        .bind(profile.price_sensitivity.as_str())
        .bind(&profile.allergies)
        .bind(&profile.dislikes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
