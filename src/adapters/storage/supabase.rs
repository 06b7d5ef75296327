//! Supabase storage adapter - uploads captured pages to a public bucket.
//!
//! Objects land at `storage/v1/object/{bucket}/{name}` and are served from
//! `storage/v1/object/public/{bucket}/{name}`. The bucket is public by
//! contract so the generation provider can dereference the URLs.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::debug;

use crate::ports::{ImageStorage, StorageError, UploadedImage};

/// Configuration for the Supabase storage adapter.
#[derive(Debug, Clone)]
pub struct SupabaseStorageConfig {
    /// Project base URL (e.g. `https://xyz.supabase.co`).
    pub base_url: String,
    /// Service key used for uploads.
    api_key: Secret<String>,
    /// Bucket holding captured pages.
    pub bucket: String,
    /// Upload timeout.
    pub timeout: Duration,
}

impl SupabaseStorageConfig {
    /// Creates a configuration for the given project and bucket.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: Secret::new(api_key.into()),
            bucket: bucket.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the upload timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Storage adapter backed by Supabase's object storage REST API.
pub struct SupabaseStorage {
    config: SupabaseStorageConfig,
    client: Client,
}

impl SupabaseStorage {
    /// Creates a new adapter with the given configuration.
    pub fn new(config: SupabaseStorageConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Network(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn upload_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, self.config.bucket, object_name
        )
    }

    fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, self.config.bucket, object_name
        )
    }
}

#[async_trait]
impl ImageStorage for SupabaseStorage {
    async fn upload(
        &self,
        object_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, StorageError> {
        debug!(object_name, size = bytes.len(), "uploading captured page");

        let response = self
            .client
            .post(self.upload_url(object_name))
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "image/jpeg")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                object_name: object_name.to_string(),
                message: format!("{status}: {message}"),
            });
        }

        Ok(UploadedImage {
            object_name: object_name.to_string(),
            url: self.public_url(object_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_supabase_object_layout() {
        let config = SupabaseStorageConfig::new("https://xyz.supabase.co", "key", "captures");
        let storage = SupabaseStorage::new(config).unwrap();

        assert_eq!(
            storage.upload_url("menu-1-1.jpg"),
            "https://xyz.supabase.co/storage/v1/object/captures/menu-1-1.jpg"
        );
        assert_eq!(
            storage.public_url("menu-1-1.jpg"),
            "https://xyz.supabase.co/storage/v1/object/public/captures/menu-1-1.jpg"
        );
    }
}
