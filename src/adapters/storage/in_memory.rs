//! In-memory storage adapter - test double issuing stable fake URLs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{ImageStorage, StorageError, UploadedImage};

/// Keeps uploaded bytes in memory and issues deterministic URLs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fail_next: Arc<RwLock<bool>>,
}

impl InMemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next upload fail, for abort-on-first-failure tests.
    pub async fn fail_next_upload(&self) {
        *self.fail_next.write().await = true;
    }

    /// Number of stored objects.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Returns the stored bytes for an object, if present.
    pub async fn get(&self, object_name: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(object_name).cloned()
    }
}

#[async_trait]
impl ImageStorage for InMemoryStorage {
    async fn upload(
        &self,
        object_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, StorageError> {
        let mut fail = self.fail_next.write().await;
        if *fail {
            *fail = false;
            return Err(StorageError::Network("injected failure".to_string()));
        }
        drop(fail);

        self.objects
            .write()
            .await
            .insert(object_name.to_string(), bytes);

        Ok(UploadedImage {
            object_name: object_name.to_string(),
            url: format!("memory://captures/{object_name}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_stores_bytes_and_issues_url() {
        let storage = InMemoryStorage::new();
        let uploaded = storage.upload("menu-1.jpg", vec![1, 2, 3]).await.unwrap();

        assert_eq!(uploaded.url, "memory://captures/menu-1.jpg");
        assert_eq!(storage.get("menu-1.jpg").await, Some(vec![1, 2, 3]));
        assert_eq!(storage.object_count().await, 1);
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let storage = InMemoryStorage::new();
        storage.fail_next_upload().await;

        assert!(storage.upload("a.jpg", vec![]).await.is_err());
        assert!(storage.upload("b.jpg", vec![]).await.is_ok());
    }
}
