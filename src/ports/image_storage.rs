//! Image Storage Port - stable URL issuance for captured pages.
//!
//! The core only requires that uploaded references are dereferenceable by
//! the generation provider at call time and remain valid for the lifetime
//! of a session, including all refinement turns.

use async_trait::async_trait;
use thiserror::Error;

/// A stored page and its public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Object name within the bucket (e.g. `menu-1724500000000-1.jpg`).
    pub object_name: String,
    /// Publicly fetchable URL, stable for the session lifetime.
    pub url: String,
}

/// Port for uploading captured images to stable storage.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Uploads JPEG bytes under the given object name and returns its
    /// public URL. Uploads of independent pages may run concurrently.
    async fn upload(&self, object_name: &str, bytes: Vec<u8>)
        -> Result<UploadedImage, StorageError>;
}

/// Storage failures. Any single failure aborts the whole generate
/// operation; partial uploads are not cleaned up.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The storage service rejected the upload.
    #[error("storage rejected upload of '{object_name}': {message}")]
    Rejected { object_name: String, message: String },

    /// Network failure reaching storage.
    #[error("storage network error: {0}")]
    Network(String),

    /// The captured payload could not be decoded into image bytes.
    #[error("invalid image payload: {0}")]
    InvalidPayload(String),
}
