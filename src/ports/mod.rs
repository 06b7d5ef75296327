//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! - `PairingProvider` - the multimodal generative model (generate, refine)
//! - `ImageStorage` - stable URL issuance for captured pages
//! - `PreferenceStore` - the single per-user preference record

mod image_storage;
mod pairing_provider;
mod preference_store;

pub use image_storage::{ImageStorage, StorageError, UploadedImage};
pub use pairing_provider::{
    ImageSet, PairingProvider, PairingRequest, ProviderError, RefinementRequest,
};
pub use preference_store::{PreferenceStore, PreferenceStoreError};
