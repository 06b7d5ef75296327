//! Image storage configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Supabase storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Project base URL (e.g. https://xyz.supabase.co)
    pub base_url: Option<String>,

    /// Service key used for uploads
    pub api_key: Option<String>,

    /// Bucket holding captured pages
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Upload timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl StorageConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate storage configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let Some(base_url) = self.base_url.as_ref().filter(|u| !u.is_empty()) else {
            return Err(ValidationError::MissingRequired("STORAGE__BASE_URL"));
        };
        if !self.api_key.as_ref().is_some_and(|k| !k.is_empty()) {
            return Err(ValidationError::MissingRequired("STORAGE__API_KEY"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ValidationError::InvalidStorageUrl);
        }
        if *environment == Environment::Production && !base_url.starts_with("https://") {
            return Err(ValidationError::StorageMustBeHttps);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            bucket: default_bucket(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_bucket() -> String {
    "captures".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> StorageConfig {
        StorageConfig {
            base_url: Some("https://xyz.supabase.co".to_string()),
            api_key: Some("service-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_storage_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.bucket, "captures");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_validation_requires_url_and_key() {
        assert!(StorageConfig::default()
            .validate(&Environment::Development)
            .is_err());
        assert!(configured().validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_production_requires_https() {
        let config = StorageConfig {
            base_url: Some("http://xyz.supabase.co".to_string()),
            ..configured()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert!(matches!(
            config.validate(&Environment::Production),
            Err(ValidationError::StorageMustBeHttps)
        ));
    }

    #[test]
    fn test_malformed_url_rejected() {
        let config = StorageConfig {
            base_url: Some("xyz.supabase.co".to_string()),
            ..configured()
        };
        assert!(matches!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidStorageUrl)
        ));
    }
}
