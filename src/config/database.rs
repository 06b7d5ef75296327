//! Database configuration (PostgreSQL, preference record)

use serde::Deserialize;

use super::error::ValidationError;

/// PostgreSQL configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: String,

    /// Maximum pool connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum pool connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_postgres_url() {
        let config = DatabaseConfig {
            url: "postgresql://user@localhost/pairings".to_string(),
            max_connections: 10,
            min_connections: 1,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_postgres_url_rejected() {
        let config = DatabaseConfig {
            url: "mysql://localhost/db".to_string(),
            max_connections: 10,
            min_connections: 1,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_pool_bounds_rejected() {
        let config = DatabaseConfig {
            url: "postgres://localhost/db".to_string(),
            max_connections: 2,
            min_connections: 5,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPoolSize)
        ));
    }
}
