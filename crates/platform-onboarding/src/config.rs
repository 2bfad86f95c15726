//! Onboarding configuration.
//!
//! Provides configuration for the tenant API endpoint and the local store
//! that carries the plan selection between onboarding steps. Configuration
//! is loaded from environment variables with defaults for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Configuration for the onboarding flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingConfig {
    /// Tenant API configuration.
    pub tenant_api: ServiceEndpoint,

    /// Request timeout in seconds, enforced by the HTTP client.
    pub timeout_secs: u64,

    /// Directory used by the file-backed store.
    pub storage_dir: PathBuf,
}

impl Default for OnboardingConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            tenant_api: ServiceEndpoint {
                base_url: "http://localhost:8000".to_string(),
                api_key: None,
            },
            timeout_secs: 30,
            storage_dir: PathBuf::from(".onboarding"),
        }
    }
}

impl OnboardingConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TENANT_API_URL`: Tenant API URL (default: http://localhost:8000)
    /// - `TENANT_API_KEY`: Tenant API key
    /// - `TENANT_API_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    /// - `ONBOARDING_STORAGE_DIR`: Local store directory (default: .onboarding)
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();

        let timeout_secs = match std::env::var("TENANT_API_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TENANT_API_TIMEOUT_SECS".to_string(),
                message: format!("expected a number of seconds, got {:?}", raw),
            })?,
            Err(_) => default.timeout_secs,
        };

        Ok(Self {
            tenant_api: ServiceEndpoint {
                base_url: std::env::var("TENANT_API_URL").unwrap_or(default.tenant_api.base_url),
                api_key: std::env::var("TENANT_API_KEY").ok(),
            },
            timeout_secs,
            storage_dir: std::env::var("ONBOARDING_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.storage_dir),
        })
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate that all required configuration is present for production.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.tenant_api.api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("TENANT_API_KEY".to_string()));
        }
        if !self.tenant_api.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "TENANT_API_URL".to_string(),
                message: "must use https in production".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for a single service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Base URL for the service (e.g., "https://api.example.com").
    pub base_url: String,

    /// API key for service-to-service authentication.
    pub api_key: Option<String>,
}

impl ServiceEndpoint {
    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OnboardingConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.storage_dir, PathBuf::from(".onboarding"));
    }

    #[test]
    fn test_service_endpoint_url() {
        let endpoint = ServiceEndpoint {
            base_url: "https://api.example.com/".to_string(),
            api_key: None,
        };

        assert_eq!(
            endpoint.url("/api/v1/tenants"),
            "https://api.example.com/api/v1/tenants"
        );
        assert_eq!(
            endpoint.url("api/v1/tenants"),
            "https://api.example.com/api/v1/tenants"
        );
    }

    #[test]
    fn test_validate_for_production() {
        let mut config = OnboardingConfig::default();
        assert!(config.validate_for_production().is_err());

        config.tenant_api.api_key = Some("key".to_string());
        assert!(config.validate_for_production().is_err());

        config.tenant_api.base_url = "https://tenants.example.com".to_string();
        assert!(config.validate_for_production().is_ok());
    }
}
