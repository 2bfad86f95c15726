//! Error types for plan assignment
//!
//! This module defines the errors that can occur while reading the cached
//! plan selection, building the assignment request, and calling the tenant
//! API.

use thiserror::Error;

/// Persisted storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store cannot be used right now
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Reasons a cached selection cannot become an assignment request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// No tenant id has been stored yet
    #[error("Missing tenant id")]
    MissingTenantId,

    /// The selected plan has no catalog id
    #[error("Selected plan has no id")]
    MissingPlanId,
}

/// Tenant API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Invalid response from the API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Authentication failed
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// API answered but did not accept the assignment
    #[error("Plan assignment rejected: {0}")]
    Rejected(String),
}

/// Result type for tenant API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Plan assignment submission errors.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Nothing usable in storage
    #[error("No plan data found")]
    NoPlanData,

    /// Cached selection is missing required identifiers
    #[error("Invalid plan data: {0}")]
    InvalidPlanData(#[from] TransformError),

    /// Transport or backend failure
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for submissions.
pub type SubmitResult<T> = Result<T, SubmitError>;

impl SubmitError {
    /// Check if the failure came from the backend rather than local state.
    pub fn is_remote(&self) -> bool {
        matches!(self, SubmitError::Api(_))
    }

    /// Get error code for API responses and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            SubmitError::NoPlanData => "NO_PLAN_DATA",
            SubmitError::InvalidPlanData(TransformError::MissingTenantId) => "MISSING_TENANT_ID",
            SubmitError::InvalidPlanData(TransformError::MissingPlanId) => "MISSING_PLAN_ID",
            SubmitError::Api(ApiError::RequestFailed(_)) => "REQUEST_FAILED",
            SubmitError::Api(ApiError::ApiError { .. }) => "API_ERROR",
            SubmitError::Api(ApiError::InvalidResponse(_)) => "INVALID_RESPONSE",
            SubmitError::Api(ApiError::AuthenticationFailed) => "AUTHENTICATION_FAILED",
            SubmitError::Api(ApiError::Rejected(_)) => "ASSIGNMENT_REJECTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SubmitError::NoPlanData.error_code(), "NO_PLAN_DATA");
        assert_eq!(
            SubmitError::from(TransformError::MissingPlanId).error_code(),
            "MISSING_PLAN_ID"
        );
        assert_eq!(
            SubmitError::from(ApiError::Rejected("plan archived".to_string())).error_code(),
            "ASSIGNMENT_REJECTED"
        );
    }

    #[test]
    fn test_is_remote() {
        assert!(!SubmitError::NoPlanData.is_remote());
        assert!(SubmitError::from(ApiError::AuthenticationFailed).is_remote());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(SubmitError::NoPlanData.to_string(), "No plan data found");
        assert_eq!(
            SubmitError::from(TransformError::MissingTenantId).to_string(),
            "Invalid plan data: Missing tenant id"
        );
        assert_eq!(
            ApiError::ApiError {
                status: 422,
                message: "bad plan".to_string()
            }
            .to_string(),
            "API error (422): bad plan"
        );
    }
}
