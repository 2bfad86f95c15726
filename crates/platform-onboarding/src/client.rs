//! Tenant API client.
//!
//! HTTP client for the tenant service endpoint that assigns a subscription
//! plan to a tenant. The submitter depends on the [`PlanAssignmentApi`]
//! trait; [`TenantApiClient`] is the reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use crate::assignment::AssignPlanRequest;
use crate::config::ServiceEndpoint;
use crate::error::{ApiError, ApiResult};

/// Response from the plan assignment endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignPlanResponse {
    /// Whether the assignment was accepted.
    pub success: bool,

    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Assignment details, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// The plan assignment endpoint.
#[async_trait]
pub trait PlanAssignmentApi: Send + Sync {
    /// Assign the plan described by `request` to `tenant_id`.
    async fn assign_plan_to_tenant(
        &self,
        request: &AssignPlanRequest,
        tenant_id: &str,
    ) -> ApiResult<AssignPlanResponse>;
}

/// Tenant service client.
#[derive(Clone)]
pub struct TenantApiClient {
    /// HTTP client instance.
    client: Client,

    /// Service endpoint configuration.
    endpoint: ServiceEndpoint,
}

impl TenantApiClient {
    /// Create a new tenant API client.
    ///
    /// The timeout applies to each request; there are no retries.
    pub fn new(endpoint: ServiceEndpoint, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Path of the assignment endpoint for a tenant.
    pub fn assignment_path(tenant_id: &str) -> String {
        format!("/api/v1/tenants/{}/plan-assignment", tenant_id)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T>(&self, response: reqwest::Response) -> ApiResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            error!("Tenant API authentication failed");
            return Err(ApiError::AuthenticationFailed);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Tenant API error ({}): {}", status.as_u16(), message);
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PlanAssignmentApi for TenantApiClient {
    #[instrument(skip(self, request), fields(plan_id = %request.plan_id))]
    async fn assign_plan_to_tenant(
        &self,
        request: &AssignPlanRequest,
        tenant_id: &str,
    ) -> ApiResult<AssignPlanResponse> {
        let request_id = Uuid::now_v7();
        debug!(%request_id, "Assigning plan to tenant {}", tenant_id);

        let url = self.endpoint.url(&Self::assignment_path(tenant_id));
        let mut http_request = self
            .client
            .post(&url)
            .header("X-Request-Id", request_id.to_string())
            .json(request);

        if let Some(ref api_key) = self.endpoint.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = http_request.send().await?;
        self.handle_response(response).await
    }
}
