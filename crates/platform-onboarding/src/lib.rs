//! # Platform Onboarding
//!
//! This crate provides the plan assignment step of tenant onboarding for the
//! Relay platform: the plan selection cached between signup steps, and the
//! path that turns it into a tenant plan assignment.
//!
//! ## Overview
//!
//! The platform-onboarding crate handles:
//! - **Cached selection**: The persisted plan/addon/branch snapshot
//! - **Storage**: Key-value persistence (in-memory or file-backed)
//! - **Assignment**: Mapping a cached selection to the tenant API request
//! - **Client**: HTTP client for the tenant service
//! - **Notifications**: User-facing outcome reporting
//! - **Submitter**: Load → transform → submit, with idle/submitting state
//!
//! ## Architecture
//!
//! ```text
//! OnboardingStore ──load──→ CachedPlanData
//!                              └─ transform_plan_data(tenant_id) ─→ AssignPlanRequest
//!                                                                      └─ PlanAssignmentApi
//! PlanAssignmentSubmitter drives the chain and reports through Notifier /
//! ApiErrorReporter.
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use platform_onboarding::{
//!     FileStore, NotifyingErrorReporter, OnboardingConfig, OnboardingStore,
//!     PlanAssignmentSubmitter, TenantApiClient, TracingNotifier,
//! };
//! use std::sync::Arc;
//!
//! async fn submit() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OnboardingConfig::from_env()?;
//!     let store = OnboardingStore::new(Arc::new(FileStore::open(&config.storage_dir)?));
//!     let client = TenantApiClient::new(config.tenant_api.clone(), config.timeout())?;
//!     let notifier = Arc::new(TracingNotifier);
//!
//!     let submitter = PlanAssignmentSubmitter::new(
//!         store,
//!         Arc::new(client),
//!         notifier.clone(),
//!         Arc::new(NotifyingErrorReporter::new(notifier)),
//!     );
//!     submitter.assign_plan_to_tenant().await?;
//!     Ok(())
//! }
//! ```

pub mod assignment;
pub mod cached;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod submitter;

// Re-export main types
pub use assignment::{
    transform_plan_data, AddonAssignment, AssignPlanRequest, BranchAddonAssignment,
};
pub use cached::CachedPlanData;
pub use client::{AssignPlanResponse, PlanAssignmentApi, TenantApiClient};
pub use config::{ConfigError, OnboardingConfig, ServiceEndpoint};
pub use error::{ApiError, StorageError, SubmitError, TransformError};
pub use notify::{
    ApiErrorReporter, MemoryNotifier, Notification, Notifier, NotifyingErrorReporter, Severity,
    TracingNotifier,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, OnboardingStore};
pub use submitter::{PlanAssignmentSubmitter, SubmitState};
