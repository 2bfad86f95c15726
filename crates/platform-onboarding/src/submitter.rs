//! Plan assignment submission
//!
//! Loads the cached plan selection, turns it into an assignment request and
//! sends it to the tenant API, surfacing the outcome through the notifier.
//!
//! # States
//!
//! ```text
//! Idle ──assign_plan_to_tenant()──→ Submitting ──(any outcome)──→ Idle
//! ```
//!
//! A second call while one is in flight is not rejected and issues a second
//! request; callers disable their trigger while [`SubmitState::Submitting`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::assignment::transform_plan_data;
use crate::cached::CachedPlanData;
use crate::client::{AssignPlanResponse, PlanAssignmentApi};
use crate::error::{ApiError, StorageError, SubmitError, SubmitResult};
use crate::notify::{ApiErrorReporter, Notification, Notifier};
use crate::storage::OnboardingStore;

/// Error set when storage holds no plan selection.
pub const NO_PLAN_DATA_MESSAGE: &str = "No plan data found";

/// Error set when the stored plan selection cannot be read.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse plan data from storage";

/// Error set when the selection lacks the tenant or plan id.
pub const INVALID_PLAN_DATA_MESSAGE: &str = "Invalid plan data";

/// Title used when reporting API failures.
pub const ASSIGN_FAILURE_TITLE: &str = "Failed to assign plan";

/// Submission state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubmitState {
    /// Nothing in flight
    Idle,

    /// An assignment request is in flight
    Submitting,
}

#[derive(Debug)]
struct SubmitterState {
    state: SubmitState,
    error: Option<String>,
}

/// Submits the cached plan selection to the tenant API.
pub struct PlanAssignmentSubmitter {
    store: OnboardingStore,
    api: Arc<dyn PlanAssignmentApi>,
    notifier: Arc<dyn Notifier>,
    reporter: Arc<dyn ApiErrorReporter>,
    state: RwLock<SubmitterState>,
}

impl std::fmt::Debug for PlanAssignmentSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanAssignmentSubmitter")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl PlanAssignmentSubmitter {
    /// Create an idle submitter.
    pub fn new(
        store: OnboardingStore,
        api: Arc<dyn PlanAssignmentApi>,
        notifier: Arc<dyn Notifier>,
        reporter: Arc<dyn ApiErrorReporter>,
    ) -> Self {
        Self {
            store,
            api,
            notifier,
            reporter,
            state: RwLock::new(SubmitterState {
                state: SubmitState::Idle,
                error: None,
            }),
        }
    }

    /// Current state.
    pub async fn state(&self) -> SubmitState {
        self.state.read().await.state
    }

    /// Whether a submission is in flight.
    pub async fn is_submitting(&self) -> bool {
        self.state().await == SubmitState::Submitting
    }

    /// Last error, cleared by the next successful load or submission start.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    async fn set_error(&self, message: impl Into<String>) {
        self.state.write().await.error = Some(message.into());
    }

    async fn set_state(&self, state: SubmitState) {
        self.state.write().await.state = state;
    }

    /// Read the cached plan selection.
    ///
    /// Returns `None` and sets the error when nothing is stored or the
    /// stored value cannot be read; clears the error otherwise.
    pub async fn load_plan_data(&self) -> Option<CachedPlanData> {
        match self.store.read_plan_data() {
            Ok(Some(data)) => {
                self.state.write().await.error = None;
                Some(data)
            }
            Ok(None) => {
                debug!("No cached plan selection");
                self.set_error(NO_PLAN_DATA_MESSAGE).await;
                None
            }
            Err(e) => {
                match &e {
                    StorageError::Serialization(parse) => {
                        error!(error = %parse, "Cached plan selection is malformed")
                    }
                    other => error!(error = %other, "Failed to read cached plan selection"),
                }
                self.set_error(PARSE_FAILURE_MESSAGE).await;
                None
            }
        }
    }

    /// Submit the cached selection to the tenant API.
    ///
    /// On success the cached selection is removed; on any failure it is left
    /// in place for a retry. The submitter is idle again when this returns.
    #[instrument(skip(self))]
    pub async fn assign_plan_to_tenant(&self) -> SubmitResult<AssignPlanResponse> {
        {
            let mut state = self.state.write().await;
            state.state = SubmitState::Submitting;
            state.error = None;
        }

        let result = self.submit().await;

        self.set_state(SubmitState::Idle).await;
        result
    }

    async fn submit(&self) -> SubmitResult<AssignPlanResponse> {
        let Some(plan_data) = self.load_plan_data().await else {
            self.notifier.notify(Notification::error(
                "No plan selected",
                "Please go back and choose a plan before continuing.",
            ));
            return Err(SubmitError::NoPlanData);
        };

        let tenant_id = match self.store.tenant_id() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Failed to read tenant id");
                None
            }
        };

        let request = match transform_plan_data(&plan_data, tenant_id.as_deref()) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Cached plan selection cannot be submitted");
                self.set_error(INVALID_PLAN_DATA_MESSAGE).await;
                self.notifier.notify(Notification::error(
                    INVALID_PLAN_DATA_MESSAGE,
                    "Your plan selection is incomplete. Please select your plan again.",
                ));
                return Err(e.into());
            }
        };

        debug!(
            plan_id = %request.plan_id,
            organization_addons = request.organization_addon_assignments.len(),
            branch_groups = request.branch_addon_assignments.len(),
            "Submitting plan assignment"
        );

        let outcome = match self
            .api
            .assign_plan_to_tenant(&request, &request.tenant_id)
            .await
        {
            Ok(response) if response.success => Ok(response),
            Ok(response) => Err(ApiError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "Plan assignment was not accepted".to_string()),
            )),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(response) => {
                info!(tenant_id = %request.tenant_id, plan_id = %request.plan_id, "Plan assigned");
                if let Err(e) = self.store.clear_plan_data() {
                    warn!(error = %e, "Failed to clear cached plan selection");
                }
                self.notifier.notify(Notification::success(
                    "Plan assigned",
                    response
                        .message
                        .clone()
                        .unwrap_or_else(|| "Your subscription plan is now active.".to_string()),
                ));
                Ok(response)
            }
            Err(e) => {
                self.set_error(e.to_string()).await;
                self.reporter.report(&e, ASSIGN_FAILURE_TITLE);
                Err(e.into())
            }
        }
    }

    /// Record that the plan summary step is done. Never fails.
    pub fn mark_plan_summary_completed(&self) {
        self.store.mark_plan_summary_completed();
    }

    /// Whether the plan summary step is done. Storage failures read as `false`.
    pub fn is_plan_summary_completed(&self) -> bool {
        self.store.is_plan_summary_completed()
    }
}
