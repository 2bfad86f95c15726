//! Cached plan selection
//!
//! The snapshot of an in-progress plan/addon/branch selection that is
//! persisted between onboarding steps. It is a versionless JSON document:
//! unknown fields are ignored and optional ones default.

use platform_billing::{
    AddonSelectionManager, BillingCycle, BranchSelection, BranchSelectionManager, Plan,
    SelectedAddon,
};
use serde::{Deserialize, Serialize};

/// Persisted plan selection.
///
/// A document whose plan is missing or null still loads; it is rejected when
/// it is turned into an assignment request.
///
/// # Examples
///
/// ```
/// use platform_billing::{BillingCycle, Plan};
/// use platform_onboarding::CachedPlanData;
/// use rust_decimal::Decimal;
///
/// let plan = Plan::new("growth", "Growth", Decimal::new(100, 0));
/// let cached = CachedPlanData::new(plan, BillingCycle::Yearly, 0);
/// assert_eq!(cached.branch_count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedPlanData {
    /// Plan the tenant picked
    #[serde(default)]
    pub selected_plan: Option<Plan>,

    /// Billing cycle the tenant picked
    #[serde(default)]
    pub billing_cycle: BillingCycle,

    /// Number of branches (at least 1)
    #[serde(default = "default_branch_count")]
    pub branch_count: u32,

    /// Add-ons with their branch configuration
    #[serde(default)]
    pub selected_addons: Vec<SelectedAddon>,

    /// The tenant's own branches, distinct from per-addon branch flags
    #[serde(default)]
    pub branches: Vec<BranchSelection>,
}

fn default_branch_count() -> u32 {
    1
}

impl CachedPlanData {
    /// Create a selection with no add-ons.
    pub fn new(selected_plan: Plan, billing_cycle: BillingCycle, branch_count: u32) -> Self {
        Self {
            selected_plan: Some(selected_plan),
            billing_cycle,
            branch_count: branch_count.max(1),
            selected_addons: Vec::new(),
            branches: Vec::new(),
        }
    }

    /// Snapshot the working selection state when the user confirms.
    pub fn from_selection(
        selected_plan: Plan,
        billing_cycle: BillingCycle,
        branches: &BranchSelectionManager,
        addons: &AddonSelectionManager,
    ) -> Self {
        Self {
            selected_addons: addons.selected_addons().to_vec(),
            ..Self::new(selected_plan, billing_cycle, branches.branch_count())
        }
    }

    /// Attach the tenant's branch list.
    pub fn with_branches(mut self, branches: Vec<BranchSelection>) -> Self {
        self.branches = branches;
        self
    }

    /// Attach add-ons.
    pub fn with_addons(mut self, selected_addons: Vec<SelectedAddon>) -> Self {
        self.selected_addons = selected_addons;
        self
    }

    /// Plan id when a plan with a non-blank id is present.
    pub fn plan_id(&self) -> Option<&str> {
        self.selected_plan
            .as_ref()
            .filter(|plan| plan.has_id())
            .map(|plan| plan.id.as_str())
    }

    /// Branch count with the minimum of one applied.
    pub fn effective_branch_count(&self) -> u32 {
        self.branch_count.max(1)
    }

    /// Rebuild the working selection state from the snapshot.
    pub fn restore(&self) -> (BranchSelectionManager, AddonSelectionManager) {
        (
            BranchSelectionManager::from_cached(self.branch_count),
            AddonSelectionManager::with_selection(self.selected_addons.clone()),
        )
    }
}
