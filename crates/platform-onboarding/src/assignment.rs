//! Plan assignment requests
//!
//! Turns a [`CachedPlanData`] into the request body the tenant API expects.
//! Add-ons are split by scope; branch-scoped ones are grouped per branch and
//! re-indexed from the 0-based indices used in selection state to the 1-based
//! branch ids the backend uses.

use platform_billing::{BillingCycle, PricingScope};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cached::CachedPlanData;
use crate::error::TransformError;

/// Feature level sent for every addon assignment.
pub const DEFAULT_FEATURE_LEVEL: &str = "basic";

/// One addon enabled at some level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddonAssignment {
    /// Catalog identifier of the addon
    pub addon_id: String,

    /// Feature level to enable
    pub feature_level: String,
}

impl AddonAssignment {
    /// Assignment at the default feature level.
    pub fn basic(addon_id: impl Into<String>) -> Self {
        Self {
            addon_id: addon_id.into(),
            feature_level: DEFAULT_FEATURE_LEVEL.to_string(),
        }
    }
}

/// Add-ons enabled for one branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchAddonAssignment {
    /// 1-based branch id
    pub branch_id: u32,

    /// Add-ons for this branch, in order of first appearance
    pub addon_assignments: Vec<AddonAssignment>,
}

/// Request body for assigning a plan to a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignPlanRequest {
    /// Tenant receiving the plan
    pub tenant_id: String,

    /// Catalog id of the plan
    pub plan_id: String,

    /// Billing cycle
    pub billing_cycle: BillingCycle,

    /// Number of branches
    pub branches_count: u32,

    /// Organization-scoped add-ons
    pub organization_addon_assignments: Vec<AddonAssignment>,

    /// Branch-scoped add-ons grouped per branch
    pub branch_addon_assignments: Vec<BranchAddonAssignment>,
}

/// Build the assignment request for a cached selection.
///
/// Fails when the tenant id or the plan id is missing or blank. Branch flags
/// that are unselected, or whose index is not below the branch count, are
/// dropped without error.
///
/// # Examples
///
/// ```
/// use platform_billing::{Addon, BillingCycle, BranchSelection, Plan, SelectedAddon};
/// use platform_onboarding::assignment::transform_plan_data;
/// use platform_onboarding::CachedPlanData;
/// use rust_decimal::Decimal;
///
/// let pos = Addon::branch("pos", "POS", Decimal::new(30, 0));
/// let plan = Plan::new("growth", "Growth", Decimal::new(100, 0));
/// let cached = CachedPlanData::new(plan, BillingCycle::Monthly, 3)
///     .with_addons(vec![SelectedAddon::from_addon(&pos, vec![
///         BranchSelection::new(0).selected(),
///         BranchSelection::new(1),
///         BranchSelection::new(2).selected(),
///     ])]);
///
/// let request = transform_plan_data(&cached, Some("tenant-1")).unwrap();
/// let ids: Vec<u32> = request.branch_addon_assignments.iter().map(|b| b.branch_id).collect();
/// assert_eq!(ids, vec![1, 3]);
/// ```
pub fn transform_plan_data(
    cached: &CachedPlanData,
    tenant_id: Option<&str>,
) -> Result<AssignPlanRequest, TransformError> {
    let tenant_id = tenant_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(TransformError::MissingTenantId)?;

    let plan_id = cached.plan_id().ok_or(TransformError::MissingPlanId)?;

    let branch_count = cached.effective_branch_count();

    let organization_addon_assignments = cached
        .selected_addons
        .iter()
        .filter(|addon| addon.pricing_scope == PricingScope::Organization)
        .map(|addon| AddonAssignment::basic(addon.addon_id.clone()))
        .collect();

    let mut branch_addon_assignments: Vec<BranchAddonAssignment> = Vec::new();
    for addon in cached
        .selected_addons
        .iter()
        .filter(|addon| addon.pricing_scope == PricingScope::Branch)
    {
        for branch in addon.branches.iter() {
            if !branch.is_selected {
                continue;
            }
            if branch.branch_index >= branch_count {
                debug!(
                    addon_id = %addon.addon_id,
                    branch_index = branch.branch_index,
                    branch_count,
                    "Dropping selection for branch beyond current count"
                );
                continue;
            }

            let branch_id = branch.branch_index + 1;
            let assignment = AddonAssignment::basic(addon.addon_id.clone());

            match branch_addon_assignments
                .iter_mut()
                .find(|group| group.branch_id == branch_id)
            {
                Some(group) => group.addon_assignments.push(assignment),
                None => branch_addon_assignments.push(BranchAddonAssignment {
                    branch_id,
                    addon_assignments: vec![assignment],
                }),
            }
        }
    }

    Ok(AssignPlanRequest {
        tenant_id: tenant_id.to_string(),
        plan_id: plan_id.to_string(),
        billing_cycle: cached.billing_cycle,
        branches_count: branch_count,
        organization_addon_assignments,
        branch_addon_assignments,
    })
}
