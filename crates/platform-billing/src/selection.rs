//! Selection value objects
//!
//! Snapshots of what a tenant has picked during onboarding. A
//! [`SelectedAddon`] owns its own per-branch flag array, so the whole
//! addons × branches matrix is a plain list of values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Addon, PricingScope};

/// Selection flag for one branch.
///
/// Branch indices are 0-based everywhere in selection state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchSelection {
    /// 0-based position of the branch
    pub branch_index: u32,

    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,

    /// Whether the addon is enabled for this branch
    #[serde(default)]
    pub is_selected: bool,
}

impl BranchSelection {
    /// Create an unselected entry for the given index.
    pub fn new(branch_index: u32) -> Self {
        Self {
            branch_index,
            branch_name: None,
            is_selected: false,
        }
    }

    /// Mark the branch as selected.
    pub fn selected(mut self) -> Self {
        self.is_selected = true;
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.branch_name = Some(name.into());
        self
    }
}

/// An addon the tenant has chosen, with its branch configuration.
///
/// `addon_price` is a snapshot of the catalog monthly price at the time of
/// selection. Organization-scoped entries always carry an empty `branches`
/// list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedAddon {
    /// Catalog identifier of the addon
    pub addon_id: String,

    /// Display name
    #[serde(default)]
    pub addon_name: String,

    /// Monthly price snapshot
    pub addon_price: Decimal,

    /// Scope the addon is priced at
    #[serde(default)]
    pub pricing_scope: PricingScope,

    /// Per-branch flags (empty for organization scope)
    #[serde(default)]
    pub branches: Vec<BranchSelection>,

    /// Bundled free with the plan
    #[serde(default)]
    pub is_included: bool,
}

impl SelectedAddon {
    /// Snapshot a catalog addon with the given branch flags.
    ///
    /// Organization-scoped addons drop whatever branch flags were passed.
    pub fn from_addon(addon: &Addon, branches: Vec<BranchSelection>) -> Self {
        let branches = match addon.pricing_scope {
            PricingScope::Organization => Vec::new(),
            PricingScope::Branch => branches,
        };

        Self {
            addon_id: addon.id.clone(),
            addon_name: addon.name.clone(),
            addon_price: addon.monthly_price,
            pricing_scope: addon.pricing_scope,
            branches,
            is_included: addon.is_included,
        }
    }

    /// Number of branches with the addon enabled.
    pub fn selected_branch_count(&self) -> usize {
        self.branches.iter().filter(|b| b.is_selected).count()
    }

    /// Check if any branch has the addon enabled.
    pub fn has_selected_branch(&self) -> bool {
        self.branches.iter().any(|b| b.is_selected)
    }
}
