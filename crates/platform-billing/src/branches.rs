//! Branch count and per-branch addon flags
//!
//! The branch count drives the length of every branch-scoped addon's flag
//! array. [`update_addon_branches`] is the single place those arrays are
//! resized.

use tracing::debug;

use crate::addons::AddonSelectionManager;
use crate::catalog::PricingScope;
use crate::selection::{BranchSelection, SelectedAddon};

/// Largest branch count a tenant can configure.
pub const MAX_BRANCH_COUNT: u32 = 10_000;

/// Create `count` unselected entries indexed `0..count`.
pub fn create_branch_selections(count: u32) -> Vec<BranchSelection> {
    (0..count).map(BranchSelection::new).collect()
}

/// Resize every branch-scoped addon's flags to `new_count`.
///
/// Entries at surviving indices keep their selection state; new entries are
/// unselected. Organization-scoped add-ons are left with no branches. Counts
/// above [`MAX_BRANCH_COUNT`] are capped.
pub fn update_addon_branches(addons: Vec<SelectedAddon>, new_count: u32) -> Vec<SelectedAddon> {
    let new_count = new_count.min(MAX_BRANCH_COUNT);
    let target = new_count as usize;

    addons
        .into_iter()
        .map(|mut addon| {
            match addon.pricing_scope {
                PricingScope::Organization => addon.branches.clear(),
                PricingScope::Branch => {
                    addon.branches.truncate(target);
                    let start = addon.branches.len() as u32;
                    addon.branches.extend((start..new_count).map(BranchSelection::new));
                }
            }
            addon
        })
        .collect()
}

/// Owner of the tenant's branch count.
///
/// # Examples
///
/// ```
/// use platform_billing::{Addon, AddonSelectionManager, BranchSelectionManager};
/// use platform_billing::branches::create_branch_selections;
/// use rust_decimal::Decimal;
///
/// let mut branches = BranchSelectionManager::new();
/// let mut addons = AddonSelectionManager::new();
/// let pos = Addon::branch("pos", "POS", Decimal::new(30, 0));
/// addons.handle_addon_selection(&pos, create_branch_selections(branches.branch_count()));
///
/// branches.handle_branch_count_change(3, &mut addons);
/// assert_eq!(addons.get_addon_selection("pos").unwrap().branches.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSelectionManager {
    branch_count: u32,
}

impl Default for BranchSelectionManager {
    fn default() -> Self {
        Self { branch_count: 1 }
    }
}

impl BranchSelectionManager {
    /// Start with a single branch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a previously persisted branch count.
    pub fn from_cached(branch_count: u32) -> Self {
        Self {
            branch_count: branch_count.clamp(1, MAX_BRANCH_COUNT),
        }
    }

    /// Current branch count (always at least 1).
    pub fn branch_count(&self) -> u32 {
        self.branch_count
    }

    /// Apply a branch count entered by the user.
    ///
    /// Values are clamped to `1..=MAX_BRANCH_COUNT`. The addon selection is
    /// resized to the new count. Returns the count actually applied.
    pub fn handle_branch_count_change(
        &mut self,
        value: i64,
        addons: &mut AddonSelectionManager,
    ) -> u32 {
        let count = value.clamp(1, i64::from(MAX_BRANCH_COUNT)) as u32;

        if count != self.branch_count {
            debug!(from = self.branch_count, to = count, "Branch count changed");
        }
        self.branch_count = count;

        let resized = update_addon_branches(addons.take_selected_addons(), count);
        addons.set_selected_addons(resized);

        count
    }
}
