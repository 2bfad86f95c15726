//! Addon selection state
//!
//! Holds the add-ons a tenant has chosen during onboarding, plus the addon
//! currently open in the configuration modal.

use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::{Addon, PricingScope};
use crate::pricing::calculate_selected_addons_cost;
use crate::selection::{BranchSelection, SelectedAddon};

/// Owner of the addon selection list.
///
/// # Examples
///
/// ```
/// use platform_billing::{Addon, AddonSelectionManager};
/// use rust_decimal::Decimal;
///
/// let mut manager = AddonSelectionManager::new();
/// let reports = Addon::organization("reports", "Reports", Decimal::new(50, 0));
///
/// manager.open_addon_modal(reports.clone());
/// manager.handle_addon_selection(&reports, Vec::new());
///
/// assert!(manager.is_addon_selected("reports"));
/// assert!(!manager.is_modal_open());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AddonSelectionManager {
    selected_addons: Vec<SelectedAddon>,
    current_addon: Option<Addon>,
    modal_open: bool,
}

impl AddonSelectionManager {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a selection, e.g. from cached plan data.
    pub fn with_selection(selected_addons: Vec<SelectedAddon>) -> Self {
        Self {
            selected_addons,
            ..Self::default()
        }
    }

    /// Open the configuration modal for an addon.
    pub fn open_addon_modal(&mut self, addon: Addon) {
        self.current_addon = Some(addon);
        self.modal_open = true;
    }

    /// Close the configuration modal and forget the current addon.
    pub fn close_addon_modal(&mut self) {
        self.modal_open = false;
        self.current_addon = None;
    }

    /// Whether the configuration modal is visible.
    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Addon currently being configured.
    pub fn current_addon(&self) -> Option<&Addon> {
        self.current_addon.as_ref()
    }

    /// Record the tenant's choice for an addon and close the modal.
    ///
    /// An existing entry with the same addon id is replaced in place,
    /// otherwise the snapshot is appended.
    pub fn handle_addon_selection(
        &mut self,
        addon: &Addon,
        branch_selections: Vec<BranchSelection>,
    ) {
        let snapshot = SelectedAddon::from_addon(addon, branch_selections);

        match self
            .selected_addons
            .iter_mut()
            .find(|existing| existing.addon_id == snapshot.addon_id)
        {
            Some(existing) => {
                debug!(addon_id = %snapshot.addon_id, "Replacing addon selection");
                *existing = snapshot;
            }
            None => {
                debug!(addon_id = %snapshot.addon_id, "Adding addon selection");
                self.selected_addons.push(snapshot);
            }
        }

        self.close_addon_modal();
    }

    /// Drop an addon from the selection.
    pub fn remove_addon(&mut self, addon_id: &str) {
        self.selected_addons.retain(|addon| addon.addon_id != addon_id);
    }

    /// Whether the addon counts as selected.
    ///
    /// Organization-scoped entries are selected by existing; branch-scoped
    /// entries need at least one selected branch.
    pub fn is_addon_selected(&self, addon_id: &str) -> bool {
        self.selected_addons.iter().any(|addon| {
            addon.addon_id == addon_id
                && match addon.pricing_scope {
                    PricingScope::Organization => true,
                    PricingScope::Branch => addon.has_selected_branch(),
                }
        })
    }

    /// Look up the selection entry for an addon.
    pub fn get_addon_selection(&self, addon_id: &str) -> Option<&SelectedAddon> {
        self.selected_addons
            .iter()
            .find(|addon| addon.addon_id == addon_id)
    }

    /// Monthly cost of the current selection, without cycle rules.
    pub fn get_total_addon_cost(&self) -> Decimal {
        calculate_selected_addons_cost(&self.selected_addons)
    }

    /// The current selection.
    pub fn selected_addons(&self) -> &[SelectedAddon] {
        &self.selected_addons
    }

    /// Replace the whole selection.
    pub fn set_selected_addons(&mut self, selected_addons: Vec<SelectedAddon>) {
        self.selected_addons = selected_addons;
    }

    /// Take the selection out, leaving it empty.
    pub fn take_selected_addons(&mut self) -> Vec<SelectedAddon> {
        std::mem::take(&mut self.selected_addons)
    }
}
