//! # Platform Billing
//!
//! This crate provides subscription plan and addon pricing for the Relay
//! platform onboarding flow.
//!
//! ## Overview
//!
//! The platform-billing crate handles:
//! - **Catalog**: Plans, add-ons, billing cycles and pricing scopes
//! - **Pricing**: Plan, addon and total prices, discounts and savings
//! - **Labels**: Display strings for prices and billing cycles
//! - **Branches**: Branch count and per-branch addon flags
//! - **Addons**: The tenant's addon selection
//!
//! ## Architecture
//!
//! ```text
//! BranchSelectionManager (branch_count)
//!   └─ resizes ─→ AddonSelectionManager
//!                   └─ SelectedAddon
//!                         └─ BranchSelection (one per branch)
//!
//! Plan + [SelectedAddon] + BillingCycle + branch_count
//!   └─ pricing ─→ PricingSummary
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platform_billing::{Addon, AddonSelectionManager, BillingCycle, Plan, PricingSummary};
//! use rust_decimal::Decimal;
//!
//! let plan = Plan::new("growth", "Growth", Decimal::new(100, 0))
//!     .with_annual_discount(Decimal::new(20, 0));
//!
//! let mut addons = AddonSelectionManager::new();
//! addons.handle_addon_selection(
//!     &Addon::organization("reports", "Reports", Decimal::new(50, 0)),
//!     Vec::new(),
//! );
//!
//! let summary = PricingSummary::compute(
//!     &plan,
//!     addons.selected_addons(),
//!     BillingCycle::Monthly,
//!     1,
//!     Decimal::ZERO,
//! );
//! assert_eq!(summary.total_price, Decimal::new(150, 0));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support (enabled by default)

pub mod addons;
pub mod branches;
pub mod catalog;
pub mod labels;
pub mod pricing;
pub mod selection;

// Re-export main types for convenience
pub use addons::AddonSelectionManager;
pub use branches::{BranchSelectionManager, MAX_BRANCH_COUNT};
pub use catalog::{Addon, BillingCycle, Plan, PricingScope};
pub use labels::LabelOptions;
pub use pricing::{PricedAddon, PricingSummary, BRANCH_MULTIPLIER_CEILING};
pub use selection::{BranchSelection, SelectedAddon};
