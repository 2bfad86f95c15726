//! Plan and addon catalog types
//!
//! This module defines the catalog data a tenant chooses from during
//! onboarding: subscription plans, add-ons, billing cycles and the scope an
//! addon is priced at. Catalog entries are owned by the plan catalog service
//! and are treated as immutable here.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Billing cycle for a subscription.
///
/// Yearly billing applies the plan (or addon) discount percentage on top of
/// twelve monthly payments.
///
/// # Examples
///
/// ```
/// use platform_billing::BillingCycle;
///
/// assert_eq!(BillingCycle::parse("Annual"), Some(BillingCycle::Yearly));
/// assert_eq!(BillingCycle::Monthly.as_str(), "monthly");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    /// Billed every month at the plan's monthly price
    Monthly,

    /// Billed once a year with the annual discount applied
    Yearly,
}

impl BillingCycle {
    /// Parse a billing cycle from its string representation.
    ///
    /// Accepts `monthly`/`month` and `yearly`/`year`/`annual`/`annually`,
    /// case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Some(BillingCycle::Monthly),
            "yearly" | "year" | "annual" | "annually" => Some(BillingCycle::Yearly),
            _ => None,
        }
    }

    /// Get string representation of the billing cycle.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Check if this is the yearly cycle.
    pub fn is_yearly(&self) -> bool {
        matches!(self, BillingCycle::Yearly)
    }
}

impl Default for BillingCycle {
    fn default() -> Self {
        BillingCycle::Monthly
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit an addon is priced at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PricingScope {
    /// Priced once per tenant, independent of the branch count
    Organization,

    /// Priced per branch, with a per-branch selection array
    Branch,
}

impl PricingScope {
    /// Get string representation of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingScope::Organization => "organization",
            PricingScope::Branch => "branch",
        }
    }

    /// Check if this is the branch scope.
    pub fn is_branch(&self) -> bool {
        matches!(self, PricingScope::Branch)
    }
}

impl Default for PricingScope {
    fn default() -> Self {
        PricingScope::Organization
    }
}

/// A subscription plan from the plan catalog.
///
/// The `id` is optional on the wire: a cached selection whose plan lost its
/// identifier still deserializes, and is rejected later when it is turned
/// into an assignment request.
///
/// # Examples
///
/// ```
/// use platform_billing::Plan;
/// use rust_decimal::Decimal;
///
/// let plan = Plan::new("growth", "Growth", Decimal::new(100, 0))
///     .with_annual_discount(Decimal::new(20, 0));
/// assert!(plan.has_id());
/// assert_eq!(plan.included_branches_count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Catalog identifier (empty when missing or null in a cached document)
    #[serde(default, deserialize_with = "deserialize_nullable_id")]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Price per branch per month
    pub monthly_price: Decimal,

    /// Discount applied to yearly billing, 0-100
    #[serde(default)]
    pub annual_discount_percentage: Decimal,

    /// Number of branches bundled with the plan
    #[serde(default = "default_included_branches")]
    pub included_branches_count: u32,
}

fn default_included_branches() -> u32 {
    1
}

fn deserialize_nullable_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Plan {
    /// Create a plan with no annual discount and a single included branch.
    pub fn new(id: impl Into<String>, name: impl Into<String>, monthly_price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            monthly_price,
            annual_discount_percentage: Decimal::ZERO,
            included_branches_count: default_included_branches(),
        }
    }

    /// Set the yearly discount percentage.
    pub fn with_annual_discount(mut self, percentage: Decimal) -> Self {
        self.annual_discount_percentage = percentage;
        self
    }

    /// Set the number of branches bundled with the plan.
    pub fn with_included_branches(mut self, count: u32) -> Self {
        self.included_branches_count = count;
        self
    }

    /// Check if the plan carries a non-blank catalog identifier.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// An addon from the addon catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Addon {
    /// Catalog identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Price per unit per month
    pub monthly_price: Decimal,

    /// Whether the addon is priced per tenant or per branch
    #[serde(default)]
    pub pricing_scope: PricingScope,

    /// Bundled free with the plan
    #[serde(default)]
    pub is_included: bool,
}

impl Addon {
    /// Create an organization-scoped, non-included addon.
    pub fn organization(
        id: impl Into<String>,
        name: impl Into<String>,
        monthly_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            monthly_price,
            pricing_scope: PricingScope::Organization,
            is_included: false,
        }
    }

    /// Create a branch-scoped, non-included addon.
    pub fn branch(id: impl Into<String>, name: impl Into<String>, monthly_price: Decimal) -> Self {
        Self {
            pricing_scope: PricingScope::Branch,
            ..Self::organization(id, name, monthly_price)
        }
    }

    /// Mark the addon as bundled with the plan.
    pub fn included(mut self) -> Self {
        self.is_included = true;
        self
    }
}
