//! Plan and addon pricing
//!
//! Pure functions computing what a tenant pays for a plan plus a set of
//! add-ons, for a billing cycle and a branch count. Nothing here holds
//! state, so every function is safe to call on each render.
//!
//! # Rounding
//!
//! Every exported function returning an amount rounds it to 2 decimal places
//! (midpoint away from zero) at the point of return. Intermediate products
//! are not rounded. Arithmetic saturates at the bounds of [`Decimal`]
//! instead of panicking.
//!
//! # Branch multiplier
//!
//! Branch-scoped add-ons are multiplied by
//! `max(branch_count, BRANCH_MULTIPLIER_CEILING)`, so below the ceiling they
//! are priced as if the tenant had exactly that many branches.
//! [`calculate_monthly_savings`] builds its monthly baseline with the raw
//! branch count instead, and can therefore return a negative amount for
//! small tenants. Both behaviours are relied upon by existing billing
//! screens and are kept as-is.
//!
//! # Examples
//!
//! ```
//! use platform_billing::pricing::{calculate_discounted_price, calculate_plan_price};
//! use platform_billing::{BillingCycle, Plan};
//! use rust_decimal::Decimal;
//!
//! let plan = Plan::new("growth", "Growth", Decimal::new(100, 0))
//!     .with_annual_discount(Decimal::new(20, 0));
//!
//! assert_eq!(calculate_plan_price(&plan, BillingCycle::Yearly, 1), Decimal::new(96000, 2));
//! assert_eq!(calculate_discounted_price(&plan, BillingCycle::Yearly, 1), Decimal::new(24000, 2));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{Addon, BillingCycle, Plan, PricingScope};
use crate::selection::SelectedAddon;

/// Branch count that branch-scoped add-on pricing never goes below.
pub const BRANCH_MULTIPLIER_CEILING: u32 = 10;

const MONTHS_PER_YEAR: u32 = 12;

/// Anything that can be priced as an addon.
///
/// Implemented for catalog [`Addon`]s and for [`SelectedAddon`] snapshots so
/// the calculator works on either.
pub trait PricedAddon {
    /// Monthly price of one unit.
    fn monthly_price(&self) -> Decimal;

    /// Scope the addon is priced at.
    fn pricing_scope(&self) -> PricingScope;

    /// Whether the addon is bundled free with the plan.
    fn is_included(&self) -> bool;
}

impl PricedAddon for Addon {
    fn monthly_price(&self) -> Decimal {
        self.monthly_price
    }

    fn pricing_scope(&self) -> PricingScope {
        self.pricing_scope
    }

    fn is_included(&self) -> bool {
        self.is_included
    }
}

impl PricedAddon for SelectedAddon {
    fn monthly_price(&self) -> Decimal {
        self.addon_price
    }

    fn pricing_scope(&self) -> PricingScope {
        self.pricing_scope
    }

    fn is_included(&self) -> bool {
        self.is_included
    }
}

/// Round an amount to whole cents.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a branch count to the minimum of one branch.
pub fn effective_branch_count(branch_count: u32) -> u32 {
    branch_count.max(1)
}

/// Multiplier applied to branch-scoped addon prices.
pub fn branch_multiplier(branch_count: u32) -> u32 {
    effective_branch_count(branch_count).max(BRANCH_MULTIPLIER_CEILING)
}

fn discount_factor(percentage: Decimal) -> Decimal {
    Decimal::ONE - percentage / Decimal::ONE_HUNDRED
}

/// Twelve months of `monthly_amount` with the discount applied. Unrounded.
fn yearly_amount(monthly_amount: Decimal, discount_percentage: Decimal) -> Decimal {
    monthly_amount
        .saturating_mul(Decimal::from(MONTHS_PER_YEAR))
        .saturating_mul(discount_factor(discount_percentage))
}

fn unit_price(
    monthly_price: Decimal,
    cycle: BillingCycle,
    discount_percentage: Decimal,
) -> Decimal {
    match cycle {
        BillingCycle::Monthly => monthly_price,
        BillingCycle::Yearly => yearly_amount(monthly_price, discount_percentage),
    }
}

/// Price of the plan for the given cycle and branch count.
///
/// Monthly: `monthly_price × branches`. Yearly: `monthly_price × branches ×
/// 12 × (1 − discount/100)`.
pub fn calculate_plan_price(plan: &Plan, cycle: BillingCycle, branch_count: u32) -> Decimal {
    let monthly = plan
        .monthly_price
        .saturating_mul(Decimal::from(effective_branch_count(branch_count)));
    round_currency(unit_price(monthly, cycle, plan.annual_discount_percentage))
}

/// Amount saved on the plan by paying yearly.
///
/// For the monthly cycle there is no saving and the monthly plan price is
/// returned unchanged.
pub fn calculate_discounted_price(plan: &Plan, cycle: BillingCycle, branch_count: u32) -> Decimal {
    match cycle {
        BillingCycle::Monthly => calculate_plan_price(plan, cycle, branch_count),
        BillingCycle::Yearly => {
            let undiscounted = plan
                .monthly_price
                .saturating_mul(Decimal::from(effective_branch_count(branch_count)))
                .saturating_mul(Decimal::from(MONTHS_PER_YEAR));
            round_currency(
                undiscounted.saturating_sub(calculate_plan_price(plan, cycle, branch_count)),
            )
        }
    }
}

/// Price of a single addon for the given cycle and branch count.
///
/// Included add-ons are always free. Organization-scoped add-ons cost one
/// unit; branch-scoped add-ons cost one unit per [`branch_multiplier`].
pub fn calculate_addon_price<A>(
    addon: &A,
    cycle: BillingCycle,
    branch_count: u32,
    addon_discount_percentage: Decimal,
) -> Decimal
where
    A: PricedAddon + ?Sized,
{
    if addon.is_included() {
        return Decimal::ZERO;
    }

    let unit = unit_price(addon.monthly_price(), cycle, addon_discount_percentage);
    match addon.pricing_scope() {
        PricingScope::Organization => round_currency(unit),
        PricingScope::Branch => {
            round_currency(unit.saturating_mul(Decimal::from(branch_multiplier(branch_count))))
        }
    }
}

fn sum_scope<A: PricedAddon>(
    addons: &[A],
    scope: Option<PricingScope>,
    cycle: BillingCycle,
    branch_count: u32,
    addon_discount_percentage: Decimal,
) -> Decimal {
    let total = addons
        .iter()
        .filter(|addon| scope.map_or(true, |s| addon.pricing_scope() == s))
        .map(|addon| calculate_addon_price(addon, cycle, branch_count, addon_discount_percentage))
        .fold(Decimal::ZERO, Decimal::saturating_add);
    round_currency(total)
}

/// Total for the organization-scoped add-ons.
pub fn calculate_organization_addons_price<A: PricedAddon>(
    addons: &[A],
    cycle: BillingCycle,
    branch_count: u32,
    addon_discount_percentage: Decimal,
) -> Decimal {
    sum_scope(
        addons,
        Some(PricingScope::Organization),
        cycle,
        branch_count,
        addon_discount_percentage,
    )
}

/// Total for the branch-scoped add-ons, using the ceiling multiplier.
pub fn calculate_branch_addons_price<A: PricedAddon>(
    addons: &[A],
    cycle: BillingCycle,
    branch_count: u32,
    addon_discount_percentage: Decimal,
) -> Decimal {
    sum_scope(
        addons,
        Some(PricingScope::Branch),
        cycle,
        branch_count,
        addon_discount_percentage,
    )
}

/// Total for all add-ons regardless of scope.
pub fn calculate_total_addons_price<A: PricedAddon>(
    addons: &[A],
    cycle: BillingCycle,
    branch_count: u32,
    addon_discount_percentage: Decimal,
) -> Decimal {
    sum_scope(addons, None, cycle, branch_count, addon_discount_percentage)
}

/// Plan price plus all add-ons.
pub fn calculate_total_price<A: PricedAddon>(
    plan: &Plan,
    addons: &[A],
    cycle: BillingCycle,
    branch_count: u32,
    addon_discount_percentage: Decimal,
) -> Decimal {
    let addons_price =
        calculate_total_addons_price(addons, cycle, branch_count, addon_discount_percentage);
    round_currency(calculate_plan_price(plan, cycle, branch_count).saturating_add(addons_price))
}

/// Amount saved by paying yearly instead of twelve monthly payments.
///
/// Zero for the monthly cycle. The monthly baseline counts organization
/// add-ons once and branch add-ons once per branch (raw branch count), while
/// the yearly total uses [`branch_multiplier`]; the result may be negative.
pub fn calculate_monthly_savings<A: PricedAddon>(
    plan: &Plan,
    addons: &[A],
    cycle: BillingCycle,
    branch_count: u32,
    addon_discount_percentage: Decimal,
) -> Decimal {
    if cycle == BillingCycle::Monthly {
        return Decimal::ZERO;
    }

    let branches = Decimal::from(effective_branch_count(branch_count));
    let addons_monthly = addons
        .iter()
        .filter(|addon| !addon.is_included())
        .map(|addon| match addon.pricing_scope() {
            PricingScope::Organization => addon.monthly_price(),
            PricingScope::Branch => addon.monthly_price().saturating_mul(branches),
        })
        .fold(Decimal::ZERO, Decimal::saturating_add);

    let baseline = plan
        .monthly_price
        .saturating_mul(branches)
        .saturating_add(addons_monthly)
        .saturating_mul(Decimal::from(MONTHS_PER_YEAR));
    let actual =
        calculate_total_price(plan, addons, cycle, branch_count, addon_discount_percentage);

    round_currency(baseline.saturating_sub(actual))
}

/// Price of a standalone addon with no scope or branch concept.
///
/// Non-positive prices yield zero.
pub fn calculate_single_addon_price(
    monthly_price: Decimal,
    cycle: BillingCycle,
    discount_percentage: Decimal,
) -> Decimal {
    if monthly_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    round_currency(unit_price(monthly_price, cycle, discount_percentage))
}

/// Monthly cost of a selection, without cycle or multiplier rules.
///
/// Organization add-ons count once, branch add-ons once per selected branch,
/// included add-ons not at all.
pub fn calculate_selected_addons_cost(addons: &[SelectedAddon]) -> Decimal {
    let total = addons
        .iter()
        .filter(|addon| !addon.is_included)
        .map(|addon| match addon.pricing_scope {
            PricingScope::Organization => addon.addon_price,
            PricingScope::Branch => addon
                .addon_price
                .saturating_mul(Decimal::from(addon.selected_branch_count() as u64)),
        })
        .fold(Decimal::ZERO, Decimal::saturating_add);
    round_currency(total)
}

/// Every figure a plan summary screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSummary {
    /// Cycle the figures are for
    pub billing_cycle: BillingCycle,

    /// Branch count the figures are for (clamped)
    pub branch_count: u32,

    /// Plan price
    pub plan_price: Decimal,

    /// Saving on the plan alone (zero for monthly)
    pub plan_discount: Decimal,

    /// Organization-scoped add-ons
    pub organization_addons_price: Decimal,

    /// Branch-scoped add-ons
    pub branch_addons_price: Decimal,

    /// All add-ons
    pub total_addons_price: Decimal,

    /// Plan plus add-ons
    pub total_price: Decimal,

    /// Saving versus twelve monthly payments (zero for monthly)
    pub monthly_savings: Decimal,
}

impl PricingSummary {
    /// Compute the summary for a plan and a set of add-ons.
    pub fn compute<A: PricedAddon>(
        plan: &Plan,
        addons: &[A],
        cycle: BillingCycle,
        branch_count: u32,
        addon_discount_percentage: Decimal,
    ) -> Self {
        let plan_discount = match cycle {
            BillingCycle::Monthly => Decimal::ZERO,
            BillingCycle::Yearly => calculate_discounted_price(plan, cycle, branch_count),
        };

        Self {
            billing_cycle: cycle,
            branch_count: effective_branch_count(branch_count),
            plan_price: calculate_plan_price(plan, cycle, branch_count),
            plan_discount,
            organization_addons_price: calculate_organization_addons_price(
                addons,
                cycle,
                branch_count,
                addon_discount_percentage,
            ),
            branch_addons_price: calculate_branch_addons_price(
                addons,
                cycle,
                branch_count,
                addon_discount_percentage,
            ),
            total_addons_price: calculate_total_addons_price(
                addons,
                cycle,
                branch_count,
                addon_discount_percentage,
            ),
            total_price: calculate_total_price(
                plan,
                addons,
                cycle,
                branch_count,
                addon_discount_percentage,
            ),
            monthly_savings: calculate_monthly_savings(
                plan,
                addons,
                cycle,
                branch_count,
                addon_discount_percentage,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::BranchSelection;

    fn dec(units: i64) -> Decimal {
        Decimal::from(units)
    }

    fn cents(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn growth_plan() -> Plan {
        Plan::new("growth", "Growth", dec(100)).with_annual_discount(dec(20))
    }

    #[test]
    fn test_monthly_plan_price_scales_with_branches() {
        let plan = growth_plan();
        for n in 1..=6 {
            assert_eq!(
                calculate_plan_price(&plan, BillingCycle::Monthly, n),
                dec(100) * Decimal::from(n)
            );
        }
    }

    #[test]
    fn test_yearly_plan_price_applies_discount() {
        let plan = growth_plan();
        assert_eq!(calculate_plan_price(&plan, BillingCycle::Yearly, 1), cents(96000));
        assert_eq!(calculate_plan_price(&plan, BillingCycle::Yearly, 3), cents(288000));
    }

    #[test]
    fn test_plan_price_rounds_to_cents() {
        let plan = Plan::new("odd", "Odd", cents(3333)).with_annual_discount(dec(15));
        // 33.33 * 12 * 0.85 = 339.966
        assert_eq!(calculate_plan_price(&plan, BillingCycle::Yearly, 1), cents(33997));

        let midpoint = Plan::new("mid", "Mid", Decimal::new(10005, 3));
        assert_eq!(calculate_plan_price(&midpoint, BillingCycle::Monthly, 1), cents(1001));
    }

    #[test]
    fn test_zero_branches_clamped_to_one() {
        let plan = growth_plan();
        assert_eq!(calculate_plan_price(&plan, BillingCycle::Monthly, 0), dec(100));
    }

    #[test]
    fn test_discounted_price() {
        let plan = growth_plan();
        assert_eq!(calculate_discounted_price(&plan, BillingCycle::Yearly, 1), cents(24000));
        assert_eq!(calculate_discounted_price(&plan, BillingCycle::Yearly, 2), cents(48000));
        // Monthly has no saving concept and returns the plan price.
        assert_eq!(calculate_discounted_price(&plan, BillingCycle::Monthly, 2), dec(200));
    }

    #[test]
    fn test_included_addon_is_free() {
        let org = Addon::organization("reports", "Reports", dec(50)).included();
        let branch = Addon::branch("pos", "POS", dec(30)).included();

        for cycle in [BillingCycle::Monthly, BillingCycle::Yearly] {
            for n in [1, 4, 25] {
                assert_eq!(calculate_addon_price(&org, cycle, n, dec(10)), Decimal::ZERO);
                assert_eq!(calculate_addon_price(&branch, cycle, n, dec(10)), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_organization_addon_independent_of_branches() {
        let addon = Addon::organization("reports", "Reports", dec(50));
        let one = calculate_addon_price(&addon, BillingCycle::Monthly, 1, Decimal::ZERO);
        let many = calculate_addon_price(&addon, BillingCycle::Monthly, 40, Decimal::ZERO);

        assert_eq!(one, dec(50));
        assert_eq!(one, many);
        assert_eq!(
            calculate_addon_price(&addon, BillingCycle::Yearly, 3, dec(10)),
            cents(54000)
        );
    }

    #[test]
    fn test_branch_addon_uses_ceiling_multiplier() {
        let addon = Addon::branch("pos", "POS", dec(30));

        // Below the ceiling the multiplier is pinned to the ceiling.
        assert_eq!(
            calculate_addon_price(&addon, BillingCycle::Monthly, 2, Decimal::ZERO),
            dec(30) * Decimal::from(BRANCH_MULTIPLIER_CEILING)
        );
        // Above it the raw branch count wins.
        let above = BRANCH_MULTIPLIER_CEILING + 5;
        assert_eq!(
            calculate_addon_price(&addon, BillingCycle::Monthly, above, Decimal::ZERO),
            dec(30) * Decimal::from(above)
        );
        assert_ne!(
            calculate_addon_price(&addon, BillingCycle::Monthly, above, Decimal::ZERO),
            calculate_addon_price(&addon, BillingCycle::Monthly, above + 1, Decimal::ZERO)
        );
    }

    #[test]
    fn test_selected_addon_priced_like_catalog_addon() {
        let addon = Addon::branch("pos", "POS", dec(30));
        let selected = SelectedAddon::from_addon(&addon, vec![BranchSelection::new(0).selected()]);

        assert_eq!(
            calculate_addon_price(&addon, BillingCycle::Yearly, 3, dec(5)),
            calculate_addon_price(&selected, BillingCycle::Yearly, 3, dec(5))
        );
    }

    #[test]
    fn test_scope_totals_monthly_two_branches() {
        let addons = vec![
            Addon::organization("reports", "Reports", dec(50)),
            Addon::branch("pos", "POS", dec(30)),
        ];

        let org =
            calculate_organization_addons_price(&addons, BillingCycle::Monthly, 2, Decimal::ZERO);
        let branch =
            calculate_branch_addons_price(&addons, BillingCycle::Monthly, 2, Decimal::ZERO);
        let total = calculate_total_addons_price(&addons, BillingCycle::Monthly, 2, Decimal::ZERO);

        assert_eq!(org, cents(5000));
        assert_ne!(branch, dec(60));
        assert_eq!(branch, dec(30) * Decimal::from(BRANCH_MULTIPLIER_CEILING));
        assert_eq!(total, org + branch);
    }

    #[test]
    fn test_total_price() {
        let plan = growth_plan();
        let addons = vec![Addon::organization("reports", "Reports", dec(50))];

        assert_eq!(
            calculate_total_price(&plan, &addons, BillingCycle::Monthly, 1, Decimal::ZERO),
            dec(150)
        );
        assert_eq!(
            calculate_total_price(&plan, &addons, BillingCycle::Yearly, 1, dec(20)),
            cents(144000)
        );
    }

    #[test]
    fn test_monthly_savings() {
        let plan = growth_plan();
        let none: Vec<Addon> = Vec::new();

        assert_eq!(
            calculate_monthly_savings(&plan, &none, BillingCycle::Monthly, 1, Decimal::ZERO),
            Decimal::ZERO
        );
        assert_eq!(
            calculate_monthly_savings(&plan, &none, BillingCycle::Yearly, 1, Decimal::ZERO),
            cents(24000)
        );

        let org = vec![Addon::organization("reports", "Reports", dec(50))];
        // baseline (100 + 50) * 12 = 1800, actual 960 + 480 = 1440
        assert_eq!(
            calculate_monthly_savings(&plan, &org, BillingCycle::Yearly, 1, dec(20)),
            cents(36000)
        );
    }

    #[test]
    fn test_monthly_savings_negative_for_small_branch_counts() {
        let plan = Plan::new("basic", "Basic", dec(10));
        let addons = vec![Addon::branch("pos", "POS", dec(30))];

        // baseline (10*2 + 30*2) * 12 = 960; actual 240 + 30*12*ceiling
        let expected = dec(960) - (dec(240) + dec(360) * Decimal::from(BRANCH_MULTIPLIER_CEILING));
        let savings =
            calculate_monthly_savings(&plan, &addons, BillingCycle::Yearly, 2, Decimal::ZERO);

        assert_eq!(savings, expected);
        assert!(savings < Decimal::ZERO);
    }

    #[test]
    fn test_single_addon_price() {
        assert_eq!(
            calculate_single_addon_price(dec(-5), BillingCycle::Yearly, Decimal::ZERO),
            Decimal::ZERO
        );
        assert_eq!(
            calculate_single_addon_price(Decimal::ZERO, BillingCycle::Monthly, Decimal::ZERO),
            Decimal::ZERO
        );
        assert_eq!(
            calculate_single_addon_price(cents(1999), BillingCycle::Monthly, dec(50)),
            cents(1999)
        );
        // 19.99 * 12 * 0.9 = 215.892
        assert_eq!(
            calculate_single_addon_price(cents(1999), BillingCycle::Yearly, dec(10)),
            cents(21589)
        );
    }

    #[test]
    fn test_selected_addons_cost() {
        let org =
            SelectedAddon::from_addon(&Addon::organization("reports", "Reports", dec(50)), vec![]);
        let branch = SelectedAddon::from_addon(
            &Addon::branch("pos", "POS", dec(30)),
            vec![
                BranchSelection::new(0).selected(),
                BranchSelection::new(1),
                BranchSelection::new(2).selected(),
            ],
        );
        let sso = Addon::organization("sso", "SSO", dec(99)).included();
        let included = SelectedAddon::from_addon(&sso, vec![]);

        assert_eq!(calculate_selected_addons_cost(&[org, branch, included]), dec(110));
        assert_eq!(calculate_selected_addons_cost(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_pricing_summary() {
        let plan = growth_plan();
        let addons = vec![
            Addon::organization("reports", "Reports", dec(50)),
            Addon::branch("pos", "POS", dec(30)).included(),
        ];

        let summary = PricingSummary::compute(&plan, &addons, BillingCycle::Yearly, 1, dec(20));
        assert_eq!(summary.plan_price, cents(96000));
        assert_eq!(summary.plan_discount, cents(24000));
        assert_eq!(summary.organization_addons_price, cents(48000));
        assert_eq!(summary.branch_addons_price, Decimal::ZERO);
        assert_eq!(summary.total_price, cents(144000));
        assert_eq!(summary.monthly_savings, cents(36000));

        let monthly =
            PricingSummary::compute(&plan, &addons, BillingCycle::Monthly, 0, Decimal::ZERO);
        assert_eq!(monthly.branch_count, 1);
        assert_eq!(monthly.plan_discount, Decimal::ZERO);
        assert_eq!(monthly.monthly_savings, Decimal::ZERO);
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        let plan = Plan::new("enterprise", "Enterprise", Decimal::MAX);
        let addons = vec![Addon::branch("pos", "POS", Decimal::MAX)];

        assert_eq!(calculate_plan_price(&plan, BillingCycle::Yearly, u32::MAX), Decimal::MAX);
        assert_eq!(
            calculate_branch_addons_price(&addons, BillingCycle::Monthly, u32::MAX, Decimal::ZERO),
            Decimal::MAX
        );
        assert_eq!(
            calculate_total_price(&plan, &addons, BillingCycle::Yearly, u32::MAX, Decimal::ZERO),
            Decimal::MAX
        );
        let savings = calculate_monthly_savings(
            &plan,
            &addons,
            BillingCycle::Yearly,
            u32::MAX,
            Decimal::ZERO,
        );
        assert_eq!(savings, Decimal::ZERO);
    }
}
