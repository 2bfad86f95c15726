//! Display labels for prices and billing cycles

use rust_decimal::Decimal;

use crate::catalog::BillingCycle;
use crate::pricing::round_currency;

/// How a billing cycle label is rendered.
///
/// When several flags are set, `with_ext` wins over `capitalize`, which wins
/// over `is_cycle_period`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelOptions {
    /// Slash-prefixed suffix, e.g. `/monthly`
    pub with_ext: bool,

    /// Capitalized adjective, e.g. `Monthly`
    pub capitalize: bool,

    /// Period phrase, e.g. `per month`
    pub is_cycle_period: bool,
}

impl LabelOptions {
    /// Options for the `/monthly` form.
    pub fn with_ext() -> Self {
        Self {
            with_ext: true,
            ..Self::default()
        }
    }

    /// Options for the `Monthly` form.
    pub fn capitalized() -> Self {
        Self {
            capitalize: true,
            ..Self::default()
        }
    }

    /// Options for the `per month` form.
    pub fn cycle_period() -> Self {
        Self {
            is_cycle_period: true,
            ..Self::default()
        }
    }
}

/// Label for a billing cycle.
///
/// # Examples
///
/// ```
/// use platform_billing::labels::{get_billing_cycle_label, LabelOptions};
/// use platform_billing::BillingCycle::{Monthly, Yearly};
///
/// assert_eq!(get_billing_cycle_label(Yearly, LabelOptions::with_ext()), "/yearly");
/// assert_eq!(get_billing_cycle_label(Monthly, LabelOptions::capitalized()), "Monthly");
/// assert_eq!(get_billing_cycle_label(Monthly, LabelOptions::cycle_period()), "per month");
/// assert_eq!(get_billing_cycle_label(Yearly, LabelOptions::default()), "year");
/// ```
pub fn get_billing_cycle_label(cycle: BillingCycle, options: LabelOptions) -> &'static str {
    match (cycle, options) {
        (BillingCycle::Monthly, LabelOptions { with_ext: true, .. }) => "/monthly",
        (BillingCycle::Yearly, LabelOptions { with_ext: true, .. }) => "/yearly",
        (BillingCycle::Monthly, LabelOptions { capitalize: true, .. }) => "Monthly",
        (BillingCycle::Yearly, LabelOptions { capitalize: true, .. }) => "Yearly",
        (BillingCycle::Monthly, LabelOptions { is_cycle_period: true, .. }) => "per month",
        (BillingCycle::Yearly, LabelOptions { is_cycle_period: true, .. }) => "per year",
        (BillingCycle::Monthly, _) => "month",
        (BillingCycle::Yearly, _) => "year",
    }
}

/// Price label such as `$50.00/month`.
pub fn format_addon_price_label(amount: Decimal, cycle: BillingCycle) -> String {
    format!(
        "${:.2}/{}",
        round_currency(amount),
        get_billing_cycle_label(cycle, LabelOptions::default())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_priority() {
        let all = LabelOptions {
            with_ext: true,
            capitalize: true,
            is_cycle_period: true,
        };
        assert_eq!(get_billing_cycle_label(BillingCycle::Monthly, all), "/monthly");

        let no_ext = LabelOptions {
            with_ext: false,
            ..all
        };
        assert_eq!(get_billing_cycle_label(BillingCycle::Yearly, no_ext), "Yearly");

        assert_eq!(
            get_billing_cycle_label(BillingCycle::Yearly, LabelOptions::cycle_period()),
            "per year"
        );
        assert_eq!(
            get_billing_cycle_label(BillingCycle::Monthly, LabelOptions::default()),
            "month"
        );
    }

    #[test]
    fn test_format_addon_price_label() {
        assert_eq!(
            format_addon_price_label(Decimal::new(50, 0), BillingCycle::Monthly),
            "$50.00/month"
        );
        assert_eq!(
            format_addon_price_label(Decimal::new(48, 1), BillingCycle::Yearly),
            "$4.80/year"
        );
        assert_eq!(
            format_addon_price_label(Decimal::new(12345, 3), BillingCycle::Monthly),
            "$12.35/month"
        );
    }
}
