//! Safe Harbor minimum from prior-year figures.

use rust_decimal::Decimal;

use crate::{SafeHarbor, TaxRuleSet};

/// Prior-year tax scaled by the Safe Harbor multiplier.
///
/// Filers whose prior-year AGI is strictly above the rule set's threshold
/// use the high-income multiplier (110%); everyone else uses the standard
/// one (100%). The product saturates at `Decimal::MAX`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use harbor_core::{TaxRuleSet, compute_safe_harbor};
///
/// let rules = TaxRuleSet::tax_year_2026();
///
/// let at_threshold = compute_safe_harbor(dec!(25000), dec!(150000), &rules);
/// assert_eq!(at_threshold.safe_harbor_minimum, dec!(25000));
///
/// let above = compute_safe_harbor(dec!(25000), dec!(150001), &rules);
/// assert_eq!(above.safe_harbor_minimum, dec!(27500));
/// ```
pub fn compute_safe_harbor(
    prior_year_tax: Decimal,
    prior_year_agi: Decimal,
    rules: &TaxRuleSet,
) -> SafeHarbor {
    let multiplier = if prior_year_agi > rules.safe_harbor_agi_threshold {
        rules.safe_harbor_high_income_multiplier
    } else {
        rules.safe_harbor_standard_multiplier
    };

    SafeHarbor {
        safe_harbor_minimum: prior_year_tax.saturating_mul(multiplier),
        multiplier,
    }
}
