//! Self-employment tax on projected net profit.
//!
//! | Step | Value |
//! |------|-------|
//! | 1 | SE taxable earnings: net profit × 92.35% |
//! | 2 | Social Security tax: min(step 1, wage base) × 12.4% |
//! | 3 | Medicare tax: step 1 × 2.9% (no cap) |
//! | 4 | Additional Medicare tax: (step 1 − threshold, min 0) × 0.9% |
//! | 5 | Total SE tax: steps 2 + 3 + 4 |
//! | 6 | SE tax deduction: step 5 × 50% |
//!
//! Rates and limits come from the [`TaxRuleSet`]; the percentages above are
//! the 2026 values.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use harbor_core::{FilingStatus, TaxRuleSet, compute_se_tax};
//!
//! let rules = TaxRuleSet::tax_year_2026();
//! let se = compute_se_tax(dec!(100000), FilingStatus::Single, &rules);
//!
//! assert_eq!(se.se_taxable_earnings, dec!(92350));
//! assert_eq!(se.total_se_tax, dec!(14129.55));
//! assert_eq!(se.se_tax_deduction, dec!(7064.775));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::non_negative;
use crate::{FilingStatus, SelfEmploymentBreakdown, TaxRuleSet};

/// Computes self-employment tax for `net_profit`.
///
/// A negative profit is treated as zero income and logged.
pub fn compute_se_tax(
    net_profit: Decimal,
    filing_status: FilingStatus,
    rules: &TaxRuleSet,
) -> SelfEmploymentBreakdown {
    if net_profit < Decimal::ZERO {
        warn!(
            net_profit = %net_profit,
            "Net profit is negative; SE tax computed on zero income"
        );
    }
    let net_profit = non_negative(net_profit);

    let se_taxable_earnings = net_profit * rules.net_earnings_factor;
    let social_security_tax = social_security_tax(se_taxable_earnings, rules);
    let medicare_tax = se_taxable_earnings * rules.medicare_tax_rate;
    let additional_medicare_tax =
        additional_medicare_tax(se_taxable_earnings, filing_status, rules);

    let total_se_tax = social_security_tax + medicare_tax + additional_medicare_tax;
    let se_tax_deduction = total_se_tax * rules.se_tax_deduction_rate;

    SelfEmploymentBreakdown {
        se_taxable_earnings,
        social_security_tax,
        medicare_tax,
        additional_medicare_tax,
        total_se_tax,
        se_tax_deduction,
    }
}

/// Social Security tax, capped at the wage base.
fn social_security_tax(
    se_taxable_earnings: Decimal,
    rules: &TaxRuleSet,
) -> Decimal {
    se_taxable_earnings.min(rules.ss_wage_base) * rules.ss_tax_rate
}

/// Additional Medicare tax on the excess over the filing-status threshold.
fn additional_medicare_tax(
    se_taxable_earnings: Decimal,
    filing_status: FilingStatus,
    rules: &TaxRuleSet,
) -> Decimal {
    let threshold = *rules.additional_medicare_threshold.get(filing_status);
    non_negative(se_taxable_earnings - threshold) * rules.additional_medicare_rate
}
