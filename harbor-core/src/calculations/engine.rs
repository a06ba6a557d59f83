//! Aggregation of the individual calculations into a payment recommendation.
//!
//! # Steps
//!
//! | Step | Value |
//! |------|-------|
//! | 1 | Self-employment tax on current-year profit |
//! | 2 | Federal income tax after the SE tax deduction |
//! | 3 | Current-year total: step 1 + step 2 |
//! | 4 | Current-year avoidance minimum: step 3 × 90% |
//! | 5 | Safe Harbor minimum: prior-year tax × 100% or 110% |
//! | 6 | Required annual payment: smaller of step 4 or step 5 |
//! | 7 | Quarterly payment: step 6 ÷ 4 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use harbor_core::{FilingStatus, TaxEngine, TaxInputs, TaxRuleSet};
//!
//! let rules = TaxRuleSet::tax_year_2026();
//! let engine = TaxEngine::new(&rules);
//!
//! let result = engine.calculate(&TaxInputs::new(
//!     FilingStatus::Single,
//!     dec!(25000),  // prior-year tax
//!     dec!(150000), // prior-year AGI
//!     dec!(200000), // current-year profit
//! ));
//!
//! assert_eq!(result.safe_harbor_minimum, dec!(25000));
//! assert_eq!(result.required_annual_payment, dec!(25000));
//! assert_eq!(result.quarterly_payment, dec!(6250));
//! assert!(!result.is_current_year_lower);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::{compute_income_tax, compute_safe_harbor, compute_se_tax};
use crate::{QuarterlyInstallment, TaxInputs, TaxResult, TaxRuleSet};

const QUARTER_LABELS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

/// Stateless calculator bound to one rule table.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    rules: &'a TaxRuleSet,
}

impl<'a> TaxEngine<'a> {
    pub fn new(rules: &'a TaxRuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'a TaxRuleSet {
        self.rules
    }

    pub fn calculate(
        &self,
        inputs: &TaxInputs,
    ) -> TaxResult {
        calculate_taxes(inputs, self.rules)
    }

    pub fn quarterly_schedule(
        &self,
        result: &TaxResult,
    ) -> [QuarterlyInstallment; 4] {
        quarterly_schedule(result, self.rules)
    }
}

/// Computes the full tax breakdown and payment recommendation.
///
/// Negative inputs are treated as zero. All values are exact; rounding is
/// left to the formatting helpers.
pub fn calculate_taxes(
    inputs: &TaxInputs,
    rules: &TaxRuleSet,
) -> TaxResult {
    let inputs = inputs.normalized();

    let self_employment_tax =
        compute_se_tax(inputs.current_year_profit, inputs.filing_status, rules);
    let income_tax = compute_income_tax(
        inputs.current_year_profit,
        self_employment_tax.se_tax_deduction,
        inputs.filing_status,
        rules,
    );

    let current_year_total_tax = self_employment_tax.total_se_tax + income_tax.federal_income_tax;
    let current_year_avoidance_minimum =
        current_year_total_tax * rules.current_year_avoidance_multiplier;

    let safe_harbor = compute_safe_harbor(inputs.prior_year_tax, inputs.prior_year_agi, rules);

    let required_annual_payment =
        current_year_avoidance_minimum.min(safe_harbor.safe_harbor_minimum);
    let quarterly_payment = required_annual_payment / Decimal::from(4);

    let is_current_year_lower = current_year_avoidance_minimum < safe_harbor.safe_harbor_minimum;
    let savings = (safe_harbor.safe_harbor_minimum - current_year_avoidance_minimum).abs();

    debug!(
        tax_year = rules.tax_year,
        filing_status = %inputs.filing_status,
        current_year_total_tax = %current_year_total_tax,
        safe_harbor_minimum = %safe_harbor.safe_harbor_minimum,
        required_annual_payment = %required_annual_payment,
        is_current_year_lower,
        "Computed estimated tax"
    );

    TaxResult {
        self_employment_tax,
        income_tax,
        current_year_total_tax,
        current_year_avoidance_minimum,
        safe_harbor_multiplier: safe_harbor.multiplier,
        safe_harbor_minimum: safe_harbor.safe_harbor_minimum,
        required_annual_payment,
        quarterly_payment,
        is_current_year_lower,
        savings,
    }
}

/// One installment of `result.quarterly_payment` per due date in `rules`.
pub fn quarterly_schedule(
    result: &TaxResult,
    rules: &TaxRuleSet,
) -> [QuarterlyInstallment; 4] {
    std::array::from_fn(|quarter| QuarterlyInstallment {
        label: QUARTER_LABELS[quarter].to_string(),
        due_date: rules.payment_due_dates[quarter],
        amount: result.quarterly_payment,
    })
}
