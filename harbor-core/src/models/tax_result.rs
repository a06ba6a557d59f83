use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Self-employment tax components. Amounts are unrounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentBreakdown {
    /// Net profit × net earnings factor.
    pub se_taxable_earnings: Decimal,
    pub social_security_tax: Decimal,
    pub medicare_tax: Decimal,
    pub additional_medicare_tax: Decimal,
    /// Sum of the three components above.
    pub total_se_tax: Decimal,
    /// Deductible half of `total_se_tax`.
    pub se_tax_deduction: Decimal,
}

/// Income taxed inside a single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketDetail {
    pub rate: Decimal,
    pub taxable_at_rate: Decimal,
    pub tax_at_rate: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBreakdown {
    /// Net profit less the SE tax deduction.
    pub adjusted_gross_income: Decimal,
    pub standard_deduction: Decimal,
    pub taxable_income: Decimal,
    pub federal_income_tax: Decimal,
    /// Brackets with a nonzero taxable amount, lowest rate first.
    pub bracket_details: Vec<BracketDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeHarbor {
    pub safe_harbor_minimum: Decimal,
    pub multiplier: Decimal,
}

/// Full output of [`crate::calculate_taxes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub self_employment_tax: SelfEmploymentBreakdown,
    pub income_tax: IncomeTaxBreakdown,
    pub current_year_total_tax: Decimal,
    /// `current_year_total_tax` × the avoidance multiplier (90%).
    pub current_year_avoidance_minimum: Decimal,

    pub safe_harbor_multiplier: Decimal,
    pub safe_harbor_minimum: Decimal,

    /// Lesser of the avoidance minimum and the Safe Harbor minimum.
    pub required_annual_payment: Decimal,
    pub quarterly_payment: Decimal,

    /// `true` only when the current-year method is strictly cheaper.
    pub is_current_year_lower: bool,
    /// Absolute difference between the two annual candidates.
    pub savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyInstallment {
    pub label: String,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}
