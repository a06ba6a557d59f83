//! Per-tax-year rule table consumed by the calculation engine.
//!
//! Every rate, threshold and bracket the engine applies lives here so a new
//! tax year only needs a new [`TaxRuleSet`] value. The built-in table is
//! [`TaxRuleSet::tax_year_2026`]; other years can be loaded from data files
//! by the `harbor-data` crate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{FilingStatus, PerFilingStatus, TaxBracket};

/// Errors reported by [`TaxRuleSet::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSetError {
    /// A filing status has no brackets at all.
    #[error("no tax brackets for filing status {0}")]
    EmptyBrackets(FilingStatus),

    /// The lowest bracket must start at zero.
    #[error("first {status} bracket must start at 0, got {lower_bound}")]
    FirstBracketNotAtZero {
        status: FilingStatus,
        lower_bound: Decimal,
    },

    /// A bounded bracket ends before it starts.
    #[error("{status} bracket {index} has upper bound {upper_bound} below lower bound {lower_bound}")]
    InvertedBracket {
        status: FilingStatus,
        index: usize,
        lower_bound: Decimal,
        upper_bound: Decimal,
    },

    /// Consecutive brackets leave a gap or overlap.
    #[error("{status} bracket {index} starts at {found}, expected {expected}")]
    BracketNotContiguous {
        status: FilingStatus,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    /// An open-ended bracket appears before the end of the list.
    #[error("{status} bracket {index} is unbounded but is not the last bracket")]
    UnboundedBracketNotLast { status: FilingStatus, index: usize },

    /// The top bracket must be open-ended so every income is covered.
    #[error("last {0} bracket must be unbounded")]
    LastBracketBounded(FilingStatus),

    /// A rate is outside `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    /// The SE net-earnings factor is outside `(0, 1]`.
    #[error("net earnings factor must be greater than 0 and at most 1, got {0}")]
    InvalidNetEarningsFactor(Decimal),

    /// The Social Security wage base must be positive.
    #[error("social security wage base must be positive, got {0}")]
    InvalidWageBase(Decimal),

    /// A threshold, deduction or multiplier is negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },
}

/// Frozen rule table for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRuleSet {
    pub tax_year: i32,

    pub standard_deduction: PerFilingStatus<Decimal>,

    /// Maximum net earnings subject to Social Security tax.
    pub ss_wage_base: Decimal,
    /// Combined employer and employee Social Security rate (12.4%).
    pub ss_tax_rate: Decimal,
    /// Combined Medicare rate (2.9%), applied without a cap.
    pub medicare_tax_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold: PerFilingStatus<Decimal>,

    /// Share of net profit treated as SE earnings (92.35%).
    pub net_earnings_factor: Decimal,
    /// Deductible share of SE tax (50%).
    pub se_tax_deduction_rate: Decimal,

    /// Prior-year AGI above which the high-income multiplier applies.
    pub safe_harbor_agi_threshold: Decimal,
    pub safe_harbor_high_income_multiplier: Decimal,
    pub safe_harbor_standard_multiplier: Decimal,
    /// Share of projected current-year tax that avoids the penalty (90%).
    pub current_year_avoidance_multiplier: Decimal,

    /// Ordered lowest rate first, covering `[0, +inf)`.
    pub brackets: PerFilingStatus<Vec<TaxBracket>>,

    /// Estimated payment due dates, Q1 through Q4.
    pub payment_due_dates: [NaiveDate; 4],
}

impl TaxRuleSet {
    /// Rule table for tax year 2026.
    pub fn tax_year_2026() -> Self {
        Self {
            tax_year: 2026,
            standard_deduction: PerFilingStatus::new(Decimal::from(16_100), Decimal::from(32_200)),
            ss_wage_base: Decimal::from(184_500),
            ss_tax_rate: Decimal::new(124, 3),
            medicare_tax_rate: Decimal::new(29, 3),
            additional_medicare_rate: Decimal::new(9, 3),
            additional_medicare_threshold: PerFilingStatus::new(
                Decimal::from(200_000),
                Decimal::from(250_000),
            ),
            net_earnings_factor: Decimal::new(9235, 4),
            se_tax_deduction_rate: Decimal::new(5, 1),
            safe_harbor_agi_threshold: Decimal::from(150_000),
            safe_harbor_high_income_multiplier: Decimal::new(11, 1),
            safe_harbor_standard_multiplier: Decimal::ONE,
            current_year_avoidance_multiplier: Decimal::new(9, 1),
            brackets: PerFilingStatus::new(
                brackets(&[
                    (0, Some(12_250), 10),
                    (12_251, Some(49_850), 12),
                    (49_851, Some(106_350), 22),
                    (106_351, Some(203_000), 24),
                    (203_001, Some(257_500), 32),
                    (257_501, Some(644_050), 35),
                    (644_051, None, 37),
                ]),
                brackets(&[
                    (0, Some(24_500), 10),
                    (24_501, Some(99_700), 12),
                    (99_701, Some(212_700), 22),
                    (212_701, Some(406_000), 24),
                    (406_001, Some(515_000), 32),
                    (515_001, Some(773_000), 35),
                    (773_001, None, 37),
                ]),
            ),
            payment_due_dates: [
                due_date(2026, 4, 15),
                due_date(2026, 6, 15),
                due_date(2026, 9, 15),
                due_date(2027, 1, 15),
            ],
        }
    }

    pub fn brackets_for(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.brackets.get(status)
    }

    /// Checks that the table is internally consistent.
    ///
    /// The engine itself never fails, so a table should be validated once
    /// when it is loaded rather than on every calculation.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleSetError`] found.
    pub fn validate(&self) -> Result<(), RuleSetError> {
        check_rate("social security tax rate", self.ss_tax_rate)?;
        check_rate("medicare tax rate", self.medicare_tax_rate)?;
        check_rate("additional medicare rate", self.additional_medicare_rate)?;
        check_rate("SE tax deduction rate", self.se_tax_deduction_rate)?;
        check_rate(
            "current year avoidance multiplier",
            self.current_year_avoidance_multiplier,
        )?;

        if self.net_earnings_factor <= Decimal::ZERO || self.net_earnings_factor > Decimal::ONE {
            return Err(RuleSetError::InvalidNetEarningsFactor(
                self.net_earnings_factor,
            ));
        }
        if self.ss_wage_base <= Decimal::ZERO {
            return Err(RuleSetError::InvalidWageBase(self.ss_wage_base));
        }

        check_non_negative("safe harbor AGI threshold", self.safe_harbor_agi_threshold)?;
        check_non_negative(
            "safe harbor high income multiplier",
            self.safe_harbor_high_income_multiplier,
        )?;
        check_non_negative(
            "safe harbor standard multiplier",
            self.safe_harbor_standard_multiplier,
        )?;
        for (_, amount) in self.standard_deduction.iter() {
            check_non_negative("standard deduction", *amount)?;
        }
        for (_, amount) in self.additional_medicare_threshold.iter() {
            check_non_negative("additional medicare threshold", *amount)?;
        }

        for (status, brackets) in self.brackets.iter() {
            validate_brackets(status, brackets)?;
        }

        Ok(())
    }
}

impl Default for TaxRuleSet {
    fn default() -> Self {
        Self::tax_year_2026()
    }
}

fn brackets(rows: &[(i64, Option<i64>, i64)]) -> Vec<TaxBracket> {
    rows.iter()
        .map(|&(lower, upper, percent)| {
            TaxBracket::new(
                Decimal::from(lower),
                upper.map(Decimal::from),
                Decimal::new(percent, 2),
            )
        })
        .collect()
}

fn due_date(
    year: i32,
    month: u32,
    day: u32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("built-in due dates are valid calendar dates")
}

fn check_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), RuleSetError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RuleSetError::InvalidRate { name, value });
    }
    Ok(())
}

fn check_non_negative(
    name: &'static str,
    value: Decimal,
) -> Result<(), RuleSetError> {
    if value < Decimal::ZERO {
        return Err(RuleSetError::NegativeAmount { name, value });
    }
    Ok(())
}

fn validate_brackets(
    status: FilingStatus,
    brackets: &[TaxBracket],
) -> Result<(), RuleSetError> {
    let first = brackets
        .first()
        .ok_or(RuleSetError::EmptyBrackets(status))?;
    if first.lower_bound != Decimal::ZERO {
        return Err(RuleSetError::FirstBracketNotAtZero {
            status,
            lower_bound: first.lower_bound,
        });
    }

    let last_index = brackets.len() - 1;
    let mut expected_lower = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        check_rate("bracket rate", bracket.rate)?;

        if bracket.lower_bound != expected_lower {
            return Err(RuleSetError::BracketNotContiguous {
                status,
                index,
                expected: expected_lower,
                found: bracket.lower_bound,
            });
        }

        match bracket.upper_bound {
            Some(upper_bound) => {
                if upper_bound < bracket.lower_bound {
                    return Err(RuleSetError::InvertedBracket {
                        status,
                        index,
                        lower_bound: bracket.lower_bound,
                        upper_bound,
                    });
                }
                if index == last_index {
                    return Err(RuleSetError::LastBracketBounded(status));
                }
                expected_lower = upper_bound + Decimal::ONE;
            }
            None if index != last_index => {
                return Err(RuleSetError::UnboundedBracketNotLast { status, index });
            }
            None => {}
        }
    }

    Ok(())
}
