//! Federal income tax under progressive brackets.
//!
//! Adjusted gross income is net profit less the deductible half of SE tax;
//! taxable income is AGI less the standard deduction (never below zero).
//! Taxable income is then walked through the brackets lowest rate first, and
//! only the slice of income inside each bracket is taxed at that bracket's
//! rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use harbor_core::{FilingStatus, TaxRuleSet, compute_income_tax};
//!
//! let rules = TaxRuleSet::tax_year_2026();
//! let tax = compute_income_tax(dec!(50000), dec!(0), FilingStatus::Single, &rules);
//!
//! // 50000 − 16100 standard deduction
//! assert_eq!(tax.taxable_income, dec!(33900));
//! // 12251 × 10% + 21649 × 12%
//! assert_eq!(tax.federal_income_tax, dec!(3822.98));
//! assert_eq!(tax.bracket_details.len(), 2);
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::non_negative;
use crate::{BracketDetail, FilingStatus, IncomeTaxBreakdown, TaxBracket, TaxRuleSet};

/// Computes federal income tax on `net_profit` after the SE tax deduction.
pub fn compute_income_tax(
    net_profit: Decimal,
    se_tax_deduction: Decimal,
    filing_status: FilingStatus,
    rules: &TaxRuleSet,
) -> IncomeTaxBreakdown {
    let adjusted_gross_income = net_profit - se_tax_deduction;
    let standard_deduction = *rules.standard_deduction.get(filing_status);
    let taxable_income = non_negative(adjusted_gross_income - standard_deduction);

    let bracket_details = walk_brackets(taxable_income, rules.brackets_for(filing_status));
    let federal_income_tax: Decimal = bracket_details.iter().map(|d| d.tax_at_rate).sum();

    IncomeTaxBreakdown {
        adjusted_gross_income,
        standard_deduction,
        taxable_income,
        federal_income_tax,
        bracket_details,
    }
}

/// Splits `taxable_income` across `brackets`, returning one detail per
/// bracket that receives a nonzero amount.
///
/// Bracket spans are inclusive (`upper − lower + 1`); the unbounded top
/// bracket absorbs whatever is left. Income beyond a table that ends in a
/// bounded bracket is left untaxed, which a validated rule set rules out.
fn walk_brackets(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
) -> Vec<BracketDetail> {
    let mut remaining = taxable_income;
    let mut details = Vec::new();

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxable_at_rate = match bracket.span() {
            Some(span) => remaining.min(span),
            None => remaining,
        };
        if taxable_at_rate > Decimal::ZERO {
            details.push(BracketDetail {
                rate: bracket.rate,
                taxable_at_rate,
                tax_at_rate: taxable_at_rate * bracket.rate,
            });
        }
        remaining -= taxable_at_rate;
    }

    details
}
