//! Plain-text renderings of an [`Estimate`].
//!
//! [`Breakdown`] is the itemized view printed by `estimate`; [`Summary`] is
//! the shareable one-page document printed by `estimate --summary`.

use std::fmt;

use chrono::NaiveDate;
use harbor_core::{InputField, StoredInputs, TaxRuleSet, format_currency, format_percentage};
use rust_decimal::Decimal;

use crate::app::Estimate;

const LABEL_WIDTH: usize = 32;
const VALUE_WIDTH: usize = 14;
const DIVIDER: &str = "------------------------------------------------------------";

const DISCLAIMER: [&str; 2] = [
    "This document is for informational purposes only and does not constitute tax advice.",
    "Consult a qualified tax professional for your specific situation.",
];

fn row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: &str,
) -> fmt::Result {
    writeln!(f, "  {label:<LABEL_WIDTH$}{value:>VALUE_WIDTH$}")
}

fn money_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    row(f, label, &format_currency(amount))
}

fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn recommended_method(estimate: &Estimate) -> &'static str {
    if estimate.result.is_current_year_lower {
        "Current Year Estimate"
    } else {
        "Safe Harbor"
    }
}

/// Itemized calculation: SE tax, income tax by bracket, both payment
/// options and the quarterly schedule.
pub struct Breakdown<'a> {
    estimate: &'a Estimate,
    rules: &'a TaxRuleSet,
}

impl<'a> Breakdown<'a> {
    pub fn new(
        estimate: &'a Estimate,
        rules: &'a TaxRuleSet,
    ) -> Self {
        Self { estimate, rules }
    }
}

impl fmt::Display for Breakdown<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let Estimate {
            tax_year,
            inputs,
            result,
            schedule,
        } = self.estimate;
        let se = &result.self_employment_tax;
        let income = &result.income_tax;

        writeln!(
            f,
            "{tax_year} estimated tax ({})",
            inputs.filing_status.label()
        )?;
        writeln!(f)?;

        writeln!(f, "Self-employment tax")?;
        money_row(f, "Net earnings from self-employment", se.se_taxable_earnings)?;
        money_row(f, "Social Security", se.social_security_tax)?;
        money_row(f, "Medicare", se.medicare_tax)?;
        money_row(f, "Additional Medicare", se.additional_medicare_tax)?;
        money_row(f, "Total SE tax", se.total_se_tax)?;
        money_row(f, "Deductible half", se.se_tax_deduction)?;
        writeln!(f)?;

        writeln!(f, "Federal income tax")?;
        money_row(f, "Adjusted gross income", income.adjusted_gross_income)?;
        money_row(f, "Standard deduction", income.standard_deduction)?;
        money_row(f, "Taxable income", income.taxable_income)?;
        for detail in &income.bracket_details {
            row(
                f,
                &format!(
                    "{} of {}",
                    format_percentage(detail.rate),
                    format_currency(detail.taxable_at_rate)
                ),
                &format_currency(detail.tax_at_rate),
            )?;
        }
        money_row(f, "Federal income tax", income.federal_income_tax)?;
        writeln!(f)?;

        writeln!(f, "Payment options")?;
        money_row(f, "Projected total tax", result.current_year_total_tax)?;
        money_row(
            f,
            &format!(
                "{} of projected tax",
                format_percentage(self.rules.current_year_avoidance_multiplier)
            ),
            result.current_year_avoidance_minimum,
        )?;
        money_row(
            f,
            &format!(
                "Safe Harbor ({} of {} tax)",
                format_percentage(result.safe_harbor_multiplier),
                tax_year - 1
            ),
            result.safe_harbor_minimum,
        )?;
        writeln!(f)?;

        writeln!(f, "Recommended: {}", recommended_method(self.estimate))?;
        money_row(f, "Annual payment", result.required_annual_payment)?;
        money_row(f, "Quarterly payment", result.quarterly_payment)?;
        money_row(f, "Savings over the alternative", result.savings)?;
        writeln!(f)?;

        for installment in schedule {
            row(
                f,
                &format!("{}  {}", installment.label, long_date(installment.due_date)),
                &format_currency(installment.amount),
            )?;
        }
        Ok(())
    }
}

/// One-page summary to keep with tax records.
pub struct Summary<'a> {
    estimate: &'a Estimate,
    rules: &'a TaxRuleSet,
    generated: NaiveDate,
}

impl<'a> Summary<'a> {
    pub fn new(
        estimate: &'a Estimate,
        rules: &'a TaxRuleSet,
        generated: NaiveDate,
    ) -> Self {
        Self {
            estimate,
            rules,
            generated,
        }
    }

    fn multiplier_text(&self) -> String {
        let threshold = format_currency(self.rules.safe_harbor_agi_threshold);
        if self.estimate.inputs.prior_year_agi > self.rules.safe_harbor_agi_threshold {
            format!(
                "{} (AGI over {threshold})",
                format_percentage(self.rules.safe_harbor_high_income_multiplier)
            )
        } else {
            format!(
                "{} (AGI {threshold} or less)",
                format_percentage(self.rules.safe_harbor_standard_multiplier)
            )
        }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let Estimate {
            tax_year,
            inputs,
            result,
            schedule,
        } = self.estimate;
        let prior_year = tax_year - 1;

        writeln!(f, "{tax_year} Estimated Tax Summary")?;
        writeln!(f, "Safe Harbor Tax Shield Calculation")?;
        writeln!(f, "Generated: {}", long_date(self.generated))?;
        writeln!(f, "{DIVIDER}")?;

        writeln!(f, "Your Information")?;
        row(f, "Filing Status", inputs.filing_status.label())?;
        money_row(f, &format!("{prior_year} Total Tax Liability"), inputs.prior_year_tax)?;
        money_row(f, &format!("{prior_year} Adjusted Gross Income"), inputs.prior_year_agi)?;
        money_row(f, &format!("{tax_year} Estimated Net Profit"), inputs.current_year_profit)?;
        writeln!(f, "{DIVIDER}")?;

        writeln!(f, "Quarterly Payment Schedule")?;
        for installment in schedule {
            row(
                f,
                &format!("{}  {}", installment.label, long_date(installment.due_date)),
                &format_currency(installment.amount),
            )?;
        }
        money_row(f, "Annual Total:", result.required_annual_payment)?;
        writeln!(f, "{DIVIDER}")?;

        writeln!(f, "Safe Harbor Calculation")?;
        money_row(f, &format!("{prior_year} Tax Liability"), inputs.prior_year_tax)?;
        writeln!(f, "  {:<LABEL_WIDTH$}{}", "Safe Harbor Multiplier", self.multiplier_text())?;
        money_row(f, "Safe Harbor Minimum:", result.safe_harbor_minimum)?;
        writeln!(f)?;

        let avoidance = format_percentage(self.rules.current_year_avoidance_multiplier);
        writeln!(f, "Current Year Projection ({avoidance} Method)")?;
        money_row(f, "Self-Employment Tax", result.self_employment_tax.total_se_tax)?;
        money_row(f, "Federal Income Tax", result.income_tax.federal_income_tax)?;
        money_row(f, &format!("Total {tax_year} Projected Tax"), result.current_year_total_tax)?;
        money_row(
            f,
            &format!("{avoidance} of Projected Tax:"),
            result.current_year_avoidance_minimum,
        )?;
        writeln!(f, "{DIVIDER}")?;

        writeln!(f, "Recommendation")?;
        writeln!(f, "  Recommended Method: {}", recommended_method(self.estimate))?;
        writeln!(f, "  Pay {} per quarter", format_currency(result.quarterly_payment))?;
        if result.savings > Decimal::ZERO {
            writeln!(
                f,
                "  You save {} compared to the alternative.",
                format_currency(result.savings)
            )?;
        }
        writeln!(f)?;

        for line in DISCLAIMER {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Saved raw inputs, one `key  value` line per field.
pub struct SavedInputs<'a>(pub &'a StoredInputs);

impl fmt::Display for SavedInputs<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for field in InputField::all() {
            let value = self.0.get(*field);
            let shown = if value.is_empty() { "(not set)" } else { value };
            writeln!(f, "{:<20}{shown}", field.key())?;
        }
        Ok(())
    }
}
