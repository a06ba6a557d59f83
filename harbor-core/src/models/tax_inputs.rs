use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::FilingStatus;

/// The four values a filer supplies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInputs {
    pub filing_status: FilingStatus,
    /// Total tax liability on last year's return.
    pub prior_year_tax: Decimal,
    /// Last year's adjusted gross income.
    pub prior_year_agi: Decimal,
    /// Projected net self-employment profit, before SE tax.
    pub current_year_profit: Decimal,
}

impl TaxInputs {
    /// Largest amount the engine accepts: one quadrillion dollars. Every
    /// intermediate value stays well inside `Decimal`'s range below it.
    pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

    pub fn new(
        filing_status: FilingStatus,
        prior_year_tax: Decimal,
        prior_year_agi: Decimal,
        current_year_profit: Decimal,
    ) -> Self {
        Self {
            filing_status,
            prior_year_tax,
            prior_year_agi,
            current_year_profit,
        }
    }

    /// Returns a copy with every negative amount replaced by zero and every
    /// amount above [`Self::MAX_AMOUNT`] lowered to it.
    pub fn normalized(&self) -> Self {
        Self {
            filing_status: self.filing_status,
            prior_year_tax: clamp_amount("prior_year_tax", self.prior_year_tax),
            prior_year_agi: clamp_amount("prior_year_agi", self.prior_year_agi),
            current_year_profit: clamp_amount("current_year_profit", self.current_year_profit),
        }
    }
}

fn clamp_amount(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "negative input treated as zero");
        return Decimal::ZERO;
    }
    if value > TaxInputs::MAX_AMOUNT {
        warn!(field, value = %value, "input above the maximum amount; capped");
        return TaxInputs::MAX_AMOUNT;
    }
    value
}
