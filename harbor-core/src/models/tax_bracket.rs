use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A marginal bracket with inclusive bounds. `upper_bound == None` is the
/// open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Amount of income the bracket can absorb, or `None` when unbounded.
    pub fn span(&self) -> Option<Decimal> {
        self.upper_bound
            .map(|upper| upper - self.lower_bound + Decimal::ONE)
    }
}
