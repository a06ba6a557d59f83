mod filing_status;
mod tax_bracket;
mod tax_inputs;
mod tax_result;
mod tax_rule_set;

pub use filing_status::{FilingStatus, PerFilingStatus};
pub use tax_bracket::TaxBracket;
pub use tax_inputs::TaxInputs;
pub use tax_result::{
    BracketDetail, IncomeTaxBreakdown, QuarterlyInstallment, SafeHarbor, SelfEmploymentBreakdown,
    TaxResult,
};
pub use tax_rule_set::{RuleSetError, TaxRuleSet};
