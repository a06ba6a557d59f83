//! Safe Harbor quarterly estimated-tax engine.
//!
//! [`calculate_taxes`] turns four filer inputs and a [`TaxRuleSet`] into an
//! itemized [`TaxResult`]: self-employment tax, federal income tax, the Safe
//! Harbor minimum and the resulting quarterly payment.

pub mod calculations;
pub mod format;
pub mod models;
pub mod store;

pub use calculations::{
    TaxEngine, calculate_taxes, compute_income_tax, compute_safe_harbor, compute_se_tax,
    quarterly_schedule,
};
pub use format::{
    ParsedAmount, format_currency, format_currency_with_cents, format_percentage, parse_currency,
};
pub use models::*;
pub use store::{
    InputField, InputStore, MemoryInputStore, MemoryStoreFactory, StoreConfig, StoreError,
    StoreFactory, StoreRegistry, StoredInputs,
};
