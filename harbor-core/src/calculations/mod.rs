//! Tax computation engine.
//!
//! Pure functions that turn [`crate::TaxInputs`] and a [`crate::TaxRuleSet`]
//! into an itemized [`crate::TaxResult`]. Nothing here performs I/O or keeps
//! state between calls.

pub mod common;
pub mod engine;
pub mod income_tax;
pub mod safe_harbor;
pub mod self_employment;

pub use engine::{TaxEngine, calculate_taxes, quarterly_schedule};
pub use income_tax::compute_income_tax;
pub use safe_harbor::compute_safe_harbor;
pub use self_employment::compute_se_tax;
