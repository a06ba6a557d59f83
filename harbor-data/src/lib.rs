//! Loading of per-year tax rule tables from data files.

mod loader;

pub use loader::{
    BRACKETS_FILE, BracketRecord, CONSTANTS_FILE, RuleConstants, RuleSetLoader, RuleSetLoaderError,
};
