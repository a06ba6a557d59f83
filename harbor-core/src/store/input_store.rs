use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::parse_currency;
use crate::{FilingStatus, TaxInputs};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// The form fields that are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    FilingStatus,
    PriorYearTax,
    PriorYearAgi,
    CurrentYearProfit,
}

impl InputField {
    pub fn all() -> &'static [InputField] {
        &[
            InputField::FilingStatus,
            InputField::PriorYearTax,
            InputField::PriorYearAgi,
            InputField::CurrentYearProfit,
        ]
    }

    /// Storage key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FilingStatus => "filing_status",
            Self::PriorYearTax => "prior_year_tax",
            Self::PriorYearAgi => "prior_year_agi",
            Self::CurrentYearProfit => "current_year_profit",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|field| field.key() == key)
    }
}

impl fmt::Display for InputField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw persisted values, exactly as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredInputs {
    pub filing_status: String,
    pub prior_year_tax: String,
    pub prior_year_agi: String,
    pub current_year_profit: String,
}

impl Default for StoredInputs {
    fn default() -> Self {
        Self {
            filing_status: FilingStatus::Single.as_str().to_string(),
            prior_year_tax: String::new(),
            prior_year_agi: String::new(),
            current_year_profit: String::new(),
        }
    }
}

impl StoredInputs {
    /// Builds the record from whatever fields a backend has; missing fields
    /// keep their defaults.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (InputField, String)>,
    {
        let mut inputs = Self::default();
        for (field, value) in entries {
            inputs.set(field, value);
        }
        inputs
    }

    pub fn get(
        &self,
        field: InputField,
    ) -> &str {
        match field {
            InputField::FilingStatus => &self.filing_status,
            InputField::PriorYearTax => &self.prior_year_tax,
            InputField::PriorYearAgi => &self.prior_year_agi,
            InputField::CurrentYearProfit => &self.current_year_profit,
        }
    }

    pub fn set(
        &mut self,
        field: InputField,
        value: String,
    ) {
        match field {
            InputField::FilingStatus => self.filing_status = value,
            InputField::PriorYearTax => self.prior_year_tax = value,
            InputField::PriorYearAgi => self.prior_year_agi = value,
            InputField::CurrentYearProfit => self.current_year_profit = value,
        }
    }

    /// Parses the raw strings into engine inputs.
    ///
    /// Unparseable amounts become zero and an unknown filing status falls
    /// back to single, matching how the form treats them.
    pub fn to_tax_inputs(&self) -> TaxInputs {
        let filing_status = FilingStatus::parse(&self.filing_status).unwrap_or_else(|| {
            if !self.filing_status.trim().is_empty() {
                tracing::warn!(
                    value = %self.filing_status,
                    "unknown stored filing status; using single"
                );
            }
            FilingStatus::Single
        });

        TaxInputs::new(
            filing_status,
            parse_currency(&self.prior_year_tax).or_zero(),
            parse_currency(&self.prior_year_agi).or_zero(),
            parse_currency(&self.current_year_profit).or_zero(),
        )
    }
}

/// Key-value persistence for the raw form inputs.
#[async_trait]
pub trait InputStore: Send + Sync {
    /// Stored value for `field`, or `None` if it was never set.
    async fn get(
        &self,
        field: InputField,
    ) -> Result<Option<String>, StoreError>;

    /// Stores `raw` verbatim, replacing any previous value.
    async fn set(
        &self,
        field: InputField,
        raw: &str,
    ) -> Result<(), StoreError>;

    async fn remove(
        &self,
        field: InputField,
    ) -> Result<(), StoreError>;

    /// Removes every stored field.
    async fn clear(&self) -> Result<(), StoreError>;

    /// All fields, with defaults for those never set.
    async fn load_all(&self) -> Result<StoredInputs, StoreError> {
        let mut entries = Vec::with_capacity(InputField::all().len());
        for field in InputField::all() {
            if let Some(value) = self.get(*field).await? {
                entries.push((*field, value));
            }
        }
        Ok(StoredInputs::from_entries(entries))
    }
}
