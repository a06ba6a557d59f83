use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use harbor_core::{FilingStatus, PerFilingStatus, RuleSetError, TaxBracket, TaxRuleSet};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// File holding the scalar rule values of a tax year directory.
pub const CONSTANTS_FILE: &str = "rules.toml";
/// File holding the bracket table of a tax year directory.
pub const BRACKETS_FILE: &str = "brackets.csv";

/// Errors that can occur when loading a rule table.
#[derive(Debug, Error)]
pub enum RuleSetLoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Unknown filing status '{0}' in bracket file")]
    UnknownFilingStatus(String),

    #[error("Invalid rule set: {0}")]
    Invalid(#[from] RuleSetError),
}

impl From<csv::Error> for RuleSetLoaderError {
    fn from(err: csv::Error) -> Self {
        RuleSetLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for RuleSetLoaderError {
    fn from(err: toml::de::Error) -> Self {
        RuleSetLoaderError::TomlParse(err.to_string())
    }
}

/// Scalar rule values, as read from `rules.toml`.
///
/// Amounts are written as quoted strings (`"0.124"`) so they are read as
/// exact decimals.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleConstants {
    pub tax_year: i32,
    pub standard_deduction: PerFilingStatus<Decimal>,
    pub ss_wage_base: Decimal,
    pub ss_tax_rate: Decimal,
    pub medicare_tax_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold: PerFilingStatus<Decimal>,
    pub net_earnings_factor: Decimal,
    pub se_tax_deduction_rate: Decimal,
    pub safe_harbor_agi_threshold: Decimal,
    pub safe_harbor_high_income_multiplier: Decimal,
    pub safe_harbor_standard_multiplier: Decimal,
    pub current_year_avoidance_multiplier: Decimal,
    pub payment_due_dates: [NaiveDate; 4],
}

/// A single record from the brackets CSV file.
///
/// - `tax_year`: the tax year the bracket belongs to
/// - `filing_status`: `single` or `married` (`S` and `MFJ` also accepted)
/// - `lower_bound`: first dollar taxed at this rate
/// - `upper_bound`: last dollar taxed at this rate (empty for unlimited)
/// - `rate`: the marginal rate as a decimal (e.g. `0.10` for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub filing_status: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Builds validated [`TaxRuleSet`]s from data files.
///
/// A tax year directory holds `rules.toml` with the scalar values and
/// `brackets.csv` with the bracket table. Bracket rows for other tax years
/// are ignored, so one CSV may carry several years.
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, RuleSetLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse the scalar rule values from TOML text.
    pub fn parse_constants(text: &str) -> Result<RuleConstants, RuleSetLoaderError> {
        Ok(toml::from_str(text)?)
    }

    /// Combine constants and bracket rows into a rule set and validate it.
    ///
    /// Rows are grouped by filing status and ordered by lower bound.
    ///
    /// # Errors
    /// * [`RuleSetLoaderError::UnknownFilingStatus`] for an unrecognized
    ///   status code in a row of the matching year.
    /// * [`RuleSetLoaderError::Invalid`] when the assembled table fails
    ///   [`TaxRuleSet::validate`].
    pub fn assemble(
        constants: RuleConstants,
        records: &[BracketRecord],
    ) -> Result<TaxRuleSet, RuleSetLoaderError> {
        let mut by_status: HashMap<FilingStatus, Vec<TaxBracket>> = HashMap::new();
        let mut skipped = 0usize;

        for record in records {
            if record.tax_year != constants.tax_year {
                skipped += 1;
                continue;
            }
            let status = FilingStatus::parse(&record.filing_status).ok_or_else(|| {
                RuleSetLoaderError::UnknownFilingStatus(record.filing_status.clone())
            })?;
            by_status.entry(status).or_default().push(TaxBracket::new(
                record.lower_bound,
                record.upper_bound,
                record.rate,
            ));
        }
        if skipped > 0 {
            debug!(
                tax_year = constants.tax_year,
                skipped, "Ignored bracket rows for other tax years"
            );
        }

        let mut take = |status: FilingStatus| {
            let mut brackets = by_status.remove(&status).unwrap_or_default();
            brackets.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
            brackets
        };
        let brackets = PerFilingStatus::new(
            take(FilingStatus::Single),
            take(FilingStatus::MarriedJoint),
        );

        let rules = TaxRuleSet {
            tax_year: constants.tax_year,
            standard_deduction: constants.standard_deduction,
            ss_wage_base: constants.ss_wage_base,
            ss_tax_rate: constants.ss_tax_rate,
            medicare_tax_rate: constants.medicare_tax_rate,
            additional_medicare_rate: constants.additional_medicare_rate,
            additional_medicare_threshold: constants.additional_medicare_threshold,
            net_earnings_factor: constants.net_earnings_factor,
            se_tax_deduction_rate: constants.se_tax_deduction_rate,
            safe_harbor_agi_threshold: constants.safe_harbor_agi_threshold,
            safe_harbor_high_income_multiplier: constants.safe_harbor_high_income_multiplier,
            safe_harbor_standard_multiplier: constants.safe_harbor_standard_multiplier,
            current_year_avoidance_multiplier: constants.current_year_avoidance_multiplier,
            brackets,
            payment_due_dates: constants.payment_due_dates,
        };
        rules.validate()?;

        Ok(rules)
    }

    /// Load `rules.toml` and `brackets.csv` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<TaxRuleSet, RuleSetLoaderError> {
        let constants_path = dir.join(CONSTANTS_FILE);
        let text = fs::read_to_string(&constants_path).map_err(|source| RuleSetLoaderError::Io {
            path: constants_path.clone(),
            source,
        })?;
        let constants = Self::parse_constants(&text)?;

        let brackets_path = dir.join(BRACKETS_FILE);
        let file = fs::File::open(&brackets_path).map_err(|source| RuleSetLoaderError::Io {
            path: brackets_path.clone(),
            source,
        })?;
        let records = Self::parse_brackets(file)?;

        let rules = Self::assemble(constants, &records)?;
        info!(
            tax_year = rules.tax_year,
            dir = %dir.display(),
            "Loaded tax rules"
        );
        Ok(rules)
    }
}
