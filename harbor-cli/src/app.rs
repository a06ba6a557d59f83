use std::path::Path;

use anyhow::{Context, Result};
use harbor_core::{
    FilingStatus, InputField, InputStore, QuarterlyInstallment, StoreRegistry, StoredInputs,
    TaxEngine, TaxInputs, TaxResult, TaxRuleSet, parse_currency,
};
use harbor_data::RuleSetLoader;
use harbor_store_sqlite::SqliteStoreFactory;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Registry with every store backend the binary ships with.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::with_memory();
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

/// Rules from `dir`, or the built-in 2026 table when no directory is given.
pub fn load_rules(dir: Option<&Path>) -> Result<TaxRuleSet> {
    match dir {
        Some(dir) => {
            let rules = RuleSetLoader::load_dir(dir)
                .with_context(|| format!("Failed to load rules from: {}", dir.display()))?;
            Ok(rules)
        }
        None => {
            debug!("Using built-in 2026 rules");
            Ok(TaxRuleSet::tax_year_2026())
        }
    }
}

/// Raw values given on the command line. They take precedence over the
/// saved inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOverrides {
    pub filing_status: Option<String>,
    pub prior_year_tax: Option<String>,
    pub prior_year_agi: Option<String>,
    pub current_year_profit: Option<String>,
}

impl InputOverrides {
    pub fn entries(&self) -> Vec<(InputField, &str)> {
        [
            (InputField::FilingStatus, &self.filing_status),
            (InputField::PriorYearTax, &self.prior_year_tax),
            (InputField::PriorYearAgi, &self.prior_year_agi),
            (InputField::CurrentYearProfit, &self.current_year_profit),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn apply_to(
        &self,
        inputs: &mut StoredInputs,
    ) {
        for (field, value) in self.entries() {
            inputs.set(field, value.to_string());
        }
    }

    /// Replaces the filing status with its stored code, failing when it is
    /// not recognised. Amounts are left as typed.
    pub fn validated(&self) -> Result<Self> {
        let filing_status = self
            .filing_status
            .as_deref()
            .map(filing_status_code)
            .transpose()?
            .map(str::to_string);

        Ok(Self {
            filing_status,
            ..self.clone()
        })
    }
}

fn filing_status_code(value: &str) -> Result<&'static str> {
    FilingStatus::parse(value)
        .map(|status| status.as_str())
        .with_context(|| format!("Unknown filing status '{value}'; use single or married"))
}

/// Everything one `estimate` run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub tax_year: i32,
    pub inputs: TaxInputs,
    pub result: TaxResult,
    pub schedule: [QuarterlyInstallment; 4],
}

impl Estimate {
    /// Runs the engine on `inputs` after normalizing them, and keeps the
    /// normalized values so reports show what was calculated.
    pub fn compute(
        inputs: TaxInputs,
        rules: &TaxRuleSet,
    ) -> Self {
        let inputs = inputs.normalized();
        let engine = TaxEngine::new(rules);
        let result = engine.calculate(&inputs);
        let schedule = engine.quarterly_schedule(&result);

        Self {
            tax_year: rules.tax_year,
            inputs,
            result,
            schedule,
        }
    }
}

/// Merges `overrides` over the saved inputs and runs the engine.
///
/// With `save`, the overrides are written back to the store first. An
/// unknown filing status fails before anything is loaded or saved.
pub async fn estimate(
    store: &dyn InputStore,
    rules: &TaxRuleSet,
    overrides: &InputOverrides,
    save: bool,
) -> Result<Estimate> {
    let overrides = overrides.validated()?;
    let mut stored = store
        .load_all()
        .await
        .context("Failed to load saved inputs")?;

    for (field, value) in overrides.entries() {
        if field != InputField::FilingStatus && !parse_currency(value).valid {
            warn!(field = %field, value = %value, "Amount not recognised; using zero");
        }
    }
    overrides.apply_to(&mut stored);

    if save {
        for (field, value) in overrides.entries() {
            store
                .set(field, value)
                .await
                .with_context(|| format!("Failed to save {field}"))?;
        }
        info!(fields = overrides.entries().len(), "Saved inputs");
    }

    Ok(Estimate::compute(stored.to_tax_inputs(), rules))
}

/// Stores one raw value.
///
/// Amounts are kept verbatim, the way a form field holds whatever was typed.
/// Filing statuses must be recognised and are stored by their code.
pub async fn set_input(
    store: &dyn InputStore,
    field: InputField,
    value: &str,
) -> Result<()> {
    let value = match field {
        InputField::FilingStatus => filing_status_code(value)?,
        _ => {
            if !parse_currency(value).valid {
                warn!(field = %field, value = %value, "Amount not recognised; it counts as zero");
            }
            value
        }
    };

    store
        .set(field, value)
        .await
        .with_context(|| format!("Failed to save {field}"))
}

pub async fn unset_input(
    store: &dyn InputStore,
    field: InputField,
) -> Result<()> {
    store
        .remove(field)
        .await
        .with_context(|| format!("Failed to remove {field}"))
}

pub async fn clear_inputs(store: &dyn InputStore) -> Result<()> {
    store.clear().await.context("Failed to clear saved inputs")?;
    info!("Cleared saved inputs");
    Ok(())
}

pub async fn show_inputs(store: &dyn InputStore) -> Result<StoredInputs> {
    store.load_all().await.context("Failed to load saved inputs")
}

/// Maps a command-line field name to an [`InputField`].
///
/// Accepts the storage keys and their kebab-case spellings.
pub fn parse_field(name: &str) -> Result<InputField, String> {
    InputField::from_key(&name.trim().replace('-', "_")).ok_or_else(|| {
        let known: Vec<&str> = InputField::all().iter().map(InputField::key).collect();
        format!("unknown field '{name}'; expected one of: {}", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use harbor_core::{MemoryInputStore, StoreConfig};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn overrides(
        status: Option<&str>,
        tax: Option<&str>,
        agi: Option<&str>,
        profit: Option<&str>,
    ) -> InputOverrides {
        InputOverrides {
            filing_status: status.map(str::to_string),
            prior_year_tax: tax.map(str::to_string),
            prior_year_agi: agi.map(str::to_string),
            current_year_profit: profit.map(str::to_string),
        }
    }

    fn scenario() -> InputOverrides {
        overrides(Some("single"), Some("$25,000"), Some("150,000"), Some("200000"))
    }

    #[test]
    fn registry_has_both_backends() {
        assert_eq!(build_registry().available_backends(), vec!["memory", "sqlite"]);
    }

    #[tokio::test]
    async fn registry_opens_in_memory_sqlite() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };

        let store = build_registry().create(&config).await.unwrap();

        assert_eq!(store.load_all().await.unwrap(), StoredInputs::default());
    }

    #[test]
    fn builtin_rules_without_dir() {
        assert_eq!(load_rules(None).unwrap(), TaxRuleSet::tax_year_2026());
    }

    #[test]
    fn missing_rules_dir_names_the_path() {
        let err = load_rules(Some(Path::new("no/such/rules"))).unwrap_err();

        assert!(err.to_string().contains("no/such/rules"));
    }

    #[test]
    fn overrides_only_list_given_fields() {
        let given = overrides(None, Some("1"), None, Some("2"));

        assert_eq!(
            given.entries(),
            vec![
                (InputField::PriorYearTax, "1"),
                (InputField::CurrentYearProfit, "2"),
            ]
        );
        assert!(InputOverrides::default().is_empty());
    }

    #[tokio::test]
    async fn estimate_from_overrides() {
        let store = MemoryInputStore::new();
        let rules = TaxRuleSet::tax_year_2026();

        let estimate = estimate(&store, &rules, &scenario(), false).await.unwrap();

        assert_eq!(estimate.tax_year, 2026);
        assert_eq!(estimate.inputs.prior_year_tax, dec!(25000));
        assert_eq!(estimate.result.quarterly_payment, dec!(6250));
        assert_eq!(estimate.schedule[3].amount, dec!(6250));
        assert_eq!(store.load_all().await.unwrap(), StoredInputs::default());
    }

    #[tokio::test]
    async fn overrides_win_over_saved_inputs() {
        let store = MemoryInputStore::new();
        let rules = TaxRuleSet::tax_year_2026();
        store.set(InputField::PriorYearTax, "40000").await.unwrap();
        store.set(InputField::CurrentYearProfit, "200000").await.unwrap();

        let estimate = estimate(
            &store,
            &rules,
            &overrides(None, Some("25000"), None, None),
            false,
        )
        .await
        .unwrap();

        assert_eq!(estimate.inputs.prior_year_tax, dec!(25000));
        assert_eq!(estimate.inputs.current_year_profit, dec!(200000));
    }

    #[tokio::test]
    async fn save_keeps_raw_override_text() {
        let store = MemoryInputStore::new();
        let rules = TaxRuleSet::tax_year_2026();

        estimate(&store, &rules, &scenario(), true).await.unwrap();

        let saved = store.load_all().await.unwrap();
        assert_eq!(saved.prior_year_tax, "$25,000");
        assert_eq!(saved.prior_year_agi, "150,000");
    }

    #[tokio::test]
    async fn unparseable_override_counts_as_zero() {
        let store = MemoryInputStore::new();
        let rules = TaxRuleSet::tax_year_2026();

        let estimate = estimate(
            &store,
            &rules,
            &overrides(None, Some("lots"), None, None),
            false,
        )
        .await
        .unwrap();

        assert_eq!(estimate.inputs.prior_year_tax, dec!(0));
    }

    #[tokio::test]
    async fn estimate_rejects_unknown_filing_status() {
        let store = MemoryInputStore::new();
        let rules = TaxRuleSet::tax_year_2026();
        let typo = InputOverrides {
            filing_status: Some("maried".to_string()),
            ..scenario()
        };

        let err = estimate(&store, &rules, &typo, true).await.unwrap_err();

        assert!(err.to_string().contains("maried"));
        assert_eq!(store.load_all().await.unwrap(), StoredInputs::default());
    }

    #[tokio::test]
    async fn estimate_saves_filing_status_code() {
        let store = MemoryInputStore::new();
        let rules = TaxRuleSet::tax_year_2026();
        let joint = InputOverrides {
            filing_status: Some("MFJ".to_string()),
            ..scenario()
        };

        let estimate = estimate(&store, &rules, &joint, true).await.unwrap();

        assert_eq!(estimate.inputs.filing_status, FilingStatus::MarriedJoint);
        assert_eq!(
            store.get(InputField::FilingStatus).await.unwrap(),
            Some("married".to_string())
        );
        assert_eq!(
            store.get(InputField::PriorYearTax).await.unwrap(),
            Some("$25,000".to_string())
        );
    }

    #[test]
    fn estimate_reports_normalized_inputs() {
        let rules = TaxRuleSet::tax_year_2026();
        let inputs = TaxInputs::new(FilingStatus::Single, dec!(25000), dec!(150000), dec!(-500));

        let estimate = Estimate::compute(inputs, &rules);

        assert_eq!(estimate.inputs.current_year_profit, dec!(0));
        assert_eq!(estimate.result.self_employment_tax.total_se_tax, dec!(0));
    }

    #[tokio::test]
    async fn set_input_normalizes_filing_status() {
        let store = MemoryInputStore::new();

        set_input(&store, InputField::FilingStatus, "MFJ").await.unwrap();

        assert_eq!(
            store.get(InputField::FilingStatus).await.unwrap(),
            Some("married".to_string())
        );
    }

    #[tokio::test]
    async fn set_input_rejects_unknown_filing_status() {
        let store = MemoryInputStore::new();

        let err = set_input(&store, InputField::FilingStatus, "widowed")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("widowed"));
        assert_eq!(store.get(InputField::FilingStatus).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unset_and_clear() {
        let store = MemoryInputStore::new();
        set_input(&store, InputField::PriorYearAgi, "150000").await.unwrap();
        set_input(&store, InputField::PriorYearTax, "25000").await.unwrap();

        unset_input(&store, InputField::PriorYearAgi).await.unwrap();
        assert_eq!(show_inputs(&store).await.unwrap().prior_year_agi, "");
        assert_eq!(show_inputs(&store).await.unwrap().prior_year_tax, "25000");

        clear_inputs(&store).await.unwrap();
        assert_eq!(show_inputs(&store).await.unwrap(), StoredInputs::default());
    }

    #[test]
    fn parse_field_names() {
        assert_eq!(parse_field("prior_year_tax"), Ok(InputField::PriorYearTax));
        assert_eq!(parse_field("prior-year-agi"), Ok(InputField::PriorYearAgi));
        assert!(parse_field("email").unwrap_err().contains("filing_status"));
    }
}
