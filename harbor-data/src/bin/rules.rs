use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use harbor_core::{FilingStatus, format_currency, format_percentage};
use harbor_data::RuleSetLoader;

/// Validate a tax year rule directory and print its contents.
///
/// The directory must contain:
/// - rules.toml: scalar values (deductions, SE tax rates, Safe Harbor
///   thresholds, payment due dates)
/// - brackets.csv: columns tax_year, filing_status, lower_bound,
///   upper_bound (empty for unlimited), rate
#[derive(Parser, Debug)]
#[command(name = "harbor-rules")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing rules.toml and brackets.csv
    #[arg(short, long)]
    dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let rules = RuleSetLoader::load_dir(&args.dir)
        .with_context(|| format!("Failed to load rules from: {}", args.dir.display()))?;

    println!("Tax year {} rules are valid.", rules.tax_year);
    println!();
    println!(
        "Social Security: {} up to {}",
        format_percentage(rules.ss_tax_rate),
        format_currency(rules.ss_wage_base)
    );
    println!(
        "Safe Harbor: {} above {} prior-year AGI, otherwise {}",
        format_percentage(rules.safe_harbor_high_income_multiplier),
        format_currency(rules.safe_harbor_agi_threshold),
        format_percentage(rules.safe_harbor_standard_multiplier)
    );

    for status in FilingStatus::all() {
        println!();
        println!(
            "{} (standard deduction {})",
            status.label(),
            format_currency(*rules.standard_deduction.get(*status))
        );
        for bracket in rules.brackets_for(*status) {
            let upper = bracket
                .upper_bound
                .map(format_currency)
                .unwrap_or_else(|| "and up".to_string());
            println!(
                "  {:>4}  {} - {}",
                format_percentage(bracket.rate),
                format_currency(bracket.lower_bound),
                upper
            );
        }
    }

    println!();
    for (quarter, date) in rules.payment_due_dates.iter().enumerate() {
        println!("Q{} payment due {}", quarter + 1, date);
    }

    Ok(())
}
