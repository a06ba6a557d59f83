use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use harbor_cli::app::{self, InputOverrides};
use harbor_cli::config::{AppConfig, DEFAULT_CONFIG_FILE};
use harbor_cli::logging;
use harbor_cli::report::{Breakdown, SavedInputs, Summary};
use harbor_core::InputField;
use harbor_relay::SubscribeRelay;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Safe Harbor quarterly estimated-tax calculator.
///
/// Compares the prior-year Safe Harbor minimum against 90% of this year's
/// projected tax and recommends the lower quarterly payment.
#[derive(Debug, Parser)]
#[command(name = "safe-harbor", version, about)]
struct Cli {
    /// Config file; defaults are used when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Store backend, overriding the config file (`memory` or `sqlite`).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Store connection string, overriding the config file.
    /// For SQLite this is a file path (e.g. `safe-harbor.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log filter: a level such as `debug` or a full `RUST_LOG` directive.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on the terminal.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate the recommended quarterly payment.
    Estimate(EstimateArgs),

    /// Show or edit the saved inputs.
    Inputs {
        #[command(subcommand)]
        action: InputsAction,
    },

    /// Run the newsletter subscribe relay.
    ///
    /// Credentials are read from BEEHIIV_API_KEY and BEEHIIV_PUB_ID.
    Serve {
        /// Address to listen on, overriding the config file.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

#[derive(Debug, Args)]
struct EstimateArgs {
    /// `single` or `married`.
    #[arg(long)]
    filing_status: Option<String>,

    /// Last year's total tax, e.g. `$25,000`.
    #[arg(long, allow_hyphen_values = true)]
    prior_year_tax: Option<String>,

    /// Last year's adjusted gross income.
    #[arg(long, allow_hyphen_values = true)]
    prior_year_agi: Option<String>,

    /// This year's projected net self-employment profit.
    #[arg(long, allow_hyphen_values = true)]
    profit: Option<String>,

    /// Rule directory with rules.toml and brackets.csv.
    #[arg(long)]
    rules_dir: Option<PathBuf>,

    /// Save the given values as the new inputs.
    #[arg(long)]
    save: bool,

    /// Print the result as JSON.
    #[arg(long, conflicts_with = "summary")]
    json: bool,

    /// Print the one-page summary document.
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Subcommand)]
enum InputsAction {
    /// Print the saved inputs.
    Show,

    /// Save one input.
    Set {
        #[arg(value_parser = app::parse_field)]
        field: InputField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Forget one input.
    Unset {
        #[arg(value_parser = app::parse_field)]
        field: InputField,
    },

    /// Forget every saved input.
    Clear,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_default_logging();
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if cli.quiet {
        logging::set_terminal_enabled(false)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(backend) = cli.backend {
        config.store.backend = backend;
    }
    if let Some(db) = cli.db {
        config.store.connection_string = db;
    }

    match cli.command {
        Command::Estimate(args) => run_estimate(&config, args).await,
        Command::Inputs { action } => run_inputs(&config, action).await,
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(config.relay.bind);
            harbor_relay::serve(addr, SubscribeRelay::from_env())
                .await
                .with_context(|| format!("Relay failed on {addr}"))
        }
    }
}

async fn run_estimate(
    config: &AppConfig,
    args: EstimateArgs,
) -> anyhow::Result<()> {
    let rules_dir = args.rules_dir.as_deref().or(config.rules_dir.as_deref());
    let rules = app::load_rules(rules_dir)?;

    debug!("opening {} store", config.store.backend);
    let store = app::build_registry().create(&config.store).await?;

    let overrides = InputOverrides {
        filing_status: args.filing_status,
        prior_year_tax: args.prior_year_tax,
        prior_year_agi: args.prior_year_agi,
        current_year_profit: args.profit,
    };
    let estimate = app::estimate(&*store, &rules, &overrides, args.save).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else if args.summary {
        print!("{}", Summary::new(&estimate, &rules, Local::now().date_naive()));
    } else {
        print!("{}", Breakdown::new(&estimate, &rules));
    }
    Ok(())
}

async fn run_inputs(
    config: &AppConfig,
    action: InputsAction,
) -> anyhow::Result<()> {
    let store = app::build_registry().create(&config.store).await?;

    match action {
        InputsAction::Show => {
            let stored = app::show_inputs(&*store).await?;
            print!("{}", SavedInputs(&stored));
        }
        InputsAction::Set { field, value } => app::set_input(&*store, field, &value).await?,
        InputsAction::Unset { field } => app::unset_input(&*store, field).await?,
        InputsAction::Clear => app::clear_inputs(&*store).await?,
    }
    Ok(())
}
