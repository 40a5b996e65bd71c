mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::commissions::CommissionsArgs;
use commands::payback::PaybackArgs;
use commands::quote::ProposalArgs;

/// Fiber proposal pricing: discounts, commissions, payback and DRE
#[derive(Parser)]
#[command(
    name = "fpc",
    version,
    about = "Fiber proposal pricing: discounts, commissions, payback and DRE",
    long_about = "A CLI for pricing fiber internet proposals with decimal precision. \
                  Resolves discounts and partner markup, computes seller and channel \
                  commissions, simulates payback and builds 12 to 60-month DRE statements."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Pricing configuration file (plans, commission tables, taxes; JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log pipeline details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a full proposal: monthly price, commissions, payback, DRE and summary
    Quote(ProposalArgs),
    /// Build the 12/24/36/48/60-month DRE statements
    Dre(ProposalArgs),
    /// Commission breakdown for a resolved monthly price
    Commissions(CommissionsArgs),
    /// Payback simulation and validation
    Payback(PaybackArgs),
    /// List the plan catalog
    Plans,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match input::file::read_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::quote::run_quote(args, &config),
        Commands::Dre(args) => commands::dre::run_dre(args, &config, &cli.output),
        Commands::Commissions(args) => commands::commissions::run_commissions(args, &config),
        Commands::Payback(args) => commands::payback::run_payback(args, &config),
        Commands::Plans => commands::plans::run_plans(&config),
        Commands::Version => {
            println!("fpc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
