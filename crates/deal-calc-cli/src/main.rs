mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use deal_calc_core::Assumptions;

use commands::dscr::{DscrArgs, QuickDscrArgs};
use commands::flip::FlipArgs;
use commands::loan::{AmortizationArgs, CashOnCashArgs, LtvArgs};

/// Real-estate deal screening: DSCR, flips and loan math
#[derive(Parser)]
#[command(
    name = "dealcalc",
    version,
    about = "Real-estate deal screening calculations",
    long_about = "A CLI for screening investment property deals with decimal precision. \
                  Supports DSCR loan qualification, quick DSCR on estimated rent, \
                  fix-and-flip profitability, amortization schedules, LTV and \
                  cash-on-cash return."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON or YAML file overriding the default underwriting assumptions
    #[arg(long, global = true)]
    assumptions: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a DSCR loan qualification test
    Dscr(DscrArgs),
    /// DSCR on heuristic rent, taxes and insurance from a property value
    QuickDscr(QuickDscrArgs),
    /// Fix-and-flip profitability
    Flip(FlipArgs),
    /// Annual amortization schedule for a fixed-rate loan
    Amortization(AmortizationArgs),
    /// Loan-to-value ratio
    Ltv(LtvArgs),
    /// Cash-on-cash return
    CashOnCash(CashOnCashArgs),
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

fn load_assumptions(path: Option<&str>) -> Result<Assumptions, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::file::read_assumptions(p),
        None => Ok(Assumptions::default()),
    }
}

fn run(
    command: Commands,
    assumptions_path: Option<&str>,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(assumptions_path)?;

    match command {
        Commands::Dscr(args) => commands::dscr::run_dscr(args, &assumptions),
        Commands::QuickDscr(args) => commands::dscr::run_quick_dscr(args, &assumptions),
        Commands::Flip(args) => commands::flip::run_flip(args),
        Commands::Amortization(args) => commands::loan::run_amortization(args, &assumptions),
        Commands::Ltv(args) => commands::loan::run_ltv(args),
        Commands::CashOnCash(args) => commands::loan::run_cash_on_cash(args),
        Commands::Version => Err("version is handled before dispatch".into()),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if matches!(cli.command, Commands::Version) {
        println!("dealcalc {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    match run(cli.command, cli.assumptions.as_deref()) {
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
