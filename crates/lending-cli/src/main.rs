mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::risk::{EligibilityArgs, RiskScoreArgs};
use commands::schedule::ScheduleArgs;

/// Loan risk scoring, eligibility and repayment schedules
#[derive(Parser)]
#[command(
    name = "lend",
    version,
    about = "Loan risk scoring, eligibility and repayment schedules",
    long_about = "A CLI for the loan financial engine with decimal precision. \
                  Scores borrower default risk, estimates the maximum eligible \
                  principal and generates installment schedules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Lending policy file (YAML or JSON) overriding the standard model
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Log engine events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a borrower's probability of default and risk tier
    RiskScore(RiskScoreArgs),
    /// Estimate the maximum eligible principal from monthly income
    Eligibility(EligibilityArgs),
    /// Generate an installment schedule
    Schedule(ScheduleArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "lending_core=debug,lend=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = match input::policy::load_policy(cli.policy.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::RiskScore(args) => commands::risk::run_risk_score(args, &policy),
        Commands::Eligibility(args) => commands::risk::run_eligibility(args, &policy),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Version => {
            println!("lend {}", env!("CARGO_PKG_VERSION"));
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
