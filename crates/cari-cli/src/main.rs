mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::aging::AgingArgs;
use commands::checks::CheckTransitionArgs;
use commands::ledger::{BalanceArgs, NextCodeArgs, StatementArgs};
use commands::risk::{PolicyArgs, RiskArgs};

/// Customer ledger aging and risk reports
#[derive(Parser)]
#[command(
    name = "cari",
    version,
    about = "Customer ledger aging and risk reports",
    long_about = "Reads customer ledger exports (JSON file or stdin) and produces \
                  receivables aging, customer risk scores, balance reconciliation, \
                  account statements and check lifecycle checks with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Report date (YYYY-MM-DD); defaults to today
    #[arg(long, global = true)]
    as_of: Option<String>,

    /// Risk policy file (YAML or JSON); falls back to $CARI_POLICY, then built-in weights
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Receivables aging by days past due
    Aging(AgingArgs),
    /// Customer risk scores and recommendations
    Risk(RiskArgs),
    /// Print the effective risk policy
    Policy(PolicyArgs),
    /// Validate a check status change
    CheckTransition(CheckTransitionArgs),
    /// Recompute and reconcile a customer balance
    Balance(BalanceArgs),
    /// Customer account statement with running balance
    Statement(StatementArgs),
    /// Generate the next customer code
    NextCode(NextCodeArgs),
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

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Report settings. Exits with code 2 on a bad `--as-of` or policy file.
fn load_settings(as_of: Option<&str>, policy: Option<&str>) -> config::Settings {
    match config::Settings::load(as_of, policy) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(2);
        }
    }
}

/// Run one command. Only the report commands call `settings`, so a broken
/// policy file never blocks `version` or the ledger utilities.
/// `Ok(None)` means the command printed its own output.
fn run_command(
    command: Commands,
    settings: impl FnOnce() -> config::Settings,
) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    let value = match command {
        Commands::Aging(args) => commands::aging::run_aging(args, &settings())?,
        Commands::Risk(args) => commands::risk::run_risk(args, &settings())?,
        Commands::Policy(args) => commands::risk::run_policy(args, &settings())?,
        Commands::CheckTransition(args) => commands::checks::run_check_transition(args)?,
        Commands::Balance(args) => commands::ledger::run_balance(args)?,
        Commands::Statement(args) => commands::ledger::run_statement(args)?,
        Commands::NextCode(args) => commands::ledger::run_next_code(args)?,
        Commands::Version => {
            println!("cari {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
    };
    Ok(Some(value))
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let (as_of, policy) = (cli.as_of.clone(), cli.policy.clone());
    let result = run_command(cli.command, || load_settings(as_of.as_deref(), policy.as_deref()));

    match result {
        Ok(Some(value)) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_settings() -> config::Settings {
        panic!("settings loaded for a command that does not use them");
    }

    #[test]
    fn test_version_skips_settings() {
        let cli = Cli::try_parse_from(["cari", "version", "--policy", "/definitely/not/here.yaml"])
            .unwrap();
        assert!(run_command(cli.command, no_settings).unwrap().is_none());
    }

    #[test]
    fn test_next_code_skips_settings() {
        let cli = Cli::try_parse_from([
            "cari",
            "next-code",
            "--existing",
            "CR-0002",
            "--policy",
            "/definitely/not/here.yaml",
        ])
        .unwrap();
        let value = run_command(cli.command, no_settings).unwrap().unwrap();
        assert_eq!(value["result"]["code"], "CR-0003");
    }

    #[test]
    fn test_policy_command_uses_settings() {
        let cli = Cli::try_parse_from(["cari", "policy"]).unwrap();
        let value = run_command(cli.command, || {
            config::Settings::load(Some("2024-06-30"), None).unwrap()
        })
        .unwrap()
        .unwrap();
        assert_eq!(value["assumptions"]["source"], "built-in");
    }
}
