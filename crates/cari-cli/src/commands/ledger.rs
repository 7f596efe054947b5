use clap::Args;
use serde_json::Value;

use cari_core::ledger::balance::{self, BalanceInput};
use cari_core::ledger::codes::next_customer_code;
use cari_core::ledger::statement::{self, StatementInput};

use crate::input;

/// Arguments for balance reconciliation
#[derive(Args)]
pub struct BalanceArgs {
    /// Path to JSON input file ({ customer, movements })
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an account statement
#[derive(Args)]
pub struct StatementArgs {
    /// Path to JSON input file ({ customer, movements, from, to })
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for customer code generation
#[derive(Args)]
pub struct NextCodeArgs {
    /// Code prefix, e.g. CR for customers or TD for suppliers
    #[arg(long, default_value = "CR")]
    pub prefix: String,

    /// Codes already in use (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub existing: Vec<String>,

    /// Path to a JSON array of codes in use (read instead of --existing)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_balance(args: BalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: BalanceInput = input::read_input(args.input.as_deref())?;
    let result = balance::analyze_balance(&input_data)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_statement(args: StatementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: StatementInput = input::read_input(args.input.as_deref())?;
    let result = statement::account_statement(&input_data)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_next_code(args: NextCodeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let existing: Vec<String> = match args.input {
        Some(ref path) => input::file::read_json(path)?,
        None => args.existing,
    };
    let code = next_customer_code(&args.prefix, existing.iter().map(String::as_str))?;
    Ok(serde_json::json!({
        "result": {
            "code": code,
            "prefix": args.prefix.trim(),
            "codes_in_use": existing.len(),
        }
    }))
}
