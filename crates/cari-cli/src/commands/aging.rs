use clap::Args;
use serde_json::Value;

use cari_core::source::run_aging_report;

use super::{customer_filter, load_ledger};
use crate::config::Settings;

/// Arguments for the receivables aging report
#[derive(Args)]
pub struct AgingArgs {
    /// Path to a ledger export (customers, movements, checks)
    #[arg(long)]
    pub input: Option<String>,

    /// Restrict to these customer ids (comma-separated or repeated)
    #[arg(long = "customer", value_delimiter = ',')]
    pub customers: Vec<String>,

    /// Keep customers without outstanding debt
    #[arg(long)]
    pub include_zero: bool,
}

pub fn run_aging(args: AgingArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = load_ledger(args.input.as_deref())?;
    let ids = customer_filter(&args.customers);
    let result = run_aging_report(&ledger, ids.as_ref(), settings.as_of, args.include_zero)?;
    Ok(serde_json::to_value(result)?)
}
