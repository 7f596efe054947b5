use clap::{Args, ValueEnum};
use serde_json::Value;

use cari_core::risk::RiskLevel;
use cari_core::source::run_risk_report;

use super::{customer_filter, load_ledger};
use crate::config::Settings;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MinLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl From<MinLevel> for RiskLevel {
    fn from(level: MinLevel) -> Self {
        match level {
            MinLevel::Low => RiskLevel::Low,
            MinLevel::Medium => RiskLevel::Medium,
            MinLevel::High => RiskLevel::High,
            MinLevel::Critical => RiskLevel::Critical,
        }
    }
}

/// Arguments for the customer risk report
#[derive(Args)]
pub struct RiskArgs {
    /// Path to a ledger export (customers, movements, checks)
    #[arg(long)]
    pub input: Option<String>,

    /// Restrict to these customer ids (comma-separated or repeated)
    #[arg(long = "customer", value_delimiter = ',')]
    pub customers: Vec<String>,

    /// Only list customers at or above this level (summary still covers all)
    #[arg(long)]
    pub min_level: Option<MinLevel>,
}

/// Arguments for printing the effective policy
#[derive(Args)]
pub struct PolicyArgs {}

pub fn run_risk(args: RiskArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = load_ledger(args.input.as_deref())?;
    let ids = customer_filter(&args.customers);
    let mut result = run_risk_report(&ledger, ids.as_ref(), settings.as_of, &settings.policy)?;

    if let Some(min) = args.min_level {
        let min = RiskLevel::from(min);
        result.result.rows.retain(|row| row.risk_level >= min);
    }

    Ok(serde_json::to_value(result)?)
}

pub fn run_policy(_args: PolicyArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let warnings = settings.policy.validate()?;
    Ok(serde_json::json!({
        "result": settings.policy,
        "methodology": "Effective risk policy",
        "assumptions": { "source": settings.policy_source },
        "warnings": warnings,
        "max_factor_points": settings.policy.max_factor_points(),
    }))
}
