use clap::Args;
use serde::Serialize;
use serde_json::Value;

use cari_core::checks::{CheckEvent, CheckStatus, CheckType};

/// Arguments for validating a check status change
#[derive(Args)]
pub struct CheckTransitionArgs {
    /// Current status: portfolio, in_bank, endorsed, collected, returned, protested
    #[arg(long)]
    pub status: String,

    /// Event: deposit_to_bank, withdraw_from_bank, endorse, collect, return, protest
    #[arg(long)]
    pub event: String,

    /// Check type: received or issued
    #[arg(long, default_value = "received")]
    pub check_type: String,
}

#[derive(Debug, Serialize)]
struct TransitionOutput {
    check_type: CheckType,
    from: CheckStatus,
    event: CheckEvent,
    to: CheckStatus,
    terminal: bool,
}

/// Parse a snake_case enum name through its serde representation.
fn parse_enum<T: serde::de::DeserializeOwned>(
    flag: &str,
    raw: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let normalized = raw.trim().to_lowercase().replace('-', "_");
    serde_json::from_value(Value::String(normalized))
        .map_err(|_| format!("Unknown value '{}' for --{}", raw, flag).into())
}

pub fn run_check_transition(
    args: CheckTransitionArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let check_type: CheckType = parse_enum("check-type", &args.check_type)?;
    let from: CheckStatus = parse_enum("status", &args.status)?;
    let event: CheckEvent = parse_enum("event", &args.event)?;

    let to = from.transition(check_type, event)?;
    let output = TransitionOutput {
        check_type,
        from,
        event,
        to,
        terminal: to.is_terminal(),
    };
    Ok(serde_json::json!({ "result": output }))
}
