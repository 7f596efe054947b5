use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use cari_core::checks::{CheckEvent, CheckStatus, CheckType};
use cari_core::risk::{score_risk, RiskFactors, RiskPolicy};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Aging
// ---------------------------------------------------------------------------

#[napi]
pub fn aging_report(input_json: String) -> NapiResult<String> {
    let input: cari_core::aging::report::AgingReportInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        cari_core::aging::report::build_aging_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[napi]
pub fn risk_report(input_json: String) -> NapiResult<String> {
    let input: cari_core::risk::RiskReportInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cari_core::risk::build_risk_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ScoreInput {
    factors: RiskFactors,
    #[serde(default)]
    policy: RiskPolicy,
}

/// Score precomputed factors without a ledger.
#[napi]
pub fn score_customer(input_json: String) -> NapiResult<String> {
    let input: ScoreInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.policy.validate().map_err(to_napi_error)?;
    let scored = score_risk(&input.factors, &input.policy);
    serde_json::to_string(&scored).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TransitionInput {
    status: CheckStatus,
    event: CheckEvent,
    #[serde(default = "received")]
    check_type: CheckType,
}

fn received() -> CheckType {
    CheckType::Received
}

#[napi]
pub fn check_transition(input_json: String) -> NapiResult<String> {
    let input: TransitionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let to = input
        .status
        .transition(input.check_type, input.event)
        .map_err(to_napi_error)?;
    let output = serde_json::json!({
        "check_type": input.check_type,
        "from": input.status,
        "event": input.event,
        "to": to,
        "terminal": to.is_terminal(),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[napi]
pub fn customer_balance(input_json: String) -> NapiResult<String> {
    let input: cari_core::ledger::balance::BalanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cari_core::ledger::balance::analyze_balance(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn account_statement(input_json: String) -> NapiResult<String> {
    let input: cari_core::ledger::statement::StatementInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        cari_core::ledger::statement::account_statement(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn next_customer_code(prefix: String, existing: Vec<String>) -> NapiResult<String> {
    cari_core::ledger::codes::next_customer_code(&prefix, existing.iter().map(String::as_str))
        .map_err(to_napi_error)
}
