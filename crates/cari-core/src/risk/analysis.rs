use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use super::policy::RiskPolicy;
use super::recommend::recommendations;
use super::scorer::{score_risk, FactorBreakdown, RiskFactors, RiskLevel};
use crate::aging::report::validate_customers;
use crate::aging::{aggregate_buckets, average_payment_delay, detect_overdue, AgingBuckets, OverdueSummary};
use crate::checks::{self, count_dishonored, Check, DishonoredChecks};
use crate::ledger::{self, balance::customer_balance, AccountMovement, Customer};
use crate::{types::*, CariResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReportInput {
    pub as_of: NaiveDate,
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub movements: Vec<AccountMovement>,
    /// Any checks may be supplied; only returned/protested ones are scored.
    #[serde(default)]
    pub checks: Vec<Check>,
    #[serde(default)]
    pub policy: RiskPolicy,
}

/// Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub customer_id: CustomerId,
    pub customer_code: String,
    pub customer_name: String,
    pub credit_limit: Money,
    /// Σ debt − Σ credit from the ledger, not the stored balance.
    pub balance: Money,
    pub aging: AgingBuckets,
    #[serde(flatten)]
    pub overdue: OverdueSummary,
    pub dishonored: DishonoredChecks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_payment_delay: Option<Decimal>,
    pub breakdown: FactorBreakdown,
    pub risk_score: Decimal,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total_balance: Money,
    pub total_overdue: Money,
    pub total_dishonored_amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub as_of: NaiveDate,
    pub rows: Vec<RiskAnalysis>,
    pub summary: RiskSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score one customer from their own ledger rows and checks.
///
/// Rows belonging to other customers must be filtered out by the caller.
pub fn analyze_customer(
    customer: &Customer,
    movements: &[&AccountMovement],
    checks: &[&Check],
    as_of: NaiveDate,
    policy: &RiskPolicy,
) -> RiskAnalysis {
    let aging = aggregate_buckets(movements.iter().copied(), as_of);
    let overdue = detect_overdue(movements.iter().copied(), as_of);
    let average_payment_delay = average_payment_delay(movements.iter().copied());
    let dishonored = count_dishonored(checks.iter().copied());
    let balance = customer_balance(movements.iter().copied());

    let factors = RiskFactors {
        credit_limit: customer.credit_limit,
        balance,
        overdue_amount: overdue.overdue_amount,
        overdue_days: overdue.overdue_days,
        returned_check_count: dishonored.returned_count,
        protested_check_count: dishonored.protested_count,
        dishonored_check_amount: dishonored.amount,
        average_payment_delay,
    };

    let scored = score_risk(&factors, policy);
    let recommendations = recommendations(&factors, scored.level);

    tracing::debug!(
        customer = %customer.code,
        score = %scored.score,
        level = %scored.level,
        "scored customer"
    );

    RiskAnalysis {
        customer_id: customer.id.clone(),
        customer_code: customer.code.clone(),
        customer_name: customer.name.clone(),
        credit_limit: customer.credit_limit,
        balance,
        aging,
        overdue,
        dishonored,
        average_payment_delay,
        breakdown: scored.breakdown,
        risk_score: scored.score,
        risk_level: scored.level,
        recommendations,
        warnings: scored.warnings,
    }
}

/// Risk analysis for every active customer-side account.
///
/// Ledger rows and checks are indexed by customer once, then each customer
/// is scored in memory. Rows are ordered by score (highest first), then code.
pub fn build_risk_report(input: &RiskReportInput) -> CariResult<ComputationOutput<RiskReport>> {
    let start = Instant::now();

    validate_customers(&input.customers)?;
    let mut warnings = input.policy.validate()?;

    let movements_by_customer = ledger::group_by_customer(&input.movements);
    let checks_by_customer = checks::group_by_customer(&input.checks);

    let known: HashSet<&str> = input.customers.iter().map(|c| c.id.as_str()).collect();
    let orphaned = movements_by_customer
        .keys()
        .chain(checks_by_customer.keys())
        .filter(|id| !known.contains(*id))
        .collect::<HashSet<_>>()
        .len();
    if orphaned > 0 {
        warnings.push(format!(
            "Rows reference {orphaned} unknown customer id(s); they were ignored."
        ));
    }

    let mut rows: Vec<RiskAnalysis> = input
        .customers
        .iter()
        .filter(|c| c.is_reportable())
        .map(|c| {
            let movements = movements_by_customer
                .get(c.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let checks = checks_by_customer
                .get(c.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            analyze_customer(c, movements, checks, input.as_of, &input.policy)
        })
        .collect();

    rows.sort_by(|a, b| {
        b.risk_score
            .cmp(&a.risk_score)
            .then_with(|| a.customer_code.cmp(&b.customer_code))
    });

    let mut summary = RiskSummary::default();
    for row in &rows {
        match row.risk_level {
            RiskLevel::Critical => summary.critical += 1,
            RiskLevel::High => summary.high += 1,
            RiskLevel::Medium => summary.medium += 1,
            RiskLevel::Low => summary.low += 1,
        }
        summary.total_balance += row.balance;
        summary.total_overdue += row.overdue.overdue_amount;
        summary.total_dishonored_amount += row.dishonored.amount;
        warnings.extend(
            row.warnings
                .iter()
                .map(|w| format!("{}: {}", row.customer_code, w)),
        );
    }

    if rows.is_empty() {
        warnings.push("No records found for the selected customers.".into());
    }

    let output = RiskReport {
        as_of: input.as_of,
        rows,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "as_of": input.as_of,
        "balance_rule": "sum(DEBT) - sum(CREDIT)",
        "policy": input.policy,
    });

    Ok(with_metadata(
        "Customer Risk Scoring (weighted 0-100)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckStatus;
    use crate::ledger::CustomerType;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_input() -> RiskReportInput {
        let as_of = d(2024, 6, 30);
        RiskReportInput {
            as_of,
            customers: vec![
                Customer::new("c1", "CR-0001", "Riskli Ticaret").with_credit_limit(dec!(10_000)),
                Customer::new("c2", "CR-0002", "Temiz Ltd").with_credit_limit(dec!(5_000)),
                Customer::new("s1", "TD-0001", "Tedarikci").with_type(CustomerType::Supplier),
            ],
            movements: vec![
                AccountMovement::debt("c1", dec!(12_000), d(2024, 1, 1)).due(d(2024, 2, 21)),
                AccountMovement::debt("c1", dec!(1_000), d(2024, 1, 1)).due(d(2024, 3, 1)),
                AccountMovement::credit("c1", dec!(1_000), d(2024, 4, 10)).due(d(2024, 3, 1)),
                AccountMovement::debt("c2", dec!(2_000), d(2024, 6, 1)).due(d(2024, 7, 1)),
            ],
            checks: vec![
                Check::received("c1", dec!(500), CheckStatus::Returned),
                Check::received("c2", dec!(800), CheckStatus::Collected),
            ],
            policy: RiskPolicy::default(),
        }
    }

    #[test]
    fn test_report_scores_and_orders_customers() {
        let out = build_risk_report(&sample_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.rows.len(), 2);

        let risky = &r.rows[0];
        assert_eq!(risky.customer_code, "CR-0001");
        assert_eq!(risky.balance, dec!(12_000));
        assert_eq!(risky.overdue.overdue_amount, dec!(13_000));
        assert_eq!(risky.overdue.overdue_days, 130);
        assert_eq!(risky.average_payment_delay, Some(dec!(40)));
        assert_eq!(risky.dishonored.returned_count, 1);
        assert_eq!(risky.risk_score, dec!(90));
        assert_eq!(risky.risk_level, RiskLevel::Critical);

        let clean = &r.rows[1];
        assert_eq!(clean.risk_level, RiskLevel::Low);
        assert_eq!(clean.aging.current, dec!(2_000));
    }

    #[test]
    fn test_summary_counts() {
        let out = build_risk_report(&sample_input()).unwrap();
        let s = &out.result.summary;
        assert_eq!((s.critical, s.high, s.medium, s.low), (1, 0, 0, 1));
        assert_eq!(s.total_balance, dec!(14_000));
        assert_eq!(s.total_dishonored_amount, dec!(500));
    }

    #[test]
    fn test_customer_warnings_are_prefixed() {
        let out = build_risk_report(&sample_input()).unwrap();
        assert!(out.warnings.iter().any(|w| w.starts_with("CR-0001: Balance is 1.2x")));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let mut input = sample_input();
        input.policy.balance_ratio_points = dec!(-1);
        assert!(build_risk_report(&input).is_err());
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let input = sample_input();
        let a = build_risk_report(&input).unwrap().result;
        let b = build_risk_report(&input).unwrap().result;
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.summary, b.summary);
    }
}
