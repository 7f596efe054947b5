use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use super::buckets::{aggregate_buckets, AgingBuckets};
use super::overdue::detect_overdue;
use crate::ledger::{group_by_customer, AccountMovement, Customer};
use crate::{types::*, CariError, CariResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingReportInput {
    pub as_of: NaiveDate,
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub movements: Vec<AccountMovement>,
    /// Keep customers with no outstanding debt in the rows.
    #[serde(default)]
    pub include_zero_balances: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingRow {
    pub customer_id: CustomerId,
    pub customer_code: String,
    pub customer_name: String,
    #[serde(flatten)]
    pub buckets: AgingBuckets,
    /// Oldest overdue entry in days; zero when nothing is late.
    pub oldest_overdue_days: Days,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingReport {
    pub as_of: NaiveDate,
    pub rows: Vec<AgingRow>,
    pub totals: AgingBuckets,
    pub customer_count: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Receivables aging across all active customer-side accounts.
///
/// Movements are grouped once in memory; each customer's debts are then
/// bucketed by days past due (0-30, 31-60, 61-90, 91-120, 120+). Rows are
/// ordered by total balance, largest first.
pub fn build_aging_report(input: &AgingReportInput) -> CariResult<ComputationOutput<AgingReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_customers(&input.customers)?;

    let grouped = group_by_customer(&input.movements);
    let known: HashSet<&str> = input.customers.iter().map(|c| c.id.as_str()).collect();
    let orphaned = grouped.keys().filter(|id| !known.contains(*id)).count();
    if orphaned > 0 {
        warnings.push(format!(
            "Movements reference {orphaned} unknown customer id(s); they were ignored."
        ));
    }

    let mut rows: Vec<AgingRow> = Vec::new();
    let mut totals = AgingBuckets::default();

    for customer in input.customers.iter().filter(|c| c.is_reportable()) {
        let movements = grouped
            .get(customer.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let buckets = aggregate_buckets(movements.iter().copied(), input.as_of);
        if buckets.is_zero() && !input.include_zero_balances {
            continue;
        }
        let overdue = detect_overdue(movements.iter().copied(), input.as_of);

        tracing::debug!(
            customer = %customer.code,
            total = %buckets.total_balance,
            oldest = overdue.overdue_days,
            "aged customer"
        );

        totals.merge(&buckets);
        rows.push(AgingRow {
            customer_id: customer.id.clone(),
            customer_code: customer.code.clone(),
            customer_name: customer.name.clone(),
            buckets,
            oldest_overdue_days: overdue.overdue_days,
        });
    }

    rows.sort_by(|a, b| {
        b.buckets
            .total_balance
            .cmp(&a.buckets.total_balance)
            .then_with(|| a.customer_code.cmp(&b.customer_code))
    });

    if rows.is_empty() {
        warnings.push("No records found for the selected customers.".into());
    }

    let output = AgingReport {
        as_of: input.as_of,
        customer_count: rows.len(),
        rows,
        totals,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "as_of": input.as_of,
        "buckets": ["0-30", "31-60", "61-90", "91-120", "120+"],
        "undated_entries": "current",
        "include_zero_balances": input.include_zero_balances,
    });

    Ok(with_metadata(
        "Receivables Aging (days past due)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn validate_customers(customers: &[Customer]) -> CariResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(customers.len());
    for c in customers {
        if c.id.trim().is_empty() {
            return Err(CariError::InvalidInput {
                field: "customers.id".into(),
                reason: format!("Customer '{}' has an empty id.", c.code),
            });
        }
        if !seen.insert(c.id.as_str()) {
            return Err(CariError::InvalidInput {
                field: "customers.id".into(),
                reason: format!("Duplicate customer id '{}'.", c.id),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CustomerType;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_input() -> AgingReportInput {
        let booked = d(2024, 1, 1);
        AgingReportInput {
            as_of: d(2024, 6, 30),
            customers: vec![
                Customer::new("c1", "CR-0001", "Aydin Tekstil"),
                Customer::new("c2", "CR-0002", "Bulut Market"),
                Customer::new("s1", "TD-0001", "Tedarikci AS").with_type(CustomerType::Supplier),
                Customer::new("c3", "CR-0003", "Sessiz Ltd"),
            ],
            movements: vec![
                AccountMovement::debt("c1", dec!(1_000), booked).due(d(2024, 6, 1)),
                AccountMovement::debt("c1", dec!(2_000), booked).due(d(2024, 2, 1)),
                AccountMovement::debt("c2", dec!(5_000), booked),
                AccountMovement::debt("s1", dec!(7_000), booked).due(d(2024, 1, 1)),
                AccountMovement::debt("ghost", dec!(1), booked),
            ],
            include_zero_balances: false,
        }
    }

    #[test]
    fn test_rows_sorted_and_suppliers_excluded() {
        let out = build_aging_report(&sample_input()).unwrap();
        let codes: Vec<&str> = out.result.rows.iter().map(|r| r.customer_code.as_str()).collect();
        assert_eq!(codes, vec!["CR-0002", "CR-0001"]);
        assert_eq!(out.result.customer_count, 2);
    }

    #[test]
    fn test_totals_match_row_sum() {
        let out = build_aging_report(&sample_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.totals.total_balance, dec!(8_000));
        assert_eq!(r.totals.current, dec!(6_000));
        assert_eq!(r.totals.overdue_120_plus, dec!(2_000));
        assert_eq!(r.totals.bucket_sum(), r.totals.total_balance);
    }

    #[test]
    fn test_orphan_movements_warned() {
        let out = build_aging_report(&sample_input()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("unknown customer")));
    }

    #[test]
    fn test_zero_balances_optional() {
        let mut input = sample_input();
        input.include_zero_balances = true;
        let out = build_aging_report(&input).unwrap();
        assert_eq!(out.result.customer_count, 3);
    }

    #[test]
    fn test_duplicate_customer_rejected() {
        let mut input = sample_input();
        input.customers.push(Customer::new("c1", "CR-0099", "Dup"));
        assert!(matches!(
            build_aging_report(&input),
            Err(CariError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_input_reports_no_records() {
        let input = AgingReportInput {
            as_of: d(2024, 6, 30),
            customers: vec![],
            movements: vec![],
            include_zero_balances: false,
        };
        let out = build_aging_report(&input).unwrap();
        assert!(out.result.rows.is_empty());
        assert!(out.warnings.iter().any(|w| w.contains("No records")));
    }
}
