use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{AccountMovement, Customer, MovementType};
use crate::{types::*, CariError, CariResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementInput {
    pub customer: Customer,
    #[serde(default)]
    pub movements: Vec<AccountMovement>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    pub date: NaiveDate,
    pub movement_type: MovementType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub debit: Money,
    pub credit: Money,
    pub running_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    pub customer_id: CustomerId,
    pub customer_code: String,
    pub customer_name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Balance carried in from movements dated before `from`.
    pub opening_balance: Money,
    pub lines: Vec<StatementLine>,
    pub period_debit: Money,
    pub period_credit: Money,
    pub closing_balance: Money,
}

/// Chronological account statement with a running balance.
///
/// Movements on the same date keep their input order.
pub fn account_statement(input: &StatementInput) -> CariResult<ComputationOutput<AccountStatement>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.from > input.to {
        return Err(CariError::InvalidInput {
            field: "from".into(),
            reason: format!("Statement start {} is after end {}.", input.from, input.to),
        });
    }

    let mut own: Vec<&AccountMovement> = input
        .movements
        .iter()
        .filter(|m| m.customer_id == input.customer.id)
        .collect();
    let skipped = input.movements.len() - own.len();
    if skipped > 0 {
        warnings.push(format!("{skipped} movement(s) for other customers ignored."));
    }
    own.sort_by_key(|m| m.movement_date);

    let opening_balance: Money = own
        .iter()
        .filter(|m| m.movement_date < input.from)
        .map(|m| m.signed_amount())
        .sum();

    let mut running = opening_balance;
    let mut period_debit = Money::ZERO;
    let mut period_credit = Money::ZERO;
    let mut lines = Vec::new();

    for m in own
        .iter()
        .filter(|m| m.movement_date >= input.from && m.movement_date <= input.to)
    {
        let (debit, credit) = match m.movement_type {
            MovementType::Debt => (m.amount, Money::ZERO),
            MovementType::Credit => (Money::ZERO, m.amount),
        };
        running += debit - credit;
        period_debit += debit;
        period_credit += credit;
        lines.push(StatementLine {
            date: m.movement_date,
            movement_type: m.movement_type,
            description: m.description.clone(),
            due_date: m.due_date,
            debit,
            credit,
            running_balance: running,
        });
    }

    if lines.is_empty() {
        warnings.push("No movements in the statement period.".into());
    }

    let output = AccountStatement {
        customer_id: input.customer.id.clone(),
        customer_code: input.customer.code.clone(),
        customer_name: input.customer.name.clone(),
        from: input.from,
        to: input.to,
        opening_balance,
        lines,
        period_debit,
        period_credit,
        closing_balance: running,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "from": input.from,
        "to": input.to,
    });

    Ok(with_metadata(
        "Customer Account Statement",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_input() -> StatementInput {
        StatementInput {
            customer: Customer::new("c1", "CR-0001", "Kaya Gida"),
            movements: vec![
                AccountMovement::credit("c1", dec!(300), d(2024, 3, 10)),
                AccountMovement::debt("c1", dec!(1_000), d(2024, 1, 15)),
                AccountMovement::debt("c1", dec!(500), d(2024, 3, 1)),
                AccountMovement::debt("c1", dec!(200), d(2024, 4, 2)),
            ],
            from: d(2024, 3, 1),
            to: d(2024, 3, 31),
        }
    }

    #[test]
    fn test_opening_running_and_closing_balance() {
        let out = account_statement(&sample_input()).unwrap();
        let s = &out.result;
        assert_eq!(s.opening_balance, dec!(1_000));
        assert_eq!(s.lines.len(), 2);
        assert_eq!(s.lines[0].running_balance, dec!(1_500));
        assert_eq!(s.lines[1].running_balance, dec!(1_200));
        assert_eq!(s.period_debit, dec!(500));
        assert_eq!(s.period_credit, dec!(300));
        assert_eq!(s.closing_balance, dec!(1_200));
    }

    #[test]
    fn test_closing_equals_opening_plus_period_net() {
        let s = account_statement(&sample_input()).unwrap().result;
        assert_eq!(s.closing_balance, s.opening_balance + s.period_debit - s.period_credit);
    }

    #[test]
    fn test_inverted_period_rejected() {
        let mut input = sample_input();
        input.from = d(2024, 4, 1);
        assert!(account_statement(&input).is_err());
    }
}
