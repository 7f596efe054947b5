use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{AccountMovement, Customer};
use crate::{types::*, CariError, CariResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceInput {
    pub customer: Customer,
    #[serde(default)]
    pub movements: Vec<AccountMovement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReconciliation {
    pub stored_balance: Money,
    pub computed_balance: Money,
    /// stored − computed
    pub drift: Money,
    pub in_sync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditUtilization {
    pub credit_limit: Money,
    pub balance: Money,
    /// Never negative; zero once the limit is exhausted.
    pub available_credit: Money,
    /// balance / limit; None when no limit is set.
    pub utilization: Option<Ratio>,
    pub over_limit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceOutput {
    pub customer_id: CustomerId,
    pub customer_code: String,
    pub total_debt: Money,
    pub total_credit: Money,
    pub reconciliation: BalanceReconciliation,
    pub utilization: CreditUtilization,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Outstanding balance: Σ debt − Σ credit.
pub fn customer_balance<'a, I>(movements: I) -> Money
where
    I: IntoIterator<Item = &'a AccountMovement>,
{
    movements.into_iter().map(AccountMovement::signed_amount).sum()
}

/// Compare the stored balance on the customer record with the ledger.
pub fn reconcile_balance(customer: &Customer, movements: &[AccountMovement]) -> BalanceReconciliation {
    let computed_balance = customer_balance(movements.iter().filter(|m| m.customer_id == customer.id));
    let drift = customer.balance - computed_balance;
    BalanceReconciliation {
        stored_balance: customer.balance,
        computed_balance,
        drift,
        in_sync: drift.is_zero(),
    }
}

pub fn credit_utilization(customer: &Customer, balance: Money) -> CreditUtilization {
    let limit = customer.credit_limit;
    let (utilization, available_credit) = if limit > Decimal::ZERO {
        let utilization = balance.checked_div(limit).unwrap_or(if balance.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        });
        (Some(utilization), (limit - balance).max(Decimal::ZERO))
    } else {
        (None, Decimal::ZERO)
    };
    CreditUtilization {
        credit_limit: limit,
        balance,
        available_credit,
        utilization,
        over_limit: limit > Decimal::ZERO && balance > limit,
    }
}

/// Recompute a customer's balance from the ledger, reconcile it against the
/// stored figure and report credit-limit usage.
pub fn analyze_balance(input: &BalanceInput) -> CariResult<ComputationOutput<BalanceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(stray) = input
        .movements
        .iter()
        .find(|m| m.customer_id != input.customer.id)
    {
        return Err(CariError::InvalidInput {
            field: "movements".into(),
            reason: format!(
                "Movement for customer '{}' supplied with customer '{}'.",
                stray.customer_id, input.customer.id
            ),
        });
    }

    let total_debt: Money = input.movements.iter().filter(|m| m.is_debt()).map(|m| m.amount).sum();
    let total_credit: Money = input.movements.iter().filter(|m| m.is_credit()).map(|m| m.amount).sum();

    let reconciliation = reconcile_balance(&input.customer, &input.movements);
    if !reconciliation.in_sync {
        warnings.push(format!(
            "Stored balance {} differs from ledger balance {} by {}.",
            reconciliation.stored_balance, reconciliation.computed_balance, reconciliation.drift
        ));
    }

    let utilization = credit_utilization(&input.customer, reconciliation.computed_balance);
    if input.customer.credit_limit <= Decimal::ZERO {
        warnings.push("No credit limit defined; utilization not computed.".into());
    }

    let output = BalanceOutput {
        customer_id: input.customer.id.clone(),
        customer_code: input.customer.code.clone(),
        total_debt,
        total_credit,
        reconciliation,
        utilization,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "movement_count": input.movements.len(),
        "balance_rule": "sum(DEBT) - sum(CREDIT)",
    });

    Ok(with_metadata(
        "Customer Balance Reconciliation",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_input() -> BalanceInput {
        let mut customer = Customer::new("c1", "CR-0001", "Demir Insaat").with_credit_limit(dec!(10_000));
        customer.balance = dec!(9_000);
        BalanceInput {
            customer,
            movements: vec![
                AccountMovement::debt("c1", dec!(8_000), d(2024, 1, 5)),
                AccountMovement::debt("c1", dec!(4_000), d(2024, 2, 5)),
                AccountMovement::credit("c1", dec!(3_500), d(2024, 2, 20)),
            ],
        }
    }

    #[test]
    fn test_balance_is_debt_minus_credit() {
        let input = sample_input();
        assert_eq!(customer_balance(&input.movements), dec!(8_500));
    }

    #[test]
    fn test_reconciliation_reports_drift() {
        let out = analyze_balance(&sample_input()).unwrap();
        let r = &out.result.reconciliation;
        assert_eq!(r.computed_balance, dec!(8_500));
        assert_eq!(r.drift, dec!(500));
        assert!(!r.in_sync);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_utilization_and_available_credit() {
        let out = analyze_balance(&sample_input()).unwrap();
        let u = &out.result.utilization;
        assert_eq!(u.available_credit, dec!(1_500));
        assert_eq!(u.utilization, Some(dec!(0.85)));
        assert!(!u.over_limit);
    }

    #[test]
    fn test_over_limit_floors_available_credit() {
        let customer = Customer::new("c1", "CR-0001", "X").with_credit_limit(dec!(1_000));
        let u = credit_utilization(&customer, dec!(1_200));
        assert!(u.over_limit);
        assert_eq!(u.available_credit, Decimal::ZERO);
    }

    #[test]
    fn test_tiny_limit_saturates_utilization() {
        let customer = Customer::new("c1", "CR-0001", "X").with_credit_limit(dec!(0.0000001));
        let u = credit_utilization(&customer, Decimal::from_scientific("1e28").unwrap());
        assert_eq!(u.utilization, Some(Decimal::MAX));
        assert!(u.over_limit);
        assert_eq!(u.available_credit, Decimal::ZERO);
    }

    #[test]
    fn test_foreign_movement_rejected() {
        let mut input = sample_input();
        input.movements.push(AccountMovement::debt("c2", dec!(1), d(2024, 1, 1)));
        match analyze_balance(&input) {
            Err(CariError::InvalidInput { field, .. }) => assert_eq!(field, "movements"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
