use rust_decimal::Decimal;

use super::age::age_entry;
use crate::ledger::AccountMovement;

/// Mean days late across payments that arrived after their due date.
///
/// Only credit entries carrying a due date count; on-time and early payments
/// are excluded rather than averaged in as zero. `None` when no payment was
/// late.
pub fn average_payment_delay<'a, I>(movements: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a AccountMovement>,
{
    let (total, count) = movements
        .into_iter()
        .filter(|m| m.is_credit())
        .filter_map(|m| m.due_date.map(|due| age_entry(Some(due), m.movement_date)))
        .filter(|age| age.is_overdue())
        .fold((0i64, 0i64), |(sum, n), age| (sum + age.days_past_due, n + 1));

    if count == 0 {
        None
    } else {
        Some(Decimal::from(total) / Decimal::from(count))
    }
}
