use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::age::age_entry;
use crate::ledger::AccountMovement;
use crate::types::{Days, Money};

/// Single-pair overdue summary consumed by the risk scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverdueSummary {
    pub overdue_amount: Money,
    /// Age of the oldest overdue entry; zero when nothing is overdue.
    pub overdue_days: Days,
    pub overdue_count: u32,
}

/// Sum debt entries whose due date has passed and track the oldest one.
pub fn detect_overdue<'a, I>(movements: I, as_of: NaiveDate) -> OverdueSummary
where
    I: IntoIterator<Item = &'a AccountMovement>,
{
    let mut summary = OverdueSummary::default();
    for m in movements.into_iter().filter(|m| m.is_debt()) {
        let age = age_entry(m.due_date, as_of);
        if !age.is_overdue() {
            continue;
        }
        summary.overdue_amount += m.amount;
        summary.overdue_days = summary.overdue_days.max(age.days_past_due);
        summary.overdue_count += 1;
    }
    summary
}
