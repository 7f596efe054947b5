use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::age::{age_entry, AgingBucket};
use crate::ledger::AccountMovement;
use crate::types::Money;

/// Outstanding debt split by how late it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgingBuckets {
    pub current: Money,
    pub overdue_30: Money,
    pub overdue_60: Money,
    pub overdue_90: Money,
    pub overdue_120_plus: Money,
    /// Always the sum of the five buckets.
    pub total_balance: Money,
}

impl AgingBuckets {
    pub fn add(&mut self, bucket: AgingBucket, amount: Money) {
        let slot = match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Days31To60 => &mut self.overdue_30,
            AgingBucket::Days61To90 => &mut self.overdue_60,
            AgingBucket::Days91To120 => &mut self.overdue_90,
            AgingBucket::Over120 => &mut self.overdue_120_plus,
        };
        *slot += amount;
        self.total_balance += amount;
    }

    /// Fold another set of buckets into this one (grand totals).
    pub fn merge(&mut self, other: &AgingBuckets) {
        self.current += other.current;
        self.overdue_30 += other.overdue_30;
        self.overdue_60 += other.overdue_60;
        self.overdue_90 += other.overdue_90;
        self.overdue_120_plus += other.overdue_120_plus;
        self.total_balance += other.total_balance;
    }

    /// Everything beyond the current bucket.
    pub fn overdue_total(&self) -> Money {
        self.overdue_30 + self.overdue_60 + self.overdue_90 + self.overdue_120_plus
    }

    pub fn is_zero(&self) -> bool {
        [
            self.current,
            self.overdue_30,
            self.overdue_60,
            self.overdue_90,
            self.overdue_120_plus,
        ]
        .iter()
        .all(|v| v.is_zero())
    }

    pub fn bucket_sum(&self) -> Money {
        self.current + self.overdue_total()
    }
}

/// Bucket every debt entry by due-date age. Credit entries are ignored.
pub fn aggregate_buckets<'a, I>(movements: I, as_of: NaiveDate) -> AgingBuckets
where
    I: IntoIterator<Item = &'a AccountMovement>,
{
    let mut buckets = AgingBuckets::default();
    for m in movements.into_iter().filter(|m| m.is_debt()) {
        let age = age_entry(m.due_date, as_of);
        buckets.add(age.bucket, m.amount);
    }
    buckets
}
