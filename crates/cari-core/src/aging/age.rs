use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Days;

/// Upper bound (inclusive) of the current bucket.
pub const CURRENT_MAX_DAYS: Days = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// Not yet due, undated, or at most 30 days late.
    Current,
    Days31To60,
    Days61To90,
    Days91To120,
    Over120,
}

impl AgingBucket {
    pub fn from_days_past_due(days: Days) -> Self {
        match days {
            d if d <= CURRENT_MAX_DAYS => AgingBucket::Current,
            31..=60 => AgingBucket::Days31To60,
            61..=90 => AgingBucket::Days61To90,
            91..=120 => AgingBucket::Days91To120,
            _ => AgingBucket::Over120,
        }
    }
}

impl std::fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgingBucket::Current => "0-30",
            AgingBucket::Days31To60 => "31-60",
            AgingBucket::Days61To90 => "61-90",
            AgingBucket::Days91To120 => "91-120",
            AgingBucket::Over120 => "120+",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAge {
    pub bucket: AgingBucket,
    /// as_of − due_date; zero for undated entries, negative when not yet due.
    pub days_past_due: Days,
}

impl EntryAge {
    pub fn is_overdue(&self) -> bool {
        self.days_past_due > 0
    }
}

/// Age a single ledger entry as of `as_of`.
pub fn age_entry(due_date: Option<NaiveDate>, as_of: NaiveDate) -> EntryAge {
    let days_past_due = due_date.map_or(0, |due| (as_of - due).num_days());
    EntryAge {
        bucket: AgingBucket::from_days_past_due(days_past_due),
        days_past_due,
    }
}
