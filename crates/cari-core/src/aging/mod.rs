//! Due-date aging of ledger entries.
//!
//! Every component that needs "how late is this entry" goes through
//! [`age::age_entry`], so the bucketed aging report and the overdue summary
//! used for risk scoring can never disagree on date math.

pub mod age;
pub mod buckets;
pub mod delay;
pub mod overdue;
pub mod report;

pub use age::{age_entry, AgingBucket, EntryAge};
pub use buckets::{aggregate_buckets, AgingBuckets};
pub use delay::average_payment_delay;
pub use overdue::{detect_overdue, OverdueSummary};
