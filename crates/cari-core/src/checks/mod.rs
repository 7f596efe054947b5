//! Checks and promissory notes held or issued by the business.

pub mod counter;
pub mod lifecycle;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{lenient_money, CustomerId, Money};

pub use counter::{count_dishonored, DishonoredChecks};
pub use lifecycle::{CheckEvent, CheckStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// Taken from a customer.
    Received,
    /// Written by the business to a supplier.
    Issued,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(alias = "type")]
    pub check_type: CheckType,
    pub status: CheckStatus,
    #[serde(default, deserialize_with = "lenient_money")]
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,
}

impl Check {
    pub fn received(customer_id: &str, amount: Money, status: CheckStatus) -> Self {
        Self {
            id: String::new(),
            customer_id: Some(customer_id.to_string()),
            check_type: CheckType::Received,
            status,
            amount,
            due_date: None,
            bank_name: None,
            check_number: None,
        }
    }

    /// Move the check to the next status. On rejection the check is left as is.
    pub fn apply(&mut self, event: CheckEvent) -> crate::CariResult<CheckStatus> {
        let next = self.status.transition(self.check_type, event)?;
        tracing::debug!(check = %self.id, from = %self.status, to = %next, "check status changed");
        self.status = next;
        Ok(next)
    }

    pub fn is_dishonored(&self) -> bool {
        self.status.is_dishonored()
    }
}

/// Index checks by customer in one pass. Checks without a customer are dropped.
pub fn group_by_customer(checks: &[Check]) -> HashMap<&str, Vec<&Check>> {
    let mut grouped: HashMap<&str, Vec<&Check>> = HashMap::new();
    for check in checks {
        if let Some(id) = check.customer_id.as_deref() {
            grouped.entry(id).or_default().push(check);
        }
    }
    grouped
}
