use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{lenient_money, CustomerId, Money};

/// Which side of the business a ledger account represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[default]
    Customer,
    Supplier,
    Both,
}

impl CustomerType {
    /// Receivable-side accounts are the ones we extend credit to.
    pub fn is_receivable(self) -> bool {
        matches!(self, CustomerType::Customer | CustomerType::Both)
    }
}

impl std::fmt::Display for CustomerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerType::Customer => write!(f, "customer"),
            CustomerType::Supplier => write!(f, "supplier"),
            CustomerType::Both => write!(f, "both"),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A ledger account holder. Never hard-deleted; `is_active = false` hides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub customer_type: CustomerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_money")]
    pub credit_limit: Money,
    /// Stored running balance. Derived and frequently stale; recompute with
    /// [`crate::ledger::balance::customer_balance`].
    #[serde(default, deserialize_with = "lenient_money")]
    pub balance: Money,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Customer {
    pub fn new(id: impl Into<CustomerId>, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            customer_type: CustomerType::Customer,
            phone: None,
            email: None,
            tax_number: None,
            address: None,
            credit_limit: Decimal::ZERO,
            balance: Decimal::ZERO,
            is_active: true,
        }
    }

    pub fn with_credit_limit(mut self, limit: Money) -> Self {
        self.credit_limit = limit;
        self
    }

    pub fn with_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = customer_type;
        self
    }

    /// Included in receivable reports: active and on the customer side.
    pub fn is_reportable(&self) -> bool {
        self.is_active && self.customer_type.is_receivable()
    }
}
