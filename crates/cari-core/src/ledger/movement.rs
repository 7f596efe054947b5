use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{lenient_money, CustomerId, Money};

/// Direction of a ledger entry from the business's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// The customer owes us (sale, invoice).
    Debt,
    /// The customer paid or was credited.
    Credit,
}

/// One entry in a customer's account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMovement {
    #[serde(default)]
    pub id: String,
    pub customer_id: CustomerId,
    pub movement_type: MovementType,
    #[serde(default, deserialize_with = "lenient_money")]
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Booking date. For credit entries this is when the payment arrived.
    #[serde(alias = "created_at")]
    pub movement_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AccountMovement {
    pub fn debt(customer_id: &str, amount: Money, movement_date: NaiveDate) -> Self {
        Self::new(customer_id, MovementType::Debt, amount, movement_date)
    }

    pub fn credit(customer_id: &str, amount: Money, movement_date: NaiveDate) -> Self {
        Self::new(customer_id, MovementType::Credit, amount, movement_date)
    }

    fn new(
        customer_id: &str,
        movement_type: MovementType,
        amount: Money,
        movement_date: NaiveDate,
    ) -> Self {
        Self {
            id: String::new(),
            customer_id: customer_id.to_string(),
            movement_type,
            amount,
            due_date: None,
            movement_date,
            description: None,
        }
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn is_debt(&self) -> bool {
        self.movement_type == MovementType::Debt
    }

    pub fn is_credit(&self) -> bool {
        self.movement_type == MovementType::Credit
    }

    /// Debt increases the balance, credit decreases it.
    pub fn signed_amount(&self) -> Money {
        match self.movement_type {
            MovementType::Debt => self.amount,
            MovementType::Credit => -self.amount,
        }
    }
}
