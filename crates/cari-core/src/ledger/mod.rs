//! Customer ledger ("cari") records and the bookkeeping computed from them.

pub mod balance;
pub mod codes;
pub mod customer;
pub mod movement;
pub mod statement;

pub use customer::{Customer, CustomerType};
pub use movement::{AccountMovement, MovementType};

use std::collections::HashMap;

/// Index movements by customer in one pass.
pub fn group_by_customer(movements: &[AccountMovement]) -> HashMap<&str, Vec<&AccountMovement>> {
    let mut grouped: HashMap<&str, Vec<&AccountMovement>> = HashMap::new();
    for m in movements {
        grouped.entry(m.customer_id.as_str()).or_default().push(m);
    }
    grouped
}
