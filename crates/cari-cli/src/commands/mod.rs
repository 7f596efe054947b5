pub mod aging;
pub mod checks;
pub mod ledger;
pub mod risk;

use cari_core::source::{InMemoryLedger, LedgerSnapshot};
use cari_core::CustomerId;
use std::collections::BTreeSet;

use crate::input;

/// Load a ledger export into an in-memory source.
pub fn load_ledger(path: Option<&str>) -> Result<InMemoryLedger, Box<dyn std::error::Error>> {
    let snapshot: LedgerSnapshot = input::read_input(path)?;
    tracing::info!(
        customers = snapshot.customers.len(),
        movements = snapshot.movements.len(),
        checks = snapshot.checks.len(),
        "ledger loaded"
    );
    Ok(InMemoryLedger::new(snapshot))
}

/// `--customer` filter; an empty list means every customer.
pub fn customer_filter(ids: &[String]) -> Option<BTreeSet<CustomerId>> {
    if ids.is_empty() {
        None
    } else {
        Some(ids.iter().map(|s| s.trim().to_string()).collect())
    }
}
