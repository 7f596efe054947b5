//! Batched read access to ledger data.
//!
//! Reports ask for customers, ledger rows and dishonored checks for a whole
//! set of customers at once and aggregate in memory afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::aging::report::{build_aging_report, AgingReport, AgingReportInput};
use crate::checks::{Check, CheckEvent, CheckStatus};
use crate::ledger::{AccountMovement, Customer};
use crate::risk::analysis::{build_risk_report, RiskReport, RiskReportInput};
use crate::risk::policy::RiskPolicy;
use crate::{types::*, CariError, CariResult};

/// Read side of the ledger store.
///
/// Implementations report transport or storage failures as
/// [`CariError::SourceUnavailable`]; an empty result is `Ok(vec![])`.
pub trait LedgerSource {
    /// All customers, or only those in `ids`.
    fn customers(&self, ids: Option<&BTreeSet<CustomerId>>) -> CariResult<Vec<Customer>>;

    /// Debt and credit rows for every customer in `ids`.
    fn movements(&self, ids: &BTreeSet<CustomerId>) -> CariResult<Vec<AccountMovement>>;

    /// Returned or protested checks for every customer in `ids`.
    fn dishonored_checks(&self, ids: &BTreeSet<CustomerId>) -> CariResult<Vec<Check>>;

    /// Bumped on every write; used as a cache key.
    fn data_version(&self) -> u64 {
        0
    }
}

/// A full export of the ledger tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub movements: Vec<AccountMovement>,
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// In-process ledger store backed by a [`LedgerSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    snapshot: LedgerSnapshot,
    version: u64,
}

impl InMemoryLedger {
    pub fn new(snapshot: LedgerSnapshot) -> Self {
        Self {
            snapshot,
            version: 0,
        }
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn record_movement(&mut self, movement: AccountMovement) {
        self.snapshot.movements.push(movement);
        self.version += 1;
    }

    pub fn record_check(&mut self, check: Check) {
        self.snapshot.checks.push(check);
        self.version += 1;
    }

    /// Apply a lifecycle event to the check with `check_id`.
    pub fn update_check(&mut self, check_id: &str, event: CheckEvent) -> CariResult<CheckStatus> {
        let check = self
            .snapshot
            .checks
            .iter_mut()
            .find(|c| c.id == check_id)
            .ok_or_else(|| CariError::InvalidInput {
                field: "check_id".into(),
                reason: format!("No check with id '{check_id}'."),
            })?;
        let status = check.apply(event)?;
        self.version += 1;
        Ok(status)
    }
}

impl LedgerSource for InMemoryLedger {
    fn customers(&self, ids: Option<&BTreeSet<CustomerId>>) -> CariResult<Vec<Customer>> {
        Ok(self
            .snapshot
            .customers
            .iter()
            .filter(|c| ids.map_or(true, |ids| ids.contains(&c.id)))
            .cloned()
            .collect())
    }

    fn movements(&self, ids: &BTreeSet<CustomerId>) -> CariResult<Vec<AccountMovement>> {
        Ok(self
            .snapshot
            .movements
            .iter()
            .filter(|m| ids.contains(&m.customer_id))
            .cloned()
            .collect())
    }

    fn dishonored_checks(&self, ids: &BTreeSet<CustomerId>) -> CariResult<Vec<Check>> {
        Ok(self
            .snapshot
            .checks
            .iter()
            .filter(|c| c.is_dishonored())
            .filter(|c| c.customer_id.as_ref().is_some_and(|id| ids.contains(id)))
            .cloned()
            .collect())
    }

    fn data_version(&self) -> u64 {
        self.version
    }
}

// ---------------------------------------------------------------------------
// Reports over a source
// ---------------------------------------------------------------------------

/// Load customers plus their rows in three batched reads.
fn load<S: LedgerSource + ?Sized>(
    source: &S,
    ids: Option<&BTreeSet<CustomerId>>,
    with_checks: bool,
) -> CariResult<LedgerSnapshot> {
    let customers = source.customers(ids).map_err(unavailable)?;
    let wanted: BTreeSet<CustomerId> = customers.iter().map(|c| c.id.clone()).collect();
    if wanted.is_empty() {
        return Ok(LedgerSnapshot::default());
    }
    let movements = source.movements(&wanted).map_err(unavailable)?;
    let checks = if with_checks {
        source.dishonored_checks(&wanted).map_err(unavailable)?
    } else {
        Vec::new()
    };
    tracing::debug!(
        customers = customers.len(),
        movements = movements.len(),
        checks = checks.len(),
        "loaded ledger batch"
    );
    Ok(LedgerSnapshot {
        customers,
        movements,
        checks,
    })
}

fn unavailable(e: CariError) -> CariError {
    tracing::warn!(error = %e, "ledger source read failed");
    match e {
        CariError::SourceUnavailable(_) => e,
        other => CariError::SourceUnavailable(other.to_string()),
    }
}

/// Risk report straight from a source. Any read failure aborts the report.
pub fn run_risk_report<S: LedgerSource + ?Sized>(
    source: &S,
    ids: Option<&BTreeSet<CustomerId>>,
    as_of: NaiveDate,
    policy: &RiskPolicy,
) -> CariResult<ComputationOutput<RiskReport>> {
    let snapshot = load(source, ids, true)?;
    build_risk_report(&RiskReportInput {
        as_of,
        customers: snapshot.customers,
        movements: snapshot.movements,
        checks: snapshot.checks,
        policy: policy.clone(),
    })
}

/// Aging report straight from a source. Any read failure aborts the report.
pub fn run_aging_report<S: LedgerSource + ?Sized>(
    source: &S,
    ids: Option<&BTreeSet<CustomerId>>,
    as_of: NaiveDate,
    include_zero_balances: bool,
) -> CariResult<ComputationOutput<AgingReport>> {
    let snapshot = load(source, ids, false)?;
    build_aging_report(&AgingReportInput {
        as_of,
        customers: snapshot.customers,
        movements: snapshot.movements,
        include_zero_balances,
    })
}
