use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use super::analysis::RiskReport;
use super::policy::RiskPolicy;
use crate::source::{run_risk_report, LedgerSource};
use crate::{types::*, CariResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// None means "all customers".
    customers: Option<BTreeSet<CustomerId>>,
    as_of: NaiveDate,
    data_version: u64,
    policy: String,
}

/// Memoizes risk reports per (customer set, as-of date, data version, policy).
///
/// Entries go stale as soon as the source reports a new data version; call
/// [`RiskCache::invalidate`] after writes to sources that do not version.
#[derive(Debug, Default)]
pub struct RiskCache {
    entries: HashMap<CacheKey, ComputationOutput<RiskReport>>,
    hits: u64,
    misses: u64,
}

impl RiskCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<S: LedgerSource + ?Sized>(
        &mut self,
        source: &S,
        ids: Option<&BTreeSet<CustomerId>>,
        as_of: NaiveDate,
        policy: &RiskPolicy,
    ) -> CariResult<ComputationOutput<RiskReport>> {
        let key = CacheKey {
            customers: ids.cloned(),
            as_of,
            data_version: source.data_version(),
            policy: serde_json::to_string(policy)?,
        };

        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(hit.clone());
        }

        self.misses += 1;
        let report = run_risk_report(source, ids, as_of, policy)?;
        // Older versions can never be requested again.
        self.entries.retain(|k, _| k.data_version == key.data_version);
        self.entries.insert(key, report.clone());
        Ok(report)
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
