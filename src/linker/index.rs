//! Locality buckets over a record set.
//!
//! Lets the batch driver visit only same-locality candidates, and backs the
//! locality coverage report.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::matcher::{LocalityGate, Record};

/// Records grouped by the gate's locality key, each bucket in pool order.
/// Blank localities match nothing, so they get no bucket.
#[derive(Debug)]
pub struct LocalityIndex<'a> {
    gate: LocalityGate,
    buckets: HashMap<String, Vec<&'a Record>>,
}

impl<'a> LocalityIndex<'a> {
    pub fn build(records: &'a [Record], gate: LocalityGate) -> Self {
        let mut buckets: HashMap<String, Vec<&'a Record>> = HashMap::new();
        for record in records {
            if let Some(key) = gate.key(&record.locality) {
                buckets.entry(key).or_default().push(record);
            }
        }

        Self { gate, buckets }
    }

    /// Candidates sharing `locality`'s key, in original order.
    pub fn candidates(&self, locality: &str) -> &[&'a Record] {
        self.gate
            .key(locality)
            .and_then(|key| self.buckets.get(&key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct localities.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Record counts for one locality on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalityCoverage {
    pub locality: String,
    pub finance: usize,
    pub procurement: usize,
}

impl LocalityCoverage {
    pub fn finance_only(&self) -> bool {
        self.finance > 0 && self.procurement == 0
    }

    pub fn procurement_only(&self) -> bool {
        self.procurement > 0 && self.finance == 0
    }
}

/// Count records per locality on both sides, sorted by locality key.
/// Blank localities are counted under `""`.
pub fn coverage(finance: &[Record], procurement: &[Record], gate: LocalityGate) -> Vec<LocalityCoverage> {
    let key = |record: &Record| gate.key(&record.locality).unwrap_or_default();

    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for record in finance {
        counts.entry(key(record)).or_default().0 += 1;
    }
    for record in procurement {
        counts.entry(key(record)).or_default().1 += 1;
    }

    counts
        .into_iter()
        .map(|(locality, (finance, procurement))| LocalityCoverage {
            locality,
            finance,
            procurement,
        })
        .collect()
}
