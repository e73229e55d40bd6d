//! Folding per-file outcomes into the product → time → values document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::index::IndexTable;
use crate::record::{FileOutcome, StreamflowRecord};

/// One value in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComidFlow {
    pub comid: i64,
    pub flow: f64,
}

/// Product → valid time → values, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalResults(BTreeMap<String, BTreeMap<String, Vec<ComidFlow>>>);

impl FinalResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold outcomes, reporting each location index as its comid by plain
    /// reinterpretation.
    pub fn fold<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = FileOutcome>,
    {
        let mut results = Self::new();
        results.append(outcomes, |index| index as i64);
        results
    }

    /// Fold outcomes, mapping location indices back to comids through
    /// `table`. Indices absent from the table fall back to reinterpretation.
    pub fn fold_with_table<I>(outcomes: I, table: &IndexTable) -> Self
    where
        I: IntoIterator<Item = FileOutcome>,
    {
        let mut results = Self::new();
        results.append(outcomes, |index| table.comid_for(index).unwrap_or(index as i64));
        results
    }

    /// Append every record of `outcomes`. Appending the same outcome twice
    /// duplicates its values.
    pub fn append<I, F>(&mut self, outcomes: I, comid_of: F)
    where
        I: IntoIterator<Item = FileOutcome>,
        F: Fn(u64) -> i64,
    {
        for outcome in outcomes {
            for record in outcome.into_records() {
                self.push(record, &comid_of);
            }
        }
    }

    fn push<F>(&mut self, record: StreamflowRecord, comid_of: &F)
    where
        F: Fn(u64) -> i64,
    {
        let entry = ComidFlow {
            comid: comid_of(record.location_index),
            flow: record.value,
        };
        self.0
            .entry(record.product)
            .or_default()
            .entry(record.time)
            .or_default()
            .push(entry);
    }

    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, product: &str, time: &str) -> Option<&[ComidFlow]> {
        self.0
            .get(product)
            .and_then(|times| times.get(time))
            .map(Vec::as_slice)
    }

    /// Valid times recorded for `product`.
    pub fn times(&self, product: &str) -> Vec<&str> {
        self.0
            .get(product)
            .map(|times| times.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Total number of values across all products and times.
    pub fn value_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|times| times.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
