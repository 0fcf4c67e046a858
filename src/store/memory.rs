// src/store/memory.rs

use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    RwLock,
};

use super::RecordSource;
use crate::error::FetchError;
use crate::record::{record_from_json, Record, RecordSet};

/// Serves a replaceable in-memory record set. Counts fetches and can be
/// switched into a failing state.
#[derive(Debug, Default)]
pub struct MemorySource {
    records: RwLock<Vec<Record>>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    /// Build from JSON objects, e.g. `json!({"district_name": "X"})`.
    pub fn from_json(values: Vec<Value>) -> Self {
        Self::new(values.into_iter().map(record_from_json).collect())
    }

    /// Replace the served records, as if the remote data changed.
    pub fn replace(&self, records: Vec<Record>) {
        let mut guard = self.records.write().unwrap_or_else(|e| e.into_inner());
        *guard = records;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RecordSource for MemorySource {
    async fn fetch_all(&self) -> Result<RecordSet, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable("memory source set to fail".into()));
        }
        let records = self
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        Ok(RecordSet::new(records))
    }
}
