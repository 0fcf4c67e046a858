// src/store/cache.rs

use chrono::Utc;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};
use tracing::debug;

use super::RecordSource;
use crate::error::FetchError;
use crate::record::RecordSet;

#[derive(Debug, Default)]
struct Slot {
    set: Option<RecordSet>,
    /// Sequence number of the fetch that produced `set`.
    seq: u64,
}

/// Time-bounded cache in front of another source.
///
/// A stored set is served while younger than `ttl`. Fetches are numbered when
/// they start, and a result only replaces the stored set if it came from a
/// later-started fetch, so a slow old response cannot overwrite a newer one.
/// Failures are returned to the caller and leave the stored set untouched.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    ttl: chrono::Duration,
    next_seq: AtomicU64,
    slot: Mutex<Slot>,
}

impl<S: RecordSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365)),
            next_seq: AtomicU64::new(0),
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop the stored set so the next call goes to the inner source.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.set = None;
    }

    fn fresh(&self) -> Option<RecordSet> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.set
            .as_ref()
            .filter(|set| Utc::now() - set.fetch_time() < self.ttl)
            .cloned()
    }

    fn store(&self, seq: u64, set: &RecordSet) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if seq > slot.seq {
            slot.seq = seq;
            slot.set = Some(set.clone());
        } else {
            debug!(seq, newer = slot.seq, "discarding out-of-order fetch result");
        }
    }
}

impl<S: RecordSource> RecordSource for CachedSource<S> {
    async fn fetch_all(&self) -> Result<RecordSet, FetchError> {
        if let Some(set) = self.fresh() {
            debug!(count = set.len(), "serving cached records");
            return Ok(set);
        }
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let set = self.inner.fetch_all().await?;
        self.store(seq, &set);
        Ok(set)
    }
}
