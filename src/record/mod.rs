// src/record/mod.rs

pub mod aliases;
pub mod coerce;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

pub use aliases::{display_name, find_by_name, AliasTable, CanonicalField, UNKNOWN_NAME};
pub use coerce::{coerce_number, field_label};

/// One region's statistics snapshot. Field order is the order of the remote payload.
pub type Record = Map<String, Value>;

/// The records returned by one fetch.
///
/// Cloning shares the underlying records; a re-fetch produces a new set
/// rather than mutating this one.
#[derive(Debug, Clone)]
pub struct RecordSet {
    records: Arc<Vec<Record>>,
    fetched_at: DateTime<Utc>,
}

impl RecordSet {
    /// Wrap freshly fetched records, stamped with the current time.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(records),
            fetched_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fetch_time(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Build a record from a JSON object literal. Non-objects yield an empty record.
pub fn record_from_json(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clones_share_records() {
        let set = RecordSet::new(vec![record_from_json(json!({"district_name": "X"}))]);
        let copy = set.clone();
        assert!(std::ptr::eq(set.records(), copy.records()));
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.fetch_time(), set.fetch_time());
    }

    #[test]
    fn field_order_follows_payload() {
        let rec: Record =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<_> = rec.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn non_object_json_is_an_empty_record() {
        assert!(record_from_json(json!([1, 2])).is_empty());
    }
}
