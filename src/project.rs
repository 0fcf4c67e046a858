// src/project.rs

use serde::Serialize;

use crate::record::{coerce_number, field_label, Record};

/// Default number of fields charted per region.
pub const DEFAULT_LIMIT: usize = 5;

/// One charted quantity: a human label and its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub label: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// The first `limit` numeric fields of `record`, in field order.
///
/// An empty result means there is nothing to chart.
pub fn project(record: &Record, limit: usize) -> Vec<NamedValue> {
    record
        .iter()
        .filter_map(|(key, value)| coerce_number(value).map(|n| NamedValue::new(field_label(key), n)))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from_json;
    use serde_json::json;

    #[test]
    fn keeps_numeric_fields_in_order() {
        let r = record_from_json(json!({
            "district_name": "X",
            "total_households": "1200",
            "area": "abc",
            "wage_rate": 289.5,
            "blank": "",
            "missing": null,
        }));
        let out = project(&r, DEFAULT_LIMIT);
        assert_eq!(
            out,
            vec![
                NamedValue::new("total households", 1200.0),
                NamedValue::new("wage rate", 289.5),
            ]
        );
    }

    #[test]
    fn truncates_to_limit() {
        let r = record_from_json(json!({
            "a": 1, "b": "2", "c": 3, "d": "4", "e": 5, "f": 6, "g": "7"
        }));
        let out = project(&r, 5);
        assert_eq!(out.len(), 5);
        assert_eq!(out.last().unwrap().label, "e");
        assert_eq!(project(&r, 2).len(), 2);
        assert!(project(&r, 0).is_empty());
    }

    #[test]
    fn no_numeric_fields_is_empty() {
        let r = record_from_json(json!({"district_name": "X", "note": "n/a"}));
        assert!(project(&r, DEFAULT_LIMIT).is_empty());
    }
}
