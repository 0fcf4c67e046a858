// src/present.rs
//! Shapes handed to the rendering widgets. Nothing here touches the network.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::compare::ComparisonVector;
use crate::project::NamedValue;
use crate::record::{field_label, AliasTable, Record, RecordSet};

pub const SELECT_PLACEHOLDER: &str = "Select District";
pub const METRICS_LABEL: &str = "Metrics";

/// One line of the detail list, rendered as `"label: value"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub label: String,
    pub value: String,
}

impl ListItem {
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Every field of `record`, numeric or not, in field order.
pub fn to_list_items(record: &Record) -> Vec<ListItem> {
    record
        .iter()
        .map(|(key, value)| ListItem {
            label: field_label(key),
            value: value_text(value),
        })
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // integral floats print without a trailing ".0"
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .map_or_else(|| n.to_string(), |f| f.to_string()),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn into_payload(self) -> ChartPayload {
        ChartPayload {
            labels: self.labels,
            datasets: vec![Dataset {
                label: METRICS_LABEL.to_string(),
                data: self.values,
            }],
        }
    }
}

pub fn to_chart_series(values: &[NamedValue]) -> ChartSeries {
    ChartSeries {
        labels: values.iter().map(|v| v.label.clone()).collect(),
        values: values.iter().map(|v| v.value).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub labels: Vec<String>,
    pub name_a: String,
    pub series_a: Vec<f64>,
    pub name_b: String,
    pub series_b: Vec<f64>,
}

impl ComparisonSeries {
    pub fn into_payload(self) -> ChartPayload {
        ChartPayload {
            labels: self.labels,
            datasets: vec![
                Dataset {
                    label: self.name_a,
                    data: self.series_a,
                },
                Dataset {
                    label: self.name_b,
                    data: self.series_b,
                },
            ],
        }
    }
}

pub fn to_comparison_series(cmp: &ComparisonVector) -> ComparisonSeries {
    ComparisonSeries {
        labels: cmp.labels(),
        name_a: cmp.first.name.clone(),
        series_a: cmp.first.values.iter().map(|v| v.value).collect(),
        name_b: cmp.second.name.clone(),
        series_b: cmp.second.values.iter().map(|v| v.value).collect(),
    }
}

/// Bar-chart input: `{labels, datasets: [{label, data}]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

/// Placeholder first, then one option per record in set order. Duplicates are kept.
pub fn to_options(aliases: &AliasTable, records: &RecordSet) -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        value: String::new(),
        text: SELECT_PLACEHOLDER.to_string(),
    }];
    options.extend(records.iter().map(|r| {
        let name = aliases.display_name(r);
        SelectOption {
            value: name.clone(),
            text: name,
        }
    }));
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::ComparisonResolver;
    use crate::project::{project, DEFAULT_LIMIT};
    use crate::record::record_from_json;
    use serde_json::json;

    #[test]
    fn list_items_cover_every_field() {
        let r = record_from_json(json!({
            "district_name": "X", "pop": "100", "area": "abc", "n": 3, "rate": 2.5, "note": null
        }));
        let texts: Vec<_> = to_list_items(&r).iter().map(ListItem::text).collect();
        assert_eq!(
            texts,
            vec![
                "district name: X",
                "pop: 100",
                "area: abc",
                "n: 3",
                "rate: 2.5",
                "note: null"
            ]
        );
    }

    #[test]
    fn integral_floats_render_like_integers() {
        let r = record_from_json(json!({"pop": 100.0, "rate": 0.5, "neg": -3.0}));
        let texts: Vec<_> = to_list_items(&r).iter().map(ListItem::text).collect();
        assert_eq!(texts, vec!["pop: 100", "rate: 0.5", "neg: -3"]);
    }

    #[test]
    fn single_series_payload() {
        let values = vec![NamedValue::new("pop", 100.0), NamedValue::new("works", 7.0)];
        let series = to_chart_series(&values);
        assert_eq!(series.labels, vec!["pop", "works"]);
        assert_eq!(series.values, vec![100.0, 7.0]);

        let payload = serde_json::to_value(series.into_payload()).unwrap();
        assert_eq!(
            payload,
            json!({"labels": ["pop", "works"], "datasets": [{"label": "Metrics", "data": [100.0, 7.0]}]})
        );
    }

    #[test]
    fn end_to_end_detail_and_comparison() {
        let x = record_from_json(json!({"district_name": "X", "pop": "100", "area": "abc"}));
        let y = record_from_json(json!({"district_name": "Y", "pop": "200"}));

        let items: Vec<_> = to_list_items(&x).iter().map(ListItem::text).collect();
        assert_eq!(items, vec!["district name: X", "pop: 100", "area: abc"]);

        let chart = to_chart_series(&project(&x, DEFAULT_LIMIT));
        assert_eq!(chart.labels, vec!["pop"]);
        assert_eq!(chart.values, vec![100.0]);

        let cmp = to_comparison_series(&ComparisonResolver::default().align(&x, &y));
        assert_eq!(cmp.labels, vec!["pop", "area"]);
        assert_eq!(cmp.series_a, vec![100.0, 0.0]);
        assert_eq!(cmp.series_b, vec![200.0, 0.0]);

        let payload = cmp.into_payload();
        let names: Vec<_> = payload.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn options_start_with_placeholder() {
        let set = RecordSet::new(vec![
            record_from_json(json!({"district_name": "A"})),
            record_from_json(json!({"district": "B"})),
            record_from_json(json!({"pop": 1})),
        ]);
        let opts = to_options(&AliasTable::default(), &set);
        let texts: Vec<_> = opts.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["Select District", "A", "B", "Unknown"]);
        assert_eq!(opts[0].value, "");

        let empty = to_options(&AliasTable::default(), &RecordSet::empty());
        assert_eq!(empty.len(), 1);
    }
}
