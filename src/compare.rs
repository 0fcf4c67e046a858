// src/compare.rs

use tracing::debug;

use crate::error::{ResolutionError, Side};
use crate::project::{NamedValue, DEFAULT_LIMIT};
use crate::record::{coerce_number, field_label, AliasTable, Record};
use crate::store::RecordSource;

/// One region's side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    pub name: String,
    pub values: Vec<NamedValue>,
}

/// Two aligned series over the same labels, in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonVector {
    pub first: RegionSeries,
    pub second: RegionSeries,
}

impl ComparisonVector {
    pub fn labels(&self) -> Vec<String> {
        self.first.values.iter().map(|v| v.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.first.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.values.is_empty()
    }
}

/// Resolves two region names against a freshly fetched set and aligns them.
#[derive(Debug, Clone)]
pub struct ComparisonResolver {
    aliases: AliasTable,
    limit: usize,
}

impl Default for ComparisonResolver {
    fn default() -> Self {
        Self::new(AliasTable::default(), DEFAULT_LIMIT)
    }
}

impl ComparisonResolver {
    pub fn new(aliases: AliasTable, limit: usize) -> Self {
        Self { aliases, limit }
    }

    /// Fetch once, resolve both names, align their values.
    ///
    /// Empty names fail with [`ResolutionError::MissingSelection`] before any fetch.
    pub async fn compare<S: RecordSource>(
        &self,
        source: &S,
        first: &str,
        second: &str,
    ) -> Result<ComparisonVector, ResolutionError> {
        if first.is_empty() || second.is_empty() {
            return Err(ResolutionError::MissingSelection);
        }
        let records = source.fetch_all().await?;
        let a = self
            .aliases
            .find(&records, first)
            .ok_or_else(|| ResolutionError::NotFound {
                which: Side::First,
                name: first.to_string(),
            })?;
        let b = self
            .aliases
            .find(&records, second)
            .ok_or_else(|| ResolutionError::NotFound {
                which: Side::Second,
                name: second.to_string(),
            })?;
        Ok(self.align(a, b))
    }

    /// Keys are `a`'s first `limit` non-name fields; values that are missing or
    /// non-numeric on either side become 0.
    pub fn align(&self, a: &Record, b: &Record) -> ComparisonVector {
        let keys: Vec<&String> = a
            .keys()
            .filter(|k| !self.aliases.is_alias_field(k))
            .take(self.limit)
            .collect();
        debug!(keys = keys.len(), "aligning comparison");

        let series = |rec: &Record| -> RegionSeries {
            RegionSeries {
                name: self.aliases.display_name(rec),
                values: keys
                    .iter()
                    .map(|k| {
                        let v = rec.get(k.as_str()).and_then(coerce_number).unwrap_or(0.0);
                        NamedValue::new(field_label(k), v)
                    })
                    .collect(),
            }
        };

        ComparisonVector {
            first: series(a),
            second: series(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySource;
    use serde_json::json;

    fn source() -> MemorySource {
        MemorySource::from_json(vec![
            json!({"district_name": "X", "pop": "100", "area": "abc"}),
            json!({"district_name": "Y", "pop": "200"}),
            json!({"district": "Z", "pop": 5, "area": "12.5", "works": "9"}),
        ])
    }

    fn values(s: &RegionSeries) -> Vec<f64> {
        s.values.iter().map(|v| v.value).collect()
    }

    #[tokio::test]
    async fn aligns_over_first_region_keys() {
        let src = source();
        let cmp = ComparisonResolver::default()
            .compare(&src, "X", "Y")
            .await
            .unwrap();
        assert_eq!(cmp.labels(), vec!["pop", "area"]);
        assert_eq!(values(&cmp.first), vec![100.0, 0.0]);
        assert_eq!(values(&cmp.second), vec![200.0, 0.0]);
        assert_eq!(cmp.first.name, "X");
        assert_eq!(cmp.second.name, "Y");
        assert_eq!(src.fetch_count(), 1);
    }

    #[tokio::test]
    async fn missing_fields_in_second_zero_fill() {
        let cmp = ComparisonResolver::default()
            .compare(&source(), "Z", "Y")
            .await
            .unwrap();
        assert_eq!(cmp.labels(), vec!["pop", "area", "works"]);
        assert_eq!(values(&cmp.first), vec![5.0, 12.5, 9.0]);
        assert_eq!(values(&cmp.second), vec![200.0, 0.0, 0.0]);
        assert_eq!(cmp.first.values.len(), cmp.second.values.len());
    }

    #[tokio::test]
    async fn key_count_is_bounded_by_limit() {
        let src = MemorySource::from_json(vec![
            json!({"district_name": "A", "a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6}),
            json!({"district_name": "B", "f": 60}),
        ]);
        let cmp = ComparisonResolver::default()
            .compare(&src, "A", "B")
            .await
            .unwrap();
        assert_eq!(cmp.len(), DEFAULT_LIMIT);
        assert_eq!(values(&cmp.second), vec![0.0; 5]);

        let narrow = ComparisonResolver::new(AliasTable::default(), 2)
            .compare(&src, "A", "B")
            .await
            .unwrap();
        assert_eq!(narrow.labels(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn empty_selection_skips_fetch() {
        let src = source();
        let resolver = ComparisonResolver::default();
        for (a, b) in [("", "Y"), ("X", ""), ("", "")] {
            let err = resolver.compare(&src, a, b).await.unwrap_err();
            assert!(matches!(err, ResolutionError::MissingSelection));
        }
        assert_eq!(src.fetch_count(), 0);
    }

    #[tokio::test]
    async fn unresolved_names_report_side() {
        let src = source();
        let resolver = ComparisonResolver::default();
        match resolver.compare(&src, "Q", "Y").await {
            Err(ResolutionError::NotFound { which, name }) => {
                assert_eq!(which, Side::First);
                assert_eq!(name, "Q");
            }
            other => panic!("unexpected {:?}", other),
        }
        match resolver.compare(&src, "X", "x").await {
            Err(ResolutionError::NotFound { which, .. }) => assert_eq!(which, Side::Second),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let src = source();
        src.set_failing(true);
        let err = ComparisonResolver::default()
            .compare(&src, "X", "Y")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Fetch(_)));
    }

    #[test]
    fn name_only_record_gives_empty_vector() {
        let a = crate::record::record_from_json(json!({"district_name": "A"}));
        let b = crate::record::record_from_json(json!({"district_name": "B", "pop": 1}));
        let cmp = ComparisonResolver::default().align(&a, &b);
        assert!(cmp.is_empty());
        assert!(cmp.second.values.is_empty());
    }
}
