// src/record/aliases.rs

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Record, RecordSet};

/// Returned by [`AliasTable::display_name`] when no alias field holds a name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Logical fields that the remote source spells in more than one way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Name,
}

/// Ordered canonical-field → alias-list mappings.
///
/// Within each entry, aliases are consulted in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

static DEFAULT_TABLE: Lazy<AliasTable> = Lazy::new(AliasTable::default);

impl Default for AliasTable {
    fn default() -> Self {
        Self::new(vec![(
            CanonicalField::Name,
            vec!["district_name".to_string(), "district".to_string()],
        )])
    }
}

impl AliasTable {
    pub fn new(entries: Vec<(CanonicalField, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Table with `aliases` as the name field's lookup order.
    pub fn with_name_aliases(aliases: Vec<String>) -> Self {
        Self::new(vec![(CanonicalField::Name, aliases)])
    }

    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, a)| a.as_slice())
            .unwrap_or(&[])
    }

    /// First non-empty string value among `field`'s aliases.
    pub fn lookup<'r>(&self, field: CanonicalField, record: &'r Record) -> Option<&'r str> {
        self.aliases(field)
            .iter()
            .filter_map(|alias| record.get(alias).and_then(Value::as_str))
            .find(|s| !s.is_empty())
    }

    pub fn display_name(&self, record: &Record) -> String {
        self.lookup(CanonicalField::Name, record)
            .unwrap_or(UNKNOWN_NAME)
            .to_string()
    }

    /// True when any name alias of `record` equals `name` exactly.
    pub fn matches(&self, record: &Record, name: &str) -> bool {
        !name.is_empty()
            && self
                .aliases(CanonicalField::Name)
                .iter()
                .any(|alias| record.get(alias).and_then(Value::as_str) == Some(name))
    }

    pub fn is_alias_field(&self, key: &str) -> bool {
        self.entries
            .iter()
            .any(|(_, aliases)| aliases.iter().any(|a| a == key))
    }

    /// First record in sequence order matching `name`.
    pub fn find<'s>(&self, records: &'s RecordSet, name: &str) -> Option<&'s Record> {
        records.iter().find(|r| self.matches(r, name))
    }
}

/// Display name using the default `district_name` / `district` aliases.
pub fn display_name(record: &Record) -> String {
    DEFAULT_TABLE.display_name(record)
}

pub fn find_by_name<'s>(records: &'s RecordSet, name: &str) -> Option<&'s Record> {
    DEFAULT_TABLE.find(records, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from_json;
    use serde_json::json;

    fn set(values: Vec<Value>) -> RecordSet {
        RecordSet::new(values.into_iter().map(record_from_json).collect())
    }

    #[test]
    fn primary_alias_wins() {
        let r = record_from_json(json!({"district": "B", "district_name": "A"}));
        assert_eq!(display_name(&r), "A");
    }

    #[test]
    fn falls_back_to_secondary_alias() {
        let r = record_from_json(json!({"district": "Mysuru", "pop": 10}));
        assert_eq!(display_name(&r), "Mysuru");

        let empty_primary = record_from_json(json!({"district_name": "", "district": "Hassan"}));
        assert_eq!(display_name(&empty_primary), "Hassan");
    }

    #[test]
    fn unknown_when_no_alias_present() {
        let r = record_from_json(json!({"pop": "100", "district_name": null}));
        assert_eq!(display_name(&r), UNKNOWN_NAME);
        assert_eq!(display_name(&Record::new()), "Unknown");
    }

    #[test]
    fn find_matches_any_alias_and_returns_first() {
        let records = set(vec![
            json!({"district_name": "Udupi", "n": 1}),
            json!({"district": "Kolar", "n": 2}),
            json!({"district_name": "Other", "district": "Kolar", "n": 3}),
        ]);
        let hit = find_by_name(&records, "Kolar").unwrap();
        assert_eq!(hit["n"], json!(2));
        assert_eq!(find_by_name(&records, "Udupi").unwrap()["n"], json!(1));
    }

    #[test]
    fn find_is_exact() {
        let records = set(vec![json!({"district_name": "Udupi"})]);
        assert!(find_by_name(&records, "udupi").is_none());
        assert!(find_by_name(&records, "Udup").is_none());
        assert!(find_by_name(&records, "").is_none());
    }

    #[test]
    fn empty_name_never_matches_blank_fields() {
        let records = set(vec![json!({"district_name": ""})]);
        assert!(find_by_name(&records, "").is_none());
    }

    #[test]
    fn custom_aliases_drive_lookup() {
        let table = AliasTable::with_name_aliases(vec!["region".into(), "area_name".into()]);
        let r = record_from_json(json!({"district_name": "X", "area_name": "Y"}));
        assert_eq!(table.display_name(&r), "Y");
        assert!(table.is_alias_field("region"));
        assert!(!table.is_alias_field("district_name"));
    }
}
