// src/record/coerce.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Leading decimal literal: optional sign, digits with optional fraction, optional exponent.
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("numeric prefix pattern should compile")
});

/// Coerce a field value to a finite number.
///
/// Strings are read by their leading numeric prefix, so `"12 km"` is 12 and
/// `"abc"` or `""` are rejected. Null, booleans, arrays and objects never coerce.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_prefix(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_prefix(raw: &str) -> Option<f64> {
    let m = NUMERIC_PREFIX.find(raw.trim_start())?;
    m.as_str().parse().ok()
}

/// Human label for a field name: underscores become spaces.
pub fn field_label(key: &str) -> String {
    key.replace('_', " ")
}
