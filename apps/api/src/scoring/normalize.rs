//! Numeric normalization shared by every score lookup.
//!
//! Backend payloads mix fractions (`0.42`) and percentages (`42`) for the same
//! quantity. Everything that reaches a chart goes through `normalize_percentage`.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::debug;

/// Reads a JSON value as a finite number. Numbers and numeric strings qualify;
/// anything else (null, bool, arrays, objects, `"NaN"`, `"abc"`) does not.
pub fn as_finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Maps a raw score onto `[0, 100]` with one decimal.
///
/// Values `<= 1` are fractions and get multiplied by 100; larger values are
/// already percentages. Non-finite input yields 0.
pub fn normalize_percentage(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    let pct = if raw <= 1.0 { raw * 100.0 } else { raw };
    let value = round_one_decimal(pct).clamp(0.0, 100.0);
    // collapse -0.0 so identical inputs serialize identically
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// `as_finite_number` followed by `normalize_percentage`.
pub fn resolve_percentage(value: &Value) -> Option<f64> {
    as_finite_number(value).map(normalize_percentage)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Reads a nested structure that may arrive either as an object or as a
/// JSON-encoded string of an object. Anything else is treated as absent.
pub fn decode_object(value: &Value) -> Option<Cow<'_, Map<String, Value>>> {
    match value {
        Value::Object(map) => Some(Cow::Borrowed(map)),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Some(Cow::Owned(map)),
            Ok(other) => {
                debug!(kind = json_kind(&other), "nested payload is not an object");
                None
            }
            Err(e) => {
                debug!(error = %e, "nested payload is not valid JSON");
                None
            }
        },
        Value::Null => None,
        other => {
            debug!(kind = json_kind(other), "nested payload is not an object");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
