//! Key/value documents (JSON)
//!
//! Keys are structural and never anonymized; only leaf string values are
//! extracted. Numbers, booleans and nulls pass through untouched, as does
//! nesting shape.

use crate::domain::{StructuralUnit, UnitPosition};
use crate::pipeline::TranslationMap;
use serde_json::Value;

/// Extract every leaf string value, pre-order
pub fn extract(value: &Value) -> Vec<StructuralUnit> {
    let mut units = Vec::new();
    walk(value, String::new(), &mut units);
    units
}

fn walk(value: &Value, path: String, units: &mut Vec<StructuralUnit>) {
    match value {
        Value::String(s) => {
            units.push(StructuralUnit::new(s.clone(), UnitPosition::JsonPath(path)));
        }
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                walk(child, child_path, units);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(child, format!("{path}[{i}]"), units);
            }
        }
        _ => {}
    }
}

/// Rebuild the value tree with translated leaf strings
pub fn reconstruct(value: &Value, translations: &TranslationMap) -> Value {
    match value {
        Value::String(s) => match translations.get(s.as_str()) {
            Some(replacement) => Value::String(replacement.clone()),
            None => value.clone(),
        },
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), reconstruct(v, translations)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| reconstruct(v, translations)).collect())
        }
        _ => value.clone(),
    }
}
