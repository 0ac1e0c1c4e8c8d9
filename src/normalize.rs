//! Merge collector outputs into one unified record.
//!
//! Mapping expressions are `"<namespace>.<key>"` where the namespace picks
//! the API or HTML value map and the key (which may itself contain dots) is
//! looked up verbatim. Everything soft — missing keys, empty maps, malformed
//! expressions, failed casts — resolves to null. Only config errors upstream
//! and fetch errors in the collectors are real failures.

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::config::{FieldType, MappingSpec};

/// One flat output record, fields in `unified_fields` declaration order.
pub type UnifiedRecord = IndexMap<String, Value>;

/// Build the unified record for one source from its two extraction results.
pub fn normalize_record(
    mapping: &MappingSpec,
    api_values: &IndexMap<String, Value>,
    html_values: &IndexMap<String, Value>,
) -> UnifiedRecord {
    let mut record = UnifiedRecord::with_capacity(mapping.unified_fields.len());

    for (field, expr) in &mapping.unified_fields {
        let resolved = match expr.split_once('.') {
            Some(("api", key)) => api_values.get(key).cloned().unwrap_or(Value::Null),
            Some(("html", key)) => html_values.get(key).cloned().unwrap_or(Value::Null),
            // No namespace, or an unrecognized one
            _ => Value::Null,
        };

        let value = match mapping.field_types.get(field) {
            Some(ty) => cast_value(resolved, *ty),
            None => resolved,
        };
        record.insert(field.clone(), value);
    }

    record
}

/// Coerce a resolved value; any incompatibility yields null.
fn cast_value(value: Value, ty: FieldType) -> Value {
    match ty {
        FieldType::Int => cast_int(value),
        FieldType::Float => cast_float(value),
    }
}

fn cast_int(value: Value) -> Value {
    match value {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Value::Number(n)
            } else {
                // Fractional numbers truncate toward zero
                match n.as_f64() {
                    Some(f)
                        if f.is_finite()
                            && f.trunc() >= i64::MIN as f64
                            && f.trunc() <= i64::MAX as f64 =>
                    {
                        Value::Number(Number::from(f.trunc() as i64))
                    }
                    _ => Value::Null,
                }
            }
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => Value::Number(Number::from(i)),
            Err(_) => Value::Null,
        },
        Value::Bool(b) => Value::Number(Number::from(b as i64)),
        _ => Value::Null,
    }
}

fn cast_float(value: Value) -> Value {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
