//! Dot-path navigation over JSON values.
//!
//! Paths address nested values by dot-separated segments: `items.0.id`
//! descends into the `items` key, index 0, then the `id` key. A segment
//! that cannot be followed resolves the whole path to a miss; callers map
//! misses to null. Traversal never fails.

use serde_json::Value;

/// Resolve `path` against `value`, borrowing the target.
///
/// Rules per segment:
/// - object: plain key lookup (numeric segments are ordinary keys here)
/// - array: all-ASCII-digit segment parsed as an index, in range only
/// - anything else: miss
///
/// The empty path resolves to the root. Containers are valid resolved
/// values — a path may stop at an object or array.
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index = parse_index(segment)?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Owning variant: a miss becomes `Value::Null`.
pub fn extract(value: &Value, path: &str) -> Value {
    extract_path(value, path).cloned().unwrap_or(Value::Null)
}

// Digits only; no sign, no whitespace. Overflow is a miss.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_key_lookup() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(extract(&data, "a.b"), json!(1));
        assert_eq!(extract(&data, "a.c"), Value::Null);
    }

    #[test]
    fn test_list_index() {
        let data = json!({"items": [{"id": 5}]});
        assert_eq!(extract(&data, "items.0.id"), json!(5));
        assert_eq!(extract(&data, "items.1.id"), Value::Null);
    }

    #[test]
    fn test_numeric_segment_against_object_is_a_key() {
        let data = json!({"0": "zero"});
        assert_eq!(extract(&data, "0"), json!("zero"));
    }

    #[test]
    fn test_index_must_be_digits_only() {
        let data = json!(["a", "b"]);
        assert_eq!(extract(&data, "-1"), Value::Null);
        assert_eq!(extract(&data, "+1"), Value::Null);
        assert_eq!(extract(&data, "01"), json!("b"));
    }

    #[test]
    fn test_container_is_a_valid_result() {
        let data = json!({"a": {"b": [1, 2]}});
        assert_eq!(extract(&data, "a.b"), json!([1, 2]));
        assert_eq!(extract(&data, ""), data);
    }

    #[test]
    fn test_descend_into_scalar_misses() {
        let data = json!({"a": 1});
        assert_eq!(extract(&data, "a.b"), Value::Null);
        assert_eq!(extract(&data, "a.0"), Value::Null);
    }

    #[test]
    fn test_deterministic() {
        let data = json!({"x": [0, {"y": "z"}]});
        let first = extract(&data, "x.1.y");
        let second = extract(&data, "x.1.y");
        assert_eq!(first, second);
        assert_eq!(first, json!("z"));
    }
}
