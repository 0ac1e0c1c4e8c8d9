//! Required-field validation over the accumulated batch.
//!
//! Every unified field a source declares is implicitly required. Issues are
//! plain data for whatever presentation layer consumes them; they never
//! block the run and never mutate a record.

use serde::Serialize;
use serde_json::Value;

use crate::normalize::UnifiedRecord;

pub const MISSING_OR_EMPTY: &str = "missing or empty";

/// One flagged field: which record (by batch position), which field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub index: usize,
    pub field: String,
    pub message: String,
}

/// Validate a batch where every record shares one required-field set.
pub fn validate_records(records: &[UnifiedRecord], required: &[String]) -> Vec<ValidationIssue> {
    validate_batch(records.iter().map(|record| (record, required)))
}

/// Validate a batch pairing each record with its own required-field set
/// (sources may declare different unified schemas). Indices follow batch
/// position.
pub fn validate_batch<'a, I>(batch: I) -> Vec<ValidationIssue>
where
    I: IntoIterator<Item = (&'a UnifiedRecord, &'a [String])>,
{
    let mut issues = Vec::new();
    for (index, (record, required)) in batch.into_iter().enumerate() {
        for field in required {
            if is_missing(record.get(field)) {
                issues.push(ValidationIssue {
                    index,
                    field: field.clone(),
                    message: MISSING_OR_EMPTY.to_string(),
                });
            }
        }
    }
    issues
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
