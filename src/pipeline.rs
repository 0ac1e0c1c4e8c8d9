//! The single-run orchestrator.
//!
//! Sources are processed one at a time, in config order: build the context,
//! run the API collector, then the HTML collector, then normalize. A fetch
//! failure skips that source only. One validation pass runs over the whole
//! accumulated batch at the end. The report is plain data — presentation
//! (and the export decision, e.g. dry-run) belongs to the caller.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::collect::{api, html, Context};
use crate::config::SourceSpec;
use crate::error::CollectError;
use crate::http::{HttpTransport, RetryPolicy};
use crate::normalize::{normalize_record, UnifiedRecord};
use crate::validate::{validate_batch, ValidationIssue};

/// One skipped source: its id plus the rendered failure.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub source_id: String,
    pub message: String,
}

/// Everything one run produces. Records keep original source order, minus
/// skipped sources.
#[derive(Debug)]
pub struct RunReport {
    pub records: Vec<UnifiedRecord>,
    pub failures: Vec<SourceFailure>,
    pub issues: Vec<ValidationIssue>,
}

pub struct Pipeline<'a> {
    policy: RetryPolicy,
    transport: &'a dyn HttpTransport,
}

impl<'a> Pipeline<'a> {
    pub fn new(policy: RetryPolicy, transport: &'a dyn HttpTransport) -> Self {
        Self { policy, transport }
    }

    /// Process every source and validate the accumulated batch.
    pub fn run(&self, sources: &[SourceSpec]) -> RunReport {
        let mut records: Vec<UnifiedRecord> = Vec::new();
        let mut required_sets: Vec<Vec<String>> = Vec::new();
        let mut failures: Vec<SourceFailure> = Vec::new();

        for source in sources {
            let context = build_context(source);
            match self.process(source, &context) {
                Ok(record) => {
                    debug!(source = %source.id, fields = record.len(), "collected");
                    required_sets.push(source.mapping.unified_fields.keys().cloned().collect());
                    records.push(record);
                }
                Err(err) => {
                    warn!(source = %source.id, error = %err, "source failed, skipping");
                    failures.push(SourceFailure {
                        source_id: source.id.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let issues = validate_batch(
            records
                .iter()
                .zip(required_sets.iter().map(Vec::as_slice)),
        );

        RunReport {
            records,
            failures,
            issues,
        }
    }

    // API first, then HTML, strictly sequential. Either failure aborts this
    // source as a whole.
    fn process(
        &self,
        source: &SourceSpec,
        context: &Context,
    ) -> Result<UnifiedRecord, CollectError> {
        let api_values = match &source.api {
            Some(spec) => api::collect(spec, context, &self.policy, self.transport)?,
            None => IndexMap::new(),
        };
        let html_values = match &source.html {
            Some(spec) => html::collect(spec, context, &self.policy, self.transport)?,
            None => IndexMap::new(),
        };
        Ok(normalize_record(&source.mapping, &api_values, &html_values))
    }
}

/// The only key available to URL templating: the source's own id.
pub fn build_context(source: &SourceSpec) -> Context {
    Context::from([("external_id".to_string(), source.id.clone())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_sources;
    use crate::testing::ScriptedTransport;

    #[test]
    fn test_build_context_carries_the_source_id() {
        let sources = parse_sources(
            r#"
- id: gadget-7
  html:
    url: "https://example.test/{external_id}"
  mapping:
    unified_fields:
      title: html.title
"#,
        )
        .unwrap();

        let context = build_context(&sources[0]);
        assert_eq!(context["external_id"], "gadget-7");
    }

    #[test]
    fn test_disabled_sections_yield_all_null_record() {
        let sources = parse_sources(
            r#"
- id: dormant
  api:
    enabled: false
  html:
    enabled: false
  mapping:
    unified_fields:
      title: api.title
      image: html.image
"#,
        )
        .unwrap();

        let transport = ScriptedTransport::new(Vec::new());
        let report = Pipeline::new(RetryPolicy::default(), &transport).run(&sources);

        assert_eq!(transport.calls(), 0);
        assert!(report.failures.is_empty());
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0]["title"], serde_json::Value::Null);
        assert_eq!(report.records[0]["image"], serde_json::Value::Null);
        // All-null fields are flagged, not fatal.
        assert_eq!(report.issues.len(), 2);
    }
}
