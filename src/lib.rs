//! Single-run hybrid collector.
//!
//! For each configured source this crate optionally calls a JSON API and
//! optionally fetches an HTML page, extracts named values from both (dot-path
//! navigation over JSON, first-match CSS selectors over HTML), merges them
//! into one flat unified record via declarative field mapping, validates
//! required fields, and exports the batch to CSV/JSON files.
//!
//! Execution is strictly sequential and blocking; a source either
//! contributes one complete record or is skipped with a reported failure.

pub mod collect;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod http;
pub mod normalize;
pub mod pipeline;
pub mod testing;
pub mod validate;

pub use config::{ApiSpec, FieldType, HtmlSpec, MappingSpec, SourceSpec};
pub use error::{CollectError, CollectorKind, ConfigError};
pub use http::{HttpTransport, RetryPolicy, UreqTransport};
pub use normalize::UnifiedRecord;
pub use pipeline::{Pipeline, RunReport, SourceFailure};
pub use validate::ValidationIssue;
