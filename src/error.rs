//! Typed errors for the collection pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`); the binary wraps
//! these with context at the edge.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which collector a failure belongs to. Carried on every per-source error
/// so reports can distinguish the API fetch from the HTML fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorKind {
    Api,
    Html,
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectorKind::Api => f.write_str("api"),
            CollectorKind::Html => f.write_str("html"),
        }
    }
}

/// Errors that abort processing of a single source.
///
/// All four variants are fatal for that source only; the pipeline catches
/// them at the per-source boundary and moves on. Extraction misses and cast
/// failures are *not* errors — they resolve to null values.
#[derive(Debug, Error)]
pub enum CollectError {
    /// A `{placeholder}` in the URL template has no matching context key.
    #[error("{kind}: missing context key '{placeholder}' for url template")]
    Template {
        kind: CollectorKind,
        placeholder: String,
    },

    /// All attempts exhausted on retryable failures (network errors, 5xx).
    #[error("{kind}: request to {url} failed after {attempts} attempts: {reason}")]
    Transport {
        kind: CollectorKind,
        url: String,
        attempts: u32,
        reason: String,
    },

    /// A 4xx response; never retried.
    #[error("{kind}: request to {url} rejected with status {status}")]
    Status {
        kind: CollectorKind,
        url: String,
        status: u16,
    },

    /// Response body could not be parsed (malformed JSON).
    #[error("{kind}: response from {url} could not be parsed: {reason}")]
    Parse {
        kind: CollectorKind,
        url: String,
        reason: String,
    },
}

impl CollectError {
    pub fn kind(&self) -> CollectorKind {
        match self {
            CollectError::Template { kind, .. }
            | CollectError::Transport { kind, .. }
            | CollectError::Status { kind, .. }
            | CollectError::Parse { kind, .. } => *kind,
        }
    }
}

/// Errors raised while loading the source configuration. Fatal for the whole
/// run, before any source is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Invalid(String),
}
