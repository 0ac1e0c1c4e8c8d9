//! HTTP transport boundary and the shared retry/fail-fast policy.
//!
//! Both collectors issue requests through [`RetryPolicy::execute`] against an
//! abstract [`HttpTransport`], so the classification rules live in exactly one
//! place and tests can script outcomes without a network. The real transport
//! is a blocking `ureq::Agent`.

use std::time::Duration;

use thiserror::Error;

use crate::error::{CollectError, CollectorKind};

/// Per-attempt request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Retries after the first failed attempt (four attempts total).
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// One outbound request. Query parameters are carried separately and applied
/// by the transport; the URL is the already-templated base.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: String,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }
}

/// A received response. Statuses are data here — classification happens in
/// the retry policy, never in the transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Network-level failure: connection refused, DNS, timeout, unreadable body.
/// Always retryable.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportFailure {
    message: String,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Request-in/response-out seam between the collectors and the wire.
pub trait HttpTransport {
    fn send(&self, request: &RequestSpec) -> Result<HttpResponse, TransportFailure>;
}

/// Fixed retry strategy shared by both collectors.
///
/// `max_retries` counts retries beyond the first attempt: the default of 3
/// yields up to four total attempts. Attempts are issued back-to-back with no
/// delay. Network errors and 5xx responses are retryable; a 4xx fails the
/// fetch immediately; anything else is success.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Total attempt budget: one initial attempt plus `max_retries` retries.
    pub fn attempts(&self) -> u32 {
        1 + self.max_retries
    }

    /// Issue `request` until success, a non-retryable status, or exhaustion.
    pub fn execute(
        &self,
        transport: &dyn HttpTransport,
        request: &RequestSpec,
        kind: CollectorKind,
    ) -> Result<HttpResponse, CollectError> {
        let attempts = self.attempts();
        let mut last_reason = String::from("no attempts were made");

        for attempt in 1..=attempts {
            match transport.send(request) {
                Ok(response) if (500..=599).contains(&response.status) => {
                    last_reason = format!("server error (status {})", response.status);
                }
                Ok(response) if (400..=499).contains(&response.status) => {
                    return Err(CollectError::Status {
                        kind,
                        url: request.url.clone(),
                        status: response.status,
                    });
                }
                Ok(response) => return Ok(response),
                Err(failure) => {
                    last_reason = failure.to_string();
                }
            }
            tracing::debug!(%kind, url = %request.url, attempt, %last_reason, "retryable failure");
        }

        Err(CollectError::Transport {
            kind,
            url: request.url.clone(),
            attempts,
            reason: last_reason,
        })
    }
}

/// Real transport over a blocking `ureq::Agent`. The per-attempt timeout is
/// fixed at construction; HTTP error statuses come back as responses so the
/// policy can classify them.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl HttpTransport for UreqTransport {
    fn send(&self, request: &RequestSpec) -> Result<HttpResponse, TransportFailure> {
        let method = request.method.to_ascii_uppercase();
        let params = request.params.iter().map(|(k, v)| (k.as_str(), v.as_str()));

        // Unknown methods fall back to GET; config is treated as pre-validated.
        let result = match method.as_str() {
            "POST" | "PUT" | "PATCH" => {
                let mut builder = match method.as_str() {
                    "POST" => self.agent.post(&request.url),
                    "PUT" => self.agent.put(&request.url),
                    _ => self.agent.patch(&request.url),
                };
                builder = builder.query_pairs(params);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send_empty()
            }
            other => {
                let mut builder = match other {
                    "DELETE" => self.agent.delete(&request.url),
                    "HEAD" => self.agent.head(&request.url),
                    _ => self.agent.get(&request.url),
                };
                builder = builder.query_pairs(params);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
        };

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response
                    .into_body()
                    .read_to_string()
                    .map_err(|err| TransportFailure::new(format!("unreadable body: {err}")))?;
                Ok(HttpResponse { status, body })
            }
            Err(err) => Err(TransportFailure::new(err.to_string())),
        }
    }
}
