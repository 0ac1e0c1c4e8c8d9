//! Testing utilities.
//!
//! [`ScriptedTransport`] stands in for the real HTTP transport: it replays a
//! fixed sequence of outcomes and records every request, so retry behavior
//! and collector plumbing can be asserted without a network.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::http::{HttpResponse, HttpTransport, RequestSpec, TransportFailure};

/// A mock transport that pops one scripted outcome per request.
///
/// Once the script is exhausted, further requests fail with a transport
/// error, which keeps runaway retry loops visible in tests.
pub struct ScriptedTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, TransportFailure>>>,
    repeat: Option<HttpResponse>,
    requests: RefCell<Vec<RequestSpec>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<Result<HttpResponse, TransportFailure>>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            repeat: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Shorthand: every request succeeds with the same status and body.
    pub fn always(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcomes: RefCell::new(VecDeque::new()),
            repeat: Some(HttpResponse {
                status,
                body: body.into(),
            }),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Number of requests issued so far.
    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Copies of every request seen, in order.
    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: &RequestSpec) -> Result<HttpResponse, TransportFailure> {
        self.requests.borrow_mut().push(request.clone());
        match self.outcomes.borrow_mut().pop_front() {
            Some(outcome) => outcome,
            None => match &self.repeat {
                Some(response) => Ok(response.clone()),
                None => Err(TransportFailure::new("scripted transport exhausted")),
            },
        }
    }
}
