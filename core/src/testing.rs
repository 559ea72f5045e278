//! In-memory transport and clock for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::rate_limit::Clock;
use crate::transport::Transport;

pub(crate) const NOW: f64 = 1_700_000_000.0;

pub(crate) fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

/// Plays back canned responses in order and records every request.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    fail: bool,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Body of the `index`th request parsed as JSON.
    pub(crate) fn json_body(&self, index: usize) -> Value {
        let requests = self.requests.lock().unwrap();
        serde_json::from_slice(requests[index].body.as_deref().expect("request has no body")).unwrap()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            let source = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
            return Err(ClientError::transport("connection refused", source));
        }
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.expect("script ran out of responses"))
    }
}

/// Clock frozen at a fixed instant; `sleep` records and advances it.
#[derive(Clone)]
pub(crate) struct ManualClock {
    now: Arc<Mutex<f64>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl ManualClock {
    pub(crate) fn new(now: f64) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.now.lock().unwrap() += duration.as_secs_f64();
    }
}
