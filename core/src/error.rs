//! Error type for the ClickUp client.
//!
//! # Design
//! Every failure reaches the caller as a single `ClientError`: a message, an
//! optional HTTP status code and, for errors produced from a server response,
//! an `ErrorContext` snapshot of that response. `ErrorKind` discriminates the
//! failure class so callers can match on it instead of comparing messages.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Failure class of a `ClientError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A local precondition failed before any request was sent.
    Validation,
    /// The server answered 4xx/5xx (other than 429).
    Upstream,
    /// The server answered 429 and the client is not configured to retry.
    RateLimited,
    /// The server kept answering 429 until the retry budget ran out.
    RateLimitRetryExhausted,
    /// The response body never decoded as JSON within the retry budget.
    DecodeRetryExhausted,
    /// The request could not be delivered (DNS, connect, timeout, ...).
    Transport,
    /// The request payload could not be encoded.
    Serialization,
    /// A successful response did not match the expected model.
    Deserialization,
    /// The total timeout elapsed while attempting or waiting.
    DeadlineExceeded,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Upstream => "upstream",
            Self::RateLimited => "rate_limited",
            Self::RateLimitRetryExhausted => "rate_limit_retry_exhausted",
            Self::DecodeRetryExhausted => "decode_retry_exhausted",
            Self::Transport => "transport",
            Self::Serialization => "serialization",
            Self::Deserialization => "deserialization",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

/// Snapshot of the exchange that produced an upstream error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorContext {
    /// Raw response body.
    pub response: String,
    /// Response headers, names lowercased.
    pub headers: BTreeMap<String, String>,
    /// Request URI relative to the API base URL.
    pub uri: String,
    /// JSON payload that was sent, if any.
    pub data: Option<Value>,
}

/// The single error type returned by every client operation.
#[derive(Debug, Error)]
#[error("{}", render(.status_code, .message))]
pub struct ClientError {
    kind: ErrorKind,
    message: String,
    status_code: Option<u16>,
    context: Option<Box<ErrorContext>>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

fn render(status_code: &Option<u16>, message: &str) -> String {
    match status_code {
        Some(status) => format!("({status}) {message}"),
        None => message.to_string(),
    }
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            context: None,
            source: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn transport(message: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(ErrorKind::Transport, message).with_source(source)
    }

    pub fn serialization(source: serde_json::Error) -> Self {
        Self::new(
            ErrorKind::Serialization,
            format!("failed to serialize request payload: {source}"),
        )
        .with_source(source)
    }

    pub fn deserialization(source: serde_json::Error) -> Self {
        Self::new(
            ErrorKind::Deserialization,
            format!("failed to deserialize response: {source}"),
        )
        .with_source(source)
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(Box::new(context));
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.as_deref()
    }
}
