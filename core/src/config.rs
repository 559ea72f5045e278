//! Client configuration.
//!
//! All settings are fixed at construction. `ClientConfig::new` applies the
//! defaults below; `ClientConfig::from_env` reads the `CLICKUP_*` variables.

use std::time::Duration;

use crate::error::{ClientError, Result};

pub const API_URL: &str = "https://api.clickup.com/api/v2/";
pub const DEFAULT_RATE_LIMIT_BUFFER_WAIT_SECS: f64 = 5.0;
pub const DEFAULT_START_RATE_LIMIT_REMAINING: i64 = 100;
pub const DEFAULT_DECODE_RETRY_LIMIT: u32 = 3;
pub const DEFAULT_RATE_LIMIT_RETRY_LIMIT: u32 = 10;

pub const ENV_TOKEN: &str = "CLICKUP_TOKEN";
pub const ENV_API_URL: &str = "CLICKUP_API_URL";
pub const ENV_RETRY_RATE_LIMITED: &str = "CLICKUP_RETRY_RATE_LIMITED";
pub const ENV_RATE_LIMIT_BUFFER_SECS: &str = "CLICKUP_RATE_LIMIT_BUFFER_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Personal or OAuth token, sent verbatim in `Authorization`.
    pub token: String,
    pub api_url: String,
    pub retry_rate_limited_requests: bool,
    /// Seconds added to the server's reset timestamp before resuming.
    pub rate_limit_buffer_wait_time: f64,
    pub start_rate_limit_remaining: i64,
    /// Epoch seconds. `None` means "now" at client construction.
    pub start_rate_limit_reset: Option<f64>,
    pub decode_retry_limit: u32,
    pub rate_limit_retry_limit: u32,
    /// Per-call transport timeout.
    pub request_timeout: Option<Duration>,
    /// Upper bound on one `execute` call, waits and retries included.
    pub total_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: API_URL.to_string(),
            retry_rate_limited_requests: false,
            rate_limit_buffer_wait_time: DEFAULT_RATE_LIMIT_BUFFER_WAIT_SECS,
            start_rate_limit_remaining: DEFAULT_START_RATE_LIMIT_REMAINING,
            start_rate_limit_reset: None,
            decode_retry_limit: DEFAULT_DECODE_RETRY_LIMIT,
            rate_limit_retry_limit: DEFAULT_RATE_LIMIT_RETRY_LIMIT,
            request_timeout: None,
            total_timeout: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(ENV_TOKEN)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ClientError::validation(format!("{ENV_TOKEN} is not set")))?;
        let mut config = Self::new(token);
        if let Some(api_url) = lookup(ENV_API_URL) {
            config.api_url = api_url;
        }
        if let Some(flag) = lookup(ENV_RETRY_RATE_LIMITED) {
            config.retry_rate_limited_requests = parse_flag(&flag).ok_or_else(|| {
                ClientError::validation(format!("{ENV_RETRY_RATE_LIMITED} must be true or false, got {flag:?}"))
            })?;
        }
        if let Some(secs) = lookup(ENV_RATE_LIMIT_BUFFER_SECS) {
            config.rate_limit_buffer_wait_time = secs.trim().parse().map_err(|_| {
                ClientError::validation(format!("{ENV_RATE_LIMIT_BUFFER_SECS} must be a number, got {secs:?}"))
            })?;
        }
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
