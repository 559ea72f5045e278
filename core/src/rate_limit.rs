//! Server-driven rate limit tracking.
//!
//! ClickUp reports the remaining quota and the reset instant (epoch seconds)
//! on every response. The tracker keeps the latest pair and tells the client
//! how long to pause before the next request once the quota is down to one.

use std::time::{Duration, TryFromFloatSecsError};

use chrono::Utc;

use crate::http::HttpResponse;

pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Wall clock and sleep primitive used by the client.
pub trait Clock: Send + Sync {
    /// Current time as fractional epoch seconds.
    fn now(&self) -> f64;

    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Rate limit values read from one response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitHeaders {
    pub remaining: i64,
    pub reset: f64,
}

impl RateLimitHeaders {
    /// Missing or unparsable headers read as zero.
    pub fn from_response(response: &HttpResponse) -> Self {
        let remaining = response
            .header(HEADER_REMAINING)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(0);
        let reset = response
            .header(HEADER_RESET)
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|reset| reset.is_finite())
            .unwrap_or(0.0);
        Self { remaining, reset }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitTracker {
    remaining: i64,
    reset: f64,
    buffer_wait_time: f64,
}

impl RateLimitTracker {
    pub fn new(remaining: i64, reset: f64, buffer_wait_time: f64) -> Self {
        Self {
            remaining,
            reset,
            buffer_wait_time,
        }
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn reset(&self) -> f64 {
        self.reset
    }

    /// Seconds to wait before the next request, or `None` while quota is left.
    ///
    /// The value is `reset + buffer - now` and may be zero or negative when
    /// the window has already rolled over.
    pub fn pending_wait(&self, now: f64) -> Option<f64> {
        if self.remaining > 1 {
            return None;
        }
        Some(self.reset + self.buffer_wait_time - now)
    }

    /// Headers are authoritative: the previous state is always replaced.
    pub fn update(&mut self, headers: RateLimitHeaders) {
        self.remaining = headers.remaining;
        self.reset = headers.reset;
    }
}

/// Turn a possibly non-positive wait into a sleepable duration.
///
/// A positive wait too long for `Duration` is an error, not a panic: the
/// reset instant comes straight from a response header.
pub(crate) fn wait_duration(seconds: f64) -> Result<Option<Duration>, TryFromFloatSecsError> {
    if seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).map(Some)
    } else {
        Ok(None)
    }
}
