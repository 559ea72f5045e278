//! The ClickUp client and its request pipeline.
//!
//! # Design
//! Every resource operation funnels into `ClickUpClient::execute`, which runs
//! one bounded loop per call:
//!
//! 1. wait out the rate limit window if the last response said the quota is
//!    spent (`remaining <= 1`),
//! 2. send the request through the `Transport`,
//! 3. classify the response and update the rate limit tracker,
//! 4. return, fail, or go around again.
//!
//! Two failure classes are transient. A body that is not JSON is retried up
//! to `decode_retry_limit` times; a 429 is retried up to
//! `rate_limit_retry_limit` times when `retry_rate_limited_requests` is on.
//! Each class has its own counter, so interleaved failures cannot spend each
//! other's budget. Everything else is returned to the caller as is.
//!
//! Session state (request counter, rate limit tracker) belongs to the client
//! instance. The tracker sits behind a mutex that is never held while a hook
//! runs, so hooks may read the client freely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::classify::{classify, error_context, ApiResponse, Outcome, TOO_MANY_REQUESTS};
use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorKind, Result};
use crate::http::{encode_multipart, join_url, ApiRequest, HttpMethod, HttpRequest, HttpResponse};
use crate::rate_limit::{wait_duration, Clock, RateLimitTracker, SystemClock};
use crate::transport::{Transport, UreqTransport};

/// Called on every response whose body fails to decode, retried or not.
pub type RequestExceptionHandler = Arc<dyn Fn(&serde_json::Error, &HttpResponse, &ClickUpClient) + Send + Sync>;

/// Called with the computed wait (seconds, may be non-positive) right before
/// the client pauses for the rate limit window.
pub type RateLimitSleepHandler = Arc<dyn Fn(f64, &ClickUpClient) + Send + Sync>;

pub struct ClickUpClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    request_exception_handler: Option<RequestExceptionHandler>,
    sleep_on_rate_limit_handler: Option<RateLimitSleepHandler>,
    request_count: AtomicU64,
    rate_limit: Mutex<RateLimitTracker>,
}

impl std::fmt::Debug for ClickUpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickUpClient")
            .field("api_url", &self.config.api_url)
            .field("request_count", &self.request_count())
            .field("rate_limit", &*lock_unpoisoned(&self.rate_limit))
            .finish_non_exhaustive()
    }
}

/// Builder for `ClickUpClient`. Obtain one with `ClickUpClient::builder`.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    clock: Arc<dyn Clock>,
    request_exception_handler: Option<RequestExceptionHandler>,
    sleep_on_rate_limit_handler: Option<RateLimitSleepHandler>,
}

impl ClientBuilder {
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            clock: Arc::new(SystemClock),
            request_exception_handler: None,
            sleep_on_rate_limit_handler: None,
        }
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.config.api_url = api_url.into();
        self
    }

    pub fn retry_rate_limited_requests(mut self, retry: bool) -> Self {
        self.config.retry_rate_limited_requests = retry;
        self
    }

    pub fn rate_limit_buffer_wait_time(mut self, seconds: f64) -> Self {
        self.config.rate_limit_buffer_wait_time = seconds;
        self
    }

    pub fn start_rate_limit_remaining(mut self, remaining: i64) -> Self {
        self.config.start_rate_limit_remaining = remaining;
        self
    }

    pub fn start_rate_limit_reset(mut self, epoch_seconds: f64) -> Self {
        self.config.start_rate_limit_reset = Some(epoch_seconds);
        self
    }

    pub fn decode_retry_limit(mut self, limit: u32) -> Self {
        self.config.decode_retry_limit = limit;
        self
    }

    pub fn rate_limit_retry_limit(mut self, limit: u32) -> Self {
        self.config.rate_limit_retry_limit = limit;
        self
    }

    /// Ignored when a custom transport is installed.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    pub fn total_timeout(mut self, timeout: Duration) -> Self {
        self.config.total_timeout = Some(timeout);
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn on_request_exception<F>(mut self, handler: F) -> Self
    where
        F: Fn(&serde_json::Error, &HttpResponse, &ClickUpClient) + Send + Sync + 'static,
    {
        self.request_exception_handler = Some(Arc::new(handler));
        self
    }

    pub fn on_rate_limit_sleep<F>(mut self, handler: F) -> Self
    where
        F: Fn(f64, &ClickUpClient) + Send + Sync + 'static,
    {
        self.sleep_on_rate_limit_handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> ClickUpClient {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new(self.config.request_timeout)),
        };
        let reset = self
            .config
            .start_rate_limit_reset
            .unwrap_or_else(|| self.clock.now());
        let tracker = RateLimitTracker::new(
            self.config.start_rate_limit_remaining,
            reset,
            self.config.rate_limit_buffer_wait_time,
        );
        ClickUpClient {
            config: self.config,
            transport,
            clock: self.clock,
            request_exception_handler: self.request_exception_handler,
            sleep_on_rate_limit_handler: self.sleep_on_rate_limit_handler,
            request_count: AtomicU64::new(0),
            rate_limit: Mutex::new(tracker),
        }
    }
}

impl ClickUpClient {
    /// Client with default settings against the public API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::builder(token).build()
    }

    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::from_config(ClientConfig::new(token))
    }

    pub fn from_env() -> Result<Self> {
        Ok(ClientBuilder::from_config(ClientConfig::from_env()?).build())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn token(&self) -> &str {
        &self.config.token
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Physical HTTP calls issued so far, retries included.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn rate_limit_remaining(&self) -> i64 {
        lock_unpoisoned(&self.rate_limit).remaining()
    }

    pub fn rate_limit_reset(&self) -> f64 {
        lock_unpoisoned(&self.rate_limit).reset()
    }

    /// Run one API call through the rate limit / retry pipeline.
    pub fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let deadline = request
            .timeout
            .or(self.config.total_timeout)
            .map(|timeout| self.clock.now() + timeout.as_secs_f64());
        let http_request = self.build_http_request(request)?;
        let decode_retry_limit = self.config.decode_retry_limit;
        let rate_limit_retry_limit = self.config.rate_limit_retry_limit;
        let mut decode_failures = 0u32;
        let mut rate_limit_retries = 0u32;
        let mut attempt = 0u32;

        loop {
            self.check_rate_limit(request, deadline)?;
            if let Some(deadline) = deadline {
                if self.clock.now() > deadline {
                    return Err(deadline_exceeded(request));
                }
            }

            attempt += 1;
            self.request_count.fetch_add(1, Ordering::Relaxed);
            debug!(method = %request.method, uri = %request.uri, attempt, "sending request");
            let response = self.transport.send(&http_request)?;
            debug!(method = %request.method, uri = %request.uri, attempt, status = response.status, "received response");

            let classification = classify(request, &response, self.config.retry_rate_limited_requests);
            if let Some(headers) = classification.rate_limit {
                lock_unpoisoned(&self.rate_limit).update(headers);
            }

            match classification.outcome {
                Outcome::Success(body) => return Ok(body),
                Outcome::HardError(err) => return Err(err),
                Outcome::DecodeFailure(err) => {
                    if let Some(handler) = &self.request_exception_handler {
                        handler(&err, &response, self);
                    }
                    if decode_failures >= decode_retry_limit {
                        return Err(ClientError::new(
                            ErrorKind::DecodeRetryExhausted,
                            format!("Failed to decode JSON response after {decode_retry_limit} retries"),
                        )
                        .with_status(response.status)
                        .with_context(error_context(request, &response))
                        .with_source(err));
                    }
                    decode_failures += 1;
                    warn!(
                        uri = %request.uri,
                        status = response.status,
                        retry = decode_failures,
                        error = %err,
                        "response body is not JSON, retrying"
                    );
                }
                Outcome::RateLimited { retryable: true } => {
                    if rate_limit_retries >= rate_limit_retry_limit {
                        return Err(ClientError::new(
                            ErrorKind::RateLimitRetryExhausted,
                            format!("Rate limit retry exceeded after {rate_limit_retry_limit} attempts"),
                        )
                        .with_status(TOO_MANY_REQUESTS));
                    }
                    rate_limit_retries += 1;
                    warn!(uri = %request.uri, retry = rate_limit_retries, "rate limited, retrying");
                }
                Outcome::RateLimited { retryable: false } => {
                    return Err(ClientError::new(ErrorKind::RateLimited, "Rate limit exceeded")
                        .with_status(response.status)
                        .with_context(error_context(request, &response)));
                }
            }
        }
    }

    /// Pause until the rate limit window reopens, if the quota is spent.
    fn check_rate_limit(&self, request: &ApiRequest, deadline: Option<f64>) -> Result<()> {
        let now = self.clock.now();
        let pending = lock_unpoisoned(&self.rate_limit).pending_wait(now);
        let Some(seconds) = pending else {
            return Ok(());
        };
        if let Some(deadline) = deadline {
            if now + seconds.max(0.0) > deadline {
                return Err(deadline_exceeded(request));
            }
        }
        let duration = wait_duration(seconds).map_err(|err| {
            ClientError::new(ErrorKind::RateLimited, "Rate limit reset is too far away to wait for").with_source(err)
        })?;
        if let Some(handler) = &self.sleep_on_rate_limit_handler {
            handler(seconds, self);
        }
        if let Some(duration) = duration {
            info!(uri = %request.uri, wait_secs = seconds, "rate limit reached, sleeping until reset");
            self.clock.sleep(duration);
        }
        Ok(())
    }

    fn build_http_request(&self, request: &ApiRequest) -> Result<HttpRequest> {
        let url = join_url(&self.config.api_url, &request.uri);
        let mut headers = vec![("Authorization".to_string(), self.config.token.clone())];
        // Files only travel on POST; other methods keep their JSON body.
        let upload = request
            .attachment
            .as_ref()
            .filter(|_| request.file_upload && request.method == HttpMethod::Post);

        let body = match (request.method, upload) {
            (_, Some(file)) => {
                let form = encode_multipart(request.payload(), file).map_err(|err| {
                    ClientError::new(ErrorKind::Serialization, format!("failed to encode multipart body: {err}"))
                        .with_source(err)
                })?;
                headers.push(("Content-Type".to_string(), form.content_type()));
                Some(form.bytes)
            }
            (HttpMethod::Post | HttpMethod::Put, None) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                request
                    .payload()
                    .map(serde_json::to_vec)
                    .transpose()
                    .map_err(ClientError::serialization)?
            }
            (HttpMethod::Get | HttpMethod::Delete, None) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                None
            }
        };

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }

    /// Execute and decode the JSON body into `T`.
    pub(crate) fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        parse(self.execute(&request)?)
    }

    /// Execute and discard the body.
    pub(crate) fn send(&self, request: ApiRequest) -> Result<()> {
        self.execute(&request).map(|_| ())
    }
}

pub(crate) fn parse<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
    serde_json::from_value(response.into_json()).map_err(ClientError::deserialization)
}

fn deadline_exceeded(request: &ApiRequest) -> ClientError {
    ClientError::new(
        ErrorKind::DeadlineExceeded,
        format!("Deadline exceeded before {} {} completed", request.method, request.uri),
    )
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
