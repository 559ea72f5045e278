//! Blocking client for the ClickUp v2 REST API.
//!
//! # Overview
//! Resource operations (`get_task`, `create_list`, ...) are methods on
//! `ClickUpClient`. Each one builds an `ApiRequest` and hands it to
//! `ClickUpClient::execute`, the single request pipeline that honours
//! ClickUp's server-driven rate limit, retries transient failures within
//! fixed budgets and turns every other failure into a `ClientError`.
//!
//! # Design
//! - The network sits behind the `Transport` trait and time behind `Clock`,
//!   so the whole pipeline runs deterministically in tests. The default
//!   transport is a `ureq` agent.
//! - Request and response types are plain owned data (`HttpRequest`,
//!   `HttpResponse`); transports only move bytes.
//! - Rate limit state and the request counter belong to one client
//!   instance. The client is `Send + Sync` and can be shared across threads.
//! - Models mirror ClickUp's loose JSON: every field optional, IDs and
//!   timestamps accepted as strings or numbers.

pub mod api;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod rate_limit;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::ApiResponse;
pub use client::{ClickUpClient, ClientBuilder, RateLimitSleepHandler, RequestExceptionHandler};
pub use config::ClientConfig;
pub use error::{ClientError, ErrorContext, ErrorKind, Result};
pub use http::{ApiRequest, FileAttachment, HttpMethod, HttpRequest, HttpResponse};
pub use rate_limit::{Clock, RateLimitTracker, SystemClock};
pub use transport::{Transport, UreqTransport};
