//! Response classification.
//!
//! Order matters: a body that does not decode as JSON is classified before
//! headers are read, so a garbled response never touches the rate limit
//! state. Everything else updates the tracker, then is sorted by status.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ClientError, ErrorContext, ErrorKind};
use crate::http::{ApiRequest, HttpMethod, HttpResponse};
use crate::rate_limit::RateLimitHeaders;

pub(crate) const TOO_MANY_REQUESTS: u16 = 429;

/// Successful result of `ClickUpClient::execute`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    /// DELETE endpoints answer with an empty object; the status is returned.
    Status(u16),
}

impl ApiResponse {
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Status(_) => Value::Null,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Outcome {
    DecodeFailure(serde_json::Error),
    RateLimited { retryable: bool },
    HardError(ClientError),
    Success(ApiResponse),
}

#[derive(Debug)]
pub(crate) struct Classification {
    pub(crate) outcome: Outcome,
    /// `None` only for decode failures.
    pub(crate) rate_limit: Option<RateLimitHeaders>,
}

pub(crate) fn classify(request: &ApiRequest, response: &HttpResponse, retry_rate_limited: bool) -> Classification {
    let body = match response.json() {
        Ok(body) => body,
        Err(err) => {
            return Classification {
                outcome: Outcome::DecodeFailure(err),
                rate_limit: None,
            }
        }
    };
    let rate_limit = Some(RateLimitHeaders::from_response(response));

    let outcome = if response.status == TOO_MANY_REQUESTS {
        Outcome::RateLimited {
            retryable: retry_rate_limited,
        }
    } else if !response.is_ok() {
        Outcome::HardError(
            ClientError::new(ErrorKind::Upstream, error_message(&body))
                .with_status(response.status)
                .with_context(error_context(request, response)),
        )
    } else if request.method == HttpMethod::Delete {
        Outcome::Success(ApiResponse::Status(response.status))
    } else {
        Outcome::Success(ApiResponse::Json(body))
    };

    Classification { outcome, rate_limit }
}

/// The `err` field when present, otherwise the whole body as JSON text.
pub(crate) fn error_message(body: &Value) -> String {
    match body.get("err") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}

pub(crate) fn error_context(request: &ApiRequest, response: &HttpResponse) -> ErrorContext {
    let headers: BTreeMap<String, String> = response
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect();
    ErrorContext {
        response: response.body.clone(),
        headers,
        uri: request.uri.clone(),
        data: request.payload().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok_headers(response: HttpResponse) -> HttpResponse {
        response
            .with_header("x-ratelimit-remaining", "99")
            .with_header("x-ratelimit-reset", "1700000000")
    }

    #[test]
    fn non_json_body_is_decode_failure() {
        let response = ok_headers(HttpResponse::new(502, "<html>Bad Gateway</html>"));
        let result = classify(&ApiRequest::get("team"), &response, false);
        assert!(matches!(result.outcome, Outcome::DecodeFailure(_)));
        assert!(result.rate_limit.is_none());
    }

    #[test]
    fn decode_failure_wins_over_status() {
        let response = HttpResponse::new(429, "");
        let result = classify(&ApiRequest::get("team"), &response, true);
        assert!(matches!(result.outcome, Outcome::DecodeFailure(_)));
    }

    #[test]
    fn rate_limited_reports_retryability() {
        let response = HttpResponse::new(429, r#"{"err":"Rate limit reached","ECODE":"APP_002"}"#)
            .with_header("x-ratelimit-remaining", "0")
            .with_header("x-ratelimit-reset", "1700000060");
        let result = classify(&ApiRequest::get("team"), &response, true);
        assert!(matches!(result.outcome, Outcome::RateLimited { retryable: true }));
        assert_eq!(
            result.rate_limit,
            Some(RateLimitHeaders {
                remaining: 0,
                reset: 1_700_000_060.0
            })
        );

        let result = classify(&ApiRequest::get("team"), &response, false);
        assert!(matches!(result.outcome, Outcome::RateLimited { retryable: false }));
    }

    #[test]
    fn hard_error_uses_err_field_and_context() {
        let request = ApiRequest::post("list/1/task").json(json!({"name": "x"}));
        let response = ok_headers(HttpResponse::new(400, r#"{"err":"Task name invalid","ECODE":"INPUT_005"}"#));
        let Outcome::HardError(err) = classify(&request, &response, false).outcome else {
            panic!("expected hard error");
        };
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.message(), "Task name invalid");
        assert_eq!(err.status_code(), Some(400));
        let context = err.context().unwrap();
        assert_eq!(context.uri, "list/1/task");
        assert_eq!(context.data, Some(json!({"name": "x"})));
        assert_eq!(context.headers.get("x-ratelimit-remaining").map(String::as_str), Some("99"));
        assert!(context.response.contains("INPUT_005"));
    }

    #[test]
    fn hard_error_without_err_field_serializes_body() {
        let response = HttpResponse::new(500, r#"{"ECODE":"X"}"#);
        let Outcome::HardError(err) = classify(&ApiRequest::get("team"), &response, false).outcome else {
            panic!("expected hard error");
        };
        assert_eq!(err.message(), r#"{"ECODE":"X"}"#);
        assert!(err.context().unwrap().data.is_none());
    }

    #[test]
    fn delete_success_returns_status() {
        let response = HttpResponse::new(200, "{}");
        let result = classify(&ApiRequest::delete("task/abc"), &response, false);
        assert!(matches!(result.outcome, Outcome::Success(ApiResponse::Status(200))));
    }

    #[test]
    fn success_returns_body() {
        let response = HttpResponse::new(200, r#"{"teams":[]}"#);
        let Outcome::Success(ApiResponse::Json(body)) = classify(&ApiRequest::get("team"), &response, false).outcome
        else {
            panic!("expected json success");
        };
        assert_eq!(body, json!({"teams": []}));
    }
}
