//! HTTP transport: sends a [`PreparedRequest`] and interprets Kraken's envelope.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ERROR_SIGIL, KrakenError};
use crate::request::PreparedRequest;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

const FORM_CONTENT_TYPE: HeaderValue =
    HeaderValue::from_static("application/x-www-form-urlencoded");

/// Kraken response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: Option<Vec<String>>,
    #[serde(default)]
    result: Option<Value>,
}

/// Issues exactly one POST per request. No retries.
#[derive(Clone, Debug)]
pub struct Transport {
    http_client: ClientWithMiddleware,
}

impl Transport {
    /// Create a transport whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, KrakenError> {
        let reqwest_client = reqwest::Client::builder().timeout(timeout).build()?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self { http_client })
    }

    /// Send the request and return the envelope's `result`.
    pub async fn send(&self, request: &PreparedRequest) -> Result<Value, KrakenError> {
        let response = self
            .http_client
            .post(request.url.clone())
            .headers(request.headers.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(request.body.clone())
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                KrakenError::Timeout
            } else {
                KrakenError::Http(e)
            }
        })?;

        if !status.is_success() {
            tracing::debug!(method = %request.method, %status, "non-success HTTP status");
            return Err(KrakenError::HttpStatus { status, body });
        }

        parse_envelope(&body)
    }
}

fn map_send_error(error: reqwest_middleware::Error) -> KrakenError {
    match error {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => KrakenError::Timeout,
        other => KrakenError::HttpMiddleware(other),
    }
}

/// Interpret a Kraken response body.
///
/// A non-empty `error` array is always a failure: the entries starting with
/// `E` become an [`ApiError`], and if there are none the call fails with
/// [`KrakenError::UnknownApiError`].
pub fn parse_envelope(body: &str) -> Result<Value, KrakenError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
        KrakenError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
    })?;

    let errors = envelope.error.unwrap_or_default();
    if !errors.is_empty() {
        for warning in errors.iter().filter(|e| !e.starts_with(ERROR_SIGIL)) {
            tracing::warn!(%warning, "Kraken API warning");
        }

        return Err(match ApiError::from_error_array(&errors) {
            Some(api_error) => KrakenError::Api(api_error),
            None => KrakenError::UnknownApiError { warnings: errors },
        });
    }

    Ok(envelope.result.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_returned_verbatim() {
        let value = parse_envelope(r#"{"error":[],"result":{"foo":1}}"#).unwrap();
        assert_eq!(value, json!({"foo": 1}));
    }

    #[test]
    fn test_missing_error_field_is_success() {
        let value = parse_envelope(r#"{"result":[1,2,3]}"#).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_missing_result_is_null() {
        assert_eq!(parse_envelope(r#"{"error":[]}"#).unwrap(), Value::Null);
    }

    #[test]
    fn test_error_sigil_stripped() {
        let err = parse_envelope(r#"{"error":["EGeneral:Invalid arguments"]}"#).unwrap_err();
        assert!(matches!(err, KrakenError::Api(_)));
        assert_eq!(err.to_string(), "General:Invalid arguments");
    }

    #[test]
    fn test_multiple_errors_joined() {
        let err =
            parse_envelope(r#"{"error":["EAPI:Invalid key","WAPI:Slow down","EAPI:Invalid nonce"]}"#)
                .unwrap_err();
        assert_eq!(err.to_string(), "API:Invalid key\nAPI:Invalid nonce");
    }

    #[test]
    fn test_errors_win_over_result() {
        let err = parse_envelope(r#"{"error":["EOrder:Insufficient funds"],"result":{"txid":[]}}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Order:Insufficient funds");
    }

    #[test]
    fn test_warnings_only_is_unknown_error() {
        let err = parse_envelope(r#"{"error":["WSomething"]}"#).unwrap_err();
        match err {
            KrakenError::UnknownApiError { warnings } => assert_eq!(warnings, vec!["WSomething"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_envelope("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, KrakenError::InvalidResponse(_)));
    }
}
