//! Error types for the Kraken dispatch client.

use thiserror::Error;

/// Leading character Kraken uses to mark an entry of the `error` array as an error.
///
/// Entries with any other leading character (usually `W`) are warnings.
pub const ERROR_SIGIL: char = 'E';

/// The main error type for all client operations.
#[derive(Error, Debug)]
pub enum KrakenError {
    /// API key or secret was not configured when the client was built.
    #[error("Missing credentials: {0} is not configured")]
    MissingCredentials(&'static str),

    /// A configured value cannot be used to build requests.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Caller supplied parameters cannot be encoded as a request body.
    #[error("Invalid request parameters: {0}")]
    InvalidParams(String),

    /// The method name is not in the method registry.
    #[error("{0} is not a valid API method.")]
    InvalidMethod(String),

    /// Kraken API returned one or more errors.
    #[error("{0}")]
    Api(ApiError),

    /// Kraken API returned a non-empty error list without any error entries.
    #[error("Kraken API returned an unknown error")]
    UnknownApiError {
        /// The entries that were returned (warnings only)
        warnings: Vec<String>,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// Server answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code returned by the server
        status: reqwest::StatusCode,
        /// Raw response body
        body: String,
    },

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Form encoding of the request body failed
    #[error("Form encoding error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors reported by Kraken in the response envelope.
///
/// Each message has its leading [`ERROR_SIGIL`] stripped, so
/// `"EGeneral:Invalid arguments"` is stored as `"General:Invalid arguments"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    messages: Vec<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages.join("\n"))
    }
}

impl ApiError {
    /// Create an API error from already stripped messages.
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Extract the errors from Kraken's `error` array.
    ///
    /// Only entries starting with [`ERROR_SIGIL`] are kept. Returns `None`
    /// when no entry qualifies.
    pub fn from_error_array(errors: &[String]) -> Option<Self> {
        let messages: Vec<String> = errors
            .iter()
            .filter_map(|e| e.strip_prefix(ERROR_SIGIL))
            .map(str::to_string)
            .collect();

        if messages.is_empty() {
            None
        } else {
            Some(Self { messages })
        }
    }

    /// The sigil-stripped messages, in the order Kraken returned them.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn any(&self, category: &str, needle: &str) -> bool {
        self.messages.iter().any(|m| {
            m.split_once(':')
                .is_some_and(|(cat, msg)| cat == category && msg.contains(needle))
        })
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.any("API", "Rate limit") || self.any("Order", "Rate limit")
    }

    /// Check if this is an invalid nonce error.
    pub fn is_invalid_nonce(&self) -> bool {
        self.any("API", "Invalid nonce")
    }

    /// Check if this is an invalid key error.
    pub fn is_invalid_key(&self) -> bool {
        self.any("API", "Invalid key")
    }

    /// Check if this is an invalid signature error.
    pub fn is_invalid_signature(&self) -> bool {
        self.any("API", "Invalid signature")
    }

    /// Check if this is a permission denied error.
    pub fn is_permission_denied(&self) -> bool {
        self.any("General", "Permission denied")
    }
}

/// Known Kraken error messages, as they appear after the sigil is stripped.
pub mod error_codes {
    /// General errors
    pub const INVALID_ARGUMENTS: &str = "General:Invalid arguments";
    pub const PERMISSION_DENIED: &str = "General:Permission denied";
    pub const UNKNOWN_METHOD: &str = "General:Unknown method";
    pub const INTERNAL_ERROR: &str = "General:Internal error";

    /// API errors
    pub const INVALID_KEY: &str = "API:Invalid key";
    pub const INVALID_SIGNATURE: &str = "API:Invalid signature";
    pub const INVALID_NONCE: &str = "API:Invalid nonce";
    pub const RATE_LIMIT_EXCEEDED: &str = "API:Rate limit exceeded";

    /// Order errors
    pub const INSUFFICIENT_FUNDS: &str = "Order:Insufficient funds";
    pub const ORDER_NOT_FOUND: &str = "Order:Unknown order";

    /// Query errors
    pub const UNKNOWN_ASSET_PAIR: &str = "Query:Unknown asset pair";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_api_error_strips_sigil() {
        let error = ApiError::from_error_array(&strings(&["EGeneral:Invalid arguments"])).unwrap();
        assert_eq!(error.messages()[0], error_codes::INVALID_ARGUMENTS);
        assert_eq!(error.to_string(), "General:Invalid arguments");
    }

    #[test]
    fn test_api_error_drops_warnings_and_joins() {
        let errors = strings(&["WGeneral:Deprecated", "EAPI:Invalid key", "EAPI:Invalid nonce"]);
        let error = ApiError::from_error_array(&errors).unwrap();
        assert_eq!(error.to_string(), "API:Invalid key\nAPI:Invalid nonce");
        assert!(error.is_invalid_key());
        assert!(error.is_invalid_nonce());
        assert!(!error.is_rate_limit());
    }

    #[test]
    fn test_api_error_warnings_only() {
        assert!(ApiError::from_error_array(&strings(&["WSomething"])).is_none());
        assert!(ApiError::from_error_array(&[]).is_none());
    }

    #[test]
    fn test_error_display() {
        let err = KrakenError::InvalidMethod("Bogus".to_string());
        assert_eq!(err.to_string(), "Bogus is not a valid API method.");

        let err = KrakenError::UnknownApiError { warnings: vec![] };
        assert_eq!(err.to_string(), "Kraken API returned an unknown error");

        let err = KrakenError::MissingCredentials("API_SECRET");
        assert!(err.to_string().contains("API_SECRET"));
    }
}
