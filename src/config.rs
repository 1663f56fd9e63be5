//! Client configuration.
//!
//! [`ClientConfig`] is the only input of the client factory. It can be filled
//! in explicitly or read from the environment with [`ClientConfig::from_env`].

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::auth::{NonceProvider, TimestampNonce};
use crate::methods::API_VERSION;
use crate::transport::DEFAULT_TIMEOUT;

/// Base URL for the Kraken REST API.
pub const KRAKEN_BASE_URL: &str = "https://api.kraken.com";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "API_KEY";
/// Environment variable holding the base64 API secret.
pub const API_SECRET_VAR: &str = "API_SECRET";
/// Environment variable holding the default one-time password.
pub const OTP_VAR: &str = "OTP_KRAKEN";

/// User agent sent with every request unless overridden.
pub fn default_user_agent() -> String {
    format!("kraken-rest-dispatch/{} (Rust)", env!("CARGO_PKG_VERSION"))
}

/// Settings for [`KrakenApi`](crate::KrakenApi).
///
/// ```rust
/// use std::time::Duration;
/// use kraken_rest_dispatch::ClientConfig;
///
/// let config = ClientConfig::new()
///     .credentials("api_key", "YXBpX3NlY3JldA==")
///     .timeout(Duration::from_secs(2));
/// assert!(config.has_credentials());
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) api_secret: Option<SecretString>,
    pub(crate) otp: Option<SecretString>,
    pub(crate) base_url: String,
    pub(crate) api_version: u32,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
    pub(crate) nonce_provider: Arc<dyn NonceProvider>,
}

impl ClientConfig {
    /// Empty configuration with default endpoint, timeout and nonce source.
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            otp: None,
            base_url: KRAKEN_BASE_URL.to_string(),
            api_version: API_VERSION,
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            nonce_provider: Arc::new(TimestampNonce),
        }
    }

    /// Read `API_KEY`, `API_SECRET` and `OTP_KRAKEN`.
    ///
    /// Unset or empty variables are left unconfigured; missing credentials
    /// are reported when the client is built.
    pub fn from_env() -> Self {
        Self::from_env_vars(API_KEY_VAR, API_SECRET_VAR, OTP_VAR)
    }

    /// Read credentials from custom environment variable names.
    pub fn from_env_vars(key_var: &str, secret_var: &str, otp_var: &str) -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let mut config = Self::new();
        config.api_key = read(key_var);
        config.api_secret = read(secret_var).map(SecretString::from);
        config.otp = read(otp_var).map(SecretString::from);
        config
    }

    /// Set the API key and base64 secret.
    pub fn credentials(self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key(api_key).api_secret(api_secret)
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base64 encoded API secret.
    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(SecretString::from(api_secret.into()));
        self
    }

    /// Set the default one-time password added to every request body.
    pub fn otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(SecretString::from(otp.into()));
        self
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API version path segment.
    pub fn api_version(mut self, version: u32) -> Self {
        self.api_version = version;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom nonce provider.
    ///
    /// Defaults to [`TimestampNonce`]. Pass an
    /// [`IncreasingNonce`](crate::auth::IncreasingNonce) to guarantee strictly
    /// increasing values for calls issued within the same millisecond.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = provider;
        self
    }

    /// True when both key and secret are set.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("otp", &self.otp.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
