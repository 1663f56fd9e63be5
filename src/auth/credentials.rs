//! Credential pair used to authenticate private requests.

use secrecy::{ExposeSecret, SecretString};

/// API credentials containing the key and secret.
///
/// The pair is fixed once a client is built.
#[derive(Clone)]
pub struct Credentials {
    /// The API key (public identifier, sent as `API-Key`)
    pub api_key: String,
    /// The base64 encoded API secret (used for signing)
    api_secret: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and base64 secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    pub(crate) fn from_secret(api_key: String, api_secret: SecretString) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }

    /// Get the API secret for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
