//! The client factory and the reusable method caller it produces.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::{Credentials, NonceProvider};
use crate::config::{API_KEY_VAR, API_SECRET_VAR, ClientConfig};
use crate::error::KrakenError;
use crate::request::{Params, PreparedRequest, RequestBuilder};
use crate::transport::Transport;

/// A client bound to one credential pair.
///
/// Cheap to clone; clones share the same credentials, HTTP client and nonce
/// source. Each [`call`](KrakenApi::call) is independent and calls may run
/// concurrently.
///
/// ```rust,no_run
/// use kraken_rest_dispatch::{ClientConfig, KrakenApi, Params};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = KrakenApi::new(ClientConfig::from_env(), None)?;
///
///     let ticker = api.call("Ticker", Params::new().with("pair", "XBTUSD")).await?;
///     println!("{ticker}");
///
///     let balance = api.call("Balance", Params::new()).await?;
///     println!("{balance}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct KrakenApi {
    inner: Arc<Inner>,
}

struct Inner {
    builder: RequestBuilder,
    transport: Transport,
    nonce_provider: Arc<dyn NonceProvider>,
}

impl KrakenApi {
    /// Build a client from `config`.
    ///
    /// `otp` overrides the configured default one-time password. Empty
    /// strings count as unset.
    ///
    /// # Errors
    ///
    /// [`KrakenError::MissingCredentials`] if the key or secret is not
    /// configured. Nothing is sent over the network.
    pub fn new(config: ClientConfig, otp: Option<String>) -> Result<Self, KrakenError> {
        let api_key = config
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or(KrakenError::MissingCredentials(API_KEY_VAR))?;
        let api_secret = config
            .api_secret
            .filter(|s| !s.expose_secret().is_empty())
            .ok_or(KrakenError::MissingCredentials(API_SECRET_VAR))?;

        let otp = otp
            .filter(|o| !o.is_empty())
            .map(SecretString::from)
            .or(config.otp.filter(|o| !o.expose_secret().is_empty()));

        let base_url = Url::parse(&config.base_url)?;
        let builder = RequestBuilder::new(
            Credentials::from_secret(api_key, api_secret),
            otp,
            base_url,
            config.api_version,
            &config.user_agent,
        )?;
        let transport = Transport::new(config.timeout)?;

        tracing::debug!(?builder, timeout = ?config.timeout, "created Kraken API client");

        Ok(Self {
            inner: Arc::new(Inner {
                builder,
                transport,
                nonce_provider: config.nonce_provider,
            }),
        })
    }

    /// Assemble the request for a method without sending it.
    ///
    /// Draws a fresh nonce from the configured provider.
    pub fn prepare(&self, method: &str, params: Params) -> Result<PreparedRequest, KrakenError> {
        let nonce = self.inner.nonce_provider.next_nonce();
        self.inner.builder.build(method, params, nonce)
    }

    /// Call a Kraken REST method and return its `result` payload.
    ///
    /// Unregistered method names fail with [`KrakenError::InvalidMethod`]
    /// before any request is made. Exchange errors, HTTP failures and
    /// timeouts are returned as errors and never retried.
    pub async fn call(&self, method: &str, params: Params) -> Result<Value, KrakenError> {
        let request = self.prepare(method, params)?;
        tracing::debug!(method, privacy = %request.privacy, "calling Kraken API");
        self.inner.transport.send(&request).await
    }

    /// Like [`call`](KrakenApi::call), deserializing the result into `T`.
    pub async fn call_typed<T>(&self, method: &str, params: Params) -> Result<T, KrakenError>
    where
        T: DeserializeOwned,
    {
        let value = self.call(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl std::fmt::Debug for KrakenApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenApi")
            .field("builder", &self.inner.builder)
            .finish()
    }
}

/// Build a client from the environment (`API_KEY`, `API_SECRET`, `OTP_KRAKEN`).
///
/// `otp` overrides `OTP_KRAKEN`.
pub fn get_api(otp: Option<String>) -> Result<KrakenApi, KrakenError> {
    KrakenApi::new(ClientConfig::from_env(), otp)
}
