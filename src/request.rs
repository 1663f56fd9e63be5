//! Request body parameters and request assembly.
//!
//! [`RequestBuilder`] turns a method name and caller [`Params`] into a
//! [`PreparedRequest`]: classified, with `nonce`/`otp` injected, the form body
//! encoded and, for private methods, signed.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use url::Url;

use crate::auth::{Credentials, sign_request};
use crate::error::KrakenError;
use crate::methods::{MethodPrivacy, classify, method_path};

/// Header carrying the API key.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("api-key");
/// Header carrying the request signature.
pub const API_SIGN_HEADER: HeaderName = HeaderName::from_static("api-sign");

/// A single form value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    UInt(u64),
    Decimal(Decimal),
    Bool(bool),
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Int(n) => serializer.serialize_i64(*n),
            ParamValue::UInt(n) => serializer.serialize_u64(*n),
            ParamValue::Decimal(d) => serializer.serialize_str(&d.to_string()),
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::UInt(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::UInt(value)
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        ParamValue::Decimal(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Ordered request body parameters.
///
/// Keys keep their insertion order in the encoded body. Inserting a key that
/// is already present replaces its value without moving it.
///
/// ```rust
/// use kraken_rest_dispatch::Params;
///
/// let params = Params::new().with("pair", "XBTUSD").with("count", 10);
/// assert_eq!(params.to_form().unwrap(), "pair=XBTUSD&count=10");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` to `value`, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the parameters in body order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    pub fn to_form(&self) -> Result<String, KrakenError> {
        Ok(serde_urlencoded::to_string(&self.0)?)
    }

    /// Build parameters from any serializable struct or map.
    ///
    /// Top-level `null` fields are skipped. Nested arrays and objects are
    /// sent as their JSON text. Field order follows `serde_json`'s map order.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, KrakenError> {
        let serde_json::Value::Object(map) = serde_json::to_value(value)? else {
            return Err(KrakenError::InvalidParams(
                "request parameters must serialize to a JSON object".to_string(),
            ));
        };

        let mut params = Params::new();
        for (key, value) in map {
            let value = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(b) => ParamValue::Bool(b),
                serde_json::Value::String(s) => ParamValue::Text(s),
                serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                    (Some(i), _) => ParamValue::Int(i),
                    (None, Some(u)) => ParamValue::UInt(u),
                    _ => ParamValue::Text(n.to_string()),
                },
                other => ParamValue::Text(other.to_string()),
            };
            params.insert(key, value);
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<ParamValue>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// A fully assembled request, ready to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Method name as given by the caller.
    pub method: String,
    pub privacy: MethodPrivacy,
    /// `/{version}/{privacy}/{method}`
    pub path: String,
    pub url: Url,
    pub headers: HeaderMap,
    /// Body parameters including `nonce` and `otp`.
    pub params: Params,
    /// Form encoded `params`, the exact bytes that were signed.
    pub body: String,
    pub nonce: u64,
}

impl PreparedRequest {
    /// True when an `API-Sign` header is attached.
    pub fn is_signed(&self) -> bool {
        self.headers.contains_key(API_SIGN_HEADER)
    }
}

/// Assembles requests for one credential pair.
pub struct RequestBuilder {
    credentials: Credentials,
    api_key_header: HeaderValue,
    otp: Option<SecretString>,
    base_url: Url,
    api_version: u32,
    user_agent: HeaderValue,
}

impl RequestBuilder {
    pub(crate) fn new(
        credentials: Credentials,
        otp: Option<SecretString>,
        base_url: Url,
        api_version: u32,
        user_agent: &str,
    ) -> Result<Self, KrakenError> {
        let api_key_header = HeaderValue::from_str(&credentials.api_key)
            .map_err(|_| KrakenError::Config("API key is not a valid header value".to_string()))?;
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|_| KrakenError::Config("user agent is not a valid header value".to_string()))?;

        Ok(Self {
            credentials,
            api_key_header,
            otp,
            base_url,
            api_version,
            user_agent,
        })
    }

    /// Build the request for `method` with the caller's `params`.
    ///
    /// `nonce` and `otp` are written after the caller's parameters and
    /// override any caller values under the same keys.
    ///
    /// # Errors
    ///
    /// [`KrakenError::InvalidMethod`] if the method is not registered.
    pub fn build(
        &self,
        method: &str,
        mut params: Params,
        nonce: u64,
    ) -> Result<PreparedRequest, KrakenError> {
        let privacy =
            classify(method).ok_or_else(|| KrakenError::InvalidMethod(method.to_string()))?;

        params.insert("nonce", nonce);
        if let Some(otp) = &self.otp {
            params.insert("otp", otp.expose_secret());
        }

        let path = method_path(self.api_version, privacy, method);
        let url = Url::parse(&format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        ))?;
        let body = params.to_form()?;

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, self.api_key_header.clone());
        headers.insert(USER_AGENT, self.user_agent.clone());

        if privacy.requires_signature() {
            let signature = sign_request(&self.credentials, &path, nonce, &body)?;
            let value = HeaderValue::from_str(&signature)
                .map_err(|_| KrakenError::Auth("signature is not a valid header value".into()))?;
            headers.insert(API_SIGN_HEADER, value);
        }

        tracing::debug!(method, %privacy, %path, nonce, "prepared request");

        Ok(PreparedRequest {
            method: method.to_string(),
            privacy,
            path,
            url,
            headers,
            params,
            body,
            nonce,
        })
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("credentials", &self.credentials)
            .field("has_otp", &self.otp.is_some())
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .finish()
    }
}
