//! HMAC-SHA512 signature generation for Kraken private methods.
//!
//! ```text
//! API-Sign = base64(HMAC-SHA512(key = base64_decode(secret), path ++ SHA256(nonce ++ body)))
//! ```

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::auth::Credentials;
use crate::error::KrakenError;

type HmacSha512 = Hmac<Sha512>;

/// SHA256 over the decimal nonce followed by the form encoded body.
fn body_digest(nonce: u64, post_data: &str) -> sha2::digest::Output<Sha256> {
    let mut hasher = Sha256::new();
    hasher.update(nonce.to_string().as_bytes());
    hasher.update(post_data.as_bytes());
    hasher.finalize()
}

/// Compute the `API-Sign` header value for a private request.
///
/// `post_data` must be the exact body that is sent, `nonce` included.
/// The result is a pure function of its inputs.
///
/// # Example
///
/// ```rust
/// use kraken_rest_dispatch::auth::{Credentials, sign_request};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "YXBpX3NlY3JldA=="); // base64 of "api_secret"
/// let signature = sign_request(
///     &credentials,
///     "/0/private/Balance",
///     1234567890,
///     "nonce=1234567890"
/// )?;
/// assert_eq!(signature.len(), 88);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`KrakenError::Auth`] when the secret is not valid base64.
pub fn sign_request(
    credentials: &Credentials,
    url_path: &str,
    nonce: u64,
    post_data: &str,
) -> Result<String, KrakenError> {
    let key = BASE64
        .decode(credentials.expose_secret())
        .map_err(|e| KrakenError::Auth(format!("API secret must be valid base64: {e}")))?;

    let mut mac = HmacSha512::new_from_slice(&key)
        .map_err(|e| KrakenError::Auth(format!("Invalid HMAC key: {e}")))?;
    mac.update(url_path.as_bytes());
    mac.update(&body_digest(nonce, post_data));

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // base64("kraken_test_secret")
    const SECRET: &str = "a3Jha2VuX3Rlc3Rfc2VjcmV0";
    const NONCE: u64 = 1_616_492_376_594_000;

    fn credentials() -> Credentials {
        Credentials::new("test_key", SECRET)
    }

    #[test]
    fn test_known_vector() {
        let signature = sign_request(
            &credentials(),
            "/0/private/Balance",
            NONCE,
            "nonce=1616492376594000",
        )
        .unwrap();

        assert_eq!(
            signature,
            "4ELcMex3D/Xz13r1vCnNC5ysqh2VPchX2LGn/M+7aMP6RsdVM/YpxPuAx5wzVL/jQljaOWI5VAmOIJIalyML0A=="
        );
    }

    #[test]
    fn test_known_vector_with_params_and_otp() {
        let signature = sign_request(
            &credentials(),
            "/0/private/AddOrder",
            NONCE,
            "pair=XBTUSD&type=buy&nonce=1616492376594000&otp=123456",
        )
        .unwrap();

        assert_eq!(
            signature,
            "2UN0pgLTTlnAkUSTL8Z+Ky3Y70tMsUGrkuloYWCROS8w3EVE5v9dTBTkqI59mtcuKAzz/e1p30tD62VH1gA0WQ=="
        );
    }

    #[test]
    fn test_signature_consistency() {
        let sign = || {
            sign_request(&credentials(), "/0/private/TradeBalance", 12345, "asset=ZUSD&nonce=12345")
                .unwrap()
        };
        assert_eq!(sign(), sign());
    }

    #[test]
    fn test_signature_depends_on_every_input() {
        let base = sign_request(&credentials(), "/0/private/Balance", 12345, "nonce=12345").unwrap();

        let other_nonce =
            sign_request(&credentials(), "/0/private/Balance", 12346, "nonce=12345").unwrap();
        let other_path =
            sign_request(&credentials(), "/0/private/Ledgers", 12345, "nonce=12345").unwrap();
        let other_body =
            sign_request(&credentials(), "/0/private/Balance", 12345, "nonce=12346").unwrap();

        assert_ne!(base, other_nonce);
        assert_ne!(base, other_path);
        assert_ne!(base, other_body);
    }

    #[test]
    fn test_invalid_base64_secret() {
        let creds = Credentials::new("key", "not base64!!");
        let err = sign_request(&creds, "/0/private/Balance", 1, "nonce=1").unwrap_err();
        assert!(matches!(err, KrakenError::Auth(_)));
    }
}
