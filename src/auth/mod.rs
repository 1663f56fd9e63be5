//! Authentication module for Kraken API.
//!
//! This module provides:
//! - Credential handling with secure secret storage
//! - Nonce generation for replay attack prevention
//! - HMAC-SHA512 signature generation for private methods

mod credentials;
mod nonce;
mod signature;

pub use credentials::Credentials;
pub use nonce::{IncreasingNonce, NonceProvider, TimestampNonce};
pub use signature::sign_request;
