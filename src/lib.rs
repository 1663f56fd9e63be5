//! # Kraken REST Dispatch
//!
//! An async client for calling Kraken REST API methods by name.
//!
//! ## Features
//!
//! - Method registry classifying names as public or private
//! - HMAC-SHA512 request signing for private methods
//! - Nonce and one-time password injection
//! - Kraken error envelopes turned into typed errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kraken_rest_dispatch::{Params, get_api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = get_api(None)?;
//!     let time = api.call("Time", Params::new()).await?;
//!     println!("Server time: {time}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod methods;
pub mod request;
pub mod transport;

// Re-export commonly used types at crate root
pub use client::{KrakenApi, get_api};
pub use config::ClientConfig;
pub use error::{ApiError, KrakenError};
pub use methods::{MethodPrivacy, classify};
pub use request::{ParamValue, Params, PreparedRequest};

/// Result type alias using KrakenError
pub type Result<T> = std::result::Result<T, KrakenError>;
