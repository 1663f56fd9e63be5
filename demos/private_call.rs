//! Demo: call private methods with an optional one-time password.
//!
//! Run with: cargo run --example private_call -- [otp]

use std::sync::Arc;

use kraken_rest_dispatch::auth::IncreasingNonce;
use kraken_rest_dispatch::{ClientConfig, KrakenApi, KrakenError, Params};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let _ = dotenv::dotenv();

    let otp = std::env::args().nth(1);
    let config = ClientConfig::from_env().nonce_provider(Arc::new(IncreasingNonce::new()));
    let api = KrakenApi::new(config, otp)?;

    let balance = api.call("Balance", Params::new()).await?;
    println!("Balance: {balance:#}");

    let trade_balance = api
        .call("TradeBalance", Params::new().with("asset", "ZUSD"))
        .await;
    match trade_balance {
        Ok(value) => println!("Trade balance: {value:#}"),
        Err(KrakenError::Api(e)) if e.is_permission_denied() => {
            println!("Key lacks permission: {e}")
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
