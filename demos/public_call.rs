//! Demo: call public methods.
//!
//! Public methods still need a configured key pair, since every request
//! carries `API-Key`.
//!
//! Run with: cargo run --example public_call

use kraken_rest_dispatch::{Params, get_api};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let _ = dotenv::dotenv();

    let api = get_api(None)?;

    let time = api.call("Time", Params::new()).await?;
    println!("Server time: {}", time["rfc1123"]);

    let ticker = api
        .call("Ticker", Params::new().with("pair", "XBTUSD"))
        .await?;
    println!("Ticker: {ticker:#}");

    match api.call("Bogus", Params::new()).await {
        Err(e) => println!("Rejected locally: {e}"),
        Ok(_) => unreachable!("Bogus is not a registered method"),
    }

    Ok(())
}
