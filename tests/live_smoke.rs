use kraken_rest_dispatch::{Params, get_api};

fn live_tests_enabled() -> bool {
    std::env::var("KRAKEN_LIVE_TESTS").ok().as_deref() == Some("1")
}

#[tokio::test]
#[ignore]
async fn live_public_and_private_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let api = match get_api(None) {
        Ok(api) => api,
        Err(_) => return Ok(()),
    };

    let time = api.call("Time", Params::new()).await?;
    assert!(time["unixtime"].is_number());

    let _balances = api.call("Balance", Params::new()).await?;
    let token = api.call("GetWebSocketsToken", Params::new()).await?;
    assert!(token["token"].is_string());

    Ok(())
}
