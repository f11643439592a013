mod common;

use letsads::LetsAdsClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let client = LetsAdsClient::new(common::credentials()?)?;
    let response = client.balance().await?;

    println!(
        "balance: {} {}",
        response.balance,
        response.currency.as_deref().unwrap_or_default()
    );

    Ok(())
}
