mod common;

use letsads::{CheckStatus, LetsAdsClient, SmsId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let sms_id = SmsId::new(common::required_env("LETSADS_SMS_ID")?)?;
    let client = LetsAdsClient::new(common::credentials()?)?;
    let response = client.check_status(CheckStatus::new(sms_id)).await?;

    println!(
        "state: {} ({})",
        response.state.as_str(),
        response.state.description()
    );

    Ok(())
}
