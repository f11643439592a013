mod common;

use letsads::{LetsAdsClient, MessageText, RawPhoneNumber, SendSms, SenderName};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let to = common::required_env("LETSADS_TO")?;
    let text = common::required_env("LETSADS_TEXT")?;

    let mut builder = LetsAdsClient::builder(common::credentials()?);
    if let Ok(sender) = std::env::var("LETSADS_SENDER") {
        builder = builder.sender(SenderName::new(sender)?);
    }
    let client = builder.build()?;

    let request = SendSms::new(RawPhoneNumber::new(to)?, MessageText::new(text)?);
    let response = client.send_sms(request).await?;

    println!(
        "campaign_id: {}, status: {}, description: {:?}",
        response.campaign_id.as_str(),
        response.status.as_str(),
        response.description
    );

    Ok(())
}
