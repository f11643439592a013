use serde::Deserialize;

use super::TransportError;
use crate::domain::BalanceResponse;

#[derive(Debug, Clone, Deserialize)]
struct BalanceXmlResponse {
    #[serde(default)]
    balance: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    /// Text of a bare `<balance>` root.
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

pub fn encode_balance_body() -> String {
    "<balance />".to_owned()
}

/// Decode a balance response.
///
/// The amount is read from `balance`; LetsAds also reports it in `description` next to
/// `name=Balance`, which is used when `balance` is absent. A document that is just
/// `<balance>123.45</balance>` is accepted too. The amount must be a finite number.
pub fn decode_balance_xml_response(xml: &str) -> Result<BalanceResponse, TransportError> {
    let parsed: BalanceXmlResponse = quick_xml::de::from_str(xml)?;

    let raw = parsed
        .balance
        .or(parsed.description)
        .or(parsed.text.filter(|text| !text.trim().is_empty()))
        .ok_or(TransportError::MissingField { field: "balance" })?;
    let balance = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|balance| balance.is_finite())
        .ok_or_else(|| TransportError::InvalidBalance { value: raw.clone() })?;

    Ok(BalanceResponse {
        balance,
        currency: parsed
            .currency
            .map(|currency| currency.trim().to_owned())
            .filter(|currency| !currency.is_empty()),
    })
}
