use crate::domain::code::StateCode;
use crate::domain::value::SmsId;

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSmsResponse {
    /// Provider-assigned id used to poll the delivery state later.
    pub campaign_id: SmsId,
    /// Always the queued state: LetsAds accepts the message and delivers it asynchronously.
    pub status: StateCode,
    /// Free-form confirmation text returned by LetsAds, if any.
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStatusResponse {
    pub state: StateCode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceResponse {
    pub balance: f64,
    pub currency: Option<String>,
}
