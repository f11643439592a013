//! Capability seam shared by SMS gateway adapters.
//!
//! Several adapters may write into one message table; each one tags its rows with its
//! [`SmsGateway::processing_key`] so the reconciliation sweep only polls its own messages.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use crate::client::Credentials;
use crate::domain::{
    MessageText, RawPhoneNumber, SendSmsResponse, SenderName, SmsId, StateCode, TableName,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Settings every gateway adapter carries.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub credentials: Credentials,
    /// Sender name put into outgoing messages.
    pub sender: SenderName,
    /// Message table polled by the reconciliation sweep.
    pub table: Option<TableName>,
}

impl GatewayConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            sender: SenderName::default(),
            table: None,
        }
    }
}

/// Operations the reconciliation sweep and application code need from a gateway.
pub trait SmsGateway: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Literal tag stored next to messages sent through this gateway.
    fn processing_key(&self) -> &'static str;

    fn send_sms<'a>(
        &'a self,
        to: &'a RawPhoneNumber,
        text: &'a MessageText,
    ) -> BoxFuture<'a, Result<SendSmsResponse, Self::Error>>;

    /// Current delivery state of a sent message. `recipient` is informational and may be
    /// absent; gateways that key status queries on the id alone ignore it.
    fn check_status<'a>(
        &'a self,
        campaign_id: &'a SmsId,
        recipient: Option<&'a RawPhoneNumber>,
    ) -> BoxFuture<'a, Result<StateCode, Self::Error>>;

    fn balance(&self) -> BoxFuture<'_, Result<f64, Self::Error>>;
}
