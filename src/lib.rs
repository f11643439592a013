//! Typed Rust client for the LetsAds XML SMS API.
//!
//! The crate has a domain layer of strong types, a transport layer for the XML wire format,
//! and a small client layer orchestrating requests. The [`reconcile`] sweep keeps a local
//! message table in step with the delivery states LetsAds reports.
//!
//! ```rust,no_run
//! use letsads::{Credentials, LetsAdsClient, MessageText, RawPhoneNumber, SendSms};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), letsads::LetsAdsError> {
//!     let client = LetsAdsClient::new(Credentials::new("login", "password")?)?;
//!     let request = SendSms::new(
//!         RawPhoneNumber::new("+380501234567")?,
//!         MessageText::new("hello")?,
//!     );
//!     let sent = client.send_sms(request).await?;
//!     println!("queued as {}", sent.campaign_id.as_str());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod gateway;
pub mod reconcile;
pub mod store;
mod transport;

pub use client::{
    Credentials, LetsAdsClient, LetsAdsClientBuilder, LetsAdsError, PROCESSING_KEY,
};
pub use domain::{
    BalanceResponse, CheckStatus, CheckStatusResponse, ErrorCode, KnownErrorCode, KnownStateCode,
    Login, MessageText, Password, PhoneNumber, RawPhoneNumber, SendSms, SendSmsResponse,
    SenderName, SmsId, StateCode, TableName, ValidationError, error_text, process_phone,
    state_text,
};
pub use gateway::{GatewayConfig, SmsGateway};
pub use reconcile::{ReconcileError, ReconcileReport};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
pub use store::{MessageStore, ProcessingData, StatusUpdate, StoreError, StoredMessage};
