//! Record store collaborator: where sent messages and their delivery state live.

#[cfg(feature = "sqlite")]
mod sqlite;

use std::error::Error as StdError;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::domain::{SendSmsResponse, SmsId, StateCode, TableName, ValidationError};
use crate::gateway::BoxFuture;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// `status` value of a message the application has finished handing over to a gateway.
pub const STATUS_COMPLETE: &str = "complete";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[source] Box<dyn StdError + Send + Sync>),

    #[error("store lock poisoned")]
    Poisoned,
}

/// One row of the message table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: i64,
    pub to: String,
    /// Processing key of the gateway that sent the message.
    pub processing: String,
    pub status: String,
    pub processing_status: Option<String>,
    /// JSON document written after sending, see [`ProcessingData`].
    pub processing_data: Option<String>,
}

impl StoredMessage {
    /// Whether the reconciliation sweep of the gateway tagged `processing_key` should poll
    /// this message: it was sent through that gateway, handed over completely, and the
    /// provider has not reported anything past the queued state yet.
    pub fn is_eligible(&self, processing_key: &str) -> bool {
        self.processing == processing_key
            && self.status == STATUS_COMPLETE
            && self
                .processing_status
                .as_deref()
                .is_none_or(|status| StateCode::new(status).is_pending())
    }
}

/// Fields written back for a polled message.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub processing_status: StateCode,
    /// Unix time in seconds, with sub-second precision.
    pub updated_at: f64,
}

impl StatusUpdate {
    pub fn now(processing_status: StateCode) -> Self {
        let updated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self {
            processing_status,
            updated_at,
        }
    }
}

/// Narrow persistence contract used by the reconciliation sweep.
pub trait MessageStore: Send + Sync {
    /// Messages in `table` eligible for polling by the gateway tagged `processing_key`.
    fn find_pending<'a>(
        &'a self,
        table: &'a TableName,
        processing_key: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StoredMessage>, StoreError>>;

    fn update_status<'a>(
        &'a self,
        table: &'a TableName,
        id: i64,
        update: &'a StatusUpdate,
    ) -> BoxFuture<'a, Result<(), StoreError>>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingDataError {
    #[error("processing data is missing")]
    Missing,

    #[error("invalid processing data JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid campaign id: {0}")]
    CampaignId(#[from] ValidationError),
}

/// Gateway bookkeeping stored with a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingData {
    pub campaign_id: SmsId,
    pub status: Option<StateCode>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProcessingDataJson {
    first: FirstSendJson,
}

#[derive(Debug, Serialize, Deserialize)]
struct FirstSendJson {
    #[serde(rename = "campaignID")]
    campaign_id: JsonCampaignId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum JsonCampaignId {
    String(String),
    Number(serde_json::Number),
}

impl JsonCampaignId {
    fn into_string(self) -> String {
        match self {
            Self::String(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

impl ProcessingData {
    pub fn from_response(response: &SendSmsResponse) -> Self {
        Self {
            campaign_id: response.campaign_id.clone(),
            status: Some(response.status.clone()),
        }
    }

    pub fn decode(raw: Option<&str>) -> Result<Self, ProcessingDataError> {
        let raw = raw
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(ProcessingDataError::Missing)?;
        let parsed: ProcessingDataJson = serde_json::from_str(raw)?;
        Ok(Self {
            campaign_id: SmsId::new(parsed.first.campaign_id.into_string())?,
            status: parsed.first.status.map(StateCode::new),
        })
    }

    pub fn encode(&self) -> Result<String, ProcessingDataError> {
        let json = ProcessingDataJson {
            first: FirstSendJson {
                campaign_id: JsonCampaignId::String(self.campaign_id.as_str().to_owned()),
                status: self.status.as_ref().map(|state| state.as_str().to_owned()),
            },
        };
        Ok(serde_json::to_string(&json)?)
    }
}
