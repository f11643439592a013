//! Reconciliation sweep: advance stored delivery states to what the provider reports.
//!
//! Meant to be triggered periodically by an external scheduler. The sweep is best-effort:
//! a failing record is logged and reported but left untouched, so the next run retries it.

use std::error::Error as StdError;

use crate::domain::{RawPhoneNumber, StateCode, TableName};
use crate::gateway::SmsGateway;
use crate::store::{
    MessageStore, ProcessingData, ProcessingDataError, StatusUpdate, StoreError, StoredMessage,
};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The gateway has no message table configured.
    #[error("configuration error: message table is not set")]
    MissingTable,

    #[error("failed to load pending messages: {0}")]
    Store(#[source] StoreError),
}

/// Why a single record could not be reconciled.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    ProcessingData(#[from] ProcessingDataError),

    #[error("status query failed: {0}")]
    Gateway(#[source] Box<dyn StdError + Send + Sync>),

    #[error("status update failed: {0}")]
    Store(#[source] StoreError),
}

#[derive(Debug)]
pub struct RecordOutcome {
    pub id: i64,
    pub result: Result<StateCode, RecordError>,
}

/// Per-record results of one sweep, in processing order.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl ReconcileReport {
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.updated()
    }

    pub fn failures(&self) -> impl Iterator<Item = (i64, &RecordError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (outcome.id, err)))
    }
}

/// Poll the provider for every eligible message in `table` and store the reported state.
///
/// Records are handled one at a time. Only a missing table or a failing pending-message
/// query abort the sweep.
pub async fn run<G, S>(
    gateway: &G,
    store: &S,
    table: Option<&TableName>,
) -> Result<ReconcileReport, ReconcileError>
where
    G: SmsGateway + ?Sized,
    S: MessageStore + ?Sized,
{
    let table = table.ok_or(ReconcileError::MissingTable)?;
    let processing_key = gateway.processing_key();

    let records = store
        .find_pending(table, processing_key)
        .await
        .map_err(ReconcileError::Store)?;

    let mut report = ReconcileReport::default();
    for record in records
        .into_iter()
        .filter(|record| record.is_eligible(processing_key))
    {
        let result = reconcile_record(gateway, store, table, &record).await;
        match &result {
            Ok(state) => tracing::debug!(
                table = table.as_str(),
                record_id = record.id,
                state = state.as_str(),
                "message status updated"
            ),
            Err(err) => tracing::warn!(
                table = table.as_str(),
                record_id = record.id,
                error = %err,
                "message status not updated, will retry on next sweep"
            ),
        }
        report.outcomes.push(RecordOutcome {
            id: record.id,
            result,
        });
    }

    tracing::info!(
        table = table.as_str(),
        processing_key,
        updated = report.updated(),
        failed = report.failed(),
        "status reconciliation finished"
    );
    Ok(report)
}

async fn reconcile_record<G, S>(
    gateway: &G,
    store: &S,
    table: &TableName,
    record: &StoredMessage,
) -> Result<StateCode, RecordError>
where
    G: SmsGateway + ?Sized,
    S: MessageStore + ?Sized,
{
    let data = ProcessingData::decode(record.processing_data.as_deref())?;
    // Status queries are keyed on the campaign id; a malformed recipient must not block them.
    let recipient = RawPhoneNumber::new(record.to.as_str()).ok();

    let state = gateway
        .check_status(&data.campaign_id, recipient.as_ref())
        .await
        .map_err(|err| RecordError::Gateway(Box::new(err)))?;

    let update = StatusUpdate::now(state);
    store
        .update_status(table, record.id, &update)
        .await
        .map_err(RecordError::Store)?;
    Ok(update.processing_status)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::domain::{MessageText, SendSmsResponse, SmsId};
    use crate::gateway::BoxFuture;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("fake gateway failure")]
    struct FakeGatewayError;

    /// Gateway answering status queries from a fixed table of campaign id to state.
    struct FakeGateway {
        states: HashMap<String, Option<String>>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeGateway {
        fn new(states: &[(&str, Option<&str>)]) -> Self {
            Self {
                states: states
                    .iter()
                    .map(|(id, state)| ((*id).to_owned(), state.map(str::to_owned)))
                    .collect(),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl SmsGateway for FakeGateway {
        type Error = FakeGatewayError;

        fn processing_key(&self) -> &'static str {
            "fake"
        }

        fn send_sms<'a>(
            &'a self,
            _to: &'a RawPhoneNumber,
            _text: &'a MessageText,
        ) -> BoxFuture<'a, Result<SendSmsResponse, Self::Error>> {
            Box::pin(async { Err(FakeGatewayError) })
        }

        fn check_status<'a>(
            &'a self,
            campaign_id: &'a SmsId,
            _recipient: Option<&'a RawPhoneNumber>,
        ) -> BoxFuture<'a, Result<StateCode, Self::Error>> {
            Box::pin(async move {
                self.queries
                    .lock()
                    .unwrap()
                    .push(campaign_id.as_str().to_owned());
                match self.states.get(campaign_id.as_str()) {
                    Some(Some(state)) => Ok(StateCode::new(state.as_str())),
                    _ => Err(FakeGatewayError),
                }
            })
        }

        fn balance(&self) -> BoxFuture<'_, Result<f64, Self::Error>> {
            Box::pin(async { Ok(0.0) })
        }
    }

    /// In-memory message table. Returns every row from `find_pending` so the sweep's own
    /// eligibility filter is exercised.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryStore {
        pub(crate) rows: Arc<Mutex<Vec<StoredMessage>>>,
        pub(crate) updates: Arc<Mutex<Vec<(i64, StatusUpdate)>>>,
        pub(crate) fail_query: bool,
    }

    impl MemoryStore {
        pub(crate) fn with_rows(rows: Vec<StoredMessage>) -> Self {
            Self {
                rows: Arc::new(Mutex::new(rows)),
                ..Self::default()
            }
        }

        pub(crate) fn updated_ids(&self) -> Vec<i64> {
            self.updates.lock().unwrap().iter().map(|(id, _)| *id).collect()
        }
    }

    impl MessageStore for MemoryStore {
        fn find_pending<'a>(
            &'a self,
            _table: &'a TableName,
            _processing_key: &'a str,
        ) -> BoxFuture<'a, Result<Vec<StoredMessage>, StoreError>> {
            Box::pin(async move {
                if self.fail_query {
                    return Err(StoreError::Poisoned);
                }
                Ok(self.rows.lock().unwrap().clone())
            })
        }

        fn update_status<'a>(
            &'a self,
            _table: &'a TableName,
            id: i64,
            update: &'a StatusUpdate,
        ) -> BoxFuture<'a, Result<(), StoreError>> {
            Box::pin(async move {
                self.updates.lock().unwrap().push((id, update.clone()));
                let mut rows = self.rows.lock().unwrap();
                if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
                    row.processing_status = Some(update.processing_status.as_str().to_owned());
                }
                Ok(())
            })
        }
    }

    pub(crate) fn stored(
        id: i64,
        processing: &str,
        status: &str,
        processing_status: Option<&str>,
        campaign_id: &str,
    ) -> StoredMessage {
        StoredMessage {
            id,
            to: "+380501234567".to_owned(),
            processing: processing.to_owned(),
            status: status.to_owned(),
            processing_status: processing_status.map(str::to_owned),
            processing_data: Some(format!(r#"{{"first":{{"campaignID":"{campaign_id}"}}}}"#)),
        }
    }

    fn table() -> TableName {
        TableName::new("sms_queue").unwrap()
    }

    #[tokio::test]
    async fn missing_table_is_a_configuration_error() {
        let gateway = FakeGateway::new(&[]);
        let store = MemoryStore::default();

        let err = run(&gateway, &store, None).await.unwrap_err();
        assert!(matches!(err, ReconcileError::MissingTable));
        assert!(gateway.queries().is_empty());
    }

    #[tokio::test]
    async fn only_eligible_records_are_polled_and_updated() {
        let gateway = FakeGateway::new(&[
            ("10", Some("MESSAGE_IS_DELIVERED")),
            ("20", Some("MESSAGE_IS_SENT")),
            ("30", Some("MESSAGE_IS_DELIVERED")),
        ]);
        let store = MemoryStore::with_rows(vec![
            stored(1, "fake", "complete", None, "10"),
            stored(2, "fake", "complete", Some("MESSAGE_IN_QUEUE"), "20"),
            stored(3, "fake", "complete", Some("MESSAGE_IS_DELIVERED"), "30"),
        ]);

        let report = run(&gateway, &store, Some(&table())).await.unwrap();
        assert_eq!(gateway.queries(), vec!["10", "20"]);
        assert_eq!(store.updated_ids(), vec![1, 2]);
        assert_eq!(report.updated(), 2);
        assert_eq!(report.failed(), 0);

        let updates = store.updates.lock().unwrap();
        assert_eq!(updates[0].1.processing_status.as_str(), "MESSAGE_IS_DELIVERED");
        assert_eq!(updates[1].1.processing_status.as_str(), "MESSAGE_IS_SENT");
    }

    #[tokio::test]
    async fn one_failing_record_does_not_block_the_rest() {
        let gateway = FakeGateway::new(&[("10", None), ("20", Some("MESSAGE_IS_SENT"))]);
        let store = MemoryStore::with_rows(vec![
            stored(1, "fake", "complete", None, "10"),
            stored(2, "fake", "complete", None, "20"),
            stored(3, "other", "complete", None, "30"),
        ]);

        let report = run(&gateway, &store, Some(&table())).await.unwrap();
        assert_eq!(gateway.queries(), vec!["10", "20"]);
        assert_eq!(store.updated_ids(), vec![2]);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.failed(), 1);

        let failures = report.failures().collect::<Vec<_>>();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 1);
        assert!(matches!(failures[0].1, RecordError::Gateway(_)));

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows[0].processing_status, None);
    }

    #[tokio::test]
    async fn broken_processing_data_is_reported_without_a_query() {
        let gateway = FakeGateway::new(&[("20", Some("MESSAGE_IS_SENT"))]);
        let mut broken = stored(1, "fake", "complete", None, "10");
        broken.processing_data = Some("not json".to_owned());
        let store = MemoryStore::with_rows(vec![broken, stored(2, "fake", "complete", None, "20")]);

        let report = run(&gateway, &store, Some(&table())).await.unwrap();
        assert_eq!(gateway.queries(), vec!["20"]);
        assert_eq!(report.updated(), 1);
        assert!(matches!(
            report.outcomes[0].result,
            Err(RecordError::ProcessingData(ProcessingDataError::Json(_)))
        ));
    }

    #[tokio::test]
    async fn blank_recipient_does_not_block_the_status_query() {
        let gateway = FakeGateway::new(&[("10", Some("MESSAGE_IS_DELIVERED"))]);
        let mut blank = stored(1, "fake", "complete", None, "10");
        blank.to = "  ".to_owned();
        let store = MemoryStore::with_rows(vec![blank]);

        let report = run(&gateway, &store, Some(&table())).await.unwrap();
        assert_eq!(gateway.queries(), vec!["10"]);
        assert_eq!(store.updated_ids(), vec![1]);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.failed(), 0);
    }

    #[tokio::test]
    async fn store_query_failure_aborts_the_sweep() {
        let gateway = FakeGateway::new(&[]);
        let store = MemoryStore {
            fail_query: true,
            ..MemoryStore::default()
        };

        let err = run(&gateway, &store, Some(&table())).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Store(StoreError::Poisoned)));
    }
}
