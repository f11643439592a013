//! Reconciliation sweep against a mock LetsAds endpoint and an SQLite message table.
#![cfg(feature = "sqlite")]

use letsads::{
    Credentials, LetsAdsClient, MessageStore, ProcessingData, SmsId, SqliteStore, StoredMessage,
    TableName,
};
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><response>{body}</response>"#
    ))
}

#[tokio::test]
async fn cron_sweep_updates_sqlite_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<sms_id>10</sms_id>"))
        .respond_with(xml(
            "<name>Status</name><description>MESSAGE_IS_DELIVERED</description>",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("<sms_id>20</sms_id>"))
        .respond_with(xml("<name>Error</name><description>MESSAGE_NOT_EXIST</description>"))
        .expect(1)
        .mount(&server)
        .await;

    let table = TableName::new("sms_queue").unwrap();
    let store = SqliteStore::open_in_memory().unwrap();
    store.ensure_schema(&table).unwrap();
    for (campaign_id, processing) in [("10", "letsads"), ("20", "letsads"), ("30", "smsfly")] {
        let data = ProcessingData {
            campaign_id: SmsId::new(campaign_id).unwrap(),
            status: None,
        };
        store
            .insert_message(
                &table,
                &StoredMessage {
                    id: 0,
                    to: "+380501234567".to_owned(),
                    processing: processing.to_owned(),
                    status: "complete".to_owned(),
                    processing_status: None,
                    processing_data: Some(data.encode().unwrap()),
                },
            )
            .unwrap();
    }

    let client = LetsAdsClient::builder(Credentials::new("user", "secret").unwrap())
        .endpoint(format!("{}/api", server.uri()))
        .table(table.clone())
        .build()
        .unwrap();
    let report = client.check_status_by_cron(&store).await.unwrap();
    assert_eq!(report.updated(), 1);
    assert_eq!(report.failed(), 1);

    // The delivered message leaves the pending set; the failed one stays for the next run.
    let pending = store.find_pending(&table, "letsads").await.unwrap();
    let ids = pending.iter().map(|message| message.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![2]);
}
