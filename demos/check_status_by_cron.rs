//! Reconciliation sweep meant to be run from cron.
//!
//! Reads `LETSADS_DB` (SQLite file) and `LETSADS_TABLE` in addition to the credentials.

mod common;

use letsads::{LetsAdsClient, SqliteStore, TableName};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let table = TableName::new(common::required_env("LETSADS_TABLE")?)?;
    let store = SqliteStore::open(common::required_env("LETSADS_DB")?)?;

    let client = LetsAdsClient::builder(common::credentials()?)
        .table(table)
        .build()?;
    let report = client.check_status_by_cron(&store).await?;

    for (id, err) in report.failures() {
        eprintln!("record {id}: {err}");
    }
    println!("updated: {}, failed: {}", report.updated(), report.failed());

    Ok(())
}
