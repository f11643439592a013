use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, params};

use super::{MessageStore, STATUS_COMPLETE, StatusUpdate, StoreError, StoredMessage};
use crate::domain::{KnownStateCode, TableName};
use crate::gateway::BoxFuture;

/// SQLite-backed message table.
///
/// Queries run synchronously on the calling task; the sweep issues one small query per
/// message, so no blocking-pool hand-off is done here.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(database_error)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(database_error)?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Create the message table if it does not exist yet.
    pub fn ensure_schema(&self, table: &TableName) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY,
                    \"to\" TEXT NOT NULL,
                    text TEXT,
                    processing TEXT NOT NULL,
                    status TEXT NOT NULL,
                    processing_status TEXT,
                    processing_data TEXT,
                    updated_at REAL
                )",
                table = table.as_str()
            ),
            [],
        )
        .map_err(database_error)?;
        Ok(())
    }

    /// Record a message handed over to a gateway and return its row id.
    pub fn insert_message(
        &self,
        table: &TableName,
        message: &StoredMessage,
    ) -> Result<i64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            &format!(
                "INSERT INTO {table} (\"to\", processing, status, processing_status, processing_data)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                table = table.as_str()
            ),
            params![
                message.to,
                message.processing,
                message.status,
                message.processing_status,
                message.processing_data
            ],
        )
        .map_err(database_error)?;
        Ok(conn.last_insert_rowid())
    }

    fn query_pending(
        &self,
        table: &TableName,
        processing_key: &str,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, \"to\", processing, status, processing_status, processing_data
                 FROM {table}
                 WHERE processing = ?1
                   AND status IN (?2)
                   AND (processing_status IS NULL OR processing_status IN (?3))
                 ORDER BY id",
                table = table.as_str()
            ))
            .map_err(database_error)?;

        let rows = stmt
            .query_map(
                params![
                    processing_key,
                    STATUS_COMPLETE,
                    KnownStateCode::InQueue.as_str()
                ],
                |row| {
                    Ok(StoredMessage {
                        id: row.get(0)?,
                        to: row.get(1)?,
                        processing: row.get(2)?,
                        status: row.get(3)?,
                        processing_status: row.get(4)?,
                        processing_data: row.get(5)?,
                    })
                },
            )
            .map_err(database_error)?;

        let messages = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(database_error)?;
        Ok(messages)
    }

    fn write_status(
        &self,
        table: &TableName,
        id: i64,
        update: &StatusUpdate,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            &format!(
                "UPDATE {table} SET processing_status = ?1, updated_at = ?2 WHERE id = ?3",
                table = table.as_str()
            ),
            params![update.processing_status.as_str(), update.updated_at, id],
        )
        .map_err(database_error)?;
        Ok(())
    }
}

impl MessageStore for SqliteStore {
    fn find_pending<'a>(
        &'a self,
        table: &'a TableName,
        processing_key: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StoredMessage>, StoreError>> {
        Box::pin(std::future::ready(self.query_pending(table, processing_key)))
    }

    fn update_status<'a>(
        &'a self,
        table: &'a TableName,
        id: i64,
        update: &'a StatusUpdate,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(std::future::ready(self.write_status(table, id, update)))
    }
}

fn database_error(err: rusqlite::Error) -> StoreError {
    StoreError::Database(Box::new(err))
}
