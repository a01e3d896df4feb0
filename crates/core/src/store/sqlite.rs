//! SQLite-backed state store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, TransactionBehavior};

use super::{Record, RecordUpdate, StateStore, StoreError};

/// SQLite-backed state store.
///
/// Each field of a record is one row of `item_fields`.
pub struct SqliteStateStore {
    conn: Mutex<Connection>,
}

impl SqliteStateStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS item_fields (
                item_id TEXT NOT NULL,
                field TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (item_id, field)
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("connection lock poisoned".to_string()))
    }
}

impl StateStore for SqliteStateStore {
    fn get(&self, id: &str) -> Result<Option<Record>, StoreError> {
        let conn = self.lock()?;
        read_record(&conn, id)
    }

    fn set(&self, id: &str, record: &Record) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        write_record(&tx, id, record)?;

        tx.commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn update(&self, id: &str, update: RecordUpdate<'_>) -> Result<bool, StoreError> {
        let mut conn = self.lock()?;
        // Immediate: the write lock is held from the read on.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let current = read_record(&tx, id)?;
        let Some(record) = update(current)? else {
            return Ok(false);
        };
        write_record(&tx, id, &record)?;

        tx.commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT item_id FROM item_fields ORDER BY item_id")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(keys)
    }
}

fn read_record(conn: &Connection, id: &str) -> Result<Option<Record>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT field, value FROM item_fields WHERE item_id = ?")
        .map_err(|e| StoreError::Database(e.to_string()))?;

    let rows = stmt
        .query_map(params![id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| StoreError::Database(e.to_string()))?;

    let mut record = Record::new();
    for row in rows {
        let (field, value) = row.map_err(|e| StoreError::Database(e.to_string()))?;
        record.insert(field, value);
    }

    if record.is_empty() {
        Ok(None)
    } else {
        Ok(Some(record))
    }
}

/// Replace every field of `id`. Callers run this inside a transaction.
fn write_record(conn: &Connection, id: &str, record: &Record) -> Result<(), StoreError> {
    conn.execute("DELETE FROM item_fields WHERE item_id = ?", params![id])
        .map_err(|e| StoreError::Database(e.to_string()))?;

    let mut insert = conn
        .prepare("INSERT INTO item_fields (item_id, field, value) VALUES (?, ?, ?)")
        .map_err(|e| StoreError::Database(e.to_string()))?;
    for (field, value) in record {
        insert
            .execute(params![id, field, value])
            .map_err(|e| StoreError::Database(e.to_string()))?;
    }
    Ok(())
}
