//! SQLite-backed record store.
//!
//! Records are stored as one JSON attribute blob per row. Ids come from a
//! single AUTOINCREMENT sequence shared by every resource.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use breadbox_model::{Record, TranslationBundle};
use breadbox_types::RecordId;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::record_store::RecordStore;

/// Persistent store for records, pivots, and translations backed by SQLite.
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::open_with_conn(Arc::new(Mutex::new(Connection::open(path)?)))
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::open_with_conn(Arc::new(Mutex::new(Connection::open_in_memory()?)))
    }

    /// Wraps a connection shared with other components.
    pub fn open_with_conn(conn: Arc<Mutex<Connection>>) -> StorageResult<Self> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn init_schema(&self) -> StorageResult<()> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                resource TEXT NOT NULL,
                attributes TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_resource ON records (resource);

            CREATE TABLE IF NOT EXISTS pivots (
                pivot_table TEXT NOT NULL,
                owner_id INTEGER NOT NULL,
                related_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                UNIQUE(pivot_table, owner_id, related_id)
            );

            CREATE TABLE IF NOT EXISTS translations (
                resource TEXT NOT NULL,
                record_id INTEGER NOT NULL,
                field TEXT NOT NULL,
                locale TEXT NOT NULL,
                value TEXT NOT NULL,
                UNIQUE(resource, record_id, field, locale)
            );
            ",
        )?;
        Ok(())
    }
}

fn decode_attributes(raw: &str) -> StorageResult<Map<String, Value>> {
    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::InvalidData(format!(
            "record attributes must be an object, got {other}"
        ))),
    }
}

/// Text form used for loose equality in uniqueness checks, so `5` and `"5"`
/// collide the way they would in a SQL column.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        other => Some(other.to_string()),
    }
}

/// Quoted JSON path to a top-level attribute.
fn json_path(column: &str) -> String {
    format!("$.\"{column}\"")
}

impl RecordStore for SqliteRecordStore {
    fn find(&self, resource: &str, id: RecordId) -> StorageResult<Option<Record>> {
        let conn = self.conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT attributes FROM records WHERE resource = ?1 AND id = ?2",
                params![resource, id.get()],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|raw| Ok(Record::with_id(resource, id, decode_attributes(&raw)?)))
            .transpose()
    }

    fn all(&self, resource: &str) -> StorageResult<Vec<Record>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, attributes FROM records WHERE resource = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![resource], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, raw) = row?;
            records.push(Record::with_id(resource, RecordId::new(id), decode_attributes(&raw)?));
        }
        Ok(records)
    }

    fn save(&self, record: &mut Record) -> StorageResult<RecordId> {
        let conn = self.conn()?;
        let attributes = serde_json::to_string(&record.attributes)?;

        if let Some(id) = record.id {
            let updated = conn.execute(
                "UPDATE records SET attributes = ?1 WHERE resource = ?2 AND id = ?3",
                params![attributes, record.resource, id.get()],
            )?;
            if updated == 0 {
                conn.execute(
                    "INSERT INTO records (id, resource, attributes) VALUES (?1, ?2, ?3)",
                    params![id.get(), record.resource, attributes],
                )?;
            }
            debug!("Saved record {} (resource={})", id, record.resource);
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO records (resource, attributes) VALUES (?1, ?2)",
            params![record.resource, attributes],
        )?;
        let id = RecordId::new(conn.last_insert_rowid());
        record.id = Some(id);
        debug!("Created record {} (resource={})", id, record.resource);
        Ok(id)
    }

    fn delete(&self, resource: &str, id: RecordId) -> StorageResult<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM records WHERE resource = ?1 AND id = ?2",
            params![resource, id.get()],
        )?;
        Ok(deleted > 0)
    }

    fn sync_pivot(&self, pivot_table: &str, owner: RecordId, related: &[RecordId]) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM pivots WHERE pivot_table = ?1 AND owner_id = ?2",
            params![pivot_table, owner.get()],
        )?;
        for (position, id) in related.iter().enumerate() {
            tx.execute(
                "INSERT OR IGNORE INTO pivots (pivot_table, owner_id, related_id, position) VALUES (?1, ?2, ?3, ?4)",
                params![pivot_table, owner.get(), id.get(), position as i64],
            )?;
        }
        tx.commit()?;
        debug!(
            "Synced pivot {} for owner {} ({} related)",
            pivot_table,
            owner,
            related.len()
        );
        Ok(())
    }

    fn pivot_ids(&self, pivot_table: &str, owner: RecordId) -> StorageResult<Vec<RecordId>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT related_id FROM pivots WHERE pivot_table = ?1 AND owner_id = ?2 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![pivot_table, owner.get()], |row| row.get::<_, i64>(0))?;
        rows.map(|row| row.map(RecordId::new).map_err(Into::into))
            .collect()
    }

    fn save_translations(
        &self,
        resource: &str,
        id: RecordId,
        bundle: &TranslationBundle,
    ) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for (field, locale, value) in bundle.iter() {
            tx.execute(
                "INSERT OR REPLACE INTO translations (resource, record_id, field, locale, value) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![resource, id.get(), field, locale, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn translations(&self, resource: &str, id: RecordId) -> StorageResult<TranslationBundle> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT field, locale, value FROM translations WHERE resource = ?1 AND record_id = ?2",
        )?;
        let rows = stmt.query_map(params![resource, id.get()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut bundle = TranslationBundle::new();
        for row in rows {
            let (field, locale, value) = row?;
            bundle.insert(field, locale, value);
        }
        Ok(bundle)
    }

    fn delete_translations(&self, resource: &str, id: RecordId, field: Option<&str>) -> StorageResult<()> {
        let conn = self.conn()?;
        match field {
            Some(field) => conn.execute(
                "DELETE FROM translations WHERE resource = ?1 AND record_id = ?2 AND field = ?3",
                params![resource, id.get(), field],
            )?,
            None => conn.execute(
                "DELETE FROM translations WHERE resource = ?1 AND record_id = ?2",
                params![resource, id.get()],
            )?,
        };
        Ok(())
    }

    fn value_taken(
        &self,
        resource: &str,
        column: &str,
        value: &Value,
        ignore: Option<RecordId>,
    ) -> StorageResult<bool> {
        let Some(wanted) = scalar_text(value) else {
            return Ok(false);
        };
        let conn = self.conn()?;
        let taken: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM records
                WHERE resource = ?1
                  AND CAST(json_extract(attributes, ?2) AS TEXT) = ?3
                  AND (?4 IS NULL OR id <> ?4)
            )",
            params![resource, json_path(column), wanted, ignore.map(|id| id.get())],
            |row| row.get(0),
        )?;
        Ok(taken)
    }
}
