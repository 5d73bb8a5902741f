//! Operation records backed by SQLite.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::storage::RepoError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS operations (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        world_name       TEXT    NOT NULL DEFAULT '',
        mission_name     TEXT    NOT NULL DEFAULT '',
        mission_duration INTEGER NOT NULL DEFAULT 0,
        filename         TEXT    NOT NULL DEFAULT '',
        date             TEXT    NOT NULL DEFAULT '',
        tag              TEXT    NOT NULL DEFAULT ''
    );
";

/// A recorded operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    pub world_name: String,
    pub mission_name: String,
    /// Duration in seconds.
    pub mission_duration: i64,
    pub filename: String,
    pub date: String,
    pub tag: String,
}

/// Optional filters for [`OperationRepo::select`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationFilter {
    /// Substring match on the mission name.
    pub name: Option<String>,
    /// Exact match on the tag.
    pub tag: Option<String>,
}

/// Handle to the operations database.
#[derive(Debug, Clone)]
pub struct OperationRepo {
    connection: Arc<Mutex<Connection>>,
}

impl OperationRepo {
    /// Open (creating if absent) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, RepoError> {
        let connection = Connection::open(path)?;
        connection.execute_batch(SCHEMA)?;
        tracing::debug!(path = %path.display(), "Operation repository opened");
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Open a throwaway in-memory database.
    pub fn in_memory() -> Result<Self, RepoError> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Insert an operation. The `id` field is ignored; the assigned id is returned.
    pub fn store(&self, op: &Operation) -> Result<i64, RepoError> {
        let conn = self.connection.lock().map_err(|_| RepoError::Poisoned)?;
        conn.execute(
            "INSERT INTO operations (world_name, mission_name, mission_duration, filename, date, tag)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                op.world_name,
                op.mission_name,
                op.mission_duration,
                op.filename,
                op.date,
                op.tag
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a single operation by id.
    pub fn get(&self, id: i64) -> Result<Option<Operation>, RepoError> {
        let conn = self.connection.lock().map_err(|_| RepoError::Poisoned)?;
        let op = conn
            .query_row(
                "SELECT id, world_name, mission_name, mission_duration, filename, date, tag
                 FROM operations WHERE id = ?1",
                params![id],
                row_to_operation,
            )
            .optional()?;
        Ok(op)
    }

    /// List operations matching `filter`, newest first.
    pub fn select(&self, filter: &OperationFilter) -> Result<Vec<Operation>, RepoError> {
        let name = filter
            .name
            .as_deref()
            .map(|n| format!("%{}%", escape_like(n)))
            .unwrap_or_else(|| "%".to_string());

        let conn = self.connection.lock().map_err(|_| RepoError::Poisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, world_name, mission_name, mission_duration, filename, date, tag
             FROM operations
             WHERE mission_name LIKE ?1 ESCAPE '\\' AND (?2 IS NULL OR tag = ?2)
             ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![name, filter.tag], row_to_operation)?;

        let mut ops = Vec::new();
        for row in rows {
            ops.push(row?);
        }
        Ok(ops)
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_operation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Operation> {
    Ok(Operation {
        id: row.get(0)?,
        world_name: row.get(1)?,
        mission_name: row.get(2)?,
        mission_duration: row.get(3)?,
        filename: row.get(4)?,
        date: row.get(5)?,
        tag: row.get(6)?,
    })
}
