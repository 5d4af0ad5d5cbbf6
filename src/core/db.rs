use crate::core::error;
use crate::core::kv::KeyValueStore;
use crate::core::schemas;
use crate::core::time;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};

pub fn db_connect(db_path: &str) -> Result<Connection, error::QuadcalcError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(error::QuadcalcError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(error::QuadcalcError::RusqliteError)?;
    Ok(conn)
}

pub fn kv_db_path(root: &Path) -> PathBuf {
    root.join(schemas::KV_DB_NAME)
}

/// SQLite-backed [`KeyValueStore`]. Connections are opened per operation.
#[derive(Debug, Clone)]
pub struct SqliteKv {
    db_path: PathBuf,
}

impl SqliteKv {
    /// Creates the data directory and the `kv` table if needed.
    pub fn open(root: &Path) -> Result<Self, error::QuadcalcError> {
        fs::create_dir_all(root).map_err(error::QuadcalcError::IoError)?;
        let db_path = kv_db_path(root);
        let conn = db_connect(&db_path.to_string_lossy())?;
        conn.execute(schemas::KV_DB_SCHEMA, [])?;
        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, error::QuadcalcError> {
        db_connect(&self.db_path.to_string_lossy())
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, error::QuadcalcError> {
        let conn = self.connect()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), error::QuadcalcError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, time::now_epoch_ms()],
        )?;
        Ok(())
    }
}
