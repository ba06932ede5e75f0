use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Transaction};
use tracing::{debug, info};

use crate::error::AppResult;

pub mod migrations;

pub mod repositories;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Handle on the progress database file. Connections are opened per operation;
/// schema and migrations are applied once, when the pool is created.
#[derive(Clone, Debug)]
pub struct DbPool {
    path: PathBuf,
}

impl DbPool {
    pub fn new<P: Into<PathBuf>>(path: P) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let pool = Self { path };
        pool.initialize()?;
        Ok(pool)
    }

    fn initialize(&self) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL)?;
        migrations::run(&conn)?;

        let written = written_collections(&conn)?;
        info!(
            target: "app::db",
            db_path = %self.path.display(),
            collections = ?written,
            "progress database ready"
        );
        Ok(())
    }

    pub fn get_connection(&self) -> AppResult<Connection> {
        let mut conn = Connection::open(&self.path)?;
        configure_connection(&mut conn)?;
        debug!(target: "app::db", db_path = %self.path.display(), "opened connection");
        Ok(conn)
    }

    /// Collection keys that have been written at least once, sorted.
    pub fn written_collections(&self) -> AppResult<Vec<String>> {
        self.with_connection(written_collections)
    }

    pub fn with_connection<F, T>(&self, callback: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let conn = self.get_connection()?;
        callback(&conn)
    }

    /// Runs `callback` inside a transaction; it commits only when the callback succeeds.
    pub fn with_transaction<F, T>(&self, callback: F) -> AppResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<T>,
    {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let value = callback(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn configure_connection(conn: &mut Connection) -> AppResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.pragma_update(None, "foreign_keys", &1)?;
    conn.pragma_update(None, "journal_mode", &"WAL")?;
    Ok(())
}

fn written_collections(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT collection FROM progress_collections ORDER BY collection")?;
    let keys = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(keys)
}
