use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{named_params, Connection, OptionalExtension};

use crate::error::{AppError, AppResult};

/// The four persisted progress collections, each stored under a fixed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Milestones,
    Metrics,
    Snapshots,
    Achievements,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Milestones,
        Collection::Metrics,
        Collection::Snapshots,
        Collection::Achievements,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Collection::Milestones => "progress_milestones",
            Collection::Metrics => "progress_metrics",
            Collection::Snapshots => "progress_snapshots",
            Collection::Achievements => "progress_achievements",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whole-collection persistence. `load` returns `None` when the collection was never written.
pub trait CollectionRepository<T>: Send + Sync {
    fn collection(&self) -> Collection;

    fn load(&self) -> AppResult<Option<Vec<T>>>;

    fn replace(&self, records: &[T]) -> AppResult<()>;

    /// Forgets the collection entirely, so the next `load` reports it as absent.
    fn clear(&self) -> AppResult<()>;
}

pub(crate) fn collection_written(conn: &Connection, collection: Collection) -> AppResult<bool> {
    let marker = conn
        .query_row(
            "SELECT collection FROM progress_collections WHERE collection = :collection",
            named_params! {":collection": collection.key()},
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(marker.is_some())
}

pub(crate) fn mark_collection_written(
    conn: &Connection,
    collection: Collection,
    record_count: usize,
) -> AppResult<()> {
    conn.execute(
        r#"
            INSERT INTO progress_collections (collection, record_count, updated_at)
            VALUES (:collection, :record_count, :updated_at)
            ON CONFLICT(collection) DO UPDATE SET
                record_count = excluded.record_count,
                updated_at = excluded.updated_at
        "#,
        named_params! {
            ":collection": collection.key(),
            ":record_count": record_count as i64,
            ":updated_at": Utc::now().to_rfc3339(),
        },
    )?;
    Ok(())
}

pub(crate) fn forget_collection(conn: &Connection, collection: Collection) -> AppResult<()> {
    conn.execute(
        "DELETE FROM progress_collections WHERE collection = :collection",
        named_params! {":collection": collection.key()},
    )?;
    Ok(())
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub(crate) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| AppError::database(format!("invalid timestamp {raw:?}: {err}")))
}

pub(crate) fn parse_optional_timestamp(raw: Option<String>) -> AppResult<Option<DateTime<Utc>>> {
    raw.as_deref().map(parse_timestamp).transpose()
}

pub(crate) fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| AppError::database(format!("invalid date {raw:?}: {err}")))
}
