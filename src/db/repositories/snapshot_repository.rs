use std::convert::TryFrom;

use rusqlite::{named_params, Row};

use crate::db::repositories::collection::{
    collection_written, forget_collection, mark_collection_written, parse_date, Collection,
    CollectionRepository,
};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::snapshot::{ProgressSnapshot, SnapshotMetrics};

#[derive(Debug, Clone)]
pub struct ProgressSnapshotRow {
    pub id: String,
    pub position: i64,
    pub user_id: String,
    pub snapshot_date: String,
    pub nominees_submitted: u32,
    pub nominees_approved: u32,
    pub quality_score: f64,
    pub completion_rate: f64,
    pub time_spent_minutes: u32,
    pub active_days: u32,
    pub milestones_achieved: String,
    pub note: Option<String>,
}

impl ProgressSnapshotRow {
    pub fn from_record(record: &ProgressSnapshot, position: usize) -> AppResult<Self> {
        Ok(Self {
            id: record.id.clone(),
            position: position as i64,
            user_id: record.user_id.clone(),
            snapshot_date: record.date.format("%Y-%m-%d").to_string(),
            nominees_submitted: record.metrics.nominees_submitted,
            nominees_approved: record.metrics.nominees_approved,
            quality_score: record.metrics.quality_score,
            completion_rate: record.metrics.completion_rate,
            time_spent_minutes: record.metrics.time_spent_minutes,
            active_days: record.metrics.active_days,
            milestones_achieved: serde_json::to_string(&record.milestones_achieved)?,
            note: record.note.clone(),
        })
    }

    pub fn into_record(self) -> AppResult<ProgressSnapshot> {
        Ok(ProgressSnapshot {
            date: parse_date(&self.snapshot_date)?,
            milestones_achieved: serde_json::from_str(&self.milestones_achieved)?,
            id: self.id,
            user_id: self.user_id,
            metrics: SnapshotMetrics {
                nominees_submitted: self.nominees_submitted,
                nominees_approved: self.nominees_approved,
                quality_score: self.quality_score,
                completion_rate: self.completion_rate,
                time_spent_minutes: self.time_spent_minutes,
                active_days: self.active_days,
            },
            note: self.note,
        })
    }
}

impl TryFrom<&Row<'_>> for ProgressSnapshotRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            position: row.get("position")?,
            user_id: row.get("user_id")?,
            snapshot_date: row.get("snapshot_date")?,
            nominees_submitted: row.get("nominees_submitted")?,
            nominees_approved: row.get("nominees_approved")?,
            quality_score: row.get("quality_score")?,
            completion_rate: row.get("completion_rate")?,
            time_spent_minutes: row.get("time_spent_minutes")?,
            active_days: row.get("active_days")?,
            milestones_achieved: row.get("milestones_achieved")?,
            note: row.get("note")?,
        })
    }
}

pub struct ProgressSnapshotRepository {
    db: DbPool,
}

impl ProgressSnapshotRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl CollectionRepository<ProgressSnapshot> for ProgressSnapshotRepository {
    fn collection(&self) -> Collection {
        Collection::Snapshots
    }

    fn load(&self) -> AppResult<Option<Vec<ProgressSnapshot>>> {
        self.db.with_connection(|conn| {
            if !collection_written(conn, Collection::Snapshots)? {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                r#"
                    SELECT
                        id,
                        position,
                        user_id,
                        snapshot_date,
                        nominees_submitted,
                        nominees_approved,
                        quality_score,
                        completion_rate,
                        time_spent_minutes,
                        active_days,
                        milestones_achieved,
                        note
                    FROM progress_snapshots
                    ORDER BY position ASC
                "#,
            )?;

            let records = stmt
                .query_map([], |row| ProgressSnapshotRow::try_from(row))?
                .map(|row| {
                    row.map_err(AppError::from)
                        .and_then(|row| row.into_record())
                })
                .collect::<AppResult<Vec<_>>>()?;

            Ok(Some(records))
        })
    }

    fn replace(&self, records: &[ProgressSnapshot]) -> AppResult<()> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM progress_snapshots", [])?;

            let mut stmt = tx.prepare(
                r#"
                    INSERT INTO progress_snapshots (
                        id,
                        position,
                        user_id,
                        snapshot_date,
                        nominees_submitted,
                        nominees_approved,
                        quality_score,
                        completion_rate,
                        time_spent_minutes,
                        active_days,
                        milestones_achieved,
                        note
                    ) VALUES (
                        :id,
                        :position,
                        :user_id,
                        :snapshot_date,
                        :nominees_submitted,
                        :nominees_approved,
                        :quality_score,
                        :completion_rate,
                        :time_spent_minutes,
                        :active_days,
                        :milestones_achieved,
                        :note
                    )
                "#,
            )?;

            for (position, record) in records.iter().enumerate() {
                let row = ProgressSnapshotRow::from_record(record, position)?;
                stmt.execute(named_params! {
                    ":id": &row.id,
                    ":position": row.position,
                    ":user_id": &row.user_id,
                    ":snapshot_date": &row.snapshot_date,
                    ":nominees_submitted": row.nominees_submitted,
                    ":nominees_approved": row.nominees_approved,
                    ":quality_score": row.quality_score,
                    ":completion_rate": row.completion_rate,
                    ":time_spent_minutes": row.time_spent_minutes,
                    ":active_days": row.active_days,
                    ":milestones_achieved": &row.milestones_achieved,
                    ":note": &row.note,
                })?;
            }

            mark_collection_written(tx, Collection::Snapshots, records.len())?;
            Ok(())
        })
    }

    fn clear(&self) -> AppResult<()> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM progress_snapshots", [])?;
            forget_collection(tx, Collection::Snapshots)
        })
    }
}
