use std::convert::TryFrom;

use rusqlite::{named_params, Row};

use crate::db::repositories::collection::{
    collection_written, forget_collection, format_timestamp, mark_collection_written,
    parse_optional_timestamp, parse_timestamp, Collection, CollectionRepository,
};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::milestone::{Milestone, MilestoneCategory, MilestonePriority};

#[derive(Debug, Clone)]
pub struct MilestoneRow {
    pub id: String,
    pub position: i64,
    pub title: String,
    pub description: String,
    pub target: f64,
    pub current: f64,
    pub unit: String,
    pub category: String,
    pub priority: String,
    pub deadline: Option<String>,
    pub reward: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MilestoneRow {
    pub fn from_record(record: &Milestone, position: usize) -> Self {
        Self {
            id: record.id.clone(),
            position: position as i64,
            title: record.title.clone(),
            description: record.description.clone(),
            target: record.target,
            current: record.current,
            unit: record.unit.clone(),
            category: record.category.as_str().to_string(),
            priority: record.priority.as_str().to_string(),
            deadline: record.deadline.as_ref().map(format_timestamp),
            reward: record.reward.clone(),
            is_completed: record.is_completed,
            completed_at: record.completed_at.as_ref().map(format_timestamp),
            created_at: format_timestamp(&record.created_at),
            updated_at: format_timestamp(&record.updated_at),
        }
    }

    pub fn into_record(self) -> AppResult<Milestone> {
        let category =
            MilestoneCategory::try_from(self.category.as_str()).map_err(AppError::database)?;
        let priority =
            MilestonePriority::try_from(self.priority.as_str()).map_err(AppError::database)?;

        Ok(Milestone {
            id: self.id,
            title: self.title,
            description: self.description,
            target: self.target,
            current: self.current,
            unit: self.unit,
            category,
            priority,
            deadline: parse_optional_timestamp(self.deadline)?,
            reward: self.reward,
            is_completed: self.is_completed,
            completed_at: parse_optional_timestamp(self.completed_at)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl TryFrom<&Row<'_>> for MilestoneRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            position: row.get("position")?,
            title: row.get("title")?,
            description: row.get("description")?,
            target: row.get("target")?,
            current: row.get("current")?,
            unit: row.get("unit")?,
            category: row.get("category")?,
            priority: row.get("priority")?,
            deadline: row.get("deadline")?,
            reward: row.get("reward")?,
            is_completed: row.get("is_completed")?,
            completed_at: row.get("completed_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct MilestoneRepository {
    db: DbPool,
}

impl MilestoneRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl CollectionRepository<Milestone> for MilestoneRepository {
    fn collection(&self) -> Collection {
        Collection::Milestones
    }

    fn load(&self) -> AppResult<Option<Vec<Milestone>>> {
        self.db.with_connection(|conn| {
            if !collection_written(conn, Collection::Milestones)? {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                r#"
                    SELECT
                        id,
                        position,
                        title,
                        description,
                        target,
                        current,
                        unit,
                        category,
                        priority,
                        deadline,
                        reward,
                        is_completed,
                        completed_at,
                        created_at,
                        updated_at
                    FROM milestones
                    ORDER BY position ASC
                "#,
            )?;

            let records = stmt
                .query_map([], |row| MilestoneRow::try_from(row))?
                .map(|row| {
                    row.map_err(AppError::from)
                        .and_then(|row| row.into_record())
                })
                .collect::<AppResult<Vec<_>>>()?;

            Ok(Some(records))
        })
    }

    fn replace(&self, records: &[Milestone]) -> AppResult<()> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM milestones", [])?;

            let mut stmt = tx.prepare(
                r#"
                    INSERT INTO milestones (
                        id,
                        position,
                        title,
                        description,
                        target,
                        current,
                        unit,
                        category,
                        priority,
                        deadline,
                        reward,
                        is_completed,
                        completed_at,
                        created_at,
                        updated_at
                    ) VALUES (
                        :id,
                        :position,
                        :title,
                        :description,
                        :target,
                        :current,
                        :unit,
                        :category,
                        :priority,
                        :deadline,
                        :reward,
                        :is_completed,
                        :completed_at,
                        :created_at,
                        :updated_at
                    )
                "#,
            )?;

            for (position, record) in records.iter().enumerate() {
                let row = MilestoneRow::from_record(record, position);
                stmt.execute(named_params! {
                    ":id": &row.id,
                    ":position": row.position,
                    ":title": &row.title,
                    ":description": &row.description,
                    ":target": row.target,
                    ":current": row.current,
                    ":unit": &row.unit,
                    ":category": &row.category,
                    ":priority": &row.priority,
                    ":deadline": &row.deadline,
                    ":reward": &row.reward,
                    ":is_completed": row.is_completed,
                    ":completed_at": &row.completed_at,
                    ":created_at": &row.created_at,
                    ":updated_at": &row.updated_at,
                })?;
            }

            mark_collection_written(tx, Collection::Milestones, records.len())?;
            Ok(())
        })
    }

    fn clear(&self) -> AppResult<()> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM milestones", [])?;
            forget_collection(tx, Collection::Milestones)
        })
    }
}
