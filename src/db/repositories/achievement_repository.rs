use std::convert::TryFrom;

use rusqlite::{named_params, Row};

use crate::db::repositories::collection::{
    collection_written, forget_collection, format_timestamp, mark_collection_written,
    parse_timestamp, Collection, CollectionRepository,
};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::achievement::{Achievement, AchievementCategory, AchievementRarity};

#[derive(Debug, Clone)]
pub struct AchievementRow {
    pub id: String,
    pub position: i64,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub rarity: String,
    pub unlocked_at: String,
    pub progress: Option<f64>,
    pub max_progress: Option<f64>,
}

impl AchievementRow {
    pub fn from_record(record: &Achievement, position: usize) -> Self {
        Self {
            id: record.id.clone(),
            position: position as i64,
            title: record.title.clone(),
            description: record.description.clone(),
            icon: record.icon.clone(),
            category: record.category.as_str().to_string(),
            rarity: record.rarity.as_str().to_string(),
            unlocked_at: format_timestamp(&record.unlocked_at),
            progress: record.progress,
            max_progress: record.max_progress,
        }
    }

    pub fn into_record(self) -> AppResult<Achievement> {
        Ok(Achievement {
            category: AchievementCategory::try_from(self.category.as_str())
                .map_err(AppError::database)?,
            rarity: AchievementRarity::try_from(self.rarity.as_str())
                .map_err(AppError::database)?,
            unlocked_at: parse_timestamp(&self.unlocked_at)?,
            id: self.id,
            title: self.title,
            description: self.description,
            icon: self.icon,
            progress: self.progress,
            max_progress: self.max_progress,
        })
    }
}

impl TryFrom<&Row<'_>> for AchievementRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            position: row.get("position")?,
            title: row.get("title")?,
            description: row.get("description")?,
            icon: row.get("icon")?,
            category: row.get("category")?,
            rarity: row.get("rarity")?,
            unlocked_at: row.get("unlocked_at")?,
            progress: row.get("progress")?,
            max_progress: row.get("max_progress")?,
        })
    }
}

pub struct AchievementRepository {
    db: DbPool,
}

impl AchievementRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl CollectionRepository<Achievement> for AchievementRepository {
    fn collection(&self) -> Collection {
        Collection::Achievements
    }

    fn load(&self) -> AppResult<Option<Vec<Achievement>>> {
        self.db.with_connection(|conn| {
            if !collection_written(conn, Collection::Achievements)? {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                r#"
                    SELECT
                        id,
                        position,
                        title,
                        description,
                        icon,
                        category,
                        rarity,
                        unlocked_at,
                        progress,
                        max_progress
                    FROM achievements
                    ORDER BY position ASC
                "#,
            )?;

            let records = stmt
                .query_map([], |row| AchievementRow::try_from(row))?
                .map(|row| {
                    row.map_err(AppError::from)
                        .and_then(|row| row.into_record())
                })
                .collect::<AppResult<Vec<_>>>()?;

            Ok(Some(records))
        })
    }

    fn replace(&self, records: &[Achievement]) -> AppResult<()> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM achievements", [])?;

            let mut stmt = tx.prepare(
                r#"
                    INSERT INTO achievements (
                        id,
                        position,
                        title,
                        description,
                        icon,
                        category,
                        rarity,
                        unlocked_at,
                        progress,
                        max_progress
                    ) VALUES (
                        :id,
                        :position,
                        :title,
                        :description,
                        :icon,
                        :category,
                        :rarity,
                        :unlocked_at,
                        :progress,
                        :max_progress
                    )
                "#,
            )?;

            for (position, record) in records.iter().enumerate() {
                let row = AchievementRow::from_record(record, position);
                stmt.execute(named_params! {
                    ":id": &row.id,
                    ":position": row.position,
                    ":title": &row.title,
                    ":description": &row.description,
                    ":icon": &row.icon,
                    ":category": &row.category,
                    ":rarity": &row.rarity,
                    ":unlocked_at": &row.unlocked_at,
                    ":progress": row.progress,
                    ":max_progress": row.max_progress,
                })?;
            }

            mark_collection_written(tx, Collection::Achievements, records.len())?;
            Ok(())
        })
    }

    fn clear(&self) -> AppResult<()> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM achievements", [])?;
            forget_collection(tx, Collection::Achievements)
        })
    }
}
