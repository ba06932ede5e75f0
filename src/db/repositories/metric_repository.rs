use std::convert::TryFrom;

use rusqlite::{named_params, Row};

use crate::db::repositories::collection::{
    collection_written, forget_collection, format_timestamp, mark_collection_written,
    parse_timestamp, Collection, CollectionRepository,
};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::metric::{MetricCategory, MetricPeriod, PerformanceMetric, Trend};

#[derive(Debug, Clone)]
pub struct PerformanceMetricRow {
    pub id: String,
    pub position: i64,
    pub name: String,
    pub value: f64,
    pub target: Option<f64>,
    pub unit: String,
    pub trend: String,
    pub trend_percentage: f64,
    pub category: String,
    pub period: String,
    pub last_updated: String,
}

impl PerformanceMetricRow {
    pub fn from_record(record: &PerformanceMetric, position: usize) -> Self {
        Self {
            id: record.id.clone(),
            position: position as i64,
            name: record.name.clone(),
            value: record.value,
            target: record.target,
            unit: record.unit.clone(),
            trend: record.trend.as_str().to_string(),
            trend_percentage: record.trend_percentage,
            category: record.category.as_str().to_string(),
            period: record.period.as_str().to_string(),
            last_updated: format_timestamp(&record.last_updated),
        }
    }

    pub fn into_record(self) -> AppResult<PerformanceMetric> {
        Ok(PerformanceMetric {
            trend: Trend::try_from(self.trend.as_str()).map_err(AppError::database)?,
            category: MetricCategory::try_from(self.category.as_str())
                .map_err(AppError::database)?,
            period: MetricPeriod::try_from(self.period.as_str()).map_err(AppError::database)?,
            last_updated: parse_timestamp(&self.last_updated)?,
            id: self.id,
            name: self.name,
            value: self.value,
            target: self.target,
            unit: self.unit,
            trend_percentage: self.trend_percentage,
        })
    }
}

impl TryFrom<&Row<'_>> for PerformanceMetricRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            position: row.get("position")?,
            name: row.get("name")?,
            value: row.get("value")?,
            target: row.get("target")?,
            unit: row.get("unit")?,
            trend: row.get("trend")?,
            trend_percentage: row.get("trend_percentage")?,
            category: row.get("category")?,
            period: row.get("period")?,
            last_updated: row.get("last_updated")?,
        })
    }
}

pub struct PerformanceMetricRepository {
    db: DbPool,
}

impl PerformanceMetricRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl CollectionRepository<PerformanceMetric> for PerformanceMetricRepository {
    fn collection(&self) -> Collection {
        Collection::Metrics
    }

    fn load(&self) -> AppResult<Option<Vec<PerformanceMetric>>> {
        self.db.with_connection(|conn| {
            if !collection_written(conn, Collection::Metrics)? {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                r#"
                    SELECT
                        id,
                        position,
                        name,
                        value,
                        target,
                        unit,
                        trend,
                        trend_percentage,
                        category,
                        period,
                        last_updated
                    FROM performance_metrics
                    ORDER BY position ASC
                "#,
            )?;

            let records = stmt
                .query_map([], |row| PerformanceMetricRow::try_from(row))?
                .map(|row| {
                    row.map_err(AppError::from)
                        .and_then(|row| row.into_record())
                })
                .collect::<AppResult<Vec<_>>>()?;

            Ok(Some(records))
        })
    }

    fn replace(&self, records: &[PerformanceMetric]) -> AppResult<()> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM performance_metrics", [])?;

            let mut stmt = tx.prepare(
                r#"
                    INSERT INTO performance_metrics (
                        id,
                        position,
                        name,
                        value,
                        target,
                        unit,
                        trend,
                        trend_percentage,
                        category,
                        period,
                        last_updated
                    ) VALUES (
                        :id,
                        :position,
                        :name,
                        :value,
                        :target,
                        :unit,
                        :trend,
                        :trend_percentage,
                        :category,
                        :period,
                        :last_updated
                    )
                "#,
            )?;

            for (position, record) in records.iter().enumerate() {
                let row = PerformanceMetricRow::from_record(record, position);
                stmt.execute(named_params! {
                    ":id": &row.id,
                    ":position": row.position,
                    ":name": &row.name,
                    ":value": row.value,
                    ":target": row.target,
                    ":unit": &row.unit,
                    ":trend": &row.trend,
                    ":trend_percentage": row.trend_percentage,
                    ":category": &row.category,
                    ":period": &row.period,
                    ":last_updated": &row.last_updated,
                })?;
            }

            mark_collection_written(tx, Collection::Metrics, records.len())?;
            Ok(())
        })
    }

    fn clear(&self) -> AppResult<()> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM performance_metrics", [])?;
            forget_collection(tx, Collection::Metrics)
        })
    }
}
