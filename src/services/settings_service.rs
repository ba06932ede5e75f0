use std::sync::RwLock;

use tracing::warn;

use crate::db::repositories::settings_repository::SettingsRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::{ProgressSettings, ProgressSettingsUpdate};

const KEY_PREFIX: &str = "progress.";
const KEY_PROJECTION_TARGET: &str = "progress.projection_target";
const KEY_FULL_PRODUCTIVITY_RATE: &str = "progress.full_productivity_daily_rate";
const KEY_HIGH_QUALITY_THRESHOLD: &str = "progress.high_quality_threshold";
const KEY_INSIGHT_WINDOW_DAYS: &str = "progress.insight_window_days";
const KEY_CONSISTENCY_WINDOW_DAYS: &str = "progress.consistency_window_days";

const MAX_WINDOW_DAYS: u32 = 365;

/// Tunables for scoring and projections, persisted in `app_settings` when a database is attached.
pub struct SettingsService {
    db: Option<DbPool>,
    cache: RwLock<Option<ProgressSettings>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db: Some(db),
            cache: RwLock::new(None),
        }
    }

    /// Settings that live only for the lifetime of this process.
    pub fn in_memory() -> Self {
        Self {
            db: None,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<ProgressSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = match &self.db {
            Some(db) => db.with_connection(load_settings)?,
            None => ProgressSettings::default(),
        };

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    /// Current settings, or the defaults if they cannot be loaded.
    pub fn effective(&self) -> ProgressSettings {
        self.get().unwrap_or_else(|err| {
            warn!(target: "app::progress::settings", error = %err, "falling back to default settings");
            ProgressSettings::default()
        })
    }

    pub fn update(&self, input: ProgressSettingsUpdate) -> AppResult<ProgressSettings> {
        let mut current = self.get()?;

        if let Some(target) = input.projection_target {
            if target == 0 {
                return Err(AppError::validation("projectionTarget must be greater than 0"));
            }
            current.projection_target = target;
        }

        if let Some(rate) = input.full_productivity_daily_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(AppError::validation(
                    "fullProductivityDailyRate must be a positive number",
                ));
            }
            current.full_productivity_daily_rate = rate;
        }

        if let Some(threshold) = input.high_quality_threshold {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(AppError::validation(
                    "highQualityThreshold must be between 0 and 100",
                ));
            }
            current.high_quality_threshold = threshold;
        }

        if let Some(days) = input.insight_window_days {
            ensure_valid_window("insightWindowDays", days)?;
            current.insight_window_days = days;
        }

        if let Some(days) = input.consistency_window_days {
            ensure_valid_window("consistencyWindowDays", days)?;
            current.consistency_window_days = days;
        }

        if let Some(db) = &self.db {
            db.with_transaction(|tx| {
                SettingsRepository::upsert(
                    tx,
                    KEY_PROJECTION_TARGET,
                    &current.projection_target.to_string(),
                )?;
                SettingsRepository::upsert(
                    tx,
                    KEY_FULL_PRODUCTIVITY_RATE,
                    &current.full_productivity_daily_rate.to_string(),
                )?;
                SettingsRepository::upsert(
                    tx,
                    KEY_HIGH_QUALITY_THRESHOLD,
                    &current.high_quality_threshold.to_string(),
                )?;
                SettingsRepository::upsert(
                    tx,
                    KEY_INSIGHT_WINDOW_DAYS,
                    &current.insight_window_days.to_string(),
                )?;
                SettingsRepository::upsert(
                    tx,
                    KEY_CONSISTENCY_WINDOW_DAYS,
                    &current.consistency_window_days.to_string(),
                )?;
                Ok(())
            })?;
        }

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(current.clone());
        }

        Ok(current)
    }

    /// Removes stored overrides and returns the defaults.
    pub fn reset(&self) -> AppResult<ProgressSettings> {
        if let Some(db) = &self.db {
            db.with_connection(|conn| SettingsRepository::delete_prefixed(conn, KEY_PREFIX))?;
        }

        let defaults = ProgressSettings::default();
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(defaults.clone());
        }
        Ok(defaults)
    }
}

fn load_settings(conn: &rusqlite::Connection) -> AppResult<ProgressSettings> {
    let mut settings = ProgressSettings::default();

    for row in SettingsRepository::list_prefixed(conn, KEY_PREFIX)? {
        let applied = match row.key.as_str() {
            KEY_PROJECTION_TARGET => row
                .value
                .parse()
                .map(|value| settings.projection_target = value)
                .is_ok(),
            KEY_FULL_PRODUCTIVITY_RATE => row
                .value
                .parse()
                .map(|value| settings.full_productivity_daily_rate = value)
                .is_ok(),
            KEY_HIGH_QUALITY_THRESHOLD => row
                .value
                .parse()
                .map(|value| settings.high_quality_threshold = value)
                .is_ok(),
            KEY_INSIGHT_WINDOW_DAYS => row
                .value
                .parse()
                .map(|value| settings.insight_window_days = value)
                .is_ok(),
            KEY_CONSISTENCY_WINDOW_DAYS => row
                .value
                .parse()
                .map(|value| settings.consistency_window_days = value)
                .is_ok(),
            _ => true,
        };

        if !applied {
            warn!(
                target: "app::progress::settings",
                key = %row.key,
                value = %row.value,
                "ignoring unparsable setting"
            );
        }
    }

    Ok(settings)
}

fn ensure_valid_window(field: &str, days: u32) -> AppResult<()> {
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(AppError::validation(format!(
            "{field} must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }
    Ok(())
}
