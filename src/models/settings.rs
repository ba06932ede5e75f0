use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECTION_TARGET: u32 = 200;
pub const DEFAULT_FULL_PRODUCTIVITY_DAILY_RATE: f64 = 10.0;
pub const DEFAULT_HIGH_QUALITY_THRESHOLD: f64 = 90.0;
pub const DEFAULT_INSIGHT_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_CONSISTENCY_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSettings {
    /// Nominee count the projected-completion date aims at.
    pub projection_target: u32,
    /// Average daily submissions that count as 100% productivity.
    pub full_productivity_daily_rate: f64,
    /// Minimum nominee score counted towards `quality-expert`.
    pub high_quality_threshold: f64,
    pub insight_window_days: u32,
    pub consistency_window_days: u32,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            projection_target: DEFAULT_PROJECTION_TARGET,
            full_productivity_daily_rate: DEFAULT_FULL_PRODUCTIVITY_DAILY_RATE,
            high_quality_threshold: DEFAULT_HIGH_QUALITY_THRESHOLD,
            insight_window_days: DEFAULT_INSIGHT_WINDOW_DAYS,
            consistency_window_days: DEFAULT_CONSISTENCY_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSettingsUpdate {
    #[serde(default)]
    pub projection_target: Option<u32>,
    #[serde(default)]
    pub full_productivity_daily_rate: Option<f64>,
    #[serde(default)]
    pub high_quality_threshold: Option<f64>,
    #[serde(default)]
    pub insight_window_days: Option<u32>,
    #[serde(default)]
    pub consistency_window_days: Option<u32>,
}
