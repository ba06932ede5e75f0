use serde::{Deserialize, Serialize};

use crate::models::metric::Trend;

pub const PROJECTION_UNKNOWN: &str = "Unknown";
pub const PROJECTION_TARGET_REACHED: &str = "Target reached!";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInsights {
    pub weekly_growth: f64,
    pub average_quality: f64,
    pub productivity_trend: Trend,
    pub streak_days: u32,
    /// ISO date, `"Target reached!"` or `"Unknown"`.
    pub projected_completion: String,
}

impl Default for ProgressInsights {
    fn default() -> Self {
        Self {
            weekly_growth: 0.0,
            average_quality: 0.0,
            productivity_trend: Trend::Stable,
            streak_days: 0,
            projected_completion: PROJECTION_UNKNOWN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceScore {
    pub overall: f64,
    pub productivity: f64,
    pub quality: f64,
    pub consistency: f64,
    pub engagement: f64,
}
