use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotMetrics {
    pub nominees_submitted: u32,
    pub nominees_approved: u32,
    /// 0-100
    pub quality_score: f64,
    pub completion_rate: f64,
    pub time_spent_minutes: u32,
    pub active_days: u32,
}

/// Daily aggregate; at most one per (user, date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub metrics: SnapshotMetrics,
    #[serde(default)]
    pub milestones_achieved: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
