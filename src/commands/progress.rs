use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::achievement::Achievement;
use crate::models::insights::{PerformanceScore, ProgressInsights};
use crate::models::metric::{PerformanceMetric, PerformanceMetricUpdate};
use crate::models::milestone::{Milestone, NewMilestone, NomineeRecord};
use crate::models::settings::{ProgressSettings, ProgressSettingsUpdate};
use crate::models::snapshot::{ProgressSnapshot, SnapshotMetrics};
use crate::tracker::ProgressTracker;

use super::CommandResult;

const MAX_TITLE_LENGTH: usize = 120;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneProgressPayload {
    pub milestone_id: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneProgressResult {
    pub completed_now: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NomineeSyncPayload {
    pub user_id: String,
    #[serde(default)]
    pub nominees: Vec<NomineeRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    pub user_id: String,
    pub metrics: SnapshotMetrics,
    #[serde(default)]
    pub note: Option<String>,
}

pub fn milestones_list(tracker: &ProgressTracker, user_id: &str) -> CommandResult<Vec<Milestone>> {
    Ok(tracker.milestones().get_user_milestones(user_id))
}

pub fn milestones_list_all(tracker: &ProgressTracker) -> CommandResult<Vec<Milestone>> {
    Ok(tracker.milestones().list_milestones())
}

pub fn milestone_get(tracker: &ProgressTracker, milestone_id: &str) -> CommandResult<Milestone> {
    tracker
        .milestones()
        .get_milestone(milestone_id)
        .ok_or_else(|| AppError::not_found().into())
}

pub fn milestone_update_progress(
    tracker: &ProgressTracker,
    payload: MilestoneProgressPayload,
) -> CommandResult<MilestoneProgressResult> {
    if !payload.value.is_finite() {
        return Err(AppError::validation("value must be a finite number").into());
    }

    let milestones = tracker.milestones();
    let completed_now = milestones.update_milestone_progress(&payload.milestone_id, payload.value);
    let milestone = milestones.get_milestone(&payload.milestone_id);
    Ok(MilestoneProgressResult {
        completed_now,
        progress_percentage: milestone.as_ref().map(|m| m.progress_percentage()),
        milestone,
    })
}

pub fn milestone_create(
    tracker: &ProgressTracker,
    payload: NewMilestone,
) -> CommandResult<Milestone> {
    validate_new_milestone(&payload)?;

    let milestones = tracker.milestones();
    let id = milestones.create_custom_milestone(payload);
    milestones
        .get_milestone(&id)
        .ok_or_else(|| AppError::storage("progress_milestones", "created milestone was not persisted").into())
}

pub fn milestones_sync_from_nominees(
    tracker: &ProgressTracker,
    payload: NomineeSyncPayload,
) -> CommandResult<Vec<String>> {
    Ok(tracker
        .milestones()
        .update_milestones_from_data(&payload.user_id, &payload.nominees))
}

pub fn metrics_update(
    tracker: &ProgressTracker,
    user_id: &str,
    updates: Vec<PerformanceMetricUpdate>,
) -> CommandResult<Vec<PerformanceMetric>> {
    Ok(tracker.metrics().update_performance_metrics(user_id, updates))
}

pub fn metrics_get(tracker: &ProgressTracker, user_id: &str) -> CommandResult<Vec<PerformanceMetric>> {
    Ok(tracker.metrics().get_user_performance_metrics(user_id))
}

pub fn snapshot_create(
    tracker: &ProgressTracker,
    payload: SnapshotPayload,
) -> CommandResult<ProgressSnapshot> {
    if !payload.metrics.quality_score.is_finite() || !payload.metrics.completion_rate.is_finite() {
        return Err(AppError::validation("snapshot scores must be finite numbers").into());
    }
    Ok(tracker
        .snapshots()
        .create_progress_snapshot(&payload.user_id, payload.metrics, payload.note))
}

pub fn snapshots_get(
    tracker: &ProgressTracker,
    user_id: &str,
    days: Option<u32>,
) -> CommandResult<Vec<ProgressSnapshot>> {
    Ok(tracker.snapshots().get_user_progress_snapshots(user_id, days))
}

pub fn snapshots_prune(
    tracker: &ProgressTracker,
    user_id: &str,
    keep_days: u32,
) -> CommandResult<usize> {
    Ok(tracker.snapshots().prune_snapshots(user_id, keep_days))
}

pub fn achievements_get(tracker: &ProgressTracker, user_id: &str) -> CommandResult<Vec<Achievement>> {
    Ok(tracker.achievements().get_user_achievements(user_id))
}

pub fn insights_get(tracker: &ProgressTracker, user_id: &str) -> CommandResult<ProgressInsights> {
    Ok(tracker.insights().calculate_progress_insights(user_id))
}

pub fn score_get(tracker: &ProgressTracker, user_id: &str) -> CommandResult<PerformanceScore> {
    Ok(tracker.insights().calculate_performance_score(user_id))
}

pub fn settings_get(tracker: &ProgressTracker) -> CommandResult<ProgressSettings> {
    tracker.settings().get().map_err(Into::into)
}

pub fn settings_update(
    tracker: &ProgressTracker,
    payload: ProgressSettingsUpdate,
) -> CommandResult<ProgressSettings> {
    tracker.settings().update(payload).map_err(Into::into)
}

pub fn settings_reset(tracker: &ProgressTracker) -> CommandResult<ProgressSettings> {
    tracker.settings().reset().map_err(Into::into)
}

pub fn progress_reset(tracker: &ProgressTracker) -> CommandResult<()> {
    tracker.reset();
    Ok(())
}

fn validate_new_milestone(payload: &NewMilestone) -> Result<(), AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::validation_with_details(
            "title must not be empty",
            serde_json::json!({ "field": "title" }),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation_with_details(
            format!("title must be at most {MAX_TITLE_LENGTH} characters"),
            serde_json::json!({ "field": "title" }),
        ));
    }
    if !payload.target.is_finite() || payload.target <= 0.0 {
        return Err(AppError::validation_with_details(
            "target must be a positive number",
            serde_json::json!({ "field": "target" }),
        ));
    }
    if !payload.current.is_finite() || payload.current < 0.0 {
        return Err(AppError::validation_with_details(
            "current must not be negative",
            serde_json::json!({ "field": "current" }),
        ));
    }
    Ok(())
}
