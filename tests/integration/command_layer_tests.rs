use std::sync::Arc;

use awards_progress_lib::commands::progress::{
    self, MilestoneProgressPayload, NomineeSyncPayload, SnapshotPayload,
};
use awards_progress_lib::models::milestone::{NewMilestone, FIRST_NOMINEE};
use awards_progress_lib::models::settings::{ProgressSettings, ProgressSettingsUpdate};
use awards_progress_lib::utils::clock::FixedClock;
use awards_progress_lib::ProgressTracker;
use chrono::{TimeZone, Utc};
use serde_json::json;

fn tracker() -> ProgressTracker {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 9, 1, 8, 30, 0)
            .single()
            .expect("start"),
    ));
    ProgressTracker::in_memory(clock)
}

fn new_milestone(payload: serde_json::Value) -> NewMilestone {
    serde_json::from_value(payload).expect("valid milestone payload")
}

#[test]
fn unknown_milestone_lookup_reports_not_found() {
    let tracker = tracker();
    let error = progress::milestone_get(&tracker, "does-not-exist").unwrap_err();
    assert_eq!(error.code, "NOT_FOUND");
}

#[test]
fn custom_milestone_payload_is_validated() {
    let tracker = tracker();

    let blank = progress::milestone_create(&tracker, new_milestone(json!({ "title": "  ", "target": 5 })))
        .unwrap_err();
    assert_eq!(blank.code, "VALIDATION_ERROR");
    assert_eq!(blank.details, Some(json!({ "field": "title" })));

    let zero = progress::milestone_create(&tracker, new_milestone(json!({ "title": "Zero", "target": 0 })))
        .unwrap_err();
    assert_eq!(zero.details, Some(json!({ "field": "target" })));

    assert_eq!(progress::milestones_list_all(&tracker).unwrap().len(), 6);
}

#[test]
fn custom_milestone_defaults_and_serialisation() {
    let tracker = tracker();
    let created = progress::milestone_create(
        &tracker,
        new_milestone(json!({
            "title": "Regional push",
            "target": 20,
            "unit": "nominees",
            "reward": "Regional badge"
        })),
    )
    .expect("created");

    let value = serde_json::to_value(&created).expect("serialise");
    assert_eq!(value["category"], "individual");
    assert_eq!(value["priority"], "medium");
    assert_eq!(value["isCompleted"], false);
    assert!(value.get("completedAt").is_none());

    let listed = progress::milestones_list(&tracker, "user-1").unwrap();
    assert_eq!(listed.len(), 7);
}

#[test]
fn progress_update_reports_completion_once() {
    let tracker = tracker();
    let payload = || MilestoneProgressPayload {
        milestone_id: FIRST_NOMINEE.to_string(),
        value: 1.0,
    };

    let partial = progress::milestone_update_progress(
        &tracker,
        MilestoneProgressPayload {
            milestone_id: "ten-nominees".into(),
            value: 4.0,
        },
    )
    .unwrap();
    assert!(!partial.completed_now);
    assert_eq!(partial.progress_percentage, Some(40.0));
    let value = serde_json::to_value(&partial).unwrap();
    assert_eq!(value["progressPercentage"], 40.0);

    let first = progress::milestone_update_progress(&tracker, payload()).unwrap();
    assert!(first.completed_now);
    assert_eq!(first.progress_percentage, Some(100.0));
    assert!(first.milestone.map(|m| m.is_completed).unwrap_or(false));

    let second = progress::milestone_update_progress(&tracker, payload()).unwrap();
    assert!(!second.completed_now);

    let missing = progress::milestone_update_progress(
        &tracker,
        MilestoneProgressPayload {
            milestone_id: "nope".into(),
            value: 3.0,
        },
    )
    .unwrap();
    assert!(!missing.completed_now);
    assert!(missing.milestone.is_none());
    assert!(missing.progress_percentage.is_none());
}

#[test]
fn nominee_payload_accepts_score_aliases() {
    let tracker = tracker();
    let payload: NomineeSyncPayload = serde_json::from_value(json!({
        "userId": "user-1",
        "nominees": [
            { "id": "n1", "score": 91 },
            { "id": "n2", "qualityScore": 95 },
            { "id": "n3", "completionScore": 40 },
            { "id": "n4" }
        ]
    }))
    .expect("payload");

    let completed = progress::milestones_sync_from_nominees(&tracker, payload).unwrap();
    assert_eq!(completed, vec![FIRST_NOMINEE.to_string()]);

    let quality = progress::milestone_get(&tracker, "quality-expert").unwrap();
    assert_eq!(quality.current, 2.0);
    let ten = progress::milestone_get(&tracker, "ten-nominees").unwrap();
    assert_eq!(ten.current, 4.0);
}

#[test]
fn snapshot_and_insight_commands_speak_camel_case() {
    let tracker = tracker();
    let payload: SnapshotPayload = serde_json::from_value(json!({
        "userId": "user-1",
        "metrics": { "nomineesSubmitted": 6, "qualityScore": 82.5 },
        "note": "first entry"
    }))
    .expect("payload");

    let snapshot = progress::snapshot_create(&tracker, payload).unwrap();
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["date"], "2025-09-01");
    assert_eq!(value["metrics"]["nomineesSubmitted"], 6);
    assert_eq!(value["milestonesAchieved"], json!([]));

    let insights = serde_json::to_value(progress::insights_get(&tracker, "user-1").unwrap()).unwrap();
    assert_eq!(insights["streakDays"], 1);
    assert_eq!(insights["productivityTrend"], "up");
    // 6 submitted this week at 6/7 per day leaves 194 -> 227 days
    assert_eq!(insights["projectedCompletion"], "2026-04-16");

    let score = progress::score_get(&tracker, "user-1").unwrap();
    assert_eq!(score.productivity, 60.0);
    assert_eq!(score.quality, 82.5);
}

#[test]
fn settings_commands_validate_and_reset() {
    let tracker = tracker();

    let invalid = progress::settings_update(
        &tracker,
        ProgressSettingsUpdate {
            insight_window_days: Some(0),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(invalid.code, "VALIDATION_ERROR");

    let updated = progress::settings_update(
        &tracker,
        ProgressSettingsUpdate {
            projection_target: Some(12),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.projection_target, 12);
    assert_eq!(progress::settings_get(&tracker).unwrap().projection_target, 12);

    assert_eq!(progress::settings_reset(&tracker).unwrap(), ProgressSettings::default());
}

#[test]
fn metrics_and_reset_commands() {
    let tracker = tracker();
    let updates = serde_json::from_value(json!([
        { "id": "weekly", "value": 12, "trend": "up", "category": "productivity" },
        { "value": 99 }
    ]))
    .expect("updates");

    let metrics = progress::metrics_update(&tracker, "user-1", updates).unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(progress::metrics_get(&tracker, "user-1").unwrap(), metrics);

    progress::milestone_update_progress(
        &tracker,
        MilestoneProgressPayload {
            milestone_id: FIRST_NOMINEE.into(),
            value: 1.0,
        },
    )
    .unwrap();
    assert_eq!(progress::achievements_get(&tracker, "user-1").unwrap().len(), 1);

    progress::progress_reset(&tracker).unwrap();
    assert!(progress::metrics_get(&tracker, "user-1").unwrap().is_empty());
    assert!(progress::achievements_get(&tracker, "user-1").unwrap().is_empty());
    assert!(progress::snapshots_get(&tracker, "user-1", None).unwrap().is_empty());
}
