use std::sync::Arc;

use awards_progress_lib::models::insights::{PROJECTION_TARGET_REACHED, PROJECTION_UNKNOWN};
use awards_progress_lib::models::metric::Trend;
use awards_progress_lib::models::settings::ProgressSettingsUpdate;
use awards_progress_lib::models::snapshot::SnapshotMetrics;
use awards_progress_lib::utils::clock::FixedClock;
use awards_progress_lib::ProgressTracker;
use chrono::{Duration, NaiveDate, TimeZone, Utc};

fn tracker() -> (ProgressTracker, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("start"),
    ));
    (ProgressTracker::in_memory(clock.clone()), clock)
}

fn submitted(count: u32, quality: f64) -> SnapshotMetrics {
    SnapshotMetrics {
        nominees_submitted: count,
        nominees_approved: count / 2,
        quality_score: quality,
        completion_rate: 0.8,
        time_spent_minutes: 45,
        active_days: u32::from(count > 0),
    }
}

#[test]
fn ten_days_of_history_filtered_to_last_week() {
    let (tracker, clock) = tracker();
    let snapshots = tracker.snapshots();

    for day in 0..10u32 {
        if day > 0 {
            clock.advance(Duration::days(1));
        }
        snapshots.create_progress_snapshot("user-1", submitted(day + 1, 80.0), None);
    }
    snapshots.create_progress_snapshot("user-2", submitted(1, 80.0), None);

    let last_week = snapshots.get_user_progress_snapshots("user-1", Some(7));
    // 2025-01-10 back to 2025-01-03 inclusive
    assert_eq!(last_week.len(), 8);
    assert_eq!(
        last_week.first().map(|s| s.date),
        NaiveDate::from_ymd_opt(2025, 1, 10)
    );
    assert_eq!(
        last_week.last().map(|s| s.date),
        NaiveDate::from_ymd_opt(2025, 1, 3)
    );
    assert!(last_week.windows(2).all(|pair| pair[0].date > pair[1].date));
    assert!(last_week.iter().all(|s| s.user_id == "user-1"));

    assert_eq!(snapshots.get_user_progress_snapshots("user-1", None).len(), 10);
}

#[test]
fn same_day_snapshot_is_overwritten() {
    let (tracker, clock) = tracker();
    let snapshots = tracker.snapshots();

    snapshots.create_progress_snapshot("user-1", submitted(2, 70.0), None);
    clock.advance(Duration::hours(6));
    snapshots.create_progress_snapshot("user-1", submitted(9, 91.0), Some("evening".into()));

    let stored = snapshots.get_user_progress_snapshots("user-1", None);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].metrics.nominees_submitted, 9);
    assert_eq!(stored[0].note.as_deref(), Some("evening"));
}

#[test]
fn empty_history_gives_default_insights_and_zero_score() {
    let (tracker, _clock) = tracker();
    let insights = tracker.insights().calculate_progress_insights("nobody");

    assert_eq!(insights.weekly_growth, 0.0);
    assert_eq!(insights.average_quality, 0.0);
    assert_eq!(insights.productivity_trend, Trend::Stable);
    assert_eq!(insights.streak_days, 0);
    assert_eq!(insights.projected_completion, PROJECTION_UNKNOWN);

    let score = tracker.insights().calculate_performance_score("nobody");
    assert_eq!(score.overall, 0.0);
    assert_eq!(score.productivity, 0.0);
    assert_eq!(score.engagement, 0.0);
}

#[test]
fn outsized_submissions_clamp_productivity() {
    let (tracker, clock) = tracker();
    let snapshots = tracker.snapshots();
    for day in 0..3 {
        if day > 0 {
            clock.advance(Duration::days(1));
        }
        snapshots.create_progress_snapshot("user-1", submitted(500, 95.0), None);
    }

    let score = tracker.insights().calculate_performance_score("user-1");
    assert_eq!(score.productivity, 100.0);
    assert_eq!(score.quality, 95.0);
    for value in [
        score.overall,
        score.productivity,
        score.quality,
        score.consistency,
        score.engagement,
    ] {
        assert!((0.0..=100.0).contains(&value));
    }

    let insights = tracker.insights().calculate_progress_insights("user-1");
    assert_eq!(insights.projected_completion, PROJECTION_TARGET_REACHED);
    assert_eq!(insights.streak_days, 3);
}

#[test]
fn insight_window_follows_settings() {
    let (tracker, clock) = tracker();
    let snapshots = tracker.snapshots();
    for day in 0..20 {
        if day > 0 {
            clock.advance(Duration::days(1));
        }
        snapshots.create_progress_snapshot("user-1", submitted(1, 50.0), None);
    }

    let before = tracker.insights().calculate_performance_score("user-1");
    assert!((before.consistency - 20.0 / 30.0 * 100.0).abs() < 1e-9);

    tracker
        .settings()
        .update(ProgressSettingsUpdate {
            insight_window_days: Some(4),
            consistency_window_days: Some(5),
            ..Default::default()
        })
        .expect("update settings");

    // five snapshots fall within today - 4 days, all of them active
    let after = tracker.insights().calculate_performance_score("user-1");
    assert_eq!(after.consistency, 100.0);
    assert_eq!(tracker.insights().current_streak("user-1"), 5);
}

#[test]
fn pruning_removes_snapshots_outside_the_window() {
    let (tracker, clock) = tracker();
    let snapshots = tracker.snapshots();
    for day in 0..12 {
        if day > 0 {
            clock.advance(Duration::days(1));
        }
        snapshots.create_progress_snapshot("user-1", submitted(2, 75.0), None);
    }

    let removed = snapshots.prune_snapshots("user-1", 5);
    assert_eq!(removed, 6);
    assert_eq!(snapshots.get_user_progress_snapshots("user-1", None).len(), 6);
}
