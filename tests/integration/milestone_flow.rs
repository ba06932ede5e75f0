use std::sync::Arc;
use std::time::Duration as StdDuration;

use awards_progress_lib::models::milestone::{
    NomineeRecord, FIFTY_NOMINEES, FIRST_NOMINEE, HUNDRED_NOMINEES, QUALITY_EXPERT, TEN_NOMINEES,
    WEEKLY_STREAK,
};
use awards_progress_lib::models::snapshot::SnapshotMetrics;
use awards_progress_lib::utils::clock::FixedClock;
use awards_progress_lib::ProgressTracker;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::broadcast::error::TryRecvError;

fn tracker() -> (ProgressTracker, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .single()
            .expect("start"),
    ));
    (ProgressTracker::in_memory(clock.clone()), clock)
}

fn nominees(high: usize, low: usize) -> Vec<NomineeRecord> {
    std::iter::repeat(NomineeRecord::with_score(95.0))
        .take(high)
        .chain(std::iter::repeat(NomineeRecord::with_score(60.0)).take(low))
        .collect()
}

#[test]
fn ten_nominees_scenario_updates_each_built_in_milestone() {
    let (tracker, _clock) = tracker();
    let milestones = tracker.milestones();

    let completed = milestones.update_milestones_from_data("user-1", &nominees(2, 8));
    assert_eq!(completed, vec![FIRST_NOMINEE, TEN_NOMINEES]);

    let expect = |id: &str, current: f64, done: bool| {
        let milestone = milestones.get_milestone(id).expect("seeded milestone");
        assert_eq!(milestone.current, current, "{id} current");
        assert_eq!(milestone.is_completed, done, "{id} completion");
    };
    expect(FIRST_NOMINEE, 1.0, true);
    expect(TEN_NOMINEES, 10.0, true);
    expect(FIFTY_NOMINEES, 10.0, false);
    expect(HUNDRED_NOMINEES, 10.0, false);
    expect(QUALITY_EXPERT, 2.0, false);
    expect(WEEKLY_STREAK, 0.0, false);

    let achievements = tracker.achievements().get_user_achievements("user-1");
    let ids: Vec<&str> = achievements.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec![FIRST_NOMINEE, TEN_NOMINEES]);
    assert!(achievements
        .iter()
        .all(|a| a.description.starts_with("Completed milestone: ")));
}

#[test]
fn repeated_sync_does_not_unlock_twice() {
    let (tracker, _clock) = tracker();
    let mut receiver = tracker.achievements().subscribe();
    let milestones = tracker.milestones();

    milestones.update_milestones_from_data("user-1", &nominees(0, 1));
    milestones.update_milestones_from_data("user-1", &nominees(0, 1));
    milestones.update_milestones_from_data("user-1", &nominees(0, 3));

    let event = receiver.try_recv().expect("first-nominee event");
    assert_eq!(event.id, FIRST_NOMINEE);
    assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(tracker.achievements().get_user_achievements("user-1").len(), 1);
}

#[test]
fn shrinking_data_never_reopens_a_milestone() {
    let (tracker, _clock) = tracker();
    let milestones = tracker.milestones();

    milestones.update_milestones_from_data("user-1", &nominees(0, 12));
    milestones.update_milestones_from_data("user-1", &nominees(0, 4));

    let ten = milestones.get_milestone(TEN_NOMINEES).expect("ten-nominees");
    assert!(ten.is_completed);
    assert_eq!(ten.current, 4.0);
}

#[test]
fn streak_of_seven_days_completes_weekly_streak() {
    let (tracker, clock) = tracker();
    let snapshots = tracker.snapshots();

    for day in 0..7 {
        if day > 0 {
            clock.advance(Duration::days(1));
        }
        snapshots.create_progress_snapshot(
            "user-1",
            SnapshotMetrics {
                nominees_submitted: 3,
                quality_score: 88.0,
                ..Default::default()
            },
            None,
        );
    }

    let completed = tracker
        .milestones()
        .update_milestones_from_data("user-1", &nominees(1, 2));
    assert!(completed.iter().any(|id| id == WEEKLY_STREAK));

    let today = snapshots.get_user_progress_snapshots("user-1", Some(0));
    assert_eq!(today.len(), 1);
    assert!(today[0]
        .milestones_achieved
        .iter()
        .any(|id| id == WEEKLY_STREAK));
}

#[tokio::test]
async fn listeners_receive_unlocks_asynchronously() {
    let (tracker, _clock) = tracker();
    let mut receiver = tracker.achievements().subscribe();

    let milestones = tracker.milestones();
    let writer = tokio::task::spawn_blocking(move || {
        milestones.update_milestone_progress(FIFTY_NOMINEES, 50.0)
    });

    let event = tokio::time::timeout(StdDuration::from_secs(5), receiver.recv())
        .await
        .expect("event within timeout")
        .expect("channel open");
    assert_eq!(event.id, FIFTY_NOMINEES);
    assert!(writer.await.expect("join"));
}
