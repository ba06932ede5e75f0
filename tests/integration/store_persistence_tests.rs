use std::sync::Arc;

use awards_progress_lib::db::repositories::collection::{Collection, CollectionRepository};
use awards_progress_lib::db::repositories::memory_repository::InMemoryRepository;
use awards_progress_lib::db::repositories::milestone_repository::MilestoneRepository;
use awards_progress_lib::db::DbPool;
use awards_progress_lib::models::achievement::{
    Achievement, AchievementCategory, AchievementRarity,
};
use awards_progress_lib::models::metric::{
    MetricCategory, MetricPeriod, PerformanceMetric, PerformanceMetricUpdate, Trend,
};
use awards_progress_lib::models::milestone::{
    Milestone, MilestoneCategory, MilestonePriority, NewMilestone, TEN_NOMINEES,
};
use awards_progress_lib::models::snapshot::{ProgressSnapshot, SnapshotMetrics};
use awards_progress_lib::services::progress_store::ProgressStore;
use awards_progress_lib::utils::clock::{Clock, FixedClock};
use awards_progress_lib::ProgressTracker;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use tempfile::tempdir;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 7, 14, 16, 45, 12)
            .single()
            .expect("start")
            + Duration::milliseconds(345),
    ))
}

#[test]
fn sqlite_store_round_trips_every_collection() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("progress.sqlite")).expect("db pool");
    let clock = clock();
    let now = clock.now();
    let store = ProgressStore::sqlite(pool.clone(), clock.clone());

    let mut milestones = Milestone::defaults(now);
    milestones[1].current = 10.0;
    milestones[1].is_completed = true;
    milestones[1].completed_at = Some(now);
    milestones.push(Milestone {
        id: "custom-team".into(),
        title: "Team drive".into(),
        description: "Collect nominations as a team".into(),
        target: 25.5,
        current: 3.25,
        unit: "nominations".into(),
        category: MilestoneCategory::Team,
        priority: MilestonePriority::Critical,
        deadline: Some(now + Duration::days(30)),
        reward: None,
        is_completed: false,
        completed_at: None,
        created_at: now,
        updated_at: now,
    });

    let metrics = vec![
        PerformanceMetric {
            id: "weekly".into(),
            name: "Weekly submissions".into(),
            value: 42.0,
            target: Some(50.0),
            unit: "nominees".into(),
            trend: Trend::Up,
            trend_percentage: 12.5,
            category: MetricCategory::Productivity,
            period: MetricPeriod::Weekly,
            last_updated: now,
        },
        PerformanceMetric {
            id: "approval".into(),
            name: "Approval rate".into(),
            value: 0.73,
            target: None,
            unit: "%".into(),
            trend: Trend::Down,
            trend_percentage: -3.0,
            category: MetricCategory::Completion,
            period: MetricPeriod::Total,
            last_updated: now,
        },
    ];

    let snapshots = vec![
        ProgressSnapshot {
            id: "snap-2".into(),
            user_id: "user-1".into(),
            date: NaiveDate::from_ymd_opt(2025, 7, 14).expect("date"),
            metrics: SnapshotMetrics {
                nominees_submitted: 4,
                nominees_approved: 2,
                quality_score: 88.5,
                completion_rate: 0.5,
                time_spent_minutes: 35,
                active_days: 1,
            },
            milestones_achieved: vec!["first-nominee".into(), "ten-nominees".into()],
            note: Some("good day".into()),
        },
        ProgressSnapshot {
            id: "snap-1".into(),
            user_id: "user-1".into(),
            date: NaiveDate::from_ymd_opt(2025, 7, 13).expect("date"),
            metrics: SnapshotMetrics::default(),
            milestones_achieved: Vec::new(),
            note: None,
        },
    ];

    let achievements = vec![Achievement {
        id: TEN_NOMINEES.into(),
        title: "Ten Nominees".into(),
        description: "Completed milestone: Ten Nominees".into(),
        icon: "🏆".into(),
        category: AchievementCategory::Milestone,
        rarity: AchievementRarity::Common,
        unlocked_at: now,
        progress: Some(10.0),
        max_progress: Some(10.0),
    }];

    store.write_milestones(&milestones);
    store.write_metrics(&metrics);
    store.write_snapshots(&snapshots);
    store.write_achievements(&achievements);

    let reopened = ProgressStore::sqlite(pool, clock);
    assert_eq!(reopened.read_milestones(), milestones);
    assert_eq!(reopened.read_metrics(), metrics);
    assert_eq!(reopened.read_snapshots(), snapshots);
    assert_eq!(reopened.read_achievements(), achievements);
}

#[test]
fn empty_collection_is_not_reseeded() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("progress.sqlite")).expect("db pool");
    let repository = MilestoneRepository::new(pool.clone());

    assert_eq!(repository.load().expect("load"), None);
    repository.replace(&[]).expect("replace");
    assert_eq!(repository.load().expect("load"), Some(Vec::new()));

    let store = ProgressStore::sqlite(pool, clock());
    assert!(store.read_milestones().is_empty());

    store.reset();
    assert_eq!(store.read_milestones().len(), 6);
}

#[test]
fn tracker_state_survives_reopening_the_database() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("nested").join("progress.sqlite");

    let id = {
        let tracker = ProgressTracker::open(&db_path).expect("open tracker");
        tracker.milestones().update_milestone_progress(TEN_NOMINEES, 10.0);
        tracker.metrics().update_performance_metrics(
            "user-1",
            vec![PerformanceMetricUpdate {
                id: Some("weekly".into()),
                value: Some(7.0),
                ..Default::default()
            }],
        );
        tracker.milestones().create_custom_milestone(NewMilestone {
            title: "Board review".into(),
            description: String::new(),
            target: 3.0,
            current: 0.0,
            unit: "reviews".into(),
            category: MilestoneCategory::System,
            priority: MilestonePriority::Low,
            deadline: None,
            reward: Some("Reviewer badge".into()),
        })
    };

    let tracker = ProgressTracker::open(&db_path).expect("reopen tracker");
    let ten = tracker.milestones().get_milestone(TEN_NOMINEES).expect("ten");
    assert!(ten.is_completed);
    assert_eq!(tracker.achievements().get_user_achievements("user-1").len(), 1);
    assert_eq!(tracker.metrics().get_user_performance_metrics("user-1")[0].value, 7.0);

    let custom = tracker.milestones().get_milestone(&id).expect("custom");
    assert_eq!(custom.reward.as_deref(), Some("Reviewer badge"));
    assert_eq!(tracker.milestones().get_user_milestones("user-1").len(), 6);

    tracker.reset();
    assert_eq!(tracker.milestones().list_milestones().len(), 6);
    assert!(tracker.achievements().get_user_achievements("user-1").is_empty());
    assert!(tracker.metrics().get_user_performance_metrics("user-1").is_empty());
}

#[test]
fn storage_faults_never_reach_callers() {
    let clock = clock();
    let milestones = Arc::new(InMemoryRepository::<Milestone>::new(Collection::Milestones));
    let snapshots = Arc::new(InMemoryRepository::<ProgressSnapshot>::new(
        Collection::Snapshots,
    ));
    let store = ProgressStore::new(
        milestones.clone(),
        Arc::new(InMemoryRepository::<PerformanceMetric>::new(Collection::Metrics)),
        snapshots.clone(),
        Arc::new(InMemoryRepository::<Achievement>::new(Collection::Achievements)),
        clock,
    );

    milestones.set_fail_reads(true);
    assert_eq!(store.read_milestones().len(), 6);

    milestones.set_fail_reads(false);
    milestones.set_fail_writes(true);
    store.write_milestones(&[]);
    assert_eq!(milestones.raw_payload(), None);

    snapshots.set_raw_payload("not json at all");
    assert!(store.read_snapshots().is_empty());
}
