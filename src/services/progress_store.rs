use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::db::repositories::achievement_repository::AchievementRepository;
use crate::db::repositories::collection::{Collection, CollectionRepository};
use crate::db::repositories::memory_repository::InMemoryRepository;
use crate::db::repositories::metric_repository::PerformanceMetricRepository;
use crate::db::repositories::milestone_repository::MilestoneRepository;
use crate::db::repositories::snapshot_repository::ProgressSnapshotRepository;
use crate::db::DbPool;
use crate::models::achievement::Achievement;
use crate::models::metric::PerformanceMetric;
use crate::models::milestone::Milestone;
use crate::models::snapshot::ProgressSnapshot;
use crate::utils::clock::{Clock, SystemClock};

/// Best-effort adapter over the four progress collections.
///
/// Reads fall back to the collection default (seed milestones, otherwise empty) when the
/// collection is missing or unreadable; write failures are logged and dropped. Nothing here
/// returns an error to the caller.
pub struct ProgressStore {
    milestones: Arc<dyn CollectionRepository<Milestone>>,
    metrics: Arc<dyn CollectionRepository<PerformanceMetric>>,
    snapshots: Arc<dyn CollectionRepository<ProgressSnapshot>>,
    achievements: Arc<dyn CollectionRepository<Achievement>>,
    clock: Arc<dyn Clock>,
}

impl ProgressStore {
    pub fn new(
        milestones: Arc<dyn CollectionRepository<Milestone>>,
        metrics: Arc<dyn CollectionRepository<PerformanceMetric>>,
        snapshots: Arc<dyn CollectionRepository<ProgressSnapshot>>,
        achievements: Arc<dyn CollectionRepository<Achievement>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            milestones,
            metrics,
            snapshots,
            achievements,
            clock,
        }
    }

    pub fn sqlite(db: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(MilestoneRepository::new(db.clone())),
            Arc::new(PerformanceMetricRepository::new(db.clone())),
            Arc::new(ProgressSnapshotRepository::new(db.clone())),
            Arc::new(AchievementRepository::new(db)),
            clock,
        )
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(InMemoryRepository::<Milestone>::new(Collection::Milestones)),
            Arc::new(InMemoryRepository::<PerformanceMetric>::new(Collection::Metrics)),
            Arc::new(InMemoryRepository::<ProgressSnapshot>::new(Collection::Snapshots)),
            Arc::new(InMemoryRepository::<Achievement>::new(Collection::Achievements)),
            clock,
        )
    }

    pub fn system_clock() -> Arc<dyn Clock> {
        Arc::new(SystemClock)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn read_milestones(&self) -> Vec<Milestone> {
        read_collection(self.milestones.as_ref(), || Milestone::defaults(self.now()))
    }

    pub fn write_milestones(&self, records: &[Milestone]) {
        write_collection(self.milestones.as_ref(), records);
    }

    pub fn read_metrics(&self) -> Vec<PerformanceMetric> {
        read_collection(self.metrics.as_ref(), Vec::new)
    }

    pub fn write_metrics(&self, records: &[PerformanceMetric]) {
        write_collection(self.metrics.as_ref(), records);
    }

    pub fn read_snapshots(&self) -> Vec<ProgressSnapshot> {
        read_collection(self.snapshots.as_ref(), Vec::new)
    }

    pub fn write_snapshots(&self, records: &[ProgressSnapshot]) {
        write_collection(self.snapshots.as_ref(), records);
    }

    pub fn read_achievements(&self) -> Vec<Achievement> {
        read_collection(self.achievements.as_ref(), Vec::new)
    }

    pub fn write_achievements(&self, records: &[Achievement]) {
        write_collection(self.achievements.as_ref(), records);
    }

    /// Drops every collection; milestones come back as seeds on the next read.
    pub fn reset(&self) {
        clear_collection(self.milestones.as_ref());
        clear_collection(self.metrics.as_ref());
        clear_collection(self.snapshots.as_ref());
        clear_collection(self.achievements.as_ref());
    }
}

fn read_collection<T>(
    repository: &dyn CollectionRepository<T>,
    default: impl FnOnce() -> Vec<T>,
) -> Vec<T> {
    let collection = repository.collection();
    match repository.load() {
        Ok(Some(records)) => records,
        Ok(None) => {
            debug!(target: "app::progress::store", %collection, "collection absent, using default");
            default()
        }
        Err(err) => {
            warn!(
                target: "app::progress::store",
                %collection,
                error = %err,
                "failed to read collection, using default"
            );
            default()
        }
    }
}

fn write_collection<T>(repository: &dyn CollectionRepository<T>, records: &[T]) {
    let collection = repository.collection();
    match repository.replace(records) {
        Ok(()) => {
            debug!(target: "app::progress::store", %collection, count = records.len(), "collection written");
        }
        Err(err) => {
            warn!(
                target: "app::progress::store",
                %collection,
                error = %err,
                "failed to write collection, change kept in memory only"
            );
        }
    }
}

fn clear_collection<T>(repository: &dyn CollectionRepository<T>) {
    let collection = repository.collection();
    if let Err(err) = repository.clear() {
        warn!(target: "app::progress::store", %collection, error = %err, "failed to clear collection");
    }
}
