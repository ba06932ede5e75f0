use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::services::achievement_notifier::AchievementNotifier;
use crate::services::achievement_service::AchievementService;
use crate::services::insights_service::InsightsService;
use crate::services::metrics_service::PerformanceMetricsService;
use crate::services::milestone_service::MilestoneService;
use crate::services::progress_store::ProgressStore;
use crate::services::settings_service::SettingsService;
use crate::services::snapshot_service::SnapshotService;
use crate::utils::clock::Clock;

/// Wires the progress services over one store, one clock and one notifier.
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<ProgressStore>,
    settings: Arc<SettingsService>,
    achievements: Arc<AchievementService>,
    snapshots: Arc<SnapshotService>,
    insights: Arc<InsightsService>,
    milestones: Arc<MilestoneService>,
    metrics: Arc<PerformanceMetricsService>,
}

impl ProgressTracker {
    /// Opens (or creates) the SQLite file at `db_path` using the system clock.
    pub fn open(db_path: impl AsRef<Path>) -> AppResult<Self> {
        let pool = DbPool::new(db_path.as_ref())?;
        Ok(Self::sqlite(pool, ProgressStore::system_clock()))
    }

    pub fn sqlite(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        let written = pool.written_collections().unwrap_or_else(|err| {
            warn!(target: "app::progress", error = %err, "could not list stored collections");
            Vec::new()
        });
        info!(
            target: "app::progress",
            db_path = %pool.path().display(),
            stored_collections = written.len(),
            "progress tracker ready"
        );
        let store = Arc::new(ProgressStore::sqlite(pool.clone(), clock));
        Self::assemble(store, Arc::new(SettingsService::new(pool)))
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(ProgressStore::in_memory(clock));
        Self::assemble(store, Arc::new(SettingsService::in_memory()))
    }

    fn assemble(store: Arc<ProgressStore>, settings: Arc<SettingsService>) -> Self {
        let achievements = Arc::new(AchievementService::new(
            Arc::clone(&store),
            AchievementNotifier::default(),
        ));
        let snapshots = Arc::new(SnapshotService::new(Arc::clone(&store)));
        let insights = Arc::new(InsightsService::new(
            Arc::clone(&store),
            Arc::clone(&snapshots),
            Arc::clone(&settings),
        ));
        let milestones = Arc::new(MilestoneService::new(
            Arc::clone(&store),
            Arc::clone(&achievements),
            Arc::clone(&snapshots),
            Arc::clone(&insights),
            Arc::clone(&settings),
        ));
        let metrics = Arc::new(PerformanceMetricsService::new(Arc::clone(&store)));

        Self {
            store,
            settings,
            achievements,
            snapshots,
            insights,
            milestones,
            metrics,
        }
    }

    pub fn store(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.store)
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }

    pub fn achievements(&self) -> Arc<AchievementService> {
        Arc::clone(&self.achievements)
    }

    pub fn snapshots(&self) -> Arc<SnapshotService> {
        Arc::clone(&self.snapshots)
    }

    pub fn insights(&self) -> Arc<InsightsService> {
        Arc::clone(&self.insights)
    }

    pub fn milestones(&self) -> Arc<MilestoneService> {
        Arc::clone(&self.milestones)
    }

    pub fn metrics(&self) -> Arc<PerformanceMetricsService> {
        Arc::clone(&self.metrics)
    }

    /// Clears every progress collection. Settings are left as they are.
    pub fn reset(&self) {
        self.store.reset();
        info!(target: "app::progress", "progress data reset");
    }
}
