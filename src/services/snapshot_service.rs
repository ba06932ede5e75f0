use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::snapshot::{ProgressSnapshot, SnapshotMetrics};
use crate::services::progress_store::ProgressStore;

/// Records one aggregate per user per calendar day and serves history queries.
pub struct SnapshotService {
    store: Arc<ProgressStore>,
}

impl SnapshotService {
    pub fn new(store: Arc<ProgressStore>) -> Self {
        Self { store }
    }

    /// Writes today's snapshot for `user_id`, overwriting an earlier one from the same day.
    pub fn create_progress_snapshot(
        &self,
        user_id: &str,
        metrics: SnapshotMetrics,
        note: Option<String>,
    ) -> ProgressSnapshot {
        let today = self.store.today();
        let mut snapshots = self.store.read_snapshots();

        let existing = snapshots
            .iter()
            .position(|snapshot| snapshot.user_id == user_id && snapshot.date == today);

        let snapshot = match existing {
            Some(index) => {
                let previous = &snapshots[index];
                let replacement = ProgressSnapshot {
                    id: previous.id.clone(),
                    user_id: user_id.to_string(),
                    date: today,
                    metrics,
                    milestones_achieved: previous.milestones_achieved.clone(),
                    note,
                };
                snapshots[index] = replacement.clone();
                debug!(target: "app::progress::snapshots", %user_id, date = %today, "snapshot replaced");
                replacement
            }
            None => {
                let created = ProgressSnapshot {
                    id: Uuid::new_v4().to_string(),
                    user_id: user_id.to_string(),
                    date: today,
                    metrics,
                    milestones_achieved: Vec::new(),
                    note,
                };
                snapshots.push(created.clone());
                debug!(target: "app::progress::snapshots", %user_id, date = %today, "snapshot created");
                created
            }
        };

        self.store.write_snapshots(&snapshots);
        snapshot
    }

    /// Snapshots for `user_id`, newest first; `days` keeps only dates on or after `today - days`.
    /// A window reaching past the earliest representable date keeps everything.
    pub fn get_user_progress_snapshots(
        &self,
        user_id: &str,
        days: Option<u32>,
    ) -> Vec<ProgressSnapshot> {
        let cutoff = days.and_then(|days| self.cutoff(days));

        let mut snapshots: Vec<ProgressSnapshot> = self
            .store
            .read_snapshots()
            .into_iter()
            .filter(|snapshot| snapshot.user_id == user_id)
            .filter(|snapshot| cutoff.map_or(true, |cutoff| snapshot.date >= cutoff))
            .collect();

        snapshots.sort_by(|a, b| b.date.cmp(&a.date));
        snapshots
    }

    /// Records a milestone id against today's snapshot, if one exists.
    pub fn record_milestone_achieved(&self, user_id: &str, milestone_id: &str) {
        let today = self.store.today();
        let mut snapshots = self.store.read_snapshots();

        let Some(snapshot) = snapshots
            .iter_mut()
            .find(|snapshot| snapshot.user_id == user_id && snapshot.date == today)
        else {
            return;
        };

        if snapshot.milestones_achieved.iter().any(|id| id == milestone_id) {
            return;
        }
        snapshot.milestones_achieved.push(milestone_id.to_string());
        self.store.write_snapshots(&snapshots);
    }

    /// Removes this user's snapshots dated before `today - keep_days`. Returns how many were dropped.
    pub fn prune_snapshots(&self, user_id: &str, keep_days: u32) -> usize {
        let Some(cutoff) = self.cutoff(keep_days) else {
            debug!(target: "app::progress::snapshots", %user_id, keep_days, "retention window covers all dates, nothing to prune");
            return 0;
        };
        let mut snapshots = self.store.read_snapshots();
        let before = snapshots.len();

        snapshots.retain(|snapshot| snapshot.user_id != user_id || snapshot.date >= cutoff);

        let removed = before - snapshots.len();
        if removed > 0 {
            self.store.write_snapshots(&snapshots);
            info!(target: "app::progress::snapshots", %user_id, removed, %cutoff, "pruned snapshots");
        }
        removed
    }

    fn cutoff(&self, days: u32) -> Option<NaiveDate> {
        self.store.today().checked_sub_days(Days::new(u64::from(days)))
    }
}
