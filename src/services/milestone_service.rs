use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::models::milestone::{
    Milestone, MilestoneCategory, NewMilestone, NomineeRecord, FIFTY_NOMINEES, FIRST_NOMINEE,
    HUNDRED_NOMINEES, QUALITY_EXPERT, TEN_NOMINEES, WEEKLY_STREAK,
};
use crate::services::achievement_service::AchievementService;
use crate::services::insights_service::InsightsService;
use crate::services::progress_store::ProgressStore;
use crate::services::settings_service::SettingsService;
use crate::services::snapshot_service::SnapshotService;

const QUALITY_EXPERT_TARGET: usize = 10;
const WEEKLY_STREAK_TARGET: u32 = 7;

/// Owns the milestone collection and the incomplete -> complete transition.
pub struct MilestoneService {
    store: Arc<ProgressStore>,
    achievements: Arc<AchievementService>,
    snapshots: Arc<SnapshotService>,
    insights: Arc<InsightsService>,
    settings: Arc<SettingsService>,
}

impl MilestoneService {
    pub fn new(
        store: Arc<ProgressStore>,
        achievements: Arc<AchievementService>,
        snapshots: Arc<SnapshotService>,
        insights: Arc<InsightsService>,
        settings: Arc<SettingsService>,
    ) -> Self {
        Self {
            store,
            achievements,
            snapshots,
            insights,
            settings,
        }
    }

    /// Individual milestones. The collection is shared, so `user_id` does not filter.
    pub fn get_user_milestones(&self, _user_id: &str) -> Vec<Milestone> {
        self.store
            .read_milestones()
            .into_iter()
            .filter(|milestone| milestone.category == MilestoneCategory::Individual)
            .collect()
    }

    pub fn list_milestones(&self) -> Vec<Milestone> {
        self.store.read_milestones()
    }

    pub fn get_milestone(&self, milestone_id: &str) -> Option<Milestone> {
        self.store
            .read_milestones()
            .into_iter()
            .find(|milestone| milestone.id == milestone_id)
    }

    /// Sets `current` on a milestone. Returns `true` only when this call completed it.
    pub fn update_milestone_progress(&self, milestone_id: &str, new_value: f64) -> bool {
        let mut milestones = self.store.read_milestones();
        let Some(milestone) = milestones
            .iter_mut()
            .find(|milestone| milestone.id == milestone_id)
        else {
            debug!(target: "app::progress::milestones", %milestone_id, "unknown milestone, ignoring update");
            return false;
        };

        let now = self.store.now();
        milestone.current = new_value;
        milestone.updated_at = now;

        let completed_now = !milestone.is_completed && new_value >= milestone.target;
        if completed_now {
            milestone.is_completed = true;
            milestone.completed_at = Some(now);
        }
        let title = milestone.title.clone();

        self.store.write_milestones(&milestones);

        if completed_now {
            info!(target: "app::progress::milestones", %milestone_id, "milestone completed");
            self.achievements.unlock_achievement(milestone_id, &title);
        }
        completed_now
    }

    pub fn create_custom_milestone(&self, input: NewMilestone) -> String {
        let now = self.store.now();
        let id = Uuid::new_v4().to_string();

        let milestone = Milestone {
            id: id.clone(),
            title: input.title,
            description: input.description,
            target: input.target,
            current: input.current,
            unit: input.unit,
            category: input.category,
            priority: input.priority,
            deadline: input.deadline,
            reward: input.reward,
            is_completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut milestones = self.store.read_milestones();
        milestones.push(milestone);
        self.store.write_milestones(&milestones);

        info!(target: "app::progress::milestones", milestone_id = %id, "custom milestone created");
        id
    }

    /// Recomputes the built-in milestones from the full nominee list and the current streak.
    /// Returns the ids completed by this call; they are also noted on today's snapshot.
    pub fn update_milestones_from_data(
        &self,
        user_id: &str,
        nominees: &[NomineeRecord],
    ) -> Vec<String> {
        let threshold = self.settings.effective().high_quality_threshold;
        let total = nominees.len();
        let high_quality = nominees
            .iter()
            .filter(|nominee| nominee.score.is_some_and(|score| score >= threshold))
            .count();
        let streak = self.insights.current_streak(user_id);

        let updates = [
            (FIRST_NOMINEE, total.min(1) as f64),
            (TEN_NOMINEES, total.min(10) as f64),
            (FIFTY_NOMINEES, total.min(50) as f64),
            (HUNDRED_NOMINEES, total.min(100) as f64),
            (QUALITY_EXPERT, high_quality.min(QUALITY_EXPERT_TARGET) as f64),
            (WEEKLY_STREAK, f64::from(streak.min(WEEKLY_STREAK_TARGET))),
        ];

        let mut completed = Vec::new();
        for (milestone_id, value) in updates {
            if self.update_milestone_progress(milestone_id, value) {
                self.snapshots.record_milestone_achieved(user_id, milestone_id);
                completed.push(milestone_id.to_string());
            }
        }

        debug!(
            target: "app::progress::milestones",
            %user_id,
            total,
            high_quality,
            streak,
            completed = completed.len(),
            "milestones recomputed from nominee data"
        );
        completed
    }
}
