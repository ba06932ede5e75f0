use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use crate::models::achievement::{
    Achievement, AchievementCategory, AchievementRarity, DEFAULT_ACHIEVEMENT_ICON,
};
use crate::services::achievement_notifier::AchievementNotifier;
use crate::services::progress_store::ProgressStore;

pub struct AchievementService {
    store: Arc<ProgressStore>,
    notifier: AchievementNotifier,
}

impl AchievementService {
    pub fn new(store: Arc<ProgressStore>, notifier: AchievementNotifier) -> Self {
        Self { store, notifier }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Achievement> {
        self.notifier.subscribe()
    }

    /// Grants the achievement once. Returns the new record, or `None` when `id` was already unlocked.
    pub fn unlock_achievement(&self, id: &str, title: &str) -> Option<Achievement> {
        let mut achievements = self.store.read_achievements();
        if achievements.iter().any(|achievement| achievement.id == id) {
            return None;
        }

        let achievement = Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("Completed milestone: {title}"),
            icon: DEFAULT_ACHIEVEMENT_ICON.to_string(),
            category: AchievementCategory::Milestone,
            rarity: AchievementRarity::Common,
            unlocked_at: self.store.now(),
            progress: None,
            max_progress: None,
        };

        achievements.push(achievement.clone());
        self.store.write_achievements(&achievements);

        let delivered = self.notifier.publish(&achievement);
        info!(
            target: "app::progress::achievements",
            achievement_id = %achievement.id,
            delivered,
            "achievement unlocked"
        );

        Some(achievement)
    }

    /// Every stored achievement; the collection is single-tenant so `user_id` is not applied.
    pub fn get_user_achievements(&self, _user_id: &str) -> Vec<Achievement> {
        self.store.read_achievements()
    }
}
