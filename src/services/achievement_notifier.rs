use tokio::sync::broadcast;
use tracing::debug;

use crate::models::achievement::Achievement;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Fan-out of freshly unlocked achievements to any number of listeners (toasts, CLI, tests).
/// Publishing never blocks and never fails; with no subscribers the event is dropped.
#[derive(Debug, Clone)]
pub struct AchievementNotifier {
    sender: broadcast::Sender<Achievement>,
}

impl AchievementNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Achievement> {
        let receiver = self.sender.subscribe();
        debug!(
            target: "app::progress::achievements",
            listeners = self.listener_count(),
            "achievement listener attached"
        );
        receiver
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Returns how many listeners received the event.
    pub fn publish(&self, achievement: &Achievement) -> usize {
        match self.sender.send(achievement.clone()) {
            Ok(delivered) => delivered,
            Err(_) => {
                debug!(
                    target: "app::progress::achievements",
                    achievement_id = %achievement.id,
                    "no listeners for achievement event"
                );
                0
            }
        }
    }
}

impl Default for AchievementNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
