use std::sync::Arc;

use chrono::Days;
use tracing::debug;

use crate::models::insights::{
    PerformanceScore, ProgressInsights, PROJECTION_TARGET_REACHED, PROJECTION_UNKNOWN,
};
use crate::models::metric::Trend;
use crate::models::snapshot::ProgressSnapshot;
use crate::services::progress_store::ProgressStore;
use crate::services::settings_service::SettingsService;
use crate::services::snapshot_service::SnapshotService;

const WEEK_DAYS: usize = 7;
const TREND_UP_RATIO: f64 = 1.1;
const TREND_DOWN_RATIO: f64 = 0.9;

const PRODUCTIVITY_WEIGHT: f64 = 0.3;
const QUALITY_WEIGHT: f64 = 0.3;
const CONSISTENCY_WEIGHT: f64 = 0.2;
const ENGAGEMENT_WEIGHT: f64 = 0.2;

/// Derives display-ready aggregates from the snapshot history (and milestones for the score).
pub struct InsightsService {
    store: Arc<ProgressStore>,
    snapshots: Arc<SnapshotService>,
    settings: Arc<SettingsService>,
}

impl InsightsService {
    pub fn new(
        store: Arc<ProgressStore>,
        snapshots: Arc<SnapshotService>,
        settings: Arc<SettingsService>,
    ) -> Self {
        Self {
            store,
            snapshots,
            settings,
        }
    }

    pub fn calculate_progress_insights(&self, user_id: &str) -> ProgressInsights {
        let settings = self.settings.effective();
        let history = self
            .snapshots
            .get_user_progress_snapshots(user_id, Some(settings.insight_window_days));

        if history.is_empty() {
            return ProgressInsights::default();
        }

        let this_week = submitted_in(&history, 0);
        let last_week = submitted_in(&history, WEEK_DAYS);

        let weekly_growth = if last_week == 0 {
            0.0
        } else {
            (this_week as f64 - last_week as f64) / last_week as f64 * 100.0
        };

        let recent_average = this_week as f64 / WEEK_DAYS as f64;
        let prior_average = last_week as f64 / WEEK_DAYS as f64;
        let productivity_trend = if recent_average > prior_average * TREND_UP_RATIO {
            Trend::Up
        } else if recent_average < prior_average * TREND_DOWN_RATIO {
            Trend::Down
        } else {
            Trend::Stable
        };

        let total_submitted: u64 = history
            .iter()
            .map(|snapshot| u64::from(snapshot.metrics.nominees_submitted))
            .sum();
        let remaining = f64::from(settings.projection_target) - total_submitted as f64;
        let projected_completion = if recent_average <= 0.0 || remaining <= 0.0 {
            PROJECTION_TARGET_REACHED.to_string()
        } else {
            // float-to-int casts saturate, so an absurd target lands in the None arm
            let days_needed = (remaining / recent_average).ceil() as u64;
            match self.store.today().checked_add_days(Days::new(days_needed)) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => {
                    debug!(target: "app::progress::insights", %user_id, days_needed, "projection beyond the calendar");
                    PROJECTION_UNKNOWN.to_string()
                }
            }
        };

        let insights = ProgressInsights {
            weekly_growth,
            average_quality: average_quality(&history),
            productivity_trend,
            streak_days: streak(&history),
            projected_completion,
        };

        debug!(
            target: "app::progress::insights",
            %user_id,
            snapshots = history.len(),
            streak = insights.streak_days,
            "calculated progress insights"
        );
        insights
    }

    pub fn calculate_performance_score(&self, user_id: &str) -> PerformanceScore {
        let settings = self.settings.effective();
        let history = self
            .snapshots
            .get_user_progress_snapshots(user_id, Some(settings.insight_window_days));

        if history.is_empty() {
            return PerformanceScore::default();
        }

        let total_submitted: f64 = history
            .iter()
            .map(|snapshot| f64::from(snapshot.metrics.nominees_submitted))
            .sum();
        let average_daily = total_submitted / history.len() as f64;
        let productivity =
            clamp_score(average_daily / settings.full_productivity_daily_rate * 100.0);

        let quality = clamp_score(average_quality(&history));

        let active_days = history
            .iter()
            .filter(|snapshot| snapshot.metrics.nominees_submitted > 0)
            .count();
        let consistency = clamp_score(
            active_days as f64 / f64::from(settings.consistency_window_days) * 100.0,
        );

        let milestones = self.store.read_milestones();
        let engagement = if milestones.is_empty() {
            0.0
        } else {
            let completed = milestones.iter().filter(|m| m.is_completed).count();
            clamp_score(completed as f64 / milestones.len() as f64 * 100.0)
        };

        let overall = (productivity * PRODUCTIVITY_WEIGHT
            + quality * QUALITY_WEIGHT
            + consistency * CONSISTENCY_WEIGHT
            + engagement * ENGAGEMENT_WEIGHT)
            .round();

        PerformanceScore {
            overall,
            productivity,
            quality,
            consistency,
            engagement,
        }
    }

    /// Consecutive active days ending at the most recent snapshot.
    pub fn current_streak(&self, user_id: &str) -> u32 {
        let window = self.settings.effective().insight_window_days;
        streak(&self.snapshots.get_user_progress_snapshots(user_id, Some(window)))
    }
}

/// Sum of submissions over the week starting at `offset` in newest-first history.
fn submitted_in(history: &[ProgressSnapshot], offset: usize) -> u64 {
    history
        .iter()
        .skip(offset)
        .take(WEEK_DAYS)
        .map(|snapshot| u64::from(snapshot.metrics.nominees_submitted))
        .sum()
}

fn average_quality(history: &[ProgressSnapshot]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    history
        .iter()
        .map(|snapshot| snapshot.metrics.quality_score)
        .sum::<f64>()
        / history.len() as f64
}

fn streak(history: &[ProgressSnapshot]) -> u32 {
    history
        .iter()
        .take_while(|snapshot| snapshot.metrics.nominees_submitted > 0)
        .count() as u32
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
