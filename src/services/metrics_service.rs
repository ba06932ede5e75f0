use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::metric::{PerformanceMetric, PerformanceMetricUpdate};
use crate::services::progress_store::ProgressStore;

pub struct PerformanceMetricsService {
    store: Arc<ProgressStore>,
}

impl PerformanceMetricsService {
    pub fn new(store: Arc<ProgressStore>) -> Self {
        Self { store }
    }

    /// Upserts by id: known ids are merged field by field, unknown ids appended.
    pub fn update_performance_metrics(
        &self,
        user_id: &str,
        updates: Vec<PerformanceMetricUpdate>,
    ) -> Vec<PerformanceMetric> {
        let now = self.store.now();
        let mut metrics = self.store.read_metrics();
        let mut changed = 0usize;

        for mut update in updates {
            let Some(id) = update.id.take().filter(|id| !id.is_empty()) else {
                warn!(target: "app::progress::metrics", %user_id, "skipping metric update without id");
                continue;
            };

            match metrics.iter_mut().find(|metric| metric.id == id) {
                Some(existing) => update.apply_to(existing, now),
                None => metrics.push(update.into_metric(id, now)),
            }
            changed += 1;
        }

        if changed > 0 {
            self.store.write_metrics(&metrics);
        }
        debug!(target: "app::progress::metrics", %user_id, changed, "performance metrics updated");
        metrics
    }

    /// Full metric collection; not partitioned by user.
    pub fn get_user_performance_metrics(&self, _user_id: &str) -> Vec<PerformanceMetric> {
        self.store.read_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metric::{MetricCategory, MetricPeriod, Trend};
    use crate::utils::clock::{Clock, FixedClock};
    use chrono::{Duration, TimeZone, Utc};

    fn fixture() -> (PerformanceMetricsService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 5, 20, 7, 0, 0).unwrap(),
        ));
        let store = Arc::new(ProgressStore::in_memory(clock.clone()));
        (PerformanceMetricsService::new(store), clock)
    }

    fn update(id: Option<&str>, value: f64) -> PerformanceMetricUpdate {
        PerformanceMetricUpdate {
            id: id.map(str::to_string),
            value: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn unknown_ids_are_appended_with_defaults() {
        let (service, clock) = fixture();
        service.update_performance_metrics("u1", vec![update(Some("weekly-output"), 14.0)]);

        let metrics = service.get_user_performance_metrics("u1");
        assert_eq!(metrics.len(), 1);
        let metric = &metrics[0];
        assert_eq!(metric.name, "weekly-output");
        assert_eq!(metric.value, 14.0);
        assert_eq!(metric.trend, Trend::Stable);
        assert_eq!(metric.category, MetricCategory::Productivity);
        assert_eq!(metric.period, MetricPeriod::Daily);
        assert_eq!(metric.last_updated, clock.now());
    }

    #[test]
    fn known_ids_merge_only_given_fields() {
        let (service, clock) = fixture();
        service.update_performance_metrics(
            "u1",
            vec![PerformanceMetricUpdate {
                id: Some("quality".into()),
                name: Some("Average quality".into()),
                value: Some(71.0),
                unit: Some("%".into()),
                category: Some(MetricCategory::Quality),
                ..Default::default()
            }],
        );

        clock.advance(Duration::minutes(30));
        service.update_performance_metrics(
            "u1",
            vec![PerformanceMetricUpdate {
                id: Some("quality".into()),
                value: Some(78.5),
                trend: Some(Trend::Up),
                ..Default::default()
            }],
        );

        let metrics = service.get_user_performance_metrics("u1");
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "Average quality");
        assert_eq!(metrics[0].unit, "%");
        assert_eq!(metrics[0].value, 78.5);
        assert_eq!(metrics[0].trend, Trend::Up);
        assert_eq!(metrics[0].category, MetricCategory::Quality);
        assert_eq!(metrics[0].last_updated, clock.now());
    }

    #[test]
    fn updates_without_id_are_skipped() {
        let (service, _clock) = fixture();
        let result = service.update_performance_metrics(
            "u1",
            vec![update(None, 3.0), update(Some(""), 4.0), update(Some("kept"), 5.0)],
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "kept");
    }
}
