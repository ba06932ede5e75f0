use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Trend {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "up" => Ok(Trend::Up),
            "down" => Ok(Trend::Down),
            "stable" => Ok(Trend::Stable),
            other => Err(format!("unsupported trend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    #[default]
    Productivity,
    Quality,
    Engagement,
    Completion,
}

impl MetricCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::Productivity => "productivity",
            MetricCategory::Quality => "quality",
            MetricCategory::Engagement => "engagement",
            MetricCategory::Completion => "completion",
        }
    }
}

impl TryFrom<&str> for MetricCategory {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "productivity" => Ok(MetricCategory::Productivity),
            "quality" => Ok(MetricCategory::Quality),
            "engagement" => Ok(MetricCategory::Engagement),
            "completion" => Ok(MetricCategory::Completion),
            other => Err(format!("unsupported metric category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Total,
}

impl MetricPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricPeriod::Daily => "daily",
            MetricPeriod::Weekly => "weekly",
            MetricPeriod::Monthly => "monthly",
            MetricPeriod::Total => "total",
        }
    }
}

impl TryFrom<&str> for MetricPeriod {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "daily" => Ok(MetricPeriod::Daily),
            "weekly" => Ok(MetricPeriod::Weekly),
            "monthly" => Ok(MetricPeriod::Monthly),
            "total" => Ok(MetricPeriod::Total),
            other => Err(format!("unsupported metric period: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetric {
    pub id: String,
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    pub unit: String,
    pub trend: Trend,
    pub trend_percentage: f64,
    pub category: MetricCategory,
    pub period: MetricPeriod,
    pub last_updated: DateTime<Utc>,
}

/// Partial metric used for upserts. Entries without an `id` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetricUpdate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub trend: Option<Trend>,
    #[serde(default)]
    pub trend_percentage: Option<f64>,
    #[serde(default)]
    pub category: Option<MetricCategory>,
    #[serde(default)]
    pub period: Option<MetricPeriod>,
}

impl PerformanceMetricUpdate {
    pub fn apply_to(&self, metric: &mut PerformanceMetric, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            metric.name = name.clone();
        }
        if let Some(value) = self.value {
            metric.value = value;
        }
        if let Some(target) = self.target {
            metric.target = Some(target);
        }
        if let Some(unit) = &self.unit {
            metric.unit = unit.clone();
        }
        if let Some(trend) = self.trend {
            metric.trend = trend;
        }
        if let Some(trend_percentage) = self.trend_percentage {
            metric.trend_percentage = trend_percentage;
        }
        if let Some(category) = self.category {
            metric.category = category;
        }
        if let Some(period) = self.period {
            metric.period = period;
        }
        metric.last_updated = now;
    }

    /// Builds a fresh record; unspecified fields fall back to neutral defaults and the name to the id.
    pub fn into_metric(self, id: String, now: DateTime<Utc>) -> PerformanceMetric {
        PerformanceMetric {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            value: self.value.unwrap_or(0.0),
            target: self.target,
            unit: self.unit.unwrap_or_default(),
            trend: self.trend.unwrap_or_default(),
            trend_percentage: self.trend_percentage.unwrap_or(0.0),
            category: self.category.unwrap_or_default(),
            period: self.period.unwrap_or_default(),
            last_updated: now,
        }
    }
}
