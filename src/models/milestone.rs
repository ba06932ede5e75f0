use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneCategory {
    Individual,
    Team,
    System,
}

impl MilestoneCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneCategory::Individual => "individual",
            MilestoneCategory::Team => "team",
            MilestoneCategory::System => "system",
        }
    }
}

impl fmt::Display for MilestoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MilestoneCategory {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "individual" => Ok(MilestoneCategory::Individual),
            "team" => Ok(MilestoneCategory::Team),
            "system" => Ok(MilestoneCategory::System),
            other => Err(format!("unsupported milestone category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MilestonePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl MilestonePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestonePriority::Low => "low",
            MilestonePriority::Medium => "medium",
            MilestonePriority::High => "high",
            MilestonePriority::Critical => "critical",
        }
    }
}

impl fmt::Display for MilestonePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MilestonePriority {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low" => Ok(MilestonePriority::Low),
            "medium" => Ok(MilestonePriority::Medium),
            "high" => Ok(MilestonePriority::High),
            "critical" => Ok(MilestonePriority::Critical),
            other => Err(format!("unsupported milestone priority: {other}")),
        }
    }
}

/// A target/current counter pair. Completion is one-way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: f64,
    pub current: f64,
    pub unit: String,
    pub category: MilestoneCategory,
    pub priority: MilestonePriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const FIRST_NOMINEE: &str = "first-nominee";
pub const TEN_NOMINEES: &str = "ten-nominees";
pub const FIFTY_NOMINEES: &str = "fifty-nominees";
pub const HUNDRED_NOMINEES: &str = "hundred-nominees";
pub const QUALITY_EXPERT: &str = "quality-expert";
pub const WEEKLY_STREAK: &str = "weekly-streak";

impl Milestone {
    /// The six milestones every fresh store starts with.
    pub fn defaults(now: DateTime<Utc>) -> Vec<Milestone> {
        let seed = |id: &str,
                    title: &str,
                    description: &str,
                    target: f64,
                    unit: &str,
                    priority: MilestonePriority,
                    reward: &str| Milestone {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            target,
            current: 0.0,
            unit: unit.to_string(),
            category: MilestoneCategory::Individual,
            priority,
            deadline: None,
            reward: Some(reward.to_string()),
            is_completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        vec![
            seed(
                FIRST_NOMINEE,
                "First Nominee",
                "Submit your first nominee",
                1.0,
                "nominee",
                MilestonePriority::Low,
                "Getting Started badge",
            ),
            seed(
                TEN_NOMINEES,
                "Ten Nominees",
                "Submit ten nominees",
                10.0,
                "nominees",
                MilestonePriority::Medium,
                "Rising Advocate badge",
            ),
            seed(
                FIFTY_NOMINEES,
                "Fifty Nominees",
                "Submit fifty nominees",
                50.0,
                "nominees",
                MilestonePriority::High,
                "Champion badge",
            ),
            seed(
                HUNDRED_NOMINEES,
                "Hundred Nominees",
                "Submit one hundred nominees",
                100.0,
                "nominees",
                MilestonePriority::Critical,
                "Legend badge",
            ),
            seed(
                QUALITY_EXPERT,
                "Quality Expert",
                "Submit ten nominees scoring 90 or above",
                10.0,
                "high-quality nominees",
                MilestonePriority::High,
                "Quality Seal",
            ),
            seed(
                WEEKLY_STREAK,
                "Weekly Streak",
                "Submit nominees seven days in a row",
                7.0,
                "days",
                MilestonePriority::Medium,
                "Consistency badge",
            ),
        ]
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.target <= 0.0 {
            return if self.is_completed { 100.0 } else { 0.0 };
        }
        (self.current / self.target * 100.0).clamp(0.0, 100.0)
    }
}

/// Caller-supplied fields for a custom milestone; identity and timestamps are assigned on create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMilestone {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub target: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_category")]
    pub category: MilestoneCategory,
    #[serde(default = "default_priority")]
    pub priority: MilestonePriority,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reward: Option<String>,
}

fn default_category() -> MilestoneCategory {
    MilestoneCategory::Individual
}

fn default_priority() -> MilestonePriority {
    MilestonePriority::Medium
}

/// Upstream nominee record; only the score drives milestone progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NomineeRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "qualityScore", alias = "completionScore")]
    pub score: Option<f64>,
}

impl NomineeRecord {
    pub fn with_score(score: f64) -> Self {
        Self {
            id: None,
            score: Some(score),
        }
    }
}
