use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ACHIEVEMENT_ICON: &str = "🏆";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Milestone,
    Streak,
    Quality,
    Speed,
    Collaboration,
}

impl AchievementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCategory::Milestone => "milestone",
            AchievementCategory::Streak => "streak",
            AchievementCategory::Quality => "quality",
            AchievementCategory::Speed => "speed",
            AchievementCategory::Collaboration => "collaboration",
        }
    }
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AchievementCategory {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "milestone" => Ok(AchievementCategory::Milestone),
            "streak" => Ok(AchievementCategory::Streak),
            "quality" => Ok(AchievementCategory::Quality),
            "speed" => Ok(AchievementCategory::Speed),
            "collaboration" => Ok(AchievementCategory::Collaboration),
            other => Err(format!("unsupported achievement category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AchievementRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl AchievementRarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementRarity::Common => "common",
            AchievementRarity::Rare => "rare",
            AchievementRarity::Epic => "epic",
            AchievementRarity::Legendary => "legendary",
        }
    }
}

impl TryFrom<&str> for AchievementRarity {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "common" => Ok(AchievementRarity::Common),
            "rare" => Ok(AchievementRarity::Rare),
            "epic" => Ok(AchievementRarity::Epic),
            "legendary" => Ok(AchievementRarity::Legendary),
            other => Err(format!("unsupported achievement rarity: {other}")),
        }
    }
}

/// Badge grant. The id is the id of the milestone that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub rarity: AchievementRarity,
    pub unlocked_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_progress: Option<f64>,
}
