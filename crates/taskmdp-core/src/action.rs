//! Action descriptors and their qualitative tiers

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MdpError;

/// What aspect of the project an action works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Resource,
    Quality,
    Schedule,
    Risk,
    Progress,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 5] = [
        ActionCategory::Resource,
        ActionCategory::Quality,
        ActionCategory::Schedule,
        ActionCategory::Risk,
        ActionCategory::Progress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionCategory::Resource => "resource",
            ActionCategory::Quality => "quality",
            ActionCategory::Schedule => "schedule",
            ActionCategory::Risk => "risk",
            ActionCategory::Progress => "progress",
        }
    }
}

impl FromStr for ActionCategory {
    type Err = MdpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resource" => Ok(ActionCategory::Resource),
            "quality" => Ok(ActionCategory::Quality),
            "schedule" => Ok(ActionCategory::Schedule),
            "risk" => Ok(ActionCategory::Risk),
            "progress" => Ok(ActionCategory::Progress),
            _ => Err(MdpError::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative cost of carrying out an action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Low,
    #[default]
    Medium,
    High,
}

impl CostTier {
    /// Numeric cost subtracted from an action's base reward
    pub fn cost(self) -> f64 {
        match self {
            CostTier::Low => 5.0,
            CostTier::Medium => 10.0,
            CostTier::High => 20.0,
        }
    }
}

/// Qualitative time an action takes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationTier {
    Short,
    #[default]
    Medium,
    Long,
}

/// An action available in every state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub category: ActionCategory,
    #[serde(default)]
    pub cost: CostTier,
    #[serde(default)]
    pub duration: DurationTier,
}

impl ActionDescriptor {
    pub fn new(id: impl Into<String>, category: ActionCategory) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            category,
            cost: CostTier::default(),
            duration: DurationTier::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cost(mut self, cost: CostTier) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_duration(mut self, duration: DurationTier) -> Self {
        self.duration = duration;
        self
    }
}
