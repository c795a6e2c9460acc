//! Engine configuration value object
//!
//! Constructed once by the host process and handed to the engine by
//! reference. Nothing in the domain reads process-wide state; every knob the
//! rules depend on lives here.

use serde::{Deserialize, Serialize};

/// Default XP needed to leave level 1.
pub const DEFAULT_STARTING_THRESHOLD: i32 = 300;

/// All configurable rules engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub abilities: AbilityBounds,
    pub progression: ProgressionConfig,
    pub rulesets: RulesetPolicy,
}

impl EngineConfig {
    /// Reject settings the rules cannot run with: a non-positive starting
    /// threshold, or ability bounds with `min <= soft_max <= max` violated.
    pub fn validate(&self) -> Result<(), crate::RulesError> {
        if self.progression.starting_threshold <= 0 {
            return Err(crate::RulesError::invalid_input(format!(
                "Starting XP threshold must be positive, got {}",
                self.progression.starting_threshold
            )));
        }

        let AbilityBounds { min, max, soft_max } = self.abilities;
        if min > max {
            return Err(crate::RulesError::invalid_input(format!(
                "Ability minimum {} exceeds maximum {}",
                min, max
            )));
        }
        if soft_max < min || soft_max > max {
            return Err(crate::RulesError::invalid_input(format!(
                "Ability soft maximum {} must be between {} and {}",
                soft_max, min, max
            )));
        }

        Ok(())
    }
}

/// Legal and expected ranges for ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityBounds {
    /// Lowest legal score (inclusive)
    pub min: i32,
    /// Highest legal score (inclusive)
    pub max: i32,
    /// Scores above this are legal but produce a warning
    pub soft_max: i32,
}

impl Default for AbilityBounds {
    fn default() -> Self {
        Self {
            min: 1,
            max: 30,
            soft_max: 20,
        }
    }
}

/// Experience and level-up settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// `experience_to_next_level` given to freshly created characters
    pub starting_threshold: i32,
    /// How the threshold moves after a level-up
    pub threshold_policy: ThresholdPolicyKind,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            starting_threshold: DEFAULT_STARTING_THRESHOLD,
            threshold_policy: ThresholdPolicyKind::Static,
        }
    }
}

/// Selects the built-in threshold policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicyKind {
    /// Threshold never advances after a level-up
    #[default]
    Static,
    /// Threshold follows the D&D 5e cumulative XP table
    Table,
}

impl std::fmt::Display for ThresholdPolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for ThresholdPolicyKind {
    type Err = crate::RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "table" | "growing" => Ok(Self::Table),
            other => Err(crate::RulesError::invalid_input(format!(
                "Unknown threshold policy: {}",
                other
            ))),
        }
    }
}

/// Ruleset activation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesetPolicy {
    /// Refuse activation while a `conflicts` neighbor is active
    pub enforce_conflicts_on_activation: bool,
}

impl Default for RulesetPolicy {
    fn default() -> Self {
        Self {
            enforce_conflicts_on_activation: true,
        }
    }
}
