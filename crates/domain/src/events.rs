//! Outcome types returned by engine mutations
//!
//! These communicate what happened when character or ruleset state was
//! modified, allowing callers to react appropriately.

use crate::ruleset::RulesetStatus;

/// Outcome of a level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpOutcome {
    pub from_level: i32,
    pub to_level: i32,
    pub proficiency_bonus: i32,
    /// Threshold after the policy ran (unchanged under the static policy)
    pub experience_to_next_level: i32,
}

/// Outcome of granting experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceOutcome {
    /// XP added, threshold not reached
    Accumulated { total: i32 },
    /// XP added and exactly one level-up fired
    LeveledUp { total: i32, level_up: LevelUpOutcome },
}

impl ExperienceOutcome {
    pub fn leveled_up(&self) -> bool {
        matches!(self, Self::LeveledUp { .. })
    }

    pub fn total(&self) -> i32 {
        match self {
            Self::Accumulated { total } | Self::LeveledUp { total, .. } => *total,
        }
    }
}

/// Outcome of a ruleset status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Changed {
        from: RulesetStatus,
        to: RulesetStatus,
    },
    /// Already in the requested state
    Unchanged { status: RulesetStatus },
}

impl StatusChange {
    pub fn status(&self) -> RulesetStatus {
        match self {
            Self::Changed { to, .. } => *to,
            Self::Unchanged { status } => *status,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}
