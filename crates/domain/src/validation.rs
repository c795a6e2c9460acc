//! Character validation
//!
//! Runs a fixed sequence of checks and reports every violation at once.
//! Re-running on unchanged data reproduces the same lists in the same order.

use serde::{Deserialize, Serialize};

use crate::config::AbilityBounds;
use crate::Character;

/// Errors and warnings collected by a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valid when there are no errors; warnings never count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Checks raw character data against the configured bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterValidator {
    bounds: AbilityBounds,
}

impl CharacterValidator {
    pub fn new(bounds: AbilityBounds) -> Self {
        Self { bounds }
    }

    /// Inspect `character` without mutating it.
    pub fn validate(&self, character: &Character) -> ValidationReport {
        let mut report = ValidationReport::new();

        if character.level < 1 {
            report.error("Character level must be at least 1");
        }

        if character.experience_points < 0 {
            report.error("Experience points cannot be negative");
        }

        for (ability, score) in character.abilities.iter() {
            if score < self.bounds.min || score > self.bounds.max {
                report.error(format!(
                    "{} score must be between {} and {}",
                    ability.display_name(),
                    self.bounds.min,
                    self.bounds.max
                ));
            } else if score > self.bounds.soft_max {
                report.warning(format!(
                    "{} score of {} exceeds the normal maximum of {}",
                    ability.display_name(),
                    score,
                    self.bounds.soft_max
                ));
            }
        }

        if character.hit_points.current > character.hit_points.max {
            report.error("Current hit points cannot exceed maximum hit points");
        }

        if character.hit_points.temporary < 0 {
            report.error("Temporary hit points cannot be negative");
        }

        if character.name.trim().is_empty() {
            report.error("Character name is required");
        }

        report
    }
}
