//! Unified error types for the rules engine
//!
//! Two failure classes exist: malformed or out-of-range arguments, and
//! operations that the current state does not permit. Batch checks (character
//! validation, ruleset validation) never use this type; they return reports
//! listing every violation instead.

use thiserror::Error;

/// Unified error type for rules engine operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// Malformed or out-of-range argument (non-positive XP, unknown skill name, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted in the current state (activating an archived ruleset, ...)
    #[error("Operation not applicable: {0}")]
    Inapplicable(String),
}

impl RulesError {
    /// Creates an invalid input error.
    ///
    /// Use this when an argument can never be accepted regardless of state:
    /// - Experience grants below 1
    /// - Unknown skill, ability, or content type names
    /// - Ruleset ids that are not part of the graph
    ///
    /// # Example
    /// ```ignore
    /// if xp < 1 {
    ///     return Err(RulesError::invalid_input("experience grant must be at least 1"));
    /// }
    /// ```
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates an inapplicable-operation error.
    ///
    /// Use this when the arguments are well formed but the entity's state
    /// forbids the transition, e.g. activating a deprecated ruleset.
    pub fn inapplicable(msg: impl Into<String>) -> Self {
        Self::Inapplicable(msg.into())
    }

    /// Returns true for `InvalidInput`.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns true for `Inapplicable`.
    pub fn is_inapplicable(&self) -> bool {
        matches!(self, Self::Inapplicable(_))
    }
}

impl From<serde_json::Error> for RulesError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let err = RulesError::invalid_input("experience grant must be at least 1");
        assert!(err.is_invalid_input());
        assert!(!err.is_inapplicable());
        assert_eq!(
            err.to_string(),
            "Invalid input: experience grant must be at least 1"
        );
    }

    #[test]
    fn test_inapplicable_error() {
        let err = RulesError::inapplicable("ruleset is archived");
        assert!(err.is_inapplicable());
        assert_eq!(
            err.to_string(),
            "Operation not applicable: ruleset is archived"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("\"three\"").unwrap_err();
        let err: RulesError = json_err.into();
        assert!(err.is_invalid_input());
    }
}
