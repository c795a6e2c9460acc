//! Engine error types.

use herofoundry_domain::RulesError;
use thiserror::Error;

/// Errors surfaced by the engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rules operation rejected its input or was not applicable.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The underlying rules error, if any.
    pub fn as_rules(&self) -> Option<&RulesError> {
        match self {
            Self::Rules(err) => Some(err),
            Self::Config(_) => None,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        self.as_rules().is_some_and(RulesError::is_invalid_input)
    }

    pub fn is_inapplicable(&self) -> bool {
        self.as_rules().is_some_and(RulesError::is_inapplicable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_errors_convert_and_keep_their_message() {
        let err: EngineError = RulesError::invalid_input("Unknown skill: juggling").into();
        assert!(err.is_invalid_input());
        assert!(!err.is_inapplicable());
        assert_eq!(err.to_string(), "Invalid input: Unknown skill: juggling");
    }

    #[test]
    fn config_errors_are_not_rules_errors() {
        let err = EngineError::config("missing file");
        assert!(err.as_rules().is_none());
        assert_eq!(err.to_string(), "Configuration error: missing file");
    }
}
