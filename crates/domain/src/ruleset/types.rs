use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RulesError, RulesetId};

/// Game system a ruleset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RulesetType {
    #[serde(rename = "dnd_5e")]
    Dnd5e,
    #[serde(rename = "dnd_2024")]
    Dnd2024,
    #[serde(rename = "dnd_3_5")]
    Dnd35,
    #[serde(rename = "pathfinder_1e")]
    Pathfinder1e,
    #[serde(rename = "pathfinder_2e")]
    Pathfinder2e,
    #[serde(rename = "homebrew")]
    Homebrew,
    #[serde(rename = "custom")]
    Custom,
}

impl RulesetType {
    pub const ALL: [RulesetType; 7] = [
        RulesetType::Dnd5e,
        RulesetType::Dnd2024,
        RulesetType::Dnd35,
        RulesetType::Pathfinder1e,
        RulesetType::Pathfinder2e,
        RulesetType::Homebrew,
        RulesetType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dnd5e => "dnd_5e",
            Self::Dnd2024 => "dnd_2024",
            Self::Dnd35 => "dnd_3_5",
            Self::Pathfinder1e => "pathfinder_1e",
            Self::Pathfinder2e => "pathfinder_2e",
            Self::Homebrew => "homebrew",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RulesetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RulesetType {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| RulesError::invalid_input(format!("Unknown ruleset type: {}", s)))
    }
}

/// Lifecycle status of a ruleset.
///
/// `Deprecated` and `Archived` are terminal: a ruleset in either can never be
/// activated again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetStatus {
    #[default]
    Draft,
    Active,
    Deprecated,
    Archived,
}

impl RulesetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Deprecated => "deprecated",
            Self::Archived => "archived",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deprecated | Self::Archived)
    }
}

impl fmt::Display for RulesetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RulesetStatus {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "deprecated" => Ok(Self::Deprecated),
            "archived" => Ok(Self::Archived),
            _ => Err(RulesError::invalid_input(format!(
                "Unknown ruleset status: {}",
                s
            ))),
        }
    }
}

/// How a ruleset relates to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Must be active before this ruleset can activate
    Required,
    /// Informational; never blocks anything
    Optional,
    /// Cannot be used alongside this ruleset
    Conflicts,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Conflicts => "conflicts",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyKind {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            "conflicts" => Ok(Self::Conflicts),
            _ => Err(RulesError::invalid_input(format!(
                "Unknown dependency type: {}",
                s
            ))),
        }
    }
}

/// Outgoing edge from one ruleset to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub target: RulesetId,
    pub kind: DependencyKind,
    /// Constraint on the target's compatibility version, e.g. `^5.1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_constraint: Option<String>,
}

impl DependencyEdge {
    pub fn new(target: RulesetId, kind: DependencyKind) -> Self {
        Self {
            target,
            kind,
            version_constraint: None,
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.version_constraint = Some(constraint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruleset_type_strings_round_trip() {
        for ruleset_type in RulesetType::ALL {
            let parsed: RulesetType = ruleset_type.as_str().parse().unwrap();
            assert_eq!(parsed, ruleset_type);

            let json = serde_json::to_string(&ruleset_type).unwrap();
            assert_eq!(json, format!("\"{}\"", ruleset_type.as_str()));
        }
    }

    #[test]
    fn unknown_ruleset_type_is_rejected() {
        let err = "dnd_4e".parse::<RulesetType>().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!RulesetStatus::Draft.is_terminal());
        assert!(!RulesetStatus::Active.is_terminal());
        assert!(RulesetStatus::Deprecated.is_terminal());
        assert!(RulesetStatus::Archived.is_terminal());
    }

    #[test]
    fn dependency_edge_serializes_kind_in_snake_case() {
        let edge = DependencyEdge::new(RulesetId::new(), DependencyKind::Conflicts)
            .with_constraint(">=1.0");
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["kind"], "conflicts");
        assert_eq!(value["version_constraint"], ">=1.0");
    }
}
