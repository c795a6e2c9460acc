//! Dotted numeric versions and dependency constraints.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::RulesError;

/// A dotted numeric version such as `5.1` or `1.0.2`.
///
/// Missing trailing components compare as zero, so `5.1 == 5.1.0`.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
}

impl Version {
    pub fn parse(s: &str) -> Result<Self, RulesError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RulesError::invalid_input("Version is empty"));
        }
        let parts = trimmed
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| RulesError::invalid_input(format!("Invalid version: {}", s)))?;
        Ok(Self { parts })
    }

    pub fn major(&self) -> u64 {
        self.parts.first().copied().unwrap_or(0)
    }

    fn part(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.part(i).cmp(&other.part(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .parts
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

impl FromStr for Version {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Two compatibility versions are compatible when their major components
/// match. Anything unparsable is incompatible.
pub fn versions_compatible(a: &str, b: &str) -> bool {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(a), Ok(b)) => a.major() == b.major(),
        _ => false,
    }
}

/// Constraint on a dependency's compatibility version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// `*`
    Any,
    /// `=1.2` or bare `1.2`
    Exact(Version),
    /// `>=1.2`
    AtLeast(Version),
    /// `^1.2`: same major, at least the given version
    Caret(Version),
}

impl VersionConstraint {
    pub fn parse(s: &str) -> Result<Self, RulesError> {
        let trimmed = s.trim();
        if trimmed == "*" {
            return Ok(Self::Any);
        }
        let constraint = if let Some(rest) = trimmed.strip_prefix(">=") {
            Self::AtLeast(Version::parse(rest)?)
        } else if let Some(rest) = trimmed.strip_prefix('^') {
            Self::Caret(Version::parse(rest)?)
        } else if let Some(rest) = trimmed.strip_prefix('=') {
            Self::Exact(Version::parse(rest)?)
        } else {
            Self::Exact(Version::parse(trimmed)?)
        };
        Ok(constraint)
    }

    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(wanted) => version == wanted,
            Self::AtLeast(min) => version >= min,
            Self::Caret(min) => version.major() == min.major() && version >= min,
        }
    }

    /// Check an optional version string. Only `*` accepts a missing or
    /// unparsable version.
    pub fn matches_str(&self, version: Option<&str>) -> bool {
        if matches!(self, Self::Any) {
            return true;
        }
        version
            .and_then(|v| Version::parse(v).ok())
            .is_some_and(|v| self.matches(&v))
    }
}

impl FromStr for VersionConstraint {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
