//! Ruleset dependency graph
//!
//! Rulesets are stored by id; each record carries its outgoing typed edges.
//! Every query resolves edges through the map, so a dependency that is not
//! loaded is reported rather than silently skipped.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::Ruleset;
use super::types::{DependencyKind, RulesetStatus};
use super::version::{Version, VersionConstraint};
use crate::config::RulesetPolicy;
use crate::events::StatusChange;
use crate::{RulesError, RulesetId};

/// Answers whether a ruleset content path exists.
///
/// Any `Fn(&str) -> bool` is a probe, so tests can pass a closure.
pub trait ContentPathProbe {
    fn exists(&self, path: &str) -> bool;
}

impl<F> ContentPathProbe for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

// =============================================================================
// Compatibility
// =============================================================================

/// Outcome of comparing two compatibility versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionCheck {
    /// At least one side has no compatibility version
    NotApplicable,
    Compatible,
    MajorMismatch,
    /// At least one side could not be parsed
    Unparsable,
}

/// Detailed pairwise compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    /// A `conflicts` edge exists in either direction
    pub conflicts: bool,
    pub same_type: bool,
    /// Informational only; editions never decide compatibility
    pub same_edition: bool,
    pub versions: VersionCheck,
}

impl CompatibilityReport {
    pub fn between(a: &Ruleset, b: &Ruleset) -> Self {
        let versions = match (a.compatibility_version(), b.compatibility_version()) {
            (Some(va), Some(vb)) => match (Version::parse(va), Version::parse(vb)) {
                (Ok(va), Ok(vb)) if va.major() == vb.major() => VersionCheck::Compatible,
                (Ok(_), Ok(_)) => VersionCheck::MajorMismatch,
                _ => VersionCheck::Unparsable,
            },
            _ => VersionCheck::NotApplicable,
        };

        Self {
            conflicts: a.declares_conflict_with(b.id()) || b.declares_conflict_with(a.id()),
            same_type: a.ruleset_type() == b.ruleset_type(),
            same_edition: a.edition() == b.edition(),
            versions,
        }
    }

    pub fn is_compatible(&self) -> bool {
        !self.conflicts
            && self.same_type
            && matches!(
                self.versions,
                VersionCheck::NotApplicable | VersionCheck::Compatible
            )
    }
}

/// Symmetric pairwise compatibility of two rulesets.
pub fn is_compatible(a: &Ruleset, b: &Ruleset) -> bool {
    CompatibilityReport::between(a, b).is_compatible()
}

// =============================================================================
// Graph
// =============================================================================

/// Id-indexed collection of rulesets plus the activation policy.
#[derive(Debug, Clone, Default)]
pub struct RulesetGraph {
    rulesets: HashMap<RulesetId, Ruleset>,
    policy: RulesetPolicy,
}

impl RulesetGraph {
    pub fn new(policy: RulesetPolicy) -> Self {
        Self {
            rulesets: HashMap::new(),
            policy,
        }
    }

    /// Insert or replace a ruleset, returning the previous record.
    pub fn insert(&mut self, ruleset: Ruleset) -> Option<Ruleset> {
        self.rulesets.insert(ruleset.id(), ruleset)
    }

    pub fn remove(&mut self, id: RulesetId) -> Option<Ruleset> {
        self.rulesets.remove(&id)
    }

    pub fn get(&self, id: RulesetId) -> Option<&Ruleset> {
        self.rulesets.get(&id)
    }

    /// Mutable access for bookkeeping; status changes still go through the
    /// transition methods.
    pub fn get_mut(&mut self, id: RulesetId) -> Option<&mut Ruleset> {
        self.rulesets.get_mut(&id)
    }

    pub fn contains(&self, id: RulesetId) -> bool {
        self.rulesets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rulesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rulesets.is_empty()
    }

    pub fn policy(&self) -> RulesetPolicy {
        self.policy
    }

    /// All rulesets ordered by name, then id.
    pub fn rulesets(&self) -> Vec<&Ruleset> {
        let mut all: Vec<&Ruleset> = self.rulesets.values().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        all
    }

    /// Active rulesets ordered by name, then id.
    pub fn active(&self) -> Vec<&Ruleset> {
        self.rulesets()
            .into_iter()
            .filter(|ruleset| ruleset.is_active())
            .collect()
    }

    fn require(&self, id: RulesetId) -> Result<&Ruleset, RulesError> {
        self.rulesets
            .get(&id)
            .ok_or_else(|| RulesError::invalid_input(format!("Ruleset not found: {}", id)))
    }

    // =========================================================================
    // Activation
    // =========================================================================

    /// Every reason `id` cannot be activated right now, in a stable order.
    pub fn activation_blockers(&self, id: RulesetId) -> Result<Vec<String>, RulesError> {
        let ruleset = self.require(id)?;
        let mut blockers = Vec::new();

        if ruleset.status().is_terminal() {
            blockers.push(format!("Ruleset is {}", ruleset.status()));
        }

        for edge in ruleset.edges(DependencyKind::Required) {
            match self.rulesets.get(&edge.target) {
                None => blockers.push(format!("Required dependency not found: {}", edge.target)),
                Some(dep) if !dep.is_active() => blockers.push(format!(
                    "Required dependency is not active: {}",
                    dep.name()
                )),
                Some(_) => {}
            }
        }

        if self.policy.enforce_conflicts_on_activation {
            for other in self.active() {
                if other.id() == id {
                    continue;
                }
                if ruleset.declares_conflict_with(other.id()) || other.declares_conflict_with(id)
                {
                    blockers.push(format!("Conflicts with active ruleset: {}", other.name()));
                }
            }
        }

        Ok(blockers)
    }

    /// True when `id` exists and nothing blocks its activation.
    pub fn can_activate(&self, id: RulesetId) -> bool {
        self.activation_blockers(id)
            .map(|blockers| blockers.is_empty())
            .unwrap_or(false)
    }

    /// Draft to active, if eligible.
    pub fn activate(
        &mut self,
        id: RulesetId,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, RulesError> {
        let status = self.require(id)?.status();
        if status == RulesetStatus::Active {
            return Ok(StatusChange::Unchanged { status });
        }

        let blockers = self.activation_blockers(id)?;
        if !blockers.is_empty() {
            return Err(RulesError::inapplicable(format!(
                "Ruleset cannot be activated: {}",
                blockers.join("; ")
            )));
        }

        self.transition(id, RulesetStatus::Active, now)
    }

    /// Active back to draft.
    pub fn deactivate(
        &mut self,
        id: RulesetId,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, RulesError> {
        let status = self.require(id)?.status();
        match status {
            RulesetStatus::Draft => Ok(StatusChange::Unchanged { status }),
            RulesetStatus::Active => self.transition(id, RulesetStatus::Draft, now),
            RulesetStatus::Deprecated | RulesetStatus::Archived => Err(RulesError::inapplicable(
                format!("Cannot deactivate a {} ruleset", status),
            )),
        }
    }

    /// Draft or active to deprecated.
    pub fn deprecate(
        &mut self,
        id: RulesetId,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, RulesError> {
        let status = self.require(id)?.status();
        match status {
            RulesetStatus::Deprecated => Ok(StatusChange::Unchanged { status }),
            RulesetStatus::Archived => Err(RulesError::inapplicable(
                "Cannot deprecate an archived ruleset",
            )),
            RulesetStatus::Draft | RulesetStatus::Active => {
                self.transition(id, RulesetStatus::Deprecated, now)
            }
        }
    }

    /// Any status to archived.
    pub fn archive(&mut self, id: RulesetId, now: DateTime<Utc>) -> Result<StatusChange, RulesError> {
        let status = self.require(id)?.status();
        if status == RulesetStatus::Archived {
            return Ok(StatusChange::Unchanged { status });
        }
        self.transition(id, RulesetStatus::Archived, now)
    }

    fn transition(
        &mut self,
        id: RulesetId,
        to: RulesetStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, RulesError> {
        let ruleset = self
            .rulesets
            .get_mut(&id)
            .ok_or_else(|| RulesError::invalid_input(format!("Ruleset not found: {}", id)))?;
        let from = ruleset.status();
        ruleset.set_status(to, now);
        Ok(StatusChange::Changed { from, to })
    }

    // =========================================================================
    // Compatibility
    // =========================================================================

    pub fn is_compatible(&self, a: RulesetId, b: RulesetId) -> Result<bool, RulesError> {
        Ok(self.compatibility_report(a, b)?.is_compatible())
    }

    pub fn compatibility_report(
        &self,
        a: RulesetId,
        b: RulesetId,
    ) -> Result<CompatibilityReport, RulesError> {
        Ok(CompatibilityReport::between(self.require(a)?, self.require(b)?))
    }

    /// One message per active ruleset that `id` is incompatible with.
    pub fn compatibility_issues(&self, id: RulesetId) -> Result<Vec<String>, RulesError> {
        let candidate = self.require(id)?;
        let issues = self
            .active()
            .into_iter()
            .filter(|other| other.id() != id)
            .filter_map(|other| {
                let report = CompatibilityReport::between(candidate, other);
                if report.is_compatible() {
                    return None;
                }
                let message = if report.conflicts {
                    format!("Conflicts with active ruleset: {}", other.name())
                } else if !report.same_type {
                    format!(
                        "Ruleset type {} differs from active ruleset: {}",
                        candidate.ruleset_type(),
                        other.name()
                    )
                } else {
                    format!(
                        "Compatibility version {} is incompatible with active ruleset: {}",
                        candidate.compatibility_version().unwrap_or_default(),
                        other.name()
                    )
                };
                Some(message)
            })
            .collect();
        Ok(issues)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Structural problems with `id`: content path, required dependencies and
    /// version constraints on any edge.
    pub fn validation_errors(
        &self,
        id: RulesetId,
        probe: &dyn ContentPathProbe,
    ) -> Result<Vec<String>, RulesError> {
        let ruleset = self.require(id)?;
        let mut errors = Vec::new();

        let path = ruleset.content_path();
        if path.trim().is_empty() {
            errors.push("Content path is required".to_string());
        } else if !probe.exists(path) {
            errors.push(format!("Content path does not exist: {}", path));
        }

        for edge in ruleset.dependencies() {
            let target = self.rulesets.get(&edge.target);

            if edge.kind == DependencyKind::Required {
                match target {
                    None => {
                        errors.push(format!("Required dependency not found: {}", edge.target))
                    }
                    Some(dep) if !dep.is_active() => errors.push(format!(
                        "Required dependency is not active: {}",
                        dep.name()
                    )),
                    Some(_) => {}
                }
            }

            let (Some(raw), Some(dep)) = (edge.version_constraint.as_deref(), target) else {
                continue;
            };
            match VersionConstraint::parse(raw) {
                Err(_) => errors.push(format!(
                    "Invalid version constraint for {}: {}",
                    dep.name(),
                    raw
                )),
                Ok(constraint) if !constraint.matches_str(dep.compatibility_version()) => {
                    errors.push(format!(
                        "Dependency {} version {} does not satisfy {}",
                        dep.name(),
                        dep.compatibility_version().unwrap_or("(none)"),
                        raw.trim()
                    ))
                }
                Ok(_) => {}
            }
        }

        Ok(errors)
    }

    /// True when [`validation_errors`](Self::validation_errors) is empty.
    pub fn is_valid(&self, id: RulesetId, probe: &dyn ContentPathProbe) -> Result<bool, RulesError> {
        Ok(self.validation_errors(id, probe)?.is_empty())
    }
}
