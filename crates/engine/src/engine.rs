//! Rules engine facade
//!
//! Wires the pure domain rules to their collaborators (configuration, clock,
//! content probe) and logs every state change. Callers own their characters
//! and hand them in by reference; the facade owns the ruleset graph.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use herofoundry_domain::homebrew::analyze_balance;
use herofoundry_domain::{
    BalanceResult, Character, CompatibilityReport, ContentPathProbe, ContentReport, ContentType,
    DerivedStats, EngineConfig, ExperienceOutcome, HomebrewContent, LevelUpOutcome,
    ProgressionEngine, RulesError, Ruleset, RulesetGraph, RulesetId, RulesetType, StatusChange,
    ThresholdPolicy, ValidationReport,
};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::config::EngineSettings;
use crate::error::EngineError;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::content_probe::FsContentProbe;
use crate::infrastructure::ports::ClockPort;

/// Shared content probe handle.
pub type SharedProbe = Arc<dyn ContentPathProbe + Send + Sync>;

pub struct RulesEngine {
    config: EngineConfig,
    progression: ProgressionEngine,
    rulesets: RulesetGraph,
    probe: SharedProbe,
    clock: Arc<dyn ClockPort>,
}

impl RulesEngine {
    pub fn new(config: EngineConfig, probe: SharedProbe, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            progression: ProgressionEngine::new(&config),
            rulesets: RulesetGraph::new(config.rulesets),
            config,
            probe,
            clock,
        }
    }

    /// Production wiring: filesystem probe rooted at the content root and the
    /// system clock.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        info!(
            content_root = %settings.content_root.display(),
            threshold_policy = %settings.config.progression.threshold_policy,
            "Creating rules engine"
        );
        Self::new(
            settings.config.clone(),
            Arc::new(FsContentProbe::new(settings.content_root.clone())),
            Arc::new(SystemClock::new()),
        )
    }

    /// Replace the configured threshold policy.
    pub fn with_threshold_policy(mut self, policy: impl ThresholdPolicy + 'static) -> Self {
        self.progression = self.progression.with_policy(policy);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Characters
    // =========================================================================

    #[instrument(skip(self))]
    pub fn create_character(&self, name: &str) -> Character {
        let character = self.progression.create_character(name);
        info!(
            character_id = %character.id,
            valid = character.is_valid(),
            "Created character"
        );
        character
    }

    #[instrument(skip(self, character), fields(character_id = %character.id))]
    pub fn derive(&self, character: &Character) -> DerivedStats {
        let derived = character.derive();
        debug!(
            proficiency_bonus = derived.proficiency_bonus,
            armor_class = derived.combat.armor_class,
            initiative_bonus = derived.combat.initiative_bonus,
            "Derived character statistics"
        );
        derived
    }

    #[instrument(skip(self, character), fields(character_id = %character.id))]
    pub fn validate(&self, character: &Character) -> ValidationReport {
        let report = self.progression.validator().validate(character);
        debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validated character"
        );
        report
    }

    #[instrument(skip(self, character), fields(character_id = %character.id))]
    pub fn add_experience(
        &self,
        character: &mut Character,
        xp: i32,
    ) -> Result<ExperienceOutcome, EngineError> {
        let outcome = self
            .progression
            .add_experience(character, xp)
            .inspect_err(|e| warn!(error = %e, "Rejected experience grant"))?;

        match &outcome {
            ExperienceOutcome::LeveledUp { total, level_up } => info!(
                total,
                from_level = level_up.from_level,
                to_level = level_up.to_level,
                "Experience triggered level-up"
            ),
            ExperienceOutcome::Accumulated { total } => debug!(total, "Experience added"),
        }
        Ok(outcome)
    }

    #[instrument(skip(self, character), fields(character_id = %character.id))]
    pub fn level_up(&self, character: &mut Character) -> LevelUpOutcome {
        let outcome = self.progression.level_up(character);
        info!(
            from_level = outcome.from_level,
            to_level = outcome.to_level,
            proficiency_bonus = outcome.proficiency_bonus,
            "Character leveled up"
        );
        outcome
    }

    /// Apply a direct edit, then re-derive and re-validate.
    #[instrument(skip(self, character, edit), fields(character_id = %character.id))]
    pub fn edit<F>(&self, character: &mut Character, edit: F) -> ValidationReport
    where
        F: FnOnce(&mut Character),
    {
        let report = self.progression.edit(character, edit);
        debug!(valid = report.is_valid(), "Applied character edit");
        report
    }

    /// Grant a skill proficiency by name.
    #[instrument(skip(self, character), fields(character_id = %character.id))]
    pub fn add_skill_proficiency(
        &self,
        character: &mut Character,
        skill: &str,
    ) -> Result<ValidationReport, EngineError> {
        let skill = character
            .proficiencies
            .add_skill(skill)
            .inspect_err(|e| warn!(error = %e, "Rejected skill proficiency"))?;
        debug!(skill = skill.as_str(), "Added skill proficiency");
        Ok(self.progression.refresh(character))
    }

    // =========================================================================
    // Rulesets
    // =========================================================================

    /// A draft ruleset stamped with the current time.
    pub fn new_ruleset(
        &self,
        name: &str,
        ruleset_type: RulesetType,
        content_path: &str,
    ) -> Ruleset {
        Ruleset::new(name, ruleset_type, content_path, self.now())
    }

    #[instrument(skip(self, ruleset), fields(ruleset_id = %ruleset.id(), name = ruleset.name()))]
    pub fn register_ruleset(&mut self, ruleset: Ruleset) -> Option<Ruleset> {
        let previous = self.rulesets.insert(ruleset);
        info!(replaced = previous.is_some(), "Registered ruleset");
        previous
    }

    pub fn ruleset(&self, id: RulesetId) -> Option<&Ruleset> {
        self.rulesets.get(id)
    }

    pub fn rulesets(&self) -> &RulesetGraph {
        &self.rulesets
    }

    pub fn can_activate(&self, id: RulesetId) -> bool {
        self.rulesets.can_activate(id)
    }

    #[instrument(skip(self))]
    pub fn activate(&mut self, id: RulesetId) -> Result<StatusChange, EngineError> {
        let now = self.now();
        self.transition("activate", |graph| graph.activate(id, now))
    }

    #[instrument(skip(self))]
    pub fn deactivate(&mut self, id: RulesetId) -> Result<StatusChange, EngineError> {
        let now = self.now();
        self.transition("deactivate", |graph| graph.deactivate(id, now))
    }

    #[instrument(skip(self))]
    pub fn deprecate(&mut self, id: RulesetId) -> Result<StatusChange, EngineError> {
        let now = self.now();
        self.transition("deprecate", |graph| graph.deprecate(id, now))
    }

    #[instrument(skip(self))]
    pub fn archive(&mut self, id: RulesetId) -> Result<StatusChange, EngineError> {
        let now = self.now();
        self.transition("archive", |graph| graph.archive(id, now))
    }

    fn transition<F>(&mut self, action: &str, apply: F) -> Result<StatusChange, EngineError>
    where
        F: FnOnce(&mut RulesetGraph) -> Result<StatusChange, RulesError>,
    {
        match apply(&mut self.rulesets) {
            Ok(change @ StatusChange::Changed { from, to }) => {
                info!(action, %from, %to, "Ruleset status changed");
                Ok(change)
            }
            Ok(change) => {
                debug!(action, status = %change.status(), "Ruleset status unchanged");
                Ok(change)
            }
            Err(e) => {
                warn!(action, error = %e, "Ruleset transition rejected");
                Err(e.into())
            }
        }
    }

    pub fn is_compatible(&self, a: RulesetId, b: RulesetId) -> Result<bool, EngineError> {
        Ok(self.rulesets.is_compatible(a, b)?)
    }

    pub fn compatibility_report(
        &self,
        a: RulesetId,
        b: RulesetId,
    ) -> Result<CompatibilityReport, EngineError> {
        Ok(self.rulesets.compatibility_report(a, b)?)
    }

    pub fn compatibility_issues(&self, id: RulesetId) -> Result<Vec<String>, EngineError> {
        Ok(self.rulesets.compatibility_issues(id)?)
    }

    /// Structural problems, checking content paths with the configured probe.
    #[instrument(skip(self))]
    pub fn ruleset_validation_errors(&self, id: RulesetId) -> Result<Vec<String>, EngineError> {
        let errors = self.rulesets.validation_errors(id, self.probe.as_ref())?;
        if !errors.is_empty() {
            debug!(count = errors.len(), "Ruleset has validation errors");
        }
        Ok(errors)
    }

    /// Add to a ruleset's content count, returning the new count.
    #[instrument(skip(self))]
    pub fn record_ruleset_content(
        &mut self,
        id: RulesetId,
        content_type: &str,
        count: u32,
    ) -> Result<u32, EngineError> {
        let now = self.now();
        let ruleset = self
            .rulesets
            .get_mut(id)
            .ok_or_else(|| RulesError::invalid_input(format!("Ruleset not found: {}", id)))?;
        ruleset.add_content(content_type, count, now);
        let total = ruleset.content_count(content_type);
        debug!(total, "Recorded ruleset content");
        Ok(total)
    }

    // =========================================================================
    // Homebrew
    // =========================================================================

    #[instrument(skip(self, attributes))]
    pub fn score_balance(
        &self,
        content_type: &str,
        attributes: Value,
    ) -> Result<BalanceResult, EngineError> {
        let content = parse_content(content_type, attributes)?;
        let result = analyze_balance(&content.attributes);
        debug!(
            balance_score = result.balance_score,
            total_power = result.power_budget.total,
            recommendations = result.recommendations.len(),
            "Scored homebrew content"
        );
        Ok(result)
    }

    /// Structural review plus balance analysis.
    #[instrument(skip(self, attributes))]
    pub fn review_homebrew(
        &self,
        content_type: &str,
        attributes: Value,
    ) -> Result<ContentReport, EngineError> {
        let content = parse_content(content_type, attributes)?;
        let report = herofoundry_domain::validate_content(&content);
        debug!(
            name = %content.name,
            valid = report.is_valid(),
            balance_score = report.balance.balance_score,
            "Reviewed homebrew content"
        );
        Ok(report)
    }

    pub fn homebrew_template(&self, content_type: &str) -> Result<Map<String, Value>, EngineError> {
        let content_type: ContentType = content_type.parse()?;
        Ok(herofoundry_domain::template(content_type)?)
    }
}

fn parse_content(content_type: &str, attributes: Value) -> Result<HomebrewContent, EngineError> {
    let parsed = content_type
        .parse::<ContentType>()
        .and_then(|content_type| HomebrewContent::from_value(content_type, attributes));
    parsed
        .inspect_err(|e| warn!(error = %e, "Rejected homebrew content"))
        .map_err(EngineError::from)
}
