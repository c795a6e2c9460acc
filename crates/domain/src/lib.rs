//! Character rules engine core.
//!
//! Pure, synchronous rules over caller-supplied data: ability and combat
//! derivation, experience and level-up, character validation, the ruleset
//! dependency graph, and homebrew balance scoring. No I/O, no logging.

pub mod character;
pub mod config;
pub mod error;
pub mod events;
pub mod homebrew;
pub mod ids;
pub mod progression;
pub mod rules;
pub mod ruleset;
pub mod validation;

pub use character::{Character, DerivedStats, HitPoints, Proficiencies};
pub use config::{
    AbilityBounds, EngineConfig, ProgressionConfig, RulesetPolicy, ThresholdPolicyKind,
    DEFAULT_STARTING_THRESHOLD,
};
pub use error::RulesError;
pub use events::{ExperienceOutcome, LevelUpOutcome, StatusChange};
pub use homebrew::{
    score_balance, template, validate_content, BalanceResult, ContentAttributes, ContentReport,
    ContentType, HomebrewContent, PowerBudget,
};
pub use ids::{CharacterId, RulesetId};
pub use progression::{
    ProgressionEngine, StaticThreshold, ThresholdPolicy, XpTableThreshold, XP_THRESHOLDS,
};
pub use rules::{
    ability_modifier, proficiency_bonus, Ability, AbilityScoreSet, CombatProfile,
    SavingThrowTable, Skill, SkillTable,
};
pub use ruleset::{
    is_compatible, CompatibilityReport, ContentPathProbe, DependencyEdge, DependencyKind,
    Ruleset, RulesetGraph, RulesetStatus, RulesetType,
};
pub use validation::{CharacterValidator, ValidationReport};
