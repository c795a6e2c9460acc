//! Character - the engine's view of a player character
//!
//! This is the plain derivation input/output struct. The persistence layer
//! maps its own records into a `Character`, hands it to the engine, and
//! stores what comes back. Raw fields (level, XP, scores, hit points,
//! proficiencies) are public because the storage layer may load values that
//! are out of range; the validator reports them instead of refusing to
//! construct them. Derived fields are only written by [`Character::recompute`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::rules::{
    proficiency_bonus, Ability, AbilityScoreSet, CombatProfile, SavingThrowTable, Skill,
    SkillTable,
};
use crate::validation::ValidationReport;
use crate::{CharacterId, RulesError};

/// Hit point pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub max: i32,
    pub current: i32,
    pub temporary: i32,
}

impl HitPoints {
    pub fn new(current: i32, max: i32) -> Self {
        Self {
            max,
            current,
            temporary: 0,
        }
    }
}

/// Everything a character is proficient in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiencies {
    pub saving_throws: BTreeSet<Ability>,
    pub skills: BTreeSet<Skill>,
    pub weapons: BTreeSet<String>,
    pub armor: BTreeSet<String>,
}

impl Proficiencies {
    /// Add a skill proficiency by name; unknown skill names are rejected.
    pub fn add_skill(&mut self, name: &str) -> Result<Skill, RulesError> {
        let skill: Skill = name.parse()?;
        self.skills.insert(skill);
        Ok(skill)
    }

    /// Add a saving throw proficiency by ability name.
    pub fn add_saving_throw(&mut self, name: &str) -> Result<Ability, RulesError> {
        let ability: Ability = name.parse()?;
        self.saving_throws.insert(ability);
        Ok(ability)
    }

    pub fn is_proficient_in_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    pub fn is_proficient_in_saving_throw(&self, ability: Ability) -> bool {
        self.saving_throws.contains(&ability)
    }
}

/// Everything the engine derives from raw character data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub proficiency_bonus: i32,
    pub skills: SkillTable,
    pub saving_throws: SavingThrowTable,
    pub combat: CombatProfile,
}

/// A player character as seen by the rules engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    // Identity
    pub id: CharacterId,
    pub name: String,

    // Progression
    pub level: i32,
    pub experience_points: i32,
    pub experience_to_next_level: i32,

    // Raw attributes
    pub abilities: AbilityScoreSet,
    pub hit_points: HitPoints,
    pub proficiencies: Proficiencies,
    pub spellcasting_ability: Option<Ability>,

    // Derived (overwritten by recompute)
    proficiency_bonus: i32,
    skills: SkillTable,
    saving_throws: SavingThrowTable,
    combat: CombatProfile,

    // Validation state (overwritten by record_validation)
    is_valid: bool,
    validation_errors: Vec<String>,
}

impl Character {
    /// Create a level 1 character with all scores at 10 and zero XP.
    ///
    /// Derived fields are computed immediately; validation state starts as
    /// valid with no errors until the validator runs.
    pub fn new(name: impl Into<String>, experience_to_next_level: i32) -> Self {
        let mut character = Self {
            id: CharacterId::new(),
            name: name.into(),
            level: 1,
            experience_points: 0,
            experience_to_next_level,
            abilities: AbilityScoreSet::default(),
            hit_points: HitPoints::default(),
            proficiencies: Proficiencies::default(),
            spellcasting_ability: None,
            proficiency_bonus: 0,
            skills: SkillTable::default(),
            saving_throws: SavingThrowTable::default(),
            combat: CombatProfile::default(),
            is_valid: true,
            validation_errors: Vec::new(),
        };
        character.recompute();
        character
    }

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_abilities(mut self, abilities: AbilityScoreSet) -> Self {
        self.abilities = abilities;
        self.recompute();
        self
    }

    pub fn with_hit_points(mut self, hit_points: HitPoints) -> Self {
        self.hit_points = hit_points;
        self
    }

    pub fn with_proficiencies(mut self, proficiencies: Proficiencies) -> Self {
        self.proficiencies = proficiencies;
        self.recompute();
        self
    }

    pub fn with_spellcasting_ability(mut self, ability: Ability) -> Self {
        self.spellcasting_ability = Some(ability);
        self.recompute();
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self.recompute();
        self
    }

    pub fn with_experience(mut self, experience_points: i32) -> Self {
        self.experience_points = experience_points;
        self
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Compute derived statistics without touching `self`.
    pub fn derive(&self) -> DerivedStats {
        let prof = proficiency_bonus(self.level);
        DerivedStats {
            proficiency_bonus: prof,
            skills: SkillTable::compute(&self.abilities, &self.proficiencies.skills, prof),
            saving_throws: SavingThrowTable::compute(
                &self.abilities,
                &self.proficiencies.saving_throws,
                prof,
            ),
            combat: CombatProfile::compute(&self.abilities, prof, self.spellcasting_ability),
        }
    }

    /// Overwrite every derived field from the current raw data.
    pub fn recompute(&mut self) {
        let derived = self.derive();
        self.proficiency_bonus = derived.proficiency_bonus;
        self.skills = derived.skills;
        self.saving_throws = derived.saving_throws;
        self.combat = derived.combat;
    }

    /// Store the outcome of a validation run.
    pub fn record_validation(&mut self, report: &ValidationReport) {
        self.is_valid = report.is_valid();
        self.validation_errors = report.errors.clone();
    }

    // =========================================================================
    // Derived Accessors (read-only)
    // =========================================================================

    #[inline]
    pub fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    #[inline]
    pub fn skills(&self) -> &SkillTable {
        &self.skills
    }

    #[inline]
    pub fn saving_throws(&self) -> &SavingThrowTable {
        &self.saving_throws
    }

    #[inline]
    pub fn combat(&self) -> &CombatProfile {
        &self.combat
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[inline]
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    /// Skill bonus by name; unknown names are rejected.
    pub fn skill_modifier(&self, name: &str) -> Result<i32, RulesError> {
        self.skills.get_by_name(name)
    }

    pub fn saving_throw_modifier(&self, ability: Ability) -> i32 {
        self.saving_throws
            .get(ability)
            .unwrap_or_else(|| self.ability_modifier(ability))
    }
}
