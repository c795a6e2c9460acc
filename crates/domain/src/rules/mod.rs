//! D&D-style derivation rules.
//!
//! Pure functions from raw ability scores and level to the numbers printed on
//! a character sheet:
//!
//! - `abilities`: ability modifiers and proficiency bonus
//! - `skills`: the fixed skill list, skill and saving throw tables
//! - `combat`: armor class, initiative, spell save DC and attack bonus

mod abilities;
mod combat;
mod skills;

pub use abilities::{ability_modifier, proficiency_bonus, Ability, AbilityScoreSet};
pub use combat::{
    armor_class, initiative_bonus, spell_attack_bonus, spell_save_dc, CombatProfile,
};
pub use skills::{saving_throw_bonus, skill_bonus, SavingThrowTable, Skill, SkillTable};
