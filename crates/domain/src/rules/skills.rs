//! The closed skill list and proficiency-gated bonus tables.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::abilities::{Ability, AbilityScoreSet};
use crate::RulesError;

/// One of the 18 fixed skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    pub const ALL: [Skill; 18] = [
        Skill::Acrobatics,
        Skill::AnimalHandling,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Deception,
        Skill::History,
        Skill::Insight,
        Skill::Intimidation,
        Skill::Investigation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Perception,
        Skill::Performance,
        Skill::Persuasion,
        Skill::Religion,
        Skill::SleightOfHand,
        Skill::Stealth,
        Skill::Survival,
    ];

    /// The ability that governs this skill.
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    /// snake_case key used in stored skill maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "acrobatics",
            Skill::AnimalHandling => "animal_handling",
            Skill::Arcana => "arcana",
            Skill::Athletics => "athletics",
            Skill::Deception => "deception",
            Skill::History => "history",
            Skill::Insight => "insight",
            Skill::Intimidation => "intimidation",
            Skill::Investigation => "investigation",
            Skill::Medicine => "medicine",
            Skill::Nature => "nature",
            Skill::Perception => "perception",
            Skill::Performance => "performance",
            Skill::Persuasion => "persuasion",
            Skill::Religion => "religion",
            Skill::SleightOfHand => "sleight_of_hand",
            Skill::Stealth => "stealth",
            Skill::Survival => "survival",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = RulesError;

    /// Accepts the stored key ("sleight_of_hand") or the sheet label
    /// ("Sleight of Hand"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        Skill::ALL
            .iter()
            .find(|skill| skill.as_str() == key)
            .copied()
            .ok_or_else(|| RulesError::invalid_input(format!("Unknown skill: {}", s)))
    }
}

/// Skill bonus = governing ability modifier + proficiency bonus when proficient.
pub fn skill_bonus(
    scores: &AbilityScoreSet,
    skill: Skill,
    proficient: bool,
    proficiency_bonus: i32,
) -> i32 {
    let modifier = scores.modifier(skill.ability());
    if proficient {
        modifier + proficiency_bonus
    } else {
        modifier
    }
}

/// Saving throw bonus = ability modifier + proficiency bonus when proficient.
pub fn saving_throw_bonus(
    scores: &AbilityScoreSet,
    ability: Ability,
    proficient: bool,
    proficiency_bonus: i32,
) -> i32 {
    let modifier = scores.modifier(ability);
    if proficient {
        modifier + proficiency_bonus
    } else {
        modifier
    }
}

/// Bonus for every skill. Always holds all 18 keys once computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillTable(BTreeMap<Skill, i32>);

impl SkillTable {
    pub fn compute(
        scores: &AbilityScoreSet,
        proficient: &BTreeSet<Skill>,
        proficiency_bonus: i32,
    ) -> Self {
        Self(
            Skill::ALL
                .iter()
                .map(|skill| {
                    let bonus =
                        skill_bonus(scores, *skill, proficient.contains(skill), proficiency_bonus);
                    (*skill, bonus)
                })
                .collect(),
        )
    }

    pub fn get(&self, skill: Skill) -> Option<i32> {
        self.0.get(&skill).copied()
    }

    /// Looks up a skill by name; unknown names are rejected.
    pub fn get_by_name(&self, name: &str) -> Result<i32, RulesError> {
        let skill: Skill = name.parse()?;
        Ok(self.get(skill).unwrap_or(0))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, i32)> + '_ {
        self.0.iter().map(|(s, b)| (*s, *b))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Saving throw bonus for each ability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavingThrowTable(BTreeMap<Ability, i32>);

impl SavingThrowTable {
    pub fn compute(
        scores: &AbilityScoreSet,
        proficient: &BTreeSet<Ability>,
        proficiency_bonus: i32,
    ) -> Self {
        Self(
            Ability::ALL
                .iter()
                .map(|ability| {
                    let bonus = saving_throw_bonus(
                        scores,
                        *ability,
                        proficient.contains(ability),
                        proficiency_bonus,
                    );
                    (*ability, bonus)
                })
                .collect(),
        )
    }

    pub fn get(&self, ability: Ability) -> Option<i32> {
        self.0.get(&ability).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        self.0.iter().map(|(a, b)| (*a, *b))
    }
}
