//! Ability scores and the arithmetic derived from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RulesError;

/// Calculate ability modifier from score: floor((score - 10) / 2).
///
/// Rust's `/` rounds toward zero, which would give 0 for a score of 9;
/// `div_euclid` with a positive divisor floors. Out-of-range scores saturate
/// so the validator can still report them.
pub fn ability_modifier(score: i32) -> i32 {
    score.saturating_sub(10).div_euclid(2)
}

/// Calculate proficiency bonus from character level: 2 + floor((level - 1) / 4).
pub fn proficiency_bonus(level: i32) -> i32 {
    2 + level.saturating_sub(1).div_euclid(4)
}

/// One of the six core abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Lowercase full name, as stored by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    /// Three-letter sheet abbreviation.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    /// Capitalized name for messages ("Strength").
    pub fn display_name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ability {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strength" | "str" => Ok(Ability::Strength),
            "dexterity" | "dex" => Ok(Ability::Dexterity),
            "constitution" | "con" => Ok(Ability::Constitution),
            "intelligence" | "int" => Ok(Ability::Intelligence),
            "wisdom" | "wis" => Ok(Ability::Wisdom),
            "charisma" | "cha" => Ok(Ability::Charisma),
            _ => Err(RulesError::invalid_input(format!("Unknown ability: {}", s))),
        }
    }
}

/// The six raw ability scores of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScoreSet {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScoreSet {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl AbilityScoreSet {
    /// Every ability set to `score`.
    pub fn uniform(score: i32) -> Self {
        Self {
            strength: score,
            dexterity: score,
            constitution: score,
            intelligence: score,
            wisdom: score,
            charisma: score,
        }
    }

    /// Scores in sheet order: STR, DEX, CON, INT, WIS, CHA.
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set_score(&mut self, ability: Ability, score: i32) {
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Charisma => self.charisma = score,
        }
    }

    pub fn with_score(mut self, ability: Ability, score: i32) -> Self {
        self.set_score(ability, score);
        self
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }

    /// (ability, score) pairs in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL.iter().map(move |a| (*a, self.score(*a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_modifier_calculation() {
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(12), 1);
        assert_eq!(ability_modifier(20), 5);
        assert_eq!(ability_modifier(30), 10);
    }

    #[test]
    fn ability_modifier_floors_for_every_legal_score() {
        for score in 1..=30 {
            let expected = ((score - 10) as f64 / 2.0).floor() as i32;
            assert_eq!(ability_modifier(score), expected, "score {}", score);
        }
    }

    #[test]
    fn extreme_values_saturate() {
        assert_eq!(ability_modifier(i32::MIN), i32::MIN / 2);
        assert_eq!(ability_modifier(i32::MAX), (i32::MAX - 10) / 2);
        assert_eq!(proficiency_bonus(i32::MIN), 2 + i32::MIN / 4);
    }

    #[test]
    fn proficiency_bonus_progression() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(13), 5);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
    }

    #[test]
    fn proficiency_bonus_is_monotonic() {
        for level in 1..40 {
            assert!(proficiency_bonus(level + 1) >= proficiency_bonus(level));
        }
    }

    #[test]
    fn ability_parses_names_and_abbreviations() {
        assert_eq!("wisdom".parse::<Ability>(), Ok(Ability::Wisdom));
        assert_eq!("WIS".parse::<Ability>(), Ok(Ability::Wisdom));
        assert_eq!(" Charisma ".parse::<Ability>(), Ok(Ability::Charisma));
        assert!("luck".parse::<Ability>().unwrap_err().is_invalid_input());
    }

    #[test]
    fn score_set_accessors_round_trip_each_ability() {
        let mut scores = AbilityScoreSet::default();
        for (i, ability) in Ability::ALL.iter().enumerate() {
            scores.set_score(*ability, 10 + i as i32);
        }
        assert_eq!(scores.strength, 10);
        assert_eq!(scores.charisma, 15);
        assert_eq!(scores.modifier(Ability::Charisma), 2);
        assert_eq!(scores.iter().count(), 6);
    }

    #[test]
    fn ability_serializes_as_lowercase_name() {
        assert_eq!(
            serde_json::to_string(&Ability::Intelligence).unwrap(),
            "\"intelligence\""
        );
    }
}
