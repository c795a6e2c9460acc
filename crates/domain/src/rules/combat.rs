//! Combat numbers derived from ability scores and proficiency.

use serde::{Deserialize, Serialize};

use super::abilities::{Ability, AbilityScoreSet};

/// Unarmored AC baseline.
const BASE_ARMOR_CLASS: i32 = 10;

/// Base of the spell save DC formula.
const SPELL_SAVE_DC_BASE: i32 = 8;

/// Derived combat statistics. Recomputed on every mutation, never edited by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatProfile {
    pub armor_class: i32,
    pub initiative_bonus: i32,
    pub spell_save_dc: i32,
    pub spell_attack_bonus: i32,
}

/// Armor class: 10 + DEX modifier, but a negative DEX modifier never drops
/// AC below 10. This simplified baseline ignores worn armor.
pub fn armor_class(scores: &AbilityScoreSet) -> i32 {
    let dex_mod = scores.modifier(Ability::Dexterity);
    if dex_mod > 0 {
        BASE_ARMOR_CLASS + dex_mod
    } else {
        BASE_ARMOR_CLASS
    }
}

/// Initiative: the raw DEX modifier, negative values included.
pub fn initiative_bonus(scores: &AbilityScoreSet) -> i32 {
    scores.modifier(Ability::Dexterity)
}

/// Spell save DC: 8 + proficiency + casting ability modifier.
pub fn spell_save_dc(scores: &AbilityScoreSet, casting: Ability, proficiency_bonus: i32) -> i32 {
    SPELL_SAVE_DC_BASE + proficiency_bonus + scores.modifier(casting)
}

/// Spell attack bonus: proficiency + casting ability modifier.
pub fn spell_attack_bonus(
    scores: &AbilityScoreSet,
    casting: Ability,
    proficiency_bonus: i32,
) -> i32 {
    proficiency_bonus + scores.modifier(casting)
}

impl CombatProfile {
    /// Compute the full profile. Without a spellcasting ability both spell
    /// fields stay 0.
    pub fn compute(
        scores: &AbilityScoreSet,
        proficiency_bonus: i32,
        spellcasting_ability: Option<Ability>,
    ) -> Self {
        let (spell_save_dc, spell_attack_bonus) = match spellcasting_ability {
            Some(casting) => (
                spell_save_dc(scores, casting, proficiency_bonus),
                spell_attack_bonus(scores, casting, proficiency_bonus),
            ),
            None => (0, 0),
        };

        Self {
            armor_class: armor_class(scores),
            initiative_bonus: initiative_bonus(scores),
            spell_save_dc,
            spell_attack_bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ac_adds_positive_dex_modifier() {
        let scores = AbilityScoreSet::default().with_score(Ability::Dexterity, 16);
        assert_eq!(armor_class(&scores), 13);
    }

    #[test]
    fn ac_never_drops_below_ten_for_low_dex() {
        for dex in 1..=11 {
            let scores = AbilityScoreSet::default().with_score(Ability::Dexterity, dex);
            assert_eq!(armor_class(&scores), 10, "dex {}", dex);
        }
    }

    #[test]
    fn initiative_keeps_negative_dex_modifier() {
        let scores = AbilityScoreSet::default().with_score(Ability::Dexterity, 7);
        assert_eq!(initiative_bonus(&scores), -2);
        // The AC floor does not apply to initiative
        assert_eq!(armor_class(&scores), 10);
    }

    #[test]
    fn spell_save_dc_calculation() {
        let scores = AbilityScoreSet::default().with_score(Ability::Wisdom, 12);
        // DC = 8 + proficiency (3) + WIS mod (1) = 12
        assert_eq!(spell_save_dc(&scores, Ability::Wisdom, 3), 12);
        // DC with INT = 8 + 3 + 0 = 11
        assert_eq!(spell_save_dc(&scores, Ability::Intelligence, 3), 11);
    }

    #[test]
    fn spell_attack_bonus_calculation() {
        let scores = AbilityScoreSet::default().with_score(Ability::Charisma, 18);
        assert_eq!(spell_attack_bonus(&scores, Ability::Charisma, 2), 6);
    }

    #[test]
    fn profile_without_spellcasting_leaves_spell_fields_zero() {
        let scores = AbilityScoreSet::new(10, 14, 10, 18, 10, 10);
        let profile = CombatProfile::compute(&scores, 2, None);
        assert_eq!(profile.armor_class, 12);
        assert_eq!(profile.initiative_bonus, 2);
        assert_eq!(profile.spell_save_dc, 0);
        assert_eq!(profile.spell_attack_bonus, 0);
    }

    #[test]
    fn profile_with_spellcasting() {
        let scores = AbilityScoreSet::new(10, 14, 10, 18, 10, 10);
        let profile = CombatProfile::compute(&scores, 2, Some(Ability::Intelligence));
        assert_eq!(profile.spell_save_dc, 14);
        assert_eq!(profile.spell_attack_bonus, 6);
    }

    #[test]
    fn compute_is_idempotent() {
        let scores = AbilityScoreSet::new(8, 15, 13, 12, 17, 9);
        let first = CombatProfile::compute(&scores, 3, Some(Ability::Wisdom));
        let second = CombatProfile::compute(&scores, 3, Some(Ability::Wisdom));
        assert_eq!(first, second);
    }
}
