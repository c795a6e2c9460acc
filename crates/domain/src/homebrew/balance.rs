//! Balance heuristics and power budgets for homebrew content.
//!
//! Scoring never rejects content: a balance score in [0, 1] plus a power
//! budget with an expected band, and a recommendation when the budget falls
//! outside that band.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::{
    ClassAttributes, ContentAttributes, ContentType, HomebrewContent, ItemAttributes,
    RaceAttributes, Rarity, SpellAttributes,
};
use crate::RulesError;

/// Neutral starting score before any adjustment.
pub const BASE_BALANCE_SCORE: f64 = 0.5;

/// Power contributed by each factor, and their sum. Not clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerBudget {
    pub total: f64,
    pub breakdown: BTreeMap<String, f64>,
}

impl PowerBudget {
    fn from_factors<const N: usize>(factors: [(&str, f64); N]) -> Self {
        let breakdown: BTreeMap<String, f64> = factors
            .into_iter()
            .map(|(name, power)| (name.to_string(), power))
            .collect();
        Self {
            total: breakdown.values().sum(),
            breakdown,
        }
    }

    pub fn factor(&self, name: &str) -> f64 {
        self.breakdown.get(name).copied().unwrap_or(0.0)
    }
}

/// Expected power range for one piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerBand {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub balance_score: f64,
    pub power_budget: PowerBudget,
    pub recommendations: Vec<String>,
}

// =============================================================================
// Entry points
// =============================================================================

/// Score an attribute bag of the named content type.
pub fn score_balance(
    content_type: &str,
    attributes: Map<String, Value>,
) -> Result<BalanceResult, RulesError> {
    let content_type: ContentType = content_type.parse()?;
    let content = HomebrewContent::from_attributes(content_type, attributes)?;
    Ok(analyze_balance(&content.attributes))
}

pub fn analyze_balance(attributes: &ContentAttributes) -> BalanceResult {
    let power_budget = power_budget(attributes);
    let band = power_band(attributes);

    let mut recommendations = Vec::new();
    if power_budget.total > band.max {
        recommendations.push(over_budget_advice(attributes.content_type()).to_string());
    } else if power_budget.total < band.min {
        recommendations.push(under_budget_advice(attributes.content_type()).to_string());
    }

    BalanceResult {
        balance_score: balance_score(attributes),
        power_budget,
        recommendations,
    }
}

/// Heuristic score clamped to [0, 1]; 0.5 is neutral.
pub fn balance_score(attributes: &ContentAttributes) -> f64 {
    let adjustment = match attributes {
        ContentAttributes::Race(race) => race_adjustment(race),
        ContentAttributes::Class(class) => class_adjustment(class),
        ContentAttributes::Spell(spell) => spell_adjustment(spell),
        ContentAttributes::Item(item) => item_adjustment(item),
    };
    (BASE_BALANCE_SCORE + adjustment).clamp(0.0, 1.0)
}

pub fn power_budget(attributes: &ContentAttributes) -> PowerBudget {
    match attributes {
        ContentAttributes::Race(race) => PowerBudget::from_factors([
            ("ability_scores", race.total_ability_increase() as f64 * 0.5),
            ("traits", race.traits.len() as f64 * 0.3),
            ("subraces", race.subraces.len() as f64 * 0.4),
            // Languages carry no weight but stay in the breakdown
            ("languages", 0.0),
        ]),
        ContentAttributes::Class(class) => PowerBudget::from_factors([
            ("hit_die", hit_die_power(&class.hit_die)),
            ("proficiencies", class.martial_proficiency_count() as f64 * 0.2),
            ("features", class.features.len() as f64 * 0.3),
            ("spellcasting", if class.spellcasting { 1.0 } else { 0.0 }),
        ]),
        ContentAttributes::Spell(spell) => PowerBudget::from_factors([
            ("level", spell.level as f64 * 0.5),
            ("components", spell.components.len() as f64 * 0.1),
            ("range", range_power(&spell.range)),
            ("duration", duration_power(&spell.duration)),
        ]),
        ContentAttributes::Item(item) => PowerBudget::from_factors([
            ("rarity", rarity_power(&item.rarity)),
            ("properties", item.properties.len() as f64 * 0.2),
            ("magical", if item.magical { 0.5 } else { 0.0 }),
            ("attunement", if item.attunement { -0.3 } else { 0.0 }),
        ]),
    }
}

pub fn power_band(attributes: &ContentAttributes) -> PowerBand {
    match attributes {
        ContentAttributes::Race(_) => PowerBand { min: 1.5, max: 3.0 },
        ContentAttributes::Class(_) => PowerBand { min: 2.0, max: 4.0 },
        ContentAttributes::Spell(spell) => {
            let level = spell.level as f64;
            PowerBand {
                min: level * 0.5,
                max: level + 1.0,
            }
        }
        ContentAttributes::Item(item) => {
            let expected = expected_rarity_power(&item.rarity);
            PowerBand {
                min: expected - 0.5,
                max: expected + 0.5,
            }
        }
    }
}

// =============================================================================
// Per-type heuristics
// =============================================================================

fn race_adjustment(race: &RaceAttributes) -> f64 {
    let total = race.total_ability_increase();
    let increases = if total <= 2 {
        0.2
    } else if total <= 3 {
        0.1
    } else {
        -0.2
    };

    let trait_count = race.traits.len();
    let traits = if trait_count <= 3 {
        0.1
    } else if trait_count > 5 {
        -0.2
    } else {
        0.0
    };

    increases + traits
}

fn class_adjustment(class: &ClassAttributes) -> f64 {
    let hit_die = match class.hit_die.as_str() {
        "d12" => 0.1,
        "d6" => -0.1,
        _ => 0.0,
    };

    let count = class.martial_proficiency_count();
    let proficiencies = if count <= 4 {
        0.1
    } else if count > 8 {
        -0.2
    } else {
        0.0
    };

    hit_die + proficiencies
}

fn spell_adjustment(spell: &SpellAttributes) -> f64 {
    let level = if spell.level <= 3 {
        0.1
    } else if spell.level >= 7 {
        -0.1
    } else {
        0.0
    };

    // Verbal plus somatic is the standard pairing
    let components = if spell.has_component("V") && spell.has_component("S") {
        0.1
    } else {
        0.0
    };

    level + components
}

fn item_adjustment(item: &ItemAttributes) -> f64 {
    let rarity = match item.rarity {
        Rarity::Common => 0.1,
        Rarity::Uncommon => 0.0,
        Rarity::Rare => -0.1,
        Rarity::VeryRare => -0.2,
        Rarity::Legendary => -0.3,
        Rarity::Other(_) => 0.0,
    };
    let magical = if item.magical { -0.1 } else { 0.0 };
    rarity + magical
}

fn hit_die_power(hit_die: &str) -> f64 {
    match hit_die {
        "d6" => 0.5,
        "d8" => 1.0,
        "d10" => 1.5,
        "d12" => 2.0,
        _ => 1.0,
    }
}

fn range_power(range: &str) -> f64 {
    let range = range.to_lowercase();
    if range.contains("self") {
        0.5
    } else if range.contains("touch") {
        0.3
    } else if range.contains("60 feet") || range.contains("30 feet") {
        0.1
    } else {
        0.0
    }
}

fn duration_power(duration: &str) -> f64 {
    let duration = duration.to_lowercase();
    if duration.contains("concentration") {
        0.2
    } else if duration.contains("1 hour") || duration.contains("8 hours") {
        0.3
    } else {
        0.0
    }
}

fn rarity_power(rarity: &Rarity) -> f64 {
    match rarity {
        Rarity::Common => 0.5,
        Rarity::Uncommon => 1.0,
        Rarity::Rare => 1.5,
        Rarity::VeryRare => 2.0,
        Rarity::Legendary => 2.5,
        Rarity::Other(_) => 0.5,
    }
}

/// Unrecognised rarities are judged against uncommon.
fn expected_rarity_power(rarity: &Rarity) -> f64 {
    match rarity {
        Rarity::Other(_) => 1.0,
        known => rarity_power(known),
    }
}

fn over_budget_advice(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Race => "Consider reducing ability score increases or traits",
        ContentType::Class => "Consider reducing proficiencies or features",
        ContentType::Spell => "Consider reducing spell power to match level",
        ContentType::Item => "Consider reducing properties to match rarity",
    }
}

fn under_budget_advice(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Race => "Consider adding more traits or subraces",
        ContentType::Class => "Consider adding more features or proficiencies",
        ContentType::Spell => "Consider increasing spell power to match level",
        ContentType::Item => "Consider adding properties to match rarity",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test bag must be an object"),
        }
    }

    fn score(content_type: &str, value: Value) -> BalanceResult {
        score_balance(content_type, bag(value)).unwrap()
    }

    mod race {
        use super::*;

        #[test]
        fn modest_race_scores_high_and_is_under_budget() {
            let result = score(
                "race",
                json!({"ability_score_increases": {"strength": 2}, "traits": ["Darkvision"]}),
            );
            assert_close(result.balance_score, 0.8);
            assert_close(result.power_budget.factor("ability_scores"), 1.0);
            assert_close(result.power_budget.factor("traits"), 0.3);
            assert_close(result.power_budget.total, 1.3);
            assert_eq!(
                result.recommendations,
                vec!["Consider adding more traits or subraces"]
            );
        }

        #[test]
        fn generous_race_is_penalised_and_over_budget() {
            let result = score(
                "race",
                json!({
                    "ability_score_increases": {"strength": 2, "constitution": 2, "wisdom": 1},
                    "traits": ["a", "b", "c", "d", "e", "f"],
                    "subraces": ["x"]
                }),
            );
            assert_close(result.balance_score, 0.1);
            assert_close(result.power_budget.total, 2.5 + 1.8 + 0.4);
            assert_eq!(
                result.recommendations,
                vec!["Consider reducing ability score increases or traits"]
            );
        }

        #[test]
        fn race_inside_band_gets_no_recommendation() {
            let result = score(
                "race",
                json!({
                    "ability_score_increases": {"dexterity": 2, "charisma": 1},
                    "traits": ["a", "b", "c", "d"]
                }),
            );
            // Four traits is neither few nor many
            assert_close(result.balance_score, 0.6);
            assert!(result.recommendations.is_empty());
        }

        #[test]
        fn breakdown_lists_languages_with_no_weight() {
            let result = score("race", json!({"languages": ["common", "elvish"]}));
            assert!(result.power_budget.breakdown.contains_key("languages"));
            assert_close(result.power_budget.factor("languages"), 0.0);
            assert_eq!(result.power_budget.breakdown.len(), 4);
        }

        #[test]
        fn huge_increases_saturate_instead_of_overflowing() {
            let result = score(
                "race",
                json!({"ability_score_increases": {"strength": i32::MAX, "dexterity": i32::MAX}}),
            );
            assert!((0.0..=1.0).contains(&result.balance_score));
            // -0.2 for the increases, +0.1 for having no traits
            assert_close(result.balance_score, 0.4);
            assert_close(
                result.power_budget.factor("ability_scores"),
                i32::MAX as f64 * 0.5
            );
            assert_eq!(
                result.recommendations,
                vec!["Consider reducing ability score increases or traits"]
            );
        }
    }

    mod class {
        use super::*;

        #[test]
        fn hardy_class_with_few_proficiencies() {
            let result = score(
                "class",
                json!({
                    "hit_die": "d12",
                    "armor_proficiencies": ["light", "medium"],
                    "weapon_proficiencies": ["simple"],
                    "features": ["Rage", "Unarmored Defense"]
                }),
            );
            assert_close(result.balance_score, 0.7);
            assert_close(result.power_budget.factor("hit_die"), 2.0);
            assert_close(result.power_budget.factor("proficiencies"), 0.6);
            assert_close(result.power_budget.factor("features"), 0.6);
            assert_close(result.power_budget.factor("spellcasting"), 0.0);
            assert!(result.recommendations.is_empty());
        }

        #[test]
        fn fragile_class_with_many_proficiencies() {
            let result = score(
                "class",
                json!({
                    "hit_die": "d6",
                    "armor_proficiencies": ["a", "b", "c", "d", "e"],
                    "weapon_proficiencies": ["f", "g", "h", "i"],
                    "features": ["x", "y", "z", "w", "v", "u"],
                    "spellcasting": true
                }),
            );
            assert_close(result.balance_score, 0.2);
            assert_close(result.power_budget.total, 0.5 + 1.8 + 1.8 + 1.0);
            assert_eq!(
                result.recommendations,
                vec!["Consider reducing proficiencies or features"]
            );
        }

        #[test]
        fn unknown_hit_die_counts_as_d8() {
            let result = score("class", json!({"hit_die": "d20"}));
            assert_close(result.power_budget.factor("hit_die"), 1.0);
            assert_eq!(
                result.recommendations,
                vec!["Consider adding more features or proficiencies"]
            );
        }
    }

    mod spell {
        use super::*;

        #[test]
        fn low_level_verbal_somatic_spell() {
            let result = score(
                "spell",
                json!({
                    "level": 1,
                    "components": ["V", "S", "M"],
                    "range": "Self",
                    "duration": "Concentration, up to 1 minute"
                }),
            );
            assert_close(result.balance_score, 0.7);
            assert_close(result.power_budget.factor("range"), 0.5);
            assert_close(result.power_budget.factor("duration"), 0.2);
            assert_close(result.power_budget.total, 0.5 + 0.3 + 0.5 + 0.2);
            assert!(result.recommendations.is_empty());
        }

        #[test]
        fn high_level_spell_sits_on_band_floor() {
            let result = score("spell", json!({"level": 8, "range": "120 feet"}));
            assert_close(result.balance_score, 0.4);
            assert_close(result.power_budget.total, 4.0);
            assert!(result.recommendations.is_empty());

            let result = score("spell", json!({"level": 9, "range": "120 feet"}));
            assert_close(result.power_budget.total, 4.5);
            assert!(result.recommendations.is_empty());
        }

        #[test]
        fn cantrip_budget_ceiling() {
            let result = score(
                "spell",
                json!({"level": 0, "components": ["V", "S"], "range": "Touch", "duration": "1 hour"}),
            );
            assert_close(result.power_budget.total, 0.2 + 0.3 + 0.3);
            assert!(result.recommendations.is_empty());

            let result = score(
                "spell",
                json!({"level": 0, "components": ["V", "S", "M"], "range": "Self", "duration": "8 hours"}),
            );
            assert_close(result.power_budget.total, 0.3 + 0.5 + 0.3);
            assert_eq!(
                result.recommendations,
                vec!["Consider reducing spell power to match level"]
            );
        }
    }

    mod item {
        use super::*;

        #[test]
        fn rarity_offsets_and_magic_penalty() {
            let cases = [
                ("common", false, 0.6),
                ("uncommon", false, 0.5),
                ("rare", true, 0.3),
                ("very_rare", false, 0.3),
                ("legendary", true, 0.1),
                ("mythic", false, 0.5),
            ];
            for (rarity, magical, expected) in cases {
                let result = score("item", json!({"rarity": rarity, "magical": magical}));
                assert_close(result.balance_score, expected);
            }
        }

        #[test]
        fn attunement_reduces_power() {
            let result = score(
                "item",
                json!({"rarity": "rare", "magical": true, "attunement": true, "properties": ["a"]}),
            );
            assert_close(result.power_budget.total, 1.5 + 0.5 - 0.3 + 0.2);
            assert!(result.recommendations.is_empty());
        }

        #[test]
        fn unknown_rarity_is_judged_against_uncommon() {
            let result = score("item", json!({"rarity": "mythic"}));
            assert_close(result.power_budget.factor("rarity"), 0.5);
            assert!(result.recommendations.is_empty());

            let result = score(
                "item",
                json!({"rarity": "mythic", "magical": true, "properties": ["a", "b", "c", "d", "e"]}),
            );
            assert_close(result.power_budget.total, 0.5 + 0.5 + 1.0);
            assert_eq!(
                result.recommendations,
                vec!["Consider reducing properties to match rarity"]
            );
        }

        #[test]
        fn bare_rarity_sits_inside_its_band() {
            for rarity in ["common", "uncommon", "rare", "very_rare", "legendary"] {
                let result = score("item", json!({"rarity": rarity}));
                assert!(result.recommendations.is_empty(), "{rarity}");
            }
        }
    }

    #[test]
    fn score_always_within_unit_interval() {
        let many = vec![0; 50];
        let bags = [
            ("race", json!({"ability_score_increases": {"a": 40}, "traits": many.clone()})),
            ("race", json!({"ability_score_increases": {"a": -40}})),
            ("class", json!({"hit_die": "d6", "armor_proficiencies": many})),
            ("spell", json!({"level": 50})),
            ("spell", json!({"level": -5, "components": ["V", "S"]})),
            ("item", json!({"rarity": "legendary", "magical": true})),
            ("item", json!({})),
        ];
        for (content_type, value) in bags {
            let result = score(content_type, value);
            assert!((0.0..=1.0).contains(&result.balance_score));
        }
    }

    #[test]
    fn unknown_content_type_is_invalid_input() {
        let err = score_balance("vehicle", Map::new()).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
