//! Homebrew content model
//!
//! Authors submit loosely-shaped attribute bags. Each content type gets a
//! typed attribute set; recognised keys are parsed with their defaults and
//! everything else is kept in `extra` so nothing the author wrote is lost.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::balance::{analyze_balance, BalanceResult};
use crate::RulesError;

/// Kinds of homebrew content that can be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Race,
    Class,
    Spell,
    Item,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Race,
        ContentType::Class,
        ContentType::Spell,
        ContentType::Item,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Race => "race",
            Self::Class => "class",
            Self::Spell => "spell",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "race" => Ok(Self::Race),
            "class" => Ok(Self::Class),
            "spell" => Ok(Self::Spell),
            "item" => Ok(Self::Item),
            _ => Err(RulesError::invalid_input(format!(
                "Unknown content type: {}",
                s
            ))),
        }
    }
}

// =============================================================================
// Typed attribute sets
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceAttributes {
    /// Ability name to increase amount
    pub ability_score_increases: BTreeMap<String, i32>,
    pub traits: Vec<Value>,
    pub subraces: Vec<Value>,
    pub age: String,
    pub alignment: String,
    pub size: String,
    pub speed: i32,
    pub languages: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for RaceAttributes {
    fn default() -> Self {
        Self {
            ability_score_increases: BTreeMap::new(),
            traits: Vec::new(),
            subraces: Vec::new(),
            age: String::new(),
            alignment: String::new(),
            size: "medium".to_string(),
            speed: 30,
            languages: vec!["common".to_string()],
            extra: BTreeMap::new(),
        }
    }
}

impl RaceAttributes {
    /// Sum of all increases, saturating at the `i32` bounds.
    pub fn total_ability_increase(&self) -> i32 {
        self.ability_score_increases
            .values()
            .fold(0i32, |total, increase| total.saturating_add(*increase))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassAttributes {
    pub hit_die: String,
    pub primary_ability: String,
    pub saving_throw_proficiencies: Vec<Value>,
    pub armor_proficiencies: Vec<Value>,
    pub weapon_proficiencies: Vec<Value>,
    pub tool_proficiencies: Vec<Value>,
    pub skill_proficiencies: Vec<Value>,
    pub features: Vec<Value>,
    pub spellcasting: bool,
    pub spellcasting_ability: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ClassAttributes {
    fn default() -> Self {
        Self {
            hit_die: "d8".to_string(),
            primary_ability: String::new(),
            saving_throw_proficiencies: Vec::new(),
            armor_proficiencies: Vec::new(),
            weapon_proficiencies: Vec::new(),
            tool_proficiencies: Vec::new(),
            skill_proficiencies: Vec::new(),
            features: Vec::new(),
            spellcasting: false,
            spellcasting_ability: None,
            extra: BTreeMap::new(),
        }
    }
}

impl ClassAttributes {
    /// Armor plus weapon proficiencies.
    pub fn martial_proficiency_count(&self) -> usize {
        self.armor_proficiencies.len() + self.weapon_proficiencies.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellAttributes {
    pub level: i32,
    pub school: String,
    pub casting_time: String,
    pub range: String,
    pub components: Vec<String>,
    pub duration: String,
    pub higher_levels: String,
    pub classes: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SpellAttributes {
    pub fn has_component(&self, component: &str) -> bool {
        self.components.iter().any(|c| c == component)
    }
}

/// Item rarity. Unrecognised strings are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
    Other(String),
}

impl From<String> for Rarity {
    fn from(value: String) -> Self {
        let normalized = value.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "common" => Self::Common,
            "uncommon" => Self::Uncommon,
            "rare" => Self::Rare,
            "very_rare" => Self::VeryRare,
            "legendary" => Self::Legendary,
            _ => Self::Other(value),
        }
    }
}

impl From<Rarity> for String {
    fn from(value: Rarity) -> Self {
        match value {
            Rarity::Common => "common".to_string(),
            Rarity::Uncommon => "uncommon".to_string(),
            Rarity::Rare => "rare".to_string(),
            Rarity::VeryRare => "very_rare".to_string(),
            Rarity::Legendary => "legendary".to_string(),
            Rarity::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemAttributes {
    #[serde(rename = "type")]
    pub item_type: String,
    pub rarity: Rarity,
    pub cost: String,
    pub weight: f64,
    pub properties: Vec<Value>,
    pub magical: bool,
    pub attunement: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Attribute set for one piece of content, tagged by its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "content_type", content = "attributes", rename_all = "snake_case")]
pub enum ContentAttributes {
    Race(RaceAttributes),
    Class(ClassAttributes),
    Spell(SpellAttributes),
    Item(ItemAttributes),
}

impl ContentAttributes {
    /// Blank attributes with each type's defaults.
    pub fn blank(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Race => Self::Race(RaceAttributes::default()),
            ContentType::Class => Self::Class(ClassAttributes::default()),
            ContentType::Spell => Self::Spell(SpellAttributes::default()),
            ContentType::Item => Self::Item(ItemAttributes::default()),
        }
    }

    /// Parse an attribute bag as the given type. Missing keys take defaults;
    /// present keys of the wrong shape are rejected.
    pub fn from_map(content_type: ContentType, map: Map<String, Value>) -> Result<Self, RulesError> {
        let value = Value::Object(map);
        let attributes = match content_type {
            ContentType::Race => Self::Race(serde_json::from_value(value)?),
            ContentType::Class => Self::Class(serde_json::from_value(value)?),
            ContentType::Spell => Self::Spell(serde_json::from_value(value)?),
            ContentType::Item => Self::Item(serde_json::from_value(value)?),
        };
        Ok(attributes)
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Race(_) => ContentType::Race,
            Self::Class(_) => ContentType::Class,
            Self::Spell(_) => ContentType::Spell,
            Self::Item(_) => ContentType::Item,
        }
    }

    fn to_map(&self) -> Result<Map<String, Value>, RulesError> {
        let value = match self {
            Self::Race(attrs) => serde_json::to_value(attrs)?,
            Self::Class(attrs) => serde_json::to_value(attrs)?,
            Self::Spell(attrs) => serde_json::to_value(attrs)?,
            Self::Item(attrs) => serde_json::to_value(attrs)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(RulesError::invalid_input("Attributes must serialize to an object")),
        }
    }
}

// =============================================================================
// Content
// =============================================================================

/// One piece of homebrew content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomebrewContent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub attributes: ContentAttributes,
}

impl HomebrewContent {
    pub fn new(name: impl Into<String>, attributes: ContentAttributes) -> Self {
        Self {
            name: name.into(),
            description: None,
            attributes,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build typed content from a flat attribute bag. `name` and
    /// `description` are lifted out; every other key feeds the typed set.
    pub fn from_attributes(
        content_type: ContentType,
        mut attributes: Map<String, Value>,
    ) -> Result<Self, RulesError> {
        let name = take_string(&mut attributes, "name")?.unwrap_or_default();
        let description = take_string(&mut attributes, "description")?;
        Ok(Self {
            name,
            description,
            attributes: ContentAttributes::from_map(content_type, attributes)?,
        })
    }

    /// Same as [`from_attributes`](Self::from_attributes) for an arbitrary
    /// JSON value, which must be an object.
    pub fn from_value(content_type: ContentType, value: Value) -> Result<Self, RulesError> {
        match value {
            Value::Object(map) => Self::from_attributes(content_type, map),
            other => Err(RulesError::invalid_input(format!(
                "Content attributes must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Flatten back into a single attribute bag.
    pub fn to_attributes(&self) -> Result<Map<String, Value>, RulesError> {
        let mut map = self.attributes.to_map()?;
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert(
            "description".to_string(),
            Value::String(self.description.clone().unwrap_or_default()),
        );
        Ok(map)
    }

    pub fn content_type(&self) -> ContentType {
        self.attributes.content_type()
    }
}

/// Blank attribute bag for authoring `content_type`.
pub fn template(content_type: ContentType) -> Result<Map<String, Value>, RulesError> {
    HomebrewContent::new("", ContentAttributes::blank(content_type)).to_attributes()
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Result<Option<String>, RulesError> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(RulesError::invalid_input(format!(
            "Content {} must be a string, got {}",
            key,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Review
// =============================================================================

/// Structural checks plus the balance analysis for one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub balance: BalanceResult,
}

impl ContentReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A missing name is an error, a missing description a warning. Balance is
/// always reported and never affects validity.
pub fn validate_content(content: &HomebrewContent) -> ContentReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if content.name.trim().is_empty() {
        errors.push("Content must have a name".to_string());
    }

    let has_description = content
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if !has_description {
        warnings.push("Content should have a description".to_string());
    }

    ContentReport {
        errors,
        warnings,
        balance: analyze_balance(&content.attributes),
    }
}
