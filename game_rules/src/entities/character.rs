//! Character definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{AbilityScores, EntityId, Weapon};
use crate::mechanics::{Ability, Condition};

/// A full character as the narrative layer knows it.
///
/// Combat encounters build their combatants from this and write HP and
/// lasting conditions back into it once the fight ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub title: Option<String>,

    pub level: u32,
    pub abilities: AbilityScores,
    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    /// Walking speed in feet.
    pub speed: u32,
    /// Overrides the level-derived proficiency bonus when set.
    pub proficiency_override: Option<i32>,
    pub spellcasting_ability: Option<Ability>,
    pub known_spells: Vec<String>,
    /// Equipped weapons in preference order.
    pub weapons: Vec<Weapon>,
    pub conditions: Vec<Condition>,

    // Additional components in a flexible map
    #[serde(default)]
    pub extra_components: HashMap<String, serde_json::Value>,

    // Character-specific data
    pub backstory: Option<String>,
    pub personality_traits: Vec<String>,
}

impl Character {
    /// Create a new level 1 character with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            title: None,
            level: 1,
            abilities: AbilityScores::default(),
            max_hp: 10,
            current_hp: 10,
            armor_class: 10,
            speed: 30,
            proficiency_override: None,
            spellcasting_ability: None,
            known_spells: Vec::new(),
            weapons: Vec::new(),
            conditions: Vec::new(),
            extra_components: HashMap::new(),
            backstory: None,
            personality_traits: Vec::new(),
        }
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.max_hp = hp;
        self.current_hp = hp;
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_spell(mut self, spell: impl Into<String>) -> Self {
        self.known_spells.push(spell.into());
        self
    }

    /// Check if the character is alive.
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Proficiency bonus: `2 + (level - 1) / 4` unless overridden.
    pub fn proficiency_bonus(&self) -> i32 {
        self.proficiency_override
            .unwrap_or_else(|| proficiency_for_level(self.level))
    }

    /// Check if the character has a specific condition.
    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }
}

/// Level-derived proficiency bonus.
pub fn proficiency_for_level(level: u32) -> i32 {
    2 + (level.max(1) as i32 - 1) / 4
}
