//! Monster templates used to populate encounters.

use serde::{Deserialize, Serialize};

use super::{proficiency_for_level, AbilityScores, Weapon};
use crate::error::RulesError;
use crate::mechanics::{Ability, Behavior};

/// Stat block for a hostile creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub max_hp: i32,
    pub armor_class: i32,
    /// Walking speed in feet.
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    #[serde(default)]
    pub behavior: Behavior,
}

fn default_level() -> u32 {
    1
}

fn default_speed() -> u32 {
    30
}

impl MonsterTemplate {
    /// Parse a single template from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, RulesError> {
        Ok(toml::from_str(input)?)
    }

    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_for_level(self.level)
    }
}
