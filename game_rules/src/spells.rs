//! Spell definitions and the catalog used to look them up by id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RulesError;
use crate::mechanics::{DamageType, DiceExpression};

/// What a spell is for, as far as combat decisions care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpellRole {
    #[default]
    Damage,
    Healing,
    Utility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: SpellRole,
    /// Damage or healing dice. Utility spells may leave this at zero.
    pub dice: DiceExpression,
    #[serde(default)]
    pub damage_type: DamageType,
    /// Range in grid squares; 0 means self only, 1 means touch.
    pub range: u32,
    /// Requires a spell attack roll against armor class.
    #[serde(default)]
    pub attack_roll: bool,
    #[serde(default)]
    pub concentration: bool,
}

/// All spells known to the game, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpellCatalog {
    spells: HashMap<String, SpellDefinition>,
}

#[derive(Deserialize)]
struct SpellFile {
    #[serde(default)]
    spells: Vec<SpellDefinition>,
}

impl SpellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a TOML document with a `[[spells]]` array.
    pub fn from_toml_str(input: &str) -> Result<Self, RulesError> {
        let file: SpellFile = toml::from_str(input)?;
        Ok(file.spells.into_iter().collect())
    }

    /// Add or replace a spell.
    pub fn insert(&mut self, spell: SpellDefinition) {
        self.spells.insert(spell.id.clone(), spell);
    }

    pub fn get(&self, id: &str) -> Option<&SpellDefinition> {
        self.spells.get(id)
    }

    /// Look up a spell, failing with [`RulesError::UnknownSpell`].
    pub fn require(&self, id: &str) -> Result<&SpellDefinition, RulesError> {
        self.get(id)
            .ok_or_else(|| RulesError::UnknownSpell(id.to_string()))
    }

    /// Role of a spell, if the catalog knows it.
    pub fn role_of(&self, id: &str) -> Option<SpellRole> {
        self.get(id).map(|s| s.role)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl FromIterator<SpellDefinition> for SpellCatalog {
    fn from_iter<T: IntoIterator<Item = SpellDefinition>>(iter: T) -> Self {
        let mut catalog = SpellCatalog::new();
        for spell in iter {
            catalog.insert(spell);
        }
        catalog
    }
}
