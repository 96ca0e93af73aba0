//! Building blocks shared by characters and monster templates.

use serde::{Deserialize, Serialize};

use crate::mechanics::{Ability, DamageType, DiceExpression};

/// The six ability scores of a creature. Omitted scores default to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    /// Raw score for an ability.
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

    /// D&D style modifier, rounding down: `floor((score - 10) / 2)`.
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.score(ability) - 10).div_euclid(2)
    }
}

/// Whether a weapon is swung or fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Melee,
    Ranged,
}

/// A weapon definition. Ranges are in grid squares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub category: WeaponCategory,
    pub damage: DiceExpression,
    #[serde(default)]
    pub damage_type: DamageType,
    /// Normal range; only meaningful for ranged weapons.
    #[serde(default)]
    pub normal_range: Option<u32>,
    /// Long range (attacks at disadvantage past normal range).
    #[serde(default)]
    pub long_range: Option<u32>,
    /// Finesse and ranged weapons attack with Dexterity.
    #[serde(default)]
    pub finesse: bool,
}

impl Weapon {
    /// Create a melee weapon.
    pub fn melee(id: impl Into<String>, name: impl Into<String>, damage: DiceExpression) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: WeaponCategory::Melee,
            damage,
            damage_type: DamageType::default(),
            normal_range: None,
            long_range: None,
            finesse: false,
        }
    }

    /// Create a ranged weapon with the given normal and long range.
    pub fn ranged(
        id: impl Into<String>,
        name: impl Into<String>,
        damage: DiceExpression,
        normal_range: u32,
        long_range: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: WeaponCategory::Ranged,
            damage,
            damage_type: DamageType::Piercing,
            normal_range: Some(normal_range),
            long_range: Some(long_range.max(normal_range)),
            finesse: false,
        }
    }

    /// Expected damage of a hit.
    pub fn average_damage(&self) -> f32 {
        self.damage.average()
    }

    /// Ability used for attack and damage rolls.
    pub fn attack_ability(&self, scores: &AbilityScores) -> Ability {
        match self.category {
            WeaponCategory::Ranged => Ability::Dexterity,
            WeaponCategory::Melee
                if self.finesse
                    && scores.modifier(Ability::Dexterity) > scores.modifier(Ability::Strength) =>
            {
                Ability::Dexterity
            }
            WeaponCategory::Melee => Ability::Strength,
        }
    }

    /// Furthest distance at which this weapon can attack at all.
    pub fn max_range(&self) -> u32 {
        match self.category {
            WeaponCategory::Melee => 1,
            WeaponCategory::Ranged => self
                .long_range
                .or(self.normal_range)
                .unwrap_or(1),
        }
    }
}
