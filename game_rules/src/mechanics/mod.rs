//! Game mechanics: abilities, damage types, conditions, allegiances and dice.

mod dice;

pub use dice::*;

use serde::{Deserialize, Serialize};

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

/// All possible damage types in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    // Physical
    Slashing,
    Piercing,
    #[default]
    Bludgeoning,

    // Elemental
    Fire,
    Cold,
    Lightning,
    Acid,
    Thunder,

    // Magical
    Radiant,
    Necrotic,
    Force,
    Psychic,

    Poison,
}

impl DamageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageType::Slashing => "slashing",
            DamageType::Piercing => "piercing",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Fire => "fire",
            DamageType::Cold => "cold",
            DamageType::Lightning => "lightning",
            DamageType::Acid => "acid",
            DamageType::Thunder => "thunder",
            DamageType::Radiant => "radiant",
            DamageType::Necrotic => "necrotic",
            DamageType::Force => "force",
            DamageType::Psychic => "psychic",
            DamageType::Poison => "poison",
        }
    }
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conditions that can be active on a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Blinded,
    Charmed,
    Frightened,
    Grappled,
    Paralyzed,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,

    /// Took the Dodge action; attacks against it have disadvantage.
    Dodging,
    /// Took the Dash action this turn.
    Dashing,
    /// An ally took the Help action; next attack has advantage.
    Helped,
}

impl Condition {
    /// Conditions that only last until the next round starts.
    pub fn is_turn_scoped(&self) -> bool {
        matches!(
            self,
            Condition::Dodging | Condition::Dashing | Condition::Helped
        )
    }
}

/// Which side of a fight a creature is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allegiance {
    /// The human-controlled character.
    Player,
    /// Companions fighting alongside the player.
    Ally,
    Enemy,
}

impl Allegiance {
    /// Players and allies share a camp; enemies form the other.
    pub fn is_hostile_to(&self, other: Allegiance) -> bool {
        (*self == Allegiance::Enemy) != (other == Allegiance::Enemy)
    }
}

/// Combat temperament of a non-player creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    #[default]
    Aggressive,
    Defensive,
    Tactical,
    Cowardly,
}

impl Behavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Aggressive => "aggressive",
            Behavior::Defensive => "defensive",
            Behavior::Tactical => "tactical",
            Behavior::Cowardly => "cowardly",
        }
    }
}

impl std::fmt::Display for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
