//! Component definitions for combat entities.
//!
//! An entity is a bag of these. Behavior is derived from which components
//! are present, never from a type hierarchy.

use game_rules::{AbilityScores, Ability, Allegiance, Behavior, Condition, SpellRole, Weapon};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Kinds of component an entity may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComponentKind {
    Stats,
    Position,
    Actions,
    Status,
    Weapons,
    Spells,
    Ai,
    Player,
}

/// Core numbers of a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsComponent {
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    /// Movement per turn, in grid squares.
    pub base_speed: u32,
    pub level: u32,
    pub proficiency_bonus: i32,
    pub abilities: AbilityScores,
    pub spellcasting_ability: Option<Ability>,
}

impl StatsComponent {
    /// Current HP as a fraction of max HP. A zero max counts as full.
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 1.0;
        }
        self.current_hp as f32 / self.max_hp as f32
    }

    /// Subtract damage, clamping at zero. Returns the HP actually lost.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self
            .current_hp
            .saturating_sub(hit_points(amount))
            .clamp(0, self.max_hp.max(0));
        (before - self.current_hp).max(0) as u32
    }

    /// Restore HP, clamping at max. Returns the HP actually restored.
    pub fn apply_healing(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self
            .current_hp
            .saturating_add(hit_points(amount))
            .clamp(0, self.max_hp.max(0));
        (self.current_hp - before).max(0) as u32
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }
}

fn hit_points(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

/// Grid placement and turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PositionComponent {
    pub x: i32,
    pub y: i32,
    pub initiative: i32,
}

impl PositionComponent {
    /// Manhattan distance to another position.
    pub fn distance_to(&self, other: &PositionComponent) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Resources left this turn plus the catalog of actions the entity knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsComponent {
    /// Remaining movement, in grid squares.
    pub movement: u32,
    pub action: bool,
    pub bonus_action: bool,
    pub reaction: bool,
    pub catalog: Vec<String>,
}

impl ActionsComponent {
    /// Fresh resources for a creature with the given speed.
    pub fn fresh(speed: u32, catalog: Vec<String>) -> Self {
        Self {
            movement: speed,
            action: true,
            bonus_action: true,
            reaction: true,
            catalog,
        }
    }

    pub fn reset(&mut self, speed: u32) {
        self.movement = speed;
        self.action = true;
        self.bonus_action = true;
        self.reaction = true;
    }
}

/// Liveness, allegiance and active conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusComponent {
    pub category: Allegiance,
    pub is_active: bool,
    pub is_dead: bool,
    /// Ordered, without duplicates.
    pub conditions: Vec<Condition>,
    /// Spell currently being concentrated on.
    pub concentration: Option<String>,
}

impl StatusComponent {
    pub fn new(category: Allegiance) -> Self {
        Self {
            category,
            is_active: true,
            is_dead: false,
            conditions: Vec::new(),
            concentration: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.is_active && !self.is_dead
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    /// Add a condition unless already present. Returns whether it was added.
    pub fn add_condition(&mut self, condition: Condition) -> bool {
        if self.has_condition(condition) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    /// Remove a condition. Returns whether it was present.
    pub fn remove_condition(&mut self, condition: Condition) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|c| *c != condition);
        self.conditions.len() != before
    }

    /// Drop conditions that end when a new round begins.
    pub fn clear_turn_scoped(&mut self) {
        self.conditions.retain(|c| !c.is_turn_scoped());
    }
}

/// Weapons in preference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeaponsComponent {
    pub weapons: Vec<Weapon>,
}

impl WeaponsComponent {
    pub fn get(&self, id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id == id)
    }
}

/// A spell the entity can cast, tagged with what it is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownSpell {
    pub id: String,
    pub role: SpellRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpellsComponent {
    pub known: Vec<KnownSpell>,
}

impl SpellsComponent {
    pub fn knows(&self, id: &str) -> bool {
        self.known.iter().any(|s| s.id == id)
    }

    /// First known spell with the given role.
    pub fn first_with_role(&self, role: SpellRole) -> Option<&KnownSpell> {
        self.known.iter().find(|s| s.role == role)
    }

    pub fn has_role(&self, role: SpellRole) -> bool {
        self.first_with_role(role).is_some()
    }
}

/// Marks an entity as computer controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiComponent {
    pub behavior: Behavior,
}

/// Marks the human-controlled entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerComponent;
