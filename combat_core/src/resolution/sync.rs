//! Projection of combat entities into flat views and back into characters.

use game_rules::{
    AbilityScores, Ability, Allegiance, Behavior, Character, Condition, EntityId, Weapon,
};
use serde::{Deserialize, Serialize};

use crate::components::{
    ActionsComponent, AiComponent, KnownSpell, PlayerComponent, PositionComponent,
    SpellsComponent, StatsComponent, StatusComponent, WeaponsComponent,
};
use crate::entity::CombatEntity;

/// Flat, serializable copy of every component field.
///
/// Component-level presence is kept through the `has_*` flags so a view
/// converts back into the exact entity it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantView {
    pub id: EntityId,

    pub has_stats: bool,
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    pub base_speed: u32,
    pub level: u32,
    pub proficiency_bonus: i32,
    pub abilities: AbilityScores,
    pub spellcasting_ability: Option<Ability>,

    pub has_position: bool,
    pub x: i32,
    pub y: i32,
    pub initiative: i32,

    pub has_actions: bool,
    pub movement: u32,
    pub action: bool,
    pub bonus_action: bool,
    pub reaction: bool,
    pub action_catalog: Vec<String>,

    pub category: Allegiance,
    pub is_active: bool,
    pub is_dead: bool,
    pub conditions: Vec<Condition>,
    pub concentration: Option<String>,

    pub weapons: Option<Vec<Weapon>>,
    pub spells: Option<Vec<KnownSpell>>,
    pub behavior: Option<Behavior>,
    pub is_player: bool,
}

impl From<&CombatEntity> for CombatantView {
    fn from(entity: &CombatEntity) -> Self {
        let stats = entity.stats.clone();
        let position = entity.position;
        let actions = entity.actions.clone();

        Self {
            id: entity.id,

            has_stats: stats.is_some(),
            name: stats.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
            max_hp: stats.as_ref().map_or(0, |s| s.max_hp),
            current_hp: stats.as_ref().map_or(0, |s| s.current_hp),
            armor_class: stats.as_ref().map_or(0, |s| s.armor_class),
            base_speed: stats.as_ref().map_or(0, |s| s.base_speed),
            level: stats.as_ref().map_or(0, |s| s.level),
            proficiency_bonus: stats.as_ref().map_or(0, |s| s.proficiency_bonus),
            abilities: stats.as_ref().map(|s| s.abilities).unwrap_or_default(),
            spellcasting_ability: stats.as_ref().and_then(|s| s.spellcasting_ability),

            has_position: position.is_some(),
            x: position.map_or(0, |p| p.x),
            y: position.map_or(0, |p| p.y),
            initiative: position.map_or(0, |p| p.initiative),

            has_actions: actions.is_some(),
            movement: actions.as_ref().map_or(0, |a| a.movement),
            action: actions.as_ref().is_some_and(|a| a.action),
            bonus_action: actions.as_ref().is_some_and(|a| a.bonus_action),
            reaction: actions.as_ref().is_some_and(|a| a.reaction),
            action_catalog: actions.map(|a| a.catalog).unwrap_or_default(),

            category: entity.status.category,
            is_active: entity.status.is_active,
            is_dead: entity.status.is_dead,
            conditions: entity.status.conditions.clone(),
            concentration: entity.status.concentration.clone(),

            weapons: entity.weapons.as_ref().map(|w| w.weapons.clone()),
            spells: entity.spells.as_ref().map(|s| s.known.clone()),
            behavior: entity.ai.map(|ai| ai.behavior),
            is_player: entity.player.is_some(),
        }
    }
}

impl From<&CombatantView> for CombatEntity {
    fn from(view: &CombatantView) -> Self {
        CombatEntity {
            id: view.id,
            status: StatusComponent {
                category: view.category,
                is_active: view.is_active,
                is_dead: view.is_dead,
                conditions: view.conditions.clone(),
                concentration: view.concentration.clone(),
            },
            stats: view.has_stats.then(|| StatsComponent {
                name: view.name.clone(),
                max_hp: view.max_hp,
                current_hp: view.current_hp,
                armor_class: view.armor_class,
                base_speed: view.base_speed,
                level: view.level,
                proficiency_bonus: view.proficiency_bonus,
                abilities: view.abilities,
                spellcasting_ability: view.spellcasting_ability,
            }),
            position: view.has_position.then_some(PositionComponent {
                x: view.x,
                y: view.y,
                initiative: view.initiative,
            }),
            actions: view.has_actions.then(|| ActionsComponent {
                movement: view.movement,
                action: view.action,
                bonus_action: view.bonus_action,
                reaction: view.reaction,
                catalog: view.action_catalog.clone(),
            }),
            weapons: view.weapons.clone().map(|weapons| WeaponsComponent { weapons }),
            spells: view.spells.clone().map(|known| SpellsComponent { known }),
            ai: view.behavior.map(|behavior| AiComponent { behavior }),
            player: view.is_player.then_some(PlayerComponent),
        }
    }
}

/// Write combat results back into the long-lived character.
///
/// HP and lasting conditions carry over; turn-scoped conditions do not.
pub fn sync_to_character(entity: &CombatEntity, character: &mut Character) {
    if let Some(stats) = &entity.stats {
        character.current_hp = stats.current_hp.clamp(0, character.max_hp.max(0));
    }
    character.conditions = entity
        .status
        .conditions
        .iter()
        .copied()
        .filter(|c| !c.is_turn_scoped())
        .collect();
    if entity.status.is_dead && !character.has_condition(Condition::Unconscious) {
        character.conditions.push(Condition::Unconscious);
    }
}
