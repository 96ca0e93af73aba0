//! Builds combat entities from the character layer.
//!
//! Players and companions keep their character's id so results can be
//! written back with [`sync_to_character`] when the encounter ends.

use game_rules::{
    AbilityScores, Ability, Allegiance, Behavior, Character, Condition, EntityId,
    MonsterTemplate, SpellCatalog, SpellRole, Weapon,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::ai::Intent;
use crate::components::{
    ActionsComponent, AiComponent, KnownSpell, PositionComponent, SpellsComponent,
    StatsComponent, WeaponsComponent,
};
use crate::entity::CombatEntity;

pub use crate::resolution::sync_to_character;

/// Feet per grid square.
pub const FEET_PER_SQUARE: u32 = 5;

/// Where an entity starts and when it acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub initiative: i32,
}

impl Placement {
    pub fn new(x: i32, y: i32, initiative: i32) -> Self {
        Self { x, y, initiative }
    }
}

/// Convert a walking speed in feet to whole grid squares.
pub fn speed_in_squares(feet: u32) -> u32 {
    feet / FEET_PER_SQUARE
}

/// Entity builder, optionally aware of a spell catalog for spell roles.
///
/// Without a catalog every known spell is tagged with the default role.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityFactory<'a> {
    catalog: Option<&'a SpellCatalog>,
}

impl<'a> EntityFactory<'a> {
    pub fn new() -> Self {
        Self { catalog: None }
    }

    pub fn with_catalog(catalog: &'a SpellCatalog) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    pub fn player(&self, character: &Character, placement: Placement) -> CombatEntity {
        self.from_character(character, Allegiance::Player, placement)
            .with_player()
    }

    pub fn companion(
        &self,
        character: &Character,
        behavior: Behavior,
        placement: Placement,
    ) -> CombatEntity {
        self.from_character(character, Allegiance::Ally, placement)
            .with_ai(AiComponent { behavior })
    }

    pub fn monster(&self, template: &MonsterTemplate, placement: Placement) -> CombatEntity {
        let sheet = Sheet {
            name: &template.name,
            level: template.level,
            max_hp: template.max_hp,
            current_hp: template.max_hp,
            armor_class: template.armor_class,
            speed_feet: template.speed,
            proficiency_bonus: template.proficiency_bonus(),
            abilities: &template.abilities,
            spellcasting_ability: template.spellcasting_ability,
            spells: &template.spells,
            weapons: &template.weapons,
        };
        self.build(EntityId::new(), Allegiance::Enemy, &sheet, placement)
            .with_ai(AiComponent {
                behavior: template.behavior,
            })
    }

    fn from_character(
        &self,
        character: &Character,
        category: Allegiance,
        placement: Placement,
    ) -> CombatEntity {
        let sheet = Sheet {
            name: &character.name,
            level: character.level,
            max_hp: character.max_hp,
            current_hp: character.current_hp,
            armor_class: character.armor_class,
            speed_feet: character.speed,
            proficiency_bonus: character.proficiency_bonus(),
            abilities: &character.abilities,
            spellcasting_ability: character.spellcasting_ability,
            spells: &character.known_spells,
            weapons: &character.weapons,
        };
        let mut entity = self.build(character.id, category, &sheet, placement);
        for condition in lasting_conditions(character) {
            entity.status.add_condition(condition);
        }
        entity
    }

    fn build(
        &self,
        id: EntityId,
        category: Allegiance,
        sheet: &Sheet<'_>,
        placement: Placement,
    ) -> CombatEntity {
        let base_speed = speed_in_squares(sheet.speed_feet);
        let stats = StatsComponent {
            name: sheet.name.to_string(),
            max_hp: sheet.max_hp.max(0),
            current_hp: sheet.current_hp.clamp(0, sheet.max_hp.max(0)),
            armor_class: sheet.armor_class,
            base_speed,
            level: sheet.level,
            proficiency_bonus: sheet.proficiency_bonus,
            abilities: *sheet.abilities,
            spellcasting_ability: sheet.spellcasting_ability,
        };

        let known: Vec<KnownSpell> = sheet
            .spells
            .iter()
            .map(|id| KnownSpell {
                id: id.clone(),
                role: self.role_of(id),
            })
            .collect();

        let catalog = action_catalog(!sheet.weapons.is_empty(), !known.is_empty());
        let mut entity = CombatEntity::new(id, category)
            .with_stats(stats)
            .with_position(PositionComponent {
                x: placement.x,
                y: placement.y,
                initiative: placement.initiative,
            })
            .with_actions(ActionsComponent::fresh(base_speed, catalog));

        if !sheet.weapons.is_empty() {
            entity = entity.with_weapons(WeaponsComponent {
                weapons: sheet.weapons.to_vec(),
            });
        }
        if !known.is_empty() {
            entity = entity.with_spells(SpellsComponent { known });
        }
        entity
    }

    fn role_of(&self, spell: &str) -> SpellRole {
        self.catalog
            .and_then(|c| c.role_of(spell))
            .unwrap_or_default()
    }
}

/// The fields characters and monsters have in common.
struct Sheet<'s> {
    name: &'s str,
    level: u32,
    max_hp: i32,
    current_hp: i32,
    armor_class: i32,
    speed_feet: u32,
    proficiency_bonus: i32,
    abilities: &'s AbilityScores,
    spellcasting_ability: Option<Ability>,
    spells: &'s [String],
    weapons: &'s [Weapon],
}

/// Intent tags an entity with the given capabilities can carry out.
fn action_catalog(armed: bool, casts: bool) -> Vec<String> {
    Intent::iter()
        .filter(|intent| armed || !intent.is_attack())
        .filter(|intent| casts || !intent.is_spell())
        .map(|intent| intent.to_string())
        .collect()
}

pub fn player_entity(character: &Character, placement: Placement) -> CombatEntity {
    EntityFactory::new().player(character, placement)
}

pub fn companion_entity(
    character: &Character,
    behavior: Behavior,
    placement: Placement,
) -> CombatEntity {
    EntityFactory::new().companion(character, behavior, placement)
}

pub fn monster_entity(template: &MonsterTemplate, placement: Placement) -> CombatEntity {
    EntityFactory::new().monster(template, placement)
}

/// Conditions a character carries into combat.
pub fn lasting_conditions(character: &Character) -> Vec<Condition> {
    character
        .conditions
        .iter()
        .copied()
        .filter(|c| !c.is_turn_scoped())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentKind;
    use game_rules::{DiceExpression, DamageType, SpellDefinition};

    fn fighter() -> Character {
        let mut character = Character::new("Brakka")
            .with_hp(24)
            .with_weapon(Weapon::melee("axe", "Battleaxe", DiceExpression::new(1, 8, 0)));
        character.level = 5;
        character.speed = 25;
        character.armor_class = 16;
        character.conditions = vec![Condition::Poisoned, Condition::Dodging];
        character
    }

    fn goblin() -> MonsterTemplate {
        MonsterTemplate {
            name: "Goblin".to_string(),
            level: 1,
            max_hp: 7,
            armor_class: 15,
            speed: 30,
            abilities: AbilityScores::default(),
            weapons: vec![Weapon::ranged(
                "shortbow",
                "Shortbow",
                DiceExpression::new(1, 6, 0),
                16,
                64,
            )],
            spells: Vec::new(),
            spellcasting_ability: None,
            behavior: Behavior::Cowardly,
        }
    }

    #[test]
    fn test_player_entity() {
        let character = fighter();
        let entity = player_entity(&character, Placement::new(2, 3, 14));

        assert_eq!(entity.id, character.id);
        assert_eq!(entity.category(), Allegiance::Player);
        assert!(entity.has(ComponentKind::Player));
        assert!(!entity.has(ComponentKind::Ai));
        assert!(!entity.has(ComponentKind::Spells));

        let stats = entity.stats.as_ref().unwrap();
        assert_eq!(stats.base_speed, 5);
        assert_eq!(stats.proficiency_bonus, 3);
        assert_eq!(stats.max_hp, 24);
        assert_eq!(entity.actions.as_ref().unwrap().movement, 5);
        assert_eq!(entity.position.unwrap().initiative, 14);
    }

    #[test]
    fn test_only_lasting_conditions_carry_over() {
        let entity = player_entity(&fighter(), Placement::default());
        assert_eq!(entity.status.conditions, vec![Condition::Poisoned]);
        assert_eq!(lasting_conditions(&fighter()), vec![Condition::Poisoned]);
    }

    #[test]
    fn test_monster_entity() {
        let entity = monster_entity(&goblin(), Placement::new(8, 0, 12));

        assert_eq!(entity.category(), Allegiance::Enemy);
        assert_eq!(entity.ai.unwrap().behavior, Behavior::Cowardly);
        assert_eq!(entity.stats.as_ref().unwrap().base_speed, 6);
        assert_eq!(entity.weapons.as_ref().unwrap().weapons.len(), 1);

        let catalog = &entity.actions.as_ref().unwrap().catalog;
        assert!(catalog.contains(&"attack_ranged".to_string()));
        assert!(!catalog.contains(&"cast_heal_spell".to_string()));
    }

    #[test]
    fn test_companion_spells_take_catalog_roles() {
        let spells: SpellCatalog = [SpellDefinition {
            id: "cure_wounds".to_string(),
            name: "Cure Wounds".to_string(),
            role: SpellRole::Healing,
            dice: DiceExpression::new(1, 8, 0),
            damage_type: DamageType::default(),
            range: 1,
            attack_roll: false,
            concentration: false,
        }]
        .into_iter()
        .collect();
        let cleric = Character::new("Ilse")
            .with_spell("cure_wounds")
            .with_spell("mystery");

        let entity = EntityFactory::with_catalog(&spells).companion(
            &cleric,
            Behavior::Defensive,
            Placement::default(),
        );
        let known = &entity.spells.as_ref().unwrap().known;
        assert_eq!(entity.category(), Allegiance::Ally);
        assert_eq!(known[0].role, SpellRole::Healing);
        assert_eq!(known[1].role, SpellRole::Damage);

        let untagged = companion_entity(&cleric, Behavior::Defensive, Placement::default());
        assert_eq!(untagged.spells.as_ref().unwrap().known[0].role, SpellRole::Damage);
    }
}
