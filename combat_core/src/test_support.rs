//! Builders shared by unit tests.

use game_rules::{
    AbilityScores, Allegiance, Behavior, DiceExpression, EntityId, SpellRole, Weapon,
};

use crate::components::{
    ActionsComponent, AiComponent, KnownSpell, PositionComponent, SpellsComponent,
    StatsComponent, WeaponsComponent,
};
use crate::entity::CombatEntity;
use crate::store::EntityStore;

pub struct TestCombatant {
    pub entity: CombatEntity,
}

impl TestCombatant {
    pub fn with_hp(mut self, current: i32, max: i32) -> Self {
        let stats = self.entity.stats.as_mut().unwrap();
        stats.current_hp = current;
        stats.max_hp = max;
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.entity
            .weapons
            .get_or_insert_with(WeaponsComponent::default)
            .weapons
            .push(weapon);
        self
    }

    pub fn with_spell(mut self, id: &str, role: SpellRole) -> Self {
        self.entity
            .spells
            .get_or_insert_with(SpellsComponent::default)
            .known
            .push(KnownSpell {
                id: id.to_string(),
                role,
            });
        self
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.entity.position.as_mut().unwrap().initiative = initiative;
        self
    }

    pub fn without_action(mut self) -> Self {
        self.entity.actions.as_mut().unwrap().action = false;
        self
    }

    pub fn without_movement(mut self) -> Self {
        self.entity.actions.as_mut().unwrap().movement = 0;
        self
    }

    pub fn with_category(mut self, category: Allegiance) -> Self {
        self.entity.status.category = category;
        self
    }
}

/// A full combatant with 10 HP, AC 12, speed 6 and fresh resources.
pub fn combatant(category: Allegiance, x: i32, y: i32) -> TestCombatant {
    let stats = StatsComponent {
        name: format!("{:?}@{},{}", category, x, y),
        max_hp: 10,
        current_hp: 10,
        armor_class: 12,
        base_speed: 6,
        level: 1,
        proficiency_bonus: 2,
        abilities: AbilityScores::default(),
        spellcasting_ability: None,
    };
    TestCombatant {
        entity: CombatEntity::new(EntityId::new(), category)
            .with_stats(stats)
            .with_position(PositionComponent { x, y, initiative: 10 })
            .with_actions(ActionsComponent::fresh(6, vec!["attack".to_string()])),
    }
}

/// An AI-controlled enemy.
pub fn ai_combatant(behavior: Behavior, x: i32, y: i32) -> TestCombatant {
    let mut c = combatant(Allegiance::Enemy, x, y);
    c.entity.ai = Some(AiComponent { behavior });
    c
}

pub fn spawn(store: &mut EntityStore, combatant: TestCombatant) -> EntityId {
    let id = combatant.entity.id;
    store.add(combatant.entity);
    id
}

pub fn dagger() -> Weapon {
    Weapon::melee("dagger", "Dagger", DiceExpression::new(1, 4, 0))
}

pub fn longsword() -> Weapon {
    Weapon::melee("longsword", "Longsword", DiceExpression::new(1, 8, 0))
}

pub fn greatsword() -> Weapon {
    Weapon::melee("greatsword", "Greatsword", DiceExpression::new(2, 6, 0))
}

pub fn shortbow() -> Weapon {
    Weapon::ranged("shortbow", "Shortbow", DiceExpression::new(1, 6, 0), 16, 64)
}

pub fn longbow() -> Weapon {
    Weapon::ranged("longbow", "Longbow", DiceExpression::new(1, 8, 0), 30, 120)
}
