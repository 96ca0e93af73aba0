//! Turn boundary bookkeeping: resource resets and the death sweep.
//!
//! Stateless; everything lives in the store. Entities missing the components
//! an operation needs are skipped.

use game_rules::EntityId;

use crate::store::EntityStore;

pub struct TurnSystem;

impl TurnSystem {
    /// Restore movement and the three action flags for every entity that has
    /// both stats and actions.
    pub fn reset_actions_for_new_turn(store: &mut EntityStore) {
        let mut reset = 0usize;
        for entity in store.iter_mut() {
            if let (Some(stats), Some(actions)) = (&entity.stats, &mut entity.actions) {
                actions.reset(stats.base_speed);
                reset += 1;
            }
        }
        tracing::debug!("TurnSystem: reset resources for {} entities", reset);
    }

    /// Drop conditions that only last until the next round.
    pub fn expire_turn_scoped_conditions(store: &mut EntityStore) {
        for entity in store.iter_mut() {
            entity.status.clear_turn_scoped();
        }
    }

    /// Mark entities at 0 HP as dead and inactive.
    ///
    /// Returns the entities that died in this sweep; running it again
    /// returns nothing and changes nothing.
    pub fn process_death_system(store: &mut EntityStore) -> Vec<EntityId> {
        let mut died = Vec::new();
        for entity in store.iter_mut() {
            let Some(stats) = &entity.stats else {
                continue;
            };
            if stats.current_hp <= 0 && !entity.status.is_dead {
                entity.status.is_dead = true;
                entity.status.is_active = false;
                entity.status.concentration = None;
                tracing::info!("{} has fallen", stats.name);
                died.push(entity.id);
            }
        }
        died
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ActionsComponent, StatsComponent};
    use crate::entity::CombatEntity;
    use game_rules::{AbilityScores, Allegiance, Condition};

    fn stats(hp: i32, speed: u32) -> StatsComponent {
        StatsComponent {
            name: "Bandit".to_string(),
            max_hp: 11,
            current_hp: hp,
            armor_class: 12,
            base_speed: speed,
            level: 1,
            proficiency_bonus: 2,
            abilities: AbilityScores::default(),
            spellcasting_ability: None,
        }
    }

    fn spent_actions() -> ActionsComponent {
        ActionsComponent {
            movement: 0,
            action: false,
            bonus_action: false,
            reaction: false,
            catalog: vec!["attack".to_string()],
        }
    }

    #[test]
    fn test_reset_restores_resources() {
        let mut store = EntityStore::new();
        let full = CombatEntity::new(EntityId::new(), Allegiance::Enemy)
            .with_stats(stats(11, 6))
            .with_actions(spent_actions());
        let no_stats = CombatEntity::new(EntityId::new(), Allegiance::Enemy)
            .with_actions(spent_actions());
        let (full_id, no_stats_id) = (full.id, no_stats.id);
        store.add(full);
        store.add(no_stats);

        TurnSystem::reset_actions_for_new_turn(&mut store);

        let actions = store.get(full_id).unwrap().actions.as_ref().unwrap();
        assert_eq!(actions.movement, 6);
        assert!(actions.action && actions.bonus_action && actions.reaction);
        assert_eq!(actions.catalog, vec!["attack".to_string()]);

        let untouched = store.get(no_stats_id).unwrap().actions.as_ref().unwrap();
        assert_eq!(untouched, &spent_actions());
    }

    #[test]
    fn test_death_sweep_is_idempotent() {
        let mut store = EntityStore::new();
        let dying = CombatEntity::new(EntityId::new(), Allegiance::Enemy).with_stats(stats(0, 6));
        let healthy = CombatEntity::new(EntityId::new(), Allegiance::Enemy).with_stats(stats(5, 6));
        let dying_id = dying.id;
        store.add(dying);
        store.add(healthy);

        let died = TurnSystem::process_death_system(&mut store);
        assert_eq!(died, vec![dying_id]);
        let after_once: Vec<_> = store.all().to_vec();

        assert!(TurnSystem::process_death_system(&mut store).is_empty());
        assert_eq!(store.all(), after_once.as_slice());

        let status = &store.get(dying_id).unwrap().status;
        assert!(status.is_dead);
        assert!(!status.is_active);
    }

    #[test]
    fn test_entities_without_stats_never_die() {
        let mut store = EntityStore::new();
        store.add(CombatEntity::new(EntityId::new(), Allegiance::Enemy));
        assert!(TurnSystem::process_death_system(&mut store).is_empty());
    }

    #[test]
    fn test_turn_scoped_conditions_expire() {
        let mut store = EntityStore::new();
        let mut entity = CombatEntity::new(EntityId::new(), Allegiance::Ally);
        entity.status.add_condition(Condition::Dodging);
        entity.status.add_condition(Condition::Prone);
        let id = entity.id;
        store.add(entity);

        TurnSystem::expire_turn_scoped_conditions(&mut store);
        assert_eq!(store.get(id).unwrap().status.conditions, vec![Condition::Prone]);
    }
}
