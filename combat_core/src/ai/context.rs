//! Situational context for a single AI decision.
//!
//! The [`SituationContext`] is the blackboard the scoring functions read
//! from. It is built once per decision and never outlives the store borrow.

use game_rules::{Behavior, EntityId, SpellRole, WeaponCategory};

use crate::config::AiConfig;
use crate::entity::CombatEntity;
use crate::query;
use crate::store::EntityStore;

pub struct SituationContext<'a> {
    /// The entity making the decision.
    pub actor: &'a CombatEntity,
    pub behavior: Behavior,

    /// Living allies, excluding the actor.
    pub allies: Vec<&'a CombatEntity>,
    /// Living enemies.
    pub enemies: Vec<&'a CombatEntity>,

    pub hp: i32,
    pub hp_fraction: f32,

    pub nearest_enemy: Option<(&'a CombatEntity, u32)>,
    pub nearest_ally: Option<(&'a CombatEntity, u32)>,

    /// An enemy is within the danger radius.
    pub in_danger: bool,
    /// The nearest enemy is within speed + slack squares.
    pub can_reach_enemy: bool,
    pub has_ranged_options: bool,
    pub has_damage_spells: bool,
    pub has_healing_spells: bool,
    /// No living allies remain besides the actor.
    pub is_last_ally: bool,
    /// Some ally is below the ally heal threshold.
    pub ally_needs_healing: bool,

    /// Remaining movement this turn.
    pub movement: u32,
    /// Standard action still available.
    pub has_action: bool,

    pub config: &'a AiConfig,
}

impl<'a> SituationContext<'a> {
    /// Build the context for an AI-controlled entity.
    ///
    /// Returns `None` when the entity is missing or has no AI component.
    pub fn build(
        store: &'a EntityStore,
        actor_id: EntityId,
        config: &'a AiConfig,
    ) -> Option<Self> {
        let actor = store.get(actor_id)?;
        let behavior = actor.ai?.behavior;

        let allies = query::allies_of(store, actor_id);
        let enemies = query::enemies_of(store, actor_id);

        let (hp, hp_fraction) = actor
            .stats
            .as_ref()
            .map(|s| (s.current_hp, s.hp_fraction()))
            .unwrap_or((0, 1.0));

        let nearest_enemy = query::nearest(actor, &enemies);
        let nearest_ally = query::nearest(actor, &allies);

        let (movement, has_action) = actor
            .actions
            .as_ref()
            .map(|a| (a.movement, a.action))
            .unwrap_or((0, false));

        let speed = if actor.actions.is_some() {
            movement
        } else {
            actor.stats.as_ref().map_or(0, |s| s.base_speed)
        };

        let enemy_distance = nearest_enemy.map(|(_, d)| d);
        let in_danger = enemy_distance.is_some_and(|d| d <= config.danger_radius);
        let can_reach_enemy = enemy_distance.is_some_and(|d| d <= speed + config.reach_slack);

        let has_ranged_options = actor.weapons.as_ref().is_some_and(|w| {
            w.weapons
                .iter()
                .any(|weapon| weapon.category == WeaponCategory::Ranged)
        });
        let knows = |role| actor.spells.as_ref().is_some_and(|s| s.has_role(role));
        let has_damage_spells = knows(SpellRole::Damage);
        let has_healing_spells = knows(SpellRole::Healing);

        let ally_needs_healing = allies.iter().any(|ally| {
            ally.stats
                .as_ref()
                .is_some_and(|s| s.hp_fraction() < config.heal_ally_threshold)
        });

        Some(Self {
            actor,
            behavior,
            is_last_ally: allies.is_empty(),
            allies,
            enemies,
            hp,
            hp_fraction,
            nearest_enemy,
            nearest_ally,
            in_danger,
            can_reach_enemy,
            has_ranged_options,
            has_damage_spells,
            has_healing_spells,
            ally_needs_healing,
            movement,
            has_action,
            config,
        })
    }

    pub fn distance_to_nearest_enemy(&self) -> Option<u32> {
        self.nearest_enemy.map(|(_, d)| d)
    }

    pub fn distance_to_nearest_ally(&self) -> Option<u32> {
        self.nearest_ally.map(|(_, d)| d)
    }

    pub fn has_enemies(&self) -> bool {
        !self.enemies.is_empty()
    }

    pub fn has_allies(&self) -> bool {
        !self.allies.is_empty()
    }

    /// Whether a healing spell is worth considering at all.
    pub fn wants_healing(&self) -> bool {
        self.hp_fraction < self.config.heal_self_threshold || self.ally_needs_healing
    }

    /// One-line description used in decision rationales.
    pub fn summary(&self) -> String {
        let enemy = match self.distance_to_nearest_enemy() {
            Some(d) if self.in_danger => format!("enemy at {} (in danger)", d),
            Some(d) => format!("enemy at {}", d),
            None => "no enemies".to_string(),
        };
        format!(
            "hp {:.0}%, {}, {} allies",
            self.hp_fraction * 100.0,
            enemy,
            self.allies.len()
        )
    }
}
