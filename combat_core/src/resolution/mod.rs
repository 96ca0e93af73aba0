//! Action resolution bridge.
//!
//! Turns a [`Decision`] into a concrete effect on the store and reports it
//! as a uniform [`ActionResult`]. Weapon and spell resolution is delegated
//! to a [`CombatRules`] implementation; applying the results, spending
//! resources and moving on the grid happen here.

pub mod dice;
pub mod movement;
pub mod rules;
pub mod sync;

pub use dice::{DiceRoller, RandomRoller, SequenceRoller};
pub use rules::{AttackOutcome, CombatRules, SpellOutcome, StandardRules};
pub use sync::{sync_to_character, CombatantView};

use game_rules::{Condition, EntityId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ai::{Decision, Intent};
use crate::components::ComponentKind;
use crate::error::CombatError;
use crate::query;
use crate::store::EntityStore;
use movement::Heading;

/// Uniform result of executing an action.
///
/// Invalid results always carry at least one reason. Valid results carry
/// a description of what happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub valid: bool,
    pub reasons: Vec<String>,
    pub damage: Option<u32>,
    pub healing: Option<u32>,
}

impl ActionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            reasons: vec![message.into()],
            damage: None,
            healing: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reasons: vec![reason.into()],
            damage: None,
            healing: None,
        }
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_healing(mut self, healing: u32) -> Self {
        self.healing = Some(healing);
        self
    }

    /// The first reason, or an empty string.
    pub fn message(&self) -> &str {
        self.reasons.first().map(String::as_str).unwrap_or("")
    }
}

impl From<CombatError> for ActionResult {
    fn from(err: CombatError) -> Self {
        ActionResult::invalid(err.to_string())
    }
}

pub struct ActionBridge;

impl ActionBridge {
    /// Execute a decision for `actor`.
    pub fn execute<R: CombatRules + ?Sized>(
        store: &mut EntityStore,
        rules: &mut R,
        actor: EntityId,
        decision: &Decision,
    ) -> ActionResult {
        match Self::try_execute(store, rules, actor, decision) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("ActionBridge: {} failed: {}", decision.intent, err);
                err.into()
            }
        }
    }

    /// Execute an intent named by external data, such as a scripted turn.
    pub fn execute_tagged<R: CombatRules + ?Sized>(
        store: &mut EntityStore,
        rules: &mut R,
        actor: EntityId,
        tag: &str,
        target: Option<EntityId>,
        weapon: Option<String>,
        spell: Option<String>,
    ) -> ActionResult {
        let Ok(intent) = Intent::from_str(tag) else {
            tracing::warn!("ActionBridge: unresolved intent '{}'", tag);
            return CombatError::UnknownIntent(tag.to_string()).into();
        };
        let decision = Decision {
            intent,
            priority: 0,
            confidence: 0,
            rationale: format!("external {}", tag),
            target,
            weapon,
            spell,
        };
        Self::execute(store, rules, actor, &decision)
    }

    fn try_execute<R: CombatRules + ?Sized>(
        store: &mut EntityStore,
        rules: &mut R,
        actor_id: EntityId,
        decision: &Decision,
    ) -> Result<ActionResult, CombatError> {
        let actor = store
            .get(actor_id)
            .ok_or(CombatError::EntityNotFound(actor_id))?;
        if !actor.is_alive() {
            return Err(CombatError::Incapacitated(actor.name()));
        }
        let actions = actor.actions.as_ref().ok_or(CombatError::MissingComponent {
            entity: actor_id,
            kind: ComponentKind::Actions,
        })?;
        if decision.intent.requires_action() && !actions.action {
            return Err(CombatError::ResourceSpent("action"));
        }

        let intent = decision.intent;
        match intent {
            Intent::AttackMelee | Intent::AttackRanged => {
                Self::attack(store, rules, actor_id, decision)
            }
            Intent::CastDamageSpell | Intent::CastHealSpell => {
                Self::cast(store, rules, actor_id, decision)
            }
            Intent::Dodge => {
                let entity = entity_mut(store, actor_id)?;
                entity.status.add_condition(Condition::Dodging);
                spend_action(store, actor_id);
                Ok(ActionResult::success(format!(
                    "{} takes the Dodge action",
                    name_of(store, actor_id)
                )))
            }
            Intent::Dash => {
                let entity = entity_mut(store, actor_id)?;
                entity.status.add_condition(Condition::Dashing);
                let speed = entity.stats.as_ref().map_or(0, |s| s.base_speed);
                if let Some(actions) = entity.actions.as_mut() {
                    actions.movement += speed;
                }
                spend_action(store, actor_id);
                Ok(ActionResult::success(format!(
                    "{} dashes, gaining {} movement",
                    name_of(store, actor_id),
                    speed
                )))
            }
            Intent::Help => {
                let target = decision
                    .target
                    .or_else(|| query::nearest_ally(store, actor_id).map(|(a, _)| a.id))
                    .ok_or(CombatError::MissingTarget(intent))?;
                if !query::allies_of(store, actor_id).iter().any(|ally| ally.id == target) {
                    return Err(CombatError::InvalidHelpTarget(name_of(store, target)));
                }
                entity_mut(store, target)?
                    .status
                    .add_condition(Condition::Helped);
                spend_action(store, actor_id);
                Ok(ActionResult::success(format!(
                    "{} helps {}",
                    name_of(store, actor_id),
                    name_of(store, target)
                )))
            }
            Intent::MoveCloser | Intent::MoveAway => Self::reposition(store, actor_id, decision),
        }
    }

    fn attack<R: CombatRules + ?Sized>(
        store: &mut EntityStore,
        rules: &mut R,
        actor_id: EntityId,
        decision: &Decision,
    ) -> Result<ActionResult, CombatError> {
        let intent = decision.intent;
        let target_id = decision.target.ok_or(CombatError::MissingTarget(intent))?;
        let weapon = decision
            .weapon
            .as_deref()
            .ok_or(CombatError::MissingWeapon(intent))?;
        let target_position = store
            .get(target_id)
            .ok_or(CombatError::EntityNotFound(target_id))?
            .position;

        if intent == Intent::AttackMelee {
            if let Some(anchor) = target_position {
                approach(store, actor_id, (anchor.x, anchor.y), 1);
            }
        }

        let outcome = rules.resolve_weapon_attack(store, actor_id, weapon, target_id);
        if !outcome.success {
            return Ok(ActionResult::invalid(outcome.message));
        }

        spend_action(store, actor_id);
        entity_mut(store, actor_id)?
            .status
            .remove_condition(Condition::Helped);
        let dealt = apply_damage(store, target_id, outcome.damage);

        Ok(ActionResult::success(outcome.message).with_damage(dealt))
    }

    fn cast<R: CombatRules + ?Sized>(
        store: &mut EntityStore,
        rules: &mut R,
        actor_id: EntityId,
        decision: &Decision,
    ) -> Result<ActionResult, CombatError> {
        let intent = decision.intent;
        let spell = decision
            .spell
            .as_deref()
            .ok_or(CombatError::MissingSpell(intent))?;

        let outcome = rules.resolve_spell_cast(store, actor_id, spell, decision.target);
        if !outcome.success {
            return Ok(ActionResult::invalid(outcome.message));
        }
        let mismatched = match intent {
            Intent::CastDamageSpell => outcome.healing.is_some(),
            Intent::CastHealSpell => outcome.damage.is_some(),
            _ => false,
        };
        if mismatched {
            return Err(CombatError::SpellMismatch {
                spell: spell.to_string(),
                intent,
            });
        }

        spend_action(store, actor_id);
        if outcome.concentration {
            entity_mut(store, actor_id)?.status.concentration = Some(spell.to_string());
        }

        let recipient = decision.target.unwrap_or(actor_id);
        let mut result = ActionResult::success(outcome.message);
        if let Some(damage) = outcome.damage {
            result = result.with_damage(apply_damage(store, recipient, damage));
        }
        if let Some(healing) = outcome.healing {
            result = result.with_healing(apply_healing(store, recipient, healing));
        }
        Ok(result)
    }

    fn reposition(
        store: &mut EntityStore,
        actor_id: EntityId,
        decision: &Decision,
    ) -> Result<ActionResult, CombatError> {
        let intent = decision.intent;
        let movement = store
            .get(actor_id)
            .and_then(|e| e.actions.as_ref())
            .map_or(0, |a| a.movement);
        if movement == 0 {
            return Err(CombatError::ResourceSpent("movement"));
        }

        let anchor = match decision.target {
            Some(target) => store.get(target).and_then(|e| e.position),
            None => query::nearest_enemy(store, actor_id).and_then(|(e, _)| e.position),
        }
        .ok_or(CombatError::MissingTarget(intent))?;

        let moved = if intent == Intent::MoveCloser {
            approach(store, actor_id, (anchor.x, anchor.y), 1)
        } else {
            let moved = movement::step_relative(
                store,
                actor_id,
                (anchor.x, anchor.y),
                Heading::Away,
                movement,
                0,
            );
            spend_movement(store, actor_id, moved);
            moved
        };

        let name = name_of(store, actor_id);
        if moved == 0 {
            return Ok(ActionResult::invalid(format!("{} has no room to move", name)));
        }
        let verb = if intent == Intent::MoveCloser {
            "advances"
        } else {
            "retreats"
        };
        Ok(ActionResult::success(format!("{} {} {} squares", name, verb, moved)))
    }
}

fn entity_mut(
    store: &mut EntityStore,
    id: EntityId,
) -> Result<&mut crate::entity::CombatEntity, CombatError> {
    store.get_mut(id).ok_or(CombatError::EntityNotFound(id))
}

fn name_of(store: &EntityStore, id: EntityId) -> String {
    store
        .get(id)
        .map(|e| e.name())
        .unwrap_or_else(|| id.to_string())
}

/// Walk toward `anchor` with remaining movement, spending what was used.
fn approach(store: &mut EntityStore, actor: EntityId, anchor: (i32, i32), stop_within: u32) -> u32 {
    let budget = store
        .get(actor)
        .and_then(|e| e.actions.as_ref())
        .map_or(0, |a| a.movement);
    let moved = movement::step_relative(store, actor, anchor, Heading::Toward, budget, stop_within);
    spend_movement(store, actor, moved);
    moved
}

fn spend_action(store: &mut EntityStore, id: EntityId) {
    if let Some(actions) = store.get_mut(id).and_then(|e| e.actions.as_mut()) {
        actions.action = false;
    }
}

fn spend_movement(store: &mut EntityStore, id: EntityId, squares: u32) {
    if let Some(actions) = store.get_mut(id).and_then(|e| e.actions.as_mut()) {
        actions.movement = actions.movement.saturating_sub(squares);
    }
}

fn apply_damage(store: &mut EntityStore, id: EntityId, amount: u32) -> u32 {
    store
        .get_mut(id)
        .and_then(|e| e.stats.as_mut())
        .map_or(0, |s| s.apply_damage(amount))
}

fn apply_healing(store: &mut EntityStore, id: EntityId, amount: u32) -> u32 {
    store
        .get_mut(id)
        .and_then(|e| e.stats.as_mut())
        .map_or(0, |s| s.apply_healing(amount))
}
