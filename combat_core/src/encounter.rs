//! One combat encounter: the store plus everything that acts on it.
//!
//! The encounter owns its store exclusively. Rebuilding it for the next
//! fight goes through [`Encounter::create_encounter`] or [`Encounter::clear`].

use game_rules::{Allegiance, EntityId};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::ai::{AiEngine, Decision};
use crate::config::CombatConfig;
use crate::entity::CombatEntity;
use crate::error::CombatError;
use crate::query;
use crate::resolution::{ActionBridge, ActionResult, CombatRules, CombatantView};
use crate::store::EntityStore;
use crate::turn::TurnSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EncounterOutcome {
    Ongoing,
    /// No living enemies remain.
    Victory,
    /// No living player or ally remains.
    Defeat,
}

/// What one entity did on its turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub actor: EntityId,
    pub name: String,
    pub decision: Option<Decision>,
    pub result: ActionResult,
}

pub struct Encounter<R> {
    store: EntityStore,
    config: CombatConfig,
    engine: AiEngine,
    rules: R,
    round: u32,
}

impl<R: CombatRules> Encounter<R> {
    pub fn new(config: CombatConfig, rules: R) -> Self {
        let engine = AiEngine::new(config.ai.clone());
        Self {
            store: EntityStore::new(),
            config,
            engine,
            rules,
            round: 1,
        }
    }

    /// Replace whatever the store held with `entities`.
    pub fn create_encounter(&mut self, entities: impl IntoIterator<Item = CombatEntity>) {
        self.clear();
        for entity in entities {
            self.store.add(entity);
        }
        tracing::info!("Encounter: created with {} combatants", self.store.len());
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.round = 1;
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    /// Current round, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Living entities with a position, highest initiative first.
    ///
    /// Equal initiative keeps insertion order.
    pub fn initiative_order(&self) -> Vec<EntityId> {
        let mut order: Vec<(EntityId, i32)> = query::living_entities(&self.store)
            .into_iter()
            .filter_map(|e| e.position.map(|p| (e.id, p.initiative)))
            .collect();
        order.sort_by(|a, b| b.1.cmp(&a.1));
        order.into_iter().map(|(id, _)| id).collect()
    }

    /// Let the AI pick and carry out a turn for `id`.
    pub fn decide_and_execute_turn(&mut self, id: EntityId) -> ActionResult {
        self.take_turn(id).result
    }

    fn take_turn(&mut self, id: EntityId) -> TurnReport {
        let (name, decision) = match self.prepare_turn(id) {
            Ok(prepared) => prepared,
            Err(err) => {
                let name = self.store.get(id).map(|e| e.name()).unwrap_or_default();
                tracing::warn!("Encounter: turn refused for {}: {}", id, err);
                return TurnReport {
                    actor: id,
                    name,
                    decision: None,
                    result: err.into(),
                };
            }
        };

        let result = ActionBridge::execute(&mut self.store, &mut self.rules, id, &decision);
        tracing::info!(
            "Round {}: {} -> {} ({})",
            self.round,
            name,
            decision.intent,
            result.message()
        );
        TurnSystem::process_death_system(&mut self.store);

        TurnReport {
            actor: id,
            name,
            decision: Some(decision),
            result,
        }
    }

    fn prepare_turn(&self, id: EntityId) -> Result<(String, Decision), CombatError> {
        let entity = self.store.get(id).ok_or(CombatError::EntityNotFound(id))?;
        let name = entity.name();
        let has_hp = entity.stats.as_ref().map_or(true, |s| s.current_hp > 0);
        if !entity.is_alive() || !has_hp {
            return Err(CombatError::Incapacitated(name));
        }
        let decision = self
            .engine
            .decide(&self.store, id)
            .ok_or_else(|| CombatError::NotAiControlled(name.clone()))?;
        Ok((name, decision))
    }

    /// Close the round: expire turn-scoped conditions, restore resources
    /// and sweep the dead.
    pub fn advance_turn(&mut self) {
        TurnSystem::expire_turn_scoped_conditions(&mut self.store);
        TurnSystem::reset_actions_for_new_turn(&mut self.store);
        TurnSystem::process_death_system(&mut self.store);
        self.round += 1;
    }

    pub fn outcome(&self) -> EncounterOutcome {
        let standing = |category| !query::living_in_category(&self.store, category).is_empty();
        let friendly = standing(Allegiance::Player) || standing(Allegiance::Ally);
        let hostile = standing(Allegiance::Enemy);
        match (friendly, hostile) {
            (false, _) => EncounterOutcome::Defeat,
            (true, false) => EncounterOutcome::Victory,
            (true, true) => EncounterOutcome::Ongoing,
        }
    }

    /// Every living AI entity acts once in initiative order, then the turn
    /// advances. Stops early once the encounter is decided.
    pub fn run_round(&mut self) -> Vec<TurnReport> {
        tracing::info!("Encounter: round {} begins", self.round);
        let mut reports = Vec::new();
        for id in self.initiative_order() {
            if self.outcome() != EncounterOutcome::Ongoing {
                break;
            }
            let acts = self
                .store
                .get(id)
                .is_some_and(|e| e.is_alive() && e.ai.is_some());
            if acts {
                reports.push(self.take_turn(id));
            }
        }
        self.advance_turn();
        reports
    }

    /// Run rounds until the encounter is decided or the round cap is hit.
    pub fn run_until_resolved(&mut self) -> EncounterOutcome {
        while self.outcome() == EncounterOutcome::Ongoing && self.round <= self.config.max_rounds {
            self.run_round();
        }
        let outcome = self.outcome();
        tracing::info!("Encounter: {} after {} rounds", outcome, self.round - 1);
        outcome
    }

    pub fn snapshot(&self) -> Vec<CombatantView> {
        self.store.iter().map(CombatantView::from).collect()
    }

    pub fn snapshot_json(&self) -> Result<String, CombatError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}
