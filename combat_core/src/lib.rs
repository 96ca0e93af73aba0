//! # Combat Core
//!
//! Turn-based tactical combat for The Cortex. Combatants are component
//! bundles in an [`EntityStore`]; the [`query`] layer derives who is alive
//! and who fights whom, the [`TurnSystem`] handles turn boundaries, the
//! [`AiEngine`] scores candidate intents, and the [`ActionBridge`] carries a
//! decision out. [`Encounter`] ties them together for one fight.
//!
//! Everything here is single-threaded and synchronous. An encounter owns its
//! store outright.

pub mod ai;
pub mod components;
pub mod config;
pub mod encounter;
pub mod entity;
pub mod error;
pub mod factory;
pub mod query;
pub mod resolution;
pub mod store;
pub mod turn;

#[cfg(test)]
mod test_support;

pub use ai::{decide_action, AiEngine, Decision, Intent};
pub use components::*;
pub use config::{AiConfig, CombatConfig};
pub use encounter::{Encounter, EncounterOutcome, TurnReport};
pub use entity::CombatEntity;
pub use error::CombatError;
pub use resolution::{
    ActionBridge, ActionResult, CombatRules, CombatantView, DiceRoller, RandomRoller,
    SequenceRoller, StandardRules,
};
pub use store::EntityStore;
pub use turn::TurnSystem;
