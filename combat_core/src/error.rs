//! Error types for the combat core.
//!
//! None of these abort a turn. The action bridge turns them into an invalid
//! [`crate::ActionResult`] whose reason is the error's display text.

use game_rules::EntityId;
use thiserror::Error;

use crate::ai::Intent;
use crate::components::ComponentKind;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("Unresolved intent: {0}")]
    UnknownIntent(String),

    #[error("Entity {entity} has no {kind} component")]
    MissingComponent { entity: EntityId, kind: ComponentKind },

    #[error("No target for {0}")]
    MissingTarget(Intent),

    #[error("No weapon available for {0}")]
    MissingWeapon(Intent),

    #[error("No spell available for {0}")]
    MissingSpell(Intent),

    #[error("{spell} cannot be used for {intent}")]
    SpellMismatch { spell: String, intent: Intent },

    #[error("{0} is not a living ally")]
    InvalidHelpTarget(String),

    #[error("{0} cannot act")]
    Incapacitated(String),

    #[error("{0} is not AI-controlled")]
    NotAiControlled(String),

    #[error("No {0} remaining")]
    ResourceSpent(&'static str),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
