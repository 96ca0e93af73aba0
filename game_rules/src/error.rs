//! Errors raised while parsing or loading game content.

use thiserror::Error;

/// Errors produced by the game rules layer.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid dice expression '{0}'")]
    InvalidDice(String),

    #[error("failed to parse content: {0}")]
    Template(#[from] toml::de::Error),

    #[error("unknown spell '{0}'")]
    UnknownSpell(String),
}
