//! Tunable settings for encounters and the AI engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CombatError;

/// Thresholds the AI engine uses when reading a situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// An enemy at this distance or closer puts the actor in danger.
    pub danger_radius: u32,

    /// An enemy within speed + slack squares counts as reachable this turn.
    pub reach_slack: u32,

    /// Own HP fraction below which healing is considered.
    pub heal_self_threshold: f32,

    /// Ally HP fraction below which healing is considered.
    pub heal_ally_threshold: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            danger_radius: 2,
            reach_slack: 1,
            heal_self_threshold: 0.7,
            heal_ally_threshold: 0.5,
        }
    }
}

/// Encounter-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub ai: AiConfig,

    /// Rounds after which an unresolved encounter is abandoned.
    pub max_rounds: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            max_rounds: 50,
        }
    }
}

impl CombatConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, CombatError> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CombatError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CombatError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CombatConfig::default();
        assert_eq!(config.ai.danger_radius, 2);
        assert_eq!(config.ai.reach_slack, 1);
        assert_eq!(config.max_rounds, 50);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CombatConfig::from_toml_str(
            r#"
            max_rounds = 10

            [ai]
            danger_radius = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.max_rounds, 10);
        assert_eq!(config.ai.danger_radius, 3);
        assert_eq!(config.ai.heal_self_threshold, 0.7);
    }

    #[test]
    fn test_invalid_toml() {
        let err = CombatConfig::from_toml_str("max_rounds = \"many\"").unwrap_err();
        assert!(matches!(err, CombatError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CombatConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
