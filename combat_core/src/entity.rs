//! The combat entity: an id plus the components it carries.

use game_rules::{Allegiance, EntityId};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::components::{
    ActionsComponent, AiComponent, ComponentKind, PlayerComponent, PositionComponent,
    SpellsComponent, StatsComponent, StatusComponent, WeaponsComponent,
};

/// A combat participant.
///
/// Status is mandatory; every other component is optional and its presence
/// is what makes an entity able to move, attack, cast or think.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEntity {
    pub id: EntityId,
    pub status: StatusComponent,
    pub stats: Option<StatsComponent>,
    pub position: Option<PositionComponent>,
    pub actions: Option<ActionsComponent>,
    pub weapons: Option<WeaponsComponent>,
    pub spells: Option<SpellsComponent>,
    pub ai: Option<AiComponent>,
    pub player: Option<PlayerComponent>,
}

impl CombatEntity {
    /// Create a bare entity with only a status.
    pub fn new(id: EntityId, category: Allegiance) -> Self {
        Self {
            id,
            status: StatusComponent::new(category),
            stats: None,
            position: None,
            actions: None,
            weapons: None,
            spells: None,
            ai: None,
            player: None,
        }
    }

    pub fn with_stats(mut self, stats: StatsComponent) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_position(mut self, position: PositionComponent) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_actions(mut self, actions: ActionsComponent) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn with_weapons(mut self, weapons: WeaponsComponent) -> Self {
        self.weapons = Some(weapons);
        self
    }

    pub fn with_spells(mut self, spells: SpellsComponent) -> Self {
        self.spells = Some(spells);
        self
    }

    pub fn with_ai(mut self, ai: AiComponent) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_player(mut self) -> Self {
        self.player = Some(PlayerComponent);
        self
    }

    /// Whether the entity carries a component of the given kind.
    pub fn has(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Stats => self.stats.is_some(),
            ComponentKind::Position => self.position.is_some(),
            ComponentKind::Actions => self.actions.is_some(),
            ComponentKind::Status => true,
            ComponentKind::Weapons => self.weapons.is_some(),
            ComponentKind::Spells => self.spells.is_some(),
            ComponentKind::Ai => self.ai.is_some(),
            ComponentKind::Player => self.player.is_some(),
        }
    }

    /// Every component kind present, in declaration order.
    pub fn component_kinds(&self) -> Vec<ComponentKind> {
        ComponentKind::iter().filter(|k| self.has(*k)).collect()
    }

    pub fn category(&self) -> Allegiance {
        self.status.category
    }

    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    /// Name from stats, or the id when there are none.
    pub fn name(&self) -> String {
        self.stats
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Manhattan distance, if both entities are placed on the grid.
    pub fn distance_to(&self, other: &CombatEntity) -> Option<u32> {
        let a = self.position.as_ref()?;
        let b = other.position.as_ref()?;
        Some(a.distance_to(b))
    }
}
