//! The entity store owned by a single encounter.

use game_rules::EntityId;
use std::collections::HashMap;

use crate::entity::CombatEntity;

/// Insertion-ordered container of combat entities.
///
/// Iteration order is the order entities were first added. Replacing an
/// entity keeps its slot; removing one shifts later entities down.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<CombatEntity>,
    index: HashMap<EntityId, usize>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, replacing any entity with the same id in place.
    pub fn add(&mut self, entity: CombatEntity) {
        match self.index.get(&entity.id) {
            Some(&slot) => self.entities[slot] = entity,
            None => {
                self.index.insert(entity.id, self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    /// Replace by id; inserts when the id is unknown.
    pub fn update(&mut self, entity: CombatEntity) {
        self.add(entity);
    }

    /// Remove an entity, returning it if it was present.
    pub fn remove(&mut self, id: EntityId) -> Option<CombatEntity> {
        let slot = self.index.remove(&id)?;
        let removed = self.entities.remove(slot);
        for (i, entity) in self.entities.iter().enumerate().skip(slot) {
            self.index.insert(entity.id, i);
        }
        Some(removed)
    }

    pub fn get(&self, id: EntityId) -> Option<&CombatEntity> {
        self.index.get(&id).map(|&slot| &self.entities[slot])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut CombatEntity> {
        let slot = *self.index.get(&id)?;
        self.entities.get_mut(slot)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Read-only view of every entity in insertion order.
    pub fn all(&self) -> &[CombatEntity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEntity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CombatEntity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
    }
}
