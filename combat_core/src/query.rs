//! Read-only queries over the entity store.
//!
//! Nothing here mutates the store. Results keep store iteration order, so
//! "nearest" ties go to whichever entity was added first.

use game_rules::{Allegiance, EntityId};

use crate::components::ComponentKind;
use crate::entity::CombatEntity;
use crate::store::EntityStore;

/// Entities carrying a component of the given kind.
pub fn with_component(store: &EntityStore, kind: ComponentKind) -> Vec<&CombatEntity> {
    store.iter().filter(|e| e.has(kind)).collect()
}

/// Entities carrying every listed component kind.
pub fn with_all_components<'a>(
    store: &'a EntityStore,
    kinds: &[ComponentKind],
) -> Vec<&'a CombatEntity> {
    store
        .iter()
        .filter(|e| kinds.iter().all(|k| e.has(*k)))
        .collect()
}

/// Active entities that are not dead.
pub fn living_entities(store: &EntityStore) -> Vec<&CombatEntity> {
    store.iter().filter(|e| e.is_alive()).collect()
}

/// Entities that are dead or inactive.
pub fn dead_entities(store: &EntityStore) -> Vec<&CombatEntity> {
    store.iter().filter(|e| !e.is_alive()).collect()
}

/// Living entities on the same side as `id`, excluding `id` itself.
///
/// Returns nothing when `id` is not in the store.
pub fn allies_of(store: &EntityStore, id: EntityId) -> Vec<&CombatEntity> {
    camp_filter(store, id, false)
}

/// Living entities on the opposing side of `id`.
pub fn enemies_of(store: &EntityStore, id: EntityId) -> Vec<&CombatEntity> {
    camp_filter(store, id, true)
}

fn camp_filter(store: &EntityStore, id: EntityId, hostile: bool) -> Vec<&CombatEntity> {
    let Some(source) = store.get(id) else {
        return Vec::new();
    };
    let camp = source.category();

    store
        .iter()
        .filter(|e| e.id != id && e.is_alive())
        .filter(|e| camp.is_hostile_to(e.category()) == hostile)
        .collect()
}

/// Living entities of one allegiance.
pub fn living_in_category(store: &EntityStore, category: Allegiance) -> Vec<&CombatEntity> {
    store
        .iter()
        .filter(|e| e.is_alive() && e.category() == category)
        .collect()
}

/// The living player entity, if any.
pub fn player(store: &EntityStore) -> Option<&CombatEntity> {
    store
        .iter()
        .find(|e| e.has(ComponentKind::Player) && e.is_alive())
}

/// Living entities controlled by the AI.
pub fn ai_controlled(store: &EntityStore) -> Vec<&CombatEntity> {
    store
        .iter()
        .filter(|e| e.has(ComponentKind::Ai) && e.is_alive())
        .collect()
}

/// Manhattan distance between two stored entities.
pub fn distance_between(store: &EntityStore, a: EntityId, b: EntityId) -> Option<u32> {
    store.get(a)?.distance_to(store.get(b)?)
}

/// Closest candidate to `from` along with its distance.
///
/// Candidates without a position are skipped. The first closest one wins.
pub fn nearest<'a>(
    from: &CombatEntity,
    candidates: &[&'a CombatEntity],
) -> Option<(&'a CombatEntity, u32)> {
    let mut best: Option<(&'a CombatEntity, u32)> = None;
    for candidate in candidates {
        let Some(distance) = from.distance_to(candidate) else {
            continue;
        };
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((*candidate, distance));
        }
    }
    best
}

/// Nearest living enemy of `id`.
pub fn nearest_enemy(store: &EntityStore, id: EntityId) -> Option<(&CombatEntity, u32)> {
    let source = store.get(id)?;
    nearest(source, &enemies_of(store, id))
}

/// Nearest living ally of `id`.
pub fn nearest_ally(store: &EntityStore, id: EntityId) -> Option<(&CombatEntity, u32)> {
    let source = store.get(id)?;
    nearest(source, &allies_of(store, id))
}

/// Whether a square is taken by a living entity other than `except`.
pub fn is_occupied(store: &EntityStore, x: i32, y: i32, except: EntityId) -> bool {
    store.iter().any(|e| {
        e.id != except
            && e.is_alive()
            && e.position.is_some_and(|p| p.x == x && p.y == y)
    })
}
