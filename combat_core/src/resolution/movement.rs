//! Greedy grid movement relative to another square.

use game_rules::EntityId;

use crate::query;
use crate::store::EntityStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Toward,
    Away,
}

/// Move `mover` one square at a time toward or away from `anchor`.
///
/// Moving toward stops once within `stop_within` squares. Squares held by
/// living entities are never entered. Returns the number of squares moved.
pub fn step_relative(
    store: &mut EntityStore,
    mover: EntityId,
    anchor: (i32, i32),
    heading: Heading,
    budget: u32,
    stop_within: u32,
) -> u32 {
    let Some(start) = store.get(mover).and_then(|e| e.position) else {
        return 0;
    };

    let distance = |x: i32, y: i32| x.abs_diff(anchor.0) + y.abs_diff(anchor.1);
    let (mut x, mut y) = (start.x, start.y);
    let mut moved = 0;

    while moved < budget {
        let current = distance(x, y);
        if heading == Heading::Toward && current <= stop_within {
            break;
        }

        // Prefer the axis with the larger gap so paths look natural.
        let mut options = if x.abs_diff(anchor.0) >= y.abs_diff(anchor.1) {
            [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
        } else {
            [(x, y + 1), (x, y - 1), (x + 1, y), (x - 1, y)]
        }
        .into_iter()
        .filter(|&(nx, ny)| match heading {
            Heading::Toward => distance(nx, ny) < current,
            Heading::Away => distance(nx, ny) > current,
        })
        .filter(|&(nx, ny)| !(nx == anchor.0 && ny == anchor.1))
        .filter(|&(nx, ny)| !query::is_occupied(store, nx, ny, mover));

        let Some((nx, ny)) = options.next() else {
            break;
        };
        x = nx;
        y = ny;
        moved += 1;
    }

    if moved > 0 {
        if let Some(position) = store.get_mut(mover).and_then(|e| e.position.as_mut()) {
            position.x = x;
            position.y = y;
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use game_rules::{Allegiance, Behavior};

    fn position(store: &EntityStore, id: EntityId) -> (i32, i32) {
        let p = store.get(id).unwrap().position.unwrap();
        (p.x, p.y)
    }

    #[test]
    fn test_move_toward_stops_adjacent() {
        let mut store = EntityStore::new();
        let orc = spawn(&mut store, ai_combatant(Behavior::Aggressive, 0, 0));
        spawn(&mut store, combatant(Allegiance::Player, 4, 0));

        let moved = step_relative(&mut store, orc, (4, 0), Heading::Toward, 6, 1);
        assert_eq!(moved, 3);
        assert_eq!(position(&store, orc), (3, 0));
    }

    #[test]
    fn test_move_toward_respects_budget() {
        let mut store = EntityStore::new();
        let orc = spawn(&mut store, ai_combatant(Behavior::Aggressive, 0, 0));

        let moved = step_relative(&mut store, orc, (10, 0), Heading::Toward, 2, 1);
        assert_eq!(moved, 2);
        assert_eq!(position(&store, orc), (2, 0));
    }

    #[test]
    fn test_move_away_increases_distance() {
        let mut store = EntityStore::new();
        let kobold = spawn(&mut store, ai_combatant(Behavior::Cowardly, 1, 0));

        let moved = step_relative(&mut store, kobold, (0, 0), Heading::Away, 4, 0);
        assert_eq!(moved, 4);
        let (x, y) = position(&store, kobold);
        assert_eq!(x.abs() + y.abs(), 5);
    }

    #[test]
    fn test_blocked_squares_are_avoided() {
        let mut store = EntityStore::new();
        let orc = spawn(&mut store, ai_combatant(Behavior::Aggressive, 0, 0));
        spawn(&mut store, ai_combatant(Behavior::Aggressive, 1, 0));

        let moved = step_relative(&mut store, orc, (5, 0), Heading::Toward, 1, 1);
        assert_eq!(moved, 0);
        assert_eq!(position(&store, orc), (0, 0));
    }
}
