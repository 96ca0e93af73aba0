//! Dice rolling sources.

use game_rules::DiceExpression;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of die rolls.
pub trait DiceRoller {
    /// Roll one die with `sides` faces, returning 1..=sides.
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Roll every die in an expression and add the bonus.
    ///
    /// The total saturates at `0..=u32::MAX`.
    fn roll(&mut self, dice: &DiceExpression) -> u32 {
        let rolled: u64 = (0..dice.count).map(|_| u64::from(self.roll_die(dice.sides))).sum();
        let total = i64::try_from(rolled).unwrap_or(i64::MAX).saturating_add(dice.bonus.into());
        u32::try_from(total.max(0)).unwrap_or(u32::MAX)
    }

    fn d20(&mut self) -> u32 {
        self.roll_die(20)
    }
}

/// Pseudo-random rolls, reproducible when seeded.
pub struct RandomRoller {
    rng: StdRng,
}

impl RandomRoller {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl DiceRoller for RandomRoller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.rng.random_range(1..=sides)
    }
}

/// Replays a fixed script of results, cycling when exhausted.
///
/// Each value is clamped to the die being rolled.
#[derive(Debug, Clone)]
pub struct SequenceRoller {
    script: Vec<u32>,
    next: usize,
}

impl SequenceRoller {
    pub fn new(script: impl Into<Vec<u32>>) -> Self {
        Self {
            script: script.into(),
            next: 0,
        }
    }
}

impl DiceRoller for SequenceRoller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if self.script.is_empty() || sides == 0 {
            return sides.min(1);
        }
        let value = self.script[self.next % self.script.len()];
        self.next += 1;
        value.clamp(1, sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_roller_cycles_and_clamps() {
        let mut roller = SequenceRoller::new(vec![3, 25]);
        assert_eq!(roller.roll_die(6), 3);
        assert_eq!(roller.roll_die(20), 20);
        assert_eq!(roller.roll_die(4), 3);
    }

    #[test]
    fn test_roll_expression() {
        let mut roller = SequenceRoller::new(vec![4, 2]);
        assert_eq!(roller.roll(&DiceExpression::new(2, 6, 1)), 7);
        assert_eq!(roller.roll(&DiceExpression::new(1, 4, -9)), 0);
    }

    #[test]
    fn test_roll_saturates_instead_of_wrapping() {
        let mut roller = SequenceRoller::new(vec![u32::MAX]);
        let huge = DiceExpression::new(3, u32::MAX, 0);
        assert_eq!(roller.roll(&huge), u32::MAX);
        assert_eq!(roller.roll(&huge.with_bonus(-5)), u32::MAX);
        assert_eq!(roller.roll(&DiceExpression::new(1, 4, i32::MIN)), 0);
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let mut a = RandomRoller::seeded(7);
        let mut b = RandomRoller::seeded(7);
        let first: Vec<_> = (0..10).map(|_| a.d20()).collect();
        let second: Vec<_> = (0..10).map(|_| b.d20()).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|r| (1..=20).contains(r)));
    }
}
