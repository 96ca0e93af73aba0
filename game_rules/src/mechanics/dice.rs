//! Dice expressions such as `2d6+1`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::RulesError;

/// Largest dice count a parsed expression may carry.
pub const MAX_DICE: u32 = 1000;

/// A damage or healing expression: `count` dice of `sides` sides plus `bonus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpression {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
}

impl DiceExpression {
    pub fn new(count: u32, sides: u32, bonus: i32) -> Self {
        Self {
            count,
            sides,
            bonus,
        }
    }

    /// A flat value with no dice.
    pub fn flat(bonus: i32) -> Self {
        Self::new(0, 0, bonus)
    }

    /// Same dice with a different flat bonus.
    pub fn with_bonus(self, bonus: i32) -> Self {
        Self { bonus, ..self }
    }

    /// Parse `NdS`, `NdS+B`, `NdS-B`, `dS` or a bare integer.
    pub fn parse(input: &str) -> Result<Self, RulesError> {
        let text: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = || RulesError::InvalidDice(input.to_string());

        let Some((count, rest)) = text.split_once(['d', 'D']) else {
            let bonus = text.parse::<i32>().map_err(|_| invalid())?;
            return Ok(Self::flat(bonus));
        };

        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| invalid())?
        };
        if count > MAX_DICE {
            return Err(invalid());
        }

        let (sides, bonus) = match rest.find(['+', '-']) {
            Some(split) => {
                let (sides, bonus) = rest.split_at(split);
                let bonus = bonus
                    .trim_start_matches('+')
                    .parse::<i32>()
                    .map_err(|_| invalid())?;
                (sides, bonus)
            }
            None => (rest, 0),
        };

        let sides = sides.parse::<u32>().map_err(|_| invalid())?;
        if sides == 0 {
            return Err(invalid());
        }

        Ok(Self::new(count, sides, bonus))
    }

    /// Expected value: count × (sides + 1) / 2 + bonus.
    pub fn average(&self) -> f32 {
        self.count as f32 * (self.sides as f32 + 1.0) / 2.0 + self.bonus as f32
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "{}", self.bonus);
        }
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.bonus {
            0 => Ok(()),
            b if b > 0 => write!(f, "+{}", b),
            b => write!(f, "{}", b),
        }
    }
}

impl FromStr for DiceExpression {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DiceExpression {
    type Error = RulesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DiceExpression> for String {
    fn from(value: DiceExpression) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(DiceExpression::parse("2d6").unwrap(), DiceExpression::new(2, 6, 0));
        assert_eq!(DiceExpression::parse("1d8+3").unwrap(), DiceExpression::new(1, 8, 3));
        assert_eq!(DiceExpression::parse("1d4 - 1").unwrap(), DiceExpression::new(1, 4, -1));
        assert_eq!(DiceExpression::parse("d20").unwrap(), DiceExpression::new(1, 20, 0));
        assert_eq!(DiceExpression::parse("5").unwrap(), DiceExpression::flat(5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DiceExpression::parse("xd6").is_err());
        assert!(DiceExpression::parse("2d0").is_err());
        assert!(DiceExpression::parse("2d6+").is_err());
        assert!(DiceExpression::parse("").is_err());
        assert!(DiceExpression::parse("50000000d100").is_err());
        assert!(DiceExpression::parse("1000d6").is_ok());
    }

    #[test]
    fn test_average() {
        assert_eq!(DiceExpression::parse("1d8").unwrap().average(), 4.5);
        assert_eq!(DiceExpression::parse("2d6").unwrap().average(), 7.0);
        assert_eq!(DiceExpression::parse("1d6+2").unwrap().average(), 5.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceExpression::new(1, 8, 3).to_string(), "1d8+3");
        assert_eq!(DiceExpression::new(2, 4, -1).to_string(), "2d4-1");
        assert_eq!(DiceExpression::flat(4).to_string(), "4");
    }
}
