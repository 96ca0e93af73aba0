//! Candidate generation, scoring and viability for AI intents.
//!
//! Every candidate is scored on two independent axes:
//!
//! - **priority** (0-100): how much this creature's temperament wants it
//! - **confidence** (0-100): how well the current situation supports it
//!
//! The winner maximises `priority × confidence`.

use game_rules::Behavior;

use super::context::SituationContext;
use super::Intent;

const BASELINE: i32 = 50;
const HEAVY_PENALTY: i32 = 70;

/// Scores for one candidate intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentScore {
    pub intent: Intent,
    pub priority: u32,
    pub confidence: u32,
}

impl IntentScore {
    pub fn evaluate(intent: Intent, ctx: &SituationContext<'_>) -> Self {
        Self {
            intent,
            priority: priority(intent, ctx),
            confidence: confidence(intent, ctx),
        }
    }

    /// Selection value: priority × confidence.
    pub fn value(&self) -> u32 {
        self.priority * self.confidence
    }
}

/// Intents worth considering, in generation order.
///
/// Generation order matters: it breaks ties during selection.
pub fn candidates(ctx: &SituationContext<'_>) -> Vec<Intent> {
    let mut intents = Vec::with_capacity(9);

    if ctx.has_enemies() {
        intents.push(Intent::AttackMelee);
        intents.push(Intent::AttackRanged);
    }
    if ctx.has_damage_spells && ctx.has_enemies() {
        intents.push(Intent::CastDamageSpell);
    }
    if ctx.has_healing_spells && ctx.wants_healing() {
        intents.push(Intent::CastHealSpell);
    }
    intents.extend([
        Intent::MoveCloser,
        Intent::MoveAway,
        Intent::Dodge,
        Intent::Dash,
    ]);
    if ctx.has_allies() {
        intents.push(Intent::Help);
    }

    intents
}

/// Temperament-driven preference for an intent.
///
/// # Factors
///
/// - **aggressive**: attacking and closing in, never backing off
/// - **defensive**: dodging and healing, wary of melee
/// - **tactical**: ranged and spells; retreats or dodges when in danger
/// - **cowardly**: retreating and dodging, avoids melee
/// - wounded creatures value healing more; a badly hurt last survivor
///   values escape more
pub fn priority(intent: Intent, ctx: &SituationContext<'_>) -> u32 {
    use Intent::*;

    let mut score = BASELINE;

    score += match (ctx.behavior, intent) {
        (Behavior::Aggressive, AttackMelee) => 30,
        (Behavior::Aggressive, AttackRanged) => 15,
        (Behavior::Aggressive, CastDamageSpell) => 20,
        (Behavior::Aggressive, MoveCloser) => 20,
        (Behavior::Aggressive, Dash) => 10,
        (Behavior::Aggressive, MoveAway) => -30,
        (Behavior::Aggressive, Dodge) => -20,

        (Behavior::Defensive, Dodge) => 25,
        (Behavior::Defensive, CastHealSpell) => 30,
        (Behavior::Defensive, MoveAway) => 10,
        (Behavior::Defensive, Help) => 10,
        (Behavior::Defensive, AttackMelee) => -15,
        (Behavior::Defensive, MoveCloser) => -20,

        (Behavior::Tactical, AttackRanged) => 25,
        (Behavior::Tactical, CastDamageSpell) => 25,
        (Behavior::Tactical, Help) => 5,
        (Behavior::Tactical, MoveAway) if ctx.in_danger => 35,
        (Behavior::Tactical, Dodge) if ctx.in_danger => 25,

        (Behavior::Cowardly, MoveAway) => 40,
        (Behavior::Cowardly, Dodge) => 30,
        (Behavior::Cowardly, Dash) => 10,
        (Behavior::Cowardly, AttackMelee) => -30,
        (Behavior::Cowardly, MoveCloser) => -30,

        _ => 0,
    };

    if intent == CastHealSpell && ctx.hp_fraction < 0.5 {
        score += 20;
    }
    if intent == MoveAway && ctx.is_last_ally && ctx.hp_fraction < 0.5 {
        score += 10;
    }

    clamp(score)
}

/// Situational support for an intent.
///
/// # Factors
///
/// - melee needs an enemy within reach this turn and suffers in danger
/// - ranged needs a ranged weapon and prefers keeping distance
/// - damage spells need a known damage spell
/// - healing needs a known healing spell and someone badly hurt
/// - closing in helps when nothing is reachable yet
/// - retreating and dodging shine when an enemy is close
pub fn confidence(intent: Intent, ctx: &SituationContext<'_>) -> u32 {
    use Intent::*;

    let mut score = BASELINE;
    let enemy_distance = ctx.distance_to_nearest_enemy();

    match intent {
        AttackMelee => {
            score += if ctx.can_reach_enemy { 30 } else { -HEAVY_PENALTY };
            if ctx.in_danger {
                score -= 10;
            }
        }
        AttackRanged => {
            score += if ctx.has_ranged_options { 20 } else { -HEAVY_PENALTY };
            if enemy_distance.is_some_and(|d| d > ctx.config.danger_radius) {
                score += 20;
            }
        }
        CastDamageSpell => {
            score += if ctx.has_damage_spells { 20 } else { -HEAVY_PENALTY };
        }
        CastHealSpell => {
            if !ctx.has_healing_spells {
                score -= HEAVY_PENALTY;
            } else if ctx.hp_fraction < 0.5 || ctx.ally_needs_healing {
                score += 20;
            }
        }
        MoveCloser => {
            if !ctx.has_enemies() {
                score -= HEAVY_PENALTY;
            } else if !ctx.can_reach_enemy {
                score += 30;
            }
        }
        MoveAway => {
            if !ctx.has_enemies() {
                score -= HEAVY_PENALTY;
            } else if ctx.in_danger {
                score += 40;
            }
        }
        Dodge => {
            if ctx.in_danger {
                score += 30;
            }
        }
        Dash => {
            if ctx.has_enemies() && !ctx.can_reach_enemy {
                score += 10;
            }
        }
        Help => {
            if ctx.distance_to_nearest_ally().is_some_and(|d| d <= 1) {
                score += 10;
            }
        }
    }

    clamp(score)
}

/// Whether the actor has the resources and targets to attempt an intent.
pub fn is_viable(intent: Intent, ctx: &SituationContext<'_>) -> bool {
    use Intent::*;

    match intent {
        AttackMelee | AttackRanged => ctx.has_action && ctx.has_enemies(),
        CastDamageSpell => ctx.has_action && ctx.has_damage_spells && ctx.has_enemies(),
        CastHealSpell => ctx.has_action && ctx.has_healing_spells,
        Help => ctx.has_action && ctx.has_allies(),
        Dodge | Dash => ctx.has_action,
        MoveCloser | MoveAway => ctx.movement > 0,
    }
}

fn clamp(score: i32) -> u32 {
    score.clamp(0, 100) as u32
}
