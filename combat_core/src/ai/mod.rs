//! Utility AI for computer-controlled combatants.
//!
//! A decision is a pure function of the store and the acting entity:
//!
//! 1. **Context**: read the situation ([`SituationContext`])
//! 2. **Candidates**: enumerate intents worth considering
//! 3. **Scoring**: priority (temperament) and confidence (situation)
//! 4. **Viability**: drop intents the actor lacks resources for
//! 5. **Selection**: maximise priority × confidence, first wins ties
//! 6. **Binding**: attach target, weapon and spell
//!
//! The engine never mutates the store.

pub mod binding;
pub mod context;
pub mod scoring;

pub use context::SituationContext;
pub use scoring::IntentScore;

use game_rules::{EntityId, SpellRole, WeaponCategory};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::config::AiConfig;
use crate::store::EntityStore;

const FALLBACK_SCORE: u32 = 10;

/// A candidate action the engine can choose.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    AttackMelee,
    AttackRanged,
    CastDamageSpell,
    CastHealSpell,
    MoveCloser,
    MoveAway,
    Dodge,
    Dash,
    Help,
}

impl Intent {
    /// Whether carrying this intent out spends the standard action.
    pub fn requires_action(&self) -> bool {
        !matches!(self, Intent::MoveCloser | Intent::MoveAway)
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, Intent::AttackMelee | Intent::AttackRanged)
    }

    pub fn is_spell(&self) -> bool {
        matches!(self, Intent::CastDamageSpell | Intent::CastHealSpell)
    }
}

/// The engine's output for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub intent: Intent,
    pub priority: u32,
    pub confidence: u32,
    pub rationale: String,
    pub target: Option<EntityId>,
    pub weapon: Option<String>,
    pub spell: Option<String>,
}

impl Decision {
    pub fn new(
        intent: Intent,
        priority: u32,
        confidence: u32,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            intent,
            priority,
            confidence,
            rationale: rationale.into(),
            target: None,
            weapon: None,
            spell: None,
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_weapon(mut self, weapon: impl Into<String>) -> Self {
        self.weapon = Some(weapon.into());
        self
    }

    pub fn with_spell(mut self, spell: impl Into<String>) -> Self {
        self.spell = Some(spell.into());
        self
    }
}

/// Decision engine with its situational thresholds.
#[derive(Debug, Clone, Default)]
pub struct AiEngine {
    config: AiConfig,
}

impl AiEngine {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Score every candidate intent, viable or not, in generation order.
    ///
    /// Returns `None` for unknown or non-AI entities.
    pub fn evaluate(
        &self,
        store: &EntityStore,
        actor: EntityId,
    ) -> Option<Vec<(IntentScore, bool)>> {
        let ctx = SituationContext::build(store, actor, &self.config)?;
        Some(
            scoring::candidates(&ctx)
                .into_iter()
                .map(|intent| {
                    (
                        IntentScore::evaluate(intent, &ctx),
                        scoring::is_viable(intent, &ctx),
                    )
                })
                .collect(),
        )
    }

    /// Choose what `actor` does this turn.
    ///
    /// Returns `None` when the entity is missing or not AI-controlled; the
    /// caller should treat it as a non-AI entity.
    pub fn decide(&self, store: &EntityStore, actor: EntityId) -> Option<Decision> {
        let ctx = SituationContext::build(store, actor, &self.config)?;
        let name = ctx.actor.name();

        tracing::debug!("AiEngine: {} ({}) deciding: {}", name, ctx.behavior, ctx.summary());

        let mut best: Option<IntentScore> = None;
        for intent in scoring::candidates(&ctx) {
            let score = IntentScore::evaluate(intent, &ctx);
            let viable = scoring::is_viable(intent, &ctx);

            tracing::debug!(
                "  {}: priority={} confidence={} value={} viable={}",
                intent,
                score.priority,
                score.confidence,
                score.value(),
                viable
            );

            if !viable {
                continue;
            }
            if best.map_or(true, |b| score.value() > b.value()) {
                best = Some(score);
            }
        }

        let decision = match best {
            Some(score) => {
                let rationale = format!(
                    "{} {}: priority {}, confidence {}; {}",
                    ctx.behavior,
                    score.intent,
                    score.priority,
                    score.confidence,
                    ctx.summary()
                );
                bind(
                    Decision::new(score.intent, score.priority, score.confidence, rationale),
                    &ctx,
                )
            }
            None => fallback(&ctx),
        };

        tracing::debug!(
            "AiEngine: {} chose {} (priority {}, confidence {})",
            name,
            decision.intent,
            decision.priority,
            decision.confidence
        );

        Some(decision)
    }
}

/// Decide with default thresholds.
pub fn decide_action(store: &EntityStore, actor: EntityId) -> Option<Decision> {
    AiEngine::default().decide(store, actor)
}

/// Safety net when nothing is viable: dodge if an action remains, else back off.
fn fallback(ctx: &SituationContext<'_>) -> Decision {
    let intent = if ctx.has_action {
        Intent::Dodge
    } else {
        Intent::MoveAway
    };
    tracing::warn!(
        "AiEngine: no viable intent for {}, falling back to {}",
        ctx.actor.name(),
        intent
    );
    Decision::new(
        intent,
        FALLBACK_SCORE,
        FALLBACK_SCORE,
        format!("fallback {}: no viable option; {}", intent, ctx.summary()),
    )
}

/// Attach execution details to the winning intent.
fn bind(decision: Decision, ctx: &SituationContext<'_>) -> Decision {
    let nearest_enemy = ctx.nearest_enemy.map(|(e, _)| e.id);

    match decision.intent {
        Intent::AttackMelee | Intent::AttackRanged => {
            let category = if decision.intent == Intent::AttackMelee {
                WeaponCategory::Melee
            } else {
                WeaponCategory::Ranged
            };
            let mut decision = decision;
            decision.target = nearest_enemy;
            decision.weapon = binding::weapon_for(ctx.actor, category);
            decision
        }
        Intent::CastDamageSpell => {
            let mut decision = decision;
            decision.target = nearest_enemy;
            decision.spell = binding::spell_for(ctx.actor, SpellRole::Damage);
            decision
        }
        Intent::CastHealSpell => {
            let target = binding::most_wounded(ctx);
            let mut decision = decision.with_target(target);
            decision.spell = binding::spell_for(ctx.actor, SpellRole::Healing);
            decision
        }
        Intent::Help => {
            let mut decision = decision;
            decision.target = ctx.nearest_ally.map(|(a, _)| a.id);
            decision
        }
        Intent::MoveCloser | Intent::MoveAway | Intent::Dodge | Intent::Dash => decision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use game_rules::{Allegiance, Behavior, SpellRole};
    use std::str::FromStr;

    #[test]
    fn test_intent_names() {
        assert_eq!(Intent::AttackMelee.to_string(), "attack_melee");
        assert_eq!(Intent::from_str("move_away").unwrap(), Intent::MoveAway);
        assert!(Intent::from_str("summon_dragon").is_err());
        let tag: &'static str = Intent::CastHealSpell.into();
        assert_eq!(tag, "cast_heal_spell");
    }

    #[test]
    fn test_non_ai_entities_get_no_decision() {
        let mut store = EntityStore::new();
        let hero = spawn(&mut store, combatant(Allegiance::Player, 0, 0));
        assert!(decide_action(&store, hero).is_none());
        assert!(decide_action(&store, EntityId::new()).is_none());
    }

    #[test]
    fn test_aggressive_attacks_adjacent_enemy_with_best_weapon() {
        let mut store = EntityStore::new();
        let orc = spawn(
            &mut store,
            ai_combatant(Behavior::Aggressive, 0, 0)
                .with_weapon(longsword())
                .with_weapon(greatsword()),
        );
        let hero = spawn(&mut store, combatant(Allegiance::Player, 1, 0));

        let decision = decide_action(&store, orc).unwrap();
        assert_eq!(decision.intent, Intent::AttackMelee);
        assert_eq!(decision.target, Some(hero));
        assert_eq!(decision.weapon.as_deref(), Some("greatsword"));
        assert!(decision.rationale.contains("attack_melee"));
    }

    #[test]
    fn test_aggressive_closes_distance_when_out_of_reach() {
        let mut store = EntityStore::new();
        let orc = spawn(
            &mut store,
            ai_combatant(Behavior::Aggressive, 0, 0).with_weapon(greatsword()),
        );
        spawn(&mut store, combatant(Allegiance::Player, 12, 0));

        let decision = decide_action(&store, orc).unwrap();
        assert_eq!(decision.intent, Intent::MoveCloser);
        assert!(decision.target.is_none());
        assert!(decision.weapon.is_none());
    }

    #[test]
    fn test_cowardly_wounded_flees() {
        let mut store = EntityStore::new();
        let kobold = spawn(
            &mut store,
            ai_combatant(Behavior::Cowardly, 0, 0)
                .with_hp(2, 10)
                .with_weapon(dagger()),
        );
        spawn(&mut store, combatant(Allegiance::Player, 1, 0));

        let decision = decide_action(&store, kobold).unwrap();
        assert!(matches!(decision.intent, Intent::MoveAway | Intent::Dodge));
        assert!(decision.priority >= 90);
        assert!(decision.confidence >= 70);
    }

    #[test]
    fn test_ranged_cannot_win_without_bow() {
        for behavior in [Behavior::Aggressive, Behavior::Tactical] {
            let mut store = EntityStore::new();
            let brute = spawn(&mut store, ai_combatant(behavior, 0, 0).with_weapon(greatsword()));
            spawn(&mut store, combatant(Allegiance::Player, 4, 0));

            let decision = decide_action(&store, brute).unwrap();
            assert_ne!(decision.intent, Intent::AttackRanged);
        }
    }

    #[test]
    fn test_tactical_archer_shoots_from_range() {
        let mut store = EntityStore::new();
        let archer = spawn(
            &mut store,
            ai_combatant(Behavior::Tactical, 0, 0)
                .with_weapon(dagger())
                .with_weapon(shortbow())
                .with_weapon(longbow()),
        );
        let hero = spawn(&mut store, combatant(Allegiance::Player, 5, 0));

        let decision = decide_action(&store, archer).unwrap();
        assert_eq!(decision.intent, Intent::AttackRanged);
        assert_eq!(decision.weapon.as_deref(), Some("longbow"));
        assert_eq!(decision.target, Some(hero));
    }

    #[test]
    fn test_tactical_retreats_when_in_danger() {
        let mut store = EntityStore::new();
        let archer = spawn(
            &mut store,
            ai_combatant(Behavior::Tactical, 0, 0).with_weapon(shortbow()),
        );
        spawn(&mut store, combatant(Allegiance::Player, 1, 0));

        let decision = decide_action(&store, archer).unwrap();
        assert_eq!(decision.intent, Intent::MoveAway);
    }

    #[test]
    fn test_no_action_never_picks_action_intent() {
        let behaviors = [
            Behavior::Aggressive,
            Behavior::Defensive,
            Behavior::Tactical,
            Behavior::Cowardly,
        ];
        for behavior in behaviors {
            for distance in [1, 3, 10] {
                let mut store = EntityStore::new();
                let actor = spawn(
                    &mut store,
                    ai_combatant(behavior, 0, 0)
                        .with_weapon(longsword())
                        .with_weapon(shortbow())
                        .with_spell("fire_bolt", SpellRole::Damage)
                        .with_hp(3, 10)
                        .without_action(),
                );
                spawn(&mut store, combatant(Allegiance::Player, distance, 0));
                spawn(&mut store, ai_combatant(Behavior::Aggressive, 0, 1));

                let decision = decide_action(&store, actor).unwrap();
                assert!(
                    !decision.intent.requires_action(),
                    "{} at {} chose {}",
                    behavior,
                    distance,
                    decision.intent
                );
            }
        }
    }

    #[test]
    fn test_fallbacks() {
        let mut store = EntityStore::new();
        let stuck = spawn(
            &mut store,
            ai_combatant(Behavior::Aggressive, 0, 0).without_movement().without_action(),
        );
        spawn(&mut store, combatant(Allegiance::Player, 1, 0));
        let decision = decide_action(&store, stuck).unwrap();
        assert_eq!(decision.intent, Intent::MoveAway);
        assert_eq!(decision.priority, FALLBACK_SCORE);
        assert!(decision.rationale.starts_with("fallback"));

        let mut store = EntityStore::new();
        let mut rooted = ai_combatant(Behavior::Aggressive, 0, 0).without_movement();
        rooted.entity.actions.as_mut().unwrap().action = true;
        let rooted = spawn(&mut store, rooted);
        let decision = decide_action(&store, rooted).unwrap();
        assert_ne!(decision.intent, Intent::MoveAway);
    }

    #[test]
    fn test_rooted_defender_dodges() {
        let mut store = EntityStore::new();
        let rooted = spawn(&mut store, ai_combatant(Behavior::Defensive, 0, 0).without_movement());
        spawn(&mut store, combatant(Allegiance::Player, 1, 0));

        let decision = decide_action(&store, rooted).unwrap();
        assert_eq!(decision.intent, Intent::Dodge);
        assert!(decision.priority > FALLBACK_SCORE);
    }

    #[test]
    fn test_healer_binds_spell_and_wounded_ally() {
        let mut store = EntityStore::new();
        let cleric = spawn(
            &mut store,
            ai_combatant(Behavior::Defensive, 0, 0)
                .with_spell("sacred_flame", SpellRole::Damage)
                .with_spell("cure_wounds", SpellRole::Healing),
        );
        let hurt = spawn(&mut store, ai_combatant(Behavior::Aggressive, 1, 0).with_hp(1, 10));
        spawn(&mut store, combatant(Allegiance::Player, 8, 0));

        let decision = decide_action(&store, cleric).unwrap();
        assert_eq!(decision.intent, Intent::CastHealSpell);
        assert_eq!(decision.target, Some(hurt));
        assert_eq!(decision.spell.as_deref(), Some("cure_wounds"));
    }

    #[test]
    fn test_spell_intents_follow_known_roles() {
        let mut store = EntityStore::new();
        let healer = spawn(
            &mut store,
            ai_combatant(Behavior::Tactical, 0, 0).with_spell("healing_word", SpellRole::Healing),
        );
        spawn(&mut store, combatant(Allegiance::Player, 5, 0).with_hp(3, 10));
        let decision = decide_action(&store, healer).unwrap();
        assert_ne!(decision.intent, Intent::CastDamageSpell);

        let mut store = EntityStore::new();
        let caster = spawn(
            &mut store,
            ai_combatant(Behavior::Defensive, 0, 0)
                .with_hp(4, 10)
                .with_spell("fire_bolt", SpellRole::Damage),
        );
        let hero = spawn(&mut store, combatant(Allegiance::Player, 5, 0));
        let decision = decide_action(&store, caster).unwrap();
        assert_ne!(decision.intent, Intent::CastHealSpell);
        if decision.intent == Intent::CastDamageSpell {
            assert_eq!(decision.spell.as_deref(), Some("fire_bolt"));
            assert_eq!(decision.target, Some(hero));
        }
    }

    #[test]
    fn test_decide_is_pure() {
        let mut store = EntityStore::new();
        let orc = spawn(
            &mut store,
            ai_combatant(Behavior::Aggressive, 0, 0).with_weapon(longsword()),
        );
        spawn(&mut store, combatant(Allegiance::Player, 1, 0));
        let before = store.all().to_vec();

        let first = decide_action(&store, orc).unwrap();
        let second = decide_action(&store, orc).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_evaluate_reports_viability() {
        let mut store = EntityStore::new();
        let orc = spawn(&mut store, ai_combatant(Behavior::Aggressive, 0, 0).without_action());
        spawn(&mut store, combatant(Allegiance::Player, 1, 0));

        let scores = AiEngine::default().evaluate(&store, orc).unwrap();
        let melee = scores
            .iter()
            .find(|(s, _)| s.intent == Intent::AttackMelee)
            .unwrap();
        assert!(!melee.1);
        let closer = scores
            .iter()
            .find(|(s, _)| s.intent == Intent::MoveCloser)
            .unwrap();
        assert!(closer.1);
    }
}
