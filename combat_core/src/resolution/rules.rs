//! Weapon and spell resolution.
//!
//! Resolution only reads the store and reports what happened. Applying the
//! damage or healing is left to the action bridge.

use game_rules::{Condition, EntityId, SpellCatalog, SpellRole, Weapon, WeaponCategory};

use super::dice::DiceRoller;
use crate::entity::CombatEntity;
use crate::store::EntityStore;

/// Result of a weapon attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    /// The attack was carried out (it may still have missed).
    pub success: bool,
    pub message: String,
    pub damage: u32,
}

impl AttackOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            damage: 0,
        }
    }
}

/// Result of casting a spell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellOutcome {
    pub success: bool,
    pub message: String,
    pub damage: Option<u32>,
    pub healing: Option<u32>,
    /// The caster now concentrates on this spell.
    pub concentration: bool,
}

impl SpellOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            damage: None,
            healing: None,
            concentration: false,
        }
    }
}

/// The resolution modules the action bridge delegates to.
pub trait CombatRules {
    fn resolve_weapon_attack(
        &mut self,
        store: &EntityStore,
        actor: EntityId,
        weapon_id: &str,
        target: EntityId,
    ) -> AttackOutcome;

    fn resolve_spell_cast(
        &mut self,
        store: &EntityStore,
        caster: EntityId,
        spell_id: &str,
        target: Option<EntityId>,
    ) -> SpellOutcome;
}

/// d20 rules: attack bonus against armor class, dice for damage.
pub struct StandardRules<R> {
    roller: R,
    spells: SpellCatalog,
}

impl<R: DiceRoller> StandardRules<R> {
    pub fn new(roller: R, spells: SpellCatalog) -> Self {
        Self { roller, spells }
    }

    pub fn spells(&self) -> &SpellCatalog {
        &self.spells
    }

    /// Roll a d20 with advantage (+1), disadvantage (-1) or neither (0).
    fn roll_d20(&mut self, edge: i32) -> u32 {
        let first = self.roller.d20();
        match edge.signum() {
            1 => first.max(self.roller.d20()),
            -1 => first.min(self.roller.d20()),
            _ => first,
        }
    }

    /// Attack roll against the target's AC. Returns (hit, critical, natural, total).
    fn attack_roll(&mut self, bonus: i32, edge: i32, armor_class: i32) -> (bool, bool, u32, i32) {
        let natural = self.roll_d20(edge);
        let total = natural as i32 + bonus;
        let critical = natural == 20;
        let hit = natural != 1 && (critical || total >= armor_class);
        (hit, critical, natural, total)
    }
}

fn attack_edge(actor: &CombatEntity, target: &CombatEntity, weapon: &Weapon, distance: u32) -> i32 {
    let mut edge = 0;
    if actor.status.has_condition(Condition::Helped) {
        edge += 1;
    }
    if target.status.has_condition(Condition::Dodging) {
        edge -= 1;
    }
    if weapon.category == WeaponCategory::Ranged
        && weapon.normal_range.is_some_and(|normal| distance > normal)
    {
        edge -= 1;
    }
    edge
}

/// Add an ability modifier to a rolled total, saturating at `0..=u32::MAX`.
fn with_modifier(rolled: u32, modifier: i32) -> u32 {
    let total = i64::from(rolled) + i64::from(modifier);
    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}

impl<R: DiceRoller> CombatRules for StandardRules<R> {
    fn resolve_weapon_attack(
        &mut self,
        store: &EntityStore,
        actor_id: EntityId,
        weapon_id: &str,
        target_id: EntityId,
    ) -> AttackOutcome {
        let Some(actor) = store.get(actor_id) else {
            return AttackOutcome::failed(format!("Entity {} not found", actor_id));
        };
        let Some(target) = store.get(target_id) else {
            return AttackOutcome::failed(format!("Entity {} not found", target_id));
        };
        let Some(weapon) = actor.weapons.as_ref().and_then(|w| w.get(weapon_id)) else {
            return AttackOutcome::failed(format!("{} has no weapon '{}'", actor.name(), weapon_id));
        };
        let (Some(stats), Some(target_stats)) = (&actor.stats, &target.stats) else {
            return AttackOutcome::failed("Attacker and target both need stats");
        };
        let Some(distance) = actor.distance_to(target) else {
            return AttackOutcome::failed("Attacker and target must be on the grid");
        };
        if distance > weapon.max_range() {
            return AttackOutcome::failed(format!(
                "{} is out of range of {}'s {} ({} > {})",
                target.name(),
                actor.name(),
                weapon.name,
                distance,
                weapon.max_range()
            ));
        }

        let ability_mod = stats.modifier(weapon.attack_ability(&stats.abilities));
        let edge = attack_edge(actor, target, weapon, distance);
        let (hit, critical, natural, total) = self.attack_roll(
            ability_mod + stats.proficiency_bonus,
            edge,
            target_stats.armor_class,
        );

        if !hit {
            return AttackOutcome {
                success: true,
                message: format!(
                    "{} misses {} with {} (rolled {} -> {} vs AC {})",
                    stats.name,
                    target_stats.name,
                    weapon.name,
                    natural,
                    total,
                    target_stats.armor_class
                ),
                damage: 0,
            };
        }

        let mut rolled = self.roller.roll(&weapon.damage);
        if critical {
            rolled = rolled.saturating_add(self.roller.roll(&weapon.damage.with_bonus(0)));
        }
        let damage = with_modifier(rolled, ability_mod);

        AttackOutcome {
            success: true,
            message: format!(
                "{} {} {} with {} for {} {} damage",
                stats.name,
                if critical { "critically hits" } else { "hits" },
                target_stats.name,
                weapon.name,
                damage,
                weapon.damage_type
            ),
            damage,
        }
    }

    fn resolve_spell_cast(
        &mut self,
        store: &EntityStore,
        caster_id: EntityId,
        spell_id: &str,
        target_id: Option<EntityId>,
    ) -> SpellOutcome {
        let Some(caster) = store.get(caster_id) else {
            return SpellOutcome::failed(format!("Entity {} not found", caster_id));
        };
        if !caster.spells.as_ref().is_some_and(|s| s.knows(spell_id)) {
            return SpellOutcome::failed(format!("{} does not know '{}'", caster.name(), spell_id));
        }
        let spell = match self.spells.require(spell_id) {
            Ok(spell) => spell.clone(),
            Err(err) => return SpellOutcome::failed(err.to_string()),
        };
        let Some(stats) = &caster.stats else {
            return SpellOutcome::failed(format!("{} has no stats", caster.name()));
        };
        let casting_mod = stats.spellcasting_ability.map_or(0, |a| stats.modifier(a));

        let target = match (spell.role, target_id) {
            (_, Some(id)) => match store.get(id) {
                Some(target) => target,
                None => return SpellOutcome::failed(format!("Entity {} not found", id)),
            },
            (SpellRole::Damage, None) => {
                return SpellOutcome::failed(format!("{} needs a target", spell.name));
            }
            (_, None) => caster,
        };

        if target.id != caster.id {
            let in_range = caster.distance_to(target).is_some_and(|d| d <= spell.range);
            if !in_range {
                return SpellOutcome::failed(format!(
                    "{} is out of range of {}",
                    target.name(),
                    spell.name
                ));
            }
        }

        let mut outcome = SpellOutcome {
            success: true,
            message: String::new(),
            damage: None,
            healing: None,
            concentration: spell.concentration,
        };

        match spell.role {
            SpellRole::Damage => {
                if spell.attack_roll {
                    let armor_class = target.stats.as_ref().map_or(10, |s| s.armor_class);
                    let edge = if target.status.has_condition(Condition::Dodging) { -1 } else { 0 };
                    let (hit, critical, natural, total) =
                        self.attack_roll(casting_mod + stats.proficiency_bonus, edge, armor_class);
                    if !hit {
                        outcome.damage = Some(0);
                        outcome.message = format!(
                            "{}'s {} misses {} (rolled {} -> {} vs AC {})",
                            stats.name, spell.name, target.name(), natural, total, armor_class
                        );
                        return outcome;
                    }
                    let mut damage = self.roller.roll(&spell.dice);
                    if critical {
                        damage = damage.saturating_add(self.roller.roll(&spell.dice.with_bonus(0)));
                    }
                    outcome.damage = Some(damage);
                } else {
                    outcome.damage = Some(self.roller.roll(&spell.dice));
                }
                outcome.message = format!(
                    "{} casts {} on {} for {} {} damage",
                    stats.name,
                    spell.name,
                    target.name(),
                    outcome.damage.unwrap_or(0),
                    spell.damage_type
                );
            }
            SpellRole::Healing => {
                let healing = with_modifier(self.roller.roll(&spell.dice), casting_mod);
                outcome.healing = Some(healing);
                outcome.message = format!(
                    "{} casts {} on {}, restoring {} HP",
                    stats.name,
                    spell.name,
                    target.name(),
                    healing
                );
            }
            SpellRole::Utility => {
                outcome.message = format!("{} casts {}", stats.name, spell.name);
            }
        }

        outcome
    }
}
