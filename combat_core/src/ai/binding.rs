//! Target, weapon and spell binding for a chosen intent.
//!
//! All selections are linear scans that keep the first maximal element, so
//! the outcome only depends on weapon order and store insertion order.

use game_rules::{EntityId, SpellRole, Weapon, WeaponCategory};

use super::context::SituationContext;
use crate::entity::CombatEntity;

/// Highest average damage melee weapon; first one wins ties.
pub fn best_melee_weapon(weapons: &[Weapon]) -> Option<&Weapon> {
    let mut best: Option<&Weapon> = None;
    for weapon in weapons.iter().filter(|w| w.category == WeaponCategory::Melee) {
        if best.map_or(true, |b| weapon.average_damage() > b.average_damage()) {
            best = Some(weapon);
        }
    }
    best
}

/// Longest normal range ranged weapon, then highest average damage.
pub fn best_ranged_weapon(weapons: &[Weapon]) -> Option<&Weapon> {
    let mut best: Option<&Weapon> = None;
    for weapon in weapons.iter().filter(|w| w.category == WeaponCategory::Ranged) {
        let better = match best {
            None => true,
            Some(b) => {
                let range = weapon.normal_range.unwrap_or(0);
                let best_range = b.normal_range.unwrap_or(0);
                range > best_range
                    || (range == best_range && weapon.average_damage() > b.average_damage())
            }
        };
        if better {
            best = Some(weapon);
        }
    }
    best
}

/// Weapon id for an attack intent.
pub fn weapon_for(actor: &CombatEntity, category: WeaponCategory) -> Option<String> {
    let weapons = &actor.weapons.as_ref()?.weapons;
    let weapon = match category {
        WeaponCategory::Melee => best_melee_weapon(weapons),
        WeaponCategory::Ranged => best_ranged_weapon(weapons),
    };
    weapon.map(|w| w.id.clone())
}

/// Id of the first known spell with the given role.
pub fn spell_for(actor: &CombatEntity, role: SpellRole) -> Option<String> {
    actor
        .spells
        .as_ref()?
        .first_with_role(role)
        .map(|s| s.id.clone())
}

/// The actor or a living ally with the lowest HP fraction. The actor wins ties.
pub fn most_wounded(ctx: &SituationContext<'_>) -> EntityId {
    let mut best = (ctx.actor.id, ctx.hp_fraction);
    for ally in &ctx.allies {
        if let Some(stats) = &ally.stats {
            let fraction = stats.hp_fraction();
            if fraction < best.1 {
                best = (ally.id, fraction);
            }
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;
    use crate::store::EntityStore;
    use crate::test_support::*;
    use game_rules::{Behavior, DiceExpression};

    #[test]
    fn test_melee_prefers_higher_average() {
        let weapons = vec![longsword(), greatsword(), shortbow()];
        assert_eq!(best_melee_weapon(&weapons).unwrap().id, "greatsword");
    }

    #[test]
    fn test_melee_tie_keeps_first() {
        let mut maul = greatsword();
        maul.id = "maul".to_string();
        let weapons = vec![greatsword(), maul];
        assert_eq!(best_melee_weapon(&weapons).unwrap().id, "greatsword");
    }

    #[test]
    fn test_ranged_prefers_range_then_damage() {
        let weapons = vec![shortbow(), longbow(), dagger()];
        assert_eq!(best_ranged_weapon(&weapons).unwrap().id, "longbow");

        let heavy = Weapon::ranged(
            "heavy_crossbow",
            "Heavy Crossbow",
            DiceExpression::new(1, 10, 0),
            16,
            64,
        );
        let weapons = vec![shortbow(), heavy];
        assert_eq!(best_ranged_weapon(&weapons).unwrap().id, "heavy_crossbow");
    }

    #[test]
    fn test_no_weapon_of_category() {
        let weapons = vec![dagger()];
        assert!(best_ranged_weapon(&weapons).is_none());
        assert!(best_melee_weapon(&[]).is_none());
    }

    #[test]
    fn test_most_wounded_ally() {
        let mut store = EntityStore::new();
        let healer = spawn(&mut store, ai_combatant(Behavior::Defensive, 0, 0).with_hp(6, 10));
        spawn(&mut store, ai_combatant(Behavior::Aggressive, 1, 0).with_hp(8, 10));
        let hurt = spawn(&mut store, ai_combatant(Behavior::Aggressive, 2, 0).with_hp(3, 10));
        let config = AiConfig::default();

        let ctx = SituationContext::build(&store, healer, &config).unwrap();
        assert_eq!(most_wounded(&ctx), hurt);
    }
}
