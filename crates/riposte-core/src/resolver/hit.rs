//! Hit chance and the hit roll.
//!
//! The chance is an additive accumulator. It starts from the attacker's
//! modifier seed ([`attack_modifiers`], plus backstab chance when the
//! target's back is exposed) and gains one term per formula, in order:
//!
//! | Term | Built-in | Override key |
//! |------|----------|--------------|
//! | armor | [`armor_to_hit`] | [`names::ARMOR_TO_HIT`] |
//! | adrenaline | [`adrenaline_rush_to_hit`] | [`names::ADRENALINE_RUSH_TO_HIT`] |
//! | enchantment | [`enchantment_to_hit`] | [`names::ENCHANTMENT_TO_HIT`] |
//! | stats | [`stats_to_hit`] | [`names::STATS_TO_HIT`] |
//! | target luck | [`luck_to_hit`] | [`names::LUCK_TO_HIT`] |
//! | dodge | [`skills_to_hit`] | [`names::SKILLS_TO_HIT`] |
//! | biography | [`biography_to_hit`] | [`names::BIOGRAPHY_TO_HIT`] |
//!
//! The total is clamped to the configured bounds (`[3, 97]` by default)
//! before the roll.

use rand::RngCore;
use tracing::debug;

use crate::config::HitConfig;
use crate::dice;
use crate::entity::{Combatant, ProficiencyFlags, Race, Skill};
use crate::item::{BodyRegion, SwingDirection, Weapon};
use crate::registry::names;

use super::Rules;

// =============================================================================
// Modifier seed
// =============================================================================

/// Flat modifiers the attacker brings to both the hit roll and the damage
/// roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackModifiers {
    /// Seed for the hit-chance accumulator.
    pub to_hit: i32,
    /// Added to the rolled damage.
    pub damage: i32,
}

/// Computes the attacker's modifier seed for `weapon` (`None` for unarmed
/// and natural attacks).
///
/// - Weapon skill (hand-to-hand when unarmed) seeds the hit chance
/// - Expert proficiency adds `level / 3 + 1` to both
/// - Protagonist racial bonuses apply only when armed
/// - Swing direction applies only to armed melee attacks
#[must_use]
pub fn attack_modifiers(
    attacker: &dyn Combatant,
    weapon: Option<&Weapon>,
    swing: SwingDirection,
) -> AttackModifiers {
    let skill = weapon.map_or(Skill::HandToHand, |w| w.archetype.skill());
    let mut modifiers = AttackModifiers {
        to_hit: attacker.skills().get(skill),
        damage: 0,
    };

    let proficiency = weapon.map_or(ProficiencyFlags::HAND_TO_HAND, |w| w.archetype.proficiency());
    if attacker.career().is_expert(proficiency) {
        let bonus = attacker.level() / 3 + 1;
        modifiers.to_hit += bonus;
        modifiers.damage += bonus;
    }

    if let Some(weapon) = weapon {
        let racial = racial_bonus(attacker, weapon);
        modifiers.to_hit += racial;
        modifiers.damage += racial;

        if !weapon.archetype.is_ranged() {
            let (to_hit, damage) = swing.modifiers();
            modifiers.to_hit += to_hit;
            modifiers.damage += damage;
        }
    }

    modifiers
}

/// Protagonist racial bonus for an armed attack.
fn racial_bonus(attacker: &dyn Combatant, weapon: &Weapon) -> i32 {
    if !attacker.is_protagonist() {
        return 0;
    }
    let level = attacker.level();
    let archery = weapon.archetype.is_ranged();
    match attacker.race() {
        Some(Race::DarkElf) => level / 4,
        Some(Race::WoodElf) if archery => level / 3,
        Some(Race::Redguard) if !archery => level / 3,
        _ => 0,
    }
}

// =============================================================================
// Built-in terms
// =============================================================================

/// Armor-derived term: a fixed value against the protagonist and humanoids,
/// the creature's armor class otherwise.
#[must_use]
pub fn armor_to_hit(config: &HitConfig, target: &dyn Combatant, _region: BodyRegion) -> i32 {
    match target.monster() {
        Some(traits) => traits.armor_class,
        None => config.humanoid_armor_to_hit,
    }
}

/// Adrenaline term: a badly hurt attacker with the rush hits harder, a badly
/// hurt target with the rush is harder to hit.
#[must_use]
pub fn adrenaline_rush_to_hit(
    config: &HitConfig,
    attacker: &dyn Combatant,
    target: &dyn Combatant,
) -> i32 {
    let rush = |combatant: &dyn Combatant| -> i32 {
        let career = combatant.career();
        let health = combatant.health();
        if career.adrenaline_rush && health.current < health.max / config.adrenaline_health_divisor
        {
            if career.improved_adrenaline_rush {
                config.improved_adrenaline_bonus
            } else {
                config.adrenaline_bonus
            }
        } else {
            0
        }
    };
    rush(attacker) - rush(target)
}

/// Enchantment term.
#[must_use]
pub fn enchantment_to_hit(attacker: &dyn Combatant, _target: &dyn Combatant) -> i32 {
    attacker.enchantment_to_hit()
}

/// Stat differentials: agility, luck and speed, each divided by 10.
#[must_use]
pub fn stats_to_hit(attacker: &dyn Combatant, target: &dyn Combatant) -> i32 {
    let a = attacker.stats();
    let t = target.stats();
    (a.agility - t.agility) / 10 + (a.luck - t.luck) / 10 + (a.speed - t.speed) / 10
}

/// Flat luck term for the target: lucky targets are harder to hit.
#[must_use]
pub fn luck_to_hit(target: &dyn Combatant) -> i32 {
    -(target.stats().luck - 50) / 10
}

/// Dodge term.
///
/// A protagonist defender subtracts a fraction of its dodge skill while every
/// other defender subtracts the full skill. The asymmetry is intentional.
#[must_use]
pub fn skills_to_hit(config: &HitConfig, _attacker: &dyn Combatant, target: &dyn Combatant) -> i32 {
    let dodge = target.skills().get(Skill::Dodging);
    if target.is_protagonist() {
        -(dodge / config.protagonist_dodge_divisor)
    } else {
        -dodge
    }
}

/// Biography term, read only from the protagonist side of the exchange.
#[must_use]
pub fn biography_to_hit(attacker: &dyn Combatant, target: &dyn Combatant) -> i32 {
    let mut term = 0;
    if attacker.is_protagonist() {
        term += attacker.biography().to_hit;
    }
    if target.is_protagonist() {
        term -= target.biography().avoid_hit;
    }
    term
}

/// Backstab chance, added to the seed when the target's back is exposed.
#[must_use]
pub fn backstab_chance(attacker: &dyn Combatant, _target: &dyn Combatant) -> i32 {
    attacker.skills().get(Skill::Backstabbing)
}

// =============================================================================
// Stage entry
// =============================================================================

/// Backstab chance, preferring an override.
#[must_use]
pub fn resolve_backstab_chance(
    rules: Rules<'_>,
    attacker: &dyn Combatant,
    target: &dyn Combatant,
) -> i32 {
    rules.pair_term(&names::BACKSTAB_CHANCE, attacker, target, || {
        backstab_chance(attacker, target)
    })
}

/// Accumulates every term onto `chance_to_hit_mod` and clamps the result.
///
/// Each term is looked up in the registry first.
#[must_use]
pub fn hit_chance(
    rules: Rules<'_>,
    attacker: &dyn Combatant,
    target: &dyn Combatant,
    chance_to_hit_mod: i32,
    region: BodyRegion,
) -> i32 {
    let config = &rules.config.hit;
    let mut chance = chance_to_hit_mod;

    chance += match rules.registry.target_region_term(&names::ARMOR_TO_HIT) {
        Some(f) => f(target, region),
        None => armor_to_hit(config, target, region),
    };
    chance += rules.pair_term(&names::ADRENALINE_RUSH_TO_HIT, attacker, target, || {
        adrenaline_rush_to_hit(config, attacker, target)
    });
    chance += rules.pair_term(&names::ENCHANTMENT_TO_HIT, attacker, target, || {
        enchantment_to_hit(attacker, target)
    });
    chance += rules.pair_term(&names::STATS_TO_HIT, attacker, target, || {
        stats_to_hit(attacker, target)
    });
    chance += rules.single_term(&names::LUCK_TO_HIT, target, || luck_to_hit(target));
    chance += rules.pair_term(&names::SKILLS_TO_HIT, attacker, target, || {
        skills_to_hit(config, attacker, target)
    });
    chance += rules.pair_term(&names::BIOGRAPHY_TO_HIT, attacker, target, || {
        biography_to_hit(attacker, target)
    });

    config.chance.clamp(chance)
}

/// Decides whether the attack connects.
///
/// A whole-stage override registered under [`names::SUCCESSFUL_HIT`] replaces
/// the accumulation and roll entirely. A missing attacker or target is a
/// miss.
pub fn calculate_successful_hit(
    rules: Rules<'_>,
    attacker: Option<&dyn Combatant>,
    target: Option<&dyn Combatant>,
    chance_to_hit_mod: i32,
    region: BodyRegion,
    rng: &mut dyn RngCore,
) -> bool {
    let (Some(attacker), Some(target)) = (attacker, target) else {
        return false;
    };

    if let Some(f) = rules.registry.successful_hit(&names::SUCCESSFUL_HIT) {
        return f(attacker, target, chance_to_hit_mod, region, rng);
    }

    let chance = hit_chance(rules, attacker, target, chance_to_hit_mod, region);
    let hit = dice::success_roll(rng, chance);
    debug!(
        target: "riposte::pipeline",
        attacker = ?attacker.id(),
        defender = ?target.id(),
        chance,
        hit,
        "hit roll"
    );
    hit
}
