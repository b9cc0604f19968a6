//! Collateral effects of a damaging hit: poison, crippling and creature
//! side effects.
//!
//! Every function here only decides what should happen and returns
//! [`Infliction`]s; the pipeline applies them once the attack is fully
//! resolved.

use rand::{Rng, RngCore};

use crate::config::SpecialConfig;
use crate::dice;
use crate::entity::{
    Combatant, Disease, EffectFlags, Element, InflictFlags, Lycanthropy, MonsterCareer, Poison,
    StatusBundle, StatusEffect,
};
use crate::item::BodyRegion;
use crate::output::{CriticalStrike, Infliction};
use crate::registry::names;
use crate::tables;

use super::resistance::{resolve_saving_throw, SavingThrowRequest};
use super::Rules;

/// Fatigue a nymph's touch drains.
pub const NYMPH_FATIGUE_DRAIN: std::ops::RangeInclusive<i32> = 10..=30;

// =============================================================================
// Diseases and poison
// =============================================================================

/// Infects `target` with a random disease from `diseases` if it fails a
/// disease saving throw.
///
/// Only the protagonist catches diseases, and a level-one protagonist is
/// spared when the configuration says so.
pub fn inflict_disease(
    rules: Rules<'_>,
    target: &dyn Combatant,
    diseases: &[Disease],
    rng: &mut dyn RngCore,
) -> Option<Infliction> {
    if !target.is_protagonist() || diseases.is_empty() {
        return None;
    }
    if rules.config.special.spare_level_one && target.level() <= 1 {
        return None;
    }

    let request = SavingThrowRequest::new(Element::DiseaseOrPoison, EffectFlags::DISEASE);
    let percent = resolve_saving_throw(rules, &request, target, rng);
    if percent == 0 {
        return None;
    }
    let disease = diseases[rng.gen_range(0..diseases.len())];
    Some(Infliction::Status {
        bundle: StatusBundle::new(StatusEffect::Diseased(disease), percent),
        flags: InflictFlags::BYPASS_SAVING_THROWS | InflictFlags::SPECIAL_INFECTION,
    })
}

/// Delivers a weapon's `poison` to `target`, subject to a poison saving
/// throw.
pub fn inflict_poison(
    rules: Rules<'_>,
    target: &dyn Combatant,
    poison: Poison,
    rng: &mut dyn RngCore,
) -> Option<Infliction> {
    let request = SavingThrowRequest::new(Element::DiseaseOrPoison, EffectFlags::POISON);
    let percent = resolve_saving_throw(rules, &request, target, rng);
    (percent > 0).then(|| {
        Infliction::saved(StatusBundle::new(StatusEffect::Poisoned(poison), percent))
    })
}

fn inflict_paralysis(
    rules: Rules<'_>,
    target: &dyn Combatant,
    rng: &mut dyn RngCore,
) -> Option<Infliction> {
    if target.has_effect(&StatusEffect::Paralyzed) {
        return None;
    }
    let request = SavingThrowRequest::new(Element::Magic, EffectFlags::PARALYSIS);
    let percent = resolve_saving_throw(rules, &request, target, rng);
    (percent > 0).then(|| Infliction::saved(StatusBundle::new(StatusEffect::Paralyzed, percent)))
}

// =============================================================================
// Crippling
// =============================================================================

/// A critical hit on a limb that deals at least `1 / divisor` of the
/// target's maximum health cripples it.
#[must_use]
pub fn crippling(
    config: &SpecialConfig,
    target: &dyn Combatant,
    region: BodyRegion,
    critical: &CriticalStrike,
    damage: i32,
) -> Option<Infliction> {
    let cripples = critical.success
        && region.is_crippleable()
        && damage > 0
        && damage * config.crippling_health_divisor >= target.health().max;
    cripples.then(|| Infliction::saved(StatusBundle::full(StatusEffect::Crippled(region))))
}

// =============================================================================
// Creature side effects
// =============================================================================

/// Built-in creature side table.
///
/// Rolled once per damaging hit by a creature attacker.
pub fn monster_hit_effects(
    rules: Rules<'_>,
    attacker: &dyn Combatant,
    target: &dyn Combatant,
    _damage: i32,
    rng: &mut dyn RngCore,
) -> Vec<Infliction> {
    let Some(career) = attacker.kind().monster_career() else {
        return Vec::new();
    };
    let infection_chance = rules.config.special.infection_chance;
    let mut effects = Vec::new();

    match career {
        MonsterCareer::Rat => {
            if dice::success_roll(rng, 5) {
                effects.extend(inflict_disease(rules, target, tables::DISEASE_LIST_B, rng));
            }
        }
        MonsterCareer::GiantBat => {
            if dice::success_roll(rng, 2) {
                effects.extend(inflict_disease(rules, target, tables::DISEASE_LIST_B, rng));
            }
        }
        MonsterCareer::Spider | MonsterCareer::GiantScorpion => {
            effects.extend(inflict_paralysis(rules, target, rng));
        }
        MonsterCareer::Werewolf | MonsterCareer::Wereboar => {
            let strain = if career == MonsterCareer::Werewolf {
                Lycanthropy::Werewolf
            } else {
                Lycanthropy::Wereboar
            };
            if target.is_protagonist() && dice::fractional_percent(rng) < infection_chance {
                effects.push(Infliction::infection(StatusBundle::full(
                    StatusEffect::Lycanthropy(strain),
                )));
            }
        }
        MonsterCareer::Nymph => {
            effects.push(Infliction::FatigueDrain(rng.gen_range(NYMPH_FATIGUE_DRAIN)));
        }
        MonsterCareer::Zombie => {
            if dice::success_roll(rng, 2) {
                effects.extend(inflict_disease(rules, target, tables::DISEASE_LIST_C, rng));
            }
        }
        MonsterCareer::Mummy => {
            if dice::success_roll(rng, 5) {
                effects.extend(inflict_disease(rules, target, tables::DISEASE_LIST_C, rng));
            }
        }
        MonsterCareer::Vampire | MonsterCareer::VampireAncient => {
            let roll = dice::fractional_percent(rng);
            if target.is_protagonist() && roll < infection_chance {
                effects.push(Infliction::infection(StatusBundle::full(StatusEffect::Vampirism)));
            } else if roll < 2.0 {
                effects.extend(inflict_disease(rules, target, tables::DISEASE_LIST_A, rng));
            }
        }
        _ => {}
    }
    effects
}

/// Creature side effects, preferring an override. Non-creature attackers
/// produce nothing.
pub fn on_monster_hit(
    rules: Rules<'_>,
    attacker: &dyn Combatant,
    target: &dyn Combatant,
    damage: i32,
    rng: &mut dyn RngCore,
) -> Vec<Infliction> {
    if !attacker.kind().is_monster() {
        return Vec::new();
    }
    match rules.registry.monster_hit(&names::ON_MONSTER_HIT) {
        Some(f) => f(attacker, target, damage, rng),
        None => monster_hit_effects(rules, attacker, target, damage, rng),
    }
}
