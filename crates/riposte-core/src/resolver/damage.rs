//! Critical strikes, base damage and the damage multipliers.
//!
//! Damage is built in a fixed order:
//!
//! 1. Roll in the base range (weapon profile, or skill/natural range)
//! 2. Add the attacker's modifiers, strength and opponent-type terms
//! 3. Multiply by the critical multiplier, then the material multiplier
//! 4. Pass weapon damage through the final adjustment hook
//! 5. Apply backstab when the target's back was exposed
//!
//! Any step that leaves damage at zero or below ends the computation with
//! zero; later multipliers never revive it.

use rand::RngCore;
use tracing::debug;

use crate::config::CriticalConfig;
use crate::dice;
use crate::entity::{AttackModifier, Combatant, Skill};
use crate::item::{DamageRange, DamageType, Weapon, WeaponArchetype, WeaponMaterial};
use crate::output::{CriticalStrike, DamageRoll};
use crate::registry::names;
use crate::tables;

use super::Rules;

/// Bonus multiplier of silver against creatures weak to it.
pub const SILVER_MULTIPLIER: f32 = 1.25;

// =============================================================================
// Critical strike
// =============================================================================

/// Chance (percent) that `attacker` lands a critical strike.
///
/// Critical skill divided by a divisor (4 for the protagonist, 5 otherwise)
/// that shrinks by one per full 25 points of luck above 50 and grows by one
/// per full 25 below, at most two steps either way. The divisor never drops
/// below 1.
#[must_use]
pub fn critical_chance(config: &CriticalConfig, attacker: &dyn Combatant) -> i32 {
    let base = if attacker.is_protagonist() {
        config.protagonist_divisor
    } else {
        config.other_divisor
    };
    let bands = ((attacker.stats().luck - 50) / config.luck_band)
        .clamp(-config.max_luck_bands, config.max_luck_bands);
    let divisor = (base - bands).max(1);
    attacker.skills().get(Skill::CriticalStrike) / divisor
}

/// Effect of a successful critical strike of `damage_type` at
/// `critical_skill`.
///
/// | Type | Multiplier | Penetration | Bypasses shield |
/// |------|------------|-------------|-----------------|
/// | Bludgeoning | `1 + skill/400` | 0.25 | yes |
/// | Slashing | `1 + skill/100` | 0 | no |
/// | Piercing | `1 + skill/200` | 0.40 | no |
/// | Special | `1 + skill/200` | 0.25 | yes |
///
/// # Example
///
/// ```
/// use riposte_core::item::DamageType;
/// use riposte_core::resolver::damage::critical_effect;
///
/// let crit = critical_effect(DamageType::Piercing, 60);
/// assert!(crit.success);
/// assert!((crit.penetration - 0.40).abs() < f32::EPSILON);
/// assert!(!crit.bypass_shield);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn critical_effect(damage_type: DamageType, critical_skill: i32) -> CriticalStrike {
    let skill = critical_skill.max(0) as f32;
    let (multiplier, penetration, bypass_shield) = match damage_type {
        DamageType::Bludgeoning => (1.0 + skill / 400.0, 0.25, true),
        DamageType::Slashing => (1.0 + skill / 100.0, 0.0, false),
        DamageType::Piercing => (1.0 + skill / 200.0, 0.40, false),
        DamageType::Special => (1.0 + skill / 200.0, 0.25, true),
    };
    CriticalStrike {
        success: true,
        multiplier,
        penetration,
        bypass_shield,
    }
}

/// Built-in critical roll.
pub fn critical_strike(
    config: &CriticalConfig,
    attacker: &dyn Combatant,
    damage_type: DamageType,
    rng: &mut dyn RngCore,
) -> CriticalStrike {
    if dice::success_roll(rng, critical_chance(config, attacker)) {
        critical_effect(damage_type, attacker.skills().get(Skill::CriticalStrike))
    } else {
        CriticalStrike::NONE
    }
}

/// Rolls for a critical strike, preferring an override.
pub fn roll_critical(
    rules: Rules<'_>,
    attacker: &dyn Combatant,
    damage_type: DamageType,
    rng: &mut dyn RngCore,
) -> CriticalStrike {
    match rules.registry.critical(&names::CRITICAL_STRIKE) {
        Some(f) => f(attacker, damage_type, rng),
        None => critical_strike(&rules.config.critical, attacker, damage_type, rng),
    }
}

// =============================================================================
// Built-in terms
// =============================================================================

/// Canonical strength modifier: `floor((strength - 50) / 5)`.
#[must_use]
pub const fn strength_modifier(strength: i32) -> i32 {
    (strength - 50).div_euclid(5)
}

/// Lower end of the unarmed range.
#[must_use]
pub const fn hand_to_hand_min(skill: i32) -> i32 {
    skill / 10 + 1
}

/// Upper end of the unarmed range.
#[must_use]
pub const fn hand_to_hand_max(skill: i32) -> i32 {
    skill / 5 + 1
}

/// Bonus or penalty from the attacker's affinity toward the target's enemy
/// group.
///
/// Scaled by level and a courage factor in `0.5..=1.5` derived from the
/// attacker's willpower and the level gap.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn opponent_type_modifier(attacker: &dyn Combatant, target: &dyn Combatant) -> i32 {
    let affinity = attacker.career().attack_modifier(target.enemy_group());
    if affinity.is_empty() {
        return 0;
    }

    let confidence = ((attacker.stats().willpower - 50) / 10
        + (attacker.level() - target.level()) / 2)
        .clamp(-5, 5);
    let courage = 1.0 + confidence as f32 / 10.0;
    let level = attacker.level() as f32;

    let mut modifier = 0;
    if affinity.contains(AttackModifier::BONUS) {
        modifier += (level * courage).round() as i32;
    }
    if affinity.contains(AttackModifier::PHOBIA) {
        modifier -= (level * (2.0 - courage)).round() as i32;
    }
    modifier
}

/// Unscaled base range of `weapon` for `damage_type`.
#[must_use]
pub const fn weapon_damage_range(weapon: &Weapon, damage_type: DamageType) -> DamageRange {
    tables::weapon_profile(weapon.archetype, damage_type).range
}

/// Condition multiplier for a weapon at `condition_percent`.
#[must_use]
pub const fn weapon_condition_multiplier(condition_percent: i32, damage_type: DamageType) -> f32 {
    tables::weapon_condition_multiplier(
        crate::item::ConditionBand::from_percent(condition_percent),
        damage_type,
    )
}

/// Damage multiplier of `material` (`None` for unarmed and natural attacks)
/// against `target`.
///
/// Creatures that need a minimum metal take nothing from anything weaker;
/// silver bites harder into creatures weak to it.
#[must_use]
pub fn material_resistance(target: &dyn Combatant, material: Option<WeaponMaterial>) -> f32 {
    let Some(traits) = target.monster() else {
        return 1.0;
    };
    if let Some(required) = traits.min_metal_to_hit {
        if material.map_or(true, |m| m < required) {
            return 0.0;
        }
    }
    if traits.silver_weakness && material == Some(WeaponMaterial::Silver) {
        return SILVER_MULTIPLIER;
    }
    1.0
}

/// Backstab multiplier for `archetype` dealing `damage_type`.
///
/// Twice the damage by default; short thrusting blades do better when they
/// pierce.
#[must_use]
pub const fn backstab_multiplier(archetype: Option<WeaponArchetype>, damage_type: DamageType) -> i32 {
    match archetype {
        Some(a) if a.is_short_piercing() && matches!(damage_type, DamageType::Piercing) => {
            match a {
                WeaponArchetype::Dagger => 5,
                WeaponArchetype::Tanto => 4,
                _ => 3,
            }
        }
        _ => 2,
    }
}

/// Built-in backstab: multiplies `damage` when a roll against the backstab
/// skill succeeds.
pub fn backstab_damage(
    damage: i32,
    backstab_skill: i32,
    archetype: Option<WeaponArchetype>,
    damage_type: DamageType,
    rng: &mut dyn RngCore,
) -> i32 {
    if dice::success_roll(rng, backstab_skill) {
        damage * backstab_multiplier(archetype, damage_type)
    } else {
        damage
    }
}

// =============================================================================
// Weapon range
// =============================================================================

/// Base range of `weapon` after material bonus, condition multiplier and the
/// profile's limits.
///
/// The range override replaces the unscaled range and the condition
/// override replaces the curve; the limits always come from the profile.
/// The result always satisfies `min <= max`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn scaled_weapon_range(rules: Rules<'_>, weapon: &Weapon, damage_type: DamageType) -> DamageRange {
    let base = match rules.registry.weapon_range(&names::WEAPON_DAMAGE_RANGE) {
        Some(f) => f(weapon, damage_type),
        None => weapon_damage_range(weapon, damage_type),
    };
    let profile = tables::weapon_profile(weapon.archetype, damage_type);
    let bonus = tables::material_damage_bonus(weapon.material, damage_type);

    let percent = weapon.condition.percent();
    let multiplier = match rules.registry.condition_curve(&names::WEAPON_CONDITION_MULTIPLIER) {
        Some(f) => f(percent, damage_type),
        None => weapon_condition_multiplier(percent, damage_type),
    };

    let scale = |value: i32| -> i32 {
        let scaled = ((value + bonus) as f32 * multiplier).round() as i32;
        scaled.clamp(profile.floor, profile.cap)
    };
    let max = scale(base.max);
    let min = scale(base.min).min(max);
    DamageRange::new(min, max)
}

// =============================================================================
// Stage entry
// =============================================================================

/// Attack-specific inputs to the damage stage.
#[derive(Debug, Clone, Copy)]
pub struct DamageContext<'a> {
    /// Weapon used; `None` for unarmed and natural attacks.
    pub weapon: Option<&'a Weapon>,
    /// Resolved damage type.
    pub damage_type: DamageType,
    /// Attacker's flat damage modifiers.
    pub modifiers: i32,
    /// Outcome of the critical roll.
    pub critical: CriticalStrike,
    /// The target's back was exposed.
    pub back_exposed: bool,
}

/// Computes the damage of a landed attack.
///
/// A missing attacker or target deals no damage.
pub fn calculate_attack_damage(
    rules: Rules<'_>,
    attacker: Option<&dyn Combatant>,
    target: Option<&dyn Combatant>,
    context: &DamageContext<'_>,
    rng: &mut dyn RngCore,
) -> DamageRoll {
    let (Some(attacker), Some(target)) = (attacker, target) else {
        return DamageRoll::default();
    };

    let roll = match context.weapon {
        Some(weapon) => weapon_damage(rules, attacker, target, weapon, context, rng),
        None => unarmed_damage(rules, attacker, target, context, rng),
    };
    debug!(
        target: "riposte::pipeline",
        attacker = ?attacker.id(),
        damage_type = %context.damage_type,
        rolled = roll.rolled,
        damage = roll.damage,
        critical = context.critical.success,
        backstab = roll.backstab,
        "damage roll"
    );
    roll
}

fn unarmed_damage(
    rules: Rules<'_>,
    attacker: &dyn Combatant,
    target: &dyn Combatant,
    context: &DamageContext<'_>,
    rng: &mut dyn RngCore,
) -> DamageRoll {
    let range = match attacker.monster() {
        Some(traits) => traits.natural_damage,
        None => {
            let skill = attacker.skills().get(Skill::HandToHand);
            DamageRange::new(
                rules.int_term(&names::HAND_TO_HAND_MIN, skill, hand_to_hand_min),
                rules.int_term(&names::HAND_TO_HAND_MAX, skill, hand_to_hand_max),
            )
        }
    };
    let rolled = dice::roll_range(rng, range.min, range.max);

    let mut damage = rolled + context.modifiers;
    if attacker.is_protagonist() {
        damage += strength_term(rules, attacker) * 2;
    }
    damage += opponent_term(rules, attacker, target);

    let mut roll = DamageRoll {
        range: Some(range),
        rolled,
        damage: 0,
        backstab: false,
    };
    let Some(damage) = apply_multipliers(rules, target, damage, None, &context.critical) else {
        return roll;
    };
    (roll.damage, roll.backstab) = backstab(rules, attacker, damage, None, context, rng);
    roll
}

fn weapon_damage(
    rules: Rules<'_>,
    attacker: &dyn Combatant,
    target: &dyn Combatant,
    weapon: &Weapon,
    context: &DamageContext<'_>,
    rng: &mut dyn RngCore,
) -> DamageRoll {
    let range = scaled_weapon_range(rules, weapon, context.damage_type);
    let rolled = dice::roll_range(rng, range.min, range.max);

    let mut damage = rolled + context.modifiers;
    let strength = strength_term(rules, attacker);
    damage += if weapon.is_two_handed_melee() {
        strength * 2
    } else {
        strength
    };
    damage += opponent_term(rules, attacker, target);

    let mut roll = DamageRoll {
        range: Some(range),
        rolled,
        damage: 0,
        backstab: false,
    };
    let Some(mut damage) =
        apply_multipliers(rules, target, damage, Some(weapon.material), &context.critical)
    else {
        return roll;
    };

    if let Some(adjust) = rules.registry.damage_adjust(&names::ADJUST_WEAPON_ATTACK_DAMAGE) {
        damage = adjust(attacker, target, damage, weapon);
        if damage <= 0 {
            return roll;
        }
    }
    (roll.damage, roll.backstab) =
        backstab(rules, attacker, damage, Some(weapon.archetype), context, rng);
    roll
}

fn strength_term(rules: Rules<'_>, attacker: &dyn Combatant) -> i32 {
    rules.int_term(
        &names::STRENGTH_MODIFIER,
        attacker.stats().strength,
        strength_modifier,
    )
}

fn opponent_term(rules: Rules<'_>, attacker: &dyn Combatant, target: &dyn Combatant) -> i32 {
    rules.pair_term(&names::OPPONENT_TYPE_MODIFIER, attacker, target, || {
        opponent_type_modifier(attacker, target)
    })
}

/// Critical then material multiplier, truncating after each. `None` once
/// damage is no longer positive.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_multipliers(
    rules: Rules<'_>,
    target: &dyn Combatant,
    damage: i32,
    material: Option<WeaponMaterial>,
    critical: &CriticalStrike,
) -> Option<i32> {
    if damage <= 0 {
        return None;
    }
    let damage = (damage as f32 * critical.multiplier).floor() as i32;
    if damage <= 0 {
        return None;
    }
    let resistance = match rules.registry.material_multiplier(&names::MATERIAL_RESISTANCE) {
        Some(f) => f(target, material),
        None => material_resistance(target, material),
    };
    let damage = (damage as f32 * resistance).floor() as i32;
    (damage > 0).then_some(damage)
}

/// Applies backstab when the back was exposed. Returns the final damage and
/// whether the multiplier landed.
fn backstab(
    rules: Rules<'_>,
    attacker: &dyn Combatant,
    damage: i32,
    archetype: Option<WeaponArchetype>,
    context: &DamageContext<'_>,
    rng: &mut dyn RngCore,
) -> (i32, bool) {
    if !context.back_exposed {
        return (damage, false);
    }
    let skill = attacker.skills().get(Skill::Backstabbing);
    let result = match rules.registry.backstab(&names::BACKSTAB_DAMAGE) {
        Some(f) => f(damage, skill, archetype, context.damage_type, rng),
        None => backstab_damage(damage, skill, archetype, context.damage_type, rng),
    };
    (result.max(0), result != damage)
}
