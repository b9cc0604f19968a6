//! Struck region, shield blocks and armor reduction.
//!
//! A landed hit strikes one of seven regions. If the target carries an
//! eligible shield it may block; a successful block uses whichever of the
//! shield and the region's armor stops more of this damage. Without a
//! block the region's armor (if any) applies.

use std::borrow::Cow;

use rand::{Rng, RngCore};
use tracing::debug;

use crate::config::BlockConfig;
use crate::dice;
use crate::entity::Combatant;
use crate::item::{Armor, ArmorMaterial, BodyRegion, DamageType, EquipSlot};
use crate::output::{CriticalStrike, Mitigation, Protection};
use crate::registry::names;
use crate::tables;

use super::Rules;

// =============================================================================
// Struck region
// =============================================================================

/// Draws a region from the twenty-slot table.
pub fn struck_body_part(rng: &mut dyn RngCore) -> BodyRegion {
    tables::STRUCK_BODY_PARTS[rng.gen_range(0..tables::STRUCK_BODY_PARTS.len())]
}

/// Draws the struck region, preferring an override.
pub fn select_struck_region(rules: Rules<'_>, rng: &mut dyn RngCore) -> BodyRegion {
    match rules.registry.struck_body_part(&names::STRUCK_BODY_PART) {
        Some(f) => f(rng),
        None => struck_body_part(rng),
    }
}

// =============================================================================
// Block
// =============================================================================

/// Shield `target` can block with, and the slot it is worn in.
///
/// An off-hand shield takes precedence; otherwise creatures with a natural
/// shield block with an iron shield of that archetype that has no slot.
#[must_use]
pub fn eligible_shield(target: &dyn Combatant) -> Option<(Cow<'_, Armor>, Option<EquipSlot>)> {
    if let Some(shield) = target.equipment().shield() {
        return Some((Cow::Borrowed(shield), Some(EquipSlot::LeftHand)));
    }
    let archetype = target.monster()?.natural_shield?;
    Some((Cow::Owned(Armor::shield(archetype, ArmorMaterial::Iron)), None))
}

/// Block chance of `defender` with `shield` against a hit on a region the
/// shield does (`covered`) or does not cover.
///
/// Light shields trade hard-point blocking for soft-point blocking and heavy
/// shields the reverse. Covered regions lean on agility and strength,
/// uncovered ones on agility and speed. Luck helps both.
#[must_use]
pub fn block_chance(
    config: &BlockConfig,
    defender: &dyn Combatant,
    shield: &Armor,
    covered: bool,
) -> i32 {
    let Some((hard, soft)) = tables::shield_block_base(shield.archetype) else {
        return 0;
    };
    let shift = if shield.weight_kg < config.light_shield_kg {
        -config.weight_class_shift
    } else if shield.weight_kg >= config.heavy_shield_kg {
        config.weight_class_shift
    } else {
        0
    };

    let stats = defender.stats();
    let luck = (stats.luck - 50) / 10;
    if covered {
        let chance =
            hard + shift + (stats.agility - 50) / 5 + (stats.strength - 50) / 5 + luck;
        config.hard.clamp(chance)
    } else {
        let chance = soft - shift + (stats.agility - 50) / 4 + (stats.speed - 50) / 5 + luck;
        config.soft.clamp(chance)
    }
}

// =============================================================================
// Reduction
// =============================================================================

/// Fraction of `damage_type` damage `armor` stops, in `0.0..=1.0`.
///
/// Bludgeoning is resisted by density, slashing by hardness, piercing by
/// their mean; all scale with the archetype coefficient and condition and
/// are cut by critical `penetration`. Jewellery and special damage give
/// nothing.
#[must_use]
pub fn damage_reduction(armor: &Armor, damage_type: DamageType, penetration: f32) -> f32 {
    if armor.slot.is_jewellery() {
        return 0.0;
    }
    let properties = tables::armor_material(armor.material);
    let material = match damage_type {
        DamageType::Special => return 0.0,
        DamageType::Bludgeoning => properties.density,
        DamageType::Slashing => properties.hardness,
        DamageType::Piercing => properties.average(),
    };
    let reduction = tables::armor_coefficient(armor.archetype, damage_type)
        * material
        * tables::armor_condition_multiplier(armor.condition.band())
        * (1.0 - penetration);
    reduction.clamp(0.0, 1.0)
}

fn resolve_reduction(rules: Rules<'_>, armor: &Armor, damage_type: DamageType, penetration: f32) -> f32 {
    if armor.slot.is_jewellery() {
        return 0.0;
    }
    let reduction = match rules.registry.reduction(&names::DAMAGE_REDUCTION) {
        Some(f) => f(armor, damage_type, penetration),
        None => damage_reduction(armor, damage_type, penetration),
    };
    if reduction.is_nan() {
        0.0
    } else {
        reduction.clamp(0.0, 1.0)
    }
}

// =============================================================================
// Stage entry
// =============================================================================

/// Result of the block roll against one hit.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRoll {
    /// Shield that rolled.
    pub shield: Armor,
    /// Slot it is worn in; `None` for a natural shield.
    pub slot: Option<EquipSlot>,
    /// Whether the block held after any critical bypass.
    pub success: bool,
}

/// Rolls the block for a hit on `region`.
///
/// Returns `None` when `target` has no eligible shield. The roll is made
/// even when the critical strike bypasses shields; a bypass then cancels
/// the block.
pub fn roll_block(
    rules: Rules<'_>,
    target: &dyn Combatant,
    region: BodyRegion,
    critical: &CriticalStrike,
    rng: &mut dyn RngCore,
) -> Option<BlockRoll> {
    let (shield, slot) = eligible_shield(target)?;
    let covered = shield.archetype.covers(region);
    let chance = match rules.registry.block_chance(&names::BLOCK_CHANCE) {
        Some(f) => f(target, &shield, covered),
        None => block_chance(&rules.config.block, target, &shield, covered),
    };
    let success = dice::success_roll(rng, chance) && !critical.bypass_shield;
    debug!(
        target: "riposte::pipeline",
        defender = ?target.id(),
        %region,
        chance,
        success,
        "block roll"
    );
    Some(BlockRoll {
        shield: shield.into_owned(),
        slot,
        success,
    })
}

/// Applies shield and armor reduction to `damage` landing on `region`,
/// given the block already rolled for this hit.
///
/// A successful block uses the shield unless the region's armor stops
/// strictly more. Zero damage carries the block result and nothing else.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn mitigate(
    rules: Rules<'_>,
    target: &dyn Combatant,
    region: BodyRegion,
    damage: i32,
    damage_type: DamageType,
    critical: &CriticalStrike,
    block: Option<&BlockRoll>,
) -> Mitigation {
    let shield_block_success = block.is_some_and(|b| b.success);
    if damage <= 0 {
        return Mitigation {
            shield_block_success,
            ..Mitigation::unprotected(0)
        };
    }
    let penetration = critical.penetration;

    let armor_choice = target
        .equipment()
        .armor(region.armor_slot())
        .filter(|a| !a.is_shield())
        .map(|a| {
            (
                resolve_reduction(rules, a, damage_type, penetration),
                Protection::Armor {
                    slot: region.armor_slot(),
                    metal: a.is_metal(),
                },
            )
        });

    let choice = match block {
        Some(block) if block.success => {
            let shield_reduction = resolve_reduction(rules, &block.shield, damage_type, penetration);
            let shield_choice = (
                shield_reduction,
                Protection::Shield {
                    slot: block.slot,
                    metal: block.shield.is_metal(),
                },
            );
            match armor_choice {
                Some((armor_reduction, _)) if armor_reduction > shield_reduction => armor_choice,
                _ => Some(shield_choice),
            }
        }
        _ => armor_choice,
    };

    let (reduction, protection) = match choice {
        Some((reduction, protection)) => (reduction, Some(protection)),
        None => (0.0, None),
    };
    let remaining = ((damage as f32 * (1.0 - reduction)).round() as i32).clamp(0, damage);
    debug!(
        target: "riposte::pipeline",
        defender = ?target.id(),
        %region,
        incoming = damage,
        remaining,
        reduction,
        blocked = shield_block_success,
        "mitigation"
    );
    Mitigation {
        damage: remaining,
        absorbed: damage - remaining,
        reduction,
        shield_block_success,
        protection,
    }
}

/// Rolls the block and then mitigates `damage` in one step.
pub fn resolve_mitigation(
    rules: Rules<'_>,
    target: &dyn Combatant,
    region: BodyRegion,
    damage: i32,
    damage_type: DamageType,
    critical: &CriticalStrike,
    rng: &mut dyn RngCore,
) -> Mitigation {
    let block = roll_block(rules, target, region, critical, rng);
    mitigate(rules, target, region, damage, damage_type, critical, block.as_ref())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::config::{Bounds, CombatConfig};
    use crate::entity::{Character, CombatantId, MonsterCareer, Stat};
    use crate::item::{ArmorArchetype, Item};
    use crate::registry::{Formula, FormulaRegistry, Provider};
    use crate::resolver::damage::critical_effect;

    fn defender() -> Character {
        Character::humanoid(CombatantId::new(2))
    }

    fn plate_chest() -> Armor {
        Armor::new(ArmorArchetype::Plate, ArmorMaterial::Steel, EquipSlot::ChestArmor)
    }

    fn always_block() -> FormulaRegistry {
        let registry = FormulaRegistry::new();
        registry.register(
            names::BLOCK_CHANCE.name.clone(),
            Formula::block_chance(|_, _, _| 100),
            Provider::new("wall", 1),
        );
        registry
    }

    #[test]
    fn body_part_draw_uses_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            seen.insert(struck_body_part(&mut rng));
        }
        assert_eq!(seen.len(), BodyRegion::ALL.len());
    }

    #[test]
    fn block_chance_clamps() {
        let config = BlockConfig::default();
        let tower = Armor::shield(ArmorArchetype::TowerShield, ArmorMaterial::Iron);
        let strong = defender()
            .with_stat(Stat::Agility, 100)
            .with_stat(Stat::Strength, 100)
            .with_stat(Stat::Luck, 100)
            .with_stat(Stat::Speed, 100);

        // Heavy tower: 50 + 5 + 10 + 10 + 5 and 20 - 5 + 12 + 10 + 5.
        assert_eq!(block_chance(&config, &strong, &tower, true), 80);
        assert_eq!(block_chance(&config, &strong, &tower, false), 42);

        let tight = BlockConfig {
            hard: Bounds::new(7, 60),
            soft: Bounds::new(0, 30),
            ..config
        };
        assert_eq!(block_chance(&tight, &strong, &tower, true), 60);
        assert_eq!(block_chance(&tight, &strong, &tower, false), 30);

        let weak = defender()
            .with_stat(Stat::Agility, 0)
            .with_stat(Stat::Strength, 0)
            .with_stat(Stat::Luck, 0)
            .with_stat(Stat::Speed, 0);
        let buckler = Armor::shield(ArmorArchetype::Buckler, ArmorMaterial::Leather);
        assert_eq!(block_chance(&config, &weak, &buckler, true), 7);
        assert_eq!(block_chance(&config, &weak, &buckler, false), 0);
    }

    #[test]
    fn weight_class_shifts_block() {
        let config = BlockConfig::default();
        let light = Armor::shield(ArmorArchetype::KiteShield, ArmorMaterial::Iron).with_weight(2.0);
        let medium = light.clone().with_weight(5.0);
        let heavy = light.clone().with_weight(8.0);

        assert_eq!(block_chance(&config, &defender(), &medium, true), 45);
        assert_eq!(block_chance(&config, &defender(), &light, true), 40);
        assert_eq!(block_chance(&config, &defender(), &heavy, true), 50);
        assert_eq!(block_chance(&config, &defender(), &light, false), 20);
        assert_eq!(block_chance(&config, &defender(), &heavy, false), 10);
    }

    #[test]
    fn body_armor_cannot_block() {
        let config = BlockConfig::default();
        assert_eq!(block_chance(&config, &defender(), &plate_chest(), true), 0);
    }

    #[test]
    fn reduction_depends_on_type_and_penetration() {
        let plate = plate_chest();
        let full = damage_reduction(&plate, DamageType::Piercing, 0.0);
        let pierced = damage_reduction(&plate, DamageType::Piercing, 0.4);
        assert!(full > 0.0);
        assert!((pierced - full * 0.6).abs() < 1e-6);
        assert!(damage_reduction(&plate, DamageType::Special, 0.0).abs() < f32::EPSILON);

        let ring = Armor::new(ArmorArchetype::Leather, ArmorMaterial::Leather, EquipSlot::Ring);
        assert!(damage_reduction(&ring, DamageType::Slashing, 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn worn_armor_protects_less() {
        let new = plate_chest();
        let worn = plate_chest().with_condition_percent(10);
        assert!(
            damage_reduction(&worn, DamageType::Slashing, 0.0)
                < damage_reduction(&new, DamageType::Slashing, 0.0)
        );
    }

    #[test]
    fn unprotected_takes_full_damage() {
        let registry = FormulaRegistry::new();
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let m = resolve_mitigation(
            Rules::new(&registry, &config),
            &defender(),
            BodyRegion::Chest,
            12,
            DamageType::Slashing,
            &CriticalStrike::NONE,
            &mut rng,
        );
        assert_eq!(m, Mitigation::unprotected(12));
    }

    #[test]
    fn armor_absorbs_part_of_the_blow() {
        let registry = FormulaRegistry::new();
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut target = defender();
        target
            .equipment_mut()
            .equip(EquipSlot::ChestArmor, Item::Armor(plate_chest()));

        let m = resolve_mitigation(
            Rules::new(&registry, &config),
            &target,
            BodyRegion::Chest,
            20,
            DamageType::Slashing,
            &CriticalStrike::NONE,
            &mut rng,
        );
        // 0.5 * 1.1 = 0.55 of 20 absorbed.
        assert_eq!(m.damage, 9);
        assert_eq!(m.absorbed, 11);
        assert!(m.is_partial());
        assert_eq!(
            m.protection,
            Some(Protection::Armor {
                slot: EquipSlot::ChestArmor,
                metal: true
            })
        );
    }

    #[test]
    fn block_uses_the_better_protection() {
        let registry = always_block();
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut target = defender();
        target
            .equipment_mut()
            .equip(EquipSlot::ChestArmor, Item::Armor(plate_chest()));
        target.equipment_mut().equip(
            EquipSlot::LeftHand,
            Item::Armor(Armor::shield(ArmorArchetype::Buckler, ArmorMaterial::Leather)),
        );

        let m = resolve_mitigation(
            Rules::new(&registry, &config),
            &target,
            BodyRegion::Chest,
            20,
            DamageType::Slashing,
            &CriticalStrike::NONE,
            &mut rng,
        );
        assert!(m.shield_block_success);
        assert!(matches!(m.protection, Some(Protection::Armor { .. })));

        let m = resolve_mitigation(
            Rules::new(&registry, &config),
            &defender().with_stat(Stat::Luck, 50),
            BodyRegion::Chest,
            20,
            DamageType::Slashing,
            &CriticalStrike::NONE,
            &mut rng,
        );
        assert!(!m.shield_block_success, "no shield, no block");
    }

    #[test]
    fn blunt_critical_cancels_block() {
        let registry = always_block();
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut target = defender();
        target.equipment_mut().equip(
            EquipSlot::LeftHand,
            Item::Armor(Armor::shield(ArmorArchetype::KiteShield, ArmorMaterial::Iron)),
        );
        let rules = Rules::new(&registry, &config);

        let blocked = resolve_mitigation(
            rules,
            &target,
            BodyRegion::Chest,
            20,
            DamageType::Bludgeoning,
            &CriticalStrike::NONE,
            &mut rng,
        );
        assert!(blocked.shield_block_success);
        assert!(blocked.absorbed > 0);

        let crushed = resolve_mitigation(
            rules,
            &target,
            BodyRegion::Chest,
            20,
            DamageType::Bludgeoning,
            &critical_effect(DamageType::Bludgeoning, 50),
            &mut rng,
        );
        assert!(!crushed.shield_block_success);
        assert_eq!(crushed.damage, 20);
    }

    #[test]
    fn natural_shield_blocks_without_slot() {
        let registry = always_block();
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let skeleton = Character::monster(CombatantId::new(9), MonsterCareer::SkeletalWarrior);

        let m = resolve_mitigation(
            Rules::new(&registry, &config),
            &skeleton,
            BodyRegion::Chest,
            20,
            DamageType::Piercing,
            &CriticalStrike::NONE,
            &mut rng,
        );
        assert!(m.shield_block_success);
        assert_eq!(
            m.protection,
            Some(Protection::Shield {
                slot: None,
                metal: true
            })
        );
    }

    #[test]
    fn reduction_override_is_clamped() {
        let registry = FormulaRegistry::new();
        registry.register(
            names::DAMAGE_REDUCTION.name.clone(),
            Formula::reduction(|_, _, _| 3.0),
            Provider::new("overshoot", 1),
        );
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut target = defender();
        target
            .equipment_mut()
            .equip(EquipSlot::ChestArmor, Item::Armor(plate_chest()));

        let m = resolve_mitigation(
            Rules::new(&registry, &config),
            &target,
            BodyRegion::Chest,
            20,
            DamageType::Slashing,
            &CriticalStrike::NONE,
            &mut rng,
        );
        assert_eq!(m.damage, 0);
        assert!(m.is_complete());
    }

    #[test]
    fn block_is_rolled_before_damage_is_known() {
        let registry = always_block();
        let config = CombatConfig::default();
        let rules = Rules::new(&registry, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut target = defender();
        target.equipment_mut().equip(
            EquipSlot::LeftHand,
            Item::Armor(Armor::shield(ArmorArchetype::TowerShield, ArmorMaterial::Iron)),
        );

        let block = roll_block(rules, &target, BodyRegion::Chest, &CriticalStrike::NONE, &mut rng);
        let block = block.expect("tower shield is eligible");
        assert!(block.success);
        assert_eq!(block.slot, Some(EquipSlot::LeftHand));

        let nothing = mitigate(
            rules,
            &target,
            BodyRegion::Chest,
            0,
            DamageType::Piercing,
            &CriticalStrike::NONE,
            Some(&block),
        );
        assert!(nothing.shield_block_success);
        assert_eq!(nothing.damage, 0);
        assert_eq!(nothing.protection, None);

        let blunt = critical_effect(DamageType::Bludgeoning, 50);
        let bypassed = roll_block(rules, &target, BodyRegion::Chest, &blunt, &mut rng)
            .expect("tower shield is eligible");
        assert!(!bypassed.success);
        assert!(roll_block(rules, &defender(), BodyRegion::Chest, &blunt, &mut rng).is_none());
    }
}
