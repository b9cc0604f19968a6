//! Equipment wear.
//!
//! Wear is planned while the attack is being resolved (read-only) and
//! committed afterwards, so every earlier stage sees the equipment as it was
//! when the swing started.

use rand::RngCore;
use tracing::info;

use crate::config::WearConfig;
use crate::dice;
use crate::entity::Combatant;
use crate::item::{Armor, BodyRegion, DamageType, EquipSlot, Weapon};
use crate::output::{ItemWear, Mitigation, Protection, WearReport, WearWarning, WearWarningKind};
use crate::registry::names;
use crate::tables;

use super::Rules;

// =============================================================================
// Built-in formulas
// =============================================================================

/// Condition an armor piece loses for absorbing `absorbed` damage.
///
/// Unarmed hits wear armor at a reduced rate. Special damage never wears
/// equipment.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn armor_wear(
    config: &WearConfig,
    armor: &Armor,
    absorbed: i32,
    damage_type: DamageType,
    weapon_based: bool,
) -> i32 {
    if !damage_type.is_physical() || absorbed <= 0 {
        return 0;
    }
    let mut wear = absorbed as f32
        * tables::armor_wear_coefficient(damage_type)
        * tables::armor_material(armor.material).density;
    if !weapon_based {
        wear *= config.unarmed_armor_factor;
    }
    wear.round().max(0.0) as i32
}

/// Condition a weapon loses for delivering `damage`.
///
/// Bows always lose a fixed amount. A melee result that rounds to zero
/// still costs one point some of the time.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn weapon_wear(
    config: &WearConfig,
    weapon: &Weapon,
    damage: i32,
    damage_type: DamageType,
    struck_metal: bool,
    rng: &mut dyn RngCore,
) -> i32 {
    if !damage_type.is_physical() || damage <= 0 {
        return 0;
    }
    if weapon.archetype.is_ranged() {
        return config.ranged_weapon_wear;
    }
    let mut wear = damage as f32
        * tables::weapon_wear_coefficient(damage_type)
        * tables::weapon_fragility(weapon.material);
    if struck_metal {
        wear *= config.metal_armor_weapon_factor;
    }
    let wear = wear.round().max(0.0) as i32;
    if wear == 0 && dice::success_roll(rng, config.weapon_wear_floor_chance) {
        1
    } else {
        wear
    }
}

/// Warning raised by a drop from `before` to `after` percent.
///
/// A newly broken item always reports [`WearWarningKind::Broken`]; otherwise
/// the lowest threshold crossed wins, then a heavy single-hit drop.
///
/// # Example
///
/// ```
/// use riposte_core::config::WearConfig;
/// use riposte_core::output::WearWarningKind;
/// use riposte_core::resolver::wear::warning_kind;
///
/// let config = WearConfig::default();
/// assert_eq!(warning_kind(&config, 50, 47, false), Some(WearWarningKind::WornDown));
/// assert_eq!(warning_kind(&config, 47, 40, false), None);
/// ```
#[must_use]
pub fn warning_kind(
    config: &WearConfig,
    before: i32,
    after: i32,
    newly_broken: bool,
) -> Option<WearWarningKind> {
    let [worn, nearly] = config.warn_thresholds;
    if newly_broken {
        Some(WearWarningKind::Broken)
    } else if before >= nearly && after < nearly {
        Some(WearWarningKind::NearlyBroken)
    } else if before >= worn && after < worn {
        Some(WearWarningKind::WornDown)
    } else if before - after >= config.heavy_drop {
        Some(WearWarningKind::HeavyDamage)
    } else {
        None
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Condition losses decided for one attack, keyed by slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WearPlan {
    /// Target's struck armor or shield.
    pub armor: Option<(EquipSlot, i32)>,
    /// Attacker's weapon.
    pub weapon: Option<(EquipSlot, i32)>,
}

impl WearPlan {
    /// Returns `true` if nothing wears.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.armor.is_none() && self.weapon.is_none()
    }
}

/// Decides how much the struck protection and the attacker's weapon wear.
///
/// `damage` is the damage the weapon delivered before mitigation. A
/// creature's natural shield has no slot and never wears.
pub fn plan_wear(
    rules: Rules<'_>,
    target: &dyn Combatant,
    weapon: Option<(EquipSlot, &Weapon)>,
    mitigation: &Mitigation,
    damage: i32,
    damage_type: DamageType,
    rng: &mut dyn RngCore,
) -> WearPlan {
    if !damage_type.is_physical() {
        return WearPlan::default();
    }
    let config = &rules.config.wear;
    let mut plan = WearPlan::default();

    let struck_metal = match mitigation.protection {
        Some(Protection::Shield { metal, .. } | Protection::Armor { metal, .. }) => metal,
        None => false,
    };

    if let Some(slot) = mitigation.protection.and_then(Protection::wear_slot) {
        if let Some(armor) = target.equipment().armor(slot) {
            let weapon_based = weapon.is_some();
            let loss = match rules.registry.armor_wear(&names::ARMOR_WEAR) {
                Some(f) => f(armor, mitigation.absorbed, damage_type, weapon_based),
                None => armor_wear(config, armor, mitigation.absorbed, damage_type, weapon_based),
            };
            if loss > 0 {
                plan.armor = Some((slot, loss));
            }
        }
    }

    if let Some((slot, held)) = weapon {
        let loss = match rules.registry.weapon_wear(&names::WEAPON_WEAR) {
            Some(f) => f(held, damage, damage_type, struck_metal, rng),
            None => weapon_wear(config, held, damage, damage_type, struck_metal, rng),
        };
        if loss > 0 {
            plan.weapon = Some((slot, loss));
        }
    }
    plan
}

// =============================================================================
// Commit
// =============================================================================

/// Applies a [`WearPlan`], armor first.
pub fn commit_wear(
    config: &WearConfig,
    attacker: &mut dyn Combatant,
    target: &mut dyn Combatant,
    plan: &WearPlan,
) -> WearReport {
    let mut report = WearReport::default();
    if let Some((slot, loss)) = plan.armor {
        report.armor = apply_condition_loss(config, target, slot, loss, &mut report.warnings);
    }
    if let Some((slot, loss)) = plan.weapon {
        report.weapon = apply_condition_loss(config, attacker, slot, loss, &mut report.warnings);
    }
    report
}

/// Lowers the armor over `region` for magical damage.
///
/// Independent of damage type: the loss is the ceiling of a fixed fraction
/// of the damage taken.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn apply_magical_wear(
    config: &WearConfig,
    target: &mut dyn Combatant,
    region: BodyRegion,
    damage: i32,
) -> WearReport {
    let mut report = WearReport::default();
    if damage <= 0 {
        return report;
    }
    let loss = (damage as f32 * config.magical_wear_fraction).ceil() as i32;
    let slot = region.armor_slot();
    if target.equipment().armor(slot).is_some() {
        report.armor = apply_condition_loss(config, target, slot, loss, &mut report.warnings);
    }
    report
}

/// Removes `loss` condition from the item in `slot`.
///
/// An enchanted item that reaches zero is deleted from the owner's
/// equipment; a plain one stays at zero. Warnings are only raised for the
/// protagonist's items.
fn apply_condition_loss(
    config: &WearConfig,
    owner: &mut dyn Combatant,
    slot: EquipSlot,
    loss: i32,
    warnings: &mut Vec<WearWarning>,
) -> Option<ItemWear> {
    if loss <= 0 {
        return None;
    }
    let owner_id = owner.id();
    let warn = owner.is_protagonist();
    let item = owner.equipment_mut().get_mut(slot)?;

    let category = item.category();
    let was_broken = item.condition().is_broken();
    let before_percent = item.condition().percent();
    item.condition_mut().lower(loss);
    let after_percent = item.condition().percent();
    let newly_broken = !was_broken && item.condition().is_broken();
    let destroyed = newly_broken && item.is_enchanted();

    if destroyed {
        owner.equipment_mut().remove(slot);
        info!(
            target: "riposte::wear",
            owner = %owner_id,
            ?slot,
            "enchanted item destroyed"
        );
    } else if newly_broken {
        info!(target: "riposte::wear", owner = %owner_id, ?slot, "item broke");
    }

    if warn {
        if let Some(kind) = warning_kind(config, before_percent, after_percent, newly_broken) {
            warnings.push(WearWarning {
                slot,
                category,
                kind,
            });
        }
    }

    Some(ItemWear {
        slot,
        loss,
        before_percent,
        after_percent,
        destroyed,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::config::CombatConfig;
    use crate::entity::{Character, CombatantId};
    use crate::item::{ArmorArchetype, ArmorMaterial, Item, ItemCategory, WeaponArchetype, WeaponMaterial};
    use crate::registry::{Formula, FormulaRegistry, Provider};

    fn plate(percent: i32) -> Armor {
        Armor::new(ArmorArchetype::Plate, ArmorMaterial::Iron, EquipSlot::ChestArmor)
            .with_condition_percent(percent)
    }

    fn armored_hero(armor: Armor) -> Character {
        let mut hero = Character::protagonist(CombatantId::new(1));
        hero.equipment_mut().equip(armor.slot, Item::Armor(armor));
        hero
    }

    fn absorbed(slot: EquipSlot, amount: i32) -> Mitigation {
        Mitigation {
            damage: 0,
            absorbed: amount,
            reduction: 1.0,
            shield_block_success: false,
            protection: Some(Protection::Armor { slot, metal: true }),
        }
    }

    #[test]
    fn armor_wear_scales_with_type_and_source() {
        let config = WearConfig::default();
        let armor = plate(100);
        assert_eq!(armor_wear(&config, &armor, 10, DamageType::Slashing, true), 10);
        assert_eq!(armor_wear(&config, &armor, 10, DamageType::Bludgeoning, true), 6);
        assert_eq!(armor_wear(&config, &armor, 10, DamageType::Slashing, false), 5);
        assert_eq!(armor_wear(&config, &armor, 10, DamageType::Special, true), 0);
        assert_eq!(armor_wear(&config, &armor, 0, DamageType::Slashing, true), 0);
    }

    #[test]
    fn weapon_wear_scales_and_floors() {
        let config = WearConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sword = Weapon::new(WeaponArchetype::Longsword, WeaponMaterial::Iron);

        assert_eq!(weapon_wear(&config, &sword, 20, DamageType::Slashing, false, &mut rng), 2);
        assert_eq!(weapon_wear(&config, &sword, 20, DamageType::Slashing, true, &mut rng), 3);
        assert_eq!(weapon_wear(&config, &sword, 20, DamageType::Special, true, &mut rng), 0);

        let bow = Weapon::new(WeaponArchetype::LongBow, WeaponMaterial::Iron);
        assert_eq!(weapon_wear(&config, &bow, 50, DamageType::Piercing, true, &mut rng), 1);

        let mut seen = [false; 2];
        for _ in 0..200 {
            let w = weapon_wear(&config, &sword, 1, DamageType::Slashing, false, &mut rng);
            assert!(w == 0 || w == 1);
            seen[w as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn warnings_follow_thresholds() {
        let config = WearConfig::default();
        assert_eq!(warning_kind(&config, 16, 14, false), Some(WearWarningKind::NearlyBroken));
        assert_eq!(warning_kind(&config, 60, 10, false), Some(WearWarningKind::NearlyBroken));
        assert_eq!(warning_kind(&config, 100, 80, false), Some(WearWarningKind::HeavyDamage));
        assert_eq!(warning_kind(&config, 100, 90, false), None);
        assert_eq!(warning_kind(&config, 5, 0, true), Some(WearWarningKind::Broken));
    }

    #[test]
    fn plan_uses_struck_armor_and_weapon() {
        let registry = FormulaRegistry::new();
        let config = CombatConfig::default();
        let rules = Rules::new(&registry, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let target = armored_hero(plate(100));
        let sword = Weapon::new(WeaponArchetype::Longsword, WeaponMaterial::Iron);

        let plan = plan_wear(
            rules,
            &target,
            Some((EquipSlot::RightHand, &sword)),
            &absorbed(EquipSlot::ChestArmor, 10),
            20,
            DamageType::Slashing,
            &mut rng,
        );
        assert_eq!(plan.armor, Some((EquipSlot::ChestArmor, 10)));
        assert_eq!(plan.weapon, Some((EquipSlot::RightHand, 3)));

        let special = plan_wear(
            rules,
            &target,
            Some((EquipSlot::RightHand, &sword)),
            &absorbed(EquipSlot::ChestArmor, 10),
            20,
            DamageType::Special,
            &mut rng,
        );
        assert!(special.is_empty());
    }

    #[test]
    fn natural_shield_never_wears() {
        let registry = FormulaRegistry::new();
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let target = Character::humanoid(CombatantId::new(2));
        let mitigation = Mitigation {
            protection: Some(Protection::Shield { slot: None, metal: true }),
            ..absorbed(EquipSlot::LeftHand, 8)
        };
        let plan = plan_wear(
            Rules::new(&registry, &config),
            &target,
            None,
            &mitigation,
            8,
            DamageType::Piercing,
            &mut rng,
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn overrides_replace_wear_formulas() {
        let registry = FormulaRegistry::new();
        registry.register(
            names::ARMOR_WEAR.name.clone(),
            Formula::armor_wear(|_, _, _, _| 42),
            Provider::new("brittle", 1),
        );
        registry.register(
            names::WEAPON_WEAR.name.clone(),
            Formula::weapon_wear(|_, _, _, _, _| 0),
            Provider::new("unbreakable", 1),
        );
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let target = armored_hero(plate(100));
        let sword = Weapon::new(WeaponArchetype::Longsword, WeaponMaterial::Iron);

        let plan = plan_wear(
            Rules::new(&registry, &config),
            &target,
            Some((EquipSlot::RightHand, &sword)),
            &absorbed(EquipSlot::ChestArmor, 1),
            50,
            DamageType::Slashing,
            &mut rng,
        );
        assert_eq!(plan.armor, Some((EquipSlot::ChestArmor, 42)));
        assert_eq!(plan.weapon, None);
    }

    #[test]
    fn commit_lowers_condition_and_warns() {
        let config = WearConfig::default();
        let mut attacker = Character::humanoid(CombatantId::new(2));
        attacker.equipment_mut().equip(
            EquipSlot::RightHand,
            Item::Weapon(Weapon::new(WeaponArchetype::Longsword, WeaponMaterial::Iron)),
        );
        let mut target = armored_hero(plate(50));

        let plan = WearPlan {
            armor: Some((EquipSlot::ChestArmor, 15)),
            weapon: Some((EquipSlot::RightHand, 2)),
        };
        let report = commit_wear(&config, &mut attacker, &mut target, &plan);

        let armor = report.armor.expect("armor wear");
        assert_eq!((armor.before_percent, armor.after_percent), (50, 47));
        assert!(!armor.destroyed);
        assert_eq!(
            target.equipment().armor(EquipSlot::ChestArmor).map(|a| a.condition.current()),
            Some(235)
        );
        assert_eq!(report.weapon.map(|w| w.loss), Some(2));
        // Only the protagonist's armor warns.
        assert_eq!(
            report.warnings,
            vec![WearWarning {
                slot: EquipSlot::ChestArmor,
                category: ItemCategory::Armor,
                kind: WearWarningKind::WornDown,
            }]
        );
    }

    #[test]
    fn enchanted_item_is_destroyed_plain_item_stays() {
        let config = WearConfig::default();
        let mut attacker = Character::humanoid(CombatantId::new(2));
        let plan = WearPlan {
            armor: Some((EquipSlot::ChestArmor, 10)),
            weapon: None,
        };

        let mut enchanted = armored_hero(plate(1).enchanted());
        let report = commit_wear(&config, &mut attacker, &mut enchanted, &plan);
        assert!(report.armor.is_some_and(|w| w.destroyed));
        assert!(enchanted.equipment().armor(EquipSlot::ChestArmor).is_none());
        assert_eq!(report.warnings[0].kind, WearWarningKind::Broken);

        let mut plain = armored_hero(plate(1));
        let report = commit_wear(&config, &mut attacker, &mut plain, &plan);
        assert!(report.armor.is_some_and(|w| !w.destroyed));
        assert!(plain
            .equipment()
            .armor(EquipSlot::ChestArmor)
            .is_some_and(|a| a.condition.is_broken()));
    }

    #[test]
    fn magical_wear_rounds_up() {
        let config = WearConfig::default();
        let mut target = armored_hero(plate(100));

        let report = apply_magical_wear(&config, &mut target, BodyRegion::Chest, 10);
        assert_eq!(report.armor.map(|w| w.loss), Some(3));

        let bare = apply_magical_wear(&config, &mut target, BodyRegion::Head, 10);
        assert_eq!(bare, WearReport::default());
    }
}
