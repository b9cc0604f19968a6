//! Saving throws against elemental, disease, poison and paralysis effects.
//!
//! A saving throw returns the percentage of an effect that lands on the
//! target: 0 when fully resisted, 100 when not resisted at all, and a
//! prorated value for a narrow save.
//!
//! # Order
//!
//! 1. Magical resistance: a per-element roll that can negate the effect
//! 2. Base threshold, plus every tolerance flag the effects carry
//! 3. Biography and racial bonuses (protagonist only), the caller's
//!    modifier, and equipment bonuses
//! 4. A raw threshold of 100 or more is perfect immunity
//! 5. Willpower, clamp, roll

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SavingThrowConfig;
use crate::dice;
use crate::entity::{Combatant, EffectFlags, Element, Race, ToleranceFlags};
use crate::item::BodyRegion;
use crate::registry::names;
use crate::tables;

use super::Rules;

/// What an effect reaches on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectScope {
    /// A single body region: only the armor worn there helps.
    Single(BodyRegion),
    /// The whole body: every worn piece helps.
    Area,
    /// No body contact (poison in the blood, a curse): equipment is ignored.
    Untargeted,
}

/// One saving throw to roll.
///
/// # Example
///
/// ```
/// use riposte_core::entity::{EffectFlags, Element};
/// use riposte_core::resolver::resistance::{EffectScope, SavingThrowRequest};
///
/// let request = SavingThrowRequest::new(Element::Frost, EffectFlags::FROST)
///     .with_modifier(-10)
///     .with_scope(EffectScope::Area);
/// assert_eq!(request.modifier, -10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrowRequest {
    /// Element the magical resistance roll is keyed on.
    pub element: Element,
    /// Effects whose tolerances apply.
    pub effects: EffectFlags,
    /// Caller-supplied adjustment.
    pub modifier: i32,
    /// Which equipment contributes.
    pub scope: EffectScope,
}

impl SavingThrowRequest {
    /// A request with no modifier and no equipment contribution.
    #[must_use]
    pub const fn new(element: Element, effects: EffectFlags) -> Self {
        Self {
            element,
            effects,
            modifier: 0,
            scope: EffectScope::Untargeted,
        }
    }

    /// Sets the modifier.
    #[must_use]
    pub const fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Sets the scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: EffectScope) -> Self {
        self.scope = scope;
        self
    }
}

// =============================================================================
// Terms
// =============================================================================

/// Adjustment from combined tolerance flags. Flags add up.
#[must_use]
pub fn tolerance_modifier(tolerances: ToleranceFlags) -> i32 {
    let mut modifier = 0;
    if tolerances.contains(ToleranceFlags::IMMUNE) {
        modifier += 50;
    }
    if tolerances.contains(ToleranceFlags::CRITICAL_WEAKNESS) {
        modifier -= 50;
    }
    if tolerances.contains(ToleranceFlags::LOW_TOLERANCE) {
        modifier -= 25;
    }
    if tolerances.contains(ToleranceFlags::RESISTANT) {
        modifier += 25;
    }
    modifier
}

/// Biography bonus for the protagonist.
#[must_use]
pub fn biography_modifier(target: &dyn Combatant, effects: EffectFlags) -> i32 {
    if !target.is_protagonist() {
        return 0;
    }
    let bio = target.biography();
    let mut modifier = 0;
    if effects.contains(EffectFlags::MAGIC) {
        modifier += bio.resist_magic;
    }
    if effects.contains(EffectFlags::POISON) {
        modifier += bio.resist_poison;
    }
    if effects.contains(EffectFlags::DISEASE) {
        modifier += bio.resist_disease;
    }
    modifier
}

/// Racial bonus for the protagonist: Nords against frost, Bretons against
/// magic.
#[must_use]
pub fn racial_modifier(config: &SavingThrowConfig, target: &dyn Combatant, effects: EffectFlags) -> i32 {
    if !target.is_protagonist() {
        return 0;
    }
    match target.race() {
        Some(Race::Nord) if effects.contains(EffectFlags::FROST) => config.racial_bonus,
        Some(Race::Breton) if effects.contains(EffectFlags::MAGIC) => config.racial_bonus,
        _ => 0,
    }
}

/// Saving-throw bonus from worn equipment.
#[must_use]
pub fn equipment_modifier(target: &dyn Combatant, element: Element, scope: EffectScope) -> i32 {
    let equipment = target.equipment();
    match scope {
        EffectScope::Untargeted => 0,
        EffectScope::Single(region) => equipment
            .armor(region.armor_slot())
            .map_or(0, |a| tables::material_saving_throw_modifier(a.material, element)),
        EffectScope::Area => equipment
            .armor_pieces()
            .map(|a| tables::material_saving_throw_modifier(a.material, element))
            .sum(),
    }
}

/// Threshold before willpower and clamping.
///
/// A value of 100 or more means the target is immune.
#[must_use]
pub fn raw_saving_throw(
    config: &SavingThrowConfig,
    request: &SavingThrowRequest,
    target: &dyn Combatant,
) -> i32 {
    let mut tolerances = target.career().tolerances.combined(request.effects);
    if target.is_protagonist()
        && target.race() == Some(Race::HighElf)
        && request.effects.contains(EffectFlags::PARALYSIS)
    {
        tolerances |= ToleranceFlags::IMMUNE;
    }

    config.base
        + tolerance_modifier(tolerances)
        + biography_modifier(target, request.effects)
        + racial_modifier(config, target, request.effects)
        + request.modifier
        + equipment_modifier(target, request.element, request.scope)
}

/// Percentage of the effect that lands for a `roll` against `threshold`.
///
/// A roll at or under the threshold saves. Saves within `window` points of
/// the threshold still let `100 - 5 * margin` percent through.
#[must_use]
pub const fn prorated_percent(threshold: i32, roll: i32, window: i32) -> i32 {
    if roll > threshold {
        return 100;
    }
    let margin = threshold - roll;
    if margin <= window {
        let percent = 100 - 5 * margin;
        if percent < 0 {
            0
        } else {
            percent
        }
    } else {
        0
    }
}

// =============================================================================
// Stage entry
// =============================================================================

/// Built-in saving throw.
pub fn saving_throw(
    config: &SavingThrowConfig,
    request: &SavingThrowRequest,
    target: &dyn Combatant,
    rng: &mut dyn RngCore,
) -> i32 {
    if let Some(chance) = target.magical_resistance(request.element) {
        if dice::success_roll(rng, chance) {
            return 0;
        }
    }

    let raw = raw_saving_throw(config, request, target);
    if raw >= 100 {
        return 0;
    }

    let threshold = config
        .threshold
        .clamp(raw + target.stats().willpower / 10);
    let roll = dice::roll_d100(rng);
    prorated_percent(threshold, roll, config.prorate_window)
}

/// Rolls a saving throw, preferring an override. The result is clamped to
/// `0..=100`.
pub fn resolve_saving_throw(
    rules: Rules<'_>,
    request: &SavingThrowRequest,
    target: &dyn Combatant,
    rng: &mut dyn RngCore,
) -> i32 {
    let percent = match rules.registry.saving_throw(&names::SAVING_THROW) {
        Some(f) => f(request, target, rng),
        None => saving_throw(&rules.config.saving_throw, request, target, rng),
    }
    .clamp(0, 100);
    debug!(
        target: "riposte::pipeline",
        defender = ?target.id(),
        element = ?request.element,
        percent,
        "saving throw"
    );
    percent
}

/// Scales an effect amount by the percentage that got through.
#[must_use]
pub const fn modify_effect_amount(amount: i32, percent: i32) -> i32 {
    amount * percent / 100
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::config::CombatConfig;
    use crate::entity::{Biography, Career, Character, CombatantId, Stat, Tolerances};
    use crate::item::{Armor, ArmorArchetype, ArmorMaterial, EquipSlot, Item};
    use crate::registry::{Formula, FormulaRegistry, Provider};

    fn hero() -> Character {
        Character::protagonist(CombatantId::new(1))
    }

    fn poison_request() -> SavingThrowRequest {
        SavingThrowRequest::new(Element::DiseaseOrPoison, EffectFlags::POISON)
    }

    #[test]
    fn tolerance_flags_combine() {
        assert_eq!(tolerance_modifier(ToleranceFlags::IMMUNE), 50);
        assert_eq!(
            tolerance_modifier(ToleranceFlags::RESISTANT | ToleranceFlags::LOW_TOLERANCE),
            0
        );
        assert_eq!(
            tolerance_modifier(ToleranceFlags::CRITICAL_WEAKNESS | ToleranceFlags::LOW_TOLERANCE),
            -75
        );
    }

    #[test]
    fn raw_threshold_sums_terms() {
        let config = SavingThrowConfig::default();
        let nord = hero()
            .with_race(Race::Nord)
            .with_career(Career {
                tolerances: Tolerances {
                    frost: ToleranceFlags::RESISTANT,
                    ..Tolerances::default()
                },
                ..Career::default()
            });
        let request = SavingThrowRequest::new(Element::Frost, EffectFlags::FROST).with_modifier(-5);
        assert_eq!(raw_saving_throw(&config, &request, &nord), 50 + 25 + 30 - 5);
    }

    #[test]
    fn biography_only_counts_for_protagonist() {
        let bio = Biography {
            resist_poison: 10,
            ..Biography::default()
        };
        let config = SavingThrowConfig::default();
        let npc = Character::humanoid(CombatantId::new(2)).with_biography(bio);
        assert_eq!(raw_saving_throw(&config, &poison_request(), &hero().with_biography(bio)), 60);
        assert_eq!(raw_saving_throw(&config, &poison_request(), &npc), 50);
    }

    #[test]
    fn immune_target_takes_nothing() {
        let config = SavingThrowConfig::default();
        let immune = hero().with_career(Career {
            tolerances: Tolerances {
                poison: ToleranceFlags::IMMUNE,
                ..Tolerances::default()
            },
            ..Career::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(saving_throw(&config, &poison_request(), &immune, &mut rng), 0);
        }
    }

    #[test]
    fn high_elf_protagonist_resists_paralysis() {
        let config = SavingThrowConfig::default();
        let elf = hero().with_race(Race::HighElf);
        let request = SavingThrowRequest::new(Element::Magic, EffectFlags::PARALYSIS);
        assert!(raw_saving_throw(&config, &request, &elf) >= 100);
    }

    #[test]
    fn magical_resistance_short_circuits() {
        let config = SavingThrowConfig::default();
        let warded = hero().with_magical_resistance(Element::DiseaseOrPoison, 100);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(saving_throw(&config, &poison_request(), &warded, &mut rng), 0);
    }

    #[test]
    fn prorated_window() {
        assert_eq!(prorated_percent(50, 51, 20), 100);
        assert_eq!(prorated_percent(50, 50, 20), 100);
        assert_eq!(prorated_percent(50, 45, 20), 75);
        assert_eq!(prorated_percent(50, 30, 20), 0);
        assert_eq!(prorated_percent(50, 29, 20), 0);
    }

    #[test]
    fn results_stay_in_percent_range() {
        let config = SavingThrowConfig::default();
        let target = hero().with_stat(Stat::Willpower, 90);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..500 {
            let percent = saving_throw(&config, &poison_request(), &target, &mut rng);
            assert!((0..=100).contains(&percent));
        }
    }

    #[test]
    fn equipment_scope() {
        let mut target = hero();
        target.equipment_mut().equip(
            EquipSlot::ChestArmor,
            Item::Armor(Armor::new(ArmorArchetype::Plate, ArmorMaterial::Daedric, EquipSlot::ChestArmor)),
        );
        target.equipment_mut().equip(
            EquipSlot::Head,
            Item::Armor(Armor::new(ArmorArchetype::Plate, ArmorMaterial::Daedric, EquipSlot::Head)),
        );

        assert_eq!(equipment_modifier(&target, Element::Fire, EffectScope::Untargeted), 0);
        assert_eq!(
            equipment_modifier(&target, Element::Fire, EffectScope::Single(BodyRegion::Chest)),
            10
        );
        assert_eq!(
            equipment_modifier(&target, Element::Fire, EffectScope::Single(BodyRegion::Legs)),
            0
        );
        assert_eq!(equipment_modifier(&target, Element::Fire, EffectScope::Area), 20);
    }

    #[test]
    fn override_is_clamped() {
        let registry = FormulaRegistry::new();
        registry.register(
            names::SAVING_THROW.name.clone(),
            Formula::saving_throw(|_, _, _| 250),
            Provider::new("doom", 1),
        );
        let config = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let percent =
            resolve_saving_throw(Rules::new(&registry, &config), &poison_request(), &hero(), &mut rng);
        assert_eq!(percent, 100);
    }

    #[test]
    fn effect_amount_scaling() {
        assert_eq!(modify_effect_amount(20, 75), 15);
        assert_eq!(modify_effect_amount(20, 0), 0);
        assert_eq!(modify_effect_amount(7, 100), 7);
    }
}
