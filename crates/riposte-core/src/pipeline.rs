//! The attack pipeline.
//!
//! [`CombatPipeline::resolve_attack`] runs every stage of [`crate::resolver`]
//! in order against read-only views of both combatants, then commits the
//! side effects (equipment wear, poison consumption, inflictions) in one
//! step once the outcome is fully known.

use std::sync::Arc;

use glam::Vec2;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CombatConfig;
use crate::entity::Combatant;
use crate::item::{DamageType, EquipSlot, SwingDirection, Weapon};
use crate::output::{AttackOutcome, Infliction, Protection};
use crate::registry::FormulaRegistry;
use crate::resolver::damage::{calculate_attack_damage, roll_critical, DamageContext};
use crate::resolver::hit::{attack_modifiers, calculate_successful_hit, resolve_backstab_chance};
use crate::resolver::mitigation::{mitigate, roll_block, select_struck_region};
use crate::resolver::special::{crippling, inflict_poison, on_monster_hit};
use crate::resolver::wear::{commit_wear, plan_wear, WearPlan};
use crate::resolver::Rules;
use crate::tables;

// =============================================================================
// Facing
// =============================================================================

/// Whether the target had its back to the attacker when the swing started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Facing {
    back_exposed: bool,
}

impl Facing {
    /// The target faces the attacker.
    #[must_use]
    pub const fn front() -> Self {
        Self {
            back_exposed: false,
        }
    }

    /// The attacker is behind the target.
    #[must_use]
    pub const fn behind() -> Self {
        Self { back_exposed: true }
    }

    /// Derives facing from world positions.
    ///
    /// The back is exposed when the attacker stands more than 120 degrees
    /// away from the target's forward direction. Degenerate vectors count
    /// as facing.
    ///
    /// # Example
    ///
    /// ```
    /// use glam::Vec2;
    /// use riposte_core::pipeline::Facing;
    ///
    /// let target = Vec2::ZERO;
    /// let forward = Vec2::X;
    /// assert!(Facing::from_positions(Vec2::new(-3.0, 0.0), target, forward).is_back_exposed());
    /// assert!(!Facing::from_positions(Vec2::new(0.0, 3.0), target, forward).is_back_exposed());
    /// ```
    #[must_use]
    pub fn from_positions(attacker: Vec2, target: Vec2, target_forward: Vec2) -> Self {
        let to_attacker = (attacker - target).normalize_or_zero();
        let forward = target_forward.normalize_or_zero();
        if to_attacker == Vec2::ZERO || forward == Vec2::ZERO {
            return Self::front();
        }
        Self {
            back_exposed: forward.dot(to_attacker) < -0.5,
        }
    }

    /// Returns `true` if the attacker is behind the target.
    #[must_use]
    pub const fn is_back_exposed(self) -> bool {
        self.back_exposed
    }
}

// =============================================================================
// AttackContext
// =============================================================================

/// Per-attack inputs supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttackContext {
    /// Slot of the weapon swung; `None` attacks unarmed (or naturally).
    pub weapon_slot: Option<EquipSlot>,
    /// Melee swing direction.
    pub swing: SwingDirection,
    /// Facing when the swing started.
    pub facing: Facing,
    /// Forces a damage type instead of deriving it from the weapon.
    pub damage_type: Option<DamageType>,
}

impl AttackContext {
    /// An attack with the weapon in `slot`.
    #[must_use]
    pub fn armed(slot: EquipSlot) -> Self {
        Self {
            weapon_slot: Some(slot),
            ..Self::default()
        }
    }

    /// An unarmed or natural attack.
    #[must_use]
    pub fn unarmed() -> Self {
        Self::default()
    }

    /// Sets the swing direction.
    #[must_use]
    pub const fn with_swing(mut self, swing: SwingDirection) -> Self {
        self.swing = swing;
        self
    }

    /// Sets the facing.
    #[must_use]
    pub const fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Forces the damage type.
    #[must_use]
    pub const fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }
}

// =============================================================================
// CombatPipeline
// =============================================================================

/// Everything decided while resolving, before anything is mutated.
struct Resolution {
    outcome: AttackOutcome,
    wear: WearPlan,
    spent_poison: Option<EquipSlot>,
}

impl Resolution {
    fn settled(outcome: AttackOutcome) -> Self {
        Self {
            outcome,
            wear: WearPlan::default(),
            spent_poison: None,
        }
    }
}

/// Resolves attacks against an injected override registry.
///
/// Cheap to clone; clones share the registry.
#[derive(Debug, Clone)]
pub struct CombatPipeline {
    registry: Arc<FormulaRegistry>,
    config: CombatConfig,
}

impl CombatPipeline {
    /// Creates a pipeline with default balance constants.
    #[must_use]
    pub fn new(registry: Arc<FormulaRegistry>) -> Self {
        Self::with_config(registry, CombatConfig::default())
    }

    /// Creates a pipeline with custom balance constants.
    #[must_use]
    pub fn with_config(registry: Arc<FormulaRegistry>, config: CombatConfig) -> Self {
        Self { registry, config }
    }

    /// The override registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<FormulaRegistry> {
        &self.registry
    }

    /// Balance constants.
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Registry and configuration bundled for the stage functions.
    #[must_use]
    pub fn rules(&self) -> Rules<'_> {
        Rules::new(&self.registry, &self.config)
    }

    /// Resolves one attack.
    ///
    /// A missing attacker or target is a miss with no side effects. Health
    /// is never touched: the host subtracts [`AttackOutcome::damage`].
    pub fn resolve_attack(
        &self,
        attacker: Option<&mut dyn Combatant>,
        target: Option<&mut dyn Combatant>,
        context: &AttackContext,
        rng: &mut dyn RngCore,
    ) -> AttackOutcome {
        let (Some(attacker), Some(target)) = (attacker, target) else {
            debug!(target: "riposte::pipeline", "attack without attacker or target");
            return AttackOutcome::miss();
        };

        let resolution = self.resolve(&*attacker, &*target, context, rng);
        self.commit(attacker, target, resolution)
    }

    fn resolve(
        &self,
        attacker: &dyn Combatant,
        target: &dyn Combatant,
        context: &AttackContext,
        rng: &mut dyn RngCore,
    ) -> Resolution {
        let rules = self.rules();

        let mut held: Option<(EquipSlot, Weapon)> = context
            .weapon_slot
            .and_then(|slot| attacker.equipment().weapon(slot).map(|w| (slot, w.clone())));
        let switched_to_natural_attack =
            attacker
                .monster()
                .zip(held.as_ref())
                .is_some_and(|(traits, (_, weapon))| {
                    !traits.uses_weapons
                        || traits.natural_damage.average()
                            > tables::aggregate_profile(weapon.archetype).range.average()
                });
        if switched_to_natural_attack {
            held = None;
        }
        let weapon = held.as_ref().map(|(_, w)| w);

        let damage_type = context.damage_type.unwrap_or_else(|| {
            weapon.map_or(DamageType::Bludgeoning, |w| {
                w.archetype.damage_type_for(context.swing)
            })
        });

        let modifiers = attack_modifiers(attacker, weapon, context.swing);
        let back_exposed = context.facing.is_back_exposed();
        let mut to_hit = modifiers.to_hit;
        if back_exposed {
            to_hit += resolve_backstab_chance(rules, attacker, target);
        }

        let mut outcome = AttackOutcome {
            damage_type: Some(damage_type),
            switched_to_natural_attack,
            weapon_used: weapon.cloned(),
            ..AttackOutcome::miss()
        };

        let region = select_struck_region(rules, rng);
        if !calculate_successful_hit(rules, Some(attacker), Some(target), to_hit, region, rng) {
            return Resolution::settled(outcome);
        }
        outcome.hit = true;
        outcome.struck_region = Some(region);

        let critical = roll_critical(rules, attacker, damage_type, rng);
        outcome.critical = critical.success;

        let block = roll_block(rules, target, region, &critical, rng);
        outcome.shield_block_success = block.as_ref().is_some_and(|b| b.success);

        let roll = calculate_attack_damage(
            rules,
            Some(attacker),
            Some(target),
            &DamageContext {
                weapon,
                damage_type,
                modifiers: modifiers.damage,
                critical,
                back_exposed,
            },
            rng,
        );
        outcome.backstab = roll.backstab;
        if roll.damage <= 0 {
            return Resolution::settled(outcome);
        }

        let mitigation = mitigate(
            rules,
            target,
            region,
            roll.damage,
            damage_type,
            &critical,
            block.as_ref(),
        );
        outcome.damage = mitigation.damage;
        outcome.partial_absorption = mitigation.is_partial();
        outcome.complete_absorption = mitigation.is_complete();
        match mitigation.protection {
            Some(Protection::Shield { metal, .. }) => outcome.metal_shield = metal,
            Some(Protection::Armor { metal, .. }) => outcome.metal_armor = metal,
            None => {}
        }

        let wear = plan_wear(
            rules,
            target,
            held.as_ref().map(|(slot, w)| (*slot, w)),
            &mitigation,
            roll.damage,
            damage_type,
            rng,
        );

        let mut spent_poison = None;
        if mitigation.damage > 0 {
            if let Some((slot, poison)) = held
                .as_ref()
                .and_then(|(slot, w)| w.poison.map(|p| (*slot, p)))
            {
                spent_poison = Some(slot);
                outcome.inflictions.extend(inflict_poison(rules, target, poison, rng));
            }
            outcome
                .inflictions
                .extend(on_monster_hit(rules, attacker, target, mitigation.damage, rng));
            outcome.inflictions.extend(crippling(
                &self.config.special,
                target,
                region,
                &critical,
                mitigation.damage,
            ));
        }

        Resolution {
            outcome,
            wear,
            spent_poison,
        }
    }

    fn commit(
        &self,
        attacker: &mut dyn Combatant,
        target: &mut dyn Combatant,
        resolution: Resolution,
    ) -> AttackOutcome {
        let Resolution {
            mut outcome,
            wear,
            spent_poison,
        } = resolution;

        if let Some(slot) = spent_poison {
            if let Some(weapon) = attacker.equipment_mut().weapon_mut(slot) {
                weapon.poison = None;
            }
        }
        if !wear.is_empty() {
            outcome.wear = commit_wear(&self.config.wear, attacker, target, &wear);
        }
        for infliction in &outcome.inflictions {
            match *infliction {
                Infliction::Status { bundle, flags } => target.inflict(bundle, flags),
                Infliction::FatigueDrain(amount) => target.adjust_fatigue(-amount),
            }
        }

        debug!(
            target: "riposte::pipeline",
            attacker = %attacker.id(),
            target_id = %target.id(),
            hit = outcome.hit,
            damage = outcome.damage,
            critical = outcome.critical,
            blocked = outcome.shield_block_success,
            inflictions = outcome.inflictions.len(),
            "attack resolved"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::entity::{Character, CombatantId, MonsterCareer, Poison, Skill, StatusEffect};
    use crate::item::{Item, WeaponArchetype, WeaponMaterial};
    use crate::registry::{names, Formula, Provider};

    fn always_hit() -> Arc<FormulaRegistry> {
        let registry = FormulaRegistry::new();
        registry.register(
            names::SUCCESSFUL_HIT.name.clone(),
            Formula::successful_hit(|_, _, _, _, _| true),
            Provider::new("sure-hit", 1),
        );
        Arc::new(registry)
    }

    fn swordsman(id: u64) -> Character {
        let mut c = Character::humanoid(CombatantId::new(id)).with_skill(Skill::LongBlade, 60);
        c.equipment_mut().equip(
            EquipSlot::RightHand,
            Item::Weapon(Weapon::new(WeaponArchetype::Longsword, WeaponMaterial::Steel)),
        );
        c
    }

    mod facing_tests {
        use super::*;

        #[test]
        fn behind_exposes_back() {
            assert!(Facing::behind().is_back_exposed());
            assert!(!Facing::front().is_back_exposed());
            assert_eq!(Facing::default(), Facing::front());
        }

        #[test]
        fn degenerate_vectors_face_front() {
            assert!(!Facing::from_positions(Vec2::ZERO, Vec2::ZERO, Vec2::X).is_back_exposed());
            assert!(!Facing::from_positions(-Vec2::X, Vec2::ZERO, Vec2::ZERO).is_back_exposed());
        }
    }

    #[test]
    fn missing_side_is_a_miss() {
        let pipeline = CombatPipeline::new(always_hit());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut attacker = swordsman(1);
        let before = attacker.clone();

        let outcome = pipeline.resolve_attack(
            Some(&mut attacker),
            None,
            &AttackContext::armed(EquipSlot::RightHand),
            &mut rng,
        );
        assert_eq!(outcome, AttackOutcome::miss());
        assert_eq!(attacker, before);
    }

    #[test]
    fn landed_hit_reports_damage_type_and_region() {
        let pipeline = CombatPipeline::new(always_hit());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut attacker = swordsman(1);
        let mut target = Character::humanoid(CombatantId::new(2));
        let ctx = AttackContext::armed(EquipSlot::RightHand).with_swing(SwingDirection::Left);

        let outcome = pipeline.resolve_attack(Some(&mut attacker), Some(&mut target), &ctx, &mut rng);
        assert!(outcome.hit);
        assert_eq!(outcome.damage_type, Some(DamageType::Slashing));
        assert!(outcome.struck_region.is_some());
        assert!(outcome.damage > 0);
        assert!(outcome.weapon_used.is_some());
    }

    #[test]
    fn poison_is_spent_on_a_damaging_hit() {
        let pipeline = CombatPipeline::new(always_hit());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut attacker = swordsman(1);
        if let Some(w) = attacker.equipment_mut().weapon_mut(EquipSlot::RightHand) {
            w.poison = Some(Poison::Arsenic);
        }
        let mut target = Character::protagonist(CombatantId::new(2));

        let outcome = pipeline.resolve_attack(
            Some(&mut attacker),
            Some(&mut target),
            &AttackContext::armed(EquipSlot::RightHand),
            &mut rng,
        );
        assert!(outcome.damage > 0);
        assert_eq!(
            attacker
                .equipment()
                .weapon(EquipSlot::RightHand)
                .and_then(|w| w.poison),
            None
        );
    }

    #[test]
    fn weaponless_creature_switches_to_natural_attack() {
        let pipeline = CombatPipeline::new(always_hit());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut rat = Character::monster(CombatantId::new(5), MonsterCareer::Rat);
        rat.equipment_mut().equip(
            EquipSlot::RightHand,
            Item::Weapon(Weapon::new(WeaponArchetype::Dagger, WeaponMaterial::Iron)),
        );
        let mut target = Character::humanoid(CombatantId::new(2));

        let outcome = pipeline.resolve_attack(
            Some(&mut rat),
            Some(&mut target),
            &AttackContext::armed(EquipSlot::RightHand),
            &mut rng,
        );
        assert!(outcome.switched_to_natural_attack);
        assert_eq!(outcome.weapon_used, None);
        assert_eq!(outcome.damage_type, Some(DamageType::Bludgeoning));
    }

    #[test]
    fn inflictions_are_applied_to_target() {
        let registry = FormulaRegistry::new();
        registry.register(
            names::SUCCESSFUL_HIT.name.clone(),
            Formula::successful_hit(|_, _, _, _, _| true),
            Provider::new("sure-hit", 1),
        );
        registry.register(
            names::SAVING_THROW.name.clone(),
            Formula::saving_throw(|_, _, _| 100),
            Provider::new("no-saves", 1),
        );
        let pipeline = CombatPipeline::new(Arc::new(registry));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut spider = Character::monster(CombatantId::new(5), MonsterCareer::Spider);
        let mut target = Character::protagonist(CombatantId::new(2)).with_level(4);

        let mut paralyzed = false;
        for _ in 0..20 {
            let outcome = pipeline.resolve_attack(
                Some(&mut spider),
                Some(&mut target),
                &AttackContext::unarmed(),
                &mut rng,
            );
            if outcome.damage > 0 {
                paralyzed = true;
                break;
            }
        }
        assert!(paralyzed);
        assert!(target.has_effect(&StatusEffect::Paralyzed));
    }
}
