//! Results of a resolved attack.
//!
//! An [`AttackOutcome`] is built fresh for every call to
//! [`CombatPipeline::resolve_attack`](crate::pipeline::CombatPipeline::resolve_attack)
//! and owned by the caller. It reports what happened. Equipment wear and
//! status effects are already applied by the time it is returned, while
//! health is left for the host to subtract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{InflictFlags, StatusBundle};
use crate::item::{BodyRegion, DamageRange, DamageType, EquipSlot, ItemCategory, Weapon};

// =============================================================================
// Stage results
// =============================================================================

/// Result of the critical-strike roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalStrike {
    /// The roll succeeded.
    pub success: bool,
    /// Damage multiplier (1.0 when the roll failed).
    pub multiplier: f32,
    /// Fraction of armor protection ignored.
    pub penetration: f32,
    /// Shield blocks are cancelled.
    pub bypass_shield: bool,
}

impl CriticalStrike {
    /// A failed roll.
    pub const NONE: CriticalStrike = CriticalStrike {
        success: false,
        multiplier: 1.0,
        penetration: 0.0,
        bypass_shield: false,
    };
}

impl Default for CriticalStrike {
    fn default() -> Self {
        Self::NONE
    }
}

/// Result of the damage stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Range the roll was made in, after material, condition and limits.
    pub range: Option<DamageRange>,
    /// Raw roll inside `range`.
    pub rolled: i32,
    /// Final damage before mitigation.
    pub damage: i32,
    /// The backstab multiplier applied.
    pub backstab: bool,
}

/// Which piece of equipment stood between the blow and the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protection {
    /// An off-hand shield, or a creature's natural shield when `slot` is
    /// `None`.
    Shield {
        /// Slot of an equipped shield.
        slot: Option<EquipSlot>,
        /// Shield material is metal.
        metal: bool,
    },
    /// Body armor over the struck region.
    Armor {
        /// Slot of the armor piece.
        slot: EquipSlot,
        /// Armor material is metal.
        metal: bool,
    },
}

impl Protection {
    /// Equipment slot to apply wear to, if the protection is a real item.
    #[must_use]
    pub const fn wear_slot(self) -> Option<EquipSlot> {
        match self {
            Protection::Shield { slot, .. } => slot,
            Protection::Armor { slot, .. } => Some(slot),
        }
    }
}

/// Result of the mitigation stage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Mitigation {
    /// Damage that reaches the target.
    pub damage: i32,
    /// Damage stopped by the protection.
    pub absorbed: i32,
    /// Fraction of damage stopped, in `0.0..=1.0`.
    pub reduction: f32,
    /// A shield block succeeded (and was not bypassed).
    pub shield_block_success: bool,
    /// Protection that was used.
    pub protection: Option<Protection>,
}

impl Mitigation {
    /// No protection at all.
    #[must_use]
    pub const fn unprotected(damage: i32) -> Self {
        Self {
            damage,
            absorbed: 0,
            reduction: 0.0,
            shield_block_success: false,
            protection: None,
        }
    }

    /// Some, but not all, damage was absorbed.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.absorbed > 0 && self.damage > 0
    }

    /// All damage was absorbed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.absorbed > 0 && self.damage == 0
    }
}

// =============================================================================
// Inflictions
// =============================================================================

/// A collateral effect produced by a landed blow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Infliction {
    /// Attach a status effect to the target.
    Status {
        /// Effect and strength.
        bundle: StatusBundle,
        /// How to attach it.
        flags: InflictFlags,
    },
    /// Drain the target's fatigue by this many points.
    FatigueDrain(i32),
}

impl Infliction {
    /// A status effect whose saving throw has already been rolled.
    #[must_use]
    pub const fn saved(bundle: StatusBundle) -> Self {
        Infliction::Status {
            bundle,
            flags: InflictFlags::BYPASS_SAVING_THROWS,
        }
    }

    /// A creature-borne infection.
    #[must_use]
    pub const fn infection(bundle: StatusBundle) -> Self {
        Infliction::Status {
            bundle,
            flags: InflictFlags::SPECIAL_INFECTION,
        }
    }
}

impl fmt::Display for Infliction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infliction::Status { bundle, .. } => {
                write!(f, "{} at {}%", bundle.effect, bundle.magnitude_percent)
            }
            Infliction::FatigueDrain(amount) => write!(f, "fatigue drain {amount}"),
        }
    }
}

// =============================================================================
// Wear
// =============================================================================

/// Kind of low-condition warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WearWarningKind {
    /// Dropped below the first threshold (48%).
    WornDown,
    /// Dropped below the second threshold (15%).
    NearlyBroken,
    /// Lost a large share of its condition in one hit.
    HeavyDamage,
    /// Reached zero condition.
    Broken,
}

/// A low-condition warning for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WearWarning {
    /// Slot of the item.
    pub slot: EquipSlot,
    /// Category, selects the flavor text.
    pub category: ItemCategory,
    /// What happened.
    pub kind: WearWarningKind,
}

impl WearWarning {
    /// Player-facing text.
    ///
    /// # Example
    ///
    /// ```
    /// use riposte_core::item::{EquipSlot, ItemCategory};
    /// use riposte_core::output::{WearWarning, WearWarningKind};
    ///
    /// let warning = WearWarning {
    ///     slot: EquipSlot::LeftHand,
    ///     category: ItemCategory::Shield,
    ///     kind: WearWarningKind::NearlyBroken,
    /// };
    /// assert_eq!(warning.message(), "Your shield is about to split apart.");
    /// ```
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match (self.category, self.kind) {
            (ItemCategory::Weapon, WearWarningKind::WornDown) => "Your weapon is getting dull.",
            (ItemCategory::Weapon, WearWarningKind::NearlyBroken) => "Your weapon is about to break.",
            (ItemCategory::Weapon, WearWarningKind::HeavyDamage) => "Your weapon took a heavy blow.",
            (ItemCategory::Weapon, WearWarningKind::Broken) => "Your weapon breaks.",
            (ItemCategory::Armor, WearWarningKind::WornDown) => "Your armor is showing wear.",
            (ItemCategory::Armor, WearWarningKind::NearlyBroken) => "Your armor is falling apart.",
            (ItemCategory::Armor, WearWarningKind::HeavyDamage) => "Your armor buckles under the blow.",
            (ItemCategory::Armor, WearWarningKind::Broken) => "Your armor is ruined.",
            (ItemCategory::Shield, WearWarningKind::WornDown) => "Your shield is battered.",
            (ItemCategory::Shield, WearWarningKind::NearlyBroken) => {
                "Your shield is about to split apart."
            }
            (ItemCategory::Shield, WearWarningKind::HeavyDamage) => "Your shield cracks.",
            (ItemCategory::Shield, WearWarningKind::Broken) => "Your shield shatters.",
            (ItemCategory::Jewellery, WearWarningKind::WornDown) => "Your jewellery is scratched.",
            (ItemCategory::Jewellery, WearWarningKind::NearlyBroken) => {
                "Your jewellery is badly damaged."
            }
            (ItemCategory::Jewellery, WearWarningKind::HeavyDamage) => "Your jewellery is dented.",
            (ItemCategory::Jewellery, WearWarningKind::Broken) => "Your jewellery breaks.",
        }
    }
}

impl fmt::Display for WearWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Condition lost by one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWear {
    /// Slot of the item.
    pub slot: EquipSlot,
    /// Condition points removed.
    pub loss: i32,
    /// Condition percentage before the hit.
    pub before_percent: i32,
    /// Condition percentage after the hit.
    pub after_percent: i32,
    /// The item was enchanted and has been removed from its slot.
    pub destroyed: bool,
}

/// Equipment wear caused by one attack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WearReport {
    /// Target's armor or shield.
    pub armor: Option<ItemWear>,
    /// Attacker's weapon.
    pub weapon: Option<ItemWear>,
    /// Warnings raised, armor first.
    pub warnings: Vec<WearWarning>,
}

// =============================================================================
// AttackOutcome
// =============================================================================

/// Everything that happened during one attack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// The attack connected.
    pub hit: bool,
    /// Damage for the host to subtract from the target's health.
    pub damage: i32,
    /// Damage type the attack was resolved with.
    pub damage_type: Option<DamageType>,
    /// Body region struck.
    pub struck_region: Option<BodyRegion>,
    /// The critical-strike roll succeeded.
    pub critical: bool,
    /// The backstab multiplier applied.
    pub backstab: bool,
    /// A shield block succeeded.
    pub shield_block_success: bool,
    /// Armor absorbed some, but not all, of the damage.
    pub partial_absorption: bool,
    /// Armor absorbed all of the damage.
    pub complete_absorption: bool,
    /// The protection used was a metal shield.
    pub metal_shield: bool,
    /// The protection used was metal armor.
    pub metal_armor: bool,
    /// A creature holding a weapon attacked with claws or fists instead.
    pub switched_to_natural_attack: bool,
    /// The weapon actually used, as it was before wear; `None` for natural
    /// and unarmed attacks.
    pub weapon_used: Option<Weapon>,
    /// Equipment wear.
    pub wear: WearReport,
    /// Collateral effects applied to the target.
    pub inflictions: Vec<Infliction>,
}

impl AttackOutcome {
    /// A miss.
    #[must_use]
    pub fn miss() -> Self {
        Self::default()
    }

    /// Returns `true` if the attack hit and dealt damage.
    #[must_use]
    pub const fn dealt_damage(&self) -> bool {
        self.hit && self.damage > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::StatusEffect;

    #[test]
    fn miss_is_empty() {
        let outcome = AttackOutcome::miss();
        assert!(!outcome.hit);
        assert_eq!(outcome.damage, 0);
        assert!(!outcome.dealt_damage());
        assert!(outcome.inflictions.is_empty());
        assert!(outcome.wear.warnings.is_empty());
    }

    #[test]
    fn mitigation_absorption_flags() {
        let partial = Mitigation {
            damage: 4,
            absorbed: 2,
            ..Mitigation::default()
        };
        assert!(partial.is_partial());
        assert!(!partial.is_complete());

        let complete = Mitigation {
            damage: 0,
            absorbed: 6,
            ..Mitigation::default()
        };
        assert!(complete.is_complete());
        assert!(!Mitigation::unprotected(5).is_partial());
    }

    #[test]
    fn natural_shield_has_no_wear_slot() {
        let natural = Protection::Shield {
            slot: None,
            metal: false,
        };
        assert_eq!(natural.wear_slot(), None);
        let helm = Protection::Armor {
            slot: EquipSlot::Head,
            metal: true,
        };
        assert_eq!(helm.wear_slot(), Some(EquipSlot::Head));
    }

    #[test]
    fn failed_critical_is_neutral() {
        let none = CriticalStrike::default();
        assert!(!none.success);
        assert!((none.multiplier - 1.0).abs() < f32::EPSILON);
        assert!(!none.bypass_shield);
    }

    #[test]
    fn infliction_constructors_set_flags() {
        let saved = Infliction::saved(StatusBundle::new(StatusEffect::Paralyzed, 40));
        assert!(matches!(
            saved,
            Infliction::Status { flags, .. } if flags == InflictFlags::BYPASS_SAVING_THROWS
        ));
        let infection = Infliction::infection(StatusBundle::full(StatusEffect::Vampirism));
        assert!(matches!(
            infection,
            Infliction::Status { flags, .. } if flags == InflictFlags::SPECIAL_INFECTION
        ));
    }

    #[test]
    fn infliction_display() {
        assert_eq!(Infliction::FatigueDrain(12).to_string(), "fatigue drain 12");
        assert_eq!(
            Infliction::saved(StatusBundle::new(StatusEffect::Paralyzed, 40)).to_string(),
            "paralyzed at 40%"
        );
    }

    #[test]
    fn warning_text_depends_on_category() {
        let weapon = WearWarning {
            slot: EquipSlot::RightHand,
            category: ItemCategory::Weapon,
            kind: WearWarningKind::Broken,
        };
        let armor = WearWarning {
            category: ItemCategory::Armor,
            ..weapon
        };
        assert_ne!(weapon.message(), armor.message());
        assert_eq!(weapon.to_string(), "Your weapon breaks.");
    }

    #[test]
    fn outcome_serializes() {
        let outcome = AttackOutcome {
            hit: true,
            damage: 7,
            damage_type: Some(DamageType::Slashing),
            ..AttackOutcome::default()
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let back: AttackOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}
