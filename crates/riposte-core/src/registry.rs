//! Formula override registry.
//!
//! Every pipeline stage is assembled from small named formulas. A provider
//! (a mod, a balance patch, a test) can replace any one of them by
//! registering a [`Formula`] under its name; the stage resolves the name
//! before running its built-in computation.
//!
//! # Priority
//!
//! At most one override per name is active. A registration replaces the
//! active entry only when its provider's priority is strictly higher; equal
//! or lower priorities are dropped, so the earlier registration wins ties.
//!
//! # Shapes
//!
//! A [`Formula`] is a sum type over the callable signatures the pipeline
//! knows. Each name expects exactly one [`FormulaShape`]. Registering the
//! wrong shape is accepted, but the first lookup notices the mismatch,
//! evicts the entry, logs a warning naming the provider, and reports
//! "not found" so the stage falls back to its built-in formula.
//!
//! # Example
//!
//! ```
//! use riposte_core::registry::{names, Formula, FormulaRegistry, Provider};
//!
//! let registry = FormulaRegistry::new();
//! registry.register(
//!     names::STATS_TO_HIT.name.clone(),
//!     Formula::pair_term(|_attacker, _target| 0),
//!     Provider::new("flat-stats", 1),
//! );
//! assert!(registry.pair_term(&names::STATS_TO_HIT).is_some());
//! assert!(registry.pair_term(&names::SKILLS_TO_HIT).is_none());
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entity::Combatant;
use crate::error::RegistryError;
use crate::item::{Armor, BodyRegion, DamageRange, DamageType, Weapon, WeaponArchetype, WeaponMaterial};
use crate::output::{CriticalStrike, Infliction};
use crate::resolver::resistance::SavingThrowRequest;

// =============================================================================
// Names and shapes
// =============================================================================

/// Globally unique formula name.
///
/// Built-in names are `'static` and cost nothing to clone.
///
/// # Example
///
/// ```
/// use riposte_core::registry::FormulaName;
///
/// const HIT: FormulaName = FormulaName::from_static("CalculateSuccessfulHit");
/// assert_eq!(HIT.as_str(), "CalculateSuccessfulHit");
/// assert_eq!(HIT, FormulaName::new("CalculateSuccessfulHit"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormulaName(Cow<'static, str>);

impl FormulaName {
    /// Creates a name from any string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Creates a name from a static string at compile time.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormulaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for FormulaName {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for FormulaName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Callable signature of a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaShape {
    /// See [`SuccessfulHitFn`].
    SuccessfulHit,
    /// See [`TargetRegionTermFn`].
    TargetRegionTerm,
    /// See [`PairTermFn`].
    PairTerm,
    /// See [`SingleTermFn`].
    SingleTerm,
    /// See [`WeaponRangeFn`].
    WeaponRange,
    /// See [`ConditionCurveFn`].
    ConditionCurve,
    /// See [`CriticalFn`].
    Critical,
    /// See [`MaterialMultiplierFn`].
    MaterialMultiplier,
    /// See [`DamageAdjustFn`].
    DamageAdjust,
    /// See [`BackstabFn`].
    Backstab,
    /// See [`StruckBodyPartFn`].
    StruckBodyPart,
    /// See [`BlockChanceFn`].
    BlockChance,
    /// See [`ReductionFn`].
    Reduction,
    /// See [`ArmorWearFn`].
    ArmorWear,
    /// See [`WeaponWearFn`].
    WeaponWear,
    /// See [`SavingThrowFn`].
    SavingThrow,
    /// See [`MonsterHitFn`].
    MonsterHit,
    /// See [`IntTermFn`].
    IntTerm,
}

impl fmt::Display for FormulaShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A formula name paired with the shape it must have.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormulaKey {
    /// Name.
    pub name: FormulaName,
    /// Required shape.
    pub shape: FormulaShape,
}

impl FormulaKey {
    /// Creates a key at compile time.
    #[must_use]
    pub const fn new(name: &'static str, shape: FormulaShape) -> Self {
        Self {
            name: FormulaName::from_static(name),
            shape,
        }
    }
}

/// Names of every formula the pipeline resolves.
pub mod names {
    use super::{FormulaKey, FormulaShape};

    /// Whole hit decision, replacing every hit term at once.
    pub const SUCCESSFUL_HIT: FormulaKey =
        FormulaKey::new("CalculateSuccessfulHit", FormulaShape::SuccessfulHit);
    /// Armor term of the hit chance.
    pub const ARMOR_TO_HIT: FormulaKey =
        FormulaKey::new("CalculateArmorToHit", FormulaShape::TargetRegionTerm);
    /// Adrenaline-rush term of the hit chance.
    pub const ADRENALINE_RUSH_TO_HIT: FormulaKey =
        FormulaKey::new("CalculateAdrenalineRushToHit", FormulaShape::PairTerm);
    /// Enchanted-gear term of the hit chance.
    pub const ENCHANTMENT_TO_HIT: FormulaKey =
        FormulaKey::new("CalculateEnchantmentToHit", FormulaShape::PairTerm);
    /// Stat-differential term of the hit chance.
    pub const STATS_TO_HIT: FormulaKey =
        FormulaKey::new("CalculateStatsToHit", FormulaShape::PairTerm);
    /// Target luck term of the hit chance.
    pub const LUCK_TO_HIT: FormulaKey =
        FormulaKey::new("CalculateLuckToHit", FormulaShape::SingleTerm);
    /// Defender skill term of the hit chance.
    pub const SKILLS_TO_HIT: FormulaKey =
        FormulaKey::new("CalculateSkillsToHit", FormulaShape::PairTerm);
    /// Biography term of the hit chance.
    pub const BIOGRAPHY_TO_HIT: FormulaKey =
        FormulaKey::new("CalculateAdjustmentsToHit", FormulaShape::PairTerm);
    /// Backstab bonus to the hit chance.
    pub const BACKSTAB_CHANCE: FormulaKey =
        FormulaKey::new("CalculateBackstabChance", FormulaShape::PairTerm);
    /// Strength bonus to damage.
    pub const STRENGTH_MODIFIER: FormulaKey =
        FormulaKey::new("DamageModifier", FormulaShape::IntTerm);
    /// Minimum unarmed damage from skill.
    pub const HAND_TO_HAND_MIN: FormulaKey =
        FormulaKey::new("CalculateHandToHandMinDamage", FormulaShape::IntTerm);
    /// Maximum unarmed damage from skill.
    pub const HAND_TO_HAND_MAX: FormulaKey =
        FormulaKey::new("CalculateHandToHandMaxDamage", FormulaShape::IntTerm);
    /// Opponent-type bonus or penalty.
    pub const OPPONENT_TYPE_MODIFIER: FormulaKey =
        FormulaKey::new("CalculateWeaponAttackDamageModifier", FormulaShape::PairTerm);
    /// Base weapon damage range.
    pub const WEAPON_DAMAGE_RANGE: FormulaKey =
        FormulaKey::new("CalculateWeaponDamageRange", FormulaShape::WeaponRange);
    /// Weapon condition multiplier.
    pub const WEAPON_CONDITION_MULTIPLIER: FormulaKey =
        FormulaKey::new("CalculateWeaponConditionMultiplier", FormulaShape::ConditionCurve);
    /// Critical-strike roll and its effect.
    pub const CRITICAL_STRIKE: FormulaKey =
        FormulaKey::new("CalculateCriticalStrike", FormulaShape::Critical);
    /// Material-resistance multiplier.
    pub const MATERIAL_RESISTANCE: FormulaKey =
        FormulaKey::new("CalculateMaterialResistance", FormulaShape::MaterialMultiplier);
    /// Final adjustment hook for weapon damage.
    pub const ADJUST_WEAPON_ATTACK_DAMAGE: FormulaKey =
        FormulaKey::new("AdjustWeaponAttackDamage", FormulaShape::DamageAdjust);
    /// Backstab damage multiplier.
    pub const BACKSTAB_DAMAGE: FormulaKey =
        FormulaKey::new("CalculateBackstabDamage", FormulaShape::Backstab);
    /// Struck body part selection.
    pub const STRUCK_BODY_PART: FormulaKey =
        FormulaKey::new("CalculateStruckBodyPart", FormulaShape::StruckBodyPart);
    /// Shield block chance.
    pub const BLOCK_CHANCE: FormulaKey =
        FormulaKey::new("CalculateBlockChance", FormulaShape::BlockChance);
    /// Armor or shield damage reduction.
    pub const DAMAGE_REDUCTION: FormulaKey =
        FormulaKey::new("CalculateDamageReduction", FormulaShape::Reduction);
    /// Armor condition loss.
    pub const ARMOR_WEAR: FormulaKey =
        FormulaKey::new("CalculateArmorWear", FormulaShape::ArmorWear);
    /// Weapon condition loss.
    pub const WEAPON_WEAR: FormulaKey =
        FormulaKey::new("CalculateWeaponWear", FormulaShape::WeaponWear);
    /// Saving throw.
    pub const SAVING_THROW: FormulaKey =
        FormulaKey::new("SavingThrow", FormulaShape::SavingThrow);
    /// Creature collateral effects on hit.
    pub const ON_MONSTER_HIT: FormulaKey =
        FormulaKey::new("OnMonsterHit", FormulaShape::MonsterHit);
}

// =============================================================================
// Formula
// =============================================================================

/// `(attacker, target, chance_to_hit_mod, struck_region, rng) -> hit`
pub type SuccessfulHitFn =
    dyn Fn(&dyn Combatant, &dyn Combatant, i32, BodyRegion, &mut dyn RngCore) -> bool + Send + Sync;
/// `(target, struck_region) -> term`
pub type TargetRegionTermFn = dyn Fn(&dyn Combatant, BodyRegion) -> i32 + Send + Sync;
/// `(attacker, target) -> term`
pub type PairTermFn = dyn Fn(&dyn Combatant, &dyn Combatant) -> i32 + Send + Sync;
/// `(combatant) -> term`
pub type SingleTermFn = dyn Fn(&dyn Combatant) -> i32 + Send + Sync;
/// `(value) -> value`
pub type IntTermFn = dyn Fn(i32) -> i32 + Send + Sync;
/// `(weapon, damage_type) -> base range`
pub type WeaponRangeFn = dyn Fn(&Weapon, DamageType) -> DamageRange + Send + Sync;
/// `(condition_percent, damage_type) -> multiplier`
pub type ConditionCurveFn = dyn Fn(i32, DamageType) -> f32 + Send + Sync;
/// `(attacker, damage_type, rng) -> critical`
pub type CriticalFn =
    dyn Fn(&dyn Combatant, DamageType, &mut dyn RngCore) -> CriticalStrike + Send + Sync;
/// `(target, weapon material or None for unarmed) -> multiplier`
pub type MaterialMultiplierFn =
    dyn Fn(&dyn Combatant, Option<WeaponMaterial>) -> f32 + Send + Sync;
/// `(attacker, target, damage, weapon) -> damage`
pub type DamageAdjustFn =
    dyn Fn(&dyn Combatant, &dyn Combatant, i32, &Weapon) -> i32 + Send + Sync;
/// `(damage, backstab_skill, weapon archetype, damage_type, rng) -> damage`
pub type BackstabFn = dyn Fn(i32, i32, Option<WeaponArchetype>, DamageType, &mut dyn RngCore) -> i32
    + Send
    + Sync;
/// `(rng) -> region`
pub type StruckBodyPartFn = dyn Fn(&mut dyn RngCore) -> BodyRegion + Send + Sync;
/// `(defender, shield, region_is_covered) -> chance`
pub type BlockChanceFn = dyn Fn(&dyn Combatant, &Armor, bool) -> i32 + Send + Sync;
/// `(armor, damage_type, critical_penetration) -> fraction`
pub type ReductionFn = dyn Fn(&Armor, DamageType, f32) -> f32 + Send + Sync;
/// `(armor, absorbed, damage_type, weapon_based) -> loss`
pub type ArmorWearFn = dyn Fn(&Armor, i32, DamageType, bool) -> i32 + Send + Sync;
/// `(weapon, damage, damage_type, struck_metal, rng) -> loss`
pub type WeaponWearFn =
    dyn Fn(&Weapon, i32, DamageType, bool, &mut dyn RngCore) -> i32 + Send + Sync;
/// `(request, target, rng) -> percent of effect that lands`
pub type SavingThrowFn =
    dyn Fn(&SavingThrowRequest, &dyn Combatant, &mut dyn RngCore) -> i32 + Send + Sync;
/// `(attacker, target, damage, rng) -> effects`
pub type MonsterHitFn = dyn Fn(&dyn Combatant, &dyn Combatant, i32, &mut dyn RngCore) -> Vec<Infliction>
    + Send
    + Sync;

/// A replacement formula, tagged by its callable shape.
#[derive(Clone)]
pub enum Formula {
    /// Whole hit decision.
    SuccessfulHit(Arc<SuccessfulHitFn>),
    /// Term computed from target and struck region.
    TargetRegionTerm(Arc<TargetRegionTermFn>),
    /// Term computed from attacker and target.
    PairTerm(Arc<PairTermFn>),
    /// Term computed from one combatant.
    SingleTerm(Arc<SingleTermFn>),
    /// Integer transform.
    IntTerm(Arc<IntTermFn>),
    /// Base weapon range.
    WeaponRange(Arc<WeaponRangeFn>),
    /// Condition multiplier curve.
    ConditionCurve(Arc<ConditionCurveFn>),
    /// Critical strike.
    Critical(Arc<CriticalFn>),
    /// Material multiplier.
    MaterialMultiplier(Arc<MaterialMultiplierFn>),
    /// Damage adjustment.
    DamageAdjust(Arc<DamageAdjustFn>),
    /// Backstab damage.
    Backstab(Arc<BackstabFn>),
    /// Body-part selection.
    StruckBodyPart(Arc<StruckBodyPartFn>),
    /// Block chance.
    BlockChance(Arc<BlockChanceFn>),
    /// Damage reduction.
    Reduction(Arc<ReductionFn>),
    /// Armor wear.
    ArmorWear(Arc<ArmorWearFn>),
    /// Weapon wear.
    WeaponWear(Arc<WeaponWearFn>),
    /// Saving throw.
    SavingThrow(Arc<SavingThrowFn>),
    /// Creature collateral effects.
    MonsterHit(Arc<MonsterHitFn>),
}

impl Formula {
    /// Shape of this formula.
    #[must_use]
    pub const fn shape(&self) -> FormulaShape {
        match self {
            Formula::SuccessfulHit(_) => FormulaShape::SuccessfulHit,
            Formula::TargetRegionTerm(_) => FormulaShape::TargetRegionTerm,
            Formula::PairTerm(_) => FormulaShape::PairTerm,
            Formula::SingleTerm(_) => FormulaShape::SingleTerm,
            Formula::IntTerm(_) => FormulaShape::IntTerm,
            Formula::WeaponRange(_) => FormulaShape::WeaponRange,
            Formula::ConditionCurve(_) => FormulaShape::ConditionCurve,
            Formula::Critical(_) => FormulaShape::Critical,
            Formula::MaterialMultiplier(_) => FormulaShape::MaterialMultiplier,
            Formula::DamageAdjust(_) => FormulaShape::DamageAdjust,
            Formula::Backstab(_) => FormulaShape::Backstab,
            Formula::StruckBodyPart(_) => FormulaShape::StruckBodyPart,
            Formula::BlockChance(_) => FormulaShape::BlockChance,
            Formula::Reduction(_) => FormulaShape::Reduction,
            Formula::ArmorWear(_) => FormulaShape::ArmorWear,
            Formula::WeaponWear(_) => FormulaShape::WeaponWear,
            Formula::SavingThrow(_) => FormulaShape::SavingThrow,
            Formula::MonsterHit(_) => FormulaShape::MonsterHit,
        }
    }

    /// Wraps a whole-hit closure.
    pub fn successful_hit(
        f: impl Fn(&dyn Combatant, &dyn Combatant, i32, BodyRegion, &mut dyn RngCore) -> bool
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Formula::SuccessfulHit(Arc::new(f))
    }

    /// Wraps a target/region term closure.
    pub fn target_region_term(
        f: impl Fn(&dyn Combatant, BodyRegion) -> i32 + Send + Sync + 'static,
    ) -> Self {
        Formula::TargetRegionTerm(Arc::new(f))
    }

    /// Wraps an attacker/target term closure.
    pub fn pair_term(
        f: impl Fn(&dyn Combatant, &dyn Combatant) -> i32 + Send + Sync + 'static,
    ) -> Self {
        Formula::PairTerm(Arc::new(f))
    }

    /// Wraps a single-combatant term closure.
    pub fn single_term(f: impl Fn(&dyn Combatant) -> i32 + Send + Sync + 'static) -> Self {
        Formula::SingleTerm(Arc::new(f))
    }

    /// Wraps an integer transform.
    pub fn int_term(f: impl Fn(i32) -> i32 + Send + Sync + 'static) -> Self {
        Formula::IntTerm(Arc::new(f))
    }

    /// Wraps a weapon range closure.
    pub fn weapon_range(
        f: impl Fn(&Weapon, DamageType) -> DamageRange + Send + Sync + 'static,
    ) -> Self {
        Formula::WeaponRange(Arc::new(f))
    }

    /// Wraps a condition-curve closure.
    pub fn condition_curve(f: impl Fn(i32, DamageType) -> f32 + Send + Sync + 'static) -> Self {
        Formula::ConditionCurve(Arc::new(f))
    }

    /// Wraps a material-multiplier closure.
    pub fn material_multiplier(
        f: impl Fn(&dyn Combatant, Option<WeaponMaterial>) -> f32 + Send + Sync + 'static,
    ) -> Self {
        Formula::MaterialMultiplier(Arc::new(f))
    }

    /// Wraps a critical-strike closure.
    pub fn critical(
        f: impl Fn(&dyn Combatant, DamageType, &mut dyn RngCore) -> CriticalStrike
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Formula::Critical(Arc::new(f))
    }

    /// Wraps a block-chance closure.
    pub fn block_chance(
        f: impl Fn(&dyn Combatant, &Armor, bool) -> i32 + Send + Sync + 'static,
    ) -> Self {
        Formula::BlockChance(Arc::new(f))
    }

    /// Wraps a damage-adjustment closure.
    pub fn damage_adjust(
        f: impl Fn(&dyn Combatant, &dyn Combatant, i32, &Weapon) -> i32 + Send + Sync + 'static,
    ) -> Self {
        Formula::DamageAdjust(Arc::new(f))
    }

    /// Wraps a backstab closure.
    pub fn backstab(
        f: impl Fn(i32, i32, Option<WeaponArchetype>, DamageType, &mut dyn RngCore) -> i32
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Formula::Backstab(Arc::new(f))
    }

    /// Wraps a body-part closure.
    pub fn struck_body_part(
        f: impl Fn(&mut dyn RngCore) -> BodyRegion + Send + Sync + 'static,
    ) -> Self {
        Formula::StruckBodyPart(Arc::new(f))
    }

    /// Wraps a damage-reduction closure.
    pub fn reduction(f: impl Fn(&Armor, DamageType, f32) -> f32 + Send + Sync + 'static) -> Self {
        Formula::Reduction(Arc::new(f))
    }

    /// Wraps an armor-wear closure.
    pub fn armor_wear(
        f: impl Fn(&Armor, i32, DamageType, bool) -> i32 + Send + Sync + 'static,
    ) -> Self {
        Formula::ArmorWear(Arc::new(f))
    }

    /// Wraps a weapon-wear closure.
    pub fn weapon_wear(
        f: impl Fn(&Weapon, i32, DamageType, bool, &mut dyn RngCore) -> i32 + Send + Sync + 'static,
    ) -> Self {
        Formula::WeaponWear(Arc::new(f))
    }

    /// Wraps a saving-throw closure.
    pub fn saving_throw(
        f: impl Fn(&SavingThrowRequest, &dyn Combatant, &mut dyn RngCore) -> i32
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Formula::SavingThrow(Arc::new(f))
    }

    /// Wraps a creature-hit closure.
    pub fn monster_hit(
        f: impl Fn(&dyn Combatant, &dyn Combatant, i32, &mut dyn RngCore) -> Vec<Infliction>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Formula::MonsterHit(Arc::new(f))
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Formula::{}", self.shape())
    }
}

// =============================================================================
// Providers
// =============================================================================

/// Identity and priority of whoever installs an override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provider {
    /// Display name, used in diagnostics.
    pub name: String,
    /// Higher priorities supersede lower ones.
    pub priority: i32,
}

impl Provider {
    /// Creates a provider.
    #[must_use]
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (priority {})", self.name, self.priority)
    }
}

/// What happened to a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// No entry existed; this one is now active.
    Installed,
    /// Superseded a lower-priority entry.
    Replaced {
        /// Provider of the entry that was replaced.
        previous: Provider,
    },
    /// Dropped because the active entry has equal or higher priority.
    Rejected {
        /// Provider of the entry that stays active.
        incumbent: Provider,
    },
}

impl Registration {
    /// Returns `true` if the new formula is now active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Registration::Rejected { .. })
    }
}

#[derive(Clone)]
struct OverrideEntry {
    formula: Formula,
    provider: Provider,
}

// =============================================================================
// FormulaRegistry
// =============================================================================

/// Name-keyed, priority-resolved table of formula overrides.
///
/// Shared between threads behind an [`Arc`]; lookups take a read lock,
/// registration and eviction a write lock. A lookup racing a registration
/// sees either the old or the new entry, never a partial one.
#[derive(Default)]
pub struct FormulaRegistry {
    entries: RwLock<HashMap<FormulaName, OverrideEntry>>,
}

impl FormulaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `formula` under `name` unless an entry with equal or higher
    /// priority is already active.
    pub fn register(
        &self,
        name: impl Into<FormulaName>,
        formula: Formula,
        provider: Provider,
    ) -> Registration {
        let name = name.into();
        let mut entries = self.entries.write();
        let outcome = match entries.get(&name) {
            Some(existing) if existing.provider.priority >= provider.priority => {
                return Registration::Rejected {
                    incumbent: existing.provider.clone(),
                };
            }
            Some(existing) => Registration::Replaced {
                previous: existing.provider.clone(),
            },
            None => Registration::Installed,
        };
        debug!(
            target: "riposte::registry",
            formula = %name,
            provider = %provider,
            shape = %formula.shape(),
            "formula override installed"
        );
        entries.insert(name, OverrideEntry { formula, provider });
        outcome
    }

    /// Looks up `key`, evicting the entry if its shape is wrong.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ShapeMismatch`] when an entry exists under
    /// the name but has a different shape. The entry has already been
    /// evicted when the error is returned.
    pub fn try_resolve(&self, key: &FormulaKey) -> Result<Option<Formula>, RegistryError> {
        {
            let entries = self.entries.read();
            match entries.get(&key.name) {
                None => return Ok(None),
                Some(entry) if entry.formula.shape() == key.shape => {
                    return Ok(Some(entry.formula.clone()));
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write();
        // A registration may have landed between the two locks.
        match entries.get(&key.name) {
            None => Ok(None),
            Some(entry) if entry.formula.shape() == key.shape => Ok(Some(entry.formula.clone())),
            Some(entry) => {
                let err = RegistryError::ShapeMismatch {
                    name: key.name.clone(),
                    provider: entry.provider.name.clone(),
                    expected: key.shape,
                    found: entry.formula.shape(),
                };
                entries.remove(&key.name);
                Err(err)
            }
        }
    }

    /// Looks up `key`; a malformed entry is evicted, logged, and reported as
    /// absent.
    #[must_use]
    pub fn resolve(&self, key: &FormulaKey) -> Option<Formula> {
        match self.try_resolve(key) {
            Ok(formula) => formula,
            Err(err) => {
                warn!(target: "riposte::registry", error = %err, "evicting malformed formula override");
                None
            }
        }
    }

    /// Provider of the active entry under `name`.
    #[must_use]
    pub fn provider_of(&self, name: &FormulaName) -> Option<Provider> {
        self.entries.read().get(name).map(|e| e.provider.clone())
    }

    /// Returns `true` if an entry exists under `name`.
    #[must_use]
    pub fn contains(&self, name: &FormulaName) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Number of active entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no overrides are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

macro_rules! typed_lookup {
    ($($(#[$doc:meta])* $method:ident => $variant:ident($callable:ty);)*) => {
        impl FormulaRegistry {
            $(
                $(#[$doc])*
                #[must_use]
                pub fn $method(&self, key: &FormulaKey) -> Option<Arc<$callable>> {
                    match self.resolve(key)? {
                        Formula::$variant(f) => Some(f),
                        _ => None,
                    }
                }
            )*
        }
    };
}

typed_lookup! {
    /// Resolves a whole-hit override.
    successful_hit => SuccessfulHit(SuccessfulHitFn);
    /// Resolves a target/region term override.
    target_region_term => TargetRegionTerm(TargetRegionTermFn);
    /// Resolves an attacker/target term override.
    pair_term => PairTerm(PairTermFn);
    /// Resolves a single-combatant term override.
    single_term => SingleTerm(SingleTermFn);
    /// Resolves an integer transform override.
    int_term => IntTerm(IntTermFn);
    /// Resolves a weapon range override.
    weapon_range => WeaponRange(WeaponRangeFn);
    /// Resolves a condition curve override.
    condition_curve => ConditionCurve(ConditionCurveFn);
    /// Resolves a critical-strike override.
    critical => Critical(CriticalFn);
    /// Resolves a material multiplier override.
    material_multiplier => MaterialMultiplier(MaterialMultiplierFn);
    /// Resolves a damage adjustment override.
    damage_adjust => DamageAdjust(DamageAdjustFn);
    /// Resolves a backstab override.
    backstab => Backstab(BackstabFn);
    /// Resolves a body-part override.
    struck_body_part => StruckBodyPart(StruckBodyPartFn);
    /// Resolves a block-chance override.
    block_chance => BlockChance(BlockChanceFn);
    /// Resolves a reduction override.
    reduction => Reduction(ReductionFn);
    /// Resolves an armor wear override.
    armor_wear => ArmorWear(ArmorWearFn);
    /// Resolves a weapon wear override.
    weapon_wear => WeaponWear(WeaponWearFn);
    /// Resolves a saving-throw override.
    saving_throw => SavingThrow(SavingThrowFn);
    /// Resolves a creature-hit override.
    monster_hit => MonsterHit(MonsterHitFn);
}

impl fmt::Debug for FormulaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        let mut names: Vec<&str> = entries.keys().map(FormulaName::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FormulaRegistry")
            .field("overrides", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: i32) -> Formula {
        Formula::pair_term(move |_, _| value)
    }

    mod name_tests {
        use super::*;

        #[test]
        fn static_and_owned_names_are_equal() {
            assert_eq!(
                FormulaName::from_static("X"),
                FormulaName::new(String::from("X"))
            );
        }

        #[test]
        fn display() {
            assert_eq!(names::SAVING_THROW.name.to_string(), "SavingThrow");
        }

        #[test]
        fn every_builtin_name_is_unique() {
            let keys = [
                names::SUCCESSFUL_HIT,
                names::ARMOR_TO_HIT,
                names::ADRENALINE_RUSH_TO_HIT,
                names::ENCHANTMENT_TO_HIT,
                names::STATS_TO_HIT,
                names::LUCK_TO_HIT,
                names::SKILLS_TO_HIT,
                names::BIOGRAPHY_TO_HIT,
                names::BACKSTAB_CHANCE,
                names::STRENGTH_MODIFIER,
                names::HAND_TO_HAND_MIN,
                names::HAND_TO_HAND_MAX,
                names::OPPONENT_TYPE_MODIFIER,
                names::WEAPON_DAMAGE_RANGE,
                names::WEAPON_CONDITION_MULTIPLIER,
                names::CRITICAL_STRIKE,
                names::MATERIAL_RESISTANCE,
                names::ADJUST_WEAPON_ATTACK_DAMAGE,
                names::BACKSTAB_DAMAGE,
                names::STRUCK_BODY_PART,
                names::BLOCK_CHANCE,
                names::DAMAGE_REDUCTION,
                names::ARMOR_WEAR,
                names::WEAPON_WEAR,
                names::SAVING_THROW,
                names::ON_MONSTER_HIT,
            ];
            let unique: std::collections::HashSet<_> = keys.iter().map(|k| &k.name).collect();
            assert_eq!(unique.len(), keys.len());
        }
    }

    mod registration_tests {
        use super::*;

        #[test]
        fn first_registration_installs() {
            let registry = FormulaRegistry::new();
            let outcome = registry.register("X", constant(1), Provider::new("p1", 1));
            assert_eq!(outcome, Registration::Installed);
            assert_eq!(registry.len(), 1);
        }

        #[test]
        fn higher_priority_replaces() {
            let registry = FormulaRegistry::new();
            registry.register("X", constant(1), Provider::new("p1", 1));
            let outcome = registry.register("X", constant(5), Provider::new("p2", 5));
            assert_eq!(
                outcome,
                Registration::Replaced {
                    previous: Provider::new("p1", 1)
                }
            );
            assert_eq!(
                registry.provider_of(&FormulaName::new("X")),
                Some(Provider::new("p2", 5))
            );
        }

        #[test]
        fn equal_priority_keeps_earlier() {
            let registry = FormulaRegistry::new();
            registry.register("X", constant(5), Provider::new("p2", 5));
            let outcome = registry.register("X", constant(9), Provider::new("p3", 5));
            assert!(!outcome.is_active());
            assert_eq!(
                registry.provider_of(&FormulaName::new("X")).map(|p| p.name),
                Some("p2".to_string())
            );
        }

        #[test]
        fn lower_priority_rejected() {
            let registry = FormulaRegistry::new();
            registry.register("X", constant(5), Provider::new("high", 10));
            let outcome = registry.register("X", constant(1), Provider::new("low", 2));
            assert_eq!(
                outcome,
                Registration::Rejected {
                    incumbent: Provider::new("high", 10)
                }
            );
        }

        #[test]
        fn same_registration_twice_leaves_one_entry() {
            let registry = FormulaRegistry::new();
            let formula = constant(3);
            let provider = Provider::new("p", 1);
            registry.register("X", formula.clone(), provider.clone());
            registry.register("X", formula, provider);
            assert_eq!(registry.len(), 1);
        }
    }

    mod resolution_tests {
        use super::*;
        use crate::entity::{Character, CombatantId};

        #[test]
        fn missing_name_resolves_to_none() {
            let registry = FormulaRegistry::new();
            assert!(registry.resolve(&names::STATS_TO_HIT).is_none());
        }

        #[test]
        fn matching_shape_resolves() {
            let registry = FormulaRegistry::new();
            registry.register(names::STATS_TO_HIT.name.clone(), constant(7), Provider::new("p", 1));
            let f = registry.pair_term(&names::STATS_TO_HIT).unwrap();
            let a = Character::humanoid(CombatantId::new(1));
            let t = Character::humanoid(CombatantId::new(2));
            assert_eq!(f(&a, &t), 7);
        }

        #[test]
        fn mismatched_shape_is_evicted() {
            let registry = FormulaRegistry::new();
            registry.register(
                names::STATS_TO_HIT.name.clone(),
                Formula::int_term(|x| x),
                Provider::new("broken-mod", 1),
            );

            let err = registry.try_resolve(&names::STATS_TO_HIT).unwrap_err();
            assert_eq!(
                err,
                RegistryError::ShapeMismatch {
                    name: names::STATS_TO_HIT.name.clone(),
                    provider: "broken-mod".to_string(),
                    expected: FormulaShape::PairTerm,
                    found: FormulaShape::IntTerm,
                }
            );
            assert!(!registry.contains(&names::STATS_TO_HIT.name));
            assert!(registry.resolve(&names::STATS_TO_HIT).is_none());
        }

        #[test]
        fn resolve_logs_and_returns_none_on_mismatch() {
            let registry = FormulaRegistry::new();
            registry.register(
                names::SAVING_THROW.name.clone(),
                constant(1),
                Provider::new("broken-mod", 1),
            );
            assert!(registry.saving_throw(&names::SAVING_THROW).is_none());
            assert!(registry.is_empty());
        }

        #[test]
        fn evicted_name_can_be_registered_again() {
            let registry = FormulaRegistry::new();
            registry.register(
                names::STATS_TO_HIT.name.clone(),
                Formula::int_term(|x| x),
                Provider::new("broken", 100),
            );
            let _ = registry.resolve(&names::STATS_TO_HIT);
            let outcome = registry.register(
                names::STATS_TO_HIT.name.clone(),
                constant(0),
                Provider::new("fixed", 1),
            );
            assert_eq!(outcome, Registration::Installed);
        }

        #[test]
        fn debug_lists_names_sorted() {
            let registry = FormulaRegistry::new();
            registry.register("B", constant(0), Provider::new("p", 1));
            registry.register("A", constant(0), Provider::new("p", 1));
            let dbg = format!("{registry:?}");
            assert!(dbg.contains("[\"A\", \"B\"]"));
        }
    }

    mod concurrency_tests {
        use super::*;
        use rayon::prelude::*;

        #[test]
        fn concurrent_registration_keeps_highest_priority() {
            let registry = FormulaRegistry::new();
            (0..64).into_par_iter().for_each(|priority| {
                registry.register("X", constant(priority), Provider::new(format!("p{priority}"), priority));
            });
            assert_eq!(
                registry.provider_of(&FormulaName::new("X")).map(|p| p.priority),
                Some(63)
            );
        }
    }
}
