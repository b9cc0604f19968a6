//! The resolution stages of an attack.
//!
//! Each stage exposes its built-in formulas as public free functions plus one
//! entry point that consults the [`FormulaRegistry`] before falling back to
//! the built-in. Stages run strictly in order, except that the block roll in
//! [`mitigation`] is drawn between the critical roll and the damage roll:
//!
//! 1. [`hit`]: accumulated hit chance and the hit roll
//! 2. [`damage`]: critical roll, base range, multipliers and backstab
//! 3. [`mitigation`]: struck region, shield block and armor reduction
//! 4. [`wear`]: condition loss on the struck protection and the weapon
//! 5. [`resistance`]: saving throws for any effect that follows
//! 6. [`special`]: poison, crippling and creature side effects
//!
//! # Invariants
//!
//! - Stages never touch health; the host applies the reported damage
//! - Stages read combatants through `&dyn Combatant`; only
//!   [`wear::commit_wear`] and the pipeline's commit step mutate
//! - All randomness comes from the caller's `&mut dyn RngCore`

pub mod damage;
pub mod hit;
pub mod mitigation;
pub mod resistance;
pub mod special;
pub mod wear;

use crate::config::CombatConfig;
use crate::entity::Combatant;
use crate::registry::{FormulaKey, FormulaRegistry};

/// Registry and configuration a stage resolves against.
///
/// # Example
///
/// ```
/// use riposte_core::resolver::Rules;
/// use riposte_core::{CombatConfig, FormulaRegistry};
///
/// let registry = FormulaRegistry::new();
/// let config = CombatConfig::default();
/// let rules = Rules::new(&registry, &config);
/// assert_eq!(rules.config.hit.chance.max, 97);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Rules<'a> {
    /// Override table.
    pub registry: &'a FormulaRegistry,
    /// Balance constants.
    pub config: &'a CombatConfig,
}

impl<'a> Rules<'a> {
    /// Bundles a registry with a configuration.
    #[must_use]
    pub const fn new(registry: &'a FormulaRegistry, config: &'a CombatConfig) -> Self {
        Self { registry, config }
    }

    /// Evaluates an attacker/target term, preferring an override.
    pub(crate) fn pair_term(
        &self,
        key: &FormulaKey,
        attacker: &dyn Combatant,
        target: &dyn Combatant,
        builtin: impl FnOnce() -> i32,
    ) -> i32 {
        match self.registry.pair_term(key) {
            Some(f) => f(attacker, target),
            None => builtin(),
        }
    }

    /// Evaluates a single-combatant term, preferring an override.
    pub(crate) fn single_term(
        &self,
        key: &FormulaKey,
        combatant: &dyn Combatant,
        builtin: impl FnOnce() -> i32,
    ) -> i32 {
        match self.registry.single_term(key) {
            Some(f) => f(combatant),
            None => builtin(),
        }
    }

    /// Evaluates an integer transform, preferring an override.
    pub(crate) fn int_term(&self, key: &FormulaKey, value: i32, builtin: fn(i32) -> i32) -> i32 {
        match self.registry.int_term(key) {
            Some(f) => f(value),
            None => builtin(value),
        }
    }
}
