//! # Riposte Core
//!
//! Combat resolution for a single melee or ranged exchange between two
//! combatants: hit chance, critical strikes, shield blocks, damage rolls,
//! armor mitigation, equipment wear, and the collateral effects of a landed
//! blow (poison, disease, paralysis, lycanthropy, crippling).
//!
//! ## Architecture
//!
//! The pipeline runs its stages strictly left to right, once per attack:
//!
//! ```text
//! hit chance -> critical roll -> block roll -> damage roll -> mitigation
//!            -> equipment wear -> collateral effects
//! ```
//!
//! Every stage is built from small named formulas. Before running a built-in
//! formula, the stage asks the [`FormulaRegistry`] whether an external
//! provider has replaced it, so any single formula can be swapped without
//! touching the rest of the pipeline.
//!
//! - **Entities**: the [`Combatant`] contract plus a ready-made [`Character`]
//! - **Items**: weapons, armor, shields, equipment slots and condition
//! - **Registry**: priority-resolved formula overrides
//! - **Resolvers**: the six pipeline stages
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use riposte_core::entity::{Character, Combatant, CombatantId};
//! use riposte_core::item::{EquipSlot, Item, Weapon, WeaponArchetype, WeaponMaterial};
//! use riposte_core::pipeline::{AttackContext, CombatPipeline};
//! use riposte_core::registry::FormulaRegistry;
//!
//! let pipeline = CombatPipeline::new(Arc::new(FormulaRegistry::new()));
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let mut hero = Character::protagonist(CombatantId::new(1));
//! hero.equipment_mut().equip(
//!     EquipSlot::RightHand,
//!     Item::Weapon(Weapon::new(WeaponArchetype::Dagger, WeaponMaterial::Iron)),
//! );
//! let mut bandit = Character::humanoid(CombatantId::new(2));
//!
//! let ctx = AttackContext::armed(EquipSlot::RightHand);
//! let outcome = pipeline.resolve_attack(Some(&mut hero), Some(&mut bandit), &ctx, &mut rng);
//! assert!(outcome.damage >= 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dice;
pub mod entity;
pub mod error;
pub mod item;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod simulation;
pub mod tables;

pub use config::CombatConfig;
pub use entity::{Character, Combatant, CombatantId, CombatantKind};
pub use error::{ConfigError, RegistryError};
pub use output::AttackOutcome;
pub use pipeline::{AttackContext, CombatPipeline, Facing};
pub use registry::{Formula, FormulaRegistry, Provider};

#[cfg(test)]
mod tests;
