//! Factories for combatants, weapons and registries used across tests.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::entity::{Character, Combatant, CombatantId};
use crate::item::{
    Armor, ArmorArchetype, ArmorMaterial, EquipSlot, Item, Weapon, WeaponArchetype,
    WeaponMaterial,
};
use crate::pipeline::CombatPipeline;
use crate::registry::{names, Formula, FormulaRegistry, Provider};

// =============================================================================
// Logging
// =============================================================================

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Randomness
// =============================================================================

/// Deterministic RNG for a test.
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

// =============================================================================
// Combatants
// =============================================================================

/// Level-1 protagonist, every stat 50, no skills, no equipment.
pub fn baseline_hero() -> Character {
    Character::protagonist(CombatantId::new(1))
}

/// Level-1 humanoid with no equipment.
pub fn unarmored_humanoid() -> Character {
    Character::humanoid(CombatantId::new(2))
}

/// A brand-new iron dagger.
pub fn iron_dagger() -> Weapon {
    Weapon::new(WeaponArchetype::Dagger, WeaponMaterial::Iron)
}

/// Puts `weapon` in the right hand.
pub fn wielding(mut combatant: Character, weapon: Weapon) -> Character {
    combatant
        .equipment_mut()
        .equip(EquipSlot::RightHand, Item::Weapon(weapon));
    combatant
}

/// Puts `armor` in its own slot.
pub fn wearing(mut combatant: Character, armor: Armor) -> Character {
    combatant.equipment_mut().equip(armor.slot, Item::Armor(armor));
    combatant
}

/// An iron tower shield.
pub fn tower_shield() -> Armor {
    Armor::shield(ArmorArchetype::TowerShield, ArmorMaterial::Iron)
}

// =============================================================================
// Registries
// =============================================================================

/// Registry whose hit roll always succeeds.
pub fn sure_hit_registry() -> FormulaRegistry {
    let registry = FormulaRegistry::new();
    registry.register(
        names::SUCCESSFUL_HIT.name.clone(),
        Formula::successful_hit(|_, _, _, _, _| true),
        Provider::new("sure-hit", 1),
    );
    registry
}

/// Pipeline over `registry` with default balance constants.
pub fn pipeline_with(registry: FormulaRegistry) -> CombatPipeline {
    CombatPipeline::new(Arc::new(registry))
}
