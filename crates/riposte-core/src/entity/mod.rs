//! Combatants and the attributes the formulas read from them.
//!
//! - [`CombatantId`]: unique identifier
//! - [`CombatantKind`]: protagonist, humanoid or creature
//! - [`Combatant`]: the contract the pipeline resolves attacks against
//! - [`Character`]: a plain-data combatant for hosts without their own model
//!
//! # Example
//!
//! ```
//! use riposte_core::entity::{Character, Combatant, CombatantId, CombatantKind, MonsterCareer};
//!
//! let rat = Character::monster(CombatantId::new(7), MonsterCareer::Rat);
//! assert_eq!(rat.kind(), CombatantKind::Monster(MonsterCareer::Rat));
//! assert!(rat.monster().is_some());
//! assert!(!rat.is_protagonist());
//! ```

pub mod components;
mod monster;
mod status;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use components::{
    AttackModifier, Biography, Career, EffectFlags, EnemyAffinities, EnemyGroup, ProficiencyFlags,
    Skill, Skills, Stat, Stats, ToleranceFlags, Tolerances, Vital,
};
pub use monster::{MonsterCareer, MonsterTraits};
pub use status::{
    Disease, Element, InflictFlags, Lycanthropy, Poison, StatusBundle, StatusEffect,
};

use crate::item::Equipment;
use crate::tables;

// ============================================================================
// Identity
// ============================================================================

/// Unique identifier for a combatant.
///
/// # Example
///
/// ```
/// use riposte_core::entity::CombatantId;
///
/// let id = CombatantId::new(3);
/// assert_eq!(id.as_u64(), 3);
/// assert_eq!(format!("{id:?}"), "CombatantId(3)");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(u64);

impl CombatantId {
    /// Creates an identifier from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombatantId({})", self.0)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CombatantId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// What kind of combatant this is.
///
/// Several formulas branch on it: the protagonist gets biography
/// modifiers and a kinder critical divisor, creatures use their fixed
/// armor class and natural attacks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    /// The player character.
    Protagonist,
    /// Any other person.
    Humanoid,
    /// A creature with fixed traits.
    Monster(MonsterCareer),
}

impl CombatantKind {
    /// Returns `true` for the protagonist.
    #[must_use]
    pub const fn is_protagonist(self) -> bool {
        matches!(self, CombatantKind::Protagonist)
    }

    /// Returns `true` for creatures.
    #[must_use]
    pub const fn is_monster(self) -> bool {
        matches!(self, CombatantKind::Monster(_))
    }

    /// Creature career, if any.
    #[must_use]
    pub const fn monster_career(self) -> Option<MonsterCareer> {
        match self {
            CombatantKind::Monster(career) => Some(career),
            _ => None,
        }
    }
}

impl fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatantKind::Protagonist => f.write_str("protagonist"),
            CombatantKind::Humanoid => f.write_str("humanoid"),
            CombatantKind::Monster(career) => write!(f, "monster ({career})"),
        }
    }
}

/// Playable race.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Race {
    Breton,
    Redguard,
    Nord,
    DarkElf,
    HighElf,
    WoodElf,
    Khajiit,
    Argonian,
}

// ============================================================================
// Combatant
// ============================================================================

/// Everything the pipeline needs to know about, and do to, a combatant.
///
/// The trait is object safe; the pipeline works on `&dyn Combatant` and
/// `&mut dyn Combatant` so hosts can plug in their own actor model.
/// Health is deliberately absent from the mutating half: the pipeline
/// reports damage and the host applies it.
pub trait Combatant {
    /// Identifier.
    fn id(&self) -> CombatantId;

    /// Kind.
    fn kind(&self) -> CombatantKind;

    /// Level (1 and up).
    fn level(&self) -> i32;

    /// Primary attributes.
    fn stats(&self) -> &Stats;

    /// Combat skills.
    fn skills(&self) -> &Skills;

    /// Career traits.
    fn career(&self) -> &Career;

    /// Biography adjustments. Only read for the protagonist.
    fn biography(&self) -> &Biography;

    /// Race, if the combatant has one.
    fn race(&self) -> Option<Race>;

    /// Health.
    fn health(&self) -> Vital;

    /// Fatigue.
    fn fatigue(&self) -> Vital;

    /// Creature traits, present for [`CombatantKind::Monster`].
    fn monster(&self) -> Option<&MonsterTraits>;

    /// Flat hit bonus from enchanted gear.
    fn enchantment_to_hit(&self) -> i32 {
        0
    }

    /// Chance (percent) to shrug off an `element` effect entirely, when the
    /// combatant has a magical resistance to it.
    fn magical_resistance(&self, _element: Element) -> Option<i32> {
        None
    }

    /// Returns `true` if an effect of the same kind as `effect` is active.
    fn has_effect(&self, effect: &StatusEffect) -> bool;

    /// Equipped items.
    fn equipment(&self) -> &Equipment;

    /// Mutable equipped items.
    fn equipment_mut(&mut self) -> &mut Equipment;

    /// Adds `delta` to fatigue.
    fn adjust_fatigue(&mut self, delta: i32);

    /// Attaches an effect.
    fn inflict(&mut self, bundle: StatusBundle, flags: InflictFlags);

    /// Returns `true` for the protagonist.
    fn is_protagonist(&self) -> bool {
        self.kind().is_protagonist()
    }

    /// Enemy group others see this combatant as.
    fn enemy_group(&self) -> EnemyGroup {
        match self.kind() {
            CombatantKind::Protagonist | CombatantKind::Humanoid => EnemyGroup::Humanoid,
            CombatantKind::Monster(career) => career.group(),
        }
    }
}

// ============================================================================
// Character
// ============================================================================

/// A self-contained combatant.
///
/// Every field is public data; builders cover the common setups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    id: CombatantId,
    kind: CombatantKind,
    level: i32,
    stats: Stats,
    skills: Skills,
    career: Career,
    biography: Biography,
    race: Option<Race>,
    health: Vital,
    fatigue: Vital,
    monster: Option<MonsterTraits>,
    enchantment_to_hit: i32,
    magical_resistances: [Option<i32>; Element::COUNT],
    equipment: Equipment,
    effects: Vec<StatusBundle>,
}

impl Character {
    const PROTAGONIST_HEALTH: i32 = 60;
    const HUMANOID_HEALTH: i32 = 40;
    const DEFAULT_FATIGUE: i32 = 100;

    fn base(id: CombatantId, kind: CombatantKind, health: i32) -> Self {
        Self {
            id,
            kind,
            level: 1,
            stats: Stats::default(),
            skills: Skills::new(),
            career: Career::default(),
            biography: Biography::default(),
            race: None,
            health: Vital::full(health),
            fatigue: Vital::full(Self::DEFAULT_FATIGUE),
            monster: None,
            enchantment_to_hit: 0,
            magical_resistances: [None; Element::COUNT],
            equipment: Equipment::new(),
            effects: Vec::new(),
        }
    }

    /// A level-1 protagonist with baseline stats and untrained skills.
    #[must_use]
    pub fn protagonist(id: CombatantId) -> Self {
        Self::base(id, CombatantKind::Protagonist, Self::PROTAGONIST_HEALTH)
    }

    /// A level-1 humanoid with baseline stats and untrained skills.
    #[must_use]
    pub fn humanoid(id: CombatantId) -> Self {
        Self::base(id, CombatantKind::Humanoid, Self::HUMANOID_HEALTH)
    }

    /// A creature with the table traits of `career`.
    ///
    /// Skills scale with the creature's level.
    #[must_use]
    pub fn monster(id: CombatantId, career: MonsterCareer) -> Self {
        let traits = tables::monster_traits(career);
        let mut character = Self::base(id, CombatantKind::Monster(career), traits.max_health);
        character.level = traits.level;
        character.skills = Skills::uniform(tables::monster_skill(traits.level));
        character.monster = Some(traits);
        character
    }

    /// Sets the level.
    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level.max(1);
        self
    }

    /// Replaces all stats.
    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    /// Sets one stat.
    #[must_use]
    pub fn with_stat(mut self, stat: Stat, value: i32) -> Self {
        self.stats.set(stat, value);
        self
    }

    /// Replaces all skills.
    #[must_use]
    pub fn with_skills(mut self, skills: Skills) -> Self {
        self.skills = skills;
        self
    }

    /// Sets one skill.
    #[must_use]
    pub fn with_skill(mut self, skill: Skill, value: i32) -> Self {
        self.skills.set(skill, value);
        self
    }

    /// Replaces the career.
    #[must_use]
    pub fn with_career(mut self, career: Career) -> Self {
        self.career = career;
        self
    }

    /// Replaces the biography.
    #[must_use]
    pub fn with_biography(mut self, biography: Biography) -> Self {
        self.biography = biography;
        self
    }

    /// Sets the race.
    #[must_use]
    pub fn with_race(mut self, race: Race) -> Self {
        self.race = Some(race);
        self
    }

    /// Sets maximum and current health.
    #[must_use]
    pub fn with_health(mut self, current: i32, max: i32) -> Self {
        self.health = Vital {
            current: current.clamp(0, max),
            max,
        };
        self
    }

    /// Replaces creature traits.
    #[must_use]
    pub fn with_monster_traits(mut self, traits: MonsterTraits) -> Self {
        self.monster = Some(traits);
        self
    }

    /// Sets the enchantment hit bonus.
    #[must_use]
    pub fn with_enchantment_to_hit(mut self, bonus: i32) -> Self {
        self.enchantment_to_hit = bonus;
        self
    }

    /// Grants a magical resistance.
    #[must_use]
    pub fn with_magical_resistance(mut self, element: Element, chance: i32) -> Self {
        self.magical_resistances[element.index()] = Some(chance);
        self
    }

    /// Active effects, oldest first.
    #[must_use]
    pub fn effects(&self) -> &[StatusBundle] {
        &self.effects
    }

    /// Subtracts damage from health, flooring at zero.
    ///
    /// The pipeline never calls this; hosts apply
    /// [`AttackOutcome::damage`](crate::output::AttackOutcome::damage) themselves.
    pub fn apply_damage(&mut self, damage: i32) {
        self.health.adjust(-damage.max(0));
    }
}

impl Combatant for Character {
    fn id(&self) -> CombatantId {
        self.id
    }

    fn kind(&self) -> CombatantKind {
        self.kind
    }

    fn level(&self) -> i32 {
        self.level
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn skills(&self) -> &Skills {
        &self.skills
    }

    fn career(&self) -> &Career {
        &self.career
    }

    fn biography(&self) -> &Biography {
        &self.biography
    }

    fn race(&self) -> Option<Race> {
        self.race
    }

    fn health(&self) -> Vital {
        self.health
    }

    fn fatigue(&self) -> Vital {
        self.fatigue
    }

    fn monster(&self) -> Option<&MonsterTraits> {
        self.monster.as_ref()
    }

    fn enchantment_to_hit(&self) -> i32 {
        self.enchantment_to_hit
    }

    fn magical_resistance(&self, element: Element) -> Option<i32> {
        self.magical_resistances[element.index()]
    }

    fn has_effect(&self, effect: &StatusEffect) -> bool {
        self.effects.iter().any(|b| b.effect.same_kind(effect))
    }

    fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    fn equipment_mut(&mut self) -> &mut Equipment {
        &mut self.equipment
    }

    fn adjust_fatigue(&mut self, delta: i32) {
        self.fatigue.adjust(delta);
    }

    fn inflict(&mut self, bundle: StatusBundle, _flags: InflictFlags) {
        if bundle.magnitude_percent <= 0 {
            return;
        }
        self.effects.push(bundle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod combatant_id_tests {
        use super::*;

        #[test]
        fn roundtrip() {
            let id = CombatantId::from(9);
            assert_eq!(id.as_u64(), 9);
            assert_eq!(format!("{id}"), "9");
        }

        #[test]
        fn ordering() {
            assert!(CombatantId::new(1) < CombatantId::new(2));
        }
    }

    mod kind_tests {
        use super::*;

        #[test]
        fn predicates() {
            assert!(CombatantKind::Protagonist.is_protagonist());
            assert!(!CombatantKind::Humanoid.is_monster());
            assert_eq!(
                CombatantKind::Monster(MonsterCareer::Rat).monster_career(),
                Some(MonsterCareer::Rat)
            );
        }

        #[test]
        fn display() {
            assert_eq!(
                CombatantKind::Monster(MonsterCareer::Zombie).to_string(),
                "monster (Zombie)"
            );
        }
    }

    mod character_tests {
        use super::*;

        #[test]
        fn protagonist_defaults() {
            let hero = Character::protagonist(CombatantId::new(1));
            assert!(hero.is_protagonist());
            assert_eq!(hero.level(), 1);
            assert_eq!(hero.stats().luck, 50);
            assert!(hero.monster().is_none());
            assert_eq!(hero.enemy_group(), EnemyGroup::Humanoid);
        }

        #[test]
        fn monster_has_table_traits() {
            let zombie = Character::monster(CombatantId::new(2), MonsterCareer::Zombie);
            let traits = zombie.monster().unwrap();
            assert_eq!(traits.career, MonsterCareer::Zombie);
            assert_eq!(zombie.level(), traits.level);
            assert_eq!(zombie.health().max, traits.max_health);
            assert_eq!(zombie.enemy_group(), EnemyGroup::Undead);
        }

        #[test]
        fn inflict_records_effect() {
            let mut hero = Character::protagonist(CombatantId::new(1));
            assert!(!hero.has_effect(&StatusEffect::Paralyzed));
            hero.inflict(
                StatusBundle::new(StatusEffect::Paralyzed, 60),
                InflictFlags::BYPASS_SAVING_THROWS,
            );
            assert!(hero.has_effect(&StatusEffect::Paralyzed));
            assert_eq!(hero.effects().len(), 1);
        }

        #[test]
        fn zero_magnitude_is_not_recorded() {
            let mut hero = Character::protagonist(CombatantId::new(1));
            hero.inflict(
                StatusBundle::new(StatusEffect::Paralyzed, 0),
                InflictFlags::empty(),
            );
            assert!(hero.effects().is_empty());
        }

        #[test]
        fn fatigue_adjusts_and_clamps() {
            let mut hero = Character::protagonist(CombatantId::new(1));
            hero.adjust_fatigue(-30);
            assert_eq!(hero.fatigue().current, 70);
            hero.adjust_fatigue(-500);
            assert_eq!(hero.fatigue().current, 0);
        }

        #[test]
        fn apply_damage_floors_at_zero() {
            let mut hero = Character::protagonist(CombatantId::new(1)).with_health(10, 60);
            hero.apply_damage(25);
            assert_eq!(hero.health().current, 0);
        }

        #[test]
        fn magical_resistance_lookup() {
            let npc = Character::humanoid(CombatantId::new(3))
                .with_magical_resistance(Element::Fire, 40);
            assert_eq!(npc.magical_resistance(Element::Fire), Some(40));
            assert_eq!(npc.magical_resistance(Element::Frost), None);
        }

        #[test]
        fn serializes() {
            let hero = Character::protagonist(CombatantId::new(1)).with_race(Race::Nord);
            let json = serde_json::to_string(&hero).unwrap();
            let back: Character = serde_json::from_str(&json).unwrap();
            assert_eq!(back, hero);
        }
    }
}
