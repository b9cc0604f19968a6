//! Creature careers and the fixed traits they fight with.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::components::EnemyGroup;
use crate::item::{ArmorArchetype, DamageRange, WeaponMaterial};

/// Creature career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum MonsterCareer {
    Rat,
    Imp,
    Spriggan,
    GiantBat,
    GrizzlyBear,
    SabertoothTiger,
    Spider,
    Orc,
    Centaur,
    Werewolf,
    Nymph,
    Slaughterfish,
    OrcSergeant,
    Harpy,
    Wereboar,
    SkeletalWarrior,
    Giant,
    Zombie,
    Ghost,
    Mummy,
    GiantScorpion,
    OrcShaman,
    Gargoyle,
    Wraith,
    OrcWarlord,
    FrostDaedra,
    FireDaedra,
    Daedroth,
    Vampire,
    DaedraSeducer,
    VampireAncient,
    DaedraLord,
    Lich,
    AncientLich,
    Dragonling,
    FireAtronach,
    IronAtronach,
    FleshAtronach,
    IceAtronach,
    Dreugh,
    Lamia,
}

impl MonsterCareer {
    /// Enemy group used for career affinities.
    #[must_use]
    pub const fn group(self) -> EnemyGroup {
        match self {
            MonsterCareer::Rat
            | MonsterCareer::GiantBat
            | MonsterCareer::GrizzlyBear
            | MonsterCareer::SabertoothTiger
            | MonsterCareer::Spider
            | MonsterCareer::Slaughterfish
            | MonsterCareer::GiantScorpion => EnemyGroup::Animals,
            MonsterCareer::SkeletalWarrior
            | MonsterCareer::Zombie
            | MonsterCareer::Ghost
            | MonsterCareer::Mummy
            | MonsterCareer::Wraith
            | MonsterCareer::Vampire
            | MonsterCareer::VampireAncient
            | MonsterCareer::Lich
            | MonsterCareer::AncientLich => EnemyGroup::Undead,
            MonsterCareer::FrostDaedra
            | MonsterCareer::FireDaedra
            | MonsterCareer::Daedroth
            | MonsterCareer::DaedraSeducer
            | MonsterCareer::DaedraLord => EnemyGroup::Daedra,
            MonsterCareer::Orc
            | MonsterCareer::OrcSergeant
            | MonsterCareer::OrcShaman
            | MonsterCareer::OrcWarlord
            | MonsterCareer::Centaur
            | MonsterCareer::Giant
            | MonsterCareer::Werewolf
            | MonsterCareer::Wereboar
            | MonsterCareer::Nymph
            | MonsterCareer::Harpy
            | MonsterCareer::Spriggan
            | MonsterCareer::Imp
            | MonsterCareer::Dreugh
            | MonsterCareer::Lamia => EnemyGroup::Humanoid,
            MonsterCareer::Gargoyle
            | MonsterCareer::Dragonling
            | MonsterCareer::FireAtronach
            | MonsterCareer::IronAtronach
            | MonsterCareer::FleshAtronach
            | MonsterCareer::IceAtronach => EnemyGroup::None,
        }
    }
}

impl fmt::Display for MonsterCareer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Fixed combat traits of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterTraits {
    /// Career.
    pub career: MonsterCareer,
    /// Level.
    pub level: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Damage of claws, bites and fists.
    pub natural_damage: DamageRange,
    /// Added to an attacker's hit chance; lower is harder to hit.
    pub armor_class: i32,
    /// Weapons of a weaker material pass through harmlessly.
    pub min_metal_to_hit: Option<WeaponMaterial>,
    /// Silver weapons deal extra damage.
    pub silver_weakness: bool,
    /// Blocks as if carrying a shield of this archetype.
    pub natural_shield: Option<ArmorArchetype>,
    /// Can wield weapons instead of fighting with natural attacks.
    pub uses_weapons: bool,
}
