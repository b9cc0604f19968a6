//! Lingering effects a landed blow can leave behind.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::item::BodyRegion;

/// Element a saving throw or magical resistance is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    /// Fire.
    Fire,
    /// Frost.
    Frost,
    /// Disease and poison share one resistance.
    DiseaseOrPoison,
    /// Shock.
    Shock,
    /// Everything else magical, including paralysis.
    Magic,
}

impl Element {
    /// Number of elements.
    pub const COUNT: usize = 5;

    /// Array index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Diseases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Disease {
    WitchesPox,
    Plague,
    YellowFever,
    StomachRot,
    Consumption,
    BrainFever,
    SwampRot,
    CalironsCurse,
    Cholera,
    Leprosy,
    WoundRot,
    RedDeath,
    BloodRot,
    TyphoidFever,
    Dementia,
    Chrondiasis,
    WizardFever,
}

/// Weapon poisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Poison {
    NuxVomica,
    Arsenic,
    Moonseed,
    Drothweed,
    Somnalius,
    PyrrhicAcid,
    Magebane,
    Thyrwort,
    Indulcet,
    Sursum,
    QuaestoVil,
    Aegrotat,
}

/// Were-creature strains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lycanthropy {
    /// Werewolf.
    Werewolf,
    /// Wereboar.
    Wereboar,
}

/// A lingering effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffect {
    /// Carrying a disease.
    Diseased(Disease),
    /// Poisoned.
    Poisoned(Poison),
    /// Unable to move or act.
    Paralyzed,
    /// Infected with lycanthropy.
    Lycanthropy(Lycanthropy),
    /// Infected with vampirism.
    Vampirism,
    /// A limb has been crippled.
    Crippled(BodyRegion),
}

impl StatusEffect {
    /// Returns `true` if `other` is the same kind of effect, ignoring its
    /// payload (any disease matches any disease).
    #[must_use]
    pub fn same_kind(&self, other: &StatusEffect) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEffect::Diseased(d) => write!(f, "diseased ({d:?})"),
            StatusEffect::Poisoned(p) => write!(f, "poisoned ({p:?})"),
            StatusEffect::Paralyzed => f.write_str("paralyzed"),
            StatusEffect::Lycanthropy(l) => write!(f, "lycanthropy ({l:?})"),
            StatusEffect::Vampirism => f.write_str("vampirism"),
            StatusEffect::Crippled(r) => write!(f, "crippled {r}"),
        }
    }
}

/// An effect plus the strength it lands with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBundle {
    /// The effect.
    pub effect: StatusEffect,
    /// Percentage of full strength that got past the target's saving throw.
    pub magnitude_percent: i32,
}

impl StatusBundle {
    /// Creates a bundle.
    #[must_use]
    pub const fn new(effect: StatusEffect, magnitude_percent: i32) -> Self {
        Self {
            effect,
            magnitude_percent,
        }
    }

    /// Full-strength bundle.
    #[must_use]
    pub const fn full(effect: StatusEffect) -> Self {
        Self::new(effect, 100)
    }
}

bitflags! {
    /// How an effect should be attached to its target.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct InflictFlags: u8 {
        /// The saving throw was already made; do not roll another.
        const BYPASS_SAVING_THROWS = 1 << 0;
        /// Disease or infection delivered by a creature's attack.
        const SPECIAL_INFECTION    = 1 << 1;
    }
}
