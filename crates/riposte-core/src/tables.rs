//! Fixed lookup data: weapon damage profiles, material bonuses, condition
//! curves, armor coefficients, body-part distribution and creature traits.
//!
//! Every number that describes equipment or creatures lives here; the
//! resolvers only combine them.

use serde::{Deserialize, Serialize};

use crate::entity::{Disease, Element, MonsterCareer, MonsterTraits};
use crate::item::{
    ArmorArchetype, ArmorMaterial, BodyRegion, ConditionBand, DamageRange, DamageType,
    WeaponArchetype, WeaponMaterial,
};

// ============================================================================
// Weapon damage profiles
// ============================================================================

/// Damage range of a weapon plus the limits its scaled range is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Unscaled range.
    pub range: DamageRange,
    /// Lowest value either end of the scaled range may fall to.
    pub floor: i32,
    /// Highest value either end of the scaled range may reach.
    pub cap: i32,
}

const fn p(min: i32, max: i32, floor: i32, cap: i32) -> WeaponProfile {
    WeaponProfile {
        range: DamageRange::new(min, max),
        floor,
        cap,
    }
}

const fn some(min: i32, max: i32, floor: i32, cap: i32) -> Option<WeaponProfile> {
    Some(p(min, max, floor, cap))
}

/// Type-agnostic profile, indexed by [`WeaponArchetype::index`].
const AGGREGATE: [WeaponProfile; WeaponArchetype::COUNT] = [
    p(1, 6, 1, 10),  // Dagger
    p(1, 8, 1, 12),  // Tanto
    p(1, 8, 1, 12),  // Staff
    p(1, 8, 1, 12),  // Shortsword
    p(1, 10, 1, 15), // Wakazashi
    p(1, 12, 1, 18), // Broadsword
    p(3, 12, 2, 18), // Saber
    p(2, 16, 2, 24), // Longsword
    p(3, 16, 2, 24), // Katana
    p(2, 18, 2, 27), // Claymore
    p(3, 21, 2, 31), // DaiKatana
    p(1, 12, 1, 18), // Mace
    p(2, 14, 2, 21), // Flail
    p(3, 18, 2, 27), // Warhammer
    p(2, 12, 2, 18), // BattleAxe
    p(2, 16, 2, 24), // WarAxe
    p(4, 16, 2, 24), // ShortBow
    p(4, 18, 2, 27), // LongBow
];

const BLUDGEONING: [Option<WeaponProfile>; WeaponArchetype::COUNT] = [
    None,                // Dagger
    None,                // Tanto
    some(2, 9, 1, 14),   // Staff
    None,                // Shortsword
    None,                // Wakazashi
    None,                // Broadsword
    None,                // Saber
    None,                // Longsword
    None,                // Katana
    None,                // Claymore
    None,                // DaiKatana
    some(2, 13, 1, 20),  // Mace
    some(3, 15, 2, 23),  // Flail
    some(4, 19, 2, 29),  // Warhammer
    some(1, 8, 1, 12),   // BattleAxe
    some(1, 10, 1, 15),  // WarAxe
    None,                // ShortBow
    None,                // LongBow
];

const SLASHING: [Option<WeaponProfile>; WeaponArchetype::COUNT] = [
    some(1, 5, 1, 8),   // Dagger
    some(1, 7, 1, 11),  // Tanto
    None,               // Staff
    some(1, 8, 1, 12),  // Shortsword
    some(2, 10, 1, 15), // Wakazashi
    some(2, 12, 1, 18), // Broadsword
    some(3, 13, 2, 20), // Saber
    some(2, 15, 2, 23), // Longsword
    some(3, 17, 2, 26), // Katana
    some(3, 18, 2, 27), // Claymore
    some(3, 22, 2, 33), // DaiKatana
    None,               // Mace
    None,               // Flail
    None,               // Warhammer
    some(3, 13, 2, 20), // BattleAxe
    some(3, 17, 2, 26), // WarAxe
    None,               // ShortBow
    None,               // LongBow
];

const PIERCING: [Option<WeaponProfile>; WeaponArchetype::COUNT] = [
    some(2, 7, 1, 11),  // Dagger
    some(2, 8, 1, 12),  // Tanto
    some(1, 6, 1, 9),   // Staff
    some(2, 9, 1, 14),  // Shortsword
    some(2, 9, 1, 14),  // Wakazashi
    some(1, 10, 1, 15), // Broadsword
    some(2, 10, 1, 15), // Saber
    some(2, 14, 2, 21), // Longsword
    some(2, 14, 2, 21), // Katana
    some(2, 15, 2, 23), // Claymore
    some(2, 18, 2, 27), // DaiKatana
    None,               // Mace
    None,               // Flail
    None,               // Warhammer
    None,               // BattleAxe
    None,               // WarAxe
    some(4, 16, 2, 24), // ShortBow
    some(4, 18, 2, 27), // LongBow
];

/// Type-agnostic damage profile of an archetype.
#[must_use]
pub const fn aggregate_profile(archetype: WeaponArchetype) -> WeaponProfile {
    AGGREGATE[archetype.index()]
}

/// Damage profile of an archetype for one damage type.
///
/// `None` when the archetype has no dedicated entry for that type (a mace
/// has no slashing profile); callers fall back to
/// [`aggregate_profile`].
#[must_use]
pub const fn typed_profile(
    archetype: WeaponArchetype,
    damage_type: DamageType,
) -> Option<WeaponProfile> {
    match damage_type {
        DamageType::Special => None,
        DamageType::Bludgeoning => BLUDGEONING[archetype.index()],
        DamageType::Slashing => SLASHING[archetype.index()],
        DamageType::Piercing => PIERCING[archetype.index()],
    }
}

/// Typed profile with aggregate fallback.
#[must_use]
pub const fn weapon_profile(archetype: WeaponArchetype, damage_type: DamageType) -> WeaponProfile {
    match typed_profile(archetype, damage_type) {
        Some(profile) => profile,
        None => aggregate_profile(archetype),
    }
}

// ============================================================================
// Weapon materials and condition
// ============================================================================

/// `(density, shear, fracture)` flat bonuses, indexed by material.
///
/// Density feeds bludgeoning, shear slashing, fracture piercing.
const MATERIAL_BONUS: [(i32, i32, i32); 10] = [
    (0, 0, 0),  // Iron
    (0, 1, 1),  // Steel
    (0, 0, 1),  // Silver
    (-1, 2, 2), // Elven
    (2, 1, 1),  // Dwarven
    (1, 2, 3),  // Mithril
    (2, 3, 3),  // Adamantium
    (3, 3, 2),  // Ebony
    (4, 3, 3),  // Orcish
    (4, 4, 4),  // Daedric
];

/// Flat damage bonus of a weapon material for a damage type.
///
/// Special damage averages the three bonuses.
#[must_use]
pub const fn material_damage_bonus(material: WeaponMaterial, damage_type: DamageType) -> i32 {
    let (density, shear, fracture) = MATERIAL_BONUS[material.index()];
    match damage_type {
        DamageType::Bludgeoning => density,
        DamageType::Slashing => shear,
        DamageType::Piercing => fracture,
        DamageType::Special => (density + shear + fracture) / 3,
    }
}

/// Damage multiplier per condition band, indexed by [`ConditionBand::index`].
const BLUDGEONING_CONDITION: [f32; 7] = [1.1, 1.0, 0.9, 0.8, 0.7, 0.6, 0.5];
const SLASHING_CONDITION: [f32; 7] = [1.2, 1.1, 1.0, 0.85, 0.7, 0.5, 0.3];
const PIERCING_CONDITION: [f32; 7] = [1.1, 1.05, 1.0, 0.9, 0.8, 0.65, 0.45];

/// Damage multiplier of a weapon in condition `band` for `damage_type`.
///
/// Edges dull fastest, blunt weapons barely care. Special damage ignores
/// condition.
#[must_use]
pub const fn weapon_condition_multiplier(band: ConditionBand, damage_type: DamageType) -> f32 {
    match damage_type {
        DamageType::Special => 1.0,
        DamageType::Bludgeoning => BLUDGEONING_CONDITION[band.index()],
        DamageType::Slashing => SLASHING_CONDITION[band.index()],
        DamageType::Piercing => PIERCING_CONDITION[band.index()],
    }
}

const WEAPON_BASE_CONDITION: [i32; WeaponArchetype::COUNT] = [
    200, 200, 250, 300, 300, 400, 400, 450, 450, 500, 500, 500, 450, 600, 550, 450, 200, 250,
];

/// Durability multiplier (percent), shared by weapon and armor materials.
const WEAPON_MATERIAL_DURABILITY: [i32; 10] = [100, 120, 100, 130, 160, 150, 170, 200, 220, 250];

/// Maximum condition of a new weapon.
#[must_use]
pub const fn weapon_max_condition(archetype: WeaponArchetype, material: WeaponMaterial) -> i32 {
    WEAPON_BASE_CONDITION[archetype.index()] * WEAPON_MATERIAL_DURABILITY[material.index()] / 100
}

/// Weapon wear per point of damage, indexed by [`DamageType::index`].
const WEAPON_WEAR: [f32; 4] = [0.0, 0.05, 0.1, 0.07];

/// Weapon wear per point of damage dealt.
#[must_use]
pub const fn weapon_wear_coefficient(damage_type: DamageType) -> f32 {
    WEAPON_WEAR[damage_type.index()]
}

const WEAPON_FRAGILITY: [f32; 10] = [1.0, 0.9, 1.1, 1.0, 0.8, 0.75, 0.7, 0.6, 0.6, 0.5];

/// How quickly a weapon material wears relative to iron.
#[must_use]
pub const fn weapon_fragility(material: WeaponMaterial) -> f32 {
    WEAPON_FRAGILITY[material.index()]
}

// ============================================================================
// Armor
// ============================================================================

/// Physical properties of an armor material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Mass relative to iron. Resists crushing and scales weight.
    pub density: f32,
    /// Resistance to cutting relative to iron.
    pub hardness: f32,
}

impl MaterialProperties {
    /// Mean of density and hardness, used against piercing.
    #[must_use]
    pub fn average(self) -> f32 {
        (self.density + self.hardness) / 2.0
    }
}

const ARMOR_MATERIALS: [MaterialProperties; 12] = [
    MaterialProperties { density: 1.0, hardness: 1.0 },  // Leather
    MaterialProperties { density: 1.0, hardness: 1.0 },  // Chain
    MaterialProperties { density: 1.0, hardness: 1.0 },  // Iron
    MaterialProperties { density: 1.0, hardness: 1.1 },  // Steel
    MaterialProperties { density: 1.05, hardness: 0.95 }, // Silver
    MaterialProperties { density: 0.8, hardness: 1.15 }, // Elven
    MaterialProperties { density: 1.2, hardness: 1.2 },  // Dwarven
    MaterialProperties { density: 0.9, hardness: 1.3 },  // Mithril
    MaterialProperties { density: 1.0, hardness: 1.35 }, // Adamantium
    MaterialProperties { density: 1.3, hardness: 1.4 },  // Ebony
    MaterialProperties { density: 1.35, hardness: 1.45 }, // Orcish
    MaterialProperties { density: 1.4, hardness: 1.5 },  // Daedric
];

/// Physical properties of an armor material.
#[must_use]
pub const fn armor_material(material: ArmorMaterial) -> MaterialProperties {
    ARMOR_MATERIALS[material.index()]
}

/// `[bludgeoning, slashing, piercing]` reduction per archetype.
const ARMOR_COEFFICIENTS: [[f32; 3]; 7] = [
    [0.10, 0.20, 0.12], // Leather
    [0.15, 0.40, 0.25], // Chain
    [0.30, 0.50, 0.40], // Plate
    [0.20, 0.35, 0.30], // Buckler
    [0.25, 0.40, 0.35], // RoundShield
    [0.30, 0.45, 0.40], // KiteShield
    [0.35, 0.50, 0.45], // TowerShield
];

/// Base fraction of `damage_type` damage an archetype stops.
///
/// Zero for special damage.
#[must_use]
pub const fn armor_coefficient(archetype: ArmorArchetype, damage_type: DamageType) -> f32 {
    let row = ARMOR_COEFFICIENTS[archetype.index()];
    match damage_type {
        DamageType::Special => 0.0,
        DamageType::Bludgeoning => row[0],
        DamageType::Slashing => row[1],
        DamageType::Piercing => row[2],
    }
}

const ARMOR_CONDITION: [f32; 7] = [1.0, 0.95, 0.9, 0.8, 0.65, 0.5, 0.25];

/// Protection multiplier of armor in condition `band`.
#[must_use]
pub const fn armor_condition_multiplier(band: ConditionBand) -> f32 {
    ARMOR_CONDITION[band.index()]
}

const ARMOR_BASE_WEIGHT: [f32; 7] = [3.0, 6.0, 9.0, 2.0, 4.0, 6.0, 9.0];

/// Weight of a new piece in kilograms.
#[must_use]
pub fn armor_weight_kg(archetype: ArmorArchetype, material: ArmorMaterial) -> f32 {
    ARMOR_BASE_WEIGHT[archetype.index()] * armor_material(material).density
}

const ARMOR_BASE_CONDITION: [i32; 7] = [300, 400, 500, 300, 400, 500, 600];
const ARMOR_MATERIAL_DURABILITY: [i32; 12] =
    [100, 100, 100, 120, 100, 130, 160, 150, 170, 200, 220, 250];

/// Maximum condition of a new piece.
#[must_use]
pub const fn armor_max_condition(archetype: ArmorArchetype, material: ArmorMaterial) -> i32 {
    ARMOR_BASE_CONDITION[archetype.index()] * ARMOR_MATERIAL_DURABILITY[material.index()] / 100
}

/// Armor wear per point absorbed, indexed by [`DamageType::index`].
const ARMOR_WEAR: [f32; 4] = [0.0, 0.6, 1.0, 0.8];

/// Armor wear per point of damage absorbed.
#[must_use]
pub const fn armor_wear_coefficient(damage_type: DamageType) -> f32 {
    ARMOR_WEAR[damage_type.index()]
}

/// `(hard, soft)` base block chance of a shield archetype.
///
/// `None` for body armor.
#[must_use]
pub const fn shield_block_base(archetype: ArmorArchetype) -> Option<(i32, i32)> {
    match archetype {
        ArmorArchetype::Buckler => Some((35, 10)),
        ArmorArchetype::RoundShield => Some((40, 15)),
        ArmorArchetype::KiteShield => Some((45, 15)),
        ArmorArchetype::TowerShield => Some((50, 20)),
        ArmorArchetype::Leather | ArmorArchetype::Chain | ArmorArchetype::Plate => None,
    }
}

/// Saving-throw bonus a piece of `material` grants against `element`.
#[must_use]
pub const fn material_saving_throw_modifier(material: ArmorMaterial, element: Element) -> i32 {
    match (material, element) {
        (ArmorMaterial::Silver | ArmorMaterial::Ebony, Element::Magic)
        | (ArmorMaterial::Elven, Element::Frost | Element::Magic)
        | (ArmorMaterial::Dwarven, Element::Fire)
        | (ArmorMaterial::Mithril | ArmorMaterial::Adamantium, Element::Shock)
        | (ArmorMaterial::Orcish, Element::DiseaseOrPoison) => 5,
        (ArmorMaterial::Daedric, Element::Magic | Element::Fire) => 10,
        _ => 0,
    }
}

// ============================================================================
// Body parts
// ============================================================================

/// Twenty-slot hit distribution. The chest is the most likely target,
/// the head the least.
pub const STRUCK_BODY_PARTS: [BodyRegion; 20] = [
    BodyRegion::Head,
    BodyRegion::Head,
    BodyRegion::RightArm,
    BodyRegion::RightArm,
    BodyRegion::RightArm,
    BodyRegion::LeftArm,
    BodyRegion::LeftArm,
    BodyRegion::LeftArm,
    BodyRegion::Chest,
    BodyRegion::Chest,
    BodyRegion::Chest,
    BodyRegion::Chest,
    BodyRegion::Chest,
    BodyRegion::Hands,
    BodyRegion::Hands,
    BodyRegion::Legs,
    BodyRegion::Legs,
    BodyRegion::Legs,
    BodyRegion::Feet,
    BodyRegion::Feet,
];

// ============================================================================
// Diseases
// ============================================================================

/// Diseases carried by vampires.
pub const DISEASE_LIST_A: &[Disease] = &[Disease::Plague];

/// Diseases carried by vermin.
pub const DISEASE_LIST_B: &[Disease] = &[Disease::WitchesPox, Disease::Plague, Disease::StomachRot];

/// Diseases carried by the rotting dead.
pub const DISEASE_LIST_C: &[Disease] = &[
    Disease::WitchesPox,
    Disease::Plague,
    Disease::YellowFever,
    Disease::StomachRot,
    Disease::Consumption,
    Disease::BrainFever,
    Disease::SwampRot,
    Disease::Cholera,
    Disease::Leprosy,
    Disease::RedDeath,
    Disease::TyphoidFever,
    Disease::Dementia,
    Disease::Chrondiasis,
    Disease::WizardFever,
];

// ============================================================================
// Creatures
// ============================================================================

const fn creature(
    career: MonsterCareer,
    level: i32,
    max_health: i32,
    min: i32,
    max: i32,
    armor_class: i32,
) -> MonsterTraits {
    MonsterTraits {
        career,
        level,
        max_health,
        natural_damage: DamageRange::new(min, max),
        armor_class,
        min_metal_to_hit: None,
        silver_weakness: false,
        natural_shield: None,
        uses_weapons: false,
    }
}

/// Fixed traits of a creature career.
#[must_use]
pub const fn monster_traits(career: MonsterCareer) -> MonsterTraits {
    use MonsterCareer as M;
    let base = match career {
        M::Rat => creature(career, 1, 10, 1, 4, 55),
        M::Imp => creature(career, 2, 20, 1, 10, 40),
        M::Spriggan => creature(career, 3, 30, 1, 9, 45),
        M::GiantBat => creature(career, 1, 8, 1, 4, 50),
        M::GrizzlyBear => creature(career, 4, 45, 2, 12, 45),
        M::SabertoothTiger => creature(career, 5, 50, 3, 15, 40),
        M::Spider => creature(career, 4, 30, 1, 10, 45),
        M::Orc => creature(career, 6, 45, 2, 12, 40),
        M::Centaur => creature(career, 7, 60, 2, 14, 40),
        M::Werewolf => creature(career, 8, 60, 2, 16, 35),
        M::Nymph => creature(career, 8, 40, 1, 8, 40),
        M::Slaughterfish => creature(career, 5, 35, 2, 12, 45),
        M::OrcSergeant => creature(career, 9, 70, 3, 16, 30),
        M::Harpy => creature(career, 9, 55, 2, 14, 40),
        M::Wereboar => creature(career, 10, 75, 3, 18, 35),
        M::SkeletalWarrior => creature(career, 8, 50, 2, 12, 35),
        M::Giant => creature(career, 12, 120, 4, 24, 45),
        M::Zombie => creature(career, 9, 80, 2, 14, 50),
        M::Ghost => creature(career, 10, 45, 2, 12, 30),
        M::Mummy => creature(career, 11, 70, 2, 16, 40),
        M::GiantScorpion => creature(career, 12, 70, 3, 20, 35),
        M::OrcShaman => creature(career, 13, 60, 2, 12, 35),
        M::Gargoyle => creature(career, 14, 90, 3, 18, 20),
        M::Wraith => creature(career, 15, 60, 3, 18, 25),
        M::OrcWarlord => creature(career, 16, 110, 4, 20, 25),
        M::FrostDaedra => creature(career, 17, 120, 5, 25, 25),
        M::FireDaedra => creature(career, 17, 110, 5, 25, 25),
        M::Daedroth => creature(career, 18, 130, 5, 30, 25),
        M::Vampire => creature(career, 18, 100, 4, 24, 25),
        M::DaedraSeducer => creature(career, 19, 100, 4, 24, 25),
        M::VampireAncient => creature(career, 20, 140, 5, 30, 15),
        M::DaedraLord => creature(career, 21, 180, 6, 36, 10),
        M::Lich => creature(career, 20, 120, 4, 24, 15),
        M::AncientLich => creature(career, 21, 160, 6, 30, 10),
        M::Dragonling => creature(career, 16, 100, 4, 24, 25),
        M::FireAtronach => creature(career, 15, 90, 3, 20, 30),
        M::IronAtronach => creature(career, 15, 120, 3, 20, 20),
        M::FleshAtronach => creature(career, 15, 100, 3, 20, 35),
        M::IceAtronach => creature(career, 15, 100, 3, 20, 25),
        M::Dreugh => creature(career, 10, 70, 2, 16, 35),
        M::Lamia => creature(career, 10, 60, 2, 14, 35),
    };
    match career {
        M::Orc | M::Centaur | M::Giant | M::OrcShaman => MonsterTraits {
            uses_weapons: true,
            ..base
        },
        M::OrcSergeant => MonsterTraits {
            uses_weapons: true,
            natural_shield: Some(ArmorArchetype::KiteShield),
            ..base
        },
        M::OrcWarlord => MonsterTraits {
            uses_weapons: true,
            natural_shield: Some(ArmorArchetype::TowerShield),
            ..base
        },
        M::SkeletalWarrior => MonsterTraits {
            uses_weapons: true,
            silver_weakness: true,
            natural_shield: Some(ArmorArchetype::RoundShield),
            ..base
        },
        M::Werewolf | M::Wereboar | M::Vampire | M::VampireAncient => MonsterTraits {
            silver_weakness: true,
            ..base
        },
        M::Ghost | M::Wraith | M::Lich | M::AncientLich => MonsterTraits {
            min_metal_to_hit: Some(WeaponMaterial::Silver),
            ..base
        },
        M::Gargoyle | M::DaedraLord => MonsterTraits {
            min_metal_to_hit: Some(WeaponMaterial::Mithril),
            ..base
        },
        _ => base,
    }
}

/// Skill level a creature of `level` fights with.
#[must_use]
pub const fn monster_skill(level: i32) -> i32 {
    let skill = level * 5 + 30;
    if skill > 100 {
        100
    } else {
        skill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_is_ordered_and_within_limits() {
        for archetype in WeaponArchetype::ALL {
            for damage_type in DamageType::ALL {
                let profile = weapon_profile(archetype, damage_type);
                assert!(profile.range.is_ordered(), "{archetype} {damage_type}");
                assert!(profile.floor <= profile.cap, "{archetype} {damage_type}");
                assert!(profile.range.min >= profile.floor, "{archetype} {damage_type}");
                assert!(profile.range.max <= profile.cap, "{archetype} {damage_type}");
            }
        }
    }

    #[test]
    fn missing_typed_profile_falls_back() {
        assert!(typed_profile(WeaponArchetype::Mace, DamageType::Slashing).is_none());
        assert_eq!(
            weapon_profile(WeaponArchetype::Mace, DamageType::Slashing),
            aggregate_profile(WeaponArchetype::Mace)
        );
    }

    #[test]
    fn material_bonus_by_type() {
        assert_eq!(material_damage_bonus(WeaponMaterial::Iron, DamageType::Slashing), 0);
        assert_eq!(material_damage_bonus(WeaponMaterial::Elven, DamageType::Bludgeoning), -1);
        assert_eq!(material_damage_bonus(WeaponMaterial::Mithril, DamageType::Piercing), 3);
        assert_eq!(material_damage_bonus(WeaponMaterial::Daedric, DamageType::Special), 4);
    }

    #[test]
    fn useless_bludgeoning_halves_damage() {
        assert!(
            (weapon_condition_multiplier(ConditionBand::Useless, DamageType::Bludgeoning) - 0.5)
                .abs()
                < f32::EPSILON
        );
    }

    #[test]
    fn condition_curves_never_increase_with_wear() {
        for damage_type in DamageType::ALL {
            let mut previous = f32::MAX;
            for percent in (0..=100).rev() {
                let m = weapon_condition_multiplier(ConditionBand::from_percent(percent), damage_type);
                assert!(m <= previous);
                previous = m;
            }
        }
    }

    #[test]
    fn special_damage_ignores_armor() {
        assert!(armor_coefficient(ArmorArchetype::Plate, DamageType::Special).abs() < f32::EPSILON);
    }

    #[test]
    fn struck_distribution_counts() {
        let count = |region| STRUCK_BODY_PARTS.iter().filter(|r| **r == region).count();
        assert_eq!(count(BodyRegion::Head), 2);
        assert_eq!(count(BodyRegion::Chest), 5);
        assert_eq!(count(BodyRegion::Feet), 2);
    }

    #[test]
    fn only_shields_have_block_base() {
        assert!(shield_block_base(ArmorArchetype::Plate).is_none());
        assert_eq!(shield_block_base(ArmorArchetype::TowerShield), Some((50, 20)));
    }

    #[test]
    fn monster_special_traits() {
        assert_eq!(
            monster_traits(MonsterCareer::Ghost).min_metal_to_hit,
            Some(WeaponMaterial::Silver)
        );
        assert!(monster_traits(MonsterCareer::Werewolf).silver_weakness);
        assert!(monster_traits(MonsterCareer::Orc).uses_weapons);
        assert!(!monster_traits(MonsterCareer::Rat).uses_weapons);
        assert_eq!(
            monster_traits(MonsterCareer::SkeletalWarrior).natural_shield,
            Some(ArmorArchetype::RoundShield)
        );
    }

    #[test]
    fn monster_skill_caps_at_hundred() {
        assert_eq!(monster_skill(1), 35);
        assert_eq!(monster_skill(30), 100);
    }

    #[test]
    fn durability_scales_with_material() {
        assert!(
            weapon_max_condition(WeaponArchetype::Dagger, WeaponMaterial::Daedric)
                > weapon_max_condition(WeaponArchetype::Dagger, WeaponMaterial::Iron)
        );
        assert_eq!(armor_max_condition(ArmorArchetype::Plate, ArmorMaterial::Iron), 500);
    }
}
