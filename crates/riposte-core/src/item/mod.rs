//! Weapons, armor and their shared vocabulary.
//!
//! Items are plain data. Everything that turns an item into numbers (damage
//! ranges, resistance coefficients, material bonuses) lives in
//! [`tables`](crate::tables) so it can be rebalanced in one place.

mod equipment;

pub use equipment::{EquipSlot, Equipment, Item, ItemCategory};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::components::{ProficiencyFlags, Skill};
use crate::entity::Poison;
use crate::tables;

// ============================================================================
// DamageType
// ============================================================================

/// Physical damage category of a single attack.
///
/// The discriminants are stable: `0` is special (ignores armor), `1` is
/// bludgeoning, `2` slashing, `3` piercing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum DamageType {
    /// Magical or otherwise armor-ignoring damage.
    Special = 0,
    /// Crushing damage from blunt weapons and fists.
    Bludgeoning = 1,
    /// Cutting damage from edges.
    Slashing = 2,
    /// Thrusting damage from points and arrows.
    Piercing = 3,
}

impl DamageType {
    /// All damage types in discriminant order.
    pub const ALL: [DamageType; 4] = [
        DamageType::Special,
        DamageType::Bludgeoning,
        DamageType::Slashing,
        DamageType::Piercing,
    ];

    /// Array index for per-type tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for the three physical types.
    #[must_use]
    pub const fn is_physical(self) -> bool {
        !matches!(self, DamageType::Special)
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DamageType::Special => "special",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Slashing => "slashing",
            DamageType::Piercing => "piercing",
        };
        f.write_str(name)
    }
}

/// Direction of a melee swing.
///
/// The direction selects the damage type of most weapons and shifts both
/// hit chance and damage slightly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SwingDirection {
    /// No directional input (default thrust or punch).
    #[default]
    Neutral,
    /// Horizontal swing from the right.
    Left,
    /// Horizontal swing from the left.
    Right,
    /// Diagonal chop toward the lower left.
    DownLeft,
    /// Diagonal chop toward the lower right.
    DownRight,
    /// Overhead chop.
    Down,
    /// Upward thrust.
    Up,
}

impl SwingDirection {
    /// `(to_hit, damage)` shift for this direction.
    ///
    /// Thrusts are accurate but light, overhead chops heavy but wild.
    #[must_use]
    pub const fn modifiers(self) -> (i32, i32) {
        match self {
            SwingDirection::Up => (10, -4),
            SwingDirection::DownRight => (5, -2),
            SwingDirection::DownLeft => (-5, 2),
            SwingDirection::Down => (-10, 4),
            SwingDirection::Neutral | SwingDirection::Left | SwingDirection::Right => (0, 0),
        }
    }
}

// ============================================================================
// DamageRange
// ============================================================================

/// Inclusive damage range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageRange {
    /// Minimum damage.
    pub min: i32,
    /// Maximum damage.
    pub max: i32,
}

impl DamageRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Midpoint of the range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(self) -> f32 {
        (self.min + self.max) as f32 / 2.0
    }

    /// Returns `true` when `min <= max`.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        self.min <= self.max
    }
}

impl fmt::Display for DamageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

// ============================================================================
// Weapons
// ============================================================================

/// How many hands a weapon needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    /// Main hand only.
    OneHanded,
    /// Both hands.
    TwoHanded,
    /// Main hand or off hand.
    Either,
}

/// Weapon archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponArchetype {
    /// Dagger.
    Dagger,
    /// Tanto.
    Tanto,
    /// Staff.
    Staff,
    /// Shortsword.
    Shortsword,
    /// Wakazashi.
    Wakazashi,
    /// Broadsword.
    Broadsword,
    /// Saber.
    Saber,
    /// Longsword.
    Longsword,
    /// Katana.
    Katana,
    /// Claymore.
    Claymore,
    /// Dai-katana.
    DaiKatana,
    /// Mace.
    Mace,
    /// Flail.
    Flail,
    /// Warhammer.
    Warhammer,
    /// Battle axe.
    BattleAxe,
    /// War axe.
    WarAxe,
    /// Short bow.
    ShortBow,
    /// Long bow.
    LongBow,
}

impl WeaponArchetype {
    /// Number of archetypes.
    pub const COUNT: usize = 18;

    /// All archetypes in table order.
    pub const ALL: [WeaponArchetype; Self::COUNT] = [
        WeaponArchetype::Dagger,
        WeaponArchetype::Tanto,
        WeaponArchetype::Staff,
        WeaponArchetype::Shortsword,
        WeaponArchetype::Wakazashi,
        WeaponArchetype::Broadsword,
        WeaponArchetype::Saber,
        WeaponArchetype::Longsword,
        WeaponArchetype::Katana,
        WeaponArchetype::Claymore,
        WeaponArchetype::DaiKatana,
        WeaponArchetype::Mace,
        WeaponArchetype::Flail,
        WeaponArchetype::Warhammer,
        WeaponArchetype::BattleAxe,
        WeaponArchetype::WarAxe,
        WeaponArchetype::ShortBow,
        WeaponArchetype::LongBow,
    ];

    /// Array index for per-archetype tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Skill trained by (and seeding the hit chance of) this archetype.
    #[must_use]
    pub const fn skill(self) -> Skill {
        match self {
            WeaponArchetype::Dagger
            | WeaponArchetype::Tanto
            | WeaponArchetype::Shortsword
            | WeaponArchetype::Wakazashi => Skill::ShortBlade,
            WeaponArchetype::Broadsword
            | WeaponArchetype::Saber
            | WeaponArchetype::Longsword
            | WeaponArchetype::Katana
            | WeaponArchetype::Claymore
            | WeaponArchetype::DaiKatana => Skill::LongBlade,
            WeaponArchetype::Staff
            | WeaponArchetype::Mace
            | WeaponArchetype::Flail
            | WeaponArchetype::Warhammer => Skill::BluntWeapon,
            WeaponArchetype::BattleAxe | WeaponArchetype::WarAxe => Skill::Axe,
            WeaponArchetype::ShortBow | WeaponArchetype::LongBow => Skill::Archery,
        }
    }

    /// Career proficiency flag covering this archetype.
    #[must_use]
    pub const fn proficiency(self) -> ProficiencyFlags {
        match self.skill() {
            Skill::ShortBlade => ProficiencyFlags::SHORT_BLADES,
            Skill::LongBlade => ProficiencyFlags::LONG_BLADES,
            Skill::BluntWeapon => ProficiencyFlags::BLUNT_WEAPONS,
            Skill::Axe => ProficiencyFlags::AXES,
            Skill::Archery => ProficiencyFlags::MISSILE_WEAPONS,
            _ => ProficiencyFlags::HAND_TO_HAND,
        }
    }

    /// Hands needed to wield the archetype.
    #[must_use]
    pub const fn handedness(self) -> Handedness {
        match self {
            WeaponArchetype::Dagger
            | WeaponArchetype::Tanto
            | WeaponArchetype::Wakazashi
            | WeaponArchetype::Shortsword => Handedness::Either,
            WeaponArchetype::Staff
            | WeaponArchetype::Claymore
            | WeaponArchetype::DaiKatana
            | WeaponArchetype::BattleAxe
            | WeaponArchetype::Warhammer
            | WeaponArchetype::ShortBow
            | WeaponArchetype::LongBow => Handedness::TwoHanded,
            _ => Handedness::OneHanded,
        }
    }

    /// Returns `true` for bows.
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(self, WeaponArchetype::ShortBow | WeaponArchetype::LongBow)
    }

    /// Short thrusting blades eligible for the heaviest backstabs.
    #[must_use]
    pub const fn is_short_piercing(self) -> bool {
        matches!(
            self,
            WeaponArchetype::Dagger
                | WeaponArchetype::Tanto
                | WeaponArchetype::Wakazashi
                | WeaponArchetype::Shortsword
        )
    }

    /// Damage type dealt by a swing in `direction`.
    ///
    /// Bows always pierce and blunt weapons always bludgeon. Axes bludgeon
    /// on an overhead chop and slash otherwise. Blades pierce on thrusts
    /// and slash on every other swing.
    #[must_use]
    pub const fn damage_type_for(self, direction: SwingDirection) -> DamageType {
        match self.skill() {
            Skill::Archery => DamageType::Piercing,
            Skill::BluntWeapon => DamageType::Bludgeoning,
            Skill::Axe => {
                if matches!(direction, SwingDirection::Down) {
                    DamageType::Bludgeoning
                } else {
                    DamageType::Slashing
                }
            }
            _ => {
                if matches!(direction, SwingDirection::Neutral | SwingDirection::Up) {
                    DamageType::Piercing
                } else {
                    DamageType::Slashing
                }
            }
        }
    }
}

impl fmt::Display for WeaponArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeaponArchetype::Dagger => "dagger",
            WeaponArchetype::Tanto => "tanto",
            WeaponArchetype::Staff => "staff",
            WeaponArchetype::Shortsword => "shortsword",
            WeaponArchetype::Wakazashi => "wakazashi",
            WeaponArchetype::Broadsword => "broadsword",
            WeaponArchetype::Saber => "saber",
            WeaponArchetype::Longsword => "longsword",
            WeaponArchetype::Katana => "katana",
            WeaponArchetype::Claymore => "claymore",
            WeaponArchetype::DaiKatana => "dai-katana",
            WeaponArchetype::Mace => "mace",
            WeaponArchetype::Flail => "flail",
            WeaponArchetype::Warhammer => "warhammer",
            WeaponArchetype::BattleAxe => "battle axe",
            WeaponArchetype::WarAxe => "war axe",
            WeaponArchetype::ShortBow => "short bow",
            WeaponArchetype::LongBow => "long bow",
        };
        f.write_str(name)
    }
}

/// Weapon material, ordered from weakest to strongest.
///
/// The ordering matters: monsters that require a minimum metal compare
/// against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponMaterial {
    /// Iron.
    Iron,
    /// Steel.
    Steel,
    /// Silver.
    Silver,
    /// Elven.
    Elven,
    /// Dwarven.
    Dwarven,
    /// Mithril.
    Mithril,
    /// Adamantium.
    Adamantium,
    /// Ebony.
    Ebony,
    /// Orcish.
    Orcish,
    /// Daedric.
    Daedric,
}

impl WeaponMaterial {
    /// All materials in ascending order.
    pub const ALL: [WeaponMaterial; 10] = [
        WeaponMaterial::Iron,
        WeaponMaterial::Steel,
        WeaponMaterial::Silver,
        WeaponMaterial::Elven,
        WeaponMaterial::Dwarven,
        WeaponMaterial::Mithril,
        WeaponMaterial::Adamantium,
        WeaponMaterial::Ebony,
        WeaponMaterial::Orcish,
        WeaponMaterial::Daedric,
    ];

    /// Array index for per-material tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A wielded weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Archetype.
    pub archetype: WeaponArchetype,
    /// Material.
    pub material: WeaponMaterial,
    /// Remaining durability.
    pub condition: Condition,
    /// Poison coating, consumed by the next landed hit.
    pub poison: Option<Poison>,
    /// Enchanted items are destroyed, not merely broken, at zero condition.
    pub enchanted: bool,
}

impl Weapon {
    /// Creates a brand-new, unpoisoned, unenchanted weapon.
    #[must_use]
    pub fn new(archetype: WeaponArchetype, material: WeaponMaterial) -> Self {
        Self {
            archetype,
            material,
            condition: Condition::new(tables::weapon_max_condition(archetype, material)),
            poison: None,
            enchanted: false,
        }
    }

    /// Sets the condition to `percent` of maximum.
    #[must_use]
    pub fn with_condition_percent(mut self, percent: i32) -> Self {
        self.condition = self.condition.at_percent(percent);
        self
    }

    /// Coats the weapon with poison.
    #[must_use]
    pub fn with_poison(mut self, poison: Poison) -> Self {
        self.poison = Some(poison);
        self
    }

    /// Marks the weapon enchanted.
    #[must_use]
    pub fn enchanted(mut self) -> Self {
        self.enchanted = true;
        self
    }

    /// Returns `true` if the weapon needs both hands and is not a bow.
    #[must_use]
    pub const fn is_two_handed_melee(&self) -> bool {
        matches!(self.archetype.handedness(), Handedness::TwoHanded) && !self.archetype.is_ranged()
    }
}

// ============================================================================
// Armor
// ============================================================================

/// Armor construction archetype.
///
/// Selects the fixed per-damage-type resistance coefficients. The four
/// shield archetypes also define block chances and body coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorArchetype {
    /// Boiled leather.
    Leather,
    /// Chain mail.
    Chain,
    /// Plate.
    Plate,
    /// Small strapped shield.
    Buckler,
    /// Round shield.
    RoundShield,
    /// Kite shield.
    KiteShield,
    /// Tower shield.
    TowerShield,
}

impl ArmorArchetype {
    /// Array index for per-archetype tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for the four shield archetypes.
    #[must_use]
    pub const fn is_shield(self) -> bool {
        matches!(
            self,
            ArmorArchetype::Buckler
                | ArmorArchetype::RoundShield
                | ArmorArchetype::KiteShield
                | ArmorArchetype::TowerShield
        )
    }

    /// Body regions a shield of this archetype covers.
    ///
    /// Empty for body armor.
    #[must_use]
    pub const fn covered_regions(self) -> &'static [BodyRegion] {
        match self {
            ArmorArchetype::Buckler => &[BodyRegion::LeftArm, BodyRegion::Hands],
            ArmorArchetype::RoundShield => {
                &[BodyRegion::LeftArm, BodyRegion::Hands, BodyRegion::Chest]
            }
            ArmorArchetype::KiteShield => &[
                BodyRegion::LeftArm,
                BodyRegion::Hands,
                BodyRegion::Chest,
                BodyRegion::Legs,
            ],
            ArmorArchetype::TowerShield => &[
                BodyRegion::Head,
                BodyRegion::LeftArm,
                BodyRegion::Hands,
                BodyRegion::Chest,
                BodyRegion::Legs,
            ],
            ArmorArchetype::Leather | ArmorArchetype::Chain | ArmorArchetype::Plate => &[],
        }
    }

    /// Returns `true` if this shield covers `region`.
    #[must_use]
    pub fn covers(self, region: BodyRegion) -> bool {
        self.covered_regions().contains(&region)
    }
}

/// Armor material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArmorMaterial {
    /// Leather.
    Leather,
    /// Chain.
    Chain,
    /// Iron.
    Iron,
    /// Steel.
    Steel,
    /// Silver.
    Silver,
    /// Elven.
    Elven,
    /// Dwarven.
    Dwarven,
    /// Mithril.
    Mithril,
    /// Adamantium.
    Adamantium,
    /// Ebony.
    Ebony,
    /// Orcish.
    Orcish,
    /// Daedric.
    Daedric,
}

impl ArmorMaterial {
    /// Array index for per-material tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Everything except leather is metal.
    #[must_use]
    pub const fn is_metal(self) -> bool {
        !matches!(self, ArmorMaterial::Leather)
    }
}

/// A worn piece of armor, shield or jewellery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    /// Construction archetype.
    pub archetype: ArmorArchetype,
    /// Material.
    pub material: ArmorMaterial,
    /// Slot the piece occupies.
    pub slot: EquipSlot,
    /// Weight in kilograms.
    pub weight_kg: f32,
    /// Remaining durability.
    pub condition: Condition,
    /// Enchanted items are destroyed, not merely broken, at zero condition.
    pub enchanted: bool,
}

impl Armor {
    /// Creates a brand-new piece with table weight and durability.
    #[must_use]
    pub fn new(archetype: ArmorArchetype, material: ArmorMaterial, slot: EquipSlot) -> Self {
        Self {
            archetype,
            material,
            slot,
            weight_kg: tables::armor_weight_kg(archetype, material),
            condition: Condition::new(tables::armor_max_condition(archetype, material)),
            enchanted: false,
        }
    }

    /// Creates a shield for the left hand.
    #[must_use]
    pub fn shield(archetype: ArmorArchetype, material: ArmorMaterial) -> Self {
        Self::new(archetype, material, EquipSlot::LeftHand)
    }

    /// Sets the condition to `percent` of maximum.
    #[must_use]
    pub fn with_condition_percent(mut self, percent: i32) -> Self {
        self.condition = self.condition.at_percent(percent);
        self
    }

    /// Overrides the table weight.
    #[must_use]
    pub fn with_weight(mut self, weight_kg: f32) -> Self {
        self.weight_kg = weight_kg;
        self
    }

    /// Marks the piece enchanted.
    #[must_use]
    pub fn enchanted(mut self) -> Self {
        self.enchanted = true;
        self
    }

    /// Returns `true` if this piece is a shield.
    #[must_use]
    pub const fn is_shield(&self) -> bool {
        self.archetype.is_shield()
    }

    /// Returns `true` if the material is metal.
    #[must_use]
    pub const fn is_metal(&self) -> bool {
        self.material.is_metal()
    }
}

// ============================================================================
// Body regions
// ============================================================================

/// Body region struck by a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyRegion {
    /// Head.
    Head,
    /// Right arm.
    RightArm,
    /// Left arm.
    LeftArm,
    /// Chest.
    Chest,
    /// Hands.
    Hands,
    /// Legs.
    Legs,
    /// Feet.
    Feet,
}

impl BodyRegion {
    /// All regions.
    pub const ALL: [BodyRegion; 7] = [
        BodyRegion::Head,
        BodyRegion::RightArm,
        BodyRegion::LeftArm,
        BodyRegion::Chest,
        BodyRegion::Hands,
        BodyRegion::Legs,
        BodyRegion::Feet,
    ];

    /// Armor slot protecting this region.
    #[must_use]
    pub const fn armor_slot(self) -> EquipSlot {
        match self {
            BodyRegion::Head => EquipSlot::Head,
            BodyRegion::RightArm => EquipSlot::RightArm,
            BodyRegion::LeftArm => EquipSlot::LeftArm,
            BodyRegion::Chest => EquipSlot::ChestArmor,
            BodyRegion::Hands => EquipSlot::Gloves,
            BodyRegion::Legs => EquipSlot::LegsArmor,
            BodyRegion::Feet => EquipSlot::Feet,
        }
    }

    /// Limbs and hands can be crippled.
    #[must_use]
    pub const fn is_crippleable(self) -> bool {
        matches!(
            self,
            BodyRegion::RightArm | BodyRegion::LeftArm | BodyRegion::Hands | BodyRegion::Legs
        )
    }
}

impl fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyRegion::Head => "head",
            BodyRegion::RightArm => "right arm",
            BodyRegion::LeftArm => "left arm",
            BodyRegion::Chest => "chest",
            BodyRegion::Hands => "hands",
            BodyRegion::Legs => "legs",
            BodyRegion::Feet => "feet",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Condition
// ============================================================================

/// Remaining durability of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    current: i32,
    max: i32,
}

impl Condition {
    /// Full condition with the given maximum (at least 1).
    #[must_use]
    pub const fn new(max: i32) -> Self {
        let max = if max < 1 { 1 } else { max };
        Self { current: max, max }
    }

    /// Same maximum, current set to `percent` of it.
    #[must_use]
    pub const fn at_percent(self, percent: i32) -> Self {
        let percent = if percent < 0 {
            0
        } else if percent > 100 {
            100
        } else {
            percent
        };
        Self {
            current: self.max * percent / 100,
            max: self.max,
        }
    }

    /// Current durability points.
    #[must_use]
    pub const fn current(self) -> i32 {
        self.current
    }

    /// Maximum durability points.
    #[must_use]
    pub const fn max(self) -> i32 {
        self.max
    }

    /// Current condition as an integer percentage of maximum.
    ///
    /// # Example
    ///
    /// ```
    /// use riposte_core::item::Condition;
    ///
    /// let c = Condition::new(200).at_percent(37);
    /// assert_eq!(c.current(), 74);
    /// assert_eq!(c.percent(), 37);
    /// ```
    #[must_use]
    pub const fn percent(self) -> i32 {
        if self.max <= 0 {
            return 0;
        }
        self.current * 100 / self.max
    }

    /// Wear band for the current percentage.
    #[must_use]
    pub const fn band(self) -> ConditionBand {
        ConditionBand::from_percent(self.percent())
    }

    /// Returns `true` at zero durability.
    #[must_use]
    pub const fn is_broken(self) -> bool {
        self.current <= 0
    }

    /// Removes `amount` points, flooring at zero.
    pub fn lower(&mut self, amount: i32) {
        self.current = (self.current - amount.max(0)).max(0);
    }
}

/// Coarse wear band used to index condition multiplier curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionBand {
    /// 92% and above.
    New,
    /// 76-91%.
    AlmostNew,
    /// 61-75%.
    SlightlyUsed,
    /// 41-60%.
    Used,
    /// 16-40%.
    Worn,
    /// 6-15%.
    Battered,
    /// Below 6%.
    Useless,
}

impl ConditionBand {
    /// Classifies a condition percentage.
    #[must_use]
    pub const fn from_percent(percent: i32) -> Self {
        if percent >= 92 {
            ConditionBand::New
        } else if percent >= 76 {
            ConditionBand::AlmostNew
        } else if percent >= 61 {
            ConditionBand::SlightlyUsed
        } else if percent >= 41 {
            ConditionBand::Used
        } else if percent >= 16 {
            ConditionBand::Worn
        } else if percent >= 6 {
            ConditionBand::Battered
        } else {
            ConditionBand::Useless
        }
    }

    /// Array index for condition curves.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
