//! Equipment slots and the container mapping slots to items.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Armor, Condition, Weapon};

/// Slot an item is equipped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipSlot {
    /// Helm.
    Head,
    /// Right pauldron.
    RightArm,
    /// Left pauldron.
    LeftArm,
    /// Cuirass.
    ChestArmor,
    /// Gauntlets.
    Gloves,
    /// Greaves.
    LegsArmor,
    /// Boots.
    Feet,
    /// Main hand.
    RightHand,
    /// Off hand (weapons or shields).
    LeftHand,
    /// Amulet.
    Amulet,
    /// Bracelet.
    Bracelet,
    /// Bracer.
    Bracer,
    /// Ring.
    Ring,
    /// Mark.
    Mark,
    /// Crystal.
    Crystal,
}

impl EquipSlot {
    /// Jewellery slots never reduce physical damage.
    #[must_use]
    pub const fn is_jewellery(self) -> bool {
        matches!(
            self,
            EquipSlot::Amulet
                | EquipSlot::Bracelet
                | EquipSlot::Bracer
                | EquipSlot::Ring
                | EquipSlot::Mark
                | EquipSlot::Crystal
        )
    }

    /// Returns `true` for the two hand slots.
    #[must_use]
    pub const fn is_hand(self) -> bool {
        matches!(self, EquipSlot::RightHand | EquipSlot::LeftHand)
    }
}

/// Item category, used to pick wear warning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Weapon.
    Weapon,
    /// Body armor.
    Armor,
    /// Shield.
    Shield,
    /// Jewellery worn in an armor-capable slot.
    Jewellery,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
            ItemCategory::Shield => "shield",
            ItemCategory::Jewellery => "jewellery",
        };
        f.write_str(name)
    }
}

/// An equipped item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    /// A weapon.
    Weapon(Weapon),
    /// Armor, a shield or jewellery.
    Armor(Armor),
}

impl Item {
    /// Current condition.
    #[must_use]
    pub const fn condition(&self) -> Condition {
        match self {
            Item::Weapon(w) => w.condition,
            Item::Armor(a) => a.condition,
        }
    }

    /// Mutable condition.
    pub fn condition_mut(&mut self) -> &mut Condition {
        match self {
            Item::Weapon(w) => &mut w.condition,
            Item::Armor(a) => &mut a.condition,
        }
    }

    /// Returns `true` if enchanted.
    #[must_use]
    pub const fn is_enchanted(&self) -> bool {
        match self {
            Item::Weapon(w) => w.enchanted,
            Item::Armor(a) => a.enchanted,
        }
    }

    /// Category for warning text.
    #[must_use]
    pub const fn category(&self) -> ItemCategory {
        match self {
            Item::Weapon(_) => ItemCategory::Weapon,
            Item::Armor(a) if a.slot.is_jewellery() => ItemCategory::Jewellery,
            Item::Armor(a) if a.archetype.is_shield() => ItemCategory::Shield,
            Item::Armor(_) => ItemCategory::Armor,
        }
    }

    /// Returns the weapon, if this is one.
    #[must_use]
    pub const fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Item::Weapon(w) => Some(w),
            Item::Armor(_) => None,
        }
    }

    /// Returns the armor, if this is one.
    #[must_use]
    pub const fn as_armor(&self) -> Option<&Armor> {
        match self {
            Item::Armor(a) => Some(a),
            Item::Weapon(_) => None,
        }
    }
}

/// Items a combatant is wearing or wielding, keyed by slot.
///
/// Iteration order is slot order, so anything summed over equipment is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, Item>,
}

impl Equipment {
    /// Creates empty equipment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `item` in `slot`, returning whatever was there.
    pub fn equip(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.slots.insert(slot, item)
    }

    /// Removes and returns the item in `slot`.
    ///
    /// Also used to destroy items that break beyond repair.
    pub fn remove(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots.remove(&slot)
    }

    /// Item in `slot`.
    #[must_use]
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    /// Mutable item in `slot`.
    pub fn get_mut(&mut self, slot: EquipSlot) -> Option<&mut Item> {
        self.slots.get_mut(&slot)
    }

    /// Weapon in `slot`, if the slot holds one.
    #[must_use]
    pub fn weapon(&self, slot: EquipSlot) -> Option<&Weapon> {
        self.get(slot).and_then(Item::as_weapon)
    }

    /// Mutable weapon in `slot`, if the slot holds one.
    pub fn weapon_mut(&mut self, slot: EquipSlot) -> Option<&mut Weapon> {
        match self.slots.get_mut(&slot) {
            Some(Item::Weapon(w)) => Some(w),
            _ => None,
        }
    }

    /// Armor in `slot`, if the slot holds armor.
    #[must_use]
    pub fn armor(&self, slot: EquipSlot) -> Option<&Armor> {
        self.get(slot).and_then(Item::as_armor)
    }

    /// Shield in the off hand, if any.
    #[must_use]
    pub fn shield(&self) -> Option<&Armor> {
        self.armor(EquipSlot::LeftHand).filter(|a| a.is_shield())
    }

    /// Iterates over all equipped armor (including shields and jewellery).
    pub fn armor_pieces(&self) -> impl Iterator<Item = &Armor> {
        self.slots.values().filter_map(Item::as_armor)
    }

    /// Iterates over `(slot, item)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    /// Number of equipped items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is equipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
