//! Items and the three equipment slots
//!
//! An item's type mask decides both which slot it occupies and which
//! gear-gated abilities it unlocks.

use ahash::AHashMap;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::battle::ability::Ability;
use crate::battle::combatant::Stat;

bitflags! {
    /// Item classification bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ItemType: u32 {
        const SWORD = 1 << 0;
        const DAGGER = 1 << 1;
        const GUN = 1 << 2;
        const BOW = 1 << 3;
        const STAFF = 1 << 4;

        const LIGHT = 1 << 8;
        const HEAVY = 1 << 9;
        const ROBE = 1 << 10;

        const ACCESSORY = 1 << 16;

        const WEAPON = Self::SWORD.bits()
            | Self::DAGGER.bits()
            | Self::GUN.bits()
            | Self::BOW.bits()
            | Self::STAFF.bits();
        const ARMOR = Self::LIGHT.bits() | Self::HEAVY.bits() | Self::ROBE.bits();
    }
}

impl ItemType {
    /// Parse a mask such as `"gun"` or `"light|heavy"` (case-insensitive)
    pub fn parse_mask(text: &str) -> Option<Self> {
        let mut mask = ItemType::empty();
        for part in text.split(['|', ',']) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            mask |= ItemType::from_name(&part.to_uppercase())?;
        }
        Some(mask)
    }

    /// Which slot an item of this type occupies, if exactly one applies
    pub fn equip_slot(self) -> Option<EquipSlot> {
        if self.is_empty() {
            None
        } else if ItemType::WEAPON.contains(self) {
            Some(EquipSlot::Weapon)
        } else if ItemType::ARMOR.contains(self) {
            Some(EquipSlot::Armor)
        } else if self == ItemType::ACCESSORY {
            Some(EquipSlot::Accessory)
        } else {
            None
        }
    }
}

/// Equipment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

/// An equippable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub stat_boosts: AHashMap<Stat, i32>,
    #[serde(default)]
    pub ability: Option<Ability>,
}

impl Item {
    pub fn new(name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            item_type,
            stat_boosts: AHashMap::new(),
            ability: None,
        }
    }

    pub fn with_boost(mut self, stat: Stat, amount: i32) -> Self {
        self.stat_boosts.insert(stat, amount);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    /// Flat bonus this item gives to a stat (0 if none)
    pub fn boost(&self, stat: Stat) -> i32 {
        self.stat_boosts.get(&stat).copied().unwrap_or(0)
    }

    pub fn equip_slot(&self) -> Option<EquipSlot> {
        self.item_type.equip_slot()
    }
}

/// Currently equipped items, at most one per slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub accessory: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::Accessory => self.accessory.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<Item> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Accessory => &mut self.accessory,
        }
    }

    /// Equipped items in slot order: weapon, armor, accessory
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(|slot| slot.as_ref())
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }
}
