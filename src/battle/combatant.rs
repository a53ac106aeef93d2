//! Combatants: resource pools, DAWISH stats, equipment and learned abilities

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::ability::{Ability, ActivationMode};
use crate::battle::command::ActorAbility;
use crate::battle::constants::{BASE_MOVE_DISTANCE, KNOWN_ABILITY_THRESHOLD, MOVE_LOG_BASE};
use crate::battle::grid::Grid;
use crate::battle::hit::Hit;
use crate::battle::items::{EquipSlot, Equipment, Item, ItemType};
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantId, Faction, TileCoord, Vec2};

/// The six DAWISH stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Defense,
    Attack,
    Wisdom,
    Intelligence,
    Speed,
    Hit,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Defense,
        Stat::Attack,
        Stat::Wisdom,
        Stat::Intelligence,
        Stat::Speed,
        Stat::Hit,
    ];
}

/// One value per DAWISH stat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub defense: i32,
    pub attack: i32,
    pub wisdom: i32,
    pub intelligence: i32,
    pub speed: i32,
    pub hit: i32,
}

impl StatBlock {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Defense => self.defense,
            Stat::Attack => self.attack,
            Stat::Wisdom => self.wisdom,
            Stat::Intelligence => self.intelligence,
            Stat::Speed => self.speed,
            Stat::Hit => self.hit,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        let slot = match stat {
            Stat::Defense => &mut self.defense,
            Stat::Attack => &mut self.attack,
            Stat::Wisdom => &mut self.wisdom,
            Stat::Intelligence => &mut self.intelligence,
            Stat::Speed => &mut self.speed,
            Stat::Hit => &mut self.hit,
        };
        *slot = value;
    }
}

/// Tiles a combatant with the given Speed may cover in one move
///
/// `3 + floor(log4(speed))`; speeds below 1 get the base distance only.
pub fn movement_distance(speed: i32) -> u32 {
    if speed < 1 {
        return BASE_MOVE_DISTANCE;
    }
    BASE_MOVE_DISTANCE + (speed as u32).ilog(MOVE_LOG_BASE)
}

/// A character taking part in a battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub faction: Faction,
    pub class_name: String,
    pub avatar: String,

    // Resource pools
    pub max_health: i32,
    pub current_health: i32,
    pub max_mana: i32,
    pub current_mana: i32,

    /// Unmodified stats; ignores equipment and temporary effects
    pub stats: StatBlock,
    /// Additive buffs/debuffs, cleared independently of base stats
    pub modifiers: AHashMap<Stat, i32>,

    pub equipment: Equipment,
    /// Armor types this class may wear
    pub armor_types: ItemType,
    /// Weapon types this class may wield
    pub weapon_types: ItemType,

    // Position
    pub position: TileCoord,
    /// Interpolated location used while walking between tiles
    pub location: Vec2,

    // Per-round flags
    pub can_move: bool,
    pub can_act: bool,

    pub stat_experience: Option<StatBlock>,
    pub ability_experience: AHashMap<Ability, i32>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, faction: Faction, max_health: i32, max_mana: i32) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            faction,
            class_name: String::new(),
            avatar: String::new(),
            max_health,
            current_health: max_health,
            max_mana,
            current_mana: max_mana,
            stats: StatBlock::default(),
            modifiers: AHashMap::new(),
            equipment: Equipment::new(),
            armor_types: ItemType::empty(),
            weapon_types: ItemType::empty(),
            position: TileCoord::default(),
            location: Vec2::default(),
            can_move: true,
            can_act: true,
            stat_experience: None,
            ability_experience: AHashMap::new(),
        }
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    pub fn at(mut self, position: TileCoord) -> Self {
        self.place_at(position);
        self
    }

    /// Put the combatant exactly on a tile
    pub fn place_at(&mut self, position: TileCoord) {
        self.position = position;
        self.location = position.to_vec2();
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    // ===== STATS =====

    /// Base stat plus the flat bonus of every equipped item
    pub fn read_stat(&self, stat: Stat) -> i32 {
        self.stats.get(stat) + self.equipment.iter().map(|item| item.boost(stat)).sum::<i32>()
    }

    pub fn read_all_stats(&self) -> StatBlock {
        let mut block = StatBlock::default();
        for stat in Stat::ALL {
            block.set(stat, self.read_stat(stat));
        }
        block
    }

    /// `read_stat` plus temporary modifiers
    pub fn modified_stat(&self, stat: Stat) -> i32 {
        self.read_stat(stat) + self.modifiers.get(&stat).copied().unwrap_or(0)
    }

    pub fn set_modifier(&mut self, stat: Stat, amount: i32) {
        if amount == 0 {
            self.modifiers.remove(&stat);
        } else {
            self.modifiers.insert(stat, amount);
        }
    }

    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
    }

    // ===== EQUIPMENT =====

    pub fn equipped_weapon(&self) -> Option<&Item> {
        self.equipment.weapon.as_ref()
    }

    pub fn equipped_armor(&self) -> Option<&Item> {
        self.equipment.armor.as_ref()
    }

    pub fn equipped_accessory(&self) -> Option<&Item> {
        self.equipment.accessory.as_ref()
    }

    /// Equip a weapon or armor, returning whatever it displaced
    ///
    /// Accessories and items without a single slot are `NotEquippable`
    /// and leave the equipment untouched.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>> {
        match item.equip_slot() {
            Some(EquipSlot::Accessory) => Err(BattleError::NotEquippable(format!(
                "{}: equipping accessories is not supported",
                item.name
            ))),
            None => Err(BattleError::NotEquippable(format!(
                "{}: item type {:?} has no single equip slot",
                item.name, item.item_type
            ))),
            Some(slot) => Ok(self.equipment.slot_mut(slot).replace(item)),
        }
    }

    /// Put an item straight into its slot, accessories included
    ///
    /// Used when building a combatant from its starting inventory.
    pub fn outfit(&mut self, item: Item) -> Result<Option<Item>> {
        let slot = item.equip_slot().ok_or_else(|| {
            BattleError::NotEquippable(format!(
                "{}: item type {:?} has no single equip slot",
                item.name, item.item_type
            ))
        })?;
        Ok(self.equipment.slot_mut(slot).replace(item))
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.equipment.slot_mut(slot).take()
    }

    /// Is this class allowed to wear the given armor?
    pub fn can_equip_armor(&self, armor: &Item) -> bool {
        self.armor_types.contains(armor.item_type)
    }

    /// Is this class allowed to wield the given weapon?
    pub fn can_equip_weapon(&self, weapon: &Item) -> bool {
        self.weapon_types.contains(weapon.item_type)
    }

    // ===== ABILITIES =====

    /// Abilities whose experience exceeds the known threshold, in stable order
    pub fn known_abilities(&self) -> Vec<Ability> {
        let mut known: Vec<Ability> = self
            .ability_experience
            .iter()
            .filter(|(_, xp)| **xp > KNOWN_ABILITY_THRESHOLD)
            .map(|(ability, _)| *ability)
            .collect();
        known.sort();
        known
    }

    /// Known abilities plus those granted by the weapon and armor, bound to
    /// this combatant
    pub fn get_usable_abilities(&self) -> Vec<ActorAbility> {
        let mut abilities = self.known_abilities();

        let granted = [self.equipped_weapon(), self.equipped_armor()]
            .into_iter()
            .flatten()
            .filter_map(|item| item.ability);
        for ability in granted {
            if !abilities.contains(&ability) {
                abilities.push(ability);
            }
        }

        abilities
            .into_iter()
            .map(|ability| ActorAbility::new(self.id, ability))
            .collect()
    }

    /// Does the current weapon or armor satisfy the ability's item type?
    ///
    /// Abilities without an item requirement are always usable.
    pub fn can_use(&self, ability: Ability) -> bool {
        let required = ability.item_type();
        if required.is_empty() {
            return true;
        }

        [self.equipped_weapon(), self.equipped_armor()]
            .into_iter()
            .flatten()
            .any(|item| item.item_type.intersects(required))
    }

    pub fn can_afford(&self, ability: Ability) -> bool {
        ability.mana_cost() <= self.current_mana
    }

    /// Active abilities that can be cast right now: usable with current gear
    /// and cheap enough
    pub fn castable_abilities(&self) -> Vec<Ability> {
        self.get_usable_abilities()
            .into_iter()
            .map(|bound| bound.ability)
            .filter(|a| a.activation() == ActivationMode::Active)
            .filter(|a| self.can_use(*a) && self.can_afford(*a))
            .collect()
    }

    // ===== HITS =====

    /// Adjust an incoming hit for armor and passives
    ///
    /// Mitigation is not modelled yet, so hits pass through unchanged.
    pub fn process_hit(&self, hit: Hit) -> Hit {
        hit
    }

    /// Apply damage (positive) or healing (zero or negative)
    ///
    /// Damage has no floor; removing the fallen is the death sweep's job.
    pub fn receive_hit(&mut self, hit: &Hit) {
        if hit.damage > 0 {
            self.current_health -= hit.damage;
            return;
        }

        self.current_health = (self.current_health + hit.damage.abs()).min(self.max_health);
    }

    // ===== ROUNDS =====

    pub fn begin_round(&mut self) {
        self.can_move = true;
        self.can_act = true;
    }

    pub fn end_round(&mut self) {
        self.can_move = false;
        self.can_act = false;
    }

    // ===== MOVEMENT =====

    /// Range comes from base Speed; gear and modifiers only change walking pace
    pub fn movement_distance(&self) -> u32 {
        movement_distance(self.stats.speed)
    }

    /// Tiles this combatant can walk to on the given board grid
    pub fn compute_movement_range(&self, board_grid: &Grid) -> Grid {
        board_grid.compute_reachable(self.position, self.movement_distance())
    }
}
