//! Combatant templates and the factory that turns them into combatants
//!
//! Templates are JSON keyed by `"group/name"` ids (`"party/gunner"`,
//! `"coliseum/guard"`). Items referenced from a template's inventory come
//! from the library's item catalog.

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::ability::Ability;
use crate::battle::combatant::{Combatant, Stat, StatBlock};
use crate::battle::items::{Item, ItemType};
use crate::core::error::{BattleError, Result};
use crate::core::types::Faction;

const BUILTIN_LIBRARY: &str = include_str!("../../data/combatants.json");

/// Builds combatants from template ids
pub trait CombatantFactory {
    fn build_combatant(&self, template_id: &str) -> Result<Combatant>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityExperience {
    pub name: String,
    pub experience: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub class: String,
    #[serde(default)]
    pub avatar: String,
    pub health: i32,
    pub mana: i32,
    #[serde(default)]
    pub armortype: String,
    #[serde(default)]
    pub weapontype: String,
    #[serde(default)]
    pub inventory: Vec<String>,
    pub stats: StatBlock,
    #[serde(default)]
    pub statxp: Option<StatBlock>,
    #[serde(default)]
    pub abilities: Vec<AbilityExperience>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub stats: AHashMap<Stat, i32>,
    #[serde(default)]
    pub ability: Option<String>,
}

/// Combatant templates plus the item catalog they draw from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateLibrary {
    #[serde(default)]
    pub combatants: AHashMap<String, CombatantTemplate>,
    #[serde(default)]
    pub items: AHashMap<String, ItemTemplate>,
}

impl TemplateLibrary {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// The library shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_LIBRARY)
    }

    pub fn template(&self, id: &str) -> Option<&CombatantTemplate> {
        self.combatants.get(id)
    }

    /// Template ids in sorted order
    pub fn template_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.combatants.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn build_item(&self, id: &str) -> Result<Item> {
        let template = self
            .items
            .get(id)
            .ok_or_else(|| BattleError::UnknownItem(id.to_string()))?;

        let item_type = ItemType::parse_mask(&template.item_type).ok_or_else(|| {
            BattleError::UnknownItem(format!("{}: bad item type {:?}", id, template.item_type))
        })?;

        let mut item = Item::new(template.name.clone(), item_type);
        for (stat, amount) in &template.stats {
            item = item.with_boost(*stat, *amount);
        }
        if let Some(name) = &template.ability {
            item = item.with_ability(Ability::from_name(name)?);
        }
        Ok(item)
    }
}

fn parse_class_mask(template_id: &str, text: &str) -> Result<ItemType> {
    ItemType::parse_mask(text).ok_or_else(|| {
        BattleError::UnknownTemplate(format!("{}: bad item type mask {:?}", template_id, text))
    })
}

impl CombatantFactory for TemplateLibrary {
    /// Full health and mana, starting inventory in its slots, faction 1
    ///
    /// Callers set name, faction and position when placing the combatant.
    fn build_combatant(&self, template_id: &str) -> Result<Combatant> {
        let template = self
            .template(template_id)
            .ok_or_else(|| BattleError::UnknownTemplate(template_id.to_string()))?;

        let display_name = template_id.rsplit('/').next().unwrap_or(template_id);
        let mut combatant = Combatant::new(display_name, Faction::Opponent, template.health, template.mana)
            .with_stats(template.stats);
        combatant.class_name = template.class.clone();
        combatant.avatar = template.avatar.clone();
        combatant.armor_types = parse_class_mask(template_id, &template.armortype)?;
        combatant.weapon_types = parse_class_mask(template_id, &template.weapontype)?;
        combatant.stat_experience = template.statxp;

        for entry in &template.abilities {
            let ability = Ability::from_name(&entry.name)?;
            combatant.ability_experience.insert(ability, entry.experience);
        }

        for item_id in &template.inventory {
            let item = self.build_item(item_id)?;
            if let Some(displaced) = combatant.outfit(item)? {
                tracing::warn!(
                    "{}: {} displaced {} from the starting inventory",
                    template_id,
                    item_id,
                    displaced.name
                );
            }
        }

        Ok(combatant)
    }
}
