use thiserror::Error;

use crate::core::types::{CombatantId, TileCoord};

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("No path from {from:?} to {to:?}")]
    NoPathFound { from: TileCoord, to: TileCoord },

    #[error("Item not equippable: {0}")]
    NotEquippable(String),

    #[error("Insufficient mana: {name} needs {cost}, has {available}")]
    InsufficientMana {
        name: String,
        cost: i32,
        available: i32,
    },

    #[error("Action unavailable: {0}")]
    ActionUnavailable(String),

    #[error("Malformed obstacle source: {0}")]
    MalformedSource(String),

    #[error("Unknown combatant template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("Combatant not found: {0:?}")]
    CombatantNotFound(CombatantId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, BattleError>;
