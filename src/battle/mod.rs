//! Battle system - turn-based tactics on a tile grid
//!
//! Two factions alternate turns. Each combatant may move once and act once
//! per round; actions resolve into timed hits that presentation code plays
//! back while the state machine waits.

pub mod ability;
pub mod ai;
pub mod board;
pub mod combatant;
pub mod command;
pub mod constants;
pub mod execution;
pub mod grid;
pub mod hit;
pub mod items;
pub mod movement;
pub mod pathfinding;
pub mod templates;

// Re-exports for convenient access
pub use ability::{Ability, ActivationMode, TargetMode, TileOccupancy};
pub use ai::{ApproachPolicy, BattlePolicy, Decision, HoldPolicy};
pub use board::{BattleOutcome, BattleSetup, Board, Placement};
pub use combatant::{movement_distance, Combatant, Stat, StatBlock};
pub use command::{ActorAbility, Command, CommandQueue};
pub use constants::*;
pub use execution::{
    ActionChoice, Battle, BattleEvent, BattleEventLog, BattleEventType, BattleInput, BattlePhase,
    HighlightKind, InputOutcome,
};
pub use grid::{AsciiBitmap, Grid, ObstacleSource};
pub use hit::Hit;
pub use items::{EquipSlot, Equipment, Item, ItemType};
pub use movement::{advance_along_path, MovementResult, PathFollow};
pub use pathfinding::{find_path, path_steps, simplify_path};
pub use templates::{CombatantFactory, CombatantTemplate, ItemTemplate, TemplateLibrary};
