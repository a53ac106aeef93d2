//! Opponent decision-making
//!
//! The battle asks a [`BattlePolicy`] what each opponent should do and
//! executes the answer. Policies only read the board.

mod commander;

pub use commander::ApproachPolicy;

use serde::{Deserialize, Serialize};

use crate::battle::board::Board;
use crate::battle::command::Command;
use crate::core::types::{CombatantId, TileCoord};

/// Where an opponent moves, and what it queues once there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Must be in the actor's movement range; its own tile means "stay"
    pub destination: TileCoord,
    /// Aimed from `destination`
    pub command: Option<Command>,
}

impl Decision {
    pub fn hold(position: TileCoord) -> Self {
        Self {
            destination: position,
            command: None,
        }
    }
}

/// Trait for battle AI implementations
pub trait BattlePolicy {
    /// Decide for one opponent whose move has not been spent yet
    fn decide(&mut self, actor: CombatantId, board: &Board) -> Decision;
}

/// Never moves, never acts
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldPolicy;

impl BattlePolicy for HoldPolicy {
    fn decide(&mut self, actor: CombatantId, board: &Board) -> Decision {
        let position = board
            .combatant(actor)
            .map(|c| c.position)
            .unwrap_or_default();
        Decision::hold(position)
    }
}
