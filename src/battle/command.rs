//! Commands and the FIFO queue that holds them until execution

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::battle::ability::Ability;
use crate::core::types::{CombatantId, TileCoord};

/// An ability bound to the combatant who would use it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorAbility {
    pub actor: CombatantId,
    pub ability: Ability,
}

impl ActorAbility {
    pub fn new(actor: CombatantId, ability: Ability) -> Self {
        Self { actor, ability }
    }

    /// Aim at a tile
    pub fn at(self, target: TileCoord) -> Command {
        Command::new(self.actor, self.ability, target)
    }
}

/// A bound, targeted ability waiting to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub actor: CombatantId,
    pub ability: Ability,
    pub target: TileCoord,
}

impl Command {
    pub fn new(actor: CombatantId, ability: Ability, target: TileCoord) -> Self {
        Self {
            actor,
            ability,
            target,
        }
    }

    pub fn is_move(&self) -> bool {
        self.ability == Ability::Move
    }
}

/// Queued commands, executed oldest first
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn pop_front(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    /// Remove the oldest command issued by `actor`, if any
    pub fn cancel_first_for(&mut self, actor: CombatantId) -> Option<Command> {
        let index = self.commands.iter().position(|c| c.actor == actor)?;
        self.commands.remove(index)
    }

    /// Discard everything, returning how many commands were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.commands.len();
        self.commands.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}
