//! Reference opponent policy
//!
//! Strike if anything is in reach from a tile we can walk to, otherwise close
//! the distance to the nearest enemy.

use crate::battle::ability::{Ability, TargetMode};
use crate::battle::ai::{BattlePolicy, Decision};
use crate::battle::board::Board;
use crate::battle::combatant::Combatant;
use crate::battle::command::Command;
use crate::core::types::{CombatantId, TileCoord};

/// Best strike found so far
struct Strike {
    damage: i32,
    steps: u32,
    tile: TileCoord,
    command: Command,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApproachPolicy;

impl ApproachPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Offensive abilities the combatant could cast this turn
    fn offensive_abilities(me: &Combatant) -> Vec<Ability> {
        if !me.can_act {
            return Vec::new();
        }

        let mut abilities = vec![Ability::Attack];
        abilities.extend(
            me.castable_abilities()
                .into_iter()
                .filter(|a| a.target_mode() == TargetMode::Enemy && *a != Ability::Attack),
        );
        abilities
    }

    /// Highest-damage cast reachable this turn; ties go to the shorter walk
    fn best_strike(
        me: &Combatant,
        board: &Board,
        candidates: &[TileCoord],
        enemies: &[&Combatant],
    ) -> Option<Strike> {
        let abilities = Self::offensive_abilities(me);
        let mut best: Option<Strike> = None;

        for &tile in candidates {
            let steps = me.position.manhattan(&tile);

            for &ability in &abilities {
                let reach = ability.target_grid_from(&board.grid, tile);

                for enemy in enemies.iter().filter(|e| reach.is_passable(e.position)) {
                    let command = Command::new(me.id, ability, enemy.position);
                    let damage: i32 = ability
                        .generate_hits(board, &command)
                        .iter()
                        .filter(|hit| !hit.is_heal())
                        .map(|hit| hit.damage)
                        .sum();

                    let better = match &best {
                        None => true,
                        Some(b) => damage > b.damage || (damage == b.damage && steps < b.steps),
                    };
                    if better {
                        best = Some(Strike {
                            damage,
                            steps,
                            tile,
                            command,
                        });
                    }
                }
            }
        }

        best
    }
}

impl BattlePolicy for ApproachPolicy {
    fn decide(&mut self, actor: CombatantId, board: &Board) -> Decision {
        let Some(me) = board.combatant(actor) else {
            return Decision::hold(TileCoord::default());
        };

        let enemies: Vec<&Combatant> = board
            .combatants()
            .iter()
            .filter(|c| c.faction != me.faction && c.is_alive())
            .collect();
        if enemies.is_empty() {
            return Decision::hold(me.position);
        }

        let Ok(range) = board.movement_grid(actor) else {
            return Decision::hold(me.position);
        };
        let candidates: Vec<TileCoord> = range
            .selected_tiles()
            .into_iter()
            .filter(|t| *t == me.position || !board.is_occupied(*t))
            .collect();

        if let Some(strike) = Self::best_strike(me, board, &candidates, &enemies) {
            tracing::debug!(
                "{} strikes with {} from ({}, {})",
                me.name,
                strike.command.ability,
                strike.tile.x,
                strike.tile.y
            );
            return Decision {
                destination: strike.tile,
                command: Some(strike.command),
            };
        }

        let destination = candidates
            .iter()
            .copied()
            .min_by_key(|tile| {
                enemies
                    .iter()
                    .map(|e| tile.manhattan(&e.position))
                    .min()
                    .unwrap_or(u32::MAX)
            })
            .unwrap_or(me.position);

        Decision::hold(destination)
    }
}
