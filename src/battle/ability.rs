//! The closed set of abilities and their hit/targeting rules
//!
//! Abilities carry no state. Everything about a particular cast (who, where)
//! travels in the [`Command`], so the same value can be evaluated for
//! hypothetical casts without touching the board.

use serde::{Deserialize, Serialize};

use crate::battle::board::Board;
use crate::battle::combatant::Stat;
use crate::battle::command::Command;
use crate::battle::constants::OPEN_WEIGHT;
use crate::battle::grid::Grid;
use crate::battle::hit::Hit;
use crate::battle::items::ItemType;
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantId, TileCoord};

/// Whether an ability is cast or always on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationMode {
    Active,
    Passive,
}

/// Who an ability may be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    SelfOnly,
    Ally,
    Enemy,
    Tile,
}

/// What stands on a tile, seen from the caster's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileOccupancy {
    Vacant,
    Caster,
    Ally,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    /// Walk to a tile; produces no hits
    Move,
    /// Basic melee strike
    Attack,
    /// Single aimed gunshot
    Headshot,
    /// Three arrows in quick succession
    Volley,
    /// Heal an ally or yourself
    Mend,
    /// Passive concentration; never cast
    Focus,
}

// Timing of the hits each ability produces (ms)
const ATTACK_DELAY_MS: i32 = 300;
const HEADSHOT_DELAY_MS: i32 = 500;
const VOLLEY_FIRST_DELAY_MS: i32 = 200;
const VOLLEY_STAGGER_MS: i32 = 200;
const MEND_DELAY_MS: i32 = 400;

const HEADSHOT_DAMAGE: i32 = 10;
const VOLLEY_ARROWS: i32 = 3;
const VOLLEY_ARROW_DAMAGE: i32 = 4;
const MEND_AMOUNT: i32 = 12;

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Move,
        Ability::Attack,
        Ability::Headshot,
        Ability::Volley,
        Ability::Mend,
        Ability::Focus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Ability::Move => "Move",
            Ability::Attack => "Attack",
            Ability::Headshot => "Headshot",
            Ability::Volley => "Volley",
            Ability::Mend => "Mend",
            Ability::Focus => "Focus",
        }
    }

    /// Resolve a display or template name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BattleError::UnknownAbility(name.to_string()))
    }

    pub fn activation(self) -> ActivationMode {
        match self {
            Ability::Focus => ActivationMode::Passive,
            _ => ActivationMode::Active,
        }
    }

    pub fn target_mode(self) -> TargetMode {
        match self {
            Ability::Move => TargetMode::Tile,
            Ability::Attack | Ability::Headshot | Ability::Volley => TargetMode::Enemy,
            Ability::Mend => TargetMode::Ally,
            Ability::Focus => TargetMode::SelfOnly,
        }
    }

    /// Item type the caster must have equipped; empty means no requirement
    pub fn item_type(self) -> ItemType {
        match self {
            Ability::Headshot => ItemType::GUN,
            Ability::Volley => ItemType::BOW,
            Ability::Mend => ItemType::STAFF,
            Ability::Move | Ability::Attack | Ability::Focus => ItemType::empty(),
        }
    }

    pub fn mana_cost(self) -> i32 {
        match self {
            Ability::Headshot => 5,
            Ability::Volley => 6,
            Ability::Mend => 4,
            Ability::Move | Ability::Attack | Ability::Focus => 0,
        }
    }

    /// Manhattan distance band (inclusive) the ability can be aimed within
    ///
    /// Move has no fixed band; its grid comes from the movement range.
    pub fn reach(self) -> (u32, u32) {
        match self {
            Ability::Move => (0, 0),
            Ability::Attack => (1, 1),
            Ability::Headshot => (2, 6),
            Ability::Volley => (2, 5),
            Ability::Mend => (0, 2),
            Ability::Focus => (0, 0),
        }
    }

    /// Tiles the caster may aim at from where it stands
    ///
    /// Move returns the caster's movement range. Other abilities cover their
    /// reach band around the caster, limited to passable tiles; occupants
    /// are not considered. An unknown caster gets an empty grid.
    pub fn generate_target_grid(self, board: &Board, caster: CombatantId) -> Grid {
        let Some(combatant) = board.combatant(caster) else {
            return Grid::new(board.grid.width(), board.grid.height());
        };

        if self == Ability::Move {
            return combatant.compute_movement_range(&board.accessible_grid());
        }

        self.target_grid_from(&board.grid, combatant.position)
    }

    /// Target grid for a caster standing on `origin`
    ///
    /// Lets decision code ask "what could I hit from over there?".
    pub fn target_grid_from(self, obstacles: &Grid, origin: TileCoord) -> Grid {
        let mut grid = Grid::new(obstacles.width(), obstacles.height());
        let (min, max) = self.reach();
        let max = max as i32;

        for dy in -max..=max {
            for dx in -max..=max {
                let tile = TileCoord::new(origin.x + dx, origin.y + dy);
                let distance = origin.manhattan(&tile);
                if distance < min || distance > max as u32 {
                    continue;
                }
                if obstacles.is_passable(tile) {
                    grid.set_weight(tile, OPEN_WEIGHT);
                }
            }
        }

        grid
    }

    /// May the ability land on a tile with this occupant?
    pub fn can_target(self, occupancy: TileOccupancy) -> bool {
        match self.target_mode() {
            TargetMode::SelfOnly => occupancy == TileOccupancy::Caster,
            TargetMode::Ally => matches!(occupancy, TileOccupancy::Ally | TileOccupancy::Caster),
            TargetMode::Enemy => occupancy == TileOccupancy::Enemy,
            TargetMode::Tile => occupancy == TileOccupancy::Vacant,
        }
    }

    /// Hits this cast would produce, without applying anything
    ///
    /// Hits are returned in application order.
    pub fn generate_hits(self, board: &Board, command: &Command) -> Vec<Hit> {
        let target = command.target;

        match self {
            Ability::Move | Ability::Focus => Vec::new(),
            Ability::Attack => {
                let Some(attacker) = board.combatant(command.actor) else {
                    return Vec::new();
                };
                let damage = attacker.modified_stat(Stat::Attack).max(1);
                vec![Hit::damage(target, damage, ATTACK_DELAY_MS)]
            }
            Ability::Headshot => {
                vec![Hit::damage(target, HEADSHOT_DAMAGE, HEADSHOT_DELAY_MS).critical()]
            }
            Ability::Volley => (0..VOLLEY_ARROWS)
                .map(|i| {
                    Hit::damage(
                        target,
                        VOLLEY_ARROW_DAMAGE,
                        VOLLEY_FIRST_DELAY_MS + i * VOLLEY_STAGGER_MS,
                    )
                })
                .collect(),
            Ability::Mend => vec![Hit::heal(target, MEND_AMOUNT, MEND_DELAY_MS)],
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::combatant::{Combatant, StatBlock};
    use crate::core::types::Faction;

    fn duel() -> (Board, CombatantId, CombatantId) {
        let mut board = Board::new(Grid::open(8, 8));
        let shooter = Combatant::new("Shooter", Faction::Player, 20, 10)
            .with_stats(StatBlock {
                attack: 7,
                speed: 4,
                ..StatBlock::default()
            })
            .at(TileCoord::new(1, 1));
        let target = Combatant::new("Target", Faction::Opponent, 10, 0).at(TileCoord::new(4, 1));
        let shooter_id = board.add_combatant(shooter).unwrap();
        let target_id = board.add_combatant(target).unwrap();
        (board, shooter_id, target_id)
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Ability::from_name("headshot").unwrap(), Ability::Headshot);
        assert_eq!(Ability::from_name(" Volley ").unwrap(), Ability::Volley);
        assert!(matches!(
            Ability::from_name("Fireball"),
            Err(BattleError::UnknownAbility(_))
        ));
    }

    #[test]
    fn test_headshot_definition() {
        assert_eq!(Ability::Headshot.activation(), ActivationMode::Active);
        assert_eq!(Ability::Headshot.target_mode(), TargetMode::Enemy);
        assert_eq!(Ability::Headshot.item_type(), ItemType::GUN);
        assert_eq!(Ability::Headshot.mana_cost(), 5);
    }

    #[test]
    fn test_headshot_hits() {
        let (board, shooter, _) = duel();
        let command = Command::new(shooter, Ability::Headshot, TileCoord::new(4, 1));
        let hits = Ability::Headshot.generate_hits(&board, &command);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].damage, 10);
        assert_eq!(hits[0].delay_ms, 500);
        assert!(hits[0].critical);
        assert_eq!(hits[0].target, TileCoord::new(4, 1));
    }

    #[test]
    fn test_volley_hits_are_staggered() {
        let (board, shooter, _) = duel();
        let command = Command::new(shooter, Ability::Volley, TileCoord::new(4, 1));
        let delays: Vec<i32> = Ability::Volley
            .generate_hits(&board, &command)
            .iter()
            .map(|h| h.delay_ms)
            .collect();
        assert_eq!(delays, vec![200, 400, 600]);
    }

    #[test]
    fn test_attack_uses_attack_stat() {
        let (board, shooter, _) = duel();
        let command = Command::new(shooter, Ability::Attack, TileCoord::new(2, 1));
        let hits = Ability::Attack.generate_hits(&board, &command);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].damage, 7);
    }

    #[test]
    fn test_attack_has_minimum_damage() {
        let mut board = Board::new(Grid::open(3, 3));
        let weak = board
            .add_combatant(Combatant::new("Weak", Faction::Player, 5, 0))
            .unwrap();
        let command = Command::new(weak, Ability::Attack, TileCoord::new(1, 0));
        assert_eq!(Ability::Attack.generate_hits(&board, &command)[0].damage, 1);
    }

    #[test]
    fn test_generate_hits_is_pure() {
        let (board, shooter, target) = duel();
        let command = Command::new(shooter, Ability::Headshot, TileCoord::new(4, 1));
        let _ = Ability::Headshot.generate_hits(&board, &command);
        assert_eq!(board.combatant(target).map(|c| c.current_health), Some(10));
        assert_eq!(board.combatant(shooter).map(|c| c.current_mana), Some(10));
    }

    #[test]
    fn test_mend_heals() {
        let (board, shooter, _) = duel();
        let command = Command::new(shooter, Ability::Mend, TileCoord::new(1, 1));
        let hits = Ability::Mend.generate_hits(&board, &command);
        assert!(hits[0].is_heal());
        assert_eq!(hits[0].magnitude(), 12);
    }

    #[test]
    fn test_move_and_focus_produce_no_hits() {
        let (board, shooter, _) = duel();
        let command = Command::new(shooter, Ability::Move, TileCoord::new(1, 2));
        assert!(Ability::Move.generate_hits(&board, &command).is_empty());
        assert!(Ability::Focus.generate_hits(&board, &command).is_empty());
    }

    #[test]
    fn test_attack_target_grid_is_adjacent_ring() {
        let (board, shooter, _) = duel();
        let grid = Ability::Attack.generate_target_grid(&board, shooter);
        let tiles = grid.selected_tiles();
        assert_eq!(tiles.len(), 4);
        assert!(!grid.is_passable(TileCoord::new(1, 1)));
        assert!(grid.is_passable(TileCoord::new(2, 1)));
    }

    #[test]
    fn test_headshot_target_grid_skips_adjacent() {
        let (board, shooter, _) = duel();
        let grid = Ability::Headshot.generate_target_grid(&board, shooter);
        assert!(!grid.is_passable(TileCoord::new(2, 1)));
        assert!(grid.is_passable(TileCoord::new(4, 1)));
        assert!(grid.is_passable(TileCoord::new(7, 1)));
    }

    #[test]
    fn test_target_grid_excludes_walls() {
        let grid = Grid::from_ascii(
            "
            ...
            .#.
            ...
            ",
        )
        .unwrap();
        let target = Ability::Mend.target_grid_from(&grid, TileCoord::new(1, 0));
        assert!(target.is_passable(TileCoord::new(1, 0)));
        assert!(!target.is_passable(TileCoord::new(1, 1)));
        assert!(target.is_passable(TileCoord::new(1, 2)));
    }

    #[test]
    fn test_move_target_grid_is_movement_range() {
        let (board, shooter, _) = duel();
        let grid = Ability::Move.generate_target_grid(&board, shooter);
        // Speed 4 gives four steps
        assert!(grid.is_passable(TileCoord::new(1, 5)));
        assert!(!grid.is_passable(TileCoord::new(1, 6)));
    }

    #[test]
    fn test_can_target_by_mode() {
        assert!(Ability::Headshot.can_target(TileOccupancy::Enemy));
        assert!(!Ability::Headshot.can_target(TileOccupancy::Ally));
        assert!(!Ability::Headshot.can_target(TileOccupancy::Vacant));

        assert!(Ability::Mend.can_target(TileOccupancy::Ally));
        assert!(Ability::Mend.can_target(TileOccupancy::Caster));
        assert!(!Ability::Mend.can_target(TileOccupancy::Enemy));

        assert!(Ability::Move.can_target(TileOccupancy::Vacant));
        assert!(!Ability::Move.can_target(TileOccupancy::Caster));

        assert!(Ability::Focus.can_target(TileOccupancy::Caster));
    }
}
