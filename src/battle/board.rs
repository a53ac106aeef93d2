//! The battlefield: obstacle grid, combatants, whose turn it is

use serde::{Deserialize, Serialize};

use crate::battle::ability::{Ability, TileOccupancy};
use crate::battle::combatant::Combatant;
use crate::battle::grid::Grid;
use crate::battle::pathfinding::simplify_path;
use crate::battle::templates::CombatantFactory;
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantId, Faction, TileCoord};

/// How a battle ended, from the player party's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    /// Both sides wiped out in the same sweep
    Draw,
}

/// One combatant to place when setting up a battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub name: String,
    pub template: String,
    pub faction: Faction,
    pub position: TileCoord,
}

/// Everything needed to build a board
#[derive(Debug, Clone)]
pub struct BattleSetup {
    pub grid: Grid,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Static obstacles; occupancy lives on the combatants
    pub grid: Grid,
    combatants: Vec<Combatant>,
    pub faction_turn: Faction,
    pub round: u32,
}

impl Board {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            combatants: Vec::new(),
            faction_turn: Faction::Player,
            round: 0,
        }
    }

    /// Build every placement through the factory
    pub fn from_setup(setup: &BattleSetup, factory: &dyn CombatantFactory) -> Result<Self> {
        let mut board = Self::new(setup.grid.clone());

        for placement in &setup.placements {
            let mut combatant = factory.build_combatant(&placement.template)?;
            combatant.name = placement.name.clone();
            combatant.faction = placement.faction;
            combatant.place_at(placement.position);
            board.add_combatant(combatant)?;
        }

        tracing::debug!(
            "Board {}x{} set up with {} combatants",
            board.grid.width(),
            board.grid.height(),
            board.combatants.len()
        );
        Ok(board)
    }

    /// Add a combatant on its current position
    ///
    /// The tile must be in bounds, passable and free.
    pub fn add_combatant(&mut self, combatant: Combatant) -> Result<CombatantId> {
        let tile = combatant.position;
        if !self.grid.is_passable(tile) {
            return Err(BattleError::InvalidPlacement(format!(
                "{} cannot stand on ({}, {})",
                combatant.name, tile.x, tile.y
            )));
        }
        if let Some(other) = self.combatant_at(tile) {
            return Err(BattleError::InvalidPlacement(format!(
                "{} would share ({}, {}) with {}",
                combatant.name, tile.x, tile.y, other.name
            )));
        }

        let id = combatant.id;
        self.combatants.push(combatant);
        Ok(id)
    }

    /// Combatants in board order
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub(crate) fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn combatant_at(&self, tile: TileCoord) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.position == tile)
    }

    pub(crate) fn combatant_at_mut(&mut self, tile: TileCoord) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.position == tile)
    }

    /// A combatant on `tile` that is still standing
    pub fn living_at(&self, tile: TileCoord) -> Option<&Combatant> {
        self.combatant_at(tile).filter(|c| c.is_alive())
    }

    pub fn is_occupied(&self, tile: TileCoord) -> bool {
        self.combatant_at(tile).is_some()
    }

    pub fn faction_members(&self, faction: Faction) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(move |c| c.faction == faction)
    }

    /// What stands on `tile`, relative to the caster
    pub fn occupancy(&self, caster: CombatantId, tile: TileCoord) -> TileOccupancy {
        let Some(occupant) = self.combatant_at(tile) else {
            return TileOccupancy::Vacant;
        };
        if occupant.id == caster {
            return TileOccupancy::Caster;
        }

        match self.combatant(caster) {
            Some(c) if c.faction == occupant.faction => TileOccupancy::Ally,
            _ => TileOccupancy::Enemy,
        }
    }

    /// Obstacle grid with every combatant's tile marked occupied
    pub fn accessible_grid(&self) -> Grid {
        let mut grid = self.grid.clone();
        for combatant in &self.combatants {
            grid.mark_occupied(combatant.position);
        }
        grid
    }

    /// Tiles the combatant can move to this turn
    pub fn movement_grid(&self, id: CombatantId) -> Result<Grid> {
        let combatant = self
            .combatant(id)
            .ok_or(BattleError::CombatantNotFound(id))?;
        Ok(combatant.compute_movement_range(&self.accessible_grid()))
    }

    pub fn target_grid(&self, id: CombatantId, ability: Ability) -> Result<Grid> {
        if self.combatant(id).is_none() {
            return Err(BattleError::CombatantNotFound(id));
        }
        Ok(ability.generate_target_grid(self, id))
    }

    /// Simplified walking path for a combatant, start tile included
    pub fn path_for(&self, id: CombatantId, to: TileCoord) -> Result<Vec<TileCoord>> {
        let combatant = self
            .combatant(id)
            .ok_or(BattleError::CombatantNotFound(id))?;
        let path = self.accessible_grid().find_path(combatant.position, to)?;
        Ok(simplify_path(path))
    }

    /// Start a round for everyone: both flags back on
    pub fn begin_round(&mut self) {
        for combatant in &mut self.combatants {
            combatant.begin_round();
        }
    }

    /// Remove every combatant at or below zero health, in board order
    pub fn remove_dead(&mut self) -> Vec<Combatant> {
        let (dead, living): (Vec<_>, Vec<_>) = std::mem::take(&mut self.combatants)
            .into_iter()
            .partition(|c| !c.is_alive());
        self.combatants = living;
        dead
    }

    /// Has either side run out of combatants?
    pub fn check_battle_end(&self) -> Option<BattleOutcome> {
        let players = self.faction_members(Faction::Player).count();
        let opponents = self.faction_members(Faction::Opponent).count();

        match (players, opponents) {
            (0, 0) => Some(BattleOutcome::Draw),
            (_, 0) => Some(BattleOutcome::Victory),
            (0, _) => Some(BattleOutcome::Defeat),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::combatant::StatBlock;

    fn unit(name: &str, faction: Faction, x: i32, y: i32) -> Combatant {
        Combatant::new(name, faction, 10, 5).at(TileCoord::new(x, y))
    }

    #[test]
    fn test_add_combatant_rejects_walls_and_overlap() {
        let mut board = Board::new(Grid::from_ascii("..#\n...\n").unwrap());
        board.add_combatant(unit("A", Faction::Player, 0, 0)).unwrap();

        let on_wall = board.add_combatant(unit("B", Faction::Player, 2, 0));
        assert!(matches!(on_wall, Err(BattleError::InvalidPlacement(_))));

        let overlap = board.add_combatant(unit("C", Faction::Opponent, 0, 0));
        assert!(matches!(overlap, Err(BattleError::InvalidPlacement(_))));

        let outside = board.add_combatant(unit("D", Faction::Opponent, 9, 9));
        assert!(outside.is_err());
        assert_eq!(board.combatants().len(), 1);
    }

    #[test]
    fn test_occupancy_relative_to_caster() {
        let mut board = Board::new(Grid::open(4, 4));
        let a = board.add_combatant(unit("A", Faction::Player, 0, 0)).unwrap();
        board.add_combatant(unit("B", Faction::Player, 1, 0)).unwrap();
        board.add_combatant(unit("C", Faction::Opponent, 2, 0)).unwrap();

        assert_eq!(board.occupancy(a, TileCoord::new(0, 0)), TileOccupancy::Caster);
        assert_eq!(board.occupancy(a, TileCoord::new(1, 0)), TileOccupancy::Ally);
        assert_eq!(board.occupancy(a, TileCoord::new(2, 0)), TileOccupancy::Enemy);
        assert_eq!(board.occupancy(a, TileCoord::new(3, 3)), TileOccupancy::Vacant);
    }

    #[test]
    fn test_accessible_grid_marks_everyone() {
        let mut board = Board::new(Grid::open(4, 4));
        board.add_combatant(unit("A", Faction::Player, 0, 0)).unwrap();
        board.add_combatant(unit("B", Faction::Opponent, 3, 3)).unwrap();

        let grid = board.accessible_grid();
        assert!(grid.is_occupied(TileCoord::new(0, 0)));
        assert!(grid.is_occupied(TileCoord::new(3, 3)));
        assert!(!grid.is_occupied(TileCoord::new(1, 1)));
        assert!(!board.grid.is_occupied(TileCoord::new(0, 0)));
    }

    #[test]
    fn test_movement_grid_stops_at_enemies() {
        let mut board = Board::new(Grid::open(7, 1));
        let mover = board
            .add_combatant(
                unit("Mover", Faction::Player, 0, 0).with_stats(StatBlock {
                    speed: 64,
                    ..StatBlock::default()
                }),
            )
            .unwrap();
        board.add_combatant(unit("Wall", Faction::Opponent, 2, 0)).unwrap();

        let grid = board.movement_grid(mover).unwrap();
        assert!(grid.is_passable(TileCoord::new(1, 0)));
        // The occupied tile is listed but nothing beyond it
        assert!(grid.is_passable(TileCoord::new(2, 0)));
        assert!(!grid.is_passable(TileCoord::new(3, 0)));
    }

    #[test]
    fn test_path_for_is_simplified() {
        let mut board = Board::new(Grid::open(5, 5));
        let id = board.add_combatant(unit("A", Faction::Player, 0, 0)).unwrap();
        let path = board.path_for(id, TileCoord::new(3, 0)).unwrap();
        assert_eq!(path, vec![TileCoord::new(0, 0), TileCoord::new(3, 0)]);
    }

    #[test]
    fn test_unknown_combatant_queries() {
        let board = Board::new(Grid::open(2, 2));
        let ghost = CombatantId::new();
        assert!(matches!(
            board.movement_grid(ghost),
            Err(BattleError::CombatantNotFound(_))
        ));
        assert!(board.target_grid(ghost, Ability::Attack).is_err());
    }

    #[test]
    fn test_remove_dead_keeps_order() {
        let mut board = Board::new(Grid::open(4, 1));
        board.add_combatant(unit("A", Faction::Player, 0, 0)).unwrap();
        let b = board.add_combatant(unit("B", Faction::Player, 1, 0)).unwrap();
        board.add_combatant(unit("C", Faction::Opponent, 2, 0)).unwrap();
        board.combatant_mut(b).unwrap().current_health = 0;

        let dead = board.remove_dead();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].name, "B");
        let names: Vec<&str> = board.combatants().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_battle_end_detection() {
        let mut board = Board::new(Grid::open(3, 1));
        let a = board.add_combatant(unit("A", Faction::Player, 0, 0)).unwrap();
        let c = board.add_combatant(unit("C", Faction::Opponent, 2, 0)).unwrap();
        assert_eq!(board.check_battle_end(), None);

        board.combatant_mut(c).unwrap().current_health = -3;
        board.remove_dead();
        assert_eq!(board.check_battle_end(), Some(BattleOutcome::Victory));

        board.combatant_mut(a).unwrap().current_health = 0;
        board.remove_dead();
        assert_eq!(board.check_battle_end(), Some(BattleOutcome::Draw));
    }
}
