//! Weighted tile grid with occupancy overlay
//!
//! Weight 0 marks a tile impassable (or unselectable for highlight grids);
//! any positive weight is passable. Positive values above 1 are reserved
//! for terrain cost and currently behave like 1.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::constants::{BLOCKED_WEIGHT, OPEN_WEIGHT, PASSABLE_LUMA};
use crate::battle::pathfinding;
use crate::core::error::{BattleError, Result};
use crate::core::types::TileCoord;

/// Anything that can describe a rectangular obstacle layout
pub trait ObstacleSource {
    fn dimensions(&self) -> (u32, u32);

    fn is_passable(&self, x: u32, y: u32) -> bool;
}

/// Text bitmap: `#` is blocked, `.` is open, one row per line
#[derive(Debug, Clone)]
pub struct AsciiBitmap {
    rows: Vec<Vec<bool>>,
}

impl AsciiBitmap {
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();

        for (y, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let row = line
                .chars()
                .enumerate()
                .map(|(x, c)| match c {
                    '.' => Ok(true),
                    '#' => Ok(false),
                    other => Err(BattleError::MalformedSource(format!(
                        "unexpected glyph {:?} at ({}, {})",
                        other, x, y
                    ))),
                })
                .collect::<Result<Vec<bool>>>()?;
            rows.push(row);
        }

        if let Some(first) = rows.first() {
            let width = first.len();
            if let Some(y) = rows.iter().position(|r| r.len() != width) {
                return Err(BattleError::MalformedSource(format!(
                    "row {} has {} columns, expected {}",
                    y,
                    rows[y].len(),
                    width
                )));
            }
        }

        Ok(Self { rows })
    }
}

impl ObstacleSource for AsciiBitmap {
    fn dimensions(&self) -> (u32, u32) {
        let width = self.rows.first().map(|r| r.len()).unwrap_or(0);
        (width as u32, self.rows.len() as u32)
    }

    fn is_passable(&self, x: u32, y: u32) -> bool {
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(false)
    }
}

impl ObstacleSource for image::GrayImage {
    fn dimensions(&self) -> (u32, u32) {
        image::GrayImage::dimensions(self)
    }

    fn is_passable(&self, x: u32, y: u32) -> bool {
        self.get_pixel(x, y).0[0] >= PASSABLE_LUMA
    }
}

/// Rectangular weight map plus the set of tiles that hold a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridSnapshot")]
pub struct Grid {
    width: u32,
    height: u32,
    weights: Vec<u8>,
    occupied: Vec<bool>,
}

/// Serialized form of a [`Grid`], checked before it becomes one
#[derive(Deserialize)]
struct GridSnapshot {
    width: u32,
    height: u32,
    weights: Vec<u8>,
    occupied: Vec<bool>,
}

impl TryFrom<GridSnapshot> for Grid {
    type Error = BattleError;

    fn try_from(snapshot: GridSnapshot) -> Result<Self> {
        let len = (snapshot.width as usize) * (snapshot.height as usize);
        if snapshot.weights.len() != len || snapshot.occupied.len() != len {
            return Err(BattleError::MalformedSource(format!(
                "{}x{} grid with {} weights and {} occupancy flags",
                snapshot.width,
                snapshot.height,
                snapshot.weights.len(),
                snapshot.occupied.len()
            )));
        }

        Ok(Self {
            width: snapshot.width,
            height: snapshot.height,
            weights: snapshot.weights,
            occupied: snapshot.occupied,
        })
    }
}

impl Grid {
    /// Create a grid with every tile at weight 0
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, BLOCKED_WEIGHT)
    }

    /// Create a grid with every tile passable
    pub fn open(width: u32, height: u32) -> Self {
        Self::filled(width, height, OPEN_WEIGHT)
    }

    fn filled(width: u32, height: u32, weight: u8) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            weights: vec![weight; len],
            occupied: vec![false; len],
        }
    }

    /// Build an obstacle grid from a bitmap-like source
    pub fn load_obstacles<S: ObstacleSource + ?Sized>(source: &S) -> Result<Self> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(BattleError::MalformedSource(format!(
                "degenerate dimensions {}x{}",
                width, height
            )));
        }

        let mut grid = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if source.is_passable(x, y) {
                    grid.set_weight(TileCoord::new(x as i32, y as i32), OPEN_WEIGHT);
                }
            }
        }

        Ok(grid)
    }

    pub fn from_ascii(text: &str) -> Result<Self> {
        Self::load_obstacles(&AsciiBitmap::parse(text)?)
    }

    /// Load a greyscale-interpreted image; bright pixels are passable
    pub fn from_image_path(path: &Path) -> Result<Self> {
        let image = image::open(path)?.to_luma8();
        Self::load_obstacles(&image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinate is within grid bounds
    pub fn in_bounds(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < self.width as i32
            && coord.y < self.height as i32
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| coord.y as usize * self.width as usize + coord.x as usize)
    }

    /// Weight at a tile; out-of-bounds tiles read as blocked
    pub fn weight(&self, coord: TileCoord) -> u8 {
        self.index(coord)
            .map(|i| self.weights[i])
            .unwrap_or(BLOCKED_WEIGHT)
    }

    pub fn set_weight(&mut self, coord: TileCoord, weight: u8) {
        if let Some(i) = self.index(coord) {
            self.weights[i] = weight;
        }
    }

    pub fn is_passable(&self, coord: TileCoord) -> bool {
        self.weight(coord) > BLOCKED_WEIGHT
    }

    pub fn is_occupied(&self, coord: TileCoord) -> bool {
        self.index(coord).map(|i| self.occupied[i]).unwrap_or(false)
    }

    pub fn mark_occupied(&mut self, coord: TileCoord) {
        if let Some(i) = self.index(coord) {
            self.occupied[i] = true;
        }
    }

    pub fn clear_occupied(&mut self) {
        self.occupied.iter_mut().for_each(|o| *o = false);
    }

    /// All tiles with a positive weight, row by row
    pub fn selected_tiles(&self) -> Vec<TileCoord> {
        (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| TileCoord::new(x, y)))
            .filter(|c| self.is_passable(*c))
            .collect()
    }

    /// Breadth-first flood fill from `origin`, at most `max_distance` steps
    ///
    /// The returned grid has weight 1 on every reachable tile (origin
    /// included) and copies this grid's occupancy. Occupied tiles are
    /// reachable but are not expanded further; the origin always expands.
    pub fn compute_reachable(&self, origin: TileCoord, max_distance: u32) -> Grid {
        let mut reachable = Grid::new(self.width, self.height);
        reachable.occupied = self.occupied.clone();

        if !self.in_bounds(origin) {
            return reachable;
        }

        reachable.set_weight(origin, OPEN_WEIGHT);
        let mut frontier = vec![origin];

        for _ in 0..max_distance {
            let mut next = Vec::new();

            for tile in &frontier {
                if *tile != origin && self.is_occupied(*tile) {
                    continue;
                }

                for neighbor in tile.neighbors() {
                    if !self.is_passable(neighbor) || reachable.is_passable(neighbor) {
                        continue;
                    }
                    reachable.set_weight(neighbor, OPEN_WEIGHT);
                    next.push(neighbor);
                }
            }

            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        reachable
    }

    /// Shortest four-connected path, see [`pathfinding::find_path`]
    pub fn find_path(&self, from: TileCoord, to: TileCoord) -> Result<Vec<TileCoord>> {
        pathfinding::find_path(self, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 8);
        assert!(!grid.is_passable(TileCoord::new(0, 0)));

        let open = Grid::open(10, 8);
        assert!(open.is_passable(TileCoord::new(9, 7)));
    }

    #[test]
    fn test_out_of_bounds_reads_blocked() {
        let grid = Grid::open(4, 4);
        assert_eq!(grid.weight(TileCoord::new(-1, 0)), 0);
        assert_eq!(grid.weight(TileCoord::new(4, 0)), 0);
        assert!(!grid.is_occupied(TileCoord::new(0, 9)));
    }

    #[test]
    fn test_load_ascii_obstacles() {
        let grid = Grid::from_ascii(
            "
            ..#
            .##
            ...
            ",
        )
        .unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert!(grid.is_passable(TileCoord::new(0, 0)));
        assert!(!grid.is_passable(TileCoord::new(2, 0)));
        assert!(!grid.is_passable(TileCoord::new(1, 1)));
        assert!(grid.is_passable(TileCoord::new(2, 2)));
    }

    #[test]
    fn test_degenerate_source_is_malformed() {
        let result = Grid::from_ascii("");
        assert!(matches!(result, Err(BattleError::MalformedSource(_))));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let result = Grid::from_ascii("...\n..\n");
        assert!(matches!(result, Err(BattleError::MalformedSource(_))));
    }

    #[test]
    fn test_unknown_glyph_is_malformed() {
        let result = Grid::from_ascii("..x\n...\n");
        assert!(matches!(result, Err(BattleError::MalformedSource(_))));
    }

    #[test]
    fn test_load_from_gray_image() {
        let mut image = image::GrayImage::from_pixel(4, 3, image::Luma([255u8]));
        image.put_pixel(1, 1, image::Luma([0u8]));

        let grid = Grid::load_obstacles(&image).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert!(!grid.is_passable(TileCoord::new(1, 1)));
        assert!(grid.is_passable(TileCoord::new(0, 0)));
    }

    #[test]
    fn test_zero_sized_image_is_malformed() {
        let image = image::GrayImage::new(0, 5);
        assert!(Grid::load_obstacles(&image).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Grid::open(5, 5);
        let mut copy = original.clone();
        copy.set_weight(TileCoord::new(2, 2), 0);
        copy.mark_occupied(TileCoord::new(1, 1));

        assert!(original.is_passable(TileCoord::new(2, 2)));
        assert!(!original.is_occupied(TileCoord::new(1, 1)));
        assert_ne!(original, copy);
        assert_eq!(original, Grid::open(5, 5));
    }

    #[test]
    fn test_reachable_open_diamond() {
        let grid = Grid::open(10, 10);
        let origin = TileCoord::new(5, 5);
        let reachable = grid.compute_reachable(origin, 2);

        for tile in reachable.selected_tiles() {
            assert!(tile.manhattan(&origin) <= 2);
        }
        // Diamond of radius 2 has 13 tiles
        assert_eq!(reachable.selected_tiles().len(), 13);
        assert!(reachable.is_passable(origin));
    }

    #[test]
    fn test_reachable_clipped_at_edge() {
        let grid = Grid::open(10, 10);
        let reachable = grid.compute_reachable(TileCoord::new(0, 0), 1);
        let tiles = reachable.selected_tiles();
        assert_eq!(tiles.len(), 3);
    }

    #[test]
    fn test_reachable_respects_walls() {
        let grid = Grid::from_ascii(
            "
            .#...
            .#...
            .....
            ",
        )
        .unwrap();
        let reachable = grid.compute_reachable(TileCoord::new(0, 0), 3);

        // Going around the wall: (1, 2) is 3 steps away, (2, 2) is 4
        assert!(reachable.is_passable(TileCoord::new(1, 2)));
        assert!(!reachable.is_passable(TileCoord::new(2, 2)));
        assert!(!reachable.is_passable(TileCoord::new(2, 1)));
        assert!(!reachable.is_passable(TileCoord::new(1, 0)));
    }

    #[test]
    fn test_occupied_tile_reachable_but_not_expanded() {
        let mut grid = Grid::from_ascii(
            "
            .....
            ####.
            ",
        )
        .unwrap();
        grid.mark_occupied(TileCoord::new(1, 0));

        let reachable = grid.compute_reachable(TileCoord::new(0, 0), 4);
        assert!(reachable.is_passable(TileCoord::new(1, 0)));
        assert!(!reachable.is_passable(TileCoord::new(2, 0)));
    }

    #[test]
    fn test_occupied_origin_still_expands() {
        let mut grid = Grid::open(3, 3);
        grid.mark_occupied(TileCoord::new(1, 1));
        let reachable = grid.compute_reachable(TileCoord::new(1, 1), 1);
        assert_eq!(reachable.selected_tiles().len(), 5);
    }

    #[test]
    fn test_reachable_zero_distance_is_origin_only() {
        let grid = Grid::open(4, 4);
        let reachable = grid.compute_reachable(TileCoord::new(2, 2), 0);
        assert_eq!(reachable.selected_tiles(), vec![TileCoord::new(2, 2)]);
    }

    #[test]
    fn test_snapshot_with_short_weights_is_rejected() {
        let json = r#"{"width":3,"height":2,"weights":[1,1,1],"occupied":[false,false,false,false,false,false]}"#;
        let result: std::result::Result<Grid, _> = serde_json::from_str(json);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("3x2 grid"));
    }

    #[test]
    fn test_snapshot_round_trips() {
        let mut grid = Grid::open(3, 2);
        grid.set_weight(TileCoord::new(1, 1), BLOCKED_WEIGHT);
        grid.mark_occupied(TileCoord::new(2, 0));

        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, grid);
        assert!(!restored.is_passable(TileCoord::new(1, 1)));
    }
}
