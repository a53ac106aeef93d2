//! A* pathfinding for battle grids
//!
//! Four-connected, unit step cost. Occupied tiles other than the start are
//! treated as walls.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::battle::grid::Grid;
use crate::core::error::{BattleError, Result};
use crate::core::types::TileCoord;

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: TileCoord,
    f_cost: u32, // g_cost + heuristic
    seq: u64,    // insertion order, breaks ties first-in-first-out
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn can_enter(grid: &Grid, coord: TileCoord) -> bool {
    grid.is_passable(coord) && !grid.is_occupied(coord)
}

/// Find the shortest path from `start` to `goal`, both included
///
/// Neighbours are expanded up, right, down, left, so equal-length routes
/// always resolve the same way.
pub fn find_path(grid: &Grid, start: TileCoord, goal: TileCoord) -> Result<Vec<TileCoord>> {
    if start == goal {
        return Ok(vec![start]);
    }

    let no_path = || BattleError::NoPathFound {
        from: start,
        to: goal,
    };

    if !grid.in_bounds(start) || !can_enter(grid, goal) {
        return Err(no_path());
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<TileCoord, TileCoord> = HashMap::new();
    let mut g_scores: HashMap<TileCoord, u32> = HashMap::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.manhattan(&goal),
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Ok(reconstruct_path(&came_from, current.coord));
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(u32::MAX);

        for neighbor in current.coord.neighbors() {
            if !can_enter(grid, neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.manhattan(&goal),
                    seq,
                });
            }
        }
    }

    Err(no_path())
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &HashMap<TileCoord, TileCoord>,
    mut current: TileCoord,
) -> Vec<TileCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Drop intermediate points that do not change direction
///
/// Straight runs collapse to their endpoints. The first and last points are
/// never removed.
pub fn simplify_path(mut path: Vec<TileCoord>) -> Vec<TileCoord> {
    if path.len() < 3 {
        return path;
    }

    let mut i = path.len() - 2;
    while i > 0 {
        let before = path[i - 1];
        let after = path[i + 1];
        if before.x == after.x || before.y == after.y {
            path.remove(i);
        }
        i -= 1;
    }

    path
}

/// Number of unit steps walked along a (possibly simplified) path
pub fn path_steps(path: &[TileCoord]) -> u32 {
    path.windows(2).map(|w| w[0].manhattan(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pathfind_straight_line() {
        let grid = Grid::open(10, 10);
        let start = TileCoord::new(0, 0);
        let goal = TileCoord::new(5, 0);

        let path = find_path(&grid, start, goal).unwrap();

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let grid = Grid::from_ascii(
            "
            ..#...
            ..#...
            ......
            ",
        )
        .unwrap();
        let start = TileCoord::new(0, 0);
        let goal = TileCoord::new(4, 0);

        let path = find_path(&grid, start, goal).unwrap();

        assert!(!path.contains(&TileCoord::new(2, 0)));
        assert!(!path.contains(&TileCoord::new(2, 1)));
        assert_eq!(path_steps(&path), 8);
    }

    #[test]
    fn test_pathfind_no_path() {
        let grid = Grid::from_ascii(
            "
            ..#..
            ..#..
            ..#..
            ",
        )
        .unwrap();

        let result = find_path(&grid, TileCoord::new(0, 0), TileCoord::new(4, 2));
        assert!(matches!(result, Err(BattleError::NoPathFound { .. })));
    }

    #[test]
    fn test_pathfind_to_blocked_goal() {
        let grid = Grid::from_ascii("..#\n...\n").unwrap();
        let result = find_path(&grid, TileCoord::new(0, 0), TileCoord::new(2, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_pathfind_out_of_bounds_goal() {
        let grid = Grid::open(3, 3);
        let result = find_path(&grid, TileCoord::new(0, 0), TileCoord::new(5, 5));
        assert!(result.is_err());
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let grid = Grid::open(10, 10);
        let start = TileCoord::new(5, 5);

        let path = find_path(&grid, start, start).unwrap();
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn test_pathfind_avoids_occupied() {
        let mut grid = Grid::open(3, 3);
        grid.mark_occupied(TileCoord::new(1, 0));

        let path = find_path(&grid, TileCoord::new(0, 0), TileCoord::new(2, 0)).unwrap();
        assert!(!path.contains(&TileCoord::new(1, 0)));
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_pathfind_from_occupied_start() {
        let mut grid = Grid::open(3, 1);
        grid.mark_occupied(TileCoord::new(0, 0));

        let path = find_path(&grid, TileCoord::new(0, 0), TileCoord::new(2, 0)).unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_pathfind_is_deterministic() {
        let grid = Grid::open(6, 6);
        let a = find_path(&grid, TileCoord::new(0, 0), TileCoord::new(4, 3)).unwrap();
        let b = find_path(&grid, TileCoord::new(0, 0), TileCoord::new(4, 3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_simplify_collapses_straight_runs() {
        let path = vec![
            TileCoord::new(0, 0),
            TileCoord::new(1, 0),
            TileCoord::new(2, 0),
            TileCoord::new(2, 1),
            TileCoord::new(2, 2),
        ];

        let simplified = simplify_path(path);
        assert_eq!(
            simplified,
            vec![TileCoord::new(0, 0), TileCoord::new(2, 0), TileCoord::new(2, 2)]
        );
    }

    #[test]
    fn test_simplify_keeps_staircase() {
        let path = vec![
            TileCoord::new(0, 0),
            TileCoord::new(0, 1),
            TileCoord::new(1, 1),
            TileCoord::new(1, 2),
        ];
        let simplified = simplify_path(path.clone());
        assert_eq!(simplified, path);
    }

    #[test]
    fn test_simplify_preserves_steps() {
        let grid = Grid::from_ascii(
            "
            ....#...
            .##.#.#.
            .#....#.
            ",
        )
        .unwrap();
        let path = find_path(&grid, TileCoord::new(0, 0), TileCoord::new(7, 0)).unwrap();
        let steps = path_steps(&path);
        let simplified = simplify_path(path.clone());

        assert_eq!(path_steps(&simplified), steps);
        assert_eq!(simplified.first(), path.first());
        assert_eq!(simplified.last(), path.last());
    }

    #[test]
    fn test_simplify_short_paths_untouched() {
        let two = vec![TileCoord::new(0, 0), TileCoord::new(1, 0)];
        assert_eq!(simplify_path(two.clone()), two);
        assert!(simplify_path(Vec::new()).is_empty());
    }
}
