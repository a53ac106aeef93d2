//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub Uuid);

impl CombatantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side controls a combatant
///
/// Faction 0 is the player party, faction 1 the AI-controlled opponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Faction {
    #[default]
    Player = 0,
    Opponent = 1,
}

impl Faction {
    pub fn other(self) -> Self {
        match self {
            Faction::Player => Faction::Opponent,
            Faction::Opponent => Faction::Player,
        }
    }
}

/// Integer tile coordinate on a battle grid
///
/// Signed so that neighbours of edge tiles can be expressed and then
/// rejected by bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Four-connected step distance, ignoring obstacles
    pub fn manhattan(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Neighbours in fixed visitation order: up, right, down, left
    pub fn neighbors(&self) -> [TileCoord; 4] {
        [
            TileCoord::new(self.x, self.y - 1),
            TileCoord::new(self.x + 1, self.y),
            TileCoord::new(self.x, self.y + 1),
            TileCoord::new(self.x - 1, self.y),
        ]
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// 2D position in tile units, used for interpolated movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combatant_id_uniqueness() {
        let a = CombatantId::new();
        let b = CombatantId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_faction_other() {
        assert_eq!(Faction::Player.other(), Faction::Opponent);
        assert_eq!(Faction::Opponent.other(), Faction::Player);
    }

    #[test]
    fn test_neighbor_order_is_up_right_down_left() {
        let n = TileCoord::new(2, 2).neighbors();
        assert_eq!(n[0], TileCoord::new(2, 1));
        assert_eq!(n[1], TileCoord::new(3, 2));
        assert_eq!(n[2], TileCoord::new(2, 3));
        assert_eq!(n[3], TileCoord::new(1, 2));
    }

    #[test]
    fn test_manhattan() {
        let a = TileCoord::new(0, 0);
        let b = TileCoord::new(3, -4);
        assert_eq!(a.manhattan(&b), 7);
        assert_eq!(b.manhattan(&a), 7);
    }
}
