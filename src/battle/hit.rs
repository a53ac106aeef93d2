//! A single unit of effect applied to one tile

use serde::{Deserialize, Serialize};

use crate::core::types::TileCoord;

/// Damage (positive) or healing (zero or negative) landing on a tile
///
/// `delay_ms` counts down while hits are displayed; the hit applies once it
/// reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub target: TileCoord,
    pub damage: i32,
    pub critical: bool,
    pub delay_ms: i32,
}

impl Hit {
    pub fn damage(target: TileCoord, amount: i32, delay_ms: i32) -> Self {
        Self {
            target,
            damage: amount,
            critical: false,
            delay_ms,
        }
    }

    pub fn heal(target: TileCoord, amount: i32, delay_ms: i32) -> Self {
        Self {
            target,
            damage: -amount.abs(),
            critical: false,
            delay_ms,
        }
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    pub fn is_heal(&self) -> bool {
        self.damage <= 0
    }

    /// Absolute amount shown to the player
    pub fn magnitude(&self) -> i32 {
        self.damage.abs()
    }
}
