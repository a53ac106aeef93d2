//! Battle pacing configuration
//!
//! Timing values govern how the state machine paces itself against the
//! external update tick. Rule constants that define the game itself live in
//! `battle::constants`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::constants::{
    AIM_GUARD_SECS, HIT_PAUSE_SECS, MOVEMENT_SPEED_DIVISOR, QUEUE_GRACE_SECS, WAYPOINT_EPSILON,
};
use crate::core::error::{BattleError, Result};

/// Pacing knobs for a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Grace period after queueing a combat command (seconds)
    ///
    /// Keeps one input event from submitting twice.
    pub queue_grace_secs: f32,

    /// Pause after a hit batch finishes before the next command runs (seconds)
    pub hit_pause_secs: f32,

    /// Minimum time a target grid must be shown before a target is accepted
    /// (seconds)
    pub aim_guard_secs: f32,

    /// Distance on both axes at which a moving combatant snaps to its
    /// waypoint (tiles)
    pub waypoint_epsilon: f32,

    /// Movement velocity is `speed / speed_divisor` tiles per second
    pub speed_divisor: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            queue_grace_secs: QUEUE_GRACE_SECS,
            hit_pause_secs: HIT_PAUSE_SECS,
            aim_guard_secs: AIM_GUARD_SECS,
            waypoint_epsilon: WAYPOINT_EPSILON,
            speed_divisor: MOVEMENT_SPEED_DIVISOR,
        }
    }
}

impl BattleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.speed_divisor <= 0.0 {
            return Err(BattleError::InvalidConfig(format!(
                "speed_divisor ({}) must be positive",
                self.speed_divisor
            )));
        }

        if self.waypoint_epsilon <= 0.0 {
            return Err(BattleError::InvalidConfig(format!(
                "waypoint_epsilon ({}) must be positive",
                self.waypoint_epsilon
            )));
        }

        if self.queue_grace_secs < 0.0 || self.hit_pause_secs < 0.0 || self.aim_guard_secs < 0.0 {
            return Err(BattleError::InvalidConfig(
                "timers must not be negative".into(),
            ));
        }

        Ok(())
    }
}
