//! Battle rule constants - all tunable values in one place

// Movement range: BASE_MOVE_DISTANCE + floor(log_MOVE_LOG_BASE(speed))
pub const BASE_MOVE_DISTANCE: u32 = 3;
pub const MOVE_LOG_BASE: u32 = 4;

// Experience an ability must exceed before it counts as known
pub const KNOWN_ABILITY_THRESHOLD: i32 = 100;

// Pacing defaults (seconds unless noted)
pub const QUEUE_GRACE_SECS: f32 = 0.05;
pub const HIT_PAUSE_SECS: f32 = 1.0;
pub const AIM_GUARD_SECS: f32 = 0.25;
pub const WAYPOINT_EPSILON: f32 = 0.05; // tiles
pub const MOVEMENT_SPEED_DIVISOR: f32 = 50.0;
// Inside this distance (tiles) a walker slows down proportionally
pub const MOVEMENT_DEAD_ZONE: f32 = 0.1;

// Grid weights
pub const BLOCKED_WEIGHT: u8 = 0;
pub const OPEN_WEIGHT: u8 = 1;

// Greyscale bitmaps: luma at or above this is passable
pub const PASSABLE_LUMA: u8 = 128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_ordering() {
        assert!(QUEUE_GRACE_SECS < AIM_GUARD_SECS);
        assert!(AIM_GUARD_SECS < HIT_PAUSE_SECS);
    }

    #[test]
    fn test_blocked_weight_is_zero() {
        assert_eq!(BLOCKED_WEIGHT, 0);
        assert!(OPEN_WEIGHT > BLOCKED_WEIGHT);
    }
}
