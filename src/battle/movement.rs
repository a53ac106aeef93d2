//! Combatant movement along simplified paths
//!
//! A moving combatant walks toward its next waypoint at `speed / divisor`
//! tiles per second, one axis component per direction, and snaps onto the
//! waypoint tile once it is close enough.

use std::collections::VecDeque;

use crate::battle::combatant::{Combatant, Stat};
use crate::battle::constants::MOVEMENT_DEAD_ZONE;
use crate::core::config::BattleConfig;
use crate::core::types::{CombatantId, TileCoord};

/// Remaining waypoints of a move in progress
#[derive(Debug, Clone)]
pub struct PathFollow {
    pub actor: CombatantId,
    waypoints: VecDeque<TileCoord>,
}

impl PathFollow {
    /// `path` is the full simplified path; its first point is the start tile
    pub fn new(actor: CombatantId, path: Vec<TileCoord>) -> Self {
        Self {
            actor,
            waypoints: path.into_iter().skip(1).collect(),
        }
    }

    pub fn current(&self) -> Option<TileCoord> {
        self.waypoints.front().copied()
    }

    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_finished(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Result of a movement tick
#[derive(Debug, Clone, Default)]
pub struct MovementResult {
    pub moved: bool,
    /// Waypoint snapped onto this tick, if any
    pub reached_waypoint: Option<TileCoord>,
    /// No waypoints left
    pub finished: bool,
}

/// Unit direction along one axis; proportional inside the dead zone
fn axis_velocity(delta: f32) -> f32 {
    if delta > MOVEMENT_DEAD_ZONE {
        1.0
    } else if delta < -MOVEMENT_DEAD_ZONE {
        -1.0
    } else {
        delta
    }
}

/// Step one axis toward `goal` without overshooting it
fn step_axis(current: f32, goal: f32, distance: f32) -> f32 {
    let delta = goal - current;
    let step = axis_velocity(delta) * distance;
    if step.abs() >= delta.abs() {
        goal
    } else {
        current + step
    }
}

/// Advance a combatant's interpolated location by one tick
pub fn advance_along_path(
    combatant: &mut Combatant,
    follow: &mut PathFollow,
    dt: f32,
    config: &BattleConfig,
) -> MovementResult {
    let mut result = MovementResult::default();

    let Some(waypoint) = follow.current() else {
        result.finished = true;
        return result;
    };

    // A combatant with no Speed still crawls so the move always completes
    let speed = combatant.modified_stat(Stat::Speed).max(1) as f32;
    let distance = dt * speed / config.speed_divisor;

    let goal = waypoint.to_vec2();
    let before = combatant.location;
    combatant.location.x = step_axis(before.x, goal.x, distance);
    combatant.location.y = step_axis(before.y, goal.y, distance);
    result.moved = combatant.location != before;

    let close_x = (goal.x - combatant.location.x).abs() < config.waypoint_epsilon;
    let close_y = (goal.y - combatant.location.y).abs() < config.waypoint_epsilon;
    if close_x && close_y {
        combatant.place_at(waypoint);
        follow.waypoints.pop_front();
        result.reached_waypoint = Some(waypoint);
    }

    result.finished = follow.is_finished();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::combatant::StatBlock;
    use crate::core::types::Faction;

    fn walker(speed: i32) -> Combatant {
        Combatant::new("Walker", Faction::Player, 10, 0)
            .with_stats(StatBlock {
                speed,
                ..StatBlock::default()
            })
            .at(TileCoord::new(0, 0))
    }

    fn run_to_end(combatant: &mut Combatant, follow: &mut PathFollow, dt: f32) -> usize {
        let config = BattleConfig::default();
        for tick in 1..=10_000 {
            if advance_along_path(combatant, follow, dt, &config).finished {
                return tick;
            }
        }
        panic!("movement never finished");
    }

    #[test]
    fn test_path_follow_skips_start() {
        let follow = PathFollow::new(
            CombatantId::new(),
            vec![TileCoord::new(0, 0), TileCoord::new(3, 0), TileCoord::new(3, 2)],
        );
        assert_eq!(follow.current(), Some(TileCoord::new(3, 0)));
        assert_eq!(follow.remaining(), 2);
    }

    #[test]
    fn test_moves_at_speed_over_divisor() {
        let mut c = walker(50);
        let mut follow = PathFollow::new(c.id, vec![TileCoord::new(0, 0), TileCoord::new(4, 0)]);

        // 50 / 50 = one tile per second
        let result = advance_along_path(&mut c, &mut follow, 0.5, &BattleConfig::default());
        assert!(result.moved);
        assert!(result.reached_waypoint.is_none());
        assert!((c.location.x - 0.5).abs() < 1e-5);
        assert_eq!(c.location.y, 0.0);
        assert_eq!(c.position, TileCoord::new(0, 0));
    }

    #[test]
    fn test_does_not_overshoot_waypoint() {
        let mut c = walker(500);
        let mut follow = PathFollow::new(c.id, vec![TileCoord::new(0, 0), TileCoord::new(1, 0)]);

        let result = advance_along_path(&mut c, &mut follow, 1.0, &BattleConfig::default());
        assert_eq!(result.reached_waypoint, Some(TileCoord::new(1, 0)));
        assert!(result.finished);
        assert_eq!(c.position, TileCoord::new(1, 0));
        assert_eq!(c.location, TileCoord::new(1, 0).to_vec2());
    }

    #[test]
    fn test_walks_every_waypoint_in_order() {
        let mut c = walker(50);
        let mut follow = PathFollow::new(
            c.id,
            vec![TileCoord::new(0, 0), TileCoord::new(2, 0), TileCoord::new(2, 3)],
        );
        let config = BattleConfig::default();

        let mut reached = Vec::new();
        for _ in 0..1_000 {
            let result = advance_along_path(&mut c, &mut follow, 0.1, &config);
            reached.extend(result.reached_waypoint);
            if result.finished {
                break;
            }
        }

        assert_eq!(reached, vec![TileCoord::new(2, 0), TileCoord::new(2, 3)]);
        assert_eq!(c.position, TileCoord::new(2, 3));
    }

    #[test]
    fn test_zero_speed_still_arrives() {
        let mut c = walker(0);
        let mut follow = PathFollow::new(c.id, vec![TileCoord::new(0, 0), TileCoord::new(1, 0)]);
        run_to_end(&mut c, &mut follow, 1.0);
        assert_eq!(c.position, TileCoord::new(1, 0));
    }

    #[test]
    fn test_empty_follow_is_finished() {
        let mut c = walker(10);
        let mut follow = PathFollow::new(c.id, vec![TileCoord::new(0, 0)]);
        let result = advance_along_path(&mut c, &mut follow, 0.1, &BattleConfig::default());
        assert!(result.finished);
        assert!(!result.moved);
    }

    #[test]
    fn test_axis_velocity_dead_zone() {
        assert_eq!(axis_velocity(3.0), 1.0);
        assert_eq!(axis_velocity(-0.5), -1.0);
        assert!((axis_velocity(0.08) - 0.08).abs() < f32::EPSILON);
    }
}
