//! Hit-testing for the crab against the arena bounds and coral columns
//!
//! The crab is an axis-aligned box centered vertically on `Player::y`.
//! Obstacles are a full-height column with a single passable gap, so the
//! test reduces to: overlapping horizontally and not fully inside the gap.

use glam::Vec2;

use super::state::{GameState, Obstacle};
use crate::tuning::Tuning;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Ceiling,
    Floor,
    /// Hit the coral of the obstacle with this ID
    Obstacle(u32),
}

/// Axis-aligned bounding box (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strict overlap with the horizontal span `[left, right]`
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }

    /// True if the vertical extent lies fully within `[top, bottom]`
    #[inline]
    pub fn within_y(&self, top: f32, bottom: f32) -> bool {
        self.min.y >= top && self.max.y <= bottom
    }
}

/// The crab's hit box for a given vertical position
pub fn player_box(y: f32, tuning: &Tuning) -> Aabb {
    let half_h = tuning.player_box_height / 2.0;
    Aabb::new(
        Vec2::new(tuning.player_box_left, y - half_h),
        Vec2::new(tuning.player_box_left + tuning.player_box_width, y + half_h),
    )
}

/// Ceiling/floor check on the player's center
pub fn bounds_collision(y: f32, tuning: &Tuning) -> Option<CollisionKind> {
    if y <= tuning.ceiling_y() {
        Some(CollisionKind::Ceiling)
    } else if y >= tuning.floor_y() {
        Some(CollisionKind::Floor)
    } else {
        None
    }
}

/// True if the box touches the coral of this obstacle
pub fn obstacle_collision(player: &Aabb, obstacle: &Obstacle, tuning: &Tuning) -> bool {
    if !player.overlaps_x(obstacle.x, obstacle.right(tuning)) {
        return false;
    }
    !player.within_y(obstacle.gap_top(tuning), obstacle.gap_bottom(tuning))
}

/// Full collision test against the current (post-update) state
pub fn check_collision(state: &GameState) -> Option<CollisionKind> {
    let tuning = &state.tuning;
    if let Some(kind) = bounds_collision(state.player.y, tuning) {
        return Some(kind);
    }

    let hitbox = player_box(state.player.y, tuning);
    state
        .obstacles
        .iter()
        .find(|o| obstacle_collision(&hitbox, o, tuning))
        .map(|o| CollisionKind::Obstacle(o.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(x: f32, gap_center: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            gap_center,
            passed: false,
        }
    }

    #[test]
    fn test_player_box_centered_on_y() {
        let tuning = Tuning::default();
        let hitbox = player_box(300.0, &tuning);
        assert_eq!(hitbox.min.x, 60.0);
        assert_eq!(hitbox.max.x, 90.0);
        let center = (hitbox.min.y + hitbox.max.y) / 2.0;
        assert!((center - 300.0).abs() < 1e-4);
        assert!((hitbox.max.y - hitbox.min.y - tuning.player_box_height).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let tuning = Tuning::default();
        assert_eq!(bounds_collision(tuning.ceiling_y(), &tuning), Some(CollisionKind::Ceiling));
        assert_eq!(bounds_collision(-50.0, &tuning), Some(CollisionKind::Ceiling));
        assert_eq!(bounds_collision(tuning.floor_y(), &tuning), Some(CollisionKind::Floor));
        assert_eq!(bounds_collision(700.0, &tuning), Some(CollisionKind::Floor));
        assert_eq!(bounds_collision(tuning.midline(), &tuning), None);
    }

    #[test]
    fn test_no_hit_without_horizontal_overlap() {
        let tuning = Tuning::default();
        let hitbox = player_box(100.0, &tuning);
        // Gap is far away vertically but the column is to the right
        assert!(!obstacle_collision(&hitbox, &obstacle(200.0, 450.0), &tuning));
        // Touching edges don't count as overlap
        assert!(!obstacle_collision(&hitbox, &obstacle(90.0, 450.0), &tuning));
        assert!(!obstacle_collision(&hitbox, &obstacle(0.0, 450.0), &tuning));
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let tuning = Tuning::default();
        let hitbox = player_box(300.0, &tuning);
        assert!(!obstacle_collision(&hitbox, &obstacle(50.0, 300.0), &tuning));
    }

    #[test]
    fn test_clipping_gap_edge_hits() {
        let tuning = Tuning::default();
        // Gap 210..390; box half height ~13.3
        let near_top = player_box(215.0, &tuning);
        let near_bottom = player_box(385.0, &tuning);
        assert!(obstacle_collision(&near_top, &obstacle(50.0, 300.0), &tuning));
        assert!(obstacle_collision(&near_bottom, &obstacle(50.0, 300.0), &tuning));
    }

    #[test]
    fn test_check_collision_reports_obstacle_id() {
        let mut state = GameState::new(3);
        state.obstacles.push(Obstacle {
            id: 77,
            x: 70.0,
            gap_center: 450.0,
            passed: false,
        });
        assert_eq!(check_collision(&state), Some(CollisionKind::Obstacle(77)));

        state.obstacles[0].gap_center = state.player.y;
        assert_eq!(check_collision(&state), None);
    }
}
