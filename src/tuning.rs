//! Data-driven game balance
//!
//! Every simulation constant lives in [`Tuning`] so a run can be replayed or
//! rebalanced from JSON without touching the step function. Defaults match
//! the values in [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,

    pub player_x: f32,
    pub player_box_left: f32,
    pub player_box_width: f32,
    pub player_box_height: f32,

    pub gravity: f32,
    pub jump_velocity: f32,

    pub obstacle_width: f32,
    pub obstacle_gap: f32,
    pub obstacle_speed: f32,
    pub spawn_interval: f32,
    pub gap_margin: f32,

    pub ceiling_margin: f32,
    pub floor_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_x: PLAYER_X,
            player_box_left: PLAYER_BOX_LEFT,
            player_box_width: PLAYER_BOX_WIDTH,
            player_box_height: PLAYER_BOX_HEIGHT,

            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            gap_margin: GAP_MARGIN,

            ceiling_margin: CEILING_MARGIN,
            floor_margin: FLOOR_MARGIN,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the step function can't work with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(TuningError::Invalid("arena must have positive size".into()));
        }
        if self.obstacle_speed <= 0.0 {
            return Err(TuningError::Invalid("obstacle_speed must be positive".into()));
        }
        if self.obstacle_width <= 0.0 || self.obstacle_gap <= 0.0 {
            return Err(TuningError::Invalid("obstacle size must be positive".into()));
        }
        if self.spawn_interval <= 0.0 || self.spawn_interval > self.arena_width {
            return Err(TuningError::Invalid(format!(
                "spawn_interval {} outside (0, {}]",
                self.spawn_interval, self.arena_width
            )));
        }
        if self.gap_margin < 0.0 {
            return Err(TuningError::Invalid("gap_margin must not be negative".into()));
        }
        // Half a gap must fit between the outermost gap center and the arena edge
        if self.gap_margin < self.obstacle_gap / 2.0 {
            return Err(TuningError::Invalid(format!(
                "gap_margin {} is smaller than half the obstacle_gap {}",
                self.gap_margin, self.obstacle_gap
            )));
        }
        if self.gap_min() > self.gap_max() {
            return Err(TuningError::Invalid(format!(
                "gap_margin {} leaves no room in arena height {}",
                self.gap_margin, self.arena_height
            )));
        }
        if self.ceiling_y() >= self.floor_y() {
            return Err(TuningError::Invalid("ceiling and floor margins overlap".into()));
        }
        Ok(())
    }

    /// Vertical midline (player spawn height)
    #[inline]
    pub fn midline(&self) -> f32 {
        self.arena_height / 2.0
    }

    /// Lowest allowed gap center
    #[inline]
    pub fn gap_min(&self) -> f32 {
        self.gap_margin
    }

    /// Highest allowed gap center
    #[inline]
    pub fn gap_max(&self) -> f32 {
        self.arena_height - self.gap_margin
    }

    /// At or above this y the player hits the ceiling
    #[inline]
    pub fn ceiling_y(&self) -> f32 {
        self.ceiling_margin
    }

    /// At or below this y the player hits the floor
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.arena_height - self.floor_margin
    }

    /// x the newest obstacle must scroll past before another spawns
    #[inline]
    pub fn spawn_threshold(&self) -> f32 {
        self.arena_width - self.spawn_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.midline(), 300.0);
        assert_eq!(tuning.gap_min(), 150.0);
        assert_eq!(tuning.gap_max(), 450.0);
        assert_eq!(tuning.floor_y(), 580.0);
        assert_eq!(tuning.spawn_threshold(), 200.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.25, "obstacle_speed": 4.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.25);
        assert_eq!(tuning.obstacle_speed, 4.0);
        assert_eq!(tuning.jump_velocity, JUMP_VELOCITY);
        assert_eq!(tuning.arena_height, ARENA_HEIGHT);
    }

    #[test]
    fn test_rejects_empty_gap_range() {
        let result = Tuning::from_json(r#"{ "gap_margin": 400.0 }"#);
        assert!(matches!(result, Err(TuningError::Invalid(_))));
    }

    #[test]
    fn test_rejects_gap_larger_than_margin() {
        let result = Tuning::from_json(r#"{ "obstacle_gap": 400.0 }"#);
        assert!(matches!(result, Err(TuningError::Invalid(_))));

        let result = Tuning::from_json(r#"{ "gap_margin": -100.0 }"#);
        assert!(matches!(result, Err(TuningError::Invalid(_))));

        // Exactly half a gap of headroom is allowed
        let tuning = Tuning::from_json(r#"{ "obstacle_gap": 300.0 }"#).unwrap();
        assert_eq!(tuning.gap_min() - tuning.obstacle_gap / 2.0, 0.0);
        assert_eq!(tuning.gap_max() + tuning.obstacle_gap / 2.0, tuning.arena_height);
    }

    #[test]
    fn test_rejects_bad_json() {
        let result = Tuning::from_json("{ gravity: ");
        assert!(matches!(result, Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let result = Tuning::from_json(r#"{ "obstacle_speed": 0.0 }"#);
        assert!(matches!(result, Err(TuningError::Invalid(_))));
    }
}
