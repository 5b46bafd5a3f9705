//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame step only
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionKind, check_collision, player_box};
pub use state::{GameState, Obstacle, Player, RunPhase, random_gap_center};
pub use tick::{
    StepOutcome, TickInput, autopilot_wants_jump, handle_jump, play_again, score_passed_obstacles,
    step, tick,
};
