//! Crabby Bird - A Flappy-Bird style reef swimmer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, run state)
//! - `tuning`: Data-driven game balance
//! - `leaderboard`: Accounts and the global score board
//! - `submission`: Client-side share-score flow
//! - `renderer`: Canvas2D painter (web only)
//! - `platform`: Browser/native platform abstraction

pub mod leaderboard;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod submission;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Play area dimensions
    pub const ARENA_WIDTH: f32 = 400.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Nominal crab size; the hit box is derived from it
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Fixed horizontal position the score check is measured against
    pub const PLAYER_X: f32 = 80.0;
    /// Hit box left edge and extent
    pub const PLAYER_BOX_LEFT: f32 = 60.0;
    pub const PLAYER_BOX_WIDTH: f32 = PLAYER_SIZE - 10.0;
    pub const PLAYER_BOX_HEIGHT: f32 = PLAYER_SIZE / 1.5;

    /// Per-tick acceleration (pixels/tick²), positive is down
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a jump (pixels/tick)
    pub const JUMP_VELOCITY: f32 = -9.0;

    /// Obstacle (coral) defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_GAP: f32 = 180.0;
    pub const OBSTACLE_SPEED: f32 = 3.0;
    /// Horizontal distance the newest obstacle travels before the next spawns
    pub const SPAWN_INTERVAL: f32 = 200.0;
    /// Gap centers stay at least this far from the top and bottom
    pub const GAP_MARGIN: f32 = 150.0;

    /// Out-of-bounds margins (distance from top / bottom edge)
    pub const CEILING_MARGIN: f32 = 20.0;
    pub const FLOOR_MARGIN: f32 = 20.0;

    /// Longest display name accepted by the share-score form
    pub const MAX_PLAYER_NAME_LEN: usize = 20;
}
