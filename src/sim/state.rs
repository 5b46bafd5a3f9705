//! Game state and core simulation types
//!
//! Everything the step function reads or writes lives in [`GameState`],
//! owned by the game-loop controller and passed in by `&mut`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Waiting for the first jump
    Idle,
    /// Simulation active
    Playing,
    /// Run ended, waiting for an explicit reset
    GameOver,
}

/// The crab. Only moves vertically; its x is fixed by [`Tuning::player_x`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Vertical center (screen space, grows downward)
    pub y: f32,
    /// Vertical velocity (pixels/tick, negative is up)
    pub vel: f32,
}

impl Player {
    /// A player resting on the midline
    pub fn at_midline(tuning: &Tuning) -> Self {
        Self {
            y: tuning.midline(),
            vel: 0.0,
        }
    }
}

/// A coral column with a passable gap
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Vertical center of the gap
    pub gap_center: f32,
    /// Set the first time the player clears the trailing edge
    pub passed: bool,
}

impl Obstacle {
    /// Right (trailing) edge
    #[inline]
    pub fn right(&self, tuning: &Tuning) -> f32 {
        self.x + tuning.obstacle_width
    }

    /// Top of the gap
    #[inline]
    pub fn gap_top(&self, tuning: &Tuning) -> f32 {
        self.gap_center - tuning.obstacle_gap / 2.0
    }

    /// Bottom of the gap
    #[inline]
    pub fn gap_bottom(&self, tuning: &Tuning) -> f32 {
        self.gap_center + tuning.obstacle_gap / 2.0
    }
}

/// Draw a gap center uniformly from `[gap_min, gap_max]`
pub fn random_gap_center<R: Rng>(rng: &mut R, tuning: &Tuning) -> f32 {
    let (lo, hi) = (tuning.gap_min(), tuning.gap_max());
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gap RNG
    rng: Pcg32,
    /// Balance constants
    pub tuning: Tuning,
    /// Current phase
    pub phase: RunPhase,
    pub player: Player,
    /// Oldest first; newest has the largest x
    pub obstacles: Vec<Obstacle>,
    /// Obstacles passed this run
    pub score: u32,
    /// Best score this session
    pub high_score: u32,
    /// Simulation tick counter (this run)
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create an idle game with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::at_midline(&tuning),
            tuning,
            phase: RunPhase::Idle,
            obstacles: Vec::new(),
            score: 0,
            high_score: 0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put the player back on the midline and clear the course.
    /// Keeps the session high score and the RNG stream.
    pub fn reset_run(&mut self) {
        self.player = Player::at_midline(&self.tuning);
        self.obstacles.clear();
        self.score = 0;
        self.time_ticks = 0;
    }

    /// Append an obstacle at the right edge with a random gap
    pub fn spawn_obstacle(&mut self) {
        let gap_center = random_gap_center(&mut self.rng, &self.tuning);
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            x: self.tuning.arena_width,
            gap_center,
            passed: false,
        });
    }

    /// Fold the current score into the session best
    pub fn record_high_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }
}
