//! Per-frame simulation tick
//!
//! One call to [`tick`] per display frame. Physics uses a fixed per-tick
//! step with no delta-time scaling, so game speed follows the frame rate.

use super::collision::{CollisionKind, check_collision};
use super::state::{GameState, RunPhase};

/// Input commands for a single tick. One-shot flags are cleared by the
/// caller after the tick that consumed them.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (click/tap/space/up)
    pub jump: bool,
    /// Explicit "play again" from the game-over screen
    pub reset: bool,
    /// Demo mode - the autopilot swims
    pub autopilot: bool,
}

/// What happened during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Obstacles passed this tick
    pub passed: u32,
    /// Set if the run ended this tick
    pub collision: Option<CollisionKind>,
}

impl StepOutcome {
    #[inline]
    pub fn collided(&self) -> bool {
        self.collision.is_some()
    }
}

/// Apply a jump according to the run phase.
///
/// - Idle: start a fresh run with an initial impulse
/// - Playing: set velocity to the jump velocity (not additive)
/// - GameOver: ignored
pub fn handle_jump(state: &mut GameState) {
    match state.phase {
        RunPhase::Idle => {
            state.reset_run();
            state.phase = RunPhase::Playing;
            state.player.vel = state.tuning.jump_velocity;
            log::info!("Run started (seed {})", state.seed);
        }
        RunPhase::Playing => {
            state.player.vel = state.tuning.jump_velocity;
        }
        RunPhase::GameOver => {}
    }
}

/// "Play again": GameOver -> Idle with a clean course. No-op in other phases.
pub fn play_again(state: &mut GameState) {
    if state.phase == RunPhase::GameOver {
        state.reset_run();
        state.phase = RunPhase::Idle;
    }
}

/// Advance the game by one frame: consume input, then step if playing
pub fn tick(state: &mut GameState, input: &TickInput) -> StepOutcome {
    if input.reset {
        play_again(state);
    }

    let wants_jump = input.jump || (input.autopilot && autopilot_wants_jump(state));
    if wants_jump {
        handle_jump(state);
    }

    if state.phase != RunPhase::Playing {
        return StepOutcome::default();
    }

    step(state)
}

/// One simulation step. Caller guarantees `phase == Playing`.
pub fn step(state: &mut GameState) -> StepOutcome {
    state.time_ticks += 1;

    // Semi-implicit Euler
    state.player.vel += state.tuning.gravity;
    state.player.y += state.player.vel;

    // Spawn when the newest obstacle has scrolled past the threshold
    let threshold = state.tuning.spawn_threshold();
    let should_spawn = state.obstacles.last().is_none_or(|o| o.x < threshold);
    if should_spawn {
        state.spawn_obstacle();
    }

    // Scroll, then retire anything fully off the left edge
    let speed = state.tuning.obstacle_speed;
    for obstacle in &mut state.obstacles {
        obstacle.x -= speed;
    }
    let width = state.tuning.obstacle_width;
    state.obstacles.retain(|o| o.x + width > 0.0);

    // Score runs before the collision check on the same post-update state,
    // so a single tick can both count a pass and end the run.
    let passed = score_passed_obstacles(state);

    let collision = check_collision(state);
    if let Some(kind) = collision {
        state.phase = RunPhase::GameOver;
        state.record_high_score();
        log::info!(
            "Run over: {:?} at tick {} - score {} (best {})",
            kind,
            state.time_ticks,
            state.score,
            state.high_score
        );
    }

    StepOutcome { passed, collision }
}

/// Latch `passed` on every obstacle whose trailing edge is behind the player
/// and add one point for each newly latched obstacle. Returns the points added.
pub fn score_passed_obstacles(state: &mut GameState) -> u32 {
    let player_x = state.tuning.player_x;
    let width = state.tuning.obstacle_width;
    let mut passed = 0;
    for obstacle in state.obstacles.iter_mut().filter(|o| !o.passed) {
        if obstacle.x + width < player_x {
            obstacle.passed = true;
            passed += 1;
        }
    }
    state.score += passed;
    passed
}

/// Simple demo controller: start runs from Idle and flap whenever the crab
/// is falling below the gap it is heading for.
pub fn autopilot_wants_jump(state: &GameState) -> bool {
    let tuning = &state.tuning;
    match state.phase {
        RunPhase::Idle => true,
        RunPhase::GameOver => false,
        RunPhase::Playing => {
            let target = state
                .obstacles
                .iter()
                .find(|o| o.right(tuning) >= tuning.player_box_left)
                .map(|o| o.gap_center + tuning.obstacle_gap / 4.0)
                .unwrap_or_else(|| tuning.midline());
            state.player.y > target && state.player.vel >= 0.0
        }
    }
}
