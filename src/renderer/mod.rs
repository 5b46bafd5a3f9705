//! Canvas2D rendering
//!
//! Paints the current [`GameState`] once per frame. Purely a view: nothing
//! here feeds back into the simulation.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::{GameState, RunPhase};

const WATER: &str = "#0D2137";
const SAND: &str = "#3A4A5C";
const CORAL: &str = "#FF6B8A";
const CRAB: &str = "#FF6B4A";
const EYE: &str = "#FFFFFF";
const TEXT: &str = "#FFFFFF";

/// Holds the 2D context for the game canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Grab the 2D context; None if the browser refuses one
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    /// Paint one frame
    pub fn render(&self, state: &GameState, time: f64) {
        let ctx = &self.ctx;
        let tuning = &state.tuning;

        ctx.set_fill_style_str(WATER);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);
        ctx.set_fill_style_str(SAND);
        ctx.fill_rect(
            0.0,
            tuning.floor_y() as f64,
            self.width,
            tuning.floor_margin as f64,
        );

        // Coral columns above and below each gap
        ctx.set_fill_style_str(CORAL);
        let w = tuning.obstacle_width as f64;
        for obstacle in &state.obstacles {
            let x = obstacle.x as f64;
            let top = obstacle.gap_top(tuning) as f64;
            let bottom = obstacle.gap_bottom(tuning) as f64;
            ctx.fill_rect(x, 0.0, w, top);
            ctx.fill_rect(x, bottom, w, self.height - bottom);
        }

        self.draw_crab(state, time);

        if state.phase == RunPhase::Playing {
            ctx.set_fill_style_str(TEXT);
            ctx.set_font("bold 48px sans-serif");
            ctx.set_text_align("center");
            let _ = ctx.fill_text(&state.score.to_string(), self.width / 2.0, 70.0);
        }
    }

    fn draw_crab(&self, state: &GameState, time: f64) {
        let ctx = &self.ctx;
        let tuning = &state.tuning;
        let x = tuning.player_x as f64;
        // Idle bob is cosmetic only; the hit box never moves with it
        let bob = if state.phase == RunPhase::Idle {
            (time / 150.0).sin() * 3.0
        } else {
            0.0
        };
        let y = state.player.y as f64 + bob;
        let rx = tuning.player_box_width as f64 / 2.0 + 5.0;
        let ry = tuning.player_box_height as f64 / 2.0;

        ctx.set_fill_style_str(CRAB);
        ctx.begin_path();
        let _ = ctx.ellipse(x, y, rx, ry, 0.0, 0.0, TAU);
        ctx.fill();

        ctx.set_fill_style_str(EYE);
        ctx.begin_path();
        let _ = ctx.arc(x - 8.0, y - ry, 5.0, 0.0, TAU);
        ctx.fill();
        ctx.begin_path();
        let _ = ctx.arc(x + 8.0, y - ry, 5.0, 0.0, TAU);
        ctx.fill();
    }
}
