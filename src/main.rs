//! Crabby Bird entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use crabby_bird::Settings;
    use crabby_bird::settings::is_jump_key;
    use crabby_bird::leaderboard::{
        AuthFlow, Credentials, LEADERBOARD_SCREEN_LIMIT, LocalScoreService, ScoreRecord,
        ScoreService, format_date, rank_label,
    };
    use crabby_bird::renderer::CanvasRenderer;
    use crabby_bird::sim::{GameState, RunPhase, TickInput, tick};
    use crabby_bird::submission::{SubmitStatus, Submission};

    type Service = Rc<RefCell<LocalScoreService>>;

    /// Game instance holding all frame-loop state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        input: TickInput,
        settings: Settings,
        /// Share-score form for the last finished run
        submission: Option<Submission>,
        last_phase: RunPhase,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed),
                renderer: None,
                input: TickInput::default(),
                settings,
                submission: None,
                last_phase: RunPhase::Idle,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run exactly one simulation step for this frame
        fn update(&mut self, time: f64) {
            let input = self.input.clone();
            tick(&mut self.state, &input);

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.reset = false;

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                match current_phase {
                    RunPhase::GameOver => {
                        self.submission = Some(Submission::for_run(self.state.score));
                    }
                    RunPhase::Idle | RunPhase::Playing => self.submission = None,
                }
                self.last_phase = current_phase;
            }
        }

        fn render(&self, time: f64) {
            if let Some(ref renderer) = self.renderer {
                renderer.render(&self.state, time);
            }
        }

        /// Update overlays and HUD elements in the DOM
        fn update_hud(&self, document: &Document) {
            set_visible(document, "idle-overlay", self.state.phase == RunPhase::Idle);
            set_visible(document, "gameover-overlay", self.state.phase == RunPhase::GameOver);

            if self.state.high_score > 0 {
                set_text(document, "high-score", &format!("Best: {}", self.state.high_score));
            }
            set_visible(document, "hud-fps", self.settings.show_fps);
            set_text(document, "hud-fps", &format!("{} fps", self.fps));

            if self.state.phase != RunPhase::GameOver {
                return;
            }
            set_text(document, "final-score", &self.state.score.to_string());

            let Some(submission) = &self.submission else {
                return;
            };
            set_visible(document, "submit-section", submission.can_offer());
            let (label, status) = match submission.status() {
                SubmitStatus::Ready => ("Share Score", String::new()),
                SubmitStatus::InFlight => ("Sharing...", String::new()),
                SubmitStatus::Submitted(_) => ("Share Score", "Score shared!".to_string()),
                SubmitStatus::Failed(e) => ("Share Score", format!("Could not share: {e}")),
            };
            set_text(document, "submit-btn", label);
            set_text(document, "submit-status", &status);
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn input_value(document: &Document, id: &str) -> String {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn current_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Attach a click handler to the element with this ID
    fn on_click(document: &Document, id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing #{id}, handler not attached");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Crabby Bird starting...");

        let Some(document) = current_document() else {
            log::error!("No document, cannot start");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element, cannot start");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Settings::load())));
        let service: Service = Rc::new(RefCell::new(LocalScoreService::load()));

        canvas.set_width(game.borrow().state.tuning.arena_width as u32);
        canvas.set_height(game.borrow().state.tuning.arena_height as u32);
        game.borrow_mut().renderer = CanvasRenderer::new(&canvas);
        if game.borrow().renderer.is_none() {
            log::error!("Canvas 2D context unavailable");
        }

        if let Some(el) = document.get_element_by_id("name-input") {
            if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                input.set_value(&game.borrow().settings.player_name);
            }
        }

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_gameover_buttons(&document, game.clone(), service.clone());
        setup_leaderboard(&document, service.clone());
        setup_auth(&document, service.clone());
        show_auth_state(&document, &service.borrow());

        request_animation_frame(game);

        log::info!("Crabby Bird running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click on the play surface
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.jump = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                // Don't steal keys from the name/email inputs
                let typing = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if typing {
                    return;
                }
                if is_jump_key(&event.code()) {
                    event.prevent_default();
                    if !event.repeat() {
                        game.borrow_mut().input.jump = true;
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            if let Some(document) = current_document() {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_gameover_buttons(document: &Document, game: Rc<RefCell<Game>>, service: Service) {
        {
            let game = game.clone();
            on_click(document, "play-again-btn", move |_| {
                game.borrow_mut().input.reset = true;
            });
        }

        on_click(document, "submit-btn", move |_| {
            let Some(document) = current_document() else {
                return;
            };
            let name = input_value(&document, "name-input");

            let pending = {
                let mut g = game.borrow_mut();
                let Some(submission) = g.submission.as_mut() else {
                    return;
                };
                match submission.begin(&name) {
                    Ok(pending) => pending,
                    Err(e) => {
                        log::info!("Submission blocked: {e}");
                        set_text(&document, "submit-status", &e.to_string());
                        return;
                    }
                }
            };

            {
                let mut g = game.borrow_mut();
                g.settings.remember_player_name(&pending.player_name);
                g.settings.save();
            }

            // Off the frame loop; the game keeps rendering GameOver meanwhile
            let game = game.clone();
            let service = service.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = service
                    .borrow_mut()
                    .submit(pending.score, &pending.player_name);
                if let Some(submission) = game.borrow_mut().submission.as_mut() {
                    submission.finish(result);
                }
            });
        });
    }

    fn setup_leaderboard(document: &Document, service: Service) {
        {
            let service = service.clone();
            on_click(document, "leaderboard-btn", move |_| {
                let Some(document) = current_document() else {
                    return;
                };
                set_visible(&document, "leaderboard", true);
                set_visible(&document, "leaderboard-loading", true);
                let service = service.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let (top, best) = {
                        let service = service.borrow();
                        (
                            service.top_scores(LEADERBOARD_SCREEN_LIMIT),
                            service.user_best(),
                        )
                    };
                    let Some(document) = current_document() else {
                        return;
                    };
                    match top {
                        Ok(records) => {
                            set_visible(&document, "leaderboard-loading", false);
                            fill_leaderboard(&document, &records);
                        }
                        // Leave the loading state up; the next open retries
                        Err(e) => log::error!("Failed to load leaderboard: {e}"),
                    }
                    match best {
                        Ok(Some(record)) => {
                            set_visible(&document, "your-best", true);
                            set_text(&document, "your-best-score", &record.score.to_string());
                        }
                        Ok(None) => set_visible(&document, "your-best", false),
                        Err(e) => log::error!("Failed to load personal best: {e}"),
                    }
                });
            });
        }

        on_click(document, "close-leaderboard-btn", move |_| {
            if let Some(document) = current_document() {
                set_visible(&document, "leaderboard", false);
            }
        });
    }

    fn fill_leaderboard(document: &Document, records: &[ScoreRecord]) {
        let Some(list) = document.get_element_by_id("leaderboard-list") else {
            return;
        };
        list.set_text_content(None);

        if records.is_empty() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some("No scores yet! Be the first to conquer the reef!"));
                let _ = list.append_child(&li);
            }
            return;
        }

        let now = js_sys::Date::now();
        for (index, record) in records.iter().enumerate() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&format!(
                    "{}  {}  {}  ({})",
                    rank_label(index),
                    record.player_name,
                    record.score,
                    format_date(record.created_at, now)
                )));
                let _ = list.append_child(&li);
            }
        }
    }

    fn show_auth_state(document: &Document, service: &LocalScoreService) {
        let signed_in = service.is_authenticated();
        set_visible(document, "auth", !signed_in);
        set_visible(document, "sign-out-btn", signed_in);
    }

    fn setup_auth(document: &Document, service: Service) {
        let flows: [(&str, fn(Credentials) -> AuthFlow); 2] = [
            ("sign-in-btn", AuthFlow::SignIn),
            ("sign-up-btn", AuthFlow::SignUp),
        ];
        for (id, make_flow) in flows {
            let service = service.clone();
            on_click(document, id, move |_| {
                let Some(document) = current_document() else {
                    return;
                };
                let creds = Credentials::new(
                    input_value(&document, "email-input"),
                    input_value(&document, "password-input"),
                );
                authenticate(service.clone(), make_flow(creds));
            });
        }

        {
            let service = service.clone();
            on_click(document, "guest-btn", move |_| {
                authenticate(service.clone(), AuthFlow::Anonymous);
            });
        }

        on_click(document, "sign-out-btn", move |_| {
            service.borrow_mut().sign_out();
            if let Some(document) = current_document() {
                show_auth_state(&document, &service.borrow());
            }
        });
    }

    fn authenticate(service: Service, flow: AuthFlow) {
        wasm_bindgen_futures::spawn_local(async move {
            let result = service.borrow_mut().authenticate(flow);
            let Some(document) = current_document() else {
                return;
            };
            match result {
                Ok(_) => set_text(&document, "auth-error", ""),
                Err(e) => {
                    log::warn!("Sign-in failed: {e}");
                    set_text(&document, "auth-error", &e.to_string());
                }
            }
            show_auth_state(&document, &service.borrow());
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use crabby_bird::Tuning;
    use crabby_bird::leaderboard::{AuthFlow, DEFAULT_TOP_LIMIT, LocalScoreService, ScoreService};
    use crabby_bird::sim::{GameState, RunPhase, TickInput, tick};
    use crabby_bird::submission::Submission;

    env_logger::init();
    log::info!("Crabby Bird (native) starting...");
    log::info!("Native mode runs the autopilot headless - run with `trunk serve` for the web version");

    let tuning = match std::env::var("CRABBY_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let max_ticks: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(20_000);

    let mut state = GameState::with_tuning(0xC0A5_7A1, tuning);
    let mut service = LocalScoreService::new();
    if let Err(e) = service.authenticate(AuthFlow::Anonymous) {
        log::error!("Guest sign-in failed: {e}");
    }

    let autopilot = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let replay = TickInput {
        reset: true,
        ..Default::default()
    };

    let mut runs = 0;
    for _ in 0..max_ticks {
        let outcome = tick(&mut state, &autopilot);
        if outcome.collided() {
            runs += 1;
            let mut submission = Submission::for_run(state.score);
            if submission.can_offer() {
                if let Err(e) = submission.submit_with(&mut service, "Autopilot") {
                    log::warn!("Could not share run {}: {}", runs, e);
                }
            }
        }
        if state.phase == RunPhase::GameOver {
            tick(&mut state, &replay);
        }
    }

    println!("\nAutopilot finished {} runs in {} ticks", runs, max_ticks);
    println!("Session best: {}", state.high_score);
    match service.top_scores(DEFAULT_TOP_LIMIT) {
        Ok(top) => {
            for (i, record) in top.iter().enumerate() {
                println!("{:>3}. {:<20} {}", i + 1, record.player_name, record.score);
            }
        }
        Err(e) => log::error!("Could not list scores: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
