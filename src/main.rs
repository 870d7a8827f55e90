//! Gap Runner entry point
//!
//! Thin adapters around the simulation: the web build wires the frame loop,
//! input, timers, audio, storage and HUD; the native build runs a headless
//! autopilot session for smoke testing.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use gap_runner::audio::AudioManager;
    use gap_runner::platform::{self, default_storage, now_ms};
    use gap_runner::sim::{GameEvent, GamePhase, Session, TimerId};
    use gap_runner::{BestScoreStore, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        best_store: BestScoreStore,
        settings_storage: Box<dyn platform::Storage>,
        settings: Settings,
        audio: AudioManager,
        /// Pending requestAnimationFrame handle, None when the loop is stopped
        raf_id: Option<i32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let best_store = BestScoreStore::new(default_storage());
            let settings_storage = default_storage();
            let settings = Settings::load(settings_storage.as_ref());
            let best = best_store.load();
            Self {
                session: Session::new(seed, best),
                best_store,
                settings_storage,
                audio: AudioManager::new(&settings),
                settings,
                raf_id: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.settings.save(self.settings_storage.as_mut());
            self.audio.apply_settings(&self.settings);
            log::info!("Muted: {}", muted);
        }

        /// Cancel the pending frame callback, if any
        fn stop_loop(&mut self) {
            if let Some(id) = self.raf_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let snapshot = self.session.snapshot();

            set_text(document, "#hud-score .hud-value", &snapshot.score.to_string());
            set_text(document, "#hud-best .hud-value", &snapshot.best.to_string());
            set_text(document, "#hud-lives .hud-value", &snapshot.lives.to_string());
            if self.settings.show_fps {
                set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
            }

            if let Some(body) = document.body() {
                let phase = match snapshot.phase {
                    GamePhase::Start => "start",
                    GamePhase::Playing => "playing",
                    GamePhase::GameOver => "game-over",
                };
                let _ = body.set_attribute("data-phase", phase);
                let blink = snapshot.invulnerable && self.settings.effective_blink();
                let _ = body.class_list().toggle_with_force("invulnerable", blink);
                let tilt = self.settings.display_tilt(snapshot.tilt);
                let _ = body.style().set_property("--tilt", &format!("{:.3}rad", tilt));
            }

            if snapshot.phase == GamePhase::GameOver {
                set_text(document, "#final-score", &snapshot.score.to_string());
                set_text(document, "#final-best", &snapshot.best.to_string());
            }
        }
    }

    impl Drop for Game {
        fn drop(&mut self) {
            self.stop_loop();
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Gap Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        measure_playfield(&canvas, &game);

        setup_input_handlers(&canvas, game.clone());
        setup_resize(canvas.clone(), game.clone());
        setup_auto_pause(game.clone());

        game.borrow().update_hud(&document);

        log::info!("Gap Runner ready!");
    }

    /// Feed the canvas size to the session (zero sizes fall back inside)
    fn measure_playfield(canvas: &HtmlCanvasElement, game: &Rc<RefCell<Game>>) {
        let w = canvas.client_width() as f32;
        let h = canvas.client_height() as f32;
        game.borrow_mut().session.resize(w, h);
    }

    /// One press of the game's only button
    fn primary_action(game: &Rc<RefCell<Game>>) {
        game.borrow_mut().session.primary_action();
        after_event(game);
    }

    /// Common follow-up to any state change: timers, audio, storage, HUD,
    /// and making sure the frame loop runs exactly while playing
    fn after_event(game: &Rc<RefCell<Game>>) {
        let (events, phase) = {
            let mut g = game.borrow_mut();
            let events = g.session.drain_events();
            let phase = g.session.phase();
            g.audio.play_events(&events);
            g.audio.sync_phase(phase);
            (events, phase)
        };

        for event in &events {
            match event {
                GameEvent::InvulnerabilityStarted { timer, expires_at_ms } => {
                    schedule_timer(game.clone(), *timer, expires_at_ms - now_ms());
                }
                GameEvent::GameOver { score } => {
                    game.borrow_mut().best_store.save_max(*score);
                }
                _ => {}
            }
        }

        let running = game.borrow().raf_id.is_some();
        let suspended = game.borrow().session.is_suspended();
        if phase == GamePhase::Playing && !suspended {
            if !running {
                request_animation_frame(game.clone());
            }
        } else {
            game.borrow_mut().stop_loop();
        }

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            game.borrow().update_hud(&document);
        }
    }

    /// Queue the invulnerability expiry onto the same event loop as frames
    fn schedule_timer(game: Rc<RefCell<Game>>, timer: TimerId, delay_ms: f64) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move || {
            if game.borrow_mut().session.on_timer(timer) {
                after_event(&game);
            }
        });
        let result = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms.max(0.0).ceil() as i32,
        );
        if result.is_err() {
            // The tick still expires the window by its deadline
            log::warn!("Failed to schedule invulnerability timer {:?}", timer);
        }
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let loop_game = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(loop_game, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().raf_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.raf_id = None;
            g.track_fps(time);
            g.session.advance(time);
        }
        // Re-arms the loop only while still playing
        after_event(&game);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer (mouse/touch/pen)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                primary_action(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" | "Enter" => {
                        event.prevent_default();
                        primary_action(&game);
                    }
                    "m" | "M" => game.borrow_mut().toggle_mute(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            measure_playfield(&canvas, &game);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                g.session.suspend();
                g.audio.pause();
                g.stop_loop();
                log::info!("Auto-paused (tab hidden)");
            } else {
                game.borrow_mut().session.resume();
                after_event(&game);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gap Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for web version");

    autopilot::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use gap_runner::consts::FRAME_INTERVAL_MS;
    use gap_runner::platform::default_storage;
    use gap_runner::sim::{GameEvent, GamePhase, Playfield, Session, TimerId};
    use gap_runner::{BestScoreStore, Tuning};

    /// Give up after this many simulated frames (two minutes at 60 Hz)
    const MAX_FRAMES: u64 = 60 * 120;

    /// Optional JSON tuning override
    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("GAP_RUNNER_TUNING") else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {}", path, e);
                    Tuning::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        let seed = std::env::var("GAP_RUNNER_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0x5eed);

        let mut store = BestScoreStore::new(default_storage());
        let mut session = Session::with_height_source(
            load_tuning(),
            Playfield::default(),
            Pcg32::seed_from_u64(seed),
            store.load(),
        );

        // Timers fire on the same thread, between frames
        let mut timers: Vec<(f64, TimerId)> = Vec::new();

        session.start();
        for frame in 0..MAX_FRAMES {
            let now = frame as f64 * FRAME_INTERVAL_MS;

            timers.retain(|&(fire_at, timer)| {
                if now >= fire_at {
                    session.on_timer(timer);
                    false
                } else {
                    true
                }
            });

            if should_jump(&session) {
                session.jump();
            }
            session.advance(now);

            for event in session.drain_events() {
                match event {
                    GameEvent::InvulnerabilityStarted { timer, expires_at_ms } => {
                        timers.push((expires_at_ms, timer));
                    }
                    GameEvent::Damaged { lives_left } => {
                        log::info!("frame {}: hit, {} lives left", frame, lives_left);
                    }
                    GameEvent::GameOver { score } => {
                        store.save_max(score);
                    }
                    other => log::debug!("frame {}: {:?}", frame, other),
                }
            }

            if session.phase() == GamePhase::GameOver {
                break;
            }
        }

        let board = session.scoreboard();
        log::info!(
            "Autopilot finished: score {} (best {}), phase {:?}",
            session.state().score,
            board.best,
            session.phase()
        );
    }

    /// Jump when falling below the middle of the next gap
    fn should_jump(session: &Session) -> bool {
        let state = session.state();
        let reach = state.playfield.center_x() - state.tuning.character_size;
        let target = state
            .track
            .obstacles()
            .iter()
            .find(|o| o.right() > reach)
            .map(|o| o.top_height + state.tuning.obstacle_gap / 2.0)
            .unwrap_or(state.playfield.center_y());
        state.character.velocity >= 0.0 && state.character.y > target + 10.0
    }
}
