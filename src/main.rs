//! Asteroid Drift entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use asteroid_drift::platform::KeyboardState;
    use asteroid_drift::platform::web::{LocalStorage, prompt_name};
    use asteroid_drift::renderer::{RenderState, build_scene};
    use asteroid_drift::sim::{Field, FrameClock, GameEvent, GamePhase, GameState, run_frame};
    use asteroid_drift::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        high_scores: HighScores,
        store: LocalStorage,
        keyboard: KeyboardState,
        clock: FrameClock,
        render_state: Option<RenderState>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Set when the run ended and the name prompt is still to be shown
        name_pending: bool,
    }

    impl Game {
        fn new(state: GameState, settings: Settings, high_scores: HighScores, store: LocalStorage) -> Self {
            Self {
                state,
                settings,
                high_scores,
                store,
                keyboard: KeyboardState::new(),
                clock: FrameClock::new(),
                render_state: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                name_pending: false,
            }
        }

        /// Run simulation ticks; returns true if this frame needs drawing
        fn update(&mut self, time: f64) -> bool {
            let was_running = self.state.is_running();

            let step = self.clock.advance_to(time);
            let keyboard = &mut self.keyboard;
            run_frame(&mut self.state, step, || keyboard.take_input());

            for event in self.state.drain_events() {
                match event {
                    GameEvent::GameOver { .. } => self.name_pending = true,
                    GameEvent::WaveSpawned { wave } if wave > 1 => {
                        log::info!("Wave {} incoming", wave);
                    }
                    _ => {}
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            was_running || self.state.is_running()
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(&self.state.snapshot());
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Ask for a name once per game over and record the result
        fn resolve_name_entry(&mut self) {
            if !self.name_pending {
                return;
            }
            self.name_pending = false;

            let message = format!("Game over! Score: {}. Enter your name:", self.state.score);
            let name = prompt_name(&message);
            // Key-ups during the modal dialog never reach us
            self.keyboard.release_all();

            if let Some(entry) = self
                .state
                .submit_name(name.as_deref(), &self.settings.default_name)
            {
                let name = entry.name.clone();
                match self.high_scores.record(entry, &mut self.store) {
                    Some(rank) => log::info!("{} placed #{} on the leaderboard", name, rank),
                    None => log::info!("{} did not make the leaderboard", name),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "#hud-score .hud-value", &self.state.score.to_string());
            set_text(&document, "#hud-lives .hud-value", &self.state.lives.to_string());

            set_visible(&document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(&document, "#hud-fps .hud-value", &self.fps.to_string());
            }

            set_visible(&document, "high-scores", self.settings.show_high_scores);
            if self.settings.show_high_scores {
                set_text(&document, "#high-scores .list", &self.high_scores.lines().join("\n"));
            }

            set_visible(&document, "pause-banner", self.state.phase == GamePhase::Paused);

            let over = matches!(self.state.phase, GamePhase::AwaitingName | GamePhase::GameOver);
            set_visible(&document, "game-over", over);
            if over {
                set_text(&document, "#final-score", &self.state.score.to_string());
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Asteroid Drift starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // The field is the canvas in CSS pixels; the surface is in device pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let field = Field::new(client_w as f32, client_h as f32);

        let store = LocalStorage::open();
        let settings = Settings::load(&store);
        let high_scores = HighScores::load(&store);

        let seed = js_sys::Date::now() as u64;
        let state = GameState::with_rules(field, seed, settings.rules);
        let game = Rc::new(RefCell::new(Game::new(state, settings, high_scores, store)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                match RenderState::new(surface, &adapter, width, height, field).await {
                    Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                    Err(e) => log::error!("Failed to create device: {}", e),
                }
            }
            Err(e) => log::error!("No WebGPU adapter, running without graphics: {}", e),
        }

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Asteroid Drift running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keyboard.key_down(&event.key(), event.repeat()) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keyboard.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            if g.update(time) {
                g.render();
            }
            g.update_hud();
            g.resolve_name_entry();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().keyboard.request_restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause when the game loses the player's attention
    fn auto_pause(game: &Rc<RefCell<Game>>, reason: &str) {
        let mut g = game.borrow_mut();
        g.keyboard.release_all();
        if g.settings.auto_pause && g.state.is_running() {
            g.keyboard.request_pause();
            log::info!("Auto-paused ({})", reason);
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&game, "tab hidden");
                } else {
                    // Frames stopped while hidden; don't replay the gap
                    game.borrow_mut().clock.reset();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                auto_pause(&game, "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless attract mode: an autopilot plays one run against the real rules
#[cfg(not(target_arch = "wasm32"))]
mod attract {
    use std::time::{SystemTime, UNIX_EPOCH};

    use asteroid_drift::consts::SHIP_TURN_RATE;
    use asteroid_drift::persistence::{FileStore, KeyValueStore, MemoryStore};
    use asteroid_drift::sim::{
        Field, FrameClock, GameEvent, GamePhase, GameState, TickInput, size_census, tick,
    };
    use asteroid_drift::{HighScores, Settings, distance, normalize_angle};

    /// Directory holding the native leaderboard and settings
    const DATA_DIR: &str = ".asteroid-drift";
    const FIELD_WIDTH: f32 = 800.0;
    const FIELD_HEIGHT: f32 = 600.0;
    /// Ten simulated minutes
    const MAX_TICKS: u64 = 60 * 60 * 10;
    /// Snapshot logging interval
    const SNAPSHOT_EVERY: u64 = 600;

    /// Steer toward the nearest asteroid, shoot when lined up
    pub fn autopilot(state: &GameState) -> TickInput {
        let ship = &state.ship;
        let Some(target) = state.asteroids.iter().min_by(|a, b| {
            distance(ship.pos, a.pos).total_cmp(&distance(ship.pos, b.pos))
        }) else {
            return TickInput::default();
        };

        let to_target = target.pos - ship.pos;
        let delta = normalize_angle(to_target.y.atan2(to_target.x) - ship.angle);
        let aligned = delta.abs() < 0.15;

        TickInput {
            turn_left: delta < -SHIP_TURN_RATE,
            turn_right: delta > SHIP_TURN_RATE,
            thrust: aligned && to_target.length() > 250.0,
            fire: aligned,
            ..Default::default()
        }
    }

    pub fn run(seed: Option<u64>) {
        match FileStore::open(DATA_DIR) {
            Ok(store) => {
                log::info!("Using data directory {}", store.dir().display());
                play(store, seed);
            }
            Err(e) => {
                log::warn!("Cannot open {}: {}; scores will not persist", DATA_DIR, e);
                play(MemoryStore::new(), seed);
            }
        }
    }

    fn play<S: KeyValueStore>(mut store: S, seed: Option<u64>) {
        let settings = Settings::load(&store);
        if store.get(Settings::STORAGE_KEY).is_none() {
            // Leave an editable settings file behind on first run
            if let Err(e) = settings.save(&mut store) {
                log::warn!("Failed to save default settings: {}", e);
            }
        }
        let mut high_scores = HighScores::load(&store);

        let seed = seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_millis() as u64)
        });
        let field = Field::new(FIELD_WIDTH, FIELD_HEIGHT);
        let mut state = GameState::with_rules(field, seed, settings.rules);
        log::info!("Attract run with seed {}", seed);

        let dt = FrameClock::tick_duration();
        for _ in 0..MAX_TICKS {
            let input = autopilot(&state);
            tick(&mut state, &input, dt);

            for event in state.drain_events() {
                match event {
                    GameEvent::WaveSpawned { wave } => log::info!("Wave {}", wave),
                    GameEvent::AsteroidDestroyed { size, .. } => log::trace!("Destroyed {:?}", size),
                    GameEvent::ShipHit { .. } | GameEvent::GameOver { .. } => {}
                }
            }

            if state.phase == GamePhase::AwaitingName {
                break;
            }

            if state.time_ticks % SNAPSHOT_EVERY == 0 && log::log_enabled!(log::Level::Debug) {
                match serde_json::to_string(&state.snapshot()) {
                    Ok(json) => log::debug!("{}", json),
                    Err(e) => log::warn!("Snapshot failed: {}", e),
                }
            }
        }

        let [large, medium, small] = size_census(&state.asteroids);
        log::info!(
            "Finished after {} ticks: score {}, wave {}, asteroids left {}L/{}M/{}S",
            state.time_ticks,
            state.score,
            state.wave_index,
            large,
            medium,
            small
        );

        // Attract mode has nobody to ask, so the default name is used
        if let Some(entry) = state.submit_name(None, &settings.default_name) {
            if let Some(rank) = high_scores.record(entry, &mut store) {
                log::info!("New high score at #{}", rank);
            }
        }

        println!("High scores:");
        for line in high_scores.lines() {
            println!("  {}", line);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Asteroid Drift (native) starting in attract mode...");
    log::info!("Run with `trunk serve` to play the web version");

    let seed = std::env::args().nth(1).and_then(|arg| arg.parse().ok());
    attract::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
