//! Synth Blast entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use synth_blast::audio::AudioManager;
    use synth_blast::consts::*;
    use synth_blast::scene::ParticleFilter;
    use synth_blast::sim::{Combatant, GameEvent, TickInput};
    use synth_blast::{Session, Settings};

    // JS bindings for the 3D scene bridge. The page installs
    // `window.synthBlast` with `apply(commands)` and `glitch()`.
    #[wasm_bindgen(inline_js = "
        export function apply_scene(json) {
            const bridge = window.synthBlast;
            if (bridge && bridge.apply) {
                bridge.apply(JSON.parse(json));
            }
        }

        export function trigger_glitch() {
            const bridge = window.synthBlast;
            if (bridge && bridge.glitch) {
                bridge.glitch();
            }
        }
    ")]
    extern "C" {
        fn apply_scene(json: &str);
        fn trigger_glitch();
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        audio: AudioManager,
        particle_filter: ParticleFilter,
        input: TickInput,
        /// Keys currently held
        keys: HashSet<String>,
        paused: bool,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                session: Session::new(seed),
                settings,
                audio,
                particle_filter: ParticleFilter::new(),
                input: TickInput::default(),
                keys: HashSet::new(),
                paused: false,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn held(&self, names: &[&str]) -> bool {
            names.iter().any(|k| self.keys.contains(*k))
        }

        /// Rebuild the tick input from held keys
        fn refresh_input(&mut self) {
            let left = self.held(&["ArrowLeft", "a", "A"]);
            let right = self.held(&["ArrowRight", "d", "D"]);
            let up = self.held(&["ArrowUp", "w", "W"]);
            let down = self.held(&["ArrowDown", "s", "S"]);

            self.input = TickInput {
                turn: (left as i32 - right as i32) as f32,
                thrust: (up as i32 - down as i32) as f32,
                fire: self.held(&[" "]),
            };
        }

        /// Advance one browser frame
        fn update(&mut self, elapsed_ms: f64, time: f64) {
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

            if self.paused {
                return;
            }

            // Normalized to 60 Hz ticks; the level clamps further
            let dt = (elapsed_ms / FRAME_MS) as f32;
            let events = self.session.frame(&self.input, dt);

            for event in &events {
                if *event == GameEvent::Glitch {
                    if self.settings.effective_glitch() {
                        trigger_glitch();
                    }
                } else {
                    self.audio.handle(event);
                }
            }
        }

        /// Forward scene commands to the bridge
        fn render(&mut self) {
            let commands = self
                .particle_filter
                .apply(self.session.drain_scene(), !self.settings.particles);
            if commands.is_empty() {
                return;
            }
            match serde_json::to_string(&commands) {
                Ok(json) => apply_scene(&json),
                Err(e) => log::error!("Failed to encode scene commands: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let level = self.session.level();

            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&level.level_number().to_string()));
            }

            if let Some(el) = document.query_selector("#hud-pads .hud-value").ok().flatten() {
                el.set_text_content(Some(&level.pads_remaining().to_string()));
            }

            if let Some(el) = document.query_selector("#hud-hp .hud-value").ok().flatten() {
                el.set_text_content(Some(&level.hero().hit_points().max(0).to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-shield") {
                let class = if level.hero().has_shield() {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                let class = if self.paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Apply a settings change, push it to audio and persist it
        fn change_settings(&mut self, change: impl FnOnce(&mut Settings)) {
            change(&mut self.settings);
            self.audio.apply_settings(&self.settings);
            self.settings.save();
        }

        fn set_paused(&mut self, paused: bool) {
            if self.paused == paused {
                return;
            }
            self.paused = paused;
            self.keys.clear();
            self.input = TickInput::default();

            if self.settings.mute_on_blur {
                self.audio.set_suspended(paused);
            }
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Synth Blast starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Synth Blast running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                match key.as_str() {
                    "Escape" | "p" | "P" => {
                        let paused = !g.paused;
                        g.set_paused(paused);
                        return;
                    }
                    "m" | "M" => {
                        g.change_settings(|s| s.muted = !s.muted);
                        return;
                    }
                    "g" | "G" => {
                        g.change_settings(|s| s.glitch_effect = !s.glitch_effect);
                        return;
                    }
                    "f" | "F" => {
                        g.change_settings(|s| s.show_fps = !s.show_fps);
                        return;
                    }
                    "x" | "X" => {
                        g.change_settings(|s| s.particles = !s.particles);
                        return;
                    }
                    " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" => {
                        event.prevent_default();
                    }
                    _ => {}
                }
                // Browsers only start audio after a gesture
                g.audio.resume();
                g.keys.insert(key);
                g.refresh_input();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.keys.remove(&event.key());
                g.refresh_input();
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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

            let elapsed_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                FRAME_MS
            };
            g.last_time = time;

            g.update(elapsed_ms, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().set_paused(true);
                    log::info!("Auto-paused (tab hidden)");
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
                game.borrow_mut().set_paused(true);
                log::info!("Auto-paused (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Synth Blast (native) starting...");
    log::info!("Native mode runs a headless autopilot - serve the wasm build for the real game");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 120);

    autopilot::run(seed, frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: steer at the nearest pad, shoot whatever is ahead
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;
    use synth_blast::Session;
    use synth_blast::sim::{GameEvent, Level, TickInput};

    pub fn run(seed: u64, frames: u32) {
        let mut session = Session::new(seed);
        let mut cleared = 0;
        let mut pads = 0;

        for _ in 0..frames {
            let input = steer(session.level());
            for event in session.frame(&input, 1.0) {
                match event {
                    GameEvent::LevelWon => cleared += 1,
                    GameEvent::Sound(synth_blast::sim::SoundEffect::Point) => pads += 1,
                    _ => {}
                }
            }
            // Nobody is watching the scene
            session.drain_scene();
        }

        log::info!(
            "Autopilot finished {} frames: level {}, {} levels cleared, {} pads, {} deaths",
            frames,
            session.level_number(),
            cleared,
            pads,
            session.deaths()
        );
    }

    fn steer(level: &Level) -> TickInput {
        let hero = level.hero();
        let here = Vec2::new(hero.x(), hero.y());

        let target = level
            .pads()
            .iter()
            .filter(|p| !p.used)
            .map(|p| p.pos)
            .min_by(|a, b| here.distance_squared(*a).total_cmp(&here.distance_squared(*b)));

        let Some(target) = target else {
            return TickInput::default();
        };

        let to_target = target - here;
        let cross = hero.direction().perp_dot(to_target);
        let aligned = hero.direction().dot(to_target.normalize_or_zero()) > 0.9;

        TickInput {
            turn: cross.signum(),
            thrust: if aligned { 1.0 } else { 0.3 },
            fire: true,
        }
    }
}
