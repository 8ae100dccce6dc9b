//! Moon Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use moon_run::assets::AssetStore;
    use moon_run::input::{Key, KeyState};
    use moon_run::render::Renderer;
    use moon_run::scheduler::{FrameHandle, FrameSource, Scheduler, SchedulerBuilder};
    use moon_run::sim::{GamePhase, GameState, tick};
    use moon_run::Settings;

    const SAVE_KEY: &str = "moon_run_save";

    /// requestAnimationFrame-backed frame source
    ///
    /// The delivery closure is installed after the scheduler exists (it
    /// needs a handle back to it), so it lives in a shared slot.
    struct WebFrames {
        callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    }

    impl WebFrames {
        fn new() -> (Self, Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) {
            let slot = Rc::new(RefCell::new(None));
            (
                Self {
                    callback: slot.clone(),
                },
                slot,
            )
        }
    }

    impl FrameSource for WebFrames {
        fn request_frame(&mut self) -> FrameHandle {
            let window = web_sys::window().expect("no window");
            let cb = self.callback.borrow();
            match cb.as_ref() {
                Some(closure) => window
                    .request_animation_frame(closure.as_ref().unchecked_ref())
                    .unwrap_or(0),
                None => 0,
            }
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if handle != 0 {
                let window = web_sys::window().expect("no window");
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Renderer,
        assets: AssetStore,
        settings: Settings,
        keys: Rc<RefCell<KeyState>>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for auto-save
        last_phase: GamePhase,
    }

    impl Game {
        fn new(
            seed: u64,
            renderer: Renderer,
            assets: AssetStore,
            settings: Settings,
            keys: Rc<RefCell<KeyState>>,
        ) -> Self {
            Self {
                state: GameState::new(seed),
                renderer,
                assets,
                settings,
                keys,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Flying,
            }
        }

        /// Run one fixed simulation tick from the polled key state
        fn update(&mut self, dt: f32) {
            let restart = self.keys.borrow().is_pressed(Key::Restart);
            if restart && self.state.is_over() {
                let seed = js_sys::Date::now() as u64;
                self.state = GameState::new(seed);
                self.last_phase = GamePhase::Flying;
                clear_saved_run();
                log::info!("restarted with seed {seed}");
                return;
            }

            let input = self.keys.borrow_mut().to_tick_input();
            tick(&mut self.state, &input, dt);

            // Auto-save on phase transitions
            let phase = self.state.phase;
            if phase != self.last_phase {
                match phase {
                    GamePhase::Paused => self.save_run(),
                    GamePhase::Landed { .. } | GamePhase::GameOver { .. } => clear_saved_run(),
                    _ => {}
                }
                self.last_phase = phase;
            }
        }

        /// Render the current frame and refresh the FPS estimate
        fn render(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            self.renderer
                .render(&self.state, &self.assets, &self.settings, self.fps);
        }

        /// Save the current run to LocalStorage
        fn save_run(&self) {
            if let Ok(json) = serde_json::to_string(&self.state) {
                if let Some(storage) = web_sys::window()
                    .and_then(|w| w.local_storage().ok())
                    .flatten()
                {
                    let _ = storage.set_item(SAVE_KEY, &json);
                    log::info!("run saved (score {})", self.state.score);
                }
            }
        }
    }

    /// Load a resumable run from LocalStorage
    fn load_saved_run() -> Option<GameState> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(SAVE_KEY).ok()??;
        let mut state: GameState = serde_json::from_str(&json).ok()?;
        if state.is_over() {
            return None;
        }
        state.normalize_order();
        // Resume paused rather than mid-flight
        state.phase = GamePhase::Paused;
        Some(state)
    }

    /// Clear the saved run from LocalStorage
    fn clear_saved_run() {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.remove_item(SAVE_KEY);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Moon Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size for the device pixel ratio, draw in CSS pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        canvas.set_width((client_w as f64 * dpr) as u32);
        canvas.set_height((client_h as f64 * dpr) as u32);

        let ctx: web_sys::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");
        let _ = ctx.scale(dpr, dpr);

        let renderer = Renderer::new(ctx, client_w as f32, client_h as f32);
        let assets = AssetStore::with_default_sprites();
        let settings = Settings::load();
        let run_unfocused = settings.run_unfocused;
        let keys = Rc::new(RefCell::new(KeyState::new()));

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, renderer, assets, settings, keys.clone());
        if let Some(saved) = load_saved_run() {
            log::info!("resuming saved run (score {})", saved.score);
            game.last_phase = saved.phase;
            game.state = saved;
        }
        let game = Rc::new(RefCell::new(game));

        // Scheduler with the rAF frame source; the delivery closure is
        // installed below once the scheduler is shareable
        let (frames, frame_slot) = WebFrames::new();
        let scheduler = {
            let update_game = game.clone();
            let render_game = game.clone();
            let clear_game = game.clone();
            SchedulerBuilder::new()
                .ignore_focus(run_unfocused)
                .update(move |dt| update_game.borrow_mut().update(dt))
                .clear(move || clear_game.borrow().renderer.clear())
                .render(move || {
                    let now = js_sys::Date::now();
                    render_game.borrow_mut().render(now);
                })
                .build(frames)
                .expect("scheduler misconfigured")
        };
        let scheduler = Rc::new(RefCell::new(scheduler));

        {
            let scheduler = scheduler.clone();
            *frame_slot.borrow_mut() = Some(Closure::new(move |time: f64| {
                scheduler.borrow_mut().frame(time);
            }));
        }

        setup_key_listeners(keys);
        setup_focus_listeners(scheduler.clone());

        let now = window.performance().expect("no performance").now();
        scheduler.borrow_mut().start(now);

        log::info!("Moon Run running!");
    }

    fn setup_key_listeners(keys: Rc<RefCell<KeyState>>) {
        let window = web_sys::window().unwrap();

        {
            let keys = keys.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = KeyState::from_browser_key(&event.key()) {
                    event.prevent_default();
                    keys.borrow_mut().set_pressed(key, true);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = KeyState::from_browser_key(&event.key()) {
                    keys.borrow_mut().set_pressed(key, false);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Window focus/blur toggles the scheduler's focused flag; unfocused
    /// frames idle instead of piling up catch-up ticks
    fn setup_focus_listeners<F: FrameSource + 'static>(scheduler: Rc<RefCell<Scheduler<F>>>) {
        let window = web_sys::window().unwrap();

        {
            let scheduler = scheduler.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                log::info!("window focused");
                scheduler.borrow_mut().set_focused(true);
            });
            let _ = window
                .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                log::info!("window blurred");
                scheduler.borrow_mut().set_focused(false);
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
    log::info!("Moon Run (native) starting...");
    log::info!("Native mode has no renderer - run with `trunk serve` for the web version");

    println!("\nRunning collision smoke check...");
    smoke_check_collision();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_check_collision() {
    use glam::Vec2;
    use moon_run::sim::{OrientedRect, overlaps};

    let ship = OrientedRect::new(Vec2::new(100.0, 100.0), 22.0, 14.0, 0.4);
    let rock = OrientedRect::new(Vec2::new(110.0, 95.0), 30.0, 30.0, -1.1);
    assert!(overlaps(&ship, &rock), "Collision should be detected");

    let far = OrientedRect::new(Vec2::new(400.0, 400.0), 30.0, 30.0, 0.0);
    assert!(!overlaps(&ship, &far), "Distant rocks should not collide");
    println!("✓ Collision smoke check passed!");
}
