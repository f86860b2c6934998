//! Letter Rain entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use letter_rain::platform::Clock;
    use letter_rain::platform::web::{CanvasRenderer, DomDisplay, DomLifecycle, Palette, WebClock};
    use letter_rain::sim::GameEvent;
    use letter_rain::{Autoplayer, FrameStatus, GameConfig, Session, SessionPhase};

    /// Game instance holding the session and its browser collaborators
    struct Game {
        session: Session,
        renderer: CanvasRenderer,
        display: DomDisplay,
        ui: DomLifecycle,
        clock: WebClock,
        autoplayer: Autoplayer,
        idle_mode: bool,
        /// A frame callback is pending
        looping: bool,
    }

    impl Game {
        fn frame(&mut self) -> FrameStatus {
            let now = self.clock.now_ms();
            if self.idle_mode {
                self.autoplayer.drive(&mut self.session, now);
            }
            let status =
                self.session
                    .frame(now, &mut self.renderer, &mut self.display, &mut self.ui);
            for event in self.session.drain_events() {
                log_event(&event);
            }
            status
        }

        fn key(&mut self, key: char) {
            let now = self.clock.now_ms();
            if let Some(outcome) = self.session.key(key, now) {
                log::debug!("Key {} -> {:?}", key, outcome);
            }
        }

        /// Start a fresh session or restart a finished one. Returns true if a
        /// frame loop should be (re)scheduled.
        fn begin(&mut self) -> bool {
            let started = match self.session.phase() {
                SessionPhase::NotStarted => self.session.start(),
                SessionPhase::GameOver => self.session.restart(js_sys::Date::now() as u64),
                SessionPhase::Running => false,
            };
            if started {
                self.ui.set_visible("start-btn", false);
                self.ui.set_visible("restart-btn", false);
            }
            started && !self.looping
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::DifficultyChanged { score, difficulty } => log::info!(
                "Difficulty at {}: speed {:.2}, spawn every {}ms",
                score,
                difficulty.fall_speed,
                difficulty.spawn_interval_ms
            ),
            other => log::trace!("{:?}", other),
        }
    }

    fn document() -> Result<Document, JsValue> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Letter Rain starting...");

        let document = document()?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| JsValue::from_str("no #gameCanvas element"))?
            .dyn_into()?;

        let config = GameConfig::load();
        // Write it back so the stored JSON can be edited from devtools
        config.save();
        canvas.set_width(config.canvas_width as u32);
        canvas.set_height(config.canvas_height as u32);

        let palette = Palette::for_variant(config.variant);
        let renderer = CanvasRenderer::new(canvas.clone(), palette)?;
        let banner = CanvasRenderer::new(canvas, palette)?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(config, seed),
            renderer,
            display: DomDisplay::new(document.clone()),
            ui: DomLifecycle::new(document, banner),
            clock: WebClock,
            autoplayer: Autoplayer::default(),
            idle_mode: false,
            looping: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone())?;
        setup_button("start-btn", game.clone())?;
        setup_button("restart-btn", game)?;

        log::info!("Letter Rain ready, press Space or Start");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let key = event.key();
            let schedule = {
                let mut g = game.borrow_mut();
                match key.as_str() {
                    "Tab" => {
                        event.prevent_default();
                        g.idle_mode = !g.idle_mode;
                        log::info!("Idle mode: {}", g.idle_mode);
                        false
                    }
                    " " if g.session.phase() != SessionPhase::Running => {
                        event.prevent_default();
                        g.begin()
                    }
                    _ => {
                        let mut chars = key.chars();
                        if let (Some(c), None) = (chars.next(), chars.next()) {
                            if c.is_ascii_alphabetic() {
                                g.key(c);
                            }
                        }
                        false
                    }
                }
            };
            if schedule {
                request_animation_frame(game.clone());
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_button(id: &str, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(btn) = document()?.get_element_by_id(id) else {
            log::warn!("No #{} button, use Space instead", id);
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let schedule = game.borrow_mut().begin();
            if schedule {
                request_animation_frame(game.clone());
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        game.borrow_mut().looping = true;
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let status = {
            let mut g = game.borrow_mut();
            let status = g.frame();
            if status == FrameStatus::Stop {
                g.looping = false;
            }
            status
        };

        if status == FrameStatus::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Letter Rain failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use letter_rain::platform::Clock;
    use letter_rain::platform::headless::{GameOverLatch, ManualClock, RecordingRenderer, ScoreBoard};
    use letter_rain::sim::GameEvent;
    use letter_rain::{Autoplayer, FrameStatus, GameConfig, Session, Variant};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Letter Rain (native) starting...");
    log::info!("Native mode runs a headless idle-mode demo - build for wasm32 to play");

    // letter-rain [seed] [classic|retro]
    let args: Vec<String> = std::env::args().collect();
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let config = match args.get(2).and_then(|s| Variant::from_str(s)) {
        Some(variant) => GameConfig::from_variant(variant),
        None => GameConfig::load(),
    };

    let mut session = Session::new(config, seed);
    let mut bot = Autoplayer::default();
    let clock = ManualClock::new(0.0);
    let mut renderer = RecordingRenderer::new();
    let mut board = ScoreBoard::default();
    let mut latch = GameOverLatch::default();

    session.start();
    let (mut hits, mut misses) = (0u32, 0u32);
    let mut frames = 0u64;
    while frames < MAX_FRAMES {
        let now = clock.advance(FRAME_MS);
        bot.drive(&mut session, now);
        let status = session.frame(now, &mut renderer, &mut board, &mut latch);
        for event in session.drain_events() {
            match event {
                GameEvent::Hit { .. } => hits += 1,
                GameEvent::Missed { .. } => misses += 1,
                _ => {}
            }
        }
        frames += 1;
        if status == FrameStatus::Stop {
            break;
        }
    }

    let state = session.state();
    log::info!(
        "Demo finished after {} frames ({:.1}s simulated): score {}, {} spawned, {} hit, {} missed, game over: {}",
        frames,
        clock.now_ms() / 1000.0,
        state.score,
        state.spawned,
        hits,
        misses,
        latch.final_score.is_some()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
