//! Rocket Lander entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use thiserror::Error;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use rocket_lander::platform::{Clock, Key, KeyboardState, PerformanceClock};
    use rocket_lander::renderer::RenderState;
    use rocket_lander::{Session, SessionError, Settings};

    #[derive(Debug, Error)]
    enum StartupError {
        #[error("Missing browser feature: {0}")]
        Dom(&'static str),
        #[error("Failed to create surface: {0}")]
        Surface(#[from] wgpu::CreateSurfaceError),
        #[error("No suitable GPU adapter: {0}")]
        Adapter(#[from] wgpu::RequestAdapterError),
        #[error("Failed to create device: {0}")]
        Device(#[from] wgpu::RequestDeviceError),
        #[error(transparent)]
        Session(#[from] SessionError),
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: RenderState,
        keyboard: KeyboardState,
        clock: PerformanceClock,
        settings: Settings,
        document: web_sys::Document,
    }

    impl Game {
        /// One frame: input, fixed-step update, render
        fn frame(&mut self) {
            self.session.process_input(&mut self.keyboard);
            self.session.update(self.clock.now_seconds());
            self.session.render(&mut self.render_state);
        }

        fn toggle_autopilot(&mut self) {
            self.settings.autopilot = !self.settings.autopilot;
            self.session.set_autopilot(self.settings.autopilot);
            self.settings.save();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            if let Some(el) = self.document.get_element_by_id("hud-fps") {
                let _ = el.set_attribute("class", if self.settings.show_fps { "" } else { "hidden" });
            }
            if let Some(el) = self.document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.session.fps().to_string()));
            }
            if let Some(el) = self.document.get_element_by_id("hud-autopilot") {
                let _ = el.set_attribute("class", if self.session.autopilot() { "" } else { "hidden" });
            }
        }

        fn shutdown(&mut self) {
            self.session.shutdown(&mut self.render_state);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Rocket Lander starting...");

        if let Err(e) = start().await {
            log::error!("Startup failed: {}", e);
            show_fatal(&e.to_string());
        }
    }

    /// Put the error where the loading indicator was
    fn show_fatal(message: &str) {
        let loading = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"));
        if let Some(loading) = loading {
            loading.set_text_content(Some(message));
            let _ = loading.set_attribute("class", "");
        }
    }

    async fn start() -> Result<(), StartupError> {
        let window = web_sys::window().ok_or(StartupError::Dom("window"))?;
        let document = window.document().ok_or(StartupError::Dom("document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(StartupError::Dom("#canvas"))?
            .dyn_into()
            .map_err(|_| StartupError::Dom("#canvas is not a canvas"))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = RenderState::new(surface, &adapter, width, height).await?;
        let settings = Settings::load();
        render_state.set_high_contrast(settings.high_contrast);

        let clock = PerformanceClock::new().ok_or(StartupError::Dom("performance"))?;
        let mut session = Session::builtin(&mut render_state, clock.now_seconds())?;
        session.set_autopilot(settings.autopilot);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state,
            keyboard: KeyboardState::default(),
            clock,
            settings,
            document,
        }));

        setup_input_handlers(&window, game.clone());
        setup_lifecycle_handlers(&window, game.clone());

        request_animation_frame(game);

        log::info!("Rocket Lander running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let name = event.key();
                if let Some(key) = Key::from_name(&name) {
                    event.prevent_default();
                    g.keyboard.set_key(key, true);
                } else if (name == "i" || name == "I") && !event.repeat() {
                    g.toggle_autopilot();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = Key::from_name(&event.key()) {
                    game.borrow_mut().keyboard.set_key(key, false);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Keyups are lost while unfocused
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keyboard.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
                let persisted = event.persisted();
                if persisted {
                    log::info!("Page cached, pausing");
                } else {
                    log::info!("Page unloading, quitting");
                }
                game.borrow_mut().keyboard.page_hidden(persisted);
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let running = {
            let mut g = game.borrow_mut();
            g.frame();
            g.update_hud();
            g.session.is_running()
        };

        if running {
            request_animation_frame(game);
        } else {
            game.borrow_mut().shutdown();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native_demo {
    use std::thread;
    use std::time::Duration;

    use rocket_lander::platform::{Clock, InstantClock, KeyboardState};
    use rocket_lander::renderer::HeadlessPresenter;
    use rocket_lander::sim::GamePhase;
    use rocket_lander::{Session, SessionError, Settings};

    /// Sleep between frames (~60 Hz)
    const FRAME_PACING: Duration = Duration::from_millis(16);
    /// Keep running this long after the outcome before quitting
    const OUTCOME_HOLD_SECONDS: f64 = 1.0;

    /// Fly the built-in level on autopilot without a window
    pub fn run() -> Result<GamePhase, SessionError> {
        let clock = InstantClock::default();
        let settings = Settings::load();
        let mut presenter = HeadlessPresenter::new();
        let mut input = KeyboardState::default();

        let mut session = Session::builtin(&mut presenter, clock.now_seconds())?;
        session.set_autopilot(true);

        let mut ended_at = None;
        while session.is_running() {
            session.process_input(&mut input);
            session.update(clock.now_seconds());
            session.render(&mut presenter);

            if settings.show_fps && presenter.frames_presented() % 60 == 0 {
                let p = session.state().rocket_position();
                log::info!("fps {} rocket ({:.2}, {:.2})", session.fps(), p.x, p.y);
            }

            if session.phase().is_terminal() {
                let now = clock.now_seconds();
                let ended = *ended_at.get_or_insert_with(|| {
                    for text in presenter.texts() {
                        println!("{}", text);
                    }
                    now
                });
                if now - ended >= OUTCOME_HOLD_SECONDS {
                    input.request_quit();
                }
            }

            thread::sleep(FRAME_PACING);
        }

        let phase = session.phase();
        session.shutdown(&mut presenter);
        Ok(phase)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Rocket Lander (native) starting...");
    log::info!("Native mode flies the autopilot headless - run with `trunk serve` for the web version");

    match native_demo::run() {
        Ok(phase) => {
            log::info!("Finished: {:?}", phase);
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
