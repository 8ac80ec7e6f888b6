//! Sky Flap entry point
//!
//! On the web this wires the DOM, input and the animation-frame loop around a
//! `GameState`. Natively it runs a headless session from the command line.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent};

    use sky_flap::audio::{AudioManager, SoundEffect};
    use sky_flap::persistence::LocalStorage;
    use sky_flap::platform::input::should_prevent_default;
    use sky_flap::platform::{InputAction, action_for_key, action_for_pointer};
    use sky_flap::renderer::sprite::decode_image;
    use sky_flap::renderer::{RenderState, build_scene};
    use sky_flap::sim::{FrameStatus, GameEvent, GamePhase, GameState, TickInput, frame};
    use sky_flap::{BestScore, Settings, Tuning};

    const CANVAS_ID: &str = "game-canvas";
    const SPRITE_PATH: &str = "assets/CENTRAL.png";
    const VOLUME_STEP: f32 = 0.1;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum SpriteStatus {
        Disabled,
        Loading,
        Ready,
        /// Decode or upload failed; the procedural bird is used for good
        Failed,
    }

    /// Everything the DOM shows, to skip redundant writes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct HudSnapshot {
        phase: GamePhase,
        score: u32,
        best: u32,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        best: BestScore,
        settings: Settings,
        store: LocalStorage,
        input: TickInput,
        sprite_image: Option<HtmlImageElement>,
        sprite_status: SpriteStatus,
        /// An animation frame callback is pending
        loop_scheduled: bool,
        last_hud: Option<HudSnapshot>,
    }

    impl Game {
        /// One display frame: simulate, react to events, draw, update the DOM
        fn frame(&mut self, now: f64) -> FrameStatus {
            self.input.autopilot = self.settings.demo_mode;
            let status = frame(&mut self.state, &self.input, now);
            // Flap is one-shot
            self.input.flap = false;

            self.handle_events();
            self.poll_sprite();
            self.render();
            self.sync_hud();
            status
        }

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                self.audio.play(SoundEffect::for_event(&event));
                if let GameEvent::GameOver { score, .. } = event {
                    self.best.submit(score, &mut self.store);
                }
            }
        }

        /// Upload the sprite the first frame after the image has decoded
        fn poll_sprite(&mut self) {
            if self.sprite_status != SpriteStatus::Loading {
                return;
            }
            let (Some(render_state), Some(image)) =
                (self.render_state.as_mut(), self.sprite_image.as_ref())
            else {
                return;
            };
            if !image.complete() {
                return;
            }

            self.sprite_status = match decode_image(image) {
                Ok((width, height, rgba)) => match render_state.upload_sprite(width, height, &rgba) {
                    Ok(()) => SpriteStatus::Ready,
                    Err(e) => {
                        log::warn!("Avatar sprite rejected: {}", e);
                        SpriteStatus::Failed
                    }
                },
                Err(e) => {
                    log::warn!("Avatar sprite unavailable, drawing fallback: {:?}", e);
                    SpriteStatus::Failed
                }
            };
        }

        fn render(&mut self) {
            let sprite_ready = self.sprite_status == SpriteStatus::Ready;
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let scene = build_scene(&self.state, sprite_ready && render_state.sprite_ready());
            match render_state.render(&scene) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Show the screen for the current phase and refresh the score text
        fn sync_hud(&mut self) {
            let snapshot = HudSnapshot {
                phase: self.state.phase,
                score: self.state.score,
                best: self.best.value,
            };
            if self.last_hud == Some(snapshot) {
                return;
            }
            let Some(document) = document() else {
                return;
            };

            let phase = snapshot.phase;
            show_screen(&document, "start-screen", phase == GamePhase::Idle);
            show_screen(&document, "pause-screen", phase == GamePhase::Paused);
            show_screen(&document, "game-over-screen", phase == GamePhase::GameOver);
            set_hidden(&document, "pause-btn", phase != GamePhase::Running);
            set_hidden(
                &document,
                "score-display",
                !matches!(phase, GamePhase::Running | GamePhase::Paused),
            );

            set_text(&document, "score-display", &snapshot.score.to_string());
            set_text(&document, "final-score", &snapshot.score.to_string());
            set_text(&document, "best-score", &snapshot.best.to_string());

            self.last_hud = Some(snapshot);
        }

        /// Apply an input action. Returns true when the loop needs to be woken.
        fn handle_action(&mut self, action: InputAction, now: f64) -> bool {
            let changed = match action {
                InputAction::Trigger => {
                    if self.state.phase == GamePhase::Running {
                        self.input.flap = true;
                    }
                    false
                }
                InputAction::TogglePause => self.state.toggle_pause(now),
                InputAction::Start => self.state.start(now),
                InputAction::ToggleMute => {
                    let muted = self.settings.toggle_muted();
                    log::info!("Sound {}", if muted { "muted" } else { "on" });
                    self.apply_settings();
                    false
                }
                InputAction::VolumeDown | InputAction::VolumeUp => {
                    let step = if action == InputAction::VolumeUp {
                        VOLUME_STEP
                    } else {
                        -VOLUME_STEP
                    };
                    self.settings.adjust_volume(step);
                    log::info!("Volume {:.0}%", self.settings.volume * 100.0);
                    self.apply_settings();
                    false
                }
                InputAction::ToggleDemo => {
                    let demo = self.settings.toggle_demo_mode();
                    log::info!("Demo mode {}", if demo { "on" } else { "off" });
                    self.apply_settings();
                    false
                }
                InputAction::ToggleSprites => {
                    self.settings.toggle_sprites();
                    self.apply_settings();
                    false
                }
            };
            if changed {
                self.sync_hud();
            }
            changed
        }

        /// Push the current settings to audio and the sprite path, then persist them
        fn apply_settings(&mut self) {
            self.audio.set_volume(self.settings.effective_volume());
            self.input.autopilot = self.settings.demo_mode;
            self.sync_sprite_setting();
            self.settings.save(&mut self.store);
            // A halted loop would not show the avatar change
            if !self.loop_scheduled {
                self.render();
            }
        }

        fn sync_sprite_setting(&mut self) {
            if self.sprite_status == SpriteStatus::Failed {
                return;
            }
            if !self.settings.sprites {
                self.sprite_status = SpriteStatus::Disabled;
                return;
            }
            if self.sprite_status != SpriteStatus::Disabled {
                return;
            }
            if self.sprite_image.is_none() {
                self.sprite_image = load_sprite_image();
            }
            let uploaded = self
                .render_state
                .as_ref()
                .is_some_and(|render_state| render_state.sprite_ready());
            self.sprite_status = if uploaded {
                SpriteStatus::Ready
            } else if self.sprite_image.is_some() {
                SpriteStatus::Loading
            } else {
                SpriteStatus::Disabled
            };
        }

        fn restart(&mut self, now: f64) -> bool {
            let changed = self.state.restart(now);
            if changed {
                self.input = TickInput::default();
                self.sync_hud();
            }
            changed
        }

        /// Size the backing store to the window at device-pixel resolution
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let Some((css_w, css_h, dpr)) = viewport() else {
                return;
            };
            let physical = (
                (css_w * dpr).round().max(1.0) as u32,
                (css_h * dpr).round().max(1.0) as u32,
            );
            canvas.set_width(physical.0);
            canvas.set_height(physical.1);

            let logical = (css_w as f32, css_h as f32);
            self.state.resize(logical.0, logical.1);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(physical, logical);
            }
            // A halted loop would leave the stretched old frame on screen
            if !self.loop_scheduled {
                self.render();
            }
        }
    }

    /// Start fetching the avatar sprite; decoding is polled each frame
    fn load_sprite_image() -> Option<HtmlImageElement> {
        match HtmlImageElement::new() {
            Ok(image) => {
                image.set_src(SPRITE_PATH);
                Some(image)
            }
            Err(_) => {
                log::warn!("Could not create image element for the avatar sprite");
                None
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// CSS width, CSS height and device pixel ratio of the window
    fn viewport() -> Option<(f64, f64, f64)> {
        let window = web_sys::window()?;
        let width = window.inner_width().ok()?.as_f64()?;
        let height = window.inner_height().ok()?.as_f64()?;
        let dpr = window.device_pixel_ratio();
        let dpr = if dpr > 0.0 { dpr } else { 1.0 };
        Some((width, height, dpr))
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    /// Overlay screens use both `active` and `hidden`
    fn show_screen(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = classes.toggle_with_force("active", visible);
            let _ = classes.toggle_with_force("hidden", !visible);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Sky Flap starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()
            .map_err(JsValue::from)?;

        let store = LocalStorage::new();
        let settings = Settings::load(&store);
        let best = BestScore::load(&store);

        let (css_w, css_h, dpr) = viewport().unwrap_or((
            canvas.client_width() as f64,
            canvas.client_height() as f64,
            1.0,
        ));
        let physical = (
            (css_w * dpr).round().max(1.0) as u32,
            (css_h * dpr).round().max(1.0) as u32,
        );
        let logical = (css_w as f32, css_h as f32);
        canvas.set_width(physical.0);
        canvas.set_height(physical.1);

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(logical.0, logical.1, Tuning::default(), seed, best.value);
        log::info!("Session seed: {}", seed);

        let sprite_image = if settings.sprites {
            load_sprite_image()
        } else {
            None
        };
        let sprite_status = if sprite_image.is_some() {
            SpriteStatus::Loading
        } else {
            SpriteStatus::Disabled
        };

        let render_state = match init_renderer(&canvas, physical, logical).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("WebGPU unavailable, nothing will be drawn: {}", e);
                None
            }
        };

        let game = Rc::new(RefCell::new(Game {
            state,
            render_state,
            audio: AudioManager::new(settings.effective_volume()),
            best,
            settings,
            store,
            input: TickInput::default(),
            sprite_image,
            sprite_status,
            loop_scheduled: false,
            last_hud: None,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());
        setup_resize(canvas, game.clone());

        game.borrow_mut().sync_hud();
        ensure_loop(&game);

        log::info!("Sky Flap running!");
        Ok(())
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        physical: (u32, u32),
        logical: (f32, f32),
    ) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, physical, logical)
            .await
            .map_err(|e| e.to_string())
    }

    /// Schedule a frame unless one is already pending
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_scheduled {
                return;
            }
            g.loop_scheduled = true;
        }
        request_animation_frame(game.clone());
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
        let status = {
            let mut g = game.borrow_mut();
            let status = g.frame(time);
            if status == FrameStatus::Halt {
                g.loop_scheduled = false;
            }
            status
        };

        if status == FrameStatus::Continue {
            request_animation_frame(game);
        }
    }

    fn dispatch(game: &Rc<RefCell<Game>>, action: InputAction) {
        let wake = game.borrow_mut().handle_action(action, now_ms());
        if wake {
            ensure_loop(game);
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(action) = action_for_key(&event.code()) else {
                    return;
                };
                // Held keys would flip a toggle back and forth
                if action.changes_settings() && event.repeat() {
                    return;
                }
                if should_prevent_default(action, game.borrow().state.phase) {
                    event.prevent_default();
                }
                dispatch(&game, action);
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&game, action_for_pointer());
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch; non-passive so the page does not scroll or zoom
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch(&game, action_for_pointer());
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    fn on_click(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        handler: fn(&mut Game, f64) -> bool,
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{} button", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            // Keep the click away from the canvas trigger
            event.stop_propagation();
            let wake = handler(&mut game.borrow_mut(), now_ms());
            if wake {
                ensure_loop(&game);
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "start-btn", game.clone(), |g, now| {
            g.handle_action(InputAction::Start, now)
        });
        on_click(document, "restart-btn", game.clone(), Game::restart);
        on_click(document, "pause-btn", game.clone(), |g, now| {
            g.handle_action(InputAction::TogglePause, now)
        });
        on_click(document, "resume-btn", game, |g, now| {
            g.handle_action(InputAction::TogglePause, now)
        });
    }

    /// Pause when the tab is hidden
    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() != web_sys::VisibilityState::Hidden {
                return;
            }
            let mut g = game.borrow_mut();
            if g.state.phase == GamePhase::Running {
                g.handle_action(InputAction::TogglePause, now_ms());
                log::info!("Auto-paused (tab hidden)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use serde::Serialize;

    use sky_flap::consts::NOMINAL_FRAME_MS;
    use sky_flap::persistence::MemoryStore;
    use sky_flap::sim::{FrameStatus, GameEvent, GamePhase, GameState, TickInput, frame};
    use sky_flap::{BestScore, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "sky-flap")]
    #[command(about = "Run a headless Sky Flap session and report the result")]
    pub struct Cli {
        /// Seed for obstacle placement
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Frames to simulate at most
        #[arg(long, default_value_t = 3_600)]
        frames: u64,
        /// Simulated time between frames in milliseconds
        #[arg(long, default_value_t = NOMINAL_FRAME_MS)]
        frame_ms: f64,
        #[arg(long, default_value_t = 400.0)]
        width: f32,
        #[arg(long, default_value_t = 600.0)]
        height: f32,
        /// JSON file overriding gameplay tuning
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Let the autopilot flap
        #[arg(long, default_value_t = false)]
        autopilot: bool,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        frames: u64,
        phase: String,
        score: u32,
        best: u32,
        flaps: u32,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Tuning::from_json(&json).with_context(|| format!("loading tuning from {}", path.display()))
    }

    pub fn run(cli: Cli) -> Result<()> {
        if !(cli.frame_ms.is_finite() && cli.frame_ms > 0.0) {
            bail!("--frame-ms must be a positive number, got {}", cli.frame_ms);
        }
        if !(cli.width > 0.0 && cli.height > 0.0) {
            bail!("screen size must be positive, got {}x{}", cli.width, cli.height);
        }
        let tuning = load_tuning(cli.tuning.as_ref())?;

        let mut store = MemoryStore::new();
        let mut best = BestScore::load(&store);
        let mut state = GameState::new(cli.width, cli.height, tuning, cli.seed, best.value);
        let input = TickInput {
            flap: false,
            autopilot: cli.autopilot,
        };

        let mut now = 0.0;
        let mut flaps = 0;
        state.start(now);
        for _ in 0..cli.frames {
            now += cli.frame_ms;
            let status = frame(&mut state, &input, now);
            for event in state.drain_events() {
                match event {
                    GameEvent::Flap => flaps += 1,
                    GameEvent::Scored { score } => log::debug!("Scored {} at frame {}", score, state.frames),
                    GameEvent::GameOver { score, .. } => {
                        best.submit(score, &mut store);
                    }
                }
            }
            if status == FrameStatus::Halt {
                break;
            }
        }

        if state.phase == GamePhase::Running {
            log::info!("Frame limit reached with the session still running");
        }
        let summary = RunSummary {
            seed: cli.seed,
            frames: state.frames,
            phase: format!("{:?}", state.phase),
            score: state.score,
            best: best.value,
            flaps,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run(headless::Cli::parse())
}
