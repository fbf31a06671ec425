//! Invaders Overlay entry point
//!
//! On wasm this injects the overlay into the host page, wires input and the
//! animation loop, and exposes `window.SpaceInvadersGame`. The native build
//! runs a short headless session so the simulation can be exercised without
//! a browser.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use invaders_overlay::config::GameConfig;
    use invaders_overlay::input::InputAdapter;
    use invaders_overlay::license::{self, LICENSE_SERVER};
    use invaders_overlay::renderer::Renderer;
    use invaders_overlay::shell::{self, Shell};
    use invaders_overlay::sim::{GameEvent, GameState, Phase, tick};
    use invaders_overlay::{PLUGIN_VERSION, canvas_size};

    /// Everything one widget instance owns.
    struct App {
        config: GameConfig,
        state: GameState,
        input: InputAdapter,
        shell: Shell,
        renderer: Option<Renderer>,
        running: bool,
        /// Bumped on every session (re)start so stale rAF chains die off
        loop_id: u64,
    }

    type AppHandle = Rc<RefCell<App>>;

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Space Invaders overlay v{PLUGIN_VERSION} loading");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document; aborting");
            return;
        };
        if document.body().is_none() {
            log::error!("no <body> mount point; aborting this widget instance");
            return;
        }

        let params = script_params(&document);
        let mut config =
            GameConfig::from_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let viewport_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::from(config.width)) as f32;
        let viewport_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::from(config.height)) as f32;
        (config.width, config.height) = canvas_size(viewport_w, viewport_h);

        let shell = match Shell::mount(&document, &config) {
            Ok(shell) => shell,
            Err(e) => {
                log::error!("failed to mount overlay: {e:?}");
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, &config);
        log::info!("session seeded: {seed}");

        let input = InputAdapter::new(&config);
        let auto_start = config.auto_start;
        let show_prompt = config.show_prompt;
        let app: AppHandle = Rc::new(RefCell::new(App {
            config,
            state,
            input,
            shell,
            renderer: None,
            running: false,
            loop_id: 0,
        }));

        if let Err(e) = expose_api(app.clone()) {
            log::warn!("could not expose window.SpaceInvadersGame: {e:?}");
        }
        hook_button(&document, shell::CLOSE_ID, app.clone(), skip_action);

        // Entitlement check is fire-and-forget; it only flags the watermark.
        {
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let entitlement =
                    license::check_entitlement("SpaceInvaders", PLUGIN_VERSION, LICENSE_SERVER)
                        .await;
                if !entitlement.licensed {
                    let _ = app.borrow().shell.show_watermark();
                }
            });
        }

        if auto_start {
            enter_gameplay(&app, false);
        } else if show_prompt {
            let prompt = {
                let a = app.borrow();
                a.shell.show_prompt(&a.config)
            };
            if let Err(e) = prompt {
                log::error!("failed to build prompt: {e:?}");
                return;
            }
            hook_button(&document, shell::PROMPT_START_ID, app.clone(), start_action);
            hook_button(&document, shell::PROMPT_SKIP_ID, app.clone(), skip_action);
        }

        log::info!("Space Invaders overlay v{PLUGIN_VERSION} ready");
    }

    /// Read configuration from this script tag's URL query string.
    fn script_params(document: &Document) -> Vec<(String, String)> {
        const KEYS: [&str; 9] = [
            "autoStart",
            "shooterIcon",
            "invaderImage",
            "bgColor",
            "fontColor",
            "difficulty",
            "showTechTable",
            "showPrompt",
            "customTechs",
        ];

        let mut out = Vec::new();
        let Some(script) = document.current_script() else {
            return out;
        };
        let Ok(url) = web_sys::Url::new(&script.src()) else {
            return out;
        };
        let params = url.search_params();
        for key in KEYS {
            if let Some(value) = params.get(key) {
                out.push((key.to_string(), value));
            }
        }
        out
    }

    /// Swap to the gameplay layer and (re)start the animation loop.
    fn enter_gameplay(app: &AppHandle, replay: bool) {
        let canvas = {
            let mut a = app.borrow_mut();
            let canvas = match a.shell.show_game(&a.config) {
                Ok(canvas) => canvas,
                Err(e) => {
                    log::error!("failed to build game layer: {e:?}");
                    return;
                }
            };
            match Renderer::new(&canvas, &a.config) {
                Ok(renderer) => a.renderer = Some(renderer),
                Err(e) => {
                    log::error!("canvas 2d unavailable: {e:?}");
                    return;
                }
            }
            a.input.clear();
            if replay {
                a.state.replay(&a.config);
            } else {
                a.state.start(&a.config);
            }
            a.running = a.state.phase == Phase::Playing;
            a.loop_id += 1;
            canvas
        };
        attach_canvas_listeners(&canvas, app);
        let id = app.borrow().loop_id;
        request_frame(app.clone(), id);
    }

    fn start_action(app: &AppHandle) {
        if app.borrow().running {
            return;
        }
        enter_gameplay(app, false);
    }

    /// Public `reset`: replay from an end screen, otherwise a full restart.
    fn reset_action(app: &AppHandle) {
        let replay = matches!(
            app.borrow().state.phase,
            Phase::WaveCleared | Phase::GameOver
        );
        app.borrow_mut().running = false;
        enter_gameplay(app, replay);
    }

    fn skip_action(app: &AppHandle) {
        let mut a = app.borrow_mut();
        a.running = false;
        a.state.skip();
        a.shell.hide();
    }

    fn cleanup_action(app: &AppHandle) {
        let mut a = app.borrow_mut();
        a.running = false;
        a.state.skip();
        a.renderer = None;
        a.shell.remove();
    }

    fn request_frame(app: AppHandle, id: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| game_loop(app, id));
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: AppHandle, id: u64) {
        let (events, ended) = {
            let mut a = app.borrow_mut();
            if !a.running || a.loop_id != id {
                return;
            }
            let input = a.input.snapshot();
            let events = tick(&mut a.state, &a.config, &input);
            if let Some(renderer) = &a.renderer {
                renderer.render(&a.state, &a.config);
            }
            let ended = a.state.phase != Phase::Playing;
            if ended {
                a.running = false;
            }
            (events, ended)
        };

        {
            let a = app.borrow();
            for event in &events {
                if let GameEvent::BadgeUnlocked(name) = event {
                    let icon = a
                        .config
                        .badges
                        .iter()
                        .find(|badge| &badge.name == name)
                        .map(|badge| badge.icon.clone())
                        .unwrap_or_default();
                    a.shell.flash_badge_unlock(name, &icon);
                }
            }
            if ended {
                let cleared = a.state.phase == Phase::WaveCleared;
                if let Err(e) = a.shell.show_game_over(&a.state, &a.config, cleared) {
                    log::error!("failed to build end screen: {e:?}");
                }
            }
        }

        if ended {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                hook_button(&document, shell::REPLAY_ID, app.clone(), reset_action);
                hook_button(&document, shell::GAMEOVER_CLOSE_ID, app.clone(), skip_action);
            }
            return;
        }
        request_frame(app, id);
    }

    fn hook_button(
        document: &Document,
        element_id: &str,
        app: AppHandle,
        action: fn(&AppHandle),
    ) {
        let Some(button) = document.get_element_by_id(element_id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
            action(&app);
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn attach_canvas_listeners(canvas: &HtmlCanvasElement, app: &AppHandle) {
        // Mouse move: aim relative to the canvas
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                app.borrow_mut().input.pointer_moved(event.offset_x() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down: one discrete shot, then auto-fire while held
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    app.borrow_mut().input.press();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    app.borrow_mut().input.release();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: drag aims and holds fire, tap fires once
        {
            let app = app.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_ref.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    app.borrow_mut().input.touch_moved(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_ref.get_bounding_client_rect();
                    a.input.pointer_moved(touch.client_x() as f32 - rect.left() as f32);
                }
                a.input.press();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(TouchEvent)>::new(move |_event: TouchEvent| {
                app.borrow_mut().input.release();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Attach the host-facing API object as `window.SpaceInvadersGame`.
    fn expose_api(app: AppHandle) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let api = js_sys::Object::new();

        set_api_action(&api, "start", app.clone(), start_action)?;
        set_api_action(&api, "skip", app.clone(), skip_action)?;
        set_api_action(&api, "reset", app.clone(), reset_action)?;
        set_api_action(&api, "cleanup", app.clone(), cleanup_action)?;

        let get_score = {
            let app = app.clone();
            Closure::<dyn FnMut() -> f64>::new(move || f64::from(app.borrow().state.score))
        };
        js_sys::Reflect::set(&api, &"getScore".into(), get_score.as_ref())?;
        get_score.forget();

        let get_badges = {
            let app = app.clone();
            Closure::<dyn FnMut() -> js_sys::Array>::new(move || {
                app.borrow()
                    .state
                    .unlocked
                    .iter()
                    .map(|name| JsValue::from_str(name))
                    .collect::<js_sys::Array>()
            })
        };
        js_sys::Reflect::set(&api, &"getBadges".into(), get_badges.as_ref())?;
        get_badges.forget();

        js_sys::Reflect::set(&window, &"SpaceInvadersGame".into(), &api)?;
        Ok(())
    }

    fn set_api_action(
        api: &js_sys::Object,
        name: &str,
        app: AppHandle,
        action: fn(&AppHandle),
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut()>::new(move || action(&app));
        js_sys::Reflect::set(api, &name.into(), closure.as_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    use invaders_overlay::{FrameInput, GameConfig, GameState, InputAdapter, Phase, tick};

    // Headless demo session: hold fire at the canvas center on medium and
    // report how it ends.
    let config = GameConfig::default();
    let mut state = GameState::new(0x5EED, &config);
    let mut input = InputAdapter::new(&config);
    state.start(&config);
    input.press();

    let mut frames = 0u32;
    while state.phase == Phase::Playing && frames < 10_000 {
        let snapshot: FrameInput = input.snapshot();
        tick(&mut state, &config, &snapshot);
        frames += 1;
    }

    log::info!("headless session finished after {frames} frames");
    println!(
        "{frames} frames | wave {} | score {} | {:?} | badges: {:?}",
        state.wave, state.score, state.phase, state.unlocked
    );
}
