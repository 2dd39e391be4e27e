//! Browser entry point

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent,
    MouseEvent, TouchEvent, Window,
};

use crate::audio::{ToneAudio, WebAudioSink};
use crate::game::Game;
use crate::haptics::NavigatorHaptics;
use crate::interstitial::LogAdHost;
use crate::persistence::LocalStorage;
use crate::renderer::CanvasRenderer;
use crate::sim::{GamePhase, TickInput, Viewport};
use crate::tuning::Tuning;

type WebGame = Game<LocalStorage, ToneAudio<WebAudioSink, Pcg32>, NavigatorHaptics, LogAdHost>;

/// Raw input gathered between frames
#[derive(Default)]
struct InputState {
    pointer_x: Option<f32>,
    left: bool,
    right: bool,
}

impl InputState {
    /// Input for this frame; the pointer sample is consumed
    fn take(&mut self) -> TickInput {
        TickInput {
            pointer_x: self.pointer_x.take(),
            left: self.left,
            right: self.right,
        }
    }
}

struct App {
    game: WebGame,
    renderer: CanvasRenderer,
    input: InputState,
}

fn web_window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn web_document() -> Result<Document, JsValue> {
    web_window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }

    log::info!("Cosmic Catcher starting...");

    let window = web_window()?;
    let document = web_document()?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("game-canvas")
        .ok_or_else(|| JsValue::from_str("no canvas"))?
        .dyn_into()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let view = viewport(&window);
    canvas.set_width(view.width as u32);
    canvas.set_height(view.height as u32);

    let seed = js_sys::Date::now() as u64;
    let game = Game::new(Tuning::default(), view, seed, LocalStorage::new());

    let settings = game.settings().clone();
    let audio = ToneAudio::new(
        WebAudioSink::new(settings.master_volume),
        Pcg32::seed_from_u64(seed ^ 0x9e37_79b9),
        settings.music_volume,
    );
    let game = game
        .with_audio(audio)
        .with_haptics(NavigatorHaptics)
        .with_ads(LogAdHost);

    let app = Rc::new(RefCell::new(App {
        game,
        renderer: CanvasRenderer::new(ctx),
        input: InputState::default(),
    }));

    setup_input_handlers(&window, app.clone())?;
    setup_buttons(&document, &canvas, app.clone())?;
    setup_visibility(&document, app.clone())?;

    update_hud(&app.borrow().game);
    request_animation_frame(app);

    log::info!("Cosmic Catcher running!");
    Ok(())
}

fn setup_input_handlers(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    // Mouse
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            app.borrow_mut().input.pointer_x = Some(event.client_x() as f32);
        });
        window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch drag, non-passive so the page does not scroll
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().get(0) {
                app.borrow_mut().input.pointer_x = Some(touch.client_x() as f32);
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        window.add_event_listener_with_callback_and_add_event_listener_options(
            "touchmove",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        closure.forget();
    }

    // Touch down jumps the target only mid-run
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            let mut a = app.borrow_mut();
            if a.game.phase() == GamePhase::Playing {
                if let Some(touch) = event.touches().get(0) {
                    a.input.pointer_x = Some(touch.client_x() as f32);
                }
            }
        });
        window.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard
    for (kind, pressed) in [("keydown", true), ("keyup", false)] {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" | "a" | "A" => a.input.left = pressed,
                "ArrowRight" | "d" | "D" => a.input.right = pressed,
                "Enter" | " " if pressed => {
                    a.game.start();
                    update_hud(&a.game);
                }
                "Escape" if pressed => {
                    a.game.home();
                    update_hud(&a.game);
                }
                _ => {}
            }
        });
        window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resize
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Ok(window) = web_window() else { return };
            let view = viewport(&window);
            app.borrow_mut().game.resize(view.width, view.height);
            if let Ok(document) = web_document() {
                if let Some(canvas) = document
                    .get_element_by_id("game-canvas")
                    .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
                {
                    canvas.set_width(view.width as u32);
                    canvas.set_height(view.height as u32);
                }
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Attach `handler` to the element with `id`, if the page has one
fn on_click(
    document: &Document,
    id: &str,
    app: &Rc<RefCell<App>>,
    handler: fn(&mut App),
) -> Result<(), JsValue> {
    let Some(el) = document.get_element_by_id(id) else {
        return Ok(());
    };
    let app = app.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
        event.stop_propagation();
        let mut a = app.borrow_mut();
        handler(&mut *a);
        update_hud(&a.game);
    });
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn setup_buttons(
    document: &Document,
    canvas: &HtmlCanvasElement,
    app: Rc<RefCell<App>>,
) -> Result<(), JsValue> {
    fn start(a: &mut App) {
        a.game.start();
    }
    fn home(a: &mut App) {
        a.game.home();
    }

    on_click(document, "screen-start", &app, start)?;
    on_click(document, "btn-restart", &app, start)?;
    on_click(document, "btn-home", &app, home)?;
    on_click(document, "btn-home-over", &app, home)?;
    on_click(document, "btn-sound", &app, |a| {
        a.game.toggle_sound();
    })?;
    on_click(document, "btn-vibe", &app, |a| {
        a.game.toggle_haptics();
    })?;

    // Tapping the playfield starts a run when no overlay is in the way
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
        let mut a = app.borrow_mut();
        if a.game.phase() != GamePhase::Playing {
            a.game.start();
            update_hud(&a.game);
        }
    });
    canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}

/// Browsers stop animation frames in hidden tabs; the game pauses and
/// restarts its timestamp baseline on return
fn setup_visibility(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    let document_clone = document.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
        let mut a = app.borrow_mut();
        a.game.visibility_changed(hidden);
        update_hud(&a.game);
        if hidden {
            log::info!("Auto-paused (tab hidden)");
        }
    });
    document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn request_animation_frame(app: Rc<RefCell<App>>) {
    let Ok(window) = web_window() else { return };
    let closure = Closure::once(move |time: f64| {
        game_loop(app, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(app: Rc<RefCell<App>>, time: f64) {
    {
        let mut a = app.borrow_mut();
        let App {
            game,
            renderer,
            input,
        } = &mut *a;
        let before = (game.phase(), game.score());
        game.frame(time, &input.take());
        game.render(renderer);
        if (game.phase(), game.score()) != before {
            update_hud(game);
        }
    }

    request_animation_frame(app);
}

/// Score text and overlay visibility
fn update_hud<S, A, H, D>(game: &Game<S, A, H, D>) {
    let Ok(document) = web_document() else { return };
    let set_text = |id: &str, text: &str| {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    };
    let show = |id: &str, visible: bool| {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    };

    let score = game.score().to_string();
    let best = game.high_score().to_string();
    set_text("score-display", &score);
    set_text("final-score", &score);
    set_text("start-highscore", &best);
    set_text("gameover-highscore", &best);
    set_text(
        "btn-sound",
        if game.settings().sound_enabled { "sound: on" } else { "sound: off" },
    );
    set_text(
        "btn-vibe",
        if game.settings().haptics_enabled { "vibe: on" } else { "vibe: off" },
    );

    show("screen-start", game.phase() == GamePhase::Idle);
    show("screen-gameover", game.phase() == GamePhase::GameOver);
}
