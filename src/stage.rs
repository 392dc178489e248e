//! Browser wiring: canvas, DOM listeners, the animation loop and the poem
//! button. All state lives in a thread-local `Stage`; closures reach it
//! through `STAGE.with`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, Window};

use crate::audio::web::WebAudio;
use crate::audio::AudioEngine;
use crate::config::SceneConfig;
use crate::error::{Result, SceneError};
use crate::poem;
use crate::scene::Scene;

const POEM_IDLE_LABEL: &str = "✨ Gerar um Novo Poema";
const POEM_BUSY_LABEL: &str = "Gerando...";
const POEM_PLACEHOLDER: &str = "...";

struct Stage {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scene: Scene,
    config: SceneConfig,
    poem_pending: bool,
}

thread_local! {
    static STAGE: RefCell<Option<Stage>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn start(config: SceneConfig) -> Result<()> {
    let win = window().ok_or(SceneError::MissingGlobal("window"))?;
    let doc = win.document().ok_or(SceneError::MissingGlobal("document"))?;

    let canvas = find_or_create_canvas(&doc, &config.canvas_id)?;
    let (width, height) = viewport(&win);
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| SceneError::Js("2d context unavailable".into()))?
        .dyn_into()
        .map_err(|_| SceneError::Js("2d context has unexpected type".into()))?;

    let seed = initial_seed(&config, &win);
    log::info!("starting scene {width}x{height} with seed {seed}");
    let scene = Scene::new(config.clone(), width, height, seed);

    install_listeners(&win, &doc, &canvas, &config)?;
    STAGE.with(|s| {
        s.replace(Some(Stage { canvas, ctx, scene, config, poem_pending: false }));
    });
    start_loop();
    Ok(())
}

fn find_or_create_canvas(doc: &Document, id: &str) -> Result<HtmlCanvasElement> {
    if let Some(el) = doc.get_element_by_id(id) {
        return el
            .dyn_into()
            .map_err(|_| SceneError::MissingElement(format!("{id} (not a canvas)")));
    }
    let canvas: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| SceneError::Js("created element is not a canvas".into()))?;
    canvas.set_id(id);
    let body = doc.body().ok_or(SceneError::MissingGlobal("document.body"))?;
    body.append_child(&canvas)?;
    Ok(canvas)
}

fn viewport(win: &Window) -> (f64, f64) {
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}

fn initial_seed(config: &SceneConfig, win: &Window) -> u64 {
    if let Some(seed) = config.seed {
        return seed;
    }
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    win.performance().map(|p| (p.now() * 1000.0) as u64).unwrap_or(0)
}

fn install_listeners(win: &Window, doc: &Document, canvas: &HtmlCanvasElement, config: &SceneConfig) -> Result<()> {
    // Pointer position drives the sunflower heads.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            STAGE.with(|cell| {
                if let Some(stage) = cell.borrow_mut().as_mut() {
                    stage.scene.pointer_moved(evt.client_x() as f64, evt.client_y() as f64);
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            STAGE.with(|cell| {
                if let Some(stage) = cell.borrow_mut().as_mut() {
                    stage.scene.pointer_clicked(evt.client_x() as f64, evt.client_y() as f64);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let Some(win) = window() else { return };
            let (width, height) = viewport(&win);
            STAGE.with(|cell| {
                if let Some(stage) = cell.borrow_mut().as_mut() {
                    stage.canvas.set_width(width as u32);
                    stage.canvas.set_height(height as u32);
                    stage.scene.resize(width, height);
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Audio may only be created from a user gesture.
    match doc.get_element_by_id(&config.start_button_id) {
        Some(button) => {
            let overlay = doc.get_element_by_id(&config.overlay_id);
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                on_start(overlay.as_ref());
            }) as Box<dyn FnMut(_)>);
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        None => log::warn!("start button `{}` missing, scene stays idle", config.start_button_id),
    }

    match doc.get_element_by_id(&config.poem_button_id) {
        Some(button) => {
            button.set_text_content(Some(POEM_IDLE_LABEL));
            let target = button.clone();
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                on_poem_request(&target);
            }) as Box<dyn FnMut(_)>);
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        None => log::debug!("no poem button `{}`", config.poem_button_id),
    }
    Ok(())
}

fn on_start(overlay: Option<&Element>) {
    STAGE.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let Some(stage) = borrow.as_mut() else { return };
        if stage.scene.is_ready() {
            return;
        }
        // ambient + one loop per special track
        let backend = match WebAudio::new(1 + crate::audio::sequencer::SPECIALS.len()) {
            Ok(b) => b,
            Err(e) => {
                log::error!("could not start audio: {e}");
                return;
            }
        };
        stage.scene.attach_audio(AudioEngine::new(Box::new(backend), stage.config.bpm));
        if let Some(overlay) = overlay {
            overlay.set_attribute("style", "display:none").ok();
        }
    });
}

fn on_poem_request(button: &Element) {
    let endpoint = STAGE.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let stage = borrow.as_mut()?;
        if stage.poem_pending {
            return None;
        }
        stage.poem_pending = true;
        stage.scene.set_poem(vec![POEM_PLACEHOLDER.to_string()]);
        Some(stage.config.poem_endpoint.clone())
    });
    let Some(endpoint) = endpoint else { return };

    button.set_attribute("disabled", "").ok();
    button.set_text_content(Some(POEM_BUSY_LABEL));
    let button = button.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = poem::fetch_poem(&endpoint).await;
        STAGE.with(|cell| {
            if let Some(stage) = cell.borrow_mut().as_mut() {
                let lines = poem::or_fallback(result, &stage.config.fallback_poem);
                stage.scene.set_poem(lines);
                stage.poem_pending = false;
            }
        });
        button.remove_attribute("disabled").ok();
        button.set_text_content(Some(POEM_IDLE_LABEL));
    });
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        STAGE.with(|cell| {
            if let Some(stage) = cell.borrow_mut().as_mut() {
                let Stage { ctx, scene, .. } = stage;
                scene.tick(ctx);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    let Some(w) = window() else { return };
    if let Some(cb) = callback.borrow().as_ref() {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
