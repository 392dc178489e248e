// Browser tests, run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use girassol::audio::web::WebAudio;
use girassol::audio::{AudioEngine, TrackId};
use girassol::{Scene, SceneConfig};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_scene_creates_the_canvas() {
    girassol::start_scene(Some(r#"{ "canvasId": "test-canvas", "seed": 1 }"#.into())).unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("test-canvas").is_some());
}

#[wasm_bindgen_test]
fn start_scene_rejects_bad_config() {
    assert!(girassol::start_scene(Some(r#"{ "bpm": -1 }"#.into())).is_err());
}

#[wasm_bindgen_test]
fn scene_paints_on_a_real_canvas() {
    use wasm_bindgen::JsCast;
    let doc = web_sys::window().unwrap().document().unwrap();
    let canvas: web_sys::HtmlCanvasElement = doc.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_width(320);
    canvas.set_height(240);
    let mut ctx: web_sys::CanvasRenderingContext2d =
        canvas.get_context("2d").unwrap().unwrap().dyn_into().unwrap();

    let mut scene = Scene::new(SceneConfig::default(), 320.0, 240.0, 4);
    let audio = WebAudio::new(5).unwrap();
    scene.attach_audio(AudioEngine::new(Box::new(audio), 100.0));
    scene.tick(&mut ctx);
    assert_eq!(scene.frame(), 1);
    assert_eq!(scene.audio().map(|a| a.current()), Some(TrackId::Ambient));
}
