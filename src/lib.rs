//! Girassol core crate.
//!
//! A night garden on a canvas: sunflowers turn toward the pointer, cats sit
//! between them and sing when clicked, hearts float up, and a typewriter
//! writes a greeting (or a freshly fetched poem) across the sky. The scene
//! and audio logic are plain Rust behind the `Painter` and `SoundBackend`
//! traits; `start_scene()` wires them to the browser.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod config;
pub mod error;
pub mod paint;
pub mod poem;
pub mod scene;
pub mod typewriter;

mod stage;

pub use config::SceneConfig;
pub use error::{PoemError, SceneError};
pub use scene::Scene;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) is harmless.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Entry point called by the page. `config_json` may be a partial
/// `SceneConfig` object in camelCase; missing fields use the defaults.
#[wasm_bindgen]
pub fn start_scene(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) if !json.trim().is_empty() => SceneConfig::from_json(json)?,
        _ => SceneConfig::default(),
    };
    stage::start(config)?;
    Ok(())
}
