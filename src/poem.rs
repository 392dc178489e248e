//! Client for the remote poem generator.
//!
//! The endpoint answers `GET` with `{ "poem": "line\nline\n..." }`. Every
//! failure is reported as a `PoemError`; callers fold it into fallback text
//! with [`or_fallback`].

use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::error::PoemError;

#[derive(Debug, Deserialize)]
struct PoemResponse {
    poem: Option<String>,
}

/// Splits on newlines, dropping lines that are blank. Kept lines are not trimmed.
pub fn split_lines(poem: &str) -> Vec<String> {
    poem.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn parse_poem(body: &str) -> Result<Vec<String>, PoemError> {
    let response: PoemResponse =
        serde_json::from_str(body).map_err(|e| PoemError::Malformed(e.to_string()))?;
    let poem = response
        .poem
        .ok_or_else(|| PoemError::Malformed("missing `poem` field".into()))?;
    let lines = split_lines(&poem);
    if lines.is_empty() {
        return Err(PoemError::Empty);
    }
    Ok(lines)
}

pub fn or_fallback(result: Result<Vec<String>, PoemError>, fallback: &[String]) -> Vec<String> {
    match result {
        Ok(lines) => lines,
        Err(e) => {
            log::warn!("poem request failed, showing fallback: {e}");
            fallback.to_vec()
        }
    }
}

fn network(value: wasm_bindgen::JsValue) -> PoemError {
    PoemError::Network(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

pub async fn fetch_poem(endpoint: &str) -> Result<Vec<String>, PoemError> {
    let window = web_sys::window().ok_or_else(|| PoemError::Network("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(endpoint))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !response.ok() {
        return Err(PoemError::Status(response.status()));
    }
    let text = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?;
    let body = text
        .as_string()
        .ok_or_else(|| PoemError::Malformed("body is not text".into()))?;
    parse_poem(&body)
}
