//! Error types. Nothing in the scene is fatal: `SceneError` only escapes the
//! wasm entry point, `PoemError` is always folded into fallback text.

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("browser global `{0}` is unavailable")]
    MissingGlobal(&'static str),

    #[error("element `{0}` not found")]
    MissingElement(String),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("audio unavailable: {0}")]
    Audio(String),

    #[error("invalid scene config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid scene config: {0}")]
    ConfigValue(String),
}

impl From<JsValue> for SceneError {
    fn from(value: JsValue) -> Self {
        SceneError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<SceneError> for JsValue {
    fn from(err: SceneError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Failure modes of the poem request. All of them end up as fallback text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoemError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contained no poem lines")]
    Empty,
}

pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_mention_config() {
        let err: SceneError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("invalid scene config"));
    }

    #[test]
    fn test_poem_status_message() {
        assert_eq!(PoemError::Status(502).to_string(), "server answered with status 502");
    }
}
