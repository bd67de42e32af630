use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced while wiring an engine to a browser canvas.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no canvas element is attached to the grid background")]
    MissingCanvas,
    #[error("canvas does not provide a 2d rendering context")]
    ContextUnavailable,
    #[error("browser call failed: {0}")]
    Js(String),
    #[error("invalid grid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for EngineError {
    fn from(value: JsValue) -> Self {
        EngineError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("`{0}` is not an rgb()/rgba() color")]
    Malformed(String),
}
