use thiserror::Error;
use wasm_bindgen::JsValue;

/// Rejected game configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("the cue set is empty")]
    EmptyCueSet,
    #[error("cue '{0}' appears more than once in the cue set")]
    DuplicateCue(&'static str),
    #[error("max_rounds must be at least 1")]
    NoRounds,
    #[cfg(feature = "serde_json")]
    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A cue name that is not part of the fixed alphabet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown cue '{0}' (expected marigold, skull, candle or cross)")]
pub struct CueParseError(pub String);

/// Failure inside a presentation / scheduling capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("no element with id '{0}' in the document")]
    MissingElement(String),
    #[error("browser environment unavailable: {0}")]
    NoBrowser(&'static str),
    #[error("audio playback failed: {0}")]
    Audio(String),
    #[error("javascript call failed: {0}")]
    Js(String),
    #[error("game is not mounted")]
    NotMounted,
}

impl AdapterError {
    pub(crate) fn js(value: JsValue) -> Self {
        AdapterError::Js(format!("{value:?}"))
    }
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<CueParseError> for JsValue {
    fn from(err: CueParseError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<AdapterError> for JsValue {
    fn from(err: AdapterError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
