//! Calavera memory core crate.
//!
//! A Simon-style pattern game: every round one more marigold / skull / candle /
//! cross cue is appended and the whole sequence is replayed; the player has to
//! repeat it exactly. Clearing all rounds unlocks the clue overlay.
//!
//! The game logic lives in [`engine`] and is plain Rust (no browser needed,
//! drive it with [`Timeline`] on the host). The `web` module binds it to the
//! page: DOM buttons, Web Audio tones and `setTimeout` timers.

use wasm_bindgen::prelude::*;

pub mod engine;
mod error;
#[cfg(feature = "console_log")]
pub mod logging;
mod web;

pub use engine::{
    Command, Cue, CueSource, GameConfig, GameState, Outcome, Phase, Presenter, RandomCues,
    Scheduler, ScriptedCues, SequenceEngine, SessionToken, Timeline, Timer, TimerKind, dispatch,
};
pub use error::{AdapterError, ConfigError, CueParseError};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    logging::init();
}

// -----------------------------------------------------------------------------
// Page entrypoints
// -----------------------------------------------------------------------------

/// Wire the page with the default configuration.
#[wasm_bindgen]
pub fn mount() -> Result<(), JsValue> {
    web::mount(GameConfig::default())
}

/// Wire the page with a JSON config override, e.g. `{"max_rounds": 5}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn mount_with_config(json: &str) -> Result<(), JsValue> {
    web::mount(GameConfig::from_json(json)?)
}

/// Start (or restart) a game, mounting with defaults first if needed.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    if !web::is_mounted() {
        mount()?;
    }
    Ok(web::start()?)
}

/// Press a cue by name. Unknown names are rejected before reaching the engine.
#[wasm_bindgen]
pub fn submit_cue(name: &str) -> Result<(), JsValue> {
    let cue: Cue = name.parse()?;
    Ok(web::submit(cue)?)
}

/// Close the clue overlay after a win.
#[wasm_bindgen]
pub fn dismiss_bonus() -> Result<(), JsValue> {
    Ok(web::dismiss()?)
}

/// Current game state as JSON, for debugging from the console.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn game_state_json() -> Result<String, JsValue> {
    let state = web::snapshot()?;
    serde_json::to_string(&state).map_err(|e| JsValue::from_str(&e.to_string()))
}
