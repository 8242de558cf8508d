// Browser-only checks, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use calavera_memory::{Cue, CueSource, GameConfig, RandomCues};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn entropy_source_works_in_browser() {
    let mut source = RandomCues::from_entropy();
    let config = GameConfig::default();
    for _ in 0..16 {
        assert!(config.cues.contains(&source.next_cue(&config.cues)));
    }
}

#[wasm_bindgen_test]
fn unknown_cue_is_rejected_at_the_boundary() {
    assert!(calavera_memory::submit_cue("tamale").is_err());
    assert!("skull".parse::<Cue>().is_ok());
}

#[wasm_bindgen_test]
fn start_without_page_elements_fails_fast() {
    // The test page has no game buttons, so mounting must report the missing element.
    assert!(calavera_memory::start_game().is_err());
}
