// Host-side tests for page wiring constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use std::collections::HashSet;

#[test]
fn element_ids_are_unique() {
    let ids = [
        CANVAS_ID,
        DIRECTION_BUTTON_ID,
        COLOR_MODE_LABEL_ID,
        HOME_IMPORT_BUTTON_ID,
        HOME_IMPORT_INPUT_ID,
        HOME_LOAD_LOCAL_BUTTON_ID,
        HOME_STATUS_ID,
        HOME_COUNTDOWN_ID,
        EDITOR_PLAY_BUTTON_ID,
        EDITOR_RECORD_BUTTON_ID,
        EDITOR_CLEAR_BUTTON_ID,
        EDITOR_SAVE_LOCAL_BUTTON_ID,
        EDITOR_LOAD_LOCAL_BUTTON_ID,
        EDITOR_EXPORT_BUTTON_ID,
        EDITOR_IMPORT_BUTTON_ID,
        EDITOR_IMPORT_INPUT_ID,
        EDITOR_STATUS_ID,
        EDITOR_TIMELINE_ID,
    ];
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| !id.starts_with('#')));
}

#[test]
fn exported_edits_point_at_the_analysed_track() {
    assert_eq!(TRACK_AUDIO_URL, flock_core::constants::EDITS_AUDIO_PATH);
    assert_ne!(TRACK_AUDIO_URL, AMBIENT_AUDIO_URL);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn timing_and_colors_are_in_range() {
    assert!(EXPORT_URL_REVOKE_MS > 0);
    assert!(STATUS_REFRESH_SEC > 0.0 && STATUS_REFRESH_SEC < 1.0);
    assert!(LINE_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
    assert!(SKY_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
    assert!(DECOR_SKY_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
}
