// Host-side tests for status and label text.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod ui {
    include!("../src/ui.rs");
}

use flock_core::AutoloadTick;
use ui::*;

#[test]
fn direction_label_follows_travel_sign() {
    assert_eq!(direction_label(1.0), "Direction: CW");
    assert_eq!(direction_label(-1.0), "Direction: CCW");
}

#[test]
fn record_button_names_the_next_step() {
    assert_eq!(record_button_label(false), "Start Recording");
    assert_eq!(record_button_label(true), "Stop Recording");
}

#[test]
fn countdown_shows_only_whole_seconds_left() {
    assert_eq!(countdown_text(AutoloadTick::Countdown(3)).as_deref(), Some("3"));
    assert_eq!(countdown_text(AutoloadTick::Countdown(1)).as_deref(), Some("1"));
    assert_eq!(countdown_text(AutoloadTick::Countdown(0)), None);
    assert_eq!(countdown_text(AutoloadTick::Idle), None);
    assert_eq!(countdown_text(AutoloadTick::Fire), None);
}

#[test]
fn home_status_names_the_source() {
    assert_eq!(
        home_loaded_status(&EditsSource::File("cut.json"), 4),
        "loaded 4 edits from cut.json"
    );
    assert_eq!(
        home_loaded_status(&EditsSource::LocalStorage, 2),
        "loaded 2 saved edits"
    );
    assert_eq!(
        home_loaded_status(&EditsSource::Default, 12),
        "loaded default edit (12 events)"
    );
}

#[test]
fn editor_status_names_imports() {
    assert_eq!(
        editor_loaded_status(&EditsSource::File("cut.json"), 4),
        "imported 4 edits from cut.json"
    );
    assert_eq!(
        editor_loaded_status(&EditsSource::LocalStorage, 2),
        "loaded 2 edits"
    );
}

#[test]
fn missing_saved_edits_wording_differs_per_page() {
    assert_eq!(no_saved_edits_status(true), "no saved edits in localStorage");
    assert_eq!(no_saved_edits_status(false), "no saved edits");
}
