// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use flock_core::SessionRole;
use input::*;

fn press(code: &str) -> KeyPress<'_> {
    KeyPress {
        code,
        ..KeyPress::default()
    }
}

#[test]
fn page_role_reads_editor_marker() {
    assert_eq!(page_role(Some("editor")), SessionRole::Editor);
    assert_eq!(page_role(Some(" Editor ")), SessionRole::Editor);
}

#[test]
fn page_role_defaults_to_home() {
    assert_eq!(page_role(None), SessionRole::Home);
    assert_eq!(page_role(Some("")), SessionRole::Home);
    assert_eq!(page_role(Some("home")), SessionRole::Home);
    assert_eq!(page_role(Some("edit")), SessionRole::Home);
}

#[test]
fn text_entry_tags_keep_their_keys() {
    for tag in ["INPUT", "TEXTAREA", "SELECT", "BUTTON", "A", "input"] {
        assert!(is_text_entry_tag(tag), "{tag}");
    }
    for tag in ["DIV", "CANVAS", "BODY", "ASIDE"] {
        assert!(!is_text_entry_tag(tag), "{tag}");
    }
}

#[test]
fn plain_press_on_the_page_dispatches() {
    let mut key = press("KeyH");
    assert!(should_dispatch(&key));
    key.target_tag = Some("CANVAS");
    assert!(should_dispatch(&key));
}

#[test]
fn repeats_and_modifiers_are_ignored() {
    let base = press("KeyH");
    assert!(!should_dispatch(&KeyPress { repeat: true, ..base }));
    assert!(!should_dispatch(&KeyPress { ctrl: true, ..base }));
    assert!(!should_dispatch(&KeyPress { meta: true, ..base }));
    assert!(!should_dispatch(&KeyPress { alt: true, ..base }));
}

#[test]
fn presses_inside_form_controls_are_ignored() {
    let base = press("Space");
    assert!(!should_dispatch(&KeyPress {
        target_tag: Some("INPUT"),
        ..base
    }));
    assert!(!should_dispatch(&KeyPress {
        target_tag: Some("BUTTON"),
        ..base
    }));
    assert!(!should_dispatch(&KeyPress {
        target_tag: Some("DIV"),
        target_editable: true,
        ..base
    }));
}

#[test]
fn only_space_suppresses_the_default() {
    assert!(suppresses_default("Space"));
    assert!(!suppresses_default("KeyH"));
    assert!(!suppresses_default("Enter"));
}
