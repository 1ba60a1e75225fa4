// Status and label text shown by the page chrome.

use flock_core::AutoloadTick;

pub const HOME_IDLE_STATUS: &str = "import edit json to start playback";
pub const EDITOR_READY_STATUS: &str = "ready";

#[inline]
pub fn direction_label(travel_direction: f32) -> &'static str {
    if travel_direction >= 0.0 {
        "Direction: CW"
    } else {
        "Direction: CCW"
    }
}

#[inline]
pub fn record_button_label(recording: bool) -> &'static str {
    if recording {
        "Stop Recording"
    } else {
        "Start Recording"
    }
}

/// Text for the centred countdown, `None` hides it.
#[inline]
pub fn countdown_text(tick: AutoloadTick) -> Option<String> {
    match tick {
        AutoloadTick::Countdown(secs) if secs > 0 => Some(secs.to_string()),
        _ => None,
    }
}

/// Where a set of edits came from, for the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditsSource<'a> {
    File(&'a str),
    LocalStorage,
    Default,
}

pub fn home_loaded_status(source: &EditsSource<'_>, count: usize) -> String {
    match source {
        EditsSource::File(name) => format!("loaded {count} edits from {name}"),
        EditsSource::LocalStorage => format!("loaded {count} saved edits"),
        EditsSource::Default => format!("loaded default edit ({count} events)"),
    }
}

pub fn editor_loaded_status(source: &EditsSource<'_>, count: usize) -> String {
    match source {
        EditsSource::File(name) => format!("imported {count} edits from {name}"),
        EditsSource::LocalStorage | EditsSource::Default => format!("loaded {count} edits"),
    }
}

#[inline]
pub fn no_saved_edits_status(home: bool) -> &'static str {
    if home {
        "no saved edits in localStorage"
    } else {
        "no saved edits"
    }
}
