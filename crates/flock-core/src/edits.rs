//! Recording and replaying timed key edits against the track clock.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::constants::{
    HOME_AUTOLOAD_DELAY_MS, HOME_COUNTDOWN_WINDOW_MS, PLAYBACK_SEEK_TOLERANCE_MS,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    pub at_ms: u64,
    pub key: String,
}

impl EditEvent {
    pub fn new(at_ms: u64, key: impl Into<String>) -> Self {
        Self {
            at_ms,
            key: key.into(),
        }
    }
}

/// Snapshot of the track element at frame time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackClock {
    pub position_sec: f64,
    pub playing: bool,
}

impl PlaybackClock {
    pub fn position_ms(&self) -> u64 {
        (self.position_sec.max(0.0) * 1000.0).round() as u64
    }
}

/// `m:ss.mmm`.
pub fn format_timeline_ms(ms: u64) -> String {
    let m = ms / 60_000;
    let s = (ms % 60_000) / 1000;
    let frac = ms % 1000;
    format!("{m}:{s:02}.{frac:03}")
}

/// Numbered listing sorted by time, then key. Empty lists say so.
pub fn timeline_text(events: &[EditEvent]) -> String {
    if events.is_empty() {
        return "No edits yet.".to_string();
    }
    let mut sorted: Vec<&EditEvent> = events.iter().collect();
    sorted.sort_by(|a, b| a.at_ms.cmp(&b.at_ms).then_with(|| a.key.cmp(&b.key)));
    sorted
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{:04}  {}  {}", i + 1, format_timeline_ms(e.at_ms), e.key))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Clone, Debug, Default)]
pub struct EditRecorder {
    recording: bool,
    events: Vec<EditEvent>,
}

impl EditRecorder {
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn set_recording(&mut self, on: bool) {
        self.recording = on;
    }

    pub fn toggle_recording(&mut self) -> bool {
        self.recording = !self.recording;
        self.recording
    }

    /// Append `key` at the track position. Only while recording and the
    /// track is audibly playing.
    pub fn record(&mut self, key: &str, clock: PlaybackClock) -> bool {
        if !self.recording || !clock.playing {
            return false;
        }
        self.events.push(EditEvent::new(clock.position_ms(), key));
        true
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn replace(&mut self, events: Vec<EditEvent>) {
        self.events = events;
    }

    pub fn events(&self) -> &[EditEvent] {
        &self.events
    }

    pub fn timeline_text(&self) -> String {
        timeline_text(&self.events)
    }

    /// `audio playing | recording | edits N | t m:ss.mmm[ | extra]`.
    pub fn status_line(&self, clock: PlaybackClock, extra: &str) -> String {
        let play = if clock.playing { "playing" } else { "stopped" };
        let rec = if self.recording { "recording" } else { "idle" };
        let mut line = format!(
            "audio {play} | {rec} | edits {} | t {}",
            self.events.len(),
            format_timeline_ms(clock.position_ms())
        );
        if !extra.is_empty() {
            line.push_str(" | ");
            line.push_str(extra);
        }
        line
    }
}

/// Monotonic read position into the sorted event list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    pub next_index: usize,
    pub last_observed_ms: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct EditPlayer {
    events: Vec<EditEvent>,
    cursor: PlaybackCursor,
    armed: bool,
}

impl EditPlayer {
    /// Load `events` (sorted here) and arm playback when non-empty.
    pub fn start(&mut self, mut events: Vec<EditEvent>) {
        events.sort_by_key(|e| e.at_ms);
        self.armed = !events.is_empty();
        self.events = events;
        self.cursor = PlaybackCursor::default();
        log::info!("[edits] playback armed with {} events", self.events.len());
    }

    pub fn stop(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_complete(&self) -> bool {
        !self.events.is_empty() && self.cursor.next_index >= self.events.len()
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn events(&self) -> &[EditEvent] {
        &self.events
    }

    /// Indices of every event due at `clock`, advancing the cursor past them.
    /// A backwards jump beyond the tolerance rewinds the cursor first.
    pub fn poll(&mut self, clock: PlaybackClock) -> Range<usize> {
        let start = self.cursor.next_index;
        if !self.armed || !clock.playing {
            return start..start;
        }
        let now_ms = clock.position_ms();
        if let Some(last) = self.cursor.last_observed_ms {
            if now_ms + PLAYBACK_SEEK_TOLERANCE_MS < last {
                log::debug!("[edits] seek back {} -> {} ms, cursor reset", last, now_ms);
                self.cursor.next_index = 0;
            }
        }
        self.cursor.last_observed_ms = Some(now_ms);

        let start = self.cursor.next_index;
        let due = self.events[start..]
            .iter()
            .take_while(|e| e.at_ms <= now_ms)
            .count();
        self.cursor.next_index = start + due;
        start..self.cursor.next_index
    }

    pub fn status_text(&self) -> String {
        let total = self.events.len();
        if self.is_complete() {
            format!("playback complete ({total} edits)")
        } else {
            format!("playing edits {}/{}", self.cursor.next_index, total)
        }
    }
}

/// Which page the app is running as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionRole {
    /// Replays imported, saved or default edits.
    Home,
    /// Records new edits.
    Editor,
}

#[derive(Clone, Debug)]
pub struct EditSession {
    pub role: SessionRole,
    pub recorder: EditRecorder,
    pub player: EditPlayer,
    pub autoload: HomeAutoload,
}

impl EditSession {
    pub fn new(role: SessionRole) -> Self {
        Self {
            role,
            recorder: EditRecorder::default(),
            player: EditPlayer::default(),
            autoload: HomeAutoload::new(role == SessionRole::Home),
        }
    }

    /// Record a key press if this is the editor.
    pub fn record(&mut self, key: &str, clock: PlaybackClock) -> bool {
        self.role == SessionRole::Editor && self.recorder.record(key, clock)
    }

    /// Playback only drives the home page.
    pub fn poll_playback(&mut self, clock: PlaybackClock) -> Range<usize> {
        if self.role != SessionRole::Home {
            let idle = self.player.cursor().next_index;
            return idle..idle;
        }
        self.player.poll(clock)
    }

    /// Start playback of user-provided edits, cancelling the default autoload.
    pub fn load_custom(&mut self, events: Vec<EditEvent>) {
        self.autoload.cancel();
        self.player.start(events);
    }
}

/// Home page countdown before falling back to the bundled default edits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomeAutoload {
    pending: bool,
    elapsed_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AutoloadTick {
    Idle,
    /// Whole seconds left, shown during the final window.
    Countdown(u32),
    /// Fire the default fetch now.
    Fire,
}

impl HomeAutoload {
    pub fn new(pending: bool) -> Self {
        Self {
            pending,
            elapsed_ms: 0.0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn tick(&mut self, dt_ms: f64) -> AutoloadTick {
        if !self.pending {
            return AutoloadTick::Idle;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        let delay = HOME_AUTOLOAD_DELAY_MS as f64;
        if self.elapsed_ms >= delay {
            self.pending = false;
            return AutoloadTick::Fire;
        }
        let remaining = delay - self.elapsed_ms;
        if remaining <= HOME_COUNTDOWN_WINDOW_MS as f64 {
            AutoloadTick::Countdown((remaining / 1000.0).ceil() as u32)
        } else {
            AutoloadTick::Idle
        }
    }
}
