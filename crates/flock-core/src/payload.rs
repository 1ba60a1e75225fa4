//! JSON interchange for recorded edits.
//!
//! Import is lenient: it accepts a bare array or an object with `events`,
//! legacy `code`/`timeMs`/`t`/`time` fields, and silently drops entries it
//! cannot read. Export always writes the canonical shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{EDITS_AUDIO_PATH, EDITS_FILE_PREFIX, EDITS_VERSION};
use crate::edits::EditEvent;
use crate::error::{FlockError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditsPayload {
    pub version: u32,
    pub audio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub events: Vec<EditEvent>,
}

impl EditsPayload {
    fn canonical(events: Vec<EditEvent>, created_at: Option<String>) -> Self {
        Self {
            version: EDITS_VERSION,
            audio: EDITS_AUDIO_PATH.to_string(),
            created_at,
            events,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn number_field(item: &Map<String, Value>, key: &str) -> Option<f64> {
    item.get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

/// `atMs` also accepts numeric strings; the legacy fields must be numbers.
fn event_time_ms(item: &Map<String, Value>) -> Option<f64> {
    let at_ms = match item.get("atMs") {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(v) => v.as_f64(),
        None => None,
    }
    .filter(|v| v.is_finite());
    at_ms
        .or_else(|| number_field(item, "timeMs"))
        .or_else(|| number_field(item, "t").map(|s| s * 1000.0))
        .or_else(|| number_field(item, "time").map(|s| s * 1000.0))
}

fn round_ms(ms: f64) -> u64 {
    ms.round().max(0.0) as u64
}

/// Normalize any accepted edits document into the canonical payload.
pub fn normalize_edits_payload(value: &Value) -> Result<EditsPayload> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("events") {
            Some(Value::Array(items)) => items,
            _ => return Err(FlockError::InvalidPayload("expected { events: [] }")),
        },
        _ => return Err(FlockError::InvalidPayload("expected { events: [] }")),
    };

    let mut events = Vec::with_capacity(list.len());
    let mut skipped = 0usize;
    for item in list {
        let Some(item) = item.as_object() else {
            skipped += 1;
            continue;
        };
        let key = match item.get("key") {
            Some(Value::String(k)) => Some(k.as_str()),
            _ => item.get("code").and_then(Value::as_str),
        };
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            skipped += 1;
            continue;
        };
        let Some(at_ms) = event_time_ms(item) else {
            skipped += 1;
            continue;
        };
        events.push(EditEvent {
            at_ms: round_ms(at_ms),
            key: key.to_string(),
        });
    }
    if skipped > 0 {
        log::warn!("[edits] skipped {} unreadable entries", skipped);
    }
    events.sort_by_key(|e| e.at_ms);
    Ok(EditsPayload::canonical(events, None))
}

pub fn parse_edits_json(text: &str) -> Result<EditsPayload> {
    let value: Value = serde_json::from_str(text)?;
    normalize_edits_payload(&value)
}

/// Canonical export document for `events`, stamped with `created_at`.
pub fn make_edits_payload(events: &[EditEvent], created_at: Option<String>) -> EditsPayload {
    let mut events = events.to_vec();
    events.sort_by_key(|e| e.at_ms);
    EditsPayload::canonical(events, created_at)
}

/// Local time stamp as `YYYYMMDD-HHMMSS`.
pub fn format_capture_stamp(
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> String {
    format!("{year:04}{month:02}{day:02}-{hour:02}{min:02}{sec:02}")
}

pub fn export_file_name(stamp: &str) -> String {
    format!("{EDITS_FILE_PREFIX}-{stamp}.json")
}
