//! Sprite manifest parsing.

use serde_json::Value;

use crate::error::{FlockError, Result};

/// Resolve a manifest entry to a fetchable URL. Absolute paths and remote
/// URLs pass through; bare names land under `/birds/`.
pub fn normalize_sprite_url(entry: &str) -> Option<String> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = entry.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || entry.starts_with("//") {
        return Some(entry.to_string());
    }
    if entry.starts_with('/') {
        return Some(entry.to_string());
    }
    let mut rest = entry;
    for prefix in ["./", ".\\", "\\"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    if let Some(head) = rest.get(..6) {
        if (head.ends_with('/') || head.ends_with('\\')) && head[..5].eq_ignore_ascii_case("birds")
        {
            rest = &rest[6..];
        }
    }
    Some(format!("/birds/{}", rest.replace('\\', "/")))
}

/// Accepts `{"files": [...]}` or a bare array. Non-string entries are dropped.
pub fn parse_manifest(value: &Value) -> Result<Vec<String>> {
    let files = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("files") {
            Some(Value::Array(items)) => items,
            _ => return Err(FlockError::EmptyManifest),
        },
        _ => return Err(FlockError::EmptyManifest),
    };
    if files.is_empty() {
        return Err(FlockError::EmptyManifest);
    }
    let urls: Vec<String> = files
        .iter()
        .filter_map(Value::as_str)
        .filter_map(normalize_sprite_url)
        .collect();
    if urls.is_empty() {
        return Err(FlockError::EmptyManifest);
    }
    Ok(urls)
}

pub fn parse_manifest_str(text: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(text)?;
    parse_manifest(&value)
}
