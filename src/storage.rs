use flock_core::constants::EDITS_STORAGE_KEY;
use flock_core::{make_edits_payload, parse_edits_json, EditEvent, EditsPayload};
use web_sys as web;

fn local_storage() -> anyhow::Result<web::Storage> {
    web::window()
        .ok_or_else(|| anyhow::anyhow!("no window"))?
        .local_storage()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("localStorage unavailable"))
}

pub fn save_edits(events: &[EditEvent]) -> anyhow::Result<()> {
    let payload = make_edits_payload(events, Some(crate::edits_io::iso_now()));
    let json = serde_json::to_string(&payload)?;
    local_storage()?
        .set_item(EDITS_STORAGE_KEY, &json)
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

/// Saved edits, or `None` when nothing usable is stored.
pub fn load_edits() -> Option<EditsPayload> {
    let raw = match local_storage() {
        Ok(storage) => storage.get_item(EDITS_STORAGE_KEY).ok().flatten()?,
        Err(e) => {
            log::warn!("[storage] {:?}", e);
            return None;
        }
    };
    match parse_edits_json(&raw) {
        Ok(payload) => Some(payload),
        Err(e) => {
            log::warn!("[storage] could not parse saved edits: {}", e);
            None
        }
    }
}
