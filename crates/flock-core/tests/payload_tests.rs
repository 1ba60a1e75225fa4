// Integration tests for importing and exporting edits JSON.

use flock_core::{
    export_file_name, format_capture_stamp, make_edits_payload, normalize_edits_payload,
    parse_edits_json, EditEvent, FlockError,
};
use serde_json::json;

#[test]
fn legacy_fields_are_normalized_and_sorted() {
    let value = json!([
        { "code": "KeyH", "t": 1.5 },
        { "key": "KeyB", "timeMs": 200 },
        { "key": "Space", "time": 0.25 },
        { "key": "KeyD", "atMs": "300.4" },
        { "atMs": 5 },
        "junk",
        { "key": "KeyK" },
        { "key": "KeyV", "atMs": -20 },
    ]);
    let payload = normalize_edits_payload(&value).unwrap();
    assert_eq!(
        payload.events,
        vec![
            EditEvent::new(0, "KeyV"),
            EditEvent::new(200, "KeyB"),
            EditEvent::new(250, "Space"),
            EditEvent::new(300, "KeyD"),
            EditEvent::new(1500, "KeyH"),
        ]
    );
    assert_eq!(payload.version, 1);
    assert_eq!(payload.audio, "/shangri-la.mp3");
    assert!(payload.created_at.is_none());
}

#[test]
fn object_with_events_is_accepted() {
    let payload =
        parse_edits_json(r#"{"version":1,"events":[{"key":"KeyJ","atMs":12.6}]}"#).unwrap();
    assert_eq!(payload.events, vec![EditEvent::new(13, "KeyJ")]);
}

#[test]
fn wrong_shapes_are_rejected() {
    assert!(matches!(
        normalize_edits_payload(&json!({ "edits": [] })),
        Err(FlockError::InvalidPayload(_))
    ));
    assert!(matches!(
        normalize_edits_payload(&json!(42)),
        Err(FlockError::InvalidPayload(_))
    ));
    assert!(matches!(
        parse_edits_json("{not json"),
        Err(FlockError::Json(_))
    ));
}

#[test]
fn empty_key_is_skipped() {
    let payload = normalize_edits_payload(&json!([{ "key": "", "atMs": 3 }])).unwrap();
    assert!(payload.events.is_empty());
}

#[test]
fn export_then_import_is_stable() {
    let events = vec![
        EditEvent::new(900, "KeyB"),
        EditEvent::new(100, "Space"),
        EditEvent::new(100, "KeyH"),
    ];
    let exported = make_edits_payload(&events, Some("2026-10-19T12:00:00.000Z".into()));
    let text = exported.to_json_pretty().unwrap();
    let imported = parse_edits_json(&text).unwrap();
    assert_eq!(imported.events, exported.events);

    let again = make_edits_payload(&imported.events, None);
    assert_eq!(again.events, imported.events);
    assert_eq!(
        parse_edits_json(&again.to_json_pretty().unwrap()).unwrap().events,
        imported.events
    );
}

#[test]
fn export_uses_camel_case_keys() {
    let payload = make_edits_payload(&[EditEvent::new(5, "KeyT")], Some("stamp".into()));
    let value: serde_json::Value =
        serde_json::from_str(&payload.to_json_pretty().unwrap()).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["audio"], "/shangri-la.mp3");
    assert_eq!(value["createdAt"], "stamp");
    assert_eq!(value["events"][0]["atMs"], 5);
    assert_eq!(value["events"][0]["key"], "KeyT");

    let bare = make_edits_payload(&[], None).to_json_pretty().unwrap();
    assert!(!bare.contains("createdAt"));
}

#[test]
fn export_file_name_carries_local_stamp() {
    let stamp = format_capture_stamp(2026, 1, 2, 3, 4, 5);
    assert_eq!(stamp, "20260102-030405");
    assert_eq!(export_file_name(&stamp), "shangri-edits-20260102-030405.json");
}
