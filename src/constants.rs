/// Page wiring constants for the web front-end.
///
/// Element ids match the markup served next to the wasm bundle; both pages
/// share one bundle and pick their role from `<body data-page>`.
// Shared elements
pub const CANVAS_ID: &str = "app";
pub const DIRECTION_BUTTON_ID: &str = "direction-toggle";
pub const COLOR_MODE_LABEL_ID: &str = "color-mode-label";

// Home page
pub const HOME_IMPORT_BUTTON_ID: &str = "home-import-btn";
pub const HOME_IMPORT_INPUT_ID: &str = "home-import-file";
pub const HOME_LOAD_LOCAL_BUTTON_ID: &str = "home-load-local-btn";
pub const HOME_STATUS_ID: &str = "home-playback-status";
pub const HOME_COUNTDOWN_ID: &str = "home-countdown";

// Editor page
pub const EDITOR_PLAY_BUTTON_ID: &str = "editor-play-btn";
pub const EDITOR_RECORD_BUTTON_ID: &str = "editor-record-btn";
pub const EDITOR_CLEAR_BUTTON_ID: &str = "editor-clear-btn";
pub const EDITOR_SAVE_LOCAL_BUTTON_ID: &str = "editor-save-local-btn";
pub const EDITOR_LOAD_LOCAL_BUTTON_ID: &str = "editor-load-local-btn";
pub const EDITOR_EXPORT_BUTTON_ID: &str = "editor-export-btn";
pub const EDITOR_IMPORT_BUTTON_ID: &str = "editor-import-btn";
pub const EDITOR_IMPORT_INPUT_ID: &str = "editor-import-file";
pub const EDITOR_STATUS_ID: &str = "editor-status";
pub const EDITOR_TIMELINE_ID: &str = "editor-timeline";

// Audio sources
pub const AMBIENT_AUDIO_URL: &str = "/flight.mp3";
pub const TRACK_AUDIO_URL: &str = "/shangri-la.mp3";

// Timing
pub const EXPORT_URL_REVOKE_MS: i32 = 1000; // object URL lifetime after the download click
pub const STATUS_REFRESH_SEC: f32 = 0.1; // editor status line refresh period

// Renderer
pub const LINE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
pub const SKY_COLOR: [f64; 3] = [0.56, 0.72, 0.86];
pub const DECOR_SKY_COLOR: [f64; 3] = [0.62, 0.74, 0.58]; // sky once the scenery is revealed
