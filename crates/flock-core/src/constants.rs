use glam::Vec3;

// Shared tuning constants used by the engine and the web frontend.

// Frame pacing
pub const MAX_FRAME_DT: f32 = 0.033; // longest step the simulation integrates in one tick

// Analyzer
pub const FFT_SIZE: u32 = 4096; // analyser window, bin count is half of this
pub const ANALYSER_SMOOTHING: f32 = 0.75; // smoothingTimeConstant on the analyser node
pub const MIN_DB: f32 = -100.0; // magnitudes at or below this count as silence
pub const MAX_DB: f32 = -10.0;
pub const BAND_SMOOTHING: f32 = 0.2; // per-frame blend toward the new band energy
pub const ROLLOFF_FRACTION: f32 = 0.85; // spectral rolloff energy fraction
pub const PEAK_MIN_HZ: f32 = 30.0;
pub const PEAK_MAX_HZ: f32 = 16_000.0;
pub const MAX_PEAKS: usize = 5;

// Onsets and tempo
pub const FLUX_SMOOTHING: f32 = 0.08; // adaptive mean/variance blend for spectral flux
pub const ONSET_STD_MULTIPLIER: f32 = 1.8; // threshold = mean + k * std
pub const ONSET_MIN_GAP_SEC: f64 = 0.12; // refractory period between onsets
pub const ONSET_WINDOW_SEC: f64 = 18.0; // onsets older than this are dropped
pub const ONSET_MIN_FOR_BPM: usize = 4;
pub const BPM_MIN: f32 = 50.0;
pub const BPM_MAX: f32 = 220.0;
pub const BPM_SMOOTHING: f32 = 0.12;

// Edits
pub const EDITS_VERSION: u32 = 1;
pub const EDITS_AUDIO_PATH: &str = "/shangri-la.mp3";
pub const EDITS_STORAGE_KEY: &str = "wildlife:shangri:edits:v1";
pub const EDITS_FILE_PREFIX: &str = "shangri-edits";
pub const PLAYBACK_SEEK_TOLERANCE_MS: u64 = 150; // backwards jitter tolerated before a seek

// Home autoload
pub const DEFAULT_EDITS_URL: &str = "/default.json";
pub const HOME_AUTOLOAD_DELAY_MS: u32 = 7_000;
pub const HOME_COUNTDOWN_WINDOW_MS: u32 = 3_000; // countdown is shown for the tail of the delay

// Sprites
pub const SPRITE_MANIFEST_URL: &str = "/birds/manifest.json";
pub const ATLAS_MAX_SIZE: u32 = 2048;
pub const ATLAS_CELL_MAX: u32 = 256; // longest sprite edge before downscaling

// Camera
pub const CAMERA_FOV_DEG: f32 = 55.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 200.0;
pub const CAMERA_START: [f32; 3] = [0.0, 6.0, 26.0];
pub const CAMERA_MIN_DISTANCE: f32 = 8.0;
pub const CAMERA_MAX_DISTANCE: f32 = 65.0;

// Ambient bed
pub const AMBIENT_VOLUME_MIN: f32 = 0.1;
pub const AMBIENT_VOLUME_MAX: f32 = 0.25;
pub const AMBIENT_VOLUME_LERP: f32 = 0.08; // per-frame blend toward the distance target

#[inline]
pub fn camera_start_vec3() -> Vec3 {
    Vec3::new(CAMERA_START[0], CAMERA_START[1], CAMERA_START[2])
}
