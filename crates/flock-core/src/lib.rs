pub mod actions;
pub mod analysis;
pub mod atlas;
pub mod audio_state;
pub mod camera;
pub mod config;
pub mod constants;
pub mod easing;
pub mod edits;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod motion;
pub mod palette;
pub mod payload;
pub mod triggers;

pub static SPRITE_WGSL: &str = include_str!("../shaders/sprites.wgsl");
pub static LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");

pub use actions::*;
pub use analysis::*;
pub use atlas::*;
pub use audio_state::*;
pub use camera::*;
pub use config::*;
pub use edits::*;
pub use engine::*;
pub use error::FlockError;
pub use motion::*;
pub use palette::*;
pub use payload::*;
pub use triggers::*;
