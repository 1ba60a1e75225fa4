// Integration tests for the per-frame engine: dispatch, triggers and playback.

use flock_core::{
    Action, ActionSource, AnalyserInput, AtlasRect, AudioGraphState, ColorMode, EditEvent,
    FlockConfig, FlockEngine, FlockError, PlaybackClock, SessionRole, TransformMode,
    TriggerEvent,
};
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn engine(role: SessionRole) -> FlockEngine {
    let cfg = FlockConfig {
        count: 48,
        ..FlockConfig::default()
    };
    FlockEngine::new(cfg, &[AtlasRect::FULL], role, 42).unwrap()
}

fn clock(sec: f64) -> PlaybackClock {
    PlaybackClock {
        position_sec: sec,
        playing: true,
    }
}

fn stopped() -> PlaybackClock {
    PlaybackClock {
        position_sec: 0.0,
        playing: false,
    }
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = FlockConfig {
        radius: -1.0,
        ..FlockConfig::default()
    };
    let result = FlockEngine::new(cfg, &[], SessionRole::Home, 1);
    assert!(matches!(result, Err(FlockError::InvalidConfig(_))));
}

#[test]
fn key_codes_round_trip_through_actions() {
    for action in Action::ALL {
        assert_eq!(Action::from_key_code(action.key_code()), Some(action));
    }
    assert_eq!(Action::from_key_code("KeyX"), None);
    assert!(!Action::ToggleDirection.accepts(ActionSource::Playback));
    assert!(Action::ToggleDirection.accepts(ActionSource::User));
    assert!(Action::ToggleScatter.accepts(ActionSource::Playback));
}

#[test]
fn playback_cannot_flip_direction() {
    let mut engine = engine(SessionRole::Home);
    assert!(!engine.dispatch(Action::ToggleDirection, ActionSource::Playback));
    assert_eq!(engine.flock().travel_direction(), 1.0);
    assert!(engine.dispatch(Action::ToggleDirection, ActionSource::User));
    assert_eq!(engine.flock().travel_direction(), -1.0);
}

#[test]
fn toggles_flip_scene_state() {
    let mut engine = engine(SessionRole::Editor);
    assert!(!engine.lines_visible());
    engine.dispatch(Action::ToggleLines, ActionSource::User);
    assert!(engine.lines_visible());

    engine.dispatch(Action::ToggleDecor, ActionSource::User);
    assert!(engine.decor().is_showing());
    for i in 0..120 {
        engine.tick(DT, i as f32 * DT, None, stopped());
    }
    assert!((engine.decor().reveal() - 1.0).abs() < 1e-3);

    engine.dispatch(Action::CycleColorMode, ActionSource::User);
    assert_eq!(engine.palette().mode(), ColorMode::Family);

    engine.dispatch(Action::ToggleScatter, ActionSource::User);
    assert_eq!(engine.flock().mode(), TransformMode::Scatter3d);
}

#[test]
fn restart_intro_marks_scene_time() {
    let mut engine = engine(SessionRole::Home);
    engine.tick(DT, 5.0, None, stopped());
    engine.dispatch(Action::RestartIntro, ActionSource::User);
    assert_eq!(engine.intro_started_at(), 5.0);
}

#[test]
fn camera_preset_tweens_over_ticks() {
    let mut engine = engine(SessionRole::Home);
    engine.dispatch(Action::CycleCameraPreset, ActionSource::User);
    assert!(engine.camera_rig().is_active());
    for i in 0..240 {
        engine.tick(DT, i as f32 * DT, None, stopped());
    }
    assert!(!engine.camera_rig().is_active());
    assert!(engine.camera().eye.abs_diff_eq(Vec3::new(0.0, 44.0, 1.0), 1e-3));
}

#[test]
fn editor_records_live_keys() {
    let mut engine = engine(SessionRole::Editor);
    engine.session.recorder.set_recording(true);
    assert_eq!(
        engine.handle_key("KeyH", clock(1.0)),
        Some(Action::CycleColorMode)
    );
    assert_eq!(engine.handle_key("KeyX", clock(1.5)), None);
    assert_eq!(
        engine.session.recorder.events(),
        &[EditEvent::new(1000, "KeyH")]
    );
}

#[test]
fn home_page_does_not_record() {
    let mut engine = engine(SessionRole::Home);
    engine.session.recorder.set_recording(true);
    engine.handle_key("KeyB", clock(1.0));
    assert!(engine.session.recorder.events().is_empty());
    assert_eq!(engine.flock().mode(), TransformMode::Scatter3d);
}

#[test]
fn playback_dispatches_due_edits() {
    let mut engine = engine(SessionRole::Home);
    engine.session.load_custom(vec![
        EditEvent::new(0, "KeyB"),
        EditEvent::new(0, "KeyD"),
        EditEvent::new(0, "KeyQ"),
        EditEvent::new(4000, "KeyH"),
    ]);
    let report = engine.tick(DT, 0.0, None, clock(0.1));
    assert_eq!(report.played.as_slice(), &[Action::ToggleScatter]);
    assert_eq!(engine.flock().mode(), TransformMode::Scatter3d);
    assert_eq!(engine.flock().travel_direction(), 1.0);
    assert_eq!(engine.session.player.cursor().next_index, 3);

    let report = engine.tick(DT, DT, None, clock(4.0));
    assert_eq!(report.played.as_slice(), &[Action::CycleColorMode]);
    assert!(engine.session.player.is_complete());
}

#[test]
fn silence_without_analyzer_fires_nothing() {
    let mut engine = engine(SessionRole::Home);
    assert!(!engine.has_analyzer());
    let report = engine.tick(DT, 0.0, None, stopped());
    assert!(report.triggers.is_empty());
    assert!(!engine.last_frame().active);
    assert!(report.ambient_volume > 0.0);
}

#[test]
fn direction_tone_flips_travel() {
    let mut engine = engine(SessionRole::Home);
    engine.attach_analyzer(48_000.0, 2048);
    let mut spectrum = vec![-120.0f32; 2048];
    spectrum[114] = 0.0; // ~1336 Hz
    let input = AnalyserInput {
        time_domain: &[0.0; 256],
        freq_db: &spectrum,
    };
    let report = engine.tick(DT, 0.0, Some(input), stopped());
    assert!(engine.last_frame().active);
    assert_eq!(report.triggers.as_slice(), &[TriggerEvent::DirectionFlip]);
    assert_eq!(engine.flock().travel_direction(), -1.0);

    // held tone does not retrigger
    let report = engine.tick(DT, DT, Some(input), stopped());
    assert!(report.triggers.is_empty());
    assert_eq!(engine.flock().travel_direction(), -1.0);

    engine.detach_analyzer();
    assert!(!engine.has_analyzer());
}

#[test]
fn sub_rise_recolors_the_flock() {
    let mut engine = engine(SessionRole::Home);
    engine.attach_analyzer(48_000.0, 2048);
    let mut spectrum = vec![-120.0f32; 2048];
    for bin in 1..=6 {
        spectrum[bin] = 0.0;
    }
    let input = AnalyserInput {
        time_domain: &[],
        freq_db: &spectrum,
    };
    let report = engine.tick(DT, 0.0, Some(input), stopped());
    assert!(report.triggers.contains(&TriggerEvent::SubRiseColor));
    assert_eq!(engine.palette().infection().count(), 1);
}

#[test]
fn audio_graph_builds_once() {
    let mut state = AudioGraphState::default();
    assert!(state.begin());
    assert!(!state.begin());
    state.finish(false);
    assert_eq!(state, AudioGraphState::Failed);
    assert!(state.begin());
    state.finish(true);
    assert!(state.is_ready());
    assert!(!state.begin());
}
