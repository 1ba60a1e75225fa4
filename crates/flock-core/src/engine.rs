//! One frame of the whole scene, and the action dispatcher.
//!
//! Frame order is fixed: camera rig, flock motion, feature extraction,
//! trigger reactions, edit playback. The frontend renders afterwards from the
//! read-only accessors.

use smallvec::SmallVec;

use crate::actions::{Action, ActionSource};
use crate::analysis::{AnalysisFrame, SpectralAnalyzer};
use crate::atlas::AtlasRect;
use crate::camera::{AmbientVolume, Camera, CameraRig};
use crate::config::{FlockConfig, TriggerConfig};
use crate::constants::MAX_FRAME_DT;
use crate::easing::approach_alpha;
use crate::edits::{EditSession, PlaybackClock, SessionRole};
use crate::error::Result;
use crate::motion::Flock;
use crate::palette::Palette;
use crate::triggers::{TriggerDetector, TriggerEvent};

const DECOR_DAMP: f32 = 8.0;

/// Raw analyser snapshot for one frame.
#[derive(Clone, Copy, Debug)]
pub struct AnalyserInput<'a> {
    pub time_domain: &'a [f32],
    pub freq_db: &'a [f32],
}

/// What happened during a tick that the frontend may need to act on.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub triggers: SmallVec<[TriggerEvent; 4]>,
    /// Actions replayed from the edit list, in order.
    pub played: SmallVec<[Action; 4]>,
    pub ambient_volume: f32,
}

/// Reveal amount for the scenery, eased toward its toggle target.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decor {
    target: f32,
    current: f32,
}

impl Decor {
    fn toggle(&mut self) {
        self.target = if self.target > 0.5 { 0.0 } else { 1.0 };
    }

    fn update(&mut self, dt: f32) {
        self.current += (self.target - self.current) * approach_alpha(DECOR_DAMP, dt);
        if (self.target - self.current).abs() < 1e-4 {
            self.current = self.target;
        }
    }

    pub fn is_showing(&self) -> bool {
        self.target > 0.5
    }

    pub fn reveal(&self) -> f32 {
        self.current
    }
}

pub struct FlockEngine {
    flock: Flock,
    palette: Palette,
    triggers: TriggerDetector,
    analyzer: Option<SpectralAnalyzer>,
    camera: Camera,
    rig: CameraRig,
    ambient: AmbientVolume,
    pub session: EditSession,
    lines_visible: bool,
    decor: Decor,
    intro_started_at: f32,
    scene_time: f32,
    last_frame: AnalysisFrame,
}

impl FlockEngine {
    pub fn new(
        cfg: FlockConfig,
        rects: &[AtlasRect],
        role: SessionRole,
        seed: u64,
    ) -> Result<Self> {
        cfg.validate()?;
        log::info!(
            "[engine] {} birds, {} sprite cells, {:?} page",
            cfg.count,
            rects.len(),
            role
        );
        Ok(Self {
            flock: Flock::new(cfg, rects, seed),
            palette: Palette::new(seed.wrapping_add(1)),
            triggers: TriggerDetector::new(TriggerConfig::default()),
            analyzer: None,
            camera: Camera::default(),
            rig: CameraRig::default(),
            ambient: AmbientVolume::default(),
            session: EditSession::new(role),
            lines_visible: false,
            decor: Decor::default(),
            intro_started_at: 0.0,
            scene_time: 0.0,
            last_frame: AnalysisFrame::neutral(),
        })
    }

    /// Start extracting features once the audio graph knows its sample rate.
    pub fn attach_analyzer(&mut self, sample_rate: f32, bin_count: usize) {
        self.analyzer = Some(SpectralAnalyzer::new(sample_rate, bin_count));
        self.triggers.reset();
        log::info!("[engine] analyzer at {} Hz, {} bins", sample_rate, bin_count);
    }

    pub fn detach_analyzer(&mut self) {
        self.analyzer = None;
        self.triggers.reset();
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Apply `action`. Returns whether it was handled; the frontend owns the
    /// side effects of `PlayTrack`.
    pub fn dispatch(&mut self, action: Action, source: ActionSource) -> bool {
        if !action.accepts(source) {
            return false;
        }
        match action {
            Action::ToggleLines => {
                self.lines_visible = !self.lines_visible;
                self.flock.randomize_connections();
            }
            Action::PlayTrack => {}
            Action::RestartIntro => self.intro_started_at = self.scene_time,
            Action::CycleColorMode => {
                self.palette.cycle_mode();
            }
            Action::ToggleDecor => self.decor.toggle(),
            Action::ToggleScatter => {
                self.flock.toggle_scatter();
            }
            Action::CycleCameraPreset => {
                self.rig.cycle(&self.camera);
            }
            Action::CycleRouteShape => {
                self.flock.cycle_route_shape();
            }
            Action::ToggleDirection => {
                self.flock.toggle_direction();
            }
        }
        log::debug!("[engine] {:?} from {:?}", action, source);
        true
    }

    /// Live key press: dispatch, then record it if this is the editor.
    pub fn handle_key(&mut self, code: &str, clock: PlaybackClock) -> Option<Action> {
        let action = Action::from_key_code(code)?;
        let handled = self.dispatch(action, ActionSource::User);
        self.session.record(code, clock);
        handled.then_some(action)
    }

    pub fn tick(
        &mut self,
        dt: f32,
        t: f32,
        input: Option<AnalyserInput<'_>>,
        clock: PlaybackClock,
    ) -> TickReport {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.scene_time = t;
        let mut report = TickReport::default();

        self.rig.update(&mut self.camera, dt);
        report.ambient_volume = self.ambient.update(self.camera.distance());

        self.flock.update(dt, t, &self.camera);

        self.last_frame = match (self.analyzer.as_mut(), input) {
            (Some(analyzer), Some(input)) => {
                analyzer.analyze(input.time_domain, input.freq_db, t as f64)
            }
            _ => AnalysisFrame::neutral(),
        };

        if self.last_frame.active {
            report.triggers = self.triggers.detect(&self.last_frame);
            for &event in &report.triggers {
                self.react(event);
            }
        }
        let (rms, crest) = if self.last_frame.active {
            (self.last_frame.rms, self.last_frame.crest)
        } else {
            (0.0, 0.0)
        };
        self.flock.update_audio_rotation(rms, crest, dt);

        report.played = self.run_playback(clock);
        self.decor.update(dt);
        report
    }

    fn react(&mut self, event: TriggerEvent) {
        match event {
            TriggerEvent::DirectionFlip => {
                self.flock.toggle_direction();
            }
            TriggerEvent::DescendingColor | TriggerEvent::SubRiseColor => self.recolor(),
            TriggerEvent::MiddlePeakWobble => self.flock.trigger_middle_peak_wobble(),
        }
    }

    fn recolor(&mut self) {
        let (tints, positions) = self.flock.tints_and_positions();
        self.palette.trigger(tints, positions);
    }

    fn run_playback(&mut self, clock: PlaybackClock) -> SmallVec<[Action; 4]> {
        let due = self.session.poll_playback(clock);
        let actions: SmallVec<[Action; 4]> = self.session.player.events()[due]
            .iter()
            .filter_map(|e| Action::from_key_code(&e.key))
            .collect();
        let mut played = SmallVec::new();
        for action in actions {
            if self.dispatch(action, ActionSource::Playback) {
                played.push(action);
            }
        }
        played
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn flock_mut(&mut self) -> &mut Flock {
        &mut self.flock
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn camera_rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn last_frame(&self) -> &AnalysisFrame {
        &self.last_frame
    }

    pub fn lines_visible(&self) -> bool {
        self.lines_visible
    }

    pub fn decor(&self) -> &Decor {
        &self.decor
    }

    pub fn intro_started_at(&self) -> f32 {
        self.intro_started_at
    }
}
