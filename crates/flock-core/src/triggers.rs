//! Edge detectors that turn analysis frames into discrete reactions.

use smallvec::SmallVec;

use crate::analysis::{AnalysisFrame, Band};
use crate::config::TriggerConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Dominant frequency entered the direction band.
    DirectionFlip,
    /// Dominant frequency fell while inside the low descending band.
    DescendingColor,
    /// Sub band energy crossed its threshold upward.
    SubRiseColor,
    /// Middle spectral peak dropped through its threshold.
    MiddlePeakWobble,
}

impl TriggerEvent {
    pub fn is_color_change(self) -> bool {
        matches!(self, TriggerEvent::DescendingColor | TriggerEvent::SubRiseColor)
    }
}

#[derive(Clone, Debug)]
pub struct TriggerDetector {
    cfg: TriggerConfig,
    was_direction_in_range: bool,
    was_descending_in_range: bool,
    prev_dominant_hz: Option<f32>,
    prev_sub: f32,
    prev_middle_peak_hz: Option<f32>,
}

impl TriggerDetector {
    pub fn new(cfg: TriggerConfig) -> Self {
        Self {
            cfg,
            was_direction_in_range: false,
            was_descending_in_range: false,
            prev_dominant_hz: None,
            prev_sub: 0.0,
            prev_middle_peak_hz: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.cfg);
    }

    /// Compare `frame` with the previous one and report every edge that fired.
    pub fn detect(&mut self, frame: &AnalysisFrame) -> SmallVec<[TriggerEvent; 4]> {
        let mut fired = SmallVec::new();
        let dominant = frame.dominant_hz;

        let in_direction =
            (dominant - self.cfg.direction_hz).abs() <= self.cfg.direction_tolerance_hz;
        if in_direction && !self.was_direction_in_range {
            fired.push(TriggerEvent::DirectionFlip);
        }
        self.was_direction_in_range = in_direction;

        let in_descending =
            (dominant - self.cfg.descending_hz).abs() <= self.cfg.descending_tolerance_hz;
        let falling = self
            .prev_dominant_hz
            .is_some_and(|prev| prev.is_finite() && dominant < prev);
        if in_descending && falling && !self.was_descending_in_range {
            fired.push(TriggerEvent::DescendingColor);
        }
        self.was_descending_in_range = in_descending;
        self.prev_dominant_hz = Some(dominant);

        let sub = frame.band(Band::Sub);
        if self.prev_sub < self.cfg.sub_threshold && sub >= self.cfg.sub_threshold {
            fired.push(TriggerEvent::SubRiseColor);
        }
        self.prev_sub = sub;

        let middle = frame.middle_peak_hz();
        if let (Some(prev), Some(now)) = (self.prev_middle_peak_hz, middle) {
            if prev > self.cfg.middle_peak_hz && now <= self.cfg.middle_peak_hz {
                fired.push(TriggerEvent::MiddlePeakWobble);
            }
        }
        self.prev_middle_peak_hz = middle;

        if !fired.is_empty() {
            log::debug!("[triggers] fired {:?} at {:.1} Hz", fired.as_slice(), dominant);
        }
        fired
    }
}

impl Default for TriggerDetector {
    fn default() -> Self {
        Self::new(TriggerConfig::default())
    }
}
