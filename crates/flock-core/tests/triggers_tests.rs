// Integration tests for the band edge detectors.

use flock_core::{AnalysisFrame, SpectralPeak, TriggerDetector, TriggerEvent};
use smallvec::smallvec;

fn dominant(hz: f32) -> AnalysisFrame {
    AnalysisFrame {
        active: true,
        dominant_hz: hz,
        ..AnalysisFrame::default()
    }
}

fn sub(level: f32) -> AnalysisFrame {
    let mut frame = dominant(0.0);
    frame.bands[0] = level;
    frame
}

fn middle_peak(hz: f32) -> AnalysisFrame {
    let mut frame = dominant(0.0);
    frame.peaks = smallvec![
        SpectralPeak { freq_hz: 1000.0, magnitude: 1.0 },
        SpectralPeak { freq_hz: 500.0, magnitude: 0.8 },
        SpectralPeak { freq_hz: hz, magnitude: 0.5 },
    ];
    frame
}

fn fired(detector: &mut TriggerDetector, frame: &AnalysisFrame, event: TriggerEvent) -> bool {
    detector.detect(frame).contains(&event)
}

#[test]
fn direction_fires_on_entering_band_only() {
    let mut d = TriggerDetector::default();
    let seq = [1000.0, 1336.0, 1340.0, 1000.0, 1330.0];
    let hits: Vec<bool> = seq
        .iter()
        .map(|&hz| fired(&mut d, &dominant(hz), TriggerEvent::DirectionFlip))
        .collect();
    assert_eq!(hits, vec![false, true, false, false, true]);
}

#[test]
fn descending_color_needs_a_fall_into_the_band() {
    let mut d = TriggerDetector::default();
    assert!(!fired(&mut d, &dominant(60.0), TriggerEvent::DescendingColor));
    assert!(fired(&mut d, &dominant(46.0), TriggerEvent::DescendingColor));
    // still inside, no repeat
    assert!(!fired(&mut d, &dominant(45.0), TriggerEvent::DescendingColor));

    let mut rising = TriggerDetector::default();
    assert!(!fired(&mut rising, &dominant(30.0), TriggerEvent::DescendingColor));
    assert!(!fired(&mut rising, &dominant(46.0), TriggerEvent::DescendingColor));
}

#[test]
fn descending_color_ignores_first_frame() {
    let mut d = TriggerDetector::default();
    assert!(!fired(&mut d, &dominant(47.0), TriggerEvent::DescendingColor));
}

#[test]
fn sub_rise_fires_on_upward_crossing() {
    let mut d = TriggerDetector::default();
    let seq = [0.0, 0.05, 0.06, 0.01, 0.04];
    let hits: Vec<bool> = seq
        .iter()
        .map(|&v| fired(&mut d, &sub(v), TriggerEvent::SubRiseColor))
        .collect();
    assert_eq!(hits, vec![false, true, false, false, true]);
}

#[test]
fn middle_peak_fires_when_dropping_through_threshold() {
    let mut d = TriggerDetector::default();
    assert!(!fired(&mut d, &middle_peak(300.0), TriggerEvent::MiddlePeakWobble));
    assert!(fired(&mut d, &middle_peak(260.0), TriggerEvent::MiddlePeakWobble));
    assert!(!fired(&mut d, &middle_peak(250.0), TriggerEvent::MiddlePeakWobble));
}

#[test]
fn missing_middle_peak_breaks_the_edge() {
    let mut d = TriggerDetector::default();
    d.detect(&middle_peak(300.0));
    d.detect(&dominant(0.0));
    assert!(!fired(&mut d, &middle_peak(260.0), TriggerEvent::MiddlePeakWobble));
}

#[test]
fn color_events_are_grouped() {
    assert!(TriggerEvent::DescendingColor.is_color_change());
    assert!(TriggerEvent::SubRiseColor.is_color_change());
    assert!(!TriggerEvent::DirectionFlip.is_color_change());
}
