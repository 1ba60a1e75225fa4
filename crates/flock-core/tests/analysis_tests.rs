// Integration tests for spectral feature extraction and onset tracking.

use flock_core::{AnalysisFrame, Band, OnsetTracker, SpectralAnalyzer};

const SAMPLE_RATE: f32 = 48_000.0;
const BINS: usize = 2048;

fn silent_spectrum() -> Vec<f32> {
    vec![-120.0; BINS]
}

fn sine(freq: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (std::f32::consts::TAU * freq * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

#[test]
fn bin_width_follows_nyquist() {
    let analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    assert!((analyzer.bin_hz() - 11.718_75).abs() < 1e-4);
}

#[test]
fn low_sine_lands_in_bass_not_air() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let mut spectrum = silent_spectrum();
    spectrum[9] = 0.0; // ~105 Hz
    let frame = analyzer.analyze(&sine(100.0, 4096), &spectrum, 0.0);

    assert!(frame.active);
    assert!(frame.band(Band::Bass) > 0.0);
    assert_eq!(frame.band(Band::Air), 0.0);
    assert_eq!(frame.band(Band::Sub), 0.0);
    assert!(frame.band(Band::Bass) > frame.band(Band::Air));
    assert!((frame.dominant_hz - 9.0 * analyzer.bin_hz()).abs() < 1e-3);
    assert!((frame.rms - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.01);
    assert!((frame.crest - std::f32::consts::SQRT_2).abs() < 0.02);
}

#[test]
fn band_values_are_smoothed_toward_energy() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let mut spectrum = silent_spectrum();
    spectrum[9] = 0.0;
    let first = analyzer.analyze(&[], &spectrum, 0.0).band(Band::Bass);
    let second = analyzer.analyze(&[], &spectrum, 0.016).band(Band::Bass);
    assert!(second > first);
    // bins 5..=22 around a single unit bin
    let energy = (1.0f32 / 18.0).sqrt();
    assert!((first - energy * 0.2).abs() < 1e-4);
}

#[test]
fn silence_produces_quiet_active_frame() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let frame = analyzer.analyze(&vec![0.0; 512], &silent_spectrum(), 0.0);
    assert!(frame.active);
    assert_eq!(frame.rms, 0.0);
    assert_eq!(frame.flux, 0.0);
    assert_eq!(frame.centroid_hz, 0.0);
    assert!(frame.peaks.is_empty());
    assert!(!frame.onset);
    assert!(frame.loudness_db < -130.0);
}

#[test]
fn peaks_are_sorted_by_magnitude() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let mut spectrum = silent_spectrum();
    spectrum[20] = -12.0;
    spectrum[40] = 0.0;
    spectrum[60] = -6.0;
    spectrum[90] = -20.0;
    let frame = analyzer.analyze(&[], &spectrum, 0.0);

    let bins: Vec<f32> = frame
        .peaks
        .iter()
        .map(|p| p.freq_hz / analyzer.bin_hz())
        .collect();
    assert_eq!(bins.len(), 4);
    assert!((bins[0] - 40.0).abs() < 1e-3);
    assert!((bins[1] - 60.0).abs() < 1e-3);
    assert!((bins[2] - 20.0).abs() < 1e-3);
    assert!((frame.middle_peak_hz().unwrap() - 20.0 * analyzer.bin_hz()).abs() < 1e-2);
}

#[test]
fn zero_crossings_count_sign_changes() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let samples = [1.0, -1.0, 1.0, -1.0];
    let frame = analyzer.analyze(&samples, &silent_spectrum(), 0.0);
    assert!((frame.zcr - 0.75).abs() < 1e-6);
}

#[test]
fn flux_counts_only_rising_bins() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let mut loud = silent_spectrum();
    loud[100] = 0.0;
    let rising = analyzer.analyze(&[], &loud, 0.0);
    assert!((rising.flux - 1.0 / BINS as f32).abs() < 1e-7);
    let falling = analyzer.analyze(&[], &silent_spectrum(), 0.016);
    assert_eq!(falling.flux, 0.0);
}

#[test]
fn flux_is_normalized_by_bin_count() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let frame = analyzer.analyze(&[], &vec![0.0; BINS], 0.0);
    assert!((frame.flux - 1.0).abs() < 1e-4);
}

#[test]
fn each_tone_lands_in_its_own_band() {
    let cases = [
        (45.0, Band::Sub),
        (235.0, Band::Bass),
        (480.0, Band::LowMid),
        (1950.0, Band::Mid),
        (5000.0, Band::HighMid),
        (5800.0, Band::HighMid),
        (8000.0, Band::Presence),
        (11_700.0, Band::Presence),
        (14_000.0, Band::Air),
        (19_900.0, Band::Air),
    ];
    for (hz, expected) in cases {
        let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
        let mut spectrum = silent_spectrum();
        spectrum[(hz / analyzer.bin_hz()).round() as usize] = 0.0;
        let frame = analyzer.analyze(&[], &spectrum, 0.0);
        for band in Band::ALL {
            if band == expected {
                assert!(frame.band(band) > 0.0, "{hz} Hz missing from {band:?}");
            } else {
                assert_eq!(frame.band(band), 0.0, "{hz} Hz leaked into {band:?}");
            }
        }
    }
}

#[test]
fn band_edges_match_named_ranges() {
    assert_eq!(Band::HighMid.range_hz(), (2000.0, 6000.0));
    assert_eq!(Band::Presence.range_hz(), (6000.0, 12000.0));
    assert_eq!(Band::Air.range_hz(), (12000.0, 20000.0));
    for pair in Band::ALL.windows(2) {
        assert_eq!(pair[0].range_hz().1, pair[1].range_hz().0);
    }
}

#[test]
fn centroid_and_spread_of_two_bins() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let bin_hz = analyzer.bin_hz();
    let mut spectrum = silent_spectrum();
    spectrum[100] = 0.0;
    spectrum[300] = 0.0;
    let frame = analyzer.analyze(&[], &spectrum, 0.0);
    assert!((frame.centroid_hz - 200.0 * bin_hz).abs() < 0.1);
    assert!((frame.spread_hz - 100.0 * bin_hz).abs() < 0.5);
}

#[test]
fn flat_spectrum_is_flat_and_single_bin_is_not() {
    let mut flat = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let frame = flat.analyze(&[], &vec![0.0; BINS], 0.0);
    assert!((frame.flatness - 1.0).abs() < 1e-3);

    let mut tonal = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let mut spectrum = silent_spectrum();
    spectrum[200] = 0.0;
    let frame = tonal.analyze(&[], &spectrum, 0.0);
    assert!(frame.flatness < 1e-3);
}

#[test]
fn rolloff_marks_eighty_five_percent_of_energy() {
    let mut analyzer = SpectralAnalyzer::new(SAMPLE_RATE, BINS);
    let bin_hz = analyzer.bin_hz();
    let mut spectrum = silent_spectrum();
    for bin in [10, 20, 30, 40] {
        spectrum[bin] = 0.0;
    }
    // 3 of 4 equal bins is 75%, the fourth crosses 85%
    let frame = analyzer.analyze(&[], &spectrum, 0.0);
    assert!((frame.rolloff_hz - 40.0 * bin_hz).abs() < 1e-3);
}

#[test]
fn single_spike_after_silence_is_one_onset() {
    let mut tracker = OnsetTracker::default();
    let mut onsets = 0;
    for i in 0..60 {
        let (onset, _) = tracker.push(0.0, i as f64 / 60.0);
        onsets += onset as usize;
    }
    let (spike, threshold) = tracker.push(1.0, 1.0);
    assert!(spike);
    assert!(threshold < 1.0);
    onsets += 1;
    for i in 1..120 {
        let (onset, _) = tracker.push(0.0, 1.0 + i as f64 / 60.0);
        onsets += onset as usize;
    }
    assert_eq!(onsets, 1);
    assert_eq!(tracker.onset_count(), 1);
}

#[test]
fn onsets_respect_refractory_gap() {
    let mut tracker = OnsetTracker::default();
    assert!(tracker.push(1.0, 0.0).0);
    assert!(!tracker.push(1.0, 0.05).0);
    assert_eq!(tracker.onset_count(), 1);
}

#[test]
fn steady_pulse_converges_to_its_tempo() {
    let mut tracker = OnsetTracker::default();
    // spike every 30 frames at 60 fps: 120 bpm
    for i in 0..(60 * 12) {
        let flux = if i % 30 == 0 { 1.0 } else { 0.0 };
        tracker.push(flux, i as f64 / 60.0);
    }
    assert!((tracker.bpm() - 120.0).abs() < 1.0, "bpm {}", tracker.bpm());
}

#[test]
fn neutral_frame_is_inactive() {
    let frame = AnalysisFrame::neutral();
    assert!(!frame.active);
    assert_eq!(frame.rms, 0.0);
    assert!(frame.middle_peak_hz().is_none());
}
