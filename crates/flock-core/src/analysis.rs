//! Spectral feature extraction over analyser snapshots.
//!
//! The frontend hands over one time-domain window and one dB spectrum per
//! frame; [`SpectralAnalyzer::analyze`] turns them into an [`AnalysisFrame`]
//! that the trigger detector and the rotation controller read. State carried
//! between frames is limited to the previous magnitudes (for flux), the
//! smoothed band energies and the onset/tempo tracker.

use smallvec::SmallVec;

use crate::constants::*;

/// Named frequency bands, low to high.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    Sub,
    Bass,
    LowMid,
    Mid,
    HighMid,
    Presence,
    Air,
}

impl Band {
    pub const ALL: [Band; 7] = [
        Band::Sub,
        Band::Bass,
        Band::LowMid,
        Band::Mid,
        Band::HighMid,
        Band::Presence,
        Band::Air,
    ];

    /// `(low, high)` edges in Hz.
    pub fn range_hz(self) -> (f32, f32) {
        match self {
            Band::Sub => (20.0, 60.0),
            Band::Bass => (60.0, 250.0),
            Band::LowMid => (250.0, 500.0),
            Band::Mid => (500.0, 2000.0),
            Band::HighMid => (2000.0, 6000.0),
            Band::Presence => (6000.0, 12000.0),
            Band::Air => (12000.0, 20000.0),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpectralPeak {
    pub freq_hz: f32,
    pub magnitude: f32,
}

/// Features for a single frame. `active == false` marks the neutral frame
/// produced while no analyser is running.
#[derive(Clone, Debug, Default)]
pub struct AnalysisFrame {
    pub active: bool,
    pub rms: f32,
    pub peak: f32,
    pub crest: f32,
    pub loudness_db: f32,
    pub zcr: f32,
    pub centroid_hz: f32,
    pub spread_hz: f32,
    pub flatness: f32,
    pub rolloff_hz: f32,
    /// Rising magnitude summed over all bins, divided by the bin count.
    pub flux: f32,
    pub onset: bool,
    pub onset_threshold: f32,
    pub bpm: f32,
    pub dominant_hz: f32,
    pub bands: [f32; 7],
    /// Strongest local maxima, sorted by descending magnitude.
    pub peaks: SmallVec<[SpectralPeak; MAX_PEAKS]>,
}

impl AnalysisFrame {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn band(&self, band: Band) -> f32 {
        self.bands[band.index()]
    }

    /// Frequency of the third strongest peak, the one the wobble trigger tracks.
    pub fn middle_peak_hz(&self) -> Option<f32> {
        self.peaks.get(2).map(|p| p.freq_hz)
    }
}

/// Adaptive spectral-flux onset detector with a rolling tempo estimate.
#[derive(Clone, Debug)]
pub struct OnsetTracker {
    flux_avg: f32,
    flux_var: f32,
    last_onset: f64,
    onsets: Vec<f64>,
    bpm: f32,
}

impl Default for OnsetTracker {
    fn default() -> Self {
        Self {
            flux_avg: 0.0,
            flux_var: 0.0,
            last_onset: f64::NEG_INFINITY,
            onsets: Vec::new(),
            bpm: 0.0,
        }
    }
}

impl OnsetTracker {
    /// Feed one normalized flux sample taken at `now` seconds. Returns whether
    /// it was an onset and the threshold it was compared against.
    pub fn push(&mut self, flux_norm: f32, now: f64) -> (bool, f32) {
        self.flux_avg += (flux_norm - self.flux_avg) * FLUX_SMOOTHING;
        let delta = flux_norm - self.flux_avg;
        self.flux_var += (delta * delta - self.flux_var) * FLUX_SMOOTHING;
        let std = self.flux_var.max(1e-8).sqrt();
        let threshold = self.flux_avg + ONSET_STD_MULTIPLIER * std;

        let onset = flux_norm > threshold && now - self.last_onset > ONSET_MIN_GAP_SEC;
        if onset {
            self.last_onset = now;
            self.onsets.push(now);
        }
        self.onsets.retain(|&t| now - t <= ONSET_WINDOW_SEC);
        self.update_bpm();
        (onset, threshold)
    }

    fn update_bpm(&mut self) {
        if self.onsets.len() < ONSET_MIN_FOR_BPM {
            return;
        }
        let mut intervals: Vec<f64> = self.onsets.windows(2).map(|w| w[1] - w[0]).collect();
        intervals.sort_by(|a, b| a.total_cmp(b));
        let mid = intervals[intervals.len() / 2];
        if mid > 1e-3 {
            let bpm = (60.0 / mid as f32).clamp(BPM_MIN, BPM_MAX);
            self.bpm += (bpm - self.bpm) * BPM_SMOOTHING;
        }
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn onset_count(&self) -> usize {
        self.onsets.len()
    }
}

pub struct SpectralAnalyzer {
    sample_rate: f32,
    bin_hz: f32,
    magnitudes: Vec<f32>,
    prev_magnitudes: Vec<f32>,
    bands: [f32; 7],
    onsets: OnsetTracker,
}

impl SpectralAnalyzer {
    pub fn new(sample_rate: f32, bin_count: usize) -> Self {
        let bin_count = bin_count.max(1);
        Self {
            sample_rate,
            bin_hz: sample_rate * 0.5 / bin_count as f32,
            magnitudes: vec![0.0; bin_count],
            prev_magnitudes: vec![0.0; bin_count],
            bands: [0.0; 7],
            onsets: OnsetTracker::default(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn bin_count(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn bin_hz(&self) -> f32 {
        self.bin_hz
    }

    /// Extract features from one analyser snapshot taken at `now` seconds.
    /// `freq_db` longer than the configured bin count is truncated.
    pub fn analyze(&mut self, time_domain: &[f32], freq_db: &[f32], now: f64) -> AnalysisFrame {
        let mut frame = AnalysisFrame {
            active: true,
            ..AnalysisFrame::default()
        };
        self.time_domain_features(time_domain, &mut frame);

        let n = self.magnitudes.len();
        for (i, mag) in self.magnitudes.iter_mut().enumerate() {
            let db = freq_db.get(i).copied().unwrap_or(f32::NEG_INFINITY);
            *mag = if db.is_finite() && db > MIN_DB {
                10f32.powf(db / 20.0)
            } else {
                0.0
            };
        }

        let mut sum = 0.0f32;
        let mut weighted = 0.0f32;
        let mut weighted_sq = 0.0f32;
        let mut log_sum = 0.0f32;
        let mut flux = 0.0f32;
        let mut strongest = (0usize, 0.0f32);
        for i in 0..n {
            let mag = self.magnitudes[i];
            let freq = i as f32 * self.bin_hz;
            sum += mag;
            weighted += mag * freq;
            weighted_sq += mag * freq * freq;
            log_sum += (mag + 1e-10).ln();
            let diff = mag - self.prev_magnitudes[i];
            if diff > 0.0 {
                flux += diff;
            }
            if mag > strongest.1 {
                strongest = (i, mag);
            }
        }

        let safe_sum = sum.max(f32::EPSILON);
        frame.centroid_hz = weighted / safe_sum;
        frame.spread_hz = (weighted_sq / safe_sum - frame.centroid_hz * frame.centroid_hz)
            .max(0.0)
            .sqrt();
        frame.flatness = (log_sum / n as f32).exp() / (sum / n as f32).max(f32::EPSILON);
        frame.rolloff_hz = self.rolloff(sum);
        frame.dominant_hz = strongest.0 as f32 * self.bin_hz;
        let flux_norm = flux / n as f32;
        frame.flux = flux_norm;

        for band in Band::ALL {
            let energy = self.band_energy(band);
            let slot = &mut self.bands[band.index()];
            *slot += (energy - *slot) * BAND_SMOOTHING;
        }
        frame.bands = self.bands;
        frame.peaks = self.pick_peaks();

        let (onset, threshold) = self.onsets.push(flux_norm, now);
        frame.onset = onset;
        frame.onset_threshold = threshold;
        frame.bpm = self.onsets.bpm();

        std::mem::swap(&mut self.magnitudes, &mut self.prev_magnitudes);
        frame
    }

    fn time_domain_features(&self, samples: &[f32], frame: &mut AnalysisFrame) {
        if samples.is_empty() {
            frame.loudness_db = 20.0 * 1e-7f32.log10();
            return;
        }
        let mut sum_sq = 0.0f32;
        let mut peak = 0.0f32;
        let mut crossings = 0usize;
        let mut prev = samples[0];
        for &v in samples {
            sum_sq += v * v;
            peak = peak.max(v.abs());
            if (v >= 0.0) != (prev >= 0.0) {
                crossings += 1;
            }
            prev = v;
        }
        let rms = (sum_sq / samples.len() as f32).sqrt();
        frame.rms = rms;
        frame.peak = peak;
        frame.crest = peak / rms.max(1e-6);
        frame.loudness_db = 20.0 * rms.max(1e-7).log10();
        frame.zcr = crossings as f32 / samples.len() as f32;
    }

    fn rolloff(&self, sum: f32) -> f32 {
        let target = sum * ROLLOFF_FRACTION;
        let mut acc = 0.0;
        for (i, mag) in self.magnitudes.iter().enumerate() {
            acc += mag;
            if acc >= target {
                return i as f32 * self.bin_hz;
            }
        }
        0.0
    }

    fn band_energy(&self, band: Band) -> f32 {
        let (low, high) = band.range_hz();
        let last = self.magnitudes.len() - 1;
        let i0 = ((low / self.bin_hz).floor() as usize).min(last);
        let i1 = ((high / self.bin_hz).ceil() as usize).min(last);
        if i1 < i0 {
            return 0.0;
        }
        let slice = &self.magnitudes[i0..=i1];
        let sum_sq: f32 = slice.iter().map(|m| m * m).sum();
        (sum_sq / slice.len() as f32).sqrt()
    }

    fn pick_peaks(&self) -> SmallVec<[SpectralPeak; MAX_PEAKS]> {
        let mags = &self.magnitudes;
        let n = mags.len();
        let mut found: Vec<SpectralPeak> = Vec::new();
        for i in 3..n.saturating_sub(2) {
            let mag = mags[i];
            if mag <= mags[i - 1] || mag <= mags[i + 1] {
                continue;
            }
            let freq_hz = i as f32 * self.bin_hz;
            if (PEAK_MIN_HZ..=PEAK_MAX_HZ).contains(&freq_hz) {
                found.push(SpectralPeak {
                    freq_hz,
                    magnitude: mag,
                });
            }
        }
        found.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
        found.into_iter().take(MAX_PEAKS).collect()
    }
}
