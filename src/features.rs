//! Features
//!
//! Reduces a raw recording to the handful of dominant spectral peaks that make
//! up a chord fingerprint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spectrum;

/// Default length of the analysis window, in seconds of the nominal rate.
pub const DEFAULT_ANALYSIS_DURATION: f32 = 0.5;
/// Default number of strongest bins kept before band filtering.
pub const DEFAULT_MAX_PEAKS: usize = 10;
/// Default lower band edge (exclusive), in Hz.
pub const DEFAULT_MIN_FREQUENCY: f32 = 80.0;
/// Default upper band edge (exclusive), in Hz.
pub const DEFAULT_MAX_FREQUENCY: f32 = 1500.0;

/// One dominant spectral peak.
///
/// Serialized as a `[frequency_hz, magnitude]` pair.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct PeakFeature {
    /// Frequency of the bin, in Hz.
    pub frequency: f32,
    /// Magnitude of the bin.
    pub magnitude: f32,
}

impl PeakFeature {
    /// Create a peak from a frequency (Hz) and magnitude.
    pub const fn new(frequency: f32, magnitude: f32) -> Self {
        PeakFeature {
            frequency,
            magnitude,
        }
    }
}

impl From<(f32, f32)> for PeakFeature {
    fn from((frequency, magnitude): (f32, f32)) -> Self {
        PeakFeature::new(frequency, magnitude)
    }
}

impl From<PeakFeature> for (f32, f32) {
    fn from(p: PeakFeature) -> Self {
        (p.frequency, p.magnitude)
    }
}

/// Peaks ordered by magnitude, strongest first.
pub type FeatureList = Vec<PeakFeature>;

/// Errors raised while configuring a [`FeatureExtractor`].
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    /// A builder parameter was out of range.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Builder for a [`FeatureExtractor`].
pub struct FeatureExtractorBuilder {
    analysis_duration: f32,
    max_peaks: usize,
    min_frequency: f32,
    max_frequency: f32,
}

impl FeatureExtractorBuilder {
    /// Start with default parameters:
    /// analysis_duration = 0.5 s, max_peaks = 10,
    /// min_frequency = 80 Hz, max_frequency = 1500 Hz.
    pub fn new() -> Self {
        FeatureExtractorBuilder {
            analysis_duration: DEFAULT_ANALYSIS_DURATION,
            max_peaks: DEFAULT_MAX_PEAKS,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
        }
    }

    /// Set the analysis window length in seconds.
    pub fn analysis_duration(mut self, seconds: f32) -> Self {
        self.analysis_duration = seconds;
        self
    }

    /// Set how many of the strongest bins are kept before band filtering.
    pub fn max_peaks(mut self, n: usize) -> Self {
        self.max_peaks = n;
        self
    }

    /// Set the exclusive lower edge of the accepted band.
    pub fn min_frequency(mut self, hz: f32) -> Self {
        self.min_frequency = hz;
        self
    }

    /// Set the exclusive upper edge of the accepted band.
    pub fn max_frequency(mut self, hz: f32) -> Self {
        self.max_frequency = hz;
        self
    }

    /// Finalize and create the extractor.
    pub fn build(self) -> Result<FeatureExtractor, FeatureError> {
        let valid_duration = self.analysis_duration.is_finite() && self.analysis_duration > 0.0;
        if !valid_duration {
            return Err(FeatureError::Configuration(
                "analysis_duration must be a positive number of seconds".into(),
            ));
        }
        if self.max_peaks == 0 {
            return Err(FeatureError::Configuration("max_peaks cannot be zero".into()));
        }
        let valid_band = self.min_frequency >= 0.0 && self.min_frequency < self.max_frequency;
        if !valid_band {
            return Err(FeatureError::Configuration(format!(
                "frequency band ({}, {}) is empty",
                self.min_frequency, self.max_frequency
            )));
        }

        Ok(FeatureExtractor {
            analysis_duration: self.analysis_duration,
            max_peaks: self.max_peaks,
            min_frequency: self.min_frequency,
            max_frequency: self.max_frequency,
        })
    }
}

impl Default for FeatureExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns raw recordings into [`FeatureList`]s.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    analysis_duration: f32,
    max_peaks: usize,
    min_frequency: f32,
    max_frequency: f32,
}

impl FeatureExtractor {
    /// Start customizing with a builder.
    pub fn builder() -> FeatureExtractorBuilder {
        FeatureExtractorBuilder::new()
    }

    /// Analysis window length in seconds.
    pub fn analysis_duration(&self) -> f32 {
        self.analysis_duration
    }

    /// Extract the dominant peaks of `raw` recorded at `sample_rate` Hz.
    ///
    /// The analysis window takes every `factor`-th sample so that it spans
    /// the whole recording, attack and decay alike. Bin `i` is reported at
    /// `i * sample_rate / window_len` Hz.
    ///
    /// An empty or silent recording yields an empty list; callers treat that
    /// as "no usable signal".
    pub fn extract(&self, raw: &[f32], sample_rate: u32) -> FeatureList {
        let window = self.analysis_window(raw, sample_rate);
        if window.len() < 2 {
            log::debug!("analysis window too short ({} samples)", window.len());
            return Vec::new();
        }

        let spectrum = match spectrum::transform(&window) {
            Ok(s) => s,
            Err(err) => {
                log::debug!("spectrum unavailable: {err}");
                return Vec::new();
            }
        };

        let bin_width = sample_rate as f32 / window.len() as f32;
        let mut peaks: Vec<PeakFeature> = spectrum
            .iter()
            .enumerate()
            .map(|(i, &mag)| PeakFeature::new(i as f32 * bin_width, mag))
            .collect();

        // stable: equal magnitudes keep ascending-frequency order
        peaks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
        peaks.truncate(self.max_peaks);
        // overflowing bins come back as inf and cannot be persisted
        peaks.retain(|p| {
            p.frequency > self.min_frequency
                && p.frequency < self.max_frequency
                && p.magnitude.is_finite()
                && p.magnitude > f32::EPSILON
        });

        log::debug!(
            "extracted {} peaks: {:?}",
            peaks.len(),
            peaks
                .iter()
                .map(|p| format!("{:.1}Hz/{:.2}", p.frequency, p.magnitude))
                .collect::<Vec<_>>()
        );
        peaks
    }

    /// Decimated window of at most `round(duration * sample_rate)` samples.
    fn analysis_window(&self, raw: &[f32], sample_rate: u32) -> Vec<f32> {
        let target = (self.analysis_duration * sample_rate as f32).round() as usize;
        if target == 0 || raw.is_empty() {
            return Vec::new();
        }
        let factor = (raw.len() / target).max(1);
        log::debug!(
            "processing {} of {} samples (every {}th)",
            target.min(raw.len().div_ceil(factor)),
            raw.len(),
            factor
        );
        raw.iter().step_by(factor).take(target).copied().collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        FeatureExtractor {
            analysis_duration: DEFAULT_ANALYSIS_DURATION,
            max_peaks: DEFAULT_MAX_PEAKS,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_spreads_across_recording() {
        let extractor = FeatureExtractor::builder()
            .analysis_duration(0.5)
            .build()
            .unwrap();
        let raw: Vec<f32> = (0..40).map(|i| i as f32).collect();
        // target 5, factor 8
        let window = extractor.analysis_window(&raw, 10);
        assert_eq!(window, vec![0.0, 8.0, 16.0, 24.0, 32.0]);
    }

    #[test]
    fn short_recording_is_used_whole() {
        let extractor = FeatureExtractor::default();
        let raw = vec![0.25; 3];
        assert_eq!(extractor.analysis_window(&raw, 100), raw);
    }

    #[test]
    fn builder_rejects_inverted_band() {
        let err = FeatureExtractor::builder()
            .min_frequency(2000.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, FeatureError::Configuration(_)));
    }
}
