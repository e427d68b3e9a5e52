//! Config
//!
//! Optional TOML settings for the command-line front end. Every field has a
//! default, so an empty file is a valid configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    features::{
        FeatureError, FeatureExtractor, DEFAULT_ANALYSIS_DURATION, DEFAULT_MAX_FREQUENCY,
        DEFAULT_MAX_PEAKS, DEFAULT_MIN_FREQUENCY,
    },
    matcher::{ChordMatcher, DEFAULT_COMPARED_PEAKS, DEFAULT_THRESHOLD, DEFAULT_TOLERANCE},
};

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config `{path}`: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Chord library file.
    #[serde(default = "default_library")]
    pub library: PathBuf,
    /// Song list used for recommendations.
    #[serde(default = "default_songs")]
    pub songs: PathBuf,
    /// Where `sequence` writes its summary.
    #[serde(default = "default_sequence_output")]
    pub sequence_output: PathBuf,
    /// Feature extraction settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Matching settings.
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// `[analysis]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisConfig {
    /// Analysis window length in seconds.
    #[serde(default = "default_duration")]
    pub duration_seconds: f32,
    /// Exclusive lower band edge, Hz.
    #[serde(default = "default_min_frequency")]
    pub min_frequency: f32,
    /// Exclusive upper band edge, Hz.
    #[serde(default = "default_max_frequency")]
    pub max_frequency: f32,
    /// Strongest bins kept before band filtering.
    #[serde(default = "default_max_peaks")]
    pub max_peaks: usize,
}

/// `[matching]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchingConfig {
    /// Peak matching window, Hz.
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
    /// Leading peaks compared; also the score divisor.
    #[serde(default = "default_compared_peaks")]
    pub compared_peaks: usize,
    /// Confidence threshold.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library: default_library(),
            songs: default_songs(),
            sequence_output: default_sequence_output(),
            analysis: AnalysisConfig::default(),
            matching: MatchingConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration(),
            min_frequency: default_min_frequency(),
            max_frequency: default_max_frequency(),
            max_peaks: default_max_peaks(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            compared_peaks: default_compared_peaks(),
            threshold: default_threshold(),
        }
    }
}

fn default_library() -> PathBuf { "chord_library.json".into() }
fn default_songs() -> PathBuf { "songs_database.json".into() }
fn default_sequence_output() -> PathBuf { "chord_sequence.json".into() }
fn default_duration() -> f32 { DEFAULT_ANALYSIS_DURATION }
fn default_min_frequency() -> f32 { DEFAULT_MIN_FREQUENCY }
fn default_max_frequency() -> f32 { DEFAULT_MAX_FREQUENCY }
fn default_max_peaks() -> usize { DEFAULT_MAX_PEAKS }
fn default_tolerance() -> f32 { DEFAULT_TOLERANCE }
fn default_compared_peaks() -> usize { DEFAULT_COMPARED_PEAKS }
fn default_threshold() -> f32 { DEFAULT_THRESHOLD }

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Feature extractor described by `[analysis]`.
    pub fn extractor(&self) -> Result<FeatureExtractor, FeatureError> {
        FeatureExtractor::builder()
            .analysis_duration(self.analysis.duration_seconds)
            .min_frequency(self.analysis.min_frequency)
            .max_frequency(self.analysis.max_frequency)
            .max_peaks(self.analysis.max_peaks)
            .build()
    }

    /// Matcher described by `[matching]`.
    pub fn matcher(&self) -> ChordMatcher {
        ChordMatcher::builder()
            .tolerance(self.matching.tolerance)
            .compared_peaks(self.matching.compared_peaks)
            .threshold(self.matching.threshold)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            library = "lib.json"

            [matching]
            threshold = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.library, PathBuf::from("lib.json"));
        assert_eq!(cfg.matching.threshold, 0.5);
        assert_eq!(cfg.matching.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(cfg.analysis, AnalysisConfig::default());
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            Config::from_toml_str("library = ["),
            Err(ConfigError::Parse(_))
        ));
    }
}
