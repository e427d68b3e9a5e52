//! Recognizer
//!
//! Session context tying a [`FeatureExtractor`], a [`ChordMatcher`] and a
//! [`ChordLibrary`] together behind the train / recognize / list operations.
//! Each recognizer owns its library, so independent sessions never share
//! state.

use thiserror::Error;

use crate::{
    features::{FeatureExtractor, FeatureList},
    library::{ChordLibrary, LibraryError},
    matcher::{ChordMatcher, MatchResult},
};

/// Errors returned by [`ChordRecognizer`] operations.
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// The recording produced no usable peaks; the library was left as is.
    #[error("silent recording: no spectral peaks in the analysed band")]
    SilentRecording,

    /// The chord name was empty after trimming.
    #[error("invalid chord name `{0}`")]
    InvalidChordName(String),

    /// The library could not be persisted.
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Builder for a [`ChordRecognizer`].
pub struct ChordRecognizerBuilder {
    extractor: FeatureExtractor,
    matcher: ChordMatcher,
    library: ChordLibrary,
}

impl ChordRecognizerBuilder {
    /// Default extractor and matcher over an empty in-memory library.
    pub fn new() -> Self {
        ChordRecognizerBuilder {
            extractor: FeatureExtractor::default(),
            matcher: ChordMatcher::default(),
            library: ChordLibrary::in_memory(),
        }
    }

    /// Use a custom feature extractor.
    pub fn extractor(mut self, extractor: FeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Use a custom matcher.
    pub fn matcher(mut self, matcher: ChordMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Use an already loaded library.
    pub fn library(mut self, library: ChordLibrary) -> Self {
        self.library = library;
        self
    }

    /// Build the `ChordRecognizer`.
    pub fn build(self) -> ChordRecognizer {
        ChordRecognizer {
            extractor: self.extractor,
            matcher: self.matcher,
            library: self.library,
        }
    }
}

impl Default for ChordRecognizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Trains and recognizes chords against its own library.
pub struct ChordRecognizer {
    extractor: FeatureExtractor,
    matcher: ChordMatcher,
    library: ChordLibrary,
}

impl ChordRecognizer {
    /// Start customizing with a builder.
    pub fn builder() -> ChordRecognizerBuilder {
        ChordRecognizerBuilder::new()
    }

    /// Extract a signature from `raw` and store it under `chord_name`,
    /// replacing any earlier signature. The library is saved before this
    /// returns.
    ///
    /// Returns the stored peaks, or `Err(SilentRecording)` without touching
    /// the library when the recording has no usable signal.
    pub fn train(
        &mut self,
        chord_name: &str,
        raw: &[f32],
        sample_rate: u32,
    ) -> Result<FeatureList, RecognizerError> {
        let name = chord_name.trim();
        if name.is_empty() {
            return Err(RecognizerError::InvalidChordName(chord_name.to_string()));
        }

        let features = self.extractor.extract(raw, sample_rate);
        if features.is_empty() {
            log::warn!("chord '{name}' not trained: recording is silent");
            return Err(RecognizerError::SilentRecording);
        }

        self.library.put(name, features.clone())?;
        log::info!("chord '{name}' trained with {} peaks", features.len());
        Ok(features)
    }

    /// Best match for `raw` in the library.
    ///
    /// Never fails: silence or an empty library yield `(None, 0.0)`.
    pub fn recognize(&self, raw: &[f32], sample_rate: u32) -> MatchResult {
        let features = self.extractor.extract(raw, sample_rate);
        let result = self.matcher.best_match(&features, &self.library);
        match (&result.chord, result.is_confident()) {
            (Some(chord), true) => log::info!(
                "recognized chord: {chord} (confidence: {:.2}%)",
                result.score * 100.0
            ),
            _ => log::info!(
                "no confident match found (best: {:.2}%)",
                result.score * 100.0
            ),
        }
        result
    }

    /// The `k` best candidates for `raw`, highest score first.
    pub fn candidates(&self, raw: &[f32], sample_rate: u32, k: usize) -> Vec<MatchResult> {
        let features = self.extractor.extract(raw, sample_rate);
        self.matcher.rank(&features, &self.library, k)
    }

    /// Trained chord names in lexicographic order.
    pub fn list_chords(&self) -> Vec<String> {
        self.library.names()
    }

    /// The underlying library.
    pub fn library(&self) -> &ChordLibrary {
        &self.library
    }

    /// The feature extractor in use.
    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// The matcher in use.
    pub fn matcher(&self) -> &ChordMatcher {
        &self.matcher
    }
}

impl Default for ChordRecognizer {
    fn default() -> Self {
        ChordRecognizerBuilder::new().build()
    }
}
