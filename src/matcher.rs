//! Matcher
//!
//! Scores an unknown [`FeatureList`] against stored chord signatures.
//!
//! For each of the first `compared_peaks` entries of the query, the best
//! candidate among the first `compared_peaks` entries of the signature whose
//! frequency lies strictly within `tolerance` contributes
//! `(1 - |Δf| / tolerance) · min(ma, mb) / max(ma, mb)`. The sum is divided by
//! `compared_peaks` no matter how many entries the query actually had, so
//! short lists score proportionally lower and `score(a, b)` is not symmetric.

use crate::{features::FeatureList, library::ChordLibrary};

/// Default frequency window, in Hz, within which two peaks may match.
pub const DEFAULT_TOLERANCE: f32 = 50.0;
/// Default number of leading peaks compared on each side; also the divisor.
pub const DEFAULT_COMPARED_PEAKS: usize = 6;
/// Default score a best match must exceed to be considered confident.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// Outcome of matching one query against a library.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Best-scoring chord, absent when nothing scored above zero.
    pub chord: Option<String>,
    /// Score of that chord, in `[0, 1]`.
    pub score: f32,
    /// Threshold the score is judged against.
    pub threshold: f32,
}

impl MatchResult {
    fn none(threshold: f32) -> Self {
        MatchResult {
            chord: None,
            score: 0.0,
            threshold,
        }
    }

    /// `true` when a chord was found and its score exceeds the threshold.
    ///
    /// The chord name is reported either way; callers decide how to present
    /// low-confidence guesses.
    pub fn is_confident(&self) -> bool {
        self.chord.is_some() && self.score > self.threshold
    }

    /// Chord name, only when the match is confident.
    pub fn confident_chord(&self) -> Option<&str> {
        if self.is_confident() {
            self.chord.as_deref()
        } else {
            None
        }
    }
}

/// Builder for a [`ChordMatcher`].
pub struct ChordMatcherBuilder {
    tolerance: f32,
    compared_peaks: usize,
    threshold: f32,
}

impl ChordMatcherBuilder {
    /// Start with defaults: tolerance = 50 Hz, compared_peaks = 6,
    /// threshold = 0.3.
    pub fn new() -> Self {
        ChordMatcherBuilder {
            tolerance: DEFAULT_TOLERANCE,
            compared_peaks: DEFAULT_COMPARED_PEAKS,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Set the frequency window (Hz) for peak matching.
    pub fn tolerance(mut self, hz: f32) -> Self {
        self.tolerance = hz;
        self
    }

    /// Set how many leading peaks are compared; also the score divisor.
    pub fn compared_peaks(mut self, n: usize) -> Self {
        self.compared_peaks = n;
        self
    }

    /// Set the confidence threshold.
    pub fn threshold(mut self, value: f32) -> Self {
        self.threshold = value;
        self
    }

    /// Build the `ChordMatcher`.
    ///
    /// Out-of-range values fall back to the defaults.
    pub fn build(self) -> ChordMatcher {
        let tolerance = if self.tolerance.is_finite() && self.tolerance > 0.0 {
            self.tolerance
        } else {
            log::warn!("ignoring tolerance {}, using {DEFAULT_TOLERANCE}", self.tolerance);
            DEFAULT_TOLERANCE
        };
        let compared_peaks = if self.compared_peaks > 0 {
            self.compared_peaks
        } else {
            log::warn!("ignoring compared_peaks 0, using {DEFAULT_COMPARED_PEAKS}");
            DEFAULT_COMPARED_PEAKS
        };
        let threshold = if (0.0..=1.0).contains(&self.threshold) {
            self.threshold
        } else {
            log::warn!("ignoring threshold {}, using {DEFAULT_THRESHOLD}", self.threshold);
            DEFAULT_THRESHOLD
        };
        ChordMatcher {
            tolerance,
            compared_peaks,
            threshold,
        }
    }
}

impl Default for ChordMatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Similarity scoring and library search.
#[derive(Debug, Clone)]
pub struct ChordMatcher {
    tolerance: f32,
    compared_peaks: usize,
    threshold: f32,
}

impl ChordMatcher {
    /// Return a builder to customize tolerance, peak count and threshold.
    pub fn builder() -> ChordMatcherBuilder {
        ChordMatcherBuilder::new()
    }

    /// Create a matcher with the default parameters.
    pub fn new() -> Self {
        ChordMatcherBuilder::new().build()
    }

    /// Confidence threshold used by [`MatchResult::is_confident`].
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Similarity of `a` to `b`, in `[0, 1]`. Either list empty scores `0.0`.
    pub fn score(&self, a: &FeatureList, b: &FeatureList) -> f32 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let candidates = &b[..b.len().min(self.compared_peaks)];

        let total: f32 = a
            .iter()
            .take(self.compared_peaks)
            .map(|pa| {
                candidates
                    .iter()
                    .filter_map(|pb| {
                        let df = (pa.frequency - pb.frequency).abs();
                        if df >= self.tolerance {
                            return None;
                        }
                        let freq_sim = 1.0 - df / self.tolerance;
                        Some(freq_sim * magnitude_similarity(pa.magnitude, pb.magnitude))
                    })
                    .fold(0.0f32, f32::max)
            })
            .sum();

        total / self.compared_peaks as f32
    }

    /// Best-scoring library entry for `query`.
    ///
    /// Entries are visited in name order and the best is replaced only on a
    /// strictly higher score, so ties go to the lexicographically first name
    /// and an all-zero library yields `(None, 0.0)`.
    pub fn best_match(&self, query: &FeatureList, library: &ChordLibrary) -> MatchResult {
        let mut best = MatchResult::none(self.threshold);
        for (name, signature) in library.iter() {
            let score = self.score(query, signature);
            log::debug!("  {name}: {:.2}% match", score * 100.0);
            if score > best.score {
                best.score = score;
                best.chord = Some(name.to_string());
            }
        }
        best
    }

    /// The `k` best-scoring library entries, highest first.
    ///
    /// Equal scores keep name order. Every stored chord is a candidate, zero
    /// scores included.
    pub fn rank(
        &self,
        query: &FeatureList,
        library: &ChordLibrary,
        k: usize,
    ) -> Vec<MatchResult> {
        let mut scored: Vec<MatchResult> = library
            .iter()
            .map(|(name, signature)| MatchResult {
                chord: Some(name.to_string()),
                score: self.score(query, signature),
                threshold: self.threshold,
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }
}

impl Default for ChordMatcher {
    fn default() -> Self {
        ChordMatcher::new()
    }
}

/// `min / max` of two magnitudes, `0` when both are zero.
#[inline]
fn magnitude_similarity(a: f32, b: f32) -> f32 {
    let hi = a.max(b);
    if hi > 0.0 {
        a.min(b) / hi
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_similarity_handles_zero() {
        assert_eq!(magnitude_similarity(0.0, 0.0), 0.0);
        assert_eq!(magnitude_similarity(2.0, 8.0), 0.25);
        assert_eq!(magnitude_similarity(8.0, 2.0), 0.25);
    }

    #[test]
    fn out_of_range_builder_values_fall_back() {
        let m = ChordMatcher::builder()
            .tolerance(-1.0)
            .compared_peaks(0)
            .threshold(4.0)
            .build();
        assert_eq!(m.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(m.compared_peaks, DEFAULT_COMPARED_PEAKS);
        assert_eq!(m.threshold, DEFAULT_THRESHOLD);
    }
}
