//! Chord sequence
//!
//! Collects confidently recognized chords in the order they were played, e.g.
//! while a player strums through a progression one chord per recording.

use std::{collections::HashSet, fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::matcher::MatchResult;

/// Persisted snapshot of a [`ChordSequence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceSummary {
    /// Number of chords recorded, repeats included.
    pub total_recorded: usize,
    /// Distinct chords in first-occurrence order.
    pub unique_chords: Vec<String>,
    /// Every recorded chord in order.
    pub all_chords: Vec<String>,
    /// Local time the summary was taken, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
}

/// Ordered list of recognized chords.
#[derive(Debug, Clone, Default)]
pub struct ChordSequence {
    chords: Vec<String>,
}

impl ChordSequence {
    /// An empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the result's chord if the match is confident.
    ///
    /// Returns the appended chord, or `None` when the result was skipped.
    pub fn record(&mut self, result: &MatchResult) -> Option<&str> {
        let chord = result.confident_chord()?;
        self.chords.push(chord.to_string());
        self.chords.last().map(String::as_str)
    }

    /// All recorded chords, in order.
    pub fn chords(&self) -> &[String] {
        &self.chords
    }

    /// Distinct chords, keeping the first occurrence of each.
    pub fn unique(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.chords
            .iter()
            .filter(|c| seen.insert(c.as_str()))
            .cloned()
            .collect()
    }

    /// Number of recorded chords.
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Snapshot stamped with the current local time.
    pub fn summary(&self) -> SequenceSummary {
        SequenceSummary {
            total_recorded: self.chords.len(),
            unique_chords: self.unique(),
            all_chords: self.chords.clone(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Write [`ChordSequence::summary`] to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> io::Result<SequenceSummary> {
        let summary = self.summary();
        let text = serde_json::to_string_pretty(&summary)?;
        fs::write(path, text)?;
        log::info!(
            "saved {} chords ({} unique) to {}",
            summary.total_recorded,
            summary.unique_chords.len(),
            path.display()
        );
        Ok(summary)
    }
}
