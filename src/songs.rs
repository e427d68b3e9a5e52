//! Songs
//!
//! Suggests songs from a JSON song list given the chords a player has trained.

use std::{collections::BTreeSet, fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Songs missing at most this many chords count as almost playable.
const MAX_MISSING: usize = 2;

/// Errors raised while loading a song list.
#[derive(Debug, Error)]
pub enum SongError {
    /// The song list could not be read.
    #[error("failed to read song list: {0}")]
    Io(#[from] io::Error),

    /// The song list is not a JSON array of songs.
    #[error("invalid song list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One song and the chords it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Song title.
    pub title: String,
    /// Performing artist, if known.
    #[serde(default)]
    pub artist: Option<String>,
    /// Chord names used by the song.
    pub chords: Vec<String>,
}

impl Song {
    /// Chords of this song not in `learned`.
    pub fn missing(&self, learned: &BTreeSet<String>) -> BTreeSet<String> {
        self.chords
            .iter()
            .filter(|c| !learned.contains(*c))
            .cloned()
            .collect()
    }
}

/// A collection of songs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongBook {
    songs: Vec<Song>,
}

impl SongBook {
    /// Wrap an existing list of songs.
    pub fn new(songs: Vec<Song>) -> Self {
        SongBook { songs }
    }

    /// Load a JSON array of songs from `path`.
    pub fn load(path: &Path) -> Result<Self, SongError> {
        let text = fs::read_to_string(path)?;
        let book = Self::from_json(&text)?;
        log::debug!("loaded {} songs from {}", book.songs.len(), path.display());
        Ok(book)
    }

    /// Parse a JSON array of songs.
    pub fn from_json(text: &str) -> Result<Self, SongError> {
        Ok(SongBook {
            songs: serde_json::from_str(text)?,
        })
    }

    /// All songs.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Songs whose every chord is in `learned`.
    pub fn playable(&self, learned: &BTreeSet<String>) -> Vec<&Song> {
        self.songs
            .iter()
            .filter(|s| s.missing(learned).is_empty())
            .collect()
    }

    /// Songs missing one or two chords, each with the chords still to learn.
    pub fn almost_playable(&self, learned: &BTreeSet<String>) -> Vec<(&Song, BTreeSet<String>)> {
        self.songs
            .iter()
            .filter_map(|s| {
                let missing = s.missing(learned);
                (1..=MAX_MISSING)
                    .contains(&missing.len())
                    .then_some((s, missing))
            })
            .collect()
    }
}
