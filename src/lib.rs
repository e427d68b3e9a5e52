//! # chord_recognizer
//!
//! Recognize guitar chords by comparing the dominant spectral peaks of a short
//! recording against a library of previously recorded chord fingerprints.
//!
//! The spectrum is computed with a from-scratch DFT, reduced to at most ten
//! peaks inside the guitar's fundamental range, and scored peak by peak
//! against every stored signature.
//!
//! ## Example
//! ```rust
//! use chord_recognizer::ChordRecognizer;
//! use std::f32::consts::PI;
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let rate = 11_000;
//!     // open low E and its octave, two seconds long
//!     let chord: Vec<f32> = (0..rate * 2)
//!         .map(|n| {
//!             let t = n as f32 / rate as f32;
//!             (2.0 * PI * 82.4 * t).sin() + (2.0 * PI * 164.8 * t).sin()
//!         })
//!         .collect();
//!
//!     // 1) Train against an in-memory library
//!     let mut recognizer = ChordRecognizer::default();
//!     recognizer.train("E", &chord, rate)?;
//!
//!     // 2) Recognize a new take
//!     let result = recognizer.recognize(&chord, rate);
//!     assert_eq!(result.chord.as_deref(), Some("E"));
//!     assert!(result.is_confident());
//!     Ok(())
//! }
//! # run().unwrap();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Session API: train, recognize, list.
pub use recognizer::{ChordRecognizer, ChordRecognizerBuilder, RecognizerError};

/// Peak extraction.
pub use features::{
    FeatureError, FeatureExtractor, FeatureExtractorBuilder, FeatureList, PeakFeature,
};

/// Signature storage.
pub use library::{ChordLibrary, LibraryError};

/// Similarity scoring.
pub use matcher::{ChordMatcher, ChordMatcherBuilder, MatchResult};

/// Manual DFT.
pub use spectrum::SpectrumError;

/// Manual DFT module.
pub mod spectrum;

/// Feature extraction module.
pub mod features;

/// Chord library module.
pub mod library;

/// Matching module.
pub mod matcher;

/// Recognizer session module.
pub mod recognizer;

/// Audio file decoding module.
pub mod decode;

/// Chord sequence module.
pub mod sequence;

/// Song recommendation module.
pub mod songs;

/// Configuration module.
pub mod config;
