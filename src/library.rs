//! Chord library
//!
//! Named chord signatures, persisted as a JSON object mapping each chord name
//! to its `[frequency_hz, magnitude]` pairs. The whole file is rewritten after
//! every mutation.

use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::features::FeatureList;

/// Errors raised while reading or writing the persisted library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The library file could not be read or written.
    #[error("library file `{path}` unavailable: {source}")]
    Io {
        /// Path of the library file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The library file exists but does not hold a valid library.
    #[error("library file `{path}` is corrupt: {source}")]
    Corrupt {
        /// Path of the library file.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A signature held a NaN or infinite value, which JSON cannot store.
    #[error("signature for `{name}` contains non-finite values")]
    NonFinite {
        /// Chord the signature was meant for.
        name: String,
    },
}

/// Mapping from chord name to its stored signature.
///
/// Names are case-sensitive and enumerate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChordLibrary {
    path: Option<PathBuf>,
    signatures: BTreeMap<String, FeatureList>,
}

impl ChordLibrary {
    /// An empty library with no backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the library stored at `path`.
    ///
    /// A missing file is not an error and yields an empty library bound to
    /// `path`. Unreadable or corrupt files are reported.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let path = path.into();
        let signatures = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| LibraryError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(LibraryError::Io { path, source }),
        };
        Ok(ChordLibrary {
            path: Some(path),
            signatures,
        })
    }

    /// Like [`ChordLibrary::load`], but an unusable file degrades to an empty
    /// library bound to the same path, so training can start over.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(library) => {
                log::info!(
                    "loaded {} chords from {}",
                    library.len(),
                    path.display()
                );
                library
            }
            Err(err) => {
                log::warn!("{err}; starting with an empty library");
                ChordLibrary {
                    path: Some(path),
                    signatures: BTreeMap::new(),
                }
            }
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Rewrite the backing file with the current contents.
    ///
    /// A library without a backing file has nothing to do.
    pub fn save(&self) -> Result<(), LibraryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(&self.signatures).map_err(|source| {
            LibraryError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;

        // write beside the target, then swap it in
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let io_err = |source| LibraryError::Io {
            path: path.clone(),
            source,
        };
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;

        log::info!("library saved to {}", path.display());
        Ok(())
    }

    /// Store `features` under `name`, replacing any previous signature, then
    /// persist the library.
    ///
    /// Signatures with non-finite values are refused. If the save fails the
    /// previous signature is restored, so memory never runs ahead of disk.
    pub fn put(
        &mut self,
        name: impl Into<String>,
        features: FeatureList,
    ) -> Result<(), LibraryError> {
        let name = name.into();
        if features
            .iter()
            .any(|p| !p.frequency.is_finite() || !p.magnitude.is_finite())
        {
            return Err(LibraryError::NonFinite { name });
        }

        let previous = self.signatures.insert(name.clone(), features);
        if let Err(err) = self.save() {
            match previous {
                Some(old) => self.signatures.insert(name, old),
                None => self.signatures.remove(&name),
            };
            return Err(err);
        }
        Ok(())
    }

    /// Signature stored under `name`.
    pub fn get(&self, name: &str) -> Option<&FeatureList> {
        self.signatures.get(name)
    }

    /// Chord names in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.signatures.keys().cloned().collect()
    }

    /// Iterate `(name, signature)` pairs in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureList)> {
        self.signatures.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored chords.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// `true` when no chord has been trained.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
