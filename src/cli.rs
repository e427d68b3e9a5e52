use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chord_recognizer",
    about = "Guitar chord recognizer using a manual DFT",
    version
)]
pub struct Cli {
    /// TOML config file (defaults to ./chord_recognizer.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chord library file, overrides the config
    #[arg(short, long, global = true)]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a chord signature from an audio file (WAV or OGG)
    Train {
        /// Chord name, e.g. C, G#, Am
        chord: String,
        /// Recording of the chord
        file: PathBuf,
    },

    /// Identify the chord played in an audio file
    Recognize {
        /// Recording to identify
        file: PathBuf,
        /// Number of ranked candidates to print
        #[arg(short = 'n', long, default_value_t = 3)]
        top: usize,
    },

    /// List trained chords
    List,

    /// Recognize every recording under a directory, in path order, and save the sequence
    Sequence {
        /// Directory of recordings
        dir: PathBuf,
        /// Output JSON file, overrides the config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Suggest songs that use the trained chords
    Songs {
        /// Song list (JSON), overrides the config
        #[arg(long)]
        db: Option<PathBuf>,
    },
}
