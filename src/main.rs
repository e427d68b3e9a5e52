mod cli;

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use walkdir::WalkDir;

use chord_recognizer::{
    config::Config,
    decode,
    sequence::ChordSequence,
    songs::SongBook,
    ChordLibrary, ChordRecognizer, RecognizerError,
};
use cli::{Cli, Command};

const CONFIG_FILE: &str = "chord_recognizer.toml";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let library_path = cli.library.clone().unwrap_or_else(|| config.library.clone());
    let extractor = config
        .extractor()
        .context("Invalid [analysis] settings")?;
    let mut recognizer = ChordRecognizer::builder()
        .extractor(extractor)
        .matcher(config.matcher())
        .library(ChordLibrary::open(library_path))
        .build();

    match cli.command {
        Command::Train { chord, file } => train(&mut recognizer, &chord, &file),
        Command::Recognize { file, top } => recognize(&recognizer, &file, top),
        Command::List => {
            list(&recognizer);
            Ok(())
        }
        Command::Sequence { dir, output } => {
            let output = output.unwrap_or_else(|| config.sequence_output.clone());
            sequence(&recognizer, &dir, &output)
        }
        Command::Songs { db } => {
            let db = db.unwrap_or_else(|| config.songs.clone());
            songs(&recognizer, &db)
        }
    }
}

/// Explicit `--config`, else `./chord_recognizer.toml`, else the user config dir.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = explicit.map(Path::to_path_buf).or_else(|| {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("chord_recognizer").join("config.toml"))
            .filter(|p| p.exists())
    });

    match path {
        Some(path) => {
            let config = Config::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

fn train(recognizer: &mut ChordRecognizer, chord: &str, file: &Path) -> Result<()> {
    let audio = decode::load_audio(file)
        .with_context(|| format!("Failed to decode {}", file.display()))?;

    match recognizer.train(chord, &audio.samples, audio.sample_rate) {
        Ok(features) => {
            println!("Chord '{}' features extracted:", chord.trim());
            println!("Top frequencies (Hz) and magnitudes:");
            for peak in features.iter().take(5) {
                println!("  {:.1} Hz: {:.2}", peak.frequency, peak.magnitude);
            }
            Ok(())
        }
        Err(RecognizerError::SilentRecording) => {
            println!("No usable signal in {}; chord not trained.", file.display());
            Ok(())
        }
        Err(err) => Err(err).context("Training failed"),
    }
}

fn recognize(recognizer: &ChordRecognizer, file: &Path, top: usize) -> Result<()> {
    if recognizer.library().is_empty() {
        println!("No chords in library! Please train some chords first.");
        return Ok(());
    }
    let audio = decode::load_audio(file)
        .with_context(|| format!("Failed to decode {}", file.display()))?;

    // one extraction feeds both the ranking and the verdict
    let features = recognizer
        .extractor()
        .extract(&audio.samples, audio.sample_rate);
    let matcher = recognizer.matcher();

    println!("Chord Recognition Results:");
    println!("{}", "=".repeat(40));
    for (i, candidate) in matcher
        .rank(&features, recognizer.library(), top)
        .iter()
        .enumerate()
    {
        println!(
            "{}. {:>3} chord - {:.1}% confidence",
            i + 1,
            candidate.chord.as_deref().unwrap_or("?"),
            candidate.score * 100.0
        );
    }

    let result = matcher.best_match(&features, recognizer.library());
    match (result.confident_chord(), result.chord.as_deref()) {
        (Some(chord), _) => println!(
            "\nDetected chord: {chord} (confidence: {:.1}%)",
            result.score * 100.0
        ),
        (None, Some(guess)) => println!(
            "\nChord not clearly recognized. Best guess: {guess} (low confidence: {:.1}%)",
            result.score * 100.0
        ),
        (None, None) => println!("\nNo match found."),
    }
    Ok(())
}

fn list(recognizer: &ChordRecognizer) {
    let chords = recognizer.list_chords();
    if chords.is_empty() {
        println!("No chords in library yet.");
        return;
    }
    println!("Chords in library ({}):", chords.len());
    for chord in chords {
        println!("  - {chord}");
    }
}

fn sequence(recognizer: &ChordRecognizer, dir: &Path, output: &Path) -> Result<()> {
    if recognizer.library().is_empty() {
        println!("No chords in library! Please train some chords first.");
        return Ok(());
    }

    let mut seq = ChordSequence::new();
    let files = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.into_path()),
            Err(err) => {
                log::warn!("Skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|p| p.is_file() && decode::is_supported(p));

    for path in files {
        let audio = match decode::load_audio(&path) {
            Ok(a) => a,
            Err(err) => {
                log::warn!("Skipping {}: {err}", path.display());
                continue;
            }
        };
        let result = recognizer.recognize(&audio.samples, audio.sample_rate);
        match seq.record(&result).map(str::to_owned) {
            Some(chord) => println!(
                "{}. {chord} ({:.1}% confidence)  <- {}",
                seq.len(),
                result.score * 100.0,
                path.display()
            ),
            None => println!("   no match  <- {}", path.display()),
        }
    }

    if seq.is_empty() {
        println!("No chords recognized under {}.", dir.display());
        return Ok(());
    }
    let summary = seq
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Saved {} chords ({} unique) to {}\nUnique chords: {}",
        summary.total_recorded,
        summary.unique_chords.len(),
        output.display(),
        summary.unique_chords.join(", ")
    );
    Ok(())
}

fn songs(recognizer: &ChordRecognizer, db: &Path) -> Result<()> {
    let book = SongBook::load(db).with_context(|| format!("Failed to load {}", db.display()))?;
    let learned: BTreeSet<String> = recognizer.list_chords().into_iter().collect();

    let playable = book.playable(&learned);
    println!("Playable songs ({}):", playable.len());
    for song in playable {
        match &song.artist {
            Some(artist) => println!("  - {} ({artist})", song.title),
            None => println!("  - {}", song.title),
        }
    }

    let almost = book.almost_playable(&learned);
    println!("Almost playable ({}):", almost.len());
    for (song, missing) in almost {
        let missing: Vec<&str> = missing.iter().map(String::as_str).collect();
        println!("  - {} (learn: {})", song.title, missing.join(", "));
    }
    Ok(())
}
