//! Decode
//!
//! Loads recorded clips from disk as mono, peak-normalized sample buffers.
//! WAV goes through `hound`, Ogg Vorbis through `lewton`.

use std::{fs::File, io, path::Path};

use lewton::inside_ogg::OggStreamReader;
use thiserror::Error;

/// Errors raised while decoding an audio file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened.
    #[error("failed to open audio file: {0}")]
    Io(#[from] io::Error),

    /// The WAV reader rejected the file.
    #[error("invalid WAV file: {0}")]
    Wav(#[from] hound::Error),

    /// The Vorbis reader rejected the file.
    #[error("invalid Ogg/Vorbis file: {0}")]
    Vorbis(#[from] lewton::VorbisError),

    /// The file extension is not one we can decode.
    #[error("unsupported audio format `{0}` (expected wav or ogg)")]
    UnsupportedFormat(String),

    /// The stream declared zero channels.
    #[error("audio stream has no channels")]
    NoChannels,
}

/// Mono samples in `[-1.0, 1.0]` with their sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Amplitude samples.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl SampleBuffer {
    /// Length of the clip in seconds.
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode `path` (by extension) into a mono, peak-normalized buffer.
pub fn load_audio(path: &Path) -> Result<SampleBuffer, DecodeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mut buffer = match ext.as_str() {
        "wav" | "wave" => load_wav(path)?,
        "ogg" | "oga" => load_ogg(path)?,
        _ => return Err(DecodeError::UnsupportedFormat(ext)),
    };
    normalize(&mut buffer.samples);

    log::debug!(
        "decoded {}: {} samples, {}Hz, {:.1}s",
        path.display(),
        buffer.samples.len(),
        buffer.sample_rate,
        buffer.duration()
    );
    Ok(buffer)
}

/// `true` for extensions [`load_audio`] understands.
pub fn is_supported(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref(),
        Some("wav" | "wave" | "ogg" | "oga")
    )
}

fn load_wav(path: &Path) -> Result<SampleBuffer, DecodeError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(DecodeError::NoChannels);
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    Ok(SampleBuffer {
        samples: downmix(&interleaved, channels),
        sample_rate: spec.sample_rate,
    })
}

fn load_ogg(path: &Path) -> Result<SampleBuffer, DecodeError> {
    let file = File::open(path)?;
    let mut ogg = OggStreamReader::new(file)?;
    let channels = ogg.ident_hdr.audio_channels as usize;
    if channels == 0 {
        return Err(DecodeError::NoChannels);
    }
    let sample_rate = ogg.ident_hdr.audio_sample_rate;

    let mut samples = Vec::new();
    while let Some(pcm) = ogg.read_dec_packet_itl()? {
        for frame in pcm.chunks(channels) {
            let sum: f32 = frame.iter().map(|&s| s as f32 / i16::MAX as f32).sum();
            samples.push(sum / channels as f32);
        }
    }

    Ok(SampleBuffer {
        samples,
        sample_rate,
    })
}

/// Average interleaved frames down to one channel.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Scale so the loudest sample sits at ±1. Silence is left untouched.
fn normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    if peak > 0.0 {
        samples.iter_mut().for_each(|s| *s /= peak);
    }
}
