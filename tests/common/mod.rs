//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::{f32::consts::PI, path::PathBuf};

/// Sum of sinusoids `(frequency_hz, amplitude)` sampled at `rate` for `seconds`.
pub fn tones(partials: &[(f32, f32)], rate: u32, seconds: f32) -> Vec<f32> {
    let len = (rate as f32 * seconds).round() as usize;
    (0..len)
        .map(|n| {
            let t = n as f32 / rate as f32;
            partials
                .iter()
                .map(|&(f, a)| a * (2.0 * PI * f * t).sin())
                .sum()
        })
        .collect()
}

/// Fresh path under the system temp dir, unique per test and process.
pub fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("chord_recognizer-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}
