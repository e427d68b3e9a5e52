//! Manual DFT against its defining properties and a reference FFT.

mod common;

use chord_recognizer::spectrum::{self, SpectrumError};
use rustfft::{num_complex::Complex, FftPlanner};

fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap()
}

#[test]
fn spectrum_has_half_as_many_bins_as_samples() {
    for n in [1usize, 2, 3, 7, 64, 101, 1000] {
        let signal: Vec<f32> = (0..n).map(|i| (i as f32 * 0.37).sin()).collect();
        let spectrum = spectrum::transform(&signal).unwrap();
        assert_eq!(spectrum.len(), n / 2, "n = {n}");
    }
}

#[test]
fn sinusoid_peaks_at_its_bin() {
    let cases = [(440.0, 8_000, 1024), (82.4, 11_000, 5_500), (1_000.0, 44_100, 2_048)];
    for (f0, rate, n) in cases {
        let mut signal = common::tones(&[(f0, 1.0)], rate, n as f32 / rate as f32);
        signal.truncate(n);
        let spectrum = spectrum::transform(&signal).unwrap();
        let expected = (f0 * n as f32 / rate as f32).round() as i64;
        let got = argmax(&spectrum) as i64;
        assert!(
            (got - expected).abs() <= 1,
            "f0 = {f0}: peak at bin {got}, expected {expected}"
        );
    }
}

#[test]
fn empty_buffer_is_invalid_input() {
    assert_eq!(spectrum::transform(&[]), Err(SpectrumError::InvalidInput));
    assert_eq!(spectrum::dft(&[]), Err(SpectrumError::InvalidInput));
}

#[test]
fn matches_reference_fft() {
    let n = 750;
    let signal: Vec<f32> = common::tones(&[(123.0, 0.7), (456.0, 0.2), (789.0, 0.1)], 3_000, 0.25)
        .into_iter()
        .take(n)
        .collect();
    assert_eq!(signal.len(), n);

    let manual = spectrum::dft(&signal).unwrap();

    let mut reference: Vec<Complex<f32>> = signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
    FftPlanner::<f32>::new()
        .plan_fft_forward(n)
        .process(&mut reference);

    let scale = spectrum::magnitudes(&reference[..n / 2])
        .into_iter()
        .fold(0.0f32, f32::max);
    for (k, (m, r)) in manual.iter().zip(&reference).enumerate() {
        assert!((m.re - r.re).abs() < 1e-3 * scale, "re differs at bin {k}");
        assert!((m.im - r.im).abs() < 1e-3 * scale, "im differs at bin {k}");
    }
}
