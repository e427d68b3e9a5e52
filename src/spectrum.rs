//! Spectrum
//!
//! From-scratch Discrete Fourier Transform of a real sample buffer.
//!
//! Every output bin is an explicit `O(N)` sum, so a full transform costs
//! `O(N²)`. No fast-transform shortcut is taken; bins are independent and are
//! accumulated in parallel.

use std::f64::consts::PI;

use rayon::prelude::*;
use rustfft::num_complex::Complex;
use thiserror::Error;

/// Errors returned by the spectrum transform.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpectrumError {
    /// The sample buffer handed to the transform was empty.
    #[error("invalid input: cannot transform an empty sample buffer")]
    InvalidInput,
}

/// Compute the first `N/2` complex bins of the DFT of `signal`.
///
/// For bin `k`:
/// `re = Σ x[n]·cos(2πkn/N)` and `im = -Σ x[n]·sin(2πkn/N)`.
///
/// Returns `Err(SpectrumError::InvalidInput)` when `signal` is empty.
pub fn dft(signal: &[f32]) -> Result<Vec<Complex<f32>>, SpectrumError> {
    let n = signal.len();
    if n == 0 {
        return Err(SpectrumError::InvalidInput);
    }

    // cos/sin of 2πr/N for every phase index r in [0, N)
    let twiddles: Vec<(f64, f64)> = (0..n)
        .map(|r| {
            let angle = 2.0 * PI * r as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    let bins = (0..n / 2)
        .into_par_iter()
        .map(|k| {
            let mut re = 0.0f64;
            let mut im = 0.0f64;
            let mut phase = 0usize;
            for &x in signal {
                let (c, s) = twiddles[phase];
                let x = x as f64;
                re += x * c;
                im -= x * s;
                // phase = k·n mod N, advanced without forming k·n
                phase += k;
                if phase >= n {
                    phase -= n;
                }
            }
            Complex::new(re as f32, im as f32)
        })
        .collect();

    Ok(bins)
}

/// Magnitude `sqrt(re² + im²)` of each complex bin.
pub fn magnitudes(bins: &[Complex<f32>]) -> Vec<f32> {
    bins.iter().map(|c| c.re.hypot(c.im)).collect()
}

/// Magnitude spectrum of `signal`: `signal.len() / 2` values, bin `k`
/// standing for frequency `k * sample_rate / signal.len()`.
pub fn transform(signal: &[f32]) -> Result<Vec<f32>, SpectrumError> {
    let bins = dft(signal)?;
    Ok(magnitudes(&bins))
}
