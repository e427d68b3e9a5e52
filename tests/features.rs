//! Peak extraction: band limits, silence and window decimation.

mod common;

use chord_recognizer::{FeatureExtractor, PeakFeature};

const RATE: u32 = 11_000;

#[test]
fn silent_recording_yields_no_features() {
    let extractor = FeatureExtractor::default();
    for rate in [8_000, 11_000, 22_050] {
        assert!(extractor.extract(&vec![0.0; rate as usize], rate).is_empty());
    }
    assert!(extractor.extract(&[], RATE).is_empty());
}

#[test]
fn features_stay_inside_band_and_budget() {
    let extractor = FeatureExtractor::default();
    // partials well below, inside and above the accepted band
    let raw = common::tones(
        &[(5.0, 1.0), (30.0, 0.8), (60.0, 0.6), (150.0, 0.5), (300.0, 0.4), (600.0, 0.3)],
        RATE,
        2.0,
    );
    let features = extractor.extract(&raw, RATE);
    assert!(!features.is_empty());
    assert!(features.len() <= 10);
    for p in &features {
        assert!(p.frequency > 80.0 && p.frequency < 1500.0, "{p:?} outside band");
    }
}

#[test]
fn features_are_sorted_and_unique() {
    let extractor = FeatureExtractor::default();
    let raw = common::tones(&[(82.4, 1.0), (110.0, 0.7), (146.8, 0.5), (196.0, 0.3)], RATE, 2.0);
    let features = extractor.extract(&raw, RATE);

    for pair in features.windows(2) {
        assert!(pair[0].magnitude >= pair[1].magnitude);
        assert_ne!(pair[0].frequency, pair[1].frequency);
    }
    let mut freqs: Vec<f32> = features.iter().map(|p| p.frequency).collect();
    freqs.sort_by(f32::total_cmp);
    freqs.dedup();
    assert_eq!(freqs.len(), features.len());
}

#[test]
fn frequency_axis_uses_nominal_rate_over_window_length() {
    // 2 s at 11 kHz decimates by 4 into a 5500-sample window: 2 Hz per bin,
    // and a raw tone lands at four times its frequency.
    let extractor = FeatureExtractor::default();
    let raw = common::tones(&[(100.0, 1.0)], RATE, 2.0);
    let features = extractor.extract(&raw, RATE);
    assert_eq!(features[0], PeakFeature::new(400.0, features[0].magnitude));
    assert!(features.iter().all(|p| p.frequency % 2.0 == 0.0));
}

#[test]
fn narrower_configuration_is_honoured() {
    let extractor = FeatureExtractor::builder()
        .max_peaks(3)
        .min_frequency(300.0)
        .max_frequency(500.0)
        .build()
        .unwrap();
    let raw = common::tones(&[(100.0, 1.0), (200.0, 0.9)], RATE, 2.0);
    let features = extractor.extract(&raw, RATE);
    assert!(features.len() <= 3);
    assert!(features.iter().all(|p| p.frequency > 300.0 && p.frequency < 500.0));
}

#[test]
fn invalid_configuration_is_rejected() {
    assert!(FeatureExtractor::builder().analysis_duration(0.0).build().is_err());
    assert!(FeatureExtractor::builder().max_peaks(0).build().is_err());
}

#[test]
fn overflowing_bins_are_dropped() {
    let extractor = FeatureExtractor::default();
    let raw = common::tones(&[(220.0, 1e36)], RATE, 2.0);
    let features = extractor.extract(&raw, RATE);
    assert!(features
        .iter()
        .all(|p| p.frequency.is_finite() && p.magnitude.is_finite()));
    // the tone itself sits at 880 Hz on the decimated axis and overflows
    assert!(features.iter().all(|p| p.frequency != 880.0));
}
