// tests/features_test.rs
//
// Descriptive feature extraction, batch isolation and grouped statistics.

mod test_utils;

use approx::assert_abs_diff_eq;
use emocheckr::config::FeatureParams;
use emocheckr::pipeline::group_means;
use emocheckr::{extract, extract_batch, feature_statistics, EmotionAnalyzer, GroupBy, StatsError, FEATURE_NAMES};
use test_utils::{dataset_name, harmonic_tone, sine, wav_bytes, TestDataset};

#[test]
fn test_schema_is_complete_and_finite() {
    let params = FeatureParams::default();
    let inputs: Vec<(Vec<f32>, u32)> = vec![
        (harmonic_tone(180.0, 22050, 1.0), 22050),
        (sine(1000.0, 8000, 0.05, 0.3), 8000),
        (vec![0.0; 4000], 16000),
        (vec![0.25], 16000),
    ];

    for (samples, rate) in inputs {
        let features = extract(&samples, rate, &params).expect("features");
        let values = features.named_values();
        assert_eq!(values.len(), FEATURE_NAMES.len());
        assert_eq!(values.len(), 35);
        for (name, value) in values {
            assert!(value.is_finite(), "{} = {} at {} samples", name, value, samples.len());
        }
    }
}

#[test]
fn test_empty_signal_yields_nothing() {
    assert!(extract(&[], 16000, &FeatureParams::default()).is_err());
}

#[test]
fn test_pitch_tracks_fundamental() {
    let tone = harmonic_tone(200.0, 22050, 1.0);
    let features = extract(&tone, 22050, &FeatureParams::default()).unwrap();
    assert_abs_diff_eq!(features.duration, 1.0, epsilon = 1e-3);
    assert!(features.pitch_mean > 150.0 && features.pitch_mean < 250.0, "pitch {}", features.pitch_mean);
    assert!(features.spectral_centroid_mean > 100.0);
}

#[test]
fn test_pitch_ignores_unvoiced_frames() {
    let mut samples = vec![0.0f32; 22050];
    samples.extend(sine(440.0, 22050, 1.0, 0.5));
    let features = extract(&samples, 22050, &FeatureParams::default()).unwrap();
    assert_abs_diff_eq!(features.pitch_mean, 440.0, epsilon = 5.0);
    assert!(features.pitch_std < 5.0, "pitch std {}", features.pitch_std);
}

#[test]
fn test_batch_isolates_corrupt_file() {
    let ds = TestDataset::new();
    ds.add_recording("03", "01", "01", 1, 120.0);
    ds.add_recording("04", "01", "02", 2, 220.0);
    ds.add_bytes(Some(3), &dataset_name("05", "02", "01", "01", 3), b"RIFF\x00\x00\x00\x00WAVEjunk");
    ds.add_recording("05", "02", "02", 4, 230.0);

    let analyzer = EmotionAnalyzer::new();
    let catalogue = analyzer.load_catalogue(ds.root());
    assert_eq!(catalogue.len(), 4);

    let mut seen = Vec::new();
    let table = extract_batch(&catalogue, None, &FeatureParams::default(), |p| {
        seen.push((p.completed, p.total, p.succeeded));
    });

    assert_eq!(table.len(), 3);
    assert_eq!(table.failed.len(), 1);
    assert_eq!(table.processed, 4);
    assert_eq!(seen.len(), 4);
    assert_eq!(seen.iter().filter(|s| !s.2).count(), 1);
    assert_eq!(seen.last(), Some(&(4, 4, true)));
    assert!(table.failed[0].filename.ends_with("-03.wav"));
}

#[test]
fn test_batch_respects_max_files() {
    let ds = TestDataset::new();
    for actor in 1..=4 {
        ds.add_recording("01", "01", "01", actor, 150.0);
    }
    let analyzer = EmotionAnalyzer::new();
    let catalogue = analyzer.load_catalogue(ds.root());

    let table = analyzer.extract_batch_features(&catalogue, Some(2), |_| {});
    assert_eq!(table.len(), 2);
    let actors: Vec<u64> = table.rows.iter().map(|r| r.actor_id).collect();
    assert_eq!(actors, vec![1, 2]);

    let mut calls = 0;
    let again = analyzer.extract_batch_features(&catalogue, Some(2), |_| calls += 1);
    assert_eq!(calls, 0);
    assert_eq!(again.len(), 2);
}

#[test]
fn test_grouped_statistics_by_gender() {
    let ds = TestDataset::new();
    ds.add_recording("01", "01", "01", 1, 120.0);
    ds.add_recording("01", "01", "01", 3, 130.0);
    ds.add_recording("01", "01", "01", 2, 220.0);
    ds.add_recording("01", "01", "01", 4, 240.0);

    let analyzer = EmotionAnalyzer::new();
    let catalogue = analyzer.load_catalogue(ds.root());
    let table = analyzer.extract_batch_features(&catalogue, None, |_| {});
    assert_eq!(table.len(), 4);

    let stats = feature_statistics(&table, "duration", GroupBy::Gender).unwrap();
    assert_eq!(stats.len(), 2);
    for group in &stats {
        assert_eq!(group.count, 2);
        assert_abs_diff_eq!(group.mean, 0.5, epsilon = 1e-3);
        assert!(group.min <= group.median && group.median <= group.max);
    }

    let means = group_means(&table, &["pitch_mean", "duration"], GroupBy::Gender).unwrap();
    assert_eq!(means.len(), 2);
    assert!(means.iter().all(|m| m.means.len() == 2));

    assert_eq!(
        feature_statistics(&table, "loudness", GroupBy::Gender).unwrap_err(),
        StatsError::UnknownFeature("loudness".into())
    );
}

#[test]
fn test_unknown_grouping_rejected() {
    let err = "colour".parse::<GroupBy>().unwrap_err();
    assert_eq!(err, StatsError::UnknownGrouping("colour".into()));
    assert_eq!("actor".parse::<GroupBy>().unwrap(), GroupBy::Actor);
}

#[test]
fn test_single_file_features_via_analyzer() {
    let ds = TestDataset::new();
    let path = ds.add_bytes(None, "tone.wav", &wav_bytes(&harmonic_tone(200.0, 16000, 0.5), 1, 16000, 16));
    let analyzer = EmotionAnalyzer::new();
    let features = analyzer.extract_single_file_features(&path).unwrap();
    assert_abs_diff_eq!(features.duration, 0.5, epsilon = 1e-2);
    assert!(analyzer.extract_single_file_features(&ds.root().join("missing.wav")).is_err());
}
