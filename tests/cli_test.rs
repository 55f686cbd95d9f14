// tests/cli_test.rs
//
// End-to-end runs of the emocheckr binary.

mod test_utils;

use std::path::Path;
use std::process::{Command, Output};

use test_utils::{read_samples, sine_wav, TestDataset};

fn emocheckr(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_emocheckr"))
        .args(args)
        .arg("--no-color")
        .env_remove("EMOCHECKR_CONFIG")
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute emocheckr")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn test_index_json() {
    let ds = TestDataset::new();
    ds.add_recording("06", "01", "02", 12, 200.0);
    ds.add_bytes(None, "bad-name.wav", &sine_wav(220.0, 8000, 0.1));

    let out = emocheckr(&["index", path_arg(ds.root()), "--json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let records = value["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["emotion"], "fearful");
    assert_eq!(records[0]["gender"], "female");
    assert_eq!(value["data"]["skipped"].as_array().unwrap().len(), 1);
}

#[test]
fn test_batch_csv_to_file() {
    let ds = TestDataset::new();
    ds.add_recording("03", "01", "01", 1, 150.0);
    ds.add_recording("04", "02", "01", 2, 210.0);
    let csv = ds.root().join("features.csv");

    let out = emocheckr(&[
        "batch",
        path_arg(ds.root()),
        "--format",
        "csv",
        "--output",
        path_arg(&csv),
        "--group-by",
        "emotion",
        "--feature",
        "duration",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = std::fs::read_to_string(&csv).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].split(',').count(), 6 + 35);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("duration by emotion"));
}

#[test]
fn test_convert_fallback_writes_original() {
    let ds = TestDataset::new();
    let input = ds.add_bytes(None, "mono.wav", &sine_wav(440.0, 8000, 0.1));
    let output = ds.root().join("out.wav");

    let out = emocheckr(&["convert", path_arg(&input), path_arg(&output), "--channels", "2"]);
    assert!(out.status.success());
    assert_eq!(std::fs::read(&output).unwrap(), std::fs::read(&input).unwrap());

    let strict = emocheckr(&["convert", path_arg(&input), path_arg(&output), "--channels", "2", "--strict"]);
    assert!(!strict.status.success());
}

#[test]
fn test_convert_to_explicit_rate() {
    let ds = TestDataset::new();
    let input = ds.add_bytes(None, "mono.wav", &sine_wav(440.0, 8000, 0.25));
    let output = ds.root().join("out.wav");

    let out = emocheckr(&["convert", path_arg(&input), path_arg(&output), "--channels", "1", "--rate", "16000"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let (spec, samples) = read_samples(&std::fs::read(&output).unwrap());
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 1);
    assert_eq!(samples.len(), 4000);
}

#[test]
fn test_props_reports_header() {
    let ds = TestDataset::new();
    let input = ds.add_bytes(None, "tone.wav", &sine_wav(440.0, 8000, 0.5));

    let out = emocheckr(&["props", path_arg(&input)]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("8000 Hz"));
    assert!(stdout.contains("16 bit"));
}

#[test]
fn test_predict_without_model_fails() {
    let ds = TestDataset::new();
    let input = ds.add_bytes(None, "tone.wav", &sine_wav(440.0, 8000, 0.5));
    let model = ds.root().join("none.onnx");

    let out = emocheckr(&["predict", path_arg(&input), "--model", path_arg(&model)]);
    assert!(!out.status.success());
}

#[test]
fn test_describe_lists_features() {
    let out = emocheckr(&["describe", "--mfcc"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("pitch_mean"));
    assert!(stdout.contains("mfcc_13_mean"));
}
