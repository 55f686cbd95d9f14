//! Output formatting for CLI results

use chrono::{DateTime, Utc};
use colorful::{Color, Colorful};
use serde::Serialize;

use crate::classifier::PredictionResult;
use crate::core::analysis::{AcousticFeatures, FeatureDescription, FEATURE_NAMES};
use crate::core::wav::{AudioProperties, NormalizedAudio};
use crate::dataset::{Catalogue, CatalogueSummary, RecordDisplay};
use crate::pipeline::{FeatureTable, GroupBy, GroupStatistics};

/// Terminal styling; a no-op when colour is disabled
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// JSON envelope for every report
#[derive(Debug, Serialize)]
pub struct JsonReport<'a, T: Serialize> {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub data: &'a T,
}

pub fn format_json<T: Serialize>(data: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        generated_at: Utc::now(),
        data,
    })
}

fn push_counts(out: &mut String, title: &str, counts: &std::collections::BTreeMap<String, usize>) {
    out.push_str(&format!("\n  {}:\n", title));
    for (key, count) in counts {
        out.push_str(&format!("    {:<32} {:>5}\n", key, count));
    }
}

pub fn format_summary(summary: &CatalogueSummary, style: Style) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} recordings, {} actors\n",
        style.paint("✓", Color::Green),
        style.bold(&summary.total.to_string()),
        summary.actors
    ));

    push_counts(&mut out, "Emotion", &summary.by_emotion);
    push_counts(&mut out, "Gender", &summary.by_gender);
    push_counts(&mut out, "Intensity", &summary.by_intensity);
    push_counts(&mut out, "Statement", &summary.by_statement);

    if summary.skipped > 0 {
        out.push_str(&format!(
            "\n  {}\n",
            style.paint(&format!("{} file(s) skipped:", summary.skipped), Color::Yellow)
        ));
        for (reason, count) in &summary.skip_reasons {
            out.push_str(&format!("    {:<32} {:>5}\n", reason, count));
        }
    }
    out
}

pub fn format_catalogue_listing(catalogue: &Catalogue) -> String {
    let mut out = String::new();
    for record in catalogue.iter() {
        let d = RecordDisplay::from(record);
        out.push_str(&format!(
            "  {:<28} {:<10} {:<7} {:<7} {:<9} {}\n",
            d.filename, d.emotion, d.intensity, d.gender, d.speaker_id, d.sentence
        ));
    }
    out
}

pub fn format_features(path: &str, features: &AcousticFeatures, style: Style) -> String {
    let mut out = format!("Features: {}\n", style.paint(path, Color::Cyan));
    for (name, value) in features.named_values() {
        out.push_str(&format!("  {:<24} {:>12.4}\n", name, value));
    }
    out
}

pub fn format_descriptions(descriptions: &[FeatureDescription], style: Style) -> String {
    let mut out = String::new();
    for d in descriptions {
        out.push_str(&format!(
            "{} ({}, {})\n  {}\n  {}\n\n",
            style.bold(&d.name),
            d.key,
            d.unit,
            d.description,
            d.interpretation
        ));
    }
    out
}

pub fn format_batch_summary(table: &FeatureTable, style: Style) -> String {
    let mut out = format!(
        "{} {} succeeded, {} skipped (of {})\n",
        style.paint("✓", Color::Green),
        table.succeeded(),
        table.failed.len(),
        table.processed
    );
    for failed in &table.failed {
        out.push_str(&format!(
            "  {} {}: {}\n",
            style.paint("✗", Color::Red),
            failed.filename,
            failed.reason
        ));
    }
    out
}

/// Compact per-row view of the headline features
pub fn format_table(table: &FeatureTable) -> String {
    let mut out = format!(
        "  {:<28} {:<10} {:>8} {:>9} {:>9} {:>10} {:>7}\n",
        "filename", "emotion", "duration", "rms_mean", "pitch", "centroid", "zcr"
    );
    for row in &table.rows {
        let f = &row.features;
        out.push_str(&format!(
            "  {:<28} {:<10} {:>8.3} {:>9.2} {:>9.1} {:>10.1} {:>7.4}\n",
            row.filename,
            row.emotion.to_string(),
            f.duration,
            f.rms_mean,
            f.pitch_mean,
            f.spectral_centroid_mean,
            f.zcr_mean
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Full table as CSV: metadata columns followed by the 35 features
pub fn format_csv(table: &FeatureTable) -> String {
    let mut header: Vec<String> = ["filename", "emotion", "intensity", "gender", "actor_id", "statement"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(FEATURE_NAMES.iter().map(|s| s.to_string()));

    let mut out = header.join(",");
    out.push('\n');
    for row in &table.rows {
        let mut fields = vec![
            csv_field(&row.filename),
            row.emotion.to_string(),
            row.intensity.to_string(),
            row.gender.to_string(),
            row.actor_id.to_string(),
            csv_field(&row.statement.to_string()),
        ];
        fields.extend(row.features.named_values().into_iter().map(|(_, v)| v.to_string()));
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn format_group_statistics(feature: &str, group_by: GroupBy, stats: &[GroupStatistics], style: Style) -> String {
    let mut out = format!("\n{} by {}\n", style.bold(feature), group_by);
    out.push_str(&format!(
        "  {:<30} {:>10} {:>10} {:>10} {:>10} {:>10} {:>6}\n",
        group_by.name(),
        "mean",
        "std",
        "min",
        "max",
        "median",
        "count"
    ));
    for s in stats {
        let std = s.std.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<30} {:>10.3} {:>10} {:>10.3} {:>10.3} {:>10.3} {:>6}\n",
            s.group, s.mean, std, s.min, s.max, s.median, s.count
        ));
    }
    out
}

pub fn format_properties(path: &str, props: &AudioProperties, style: Style) -> String {
    format!(
        "{}\n  Channels:     {}\n  Sample width: {} bit ({} bytes)\n  Sample rate:  {} Hz\n  Frames:       {}\n  Duration:     {:.3}s\n",
        style.paint(path, Color::Cyan),
        props.channels,
        props.sample_width_bits,
        props.sample_width_bytes(),
        props.sample_rate,
        props.frame_count,
        props.duration_secs
    )
}

pub fn format_conversion(output: &str, result: &NormalizedAudio, style: Style) -> String {
    match result.fallback_reason() {
        None => format!("{} Converted -> {}\n", style.paint("✓", Color::Green), output),
        Some(reason) => format!(
            "{} Conversion failed ({}); original audio written to {}\n",
            style.paint("⚠", Color::Yellow),
            reason,
            output
        ),
    }
}

pub fn format_prediction(path: &str, result: &PredictionResult, style: Style) -> String {
    let mut out = format!(
        "{}\n  Emotion: {} ({:.1}%)\n\n",
        style.paint(path, Color::Cyan),
        style.bold(&result.label),
        result.confidence() * 100.0
    );
    for (label, p) in result.ranked() {
        let width = (p.clamp(0.0, 1.0) * 40.0).round() as usize;
        let bar = "█".repeat(width);
        out.push_str(&format!(
            "  {:<12} {:>6.1}% {}\n",
            label,
            p * 100.0,
            style.paint(&bar, Color::Blue)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: Style = Style { color: false };

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_empty_csv_has_header() {
        let csv = format_csv(&FeatureTable::default());
        let header = csv.lines().next().unwrap();
        assert_eq!(header.split(',').count(), 6 + FEATURE_NAMES.len());
        assert!(header.starts_with("filename,emotion"));
    }

    #[test]
    fn test_json_envelope() {
        let json = format_json(&vec![1, 2, 3]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tool"], "emocheckr");
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_prediction_ranked() {
        let result = PredictionResult {
            label: "sad".into(),
            probabilities: vec![0.2, 0.8],
            class_labels: vec!["happy".into(), "sad".into()],
        };
        let text = format_prediction("x.wav", &result, PLAIN);
        let sad = text.find("sad ").unwrap();
        let happy = text.find("happy").unwrap();
        assert!(sad < happy);
        assert!(text.contains("80.0%"));
    }
}
