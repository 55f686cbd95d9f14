// src/pipeline/stats.rs
//
// Grouped summary statistics over a feature table

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::batch::{FeatureRow, FeatureTable};
use crate::core::analysis::is_feature_name;
use crate::error::StatsError;

/// Metadata column to group rows by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Emotion,
    Gender,
    Intensity,
    Statement,
    Actor,
}

impl GroupBy {
    pub fn name(&self) -> &'static str {
        match self {
            GroupBy::Emotion => "emotion",
            GroupBy::Gender => "gender",
            GroupBy::Intensity => "intensity",
            GroupBy::Statement => "statement",
            GroupBy::Actor => "actor",
        }
    }

    /// Group label of `row`; actor ids are zero-padded so labels sort numerically
    pub fn key(&self, row: &FeatureRow) -> String {
        match self {
            GroupBy::Emotion => row.emotion.to_string(),
            GroupBy::Gender => row.gender.to_string(),
            GroupBy::Intensity => row.intensity.to_string(),
            GroupBy::Statement => row.statement.to_string(),
            GroupBy::Actor => format!("Actor_{:02}", row.actor_id),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GroupBy {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "emotion" => Ok(GroupBy::Emotion),
            "gender" => Ok(GroupBy::Gender),
            "intensity" => Ok(GroupBy::Intensity),
            "statement" => Ok(GroupBy::Statement),
            "actor" | "actor_id" => Ok(GroupBy::Actor),
            _ => Err(StatsError::UnknownGrouping(s.to_string())),
        }
    }
}

/// Summary of one feature within one group, rounded to 3 decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistics {
    pub group: String,
    pub mean: f64,
    /// Sample standard deviation; absent for single-row groups
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub count: usize,
}

/// Mean of several features within one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeans {
    pub group: String,
    pub count: usize,
    pub means: Vec<(String, f64)>,
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn grouped_values(
    table: &FeatureTable,
    feature: &str,
    group_by: GroupBy,
) -> Result<BTreeMap<String, Vec<f64>>, StatsError> {
    if !is_feature_name(feature) {
        return Err(StatsError::UnknownFeature(feature.to_string()));
    }
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        if let Some(v) = row.features.value(feature) {
            groups.entry(group_by.key(row)).or_default().push(v as f64);
        }
    }
    Ok(groups)
}

fn summarise(group: String, mut values: Vec<f64>) -> GroupStatistics {
    let n = values.len();
    values.sort_by(|a, b| a.total_cmp(b));
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        round3((ss / (n - 1) as f64).sqrt())
    });
    let median = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    };

    GroupStatistics {
        group,
        mean: round3(mean),
        std,
        min: round3(values[0]),
        max: round3(values[n - 1]),
        median: round3(median),
        count: n,
    }
}

/// Mean, sample std, min, max, median and count of `feature` per group,
/// groups in ascending label order
pub fn feature_statistics(
    table: &FeatureTable,
    feature: &str,
    group_by: GroupBy,
) -> Result<Vec<GroupStatistics>, StatsError> {
    let groups = grouped_values(table, feature, group_by)?;
    Ok(groups
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(group, values)| summarise(group, values))
        .collect())
}

/// Per-group means of each of `features`
pub fn group_means(
    table: &FeatureTable,
    features: &[&str],
    group_by: GroupBy,
) -> Result<Vec<GroupMeans>, StatsError> {
    if let Some(bad) = features.iter().find(|f| !is_feature_name(f)) {
        return Err(StatsError::UnknownFeature(bad.to_string()));
    }

    let mut groups: BTreeMap<String, Vec<&FeatureRow>> = BTreeMap::new();
    for row in &table.rows {
        groups.entry(group_by.key(row)).or_default().push(row);
    }

    Ok(groups
        .into_iter()
        .map(|(group, rows)| {
            let means = features
                .iter()
                .map(|&name| {
                    let sum: f64 = rows
                        .iter()
                        .filter_map(|r| r.features.value(name))
                        .map(|v| v as f64)
                        .sum();
                    (name.to_string(), round3(sum / rows.len() as f64))
                })
                .collect();
            GroupMeans {
                group,
                count: rows.len(),
                means,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::{AcousticFeatures, NUM_MFCC};
    use crate::dataset::{Emotion, Gender, Intensity, Statement};
    use std::path::PathBuf;

    fn row(emotion: Emotion, actor_id: u64, duration: f32) -> FeatureRow {
        FeatureRow {
            filename: format!("{}.wav", duration),
            file_path: PathBuf::from("x.wav"),
            emotion,
            intensity: Intensity::Normal,
            gender: Gender::from_actor_id(actor_id),
            actor_id,
            statement: Statement::KidsTalking,
            features: AcousticFeatures {
                duration,
                rms_mean: -20.0,
                rms_std: 5.0,
                pitch_mean: 200.0,
                pitch_std: 10.0,
                spectral_centroid_mean: 1500.0,
                spectral_centroid_std: 300.0,
                spectral_rolloff_mean: 3000.0,
                zcr_mean: 0.1,
                mfcc_mean: [1.0; NUM_MFCC],
                mfcc_std: [0.5; NUM_MFCC],
            },
        }
    }

    fn table() -> FeatureTable {
        FeatureTable {
            rows: vec![
                row(Emotion::Sad, 1, 3.0),
                row(Emotion::Angry, 2, 2.0),
                row(Emotion::Sad, 3, 4.0),
                row(Emotion::Sad, 4, 5.0),
            ],
            failed: Vec::new(),
            processed: 4,
        }
    }

    #[test]
    fn test_statistics_per_emotion() {
        let stats = feature_statistics(&table(), "duration", GroupBy::Emotion).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].group, "angry");
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].std, None);

        let sad = &stats[1];
        assert_eq!(sad.group, "sad");
        assert_eq!(sad.count, 3);
        assert_eq!(sad.mean, 4.0);
        assert_eq!(sad.std, Some(1.0));
        assert_eq!(sad.min, 3.0);
        assert_eq!(sad.max, 5.0);
        assert_eq!(sad.median, 4.0);
    }

    #[test]
    fn test_unknown_feature() {
        assert_eq!(
            feature_statistics(&table(), "loudness", GroupBy::Gender),
            Err(StatsError::UnknownFeature("loudness".into()))
        );
    }

    #[test]
    fn test_group_means_by_gender() {
        let means = group_means(&table(), &["duration", "mfcc_1_mean"], GroupBy::Gender).unwrap();
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].group, "female");
        assert_eq!(means[0].means[0], ("duration".to_string(), 3.5));
        assert_eq!(means[1].group, "male");
        assert_eq!(means[1].means[1], ("mfcc_1_mean".to_string(), 1.0));
    }

    #[test]
    fn test_group_by_parsing() {
        assert_eq!("Gender".parse::<GroupBy>(), Ok(GroupBy::Gender));
        assert_eq!("actor_id".parse::<GroupBy>(), Ok(GroupBy::Actor));
        assert!("colour".parse::<GroupBy>().is_err());
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(-0.0004), -0.0);
    }
}
