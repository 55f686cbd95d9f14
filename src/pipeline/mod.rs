//! Batch feature extraction over a catalogue and grouped statistics

mod batch;
mod stats;

pub use batch::{extract_batch, BatchProgress, FailedExtraction, FeatureRow, FeatureTable, FeatureTableCache};
pub use stats::{feature_statistics, group_means, GroupBy, GroupMeans, GroupStatistics};
