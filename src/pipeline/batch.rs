// src/pipeline/batch.rs
//
// Sequential batch extraction over a catalogue. One bad file never stops
// the batch; it is recorded as a skipped entry instead.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::MemoCache;
use crate::config::FeatureParams;
use crate::core::analysis::{extract_file, AcousticFeatures};
use crate::dataset::{AudioRecord, Catalogue, Emotion, Gender, Intensity, Statement};

/// Features of one file joined with its catalogue metadata
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRow {
    pub filename: String,
    pub file_path: PathBuf,
    pub emotion: Emotion,
    pub intensity: Intensity,
    pub gender: Gender,
    pub actor_id: u64,
    pub statement: Statement,
    pub features: AcousticFeatures,
}

impl FeatureRow {
    fn new(record: &AudioRecord, features: AcousticFeatures) -> Self {
        let meta = &record.metadata;
        Self {
            filename: meta.filename.clone(),
            file_path: record.file_path.clone(),
            emotion: meta.emotion,
            intensity: meta.intensity,
            gender: meta.gender,
            actor_id: meta.actor_id,
            statement: meta.statement,
            features,
        }
    }
}

/// A catalogued file whose features could not be extracted
#[derive(Debug, Clone, Serialize)]
pub struct FailedExtraction {
    pub filename: String,
    pub file_path: PathBuf,
    pub reason: String,
}

/// Result of a batch run. Rows keep catalogue order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeatureTable {
    pub rows: Vec<FeatureRow>,
    pub failed: Vec<FailedExtraction>,
    /// Files attempted (after the `max_files` cap)
    pub processed: usize,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.rows.len()
    }
}

/// Progress after each completed file
#[derive(Debug, Clone)]
pub struct BatchProgress<'a> {
    /// 1-based position of the file just finished
    pub completed: usize,
    pub total: usize,
    pub filename: &'a str,
    pub succeeded: bool,
}

impl BatchProgress<'_> {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// Extract features for the first `max_files` records (all when `None`),
/// one file at a time, reporting after each.
pub fn extract_batch<F>(
    catalogue: &Catalogue,
    max_files: Option<usize>,
    params: &FeatureParams,
    mut on_progress: F,
) -> FeatureTable
where
    F: FnMut(&BatchProgress<'_>),
{
    let limit = max_files.unwrap_or(usize::MAX).min(catalogue.len());
    let mut table = FeatureTable {
        processed: limit,
        ..Default::default()
    };

    for (i, record) in catalogue.records.iter().take(limit).enumerate() {
        let succeeded = match extract_file(&record.file_path, params) {
            Ok(features) => {
                table.rows.push(FeatureRow::new(record, features));
                true
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", record.filename(), e);
                table.failed.push(FailedExtraction {
                    filename: record.filename().to_string(),
                    file_path: record.file_path.clone(),
                    reason: e.to_string(),
                });
                false
            }
        };

        on_progress(&BatchProgress {
            completed: i + 1,
            total: limit,
            filename: record.filename(),
            succeeded,
        });
    }

    log::info!(
        "Extracted features for {} of {} file(s), {} skipped",
        table.rows.len(),
        limit,
        table.failed.len()
    );
    table
}

/// Feature tables memoised by dataset root and file cap, for one parameter set
pub struct FeatureTableCache {
    params: FeatureParams,
    inner: MemoCache<(PathBuf, Option<usize>), FeatureTable>,
}

impl FeatureTableCache {
    pub fn new(params: FeatureParams) -> Self {
        Self {
            params,
            inner: MemoCache::new(),
        }
    }

    pub fn params(&self) -> &FeatureParams {
        &self.params
    }

    /// Cached table for `catalogue`; progress is only reported on a miss
    pub fn load<F>(&self, catalogue: &Catalogue, max_files: Option<usize>, on_progress: F) -> Arc<FeatureTable>
    where
        F: FnMut(&BatchProgress<'_>),
    {
        let key = (catalogue.root.clone(), max_files);
        self.inner
            .get_or_insert_with(&key, || extract_batch(catalogue, max_files, &self.params, on_progress))
    }

    pub fn get(&self, root: &Path, max_files: Option<usize>) -> Option<Arc<FeatureTable>> {
        self.inner.get(&(root.to_path_buf(), max_files))
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}
