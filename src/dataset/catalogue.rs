// src/dataset/catalogue.rs
//
// Dataset indexing: walk a directory tree, parse every WAV filename and
// collect the valid ones into a catalogue. Unparseable files are kept as
// diagnostics instead of being dropped silently.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::metadata::AudioRecord;
use crate::cache::MemoCache;
use crate::core::decoder::decode_file;
use crate::error::ParseMismatch;

const AUDIO_EXTENSION: &str = "wav";

/// A file that was found but excluded from the catalogue
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub file_path: PathBuf,
    pub reason: ParseMismatch,
}

/// Ordered set of parsed records for one dataset root
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalogue {
    pub root: PathBuf,
    pub records: Vec<AudioRecord>,
    pub skipped: Vec<SkippedFile>,
}

impl Catalogue {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioRecord> {
        self.records.iter()
    }
}

/// Walk `root` and build a catalogue of every parseable WAV file.
///
/// A missing or unreadable root yields an empty catalogue. Enumeration is
/// sorted by file name so repeated calls over an unchanged tree agree.
pub fn load_catalogue(root: &Path) -> Catalogue {
    let mut catalogue = Catalogue {
        root: root.to_path_buf(),
        ..Default::default()
    };

    if !root.exists() {
        log::warn!("Dataset root {} does not exist", root.display());
        return catalogue;
    }

    let mut seen: HashSet<PathBuf> = HashSet::new();
    for path in collect_audio_files(root) {
        if !seen.insert(path.clone()) {
            continue;
        }
        match AudioRecord::from_path(&path) {
            Ok(record) => catalogue.records.push(record),
            Err(mismatch) => {
                log::debug!("Skipping {}: {}", path.display(), mismatch);
                catalogue.skipped.push(SkippedFile {
                    file_path: path,
                    reason: mismatch,
                });
            }
        }
    }

    if !catalogue.skipped.is_empty() {
        log::warn!(
            "{} file(s) under {} do not follow the naming convention",
            catalogue.skipped.len(),
            root.display()
        );
    }
    log::info!(
        "Catalogued {} file(s) under {}",
        catalogue.records.len(),
        root.display()
    );

    catalogue
}

fn collect_audio_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return if has_audio_extension(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_audio_extension(p))
        .collect()
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(AUDIO_EXTENSION))
        .unwrap_or(false)
}

/// Catalogues memoised by root directory
#[derive(Default)]
pub struct CatalogueCache {
    inner: MemoCache<PathBuf, Catalogue>,
}

impl CatalogueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, root: &Path) -> std::sync::Arc<Catalogue> {
        self.inner
            .get_or_insert_with(&root.to_path_buf(), || load_catalogue(root))
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

/// Record counts for a catalogue
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogueSummary {
    pub total: usize,
    pub skipped: usize,
    pub actors: usize,
    pub by_emotion: BTreeMap<String, usize>,
    pub by_gender: BTreeMap<String, usize>,
    pub by_intensity: BTreeMap<String, usize>,
    pub by_statement: BTreeMap<String, usize>,
    pub skip_reasons: BTreeMap<String, usize>,
}

impl CatalogueSummary {
    pub fn from_catalogue(catalogue: &Catalogue) -> Self {
        let mut summary = Self {
            total: catalogue.len(),
            skipped: catalogue.skipped.len(),
            ..Default::default()
        };
        let mut actors = HashSet::new();

        for record in catalogue.iter() {
            let meta = &record.metadata;
            actors.insert(meta.actor_id);
            *summary.by_emotion.entry(meta.emotion.to_string()).or_default() += 1;
            *summary.by_gender.entry(meta.gender.to_string()).or_default() += 1;
            *summary.by_intensity.entry(meta.intensity.to_string()).or_default() += 1;
            *summary.by_statement.entry(meta.statement.to_string()).or_default() += 1;
        }
        for skipped in &catalogue.skipped {
            *summary
                .skip_reasons
                .entry(skipped.reason.category().to_string())
                .or_default() += 1;
        }

        summary.actors = actors.len();
        summary
    }
}

/// Mean duration in seconds across every decodable file; 0.0 if none decode
pub fn average_duration(catalogue: &Catalogue) -> f64 {
    let mut total = 0.0f64;
    let mut count = 0usize;

    for record in catalogue.iter() {
        match decode_file(&record.file_path) {
            Ok(audio) => {
                total += audio.duration_secs();
                count += 1;
            }
            Err(e) => log::warn!("Failed to load {}: {}", record.file_path.display(), e),
        }
    }

    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_missing_root_is_empty() {
        let catalogue = load_catalogue(Path::new("/definitely/not/here"));
        assert!(catalogue.is_empty());
        assert!(catalogue.skipped.is_empty());
    }

    #[test]
    fn test_walks_recursively_and_records_skips() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Actor_01/03-01-01-01-01-01-01.wav"));
        touch(&dir.path().join("Actor_02/03-01-05-02-02-02-02.WAV"));
        touch(&dir.path().join("Actor_02/bad-name.wav"));
        touch(&dir.path().join("notes.txt"));

        let catalogue = load_catalogue(dir.path());
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.skipped.len(), 1);
        assert!(catalogue.skipped[0].file_path.ends_with("bad-name.wav"));

        let summary = CatalogueSummary::from_catalogue(&catalogue);
        assert_eq!(summary.actors, 2);
        assert_eq!(summary.by_gender.get("male"), Some(&1));
        assert_eq!(summary.by_gender.get("female"), Some(&1));
        assert_eq!(summary.skip_reasons.get("wrong token count"), Some(&1));
    }

    #[test]
    fn test_repeated_loads_agree() {
        let dir = tempfile::tempdir().unwrap();
        for actor in 1..=4 {
            touch(&dir.path().join(format!("03-01-03-01-01-01-{:02}.wav", actor)));
        }
        let first = load_catalogue(dir.path());
        let second = load_catalogue(dir.path());
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn test_cache_returns_shared_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("03-01-03-01-01-01-01.wav"));
        let cache = CatalogueCache::new();
        let a = cache.load(dir.path());
        touch(&dir.path().join("03-01-03-01-01-01-02.wav"));
        let b = cache.load(dir.path());
        assert!(std::sync::Arc::ptr_eq(&a, &b));
        assert_eq!(b.len(), 1);

        cache.clear();
        assert_eq!(cache.load(dir.path()).len(), 2);
    }

    #[test]
    fn test_average_duration_of_undecodable_files_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("03-01-03-01-01-01-01.wav"));
        let catalogue = load_catalogue(dir.path());
        assert_eq!(average_duration(&catalogue), 0.0);
    }
}
