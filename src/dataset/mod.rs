//! Dataset handling: filename metadata and directory indexing

mod catalogue;
mod metadata;

pub use catalogue::{
    average_duration, load_catalogue, Catalogue, CatalogueCache, CatalogueSummary, SkippedFile,
};
pub use metadata::{
    parse_filename, AudioRecord, Emotion, Gender, Intensity, RecordDisplay, RecordMetadata,
    Statement,
};
