// src/classifier/encoder.rs
//
// Maps classifier output indices back to emotion labels. Stored as a JSON
// array of class names in output order.

use std::path::Path;

use crate::error::ModelLoadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("no classes".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(format!("duplicate class '{}'", dup));
        }
        Ok(Self { classes })
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.is_file() {
            return Err(ModelLoadError::EncoderMissing(path.to_path_buf()));
        }
        let malformed = |reason: String| ModelLoadError::EncoderMalformed {
            path: path.to_path_buf(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        let classes: Vec<String> = serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
        let encoder = Self::new(classes).map_err(malformed)?;
        log::debug!("Loaded {} class labels from {}", encoder.len(), path.display());
        Ok(encoder)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Label for an output index
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}
