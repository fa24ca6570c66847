//! Annotation file persistence.
//!
//! A versioned JSON document holding the exported annotations of one or more
//! images plus file-level metadata.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::AnnotationDto;

/// Current file format version.
pub const FILE_VERSION: &str = "1.0";

/// File-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub author: String,
}

/// A complete annotation document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub version: String,
    pub metadata: FileMetadata,
    pub annotations: Vec<AnnotationDto>,
}

impl AnnotationFile {
    /// Creates a document around exported annotations, timestamped now.
    pub fn new(author: impl Into<String>, annotations: Vec<AnnotationDto>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_VERSION.to_string(),
            metadata: FileMetadata {
                created: now,
                modified: now,
                author: author.into(),
            },
            annotations,
        }
    }

    /// Saves the document as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize annotation file")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write annotation file: {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            count = self.annotations.len(),
            "annotation file saved"
        );
        Ok(())
    }

    /// Loads a document from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read annotation file: {}", path.display()))?;
        let file: AnnotationFile = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse annotation file: {}", path.display()))?;
        Ok(file)
    }
}
