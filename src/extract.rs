// src/extract.rs
//! Text extractor boundary: raw document bytes → plain text, may fail.
//! Failure only ever marks the one file as failed, never the run.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unreadable document {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no text could be extracted from {}: {source}", path.display())]
    Unparseable {
        path: PathBuf,
        #[source]
        source: pdf_extract::OutputError,
    },
}

pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Production extractor: reads the file and hands the bytes to `pdf-extract`.
/// Pure read, no side effects.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = fs::read(path).map_err(|source| ExtractionError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|source| ExtractionError::Unparseable {
            path: path.to_path_buf(),
            source,
        })
    }
}

// --- Test helper ---
/// Extractor serving canned text keyed by file name; files with no entry
/// report an extraction failure. Lets pipeline tests run without real PDFs.
pub struct CannedTextExtractor {
    texts: std::collections::HashMap<String, String>,
}

impl CannedTextExtractor {
    pub fn new() -> Self {
        Self {
            texts: std::collections::HashMap::new(),
        }
    }

    pub fn with_text(mut self, file_name: &str, text: &str) -> Self {
        self.texts.insert(file_name.to_string(), text.to_string());
        self
    }
}

impl Default for CannedTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for CannedTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.texts
            .get(&name)
            .cloned()
            .ok_or_else(|| ExtractionError::Unreadable {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no canned text"),
            })
    }
}
