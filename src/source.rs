//! Input documents and how their kind is worked out.

use crate::SourceError;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a source document contains
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Any number of pages
    Pdf,
    /// A single page
    Jpeg,
    /// A single page
    Png,
}

impl SourceKind {
    /// Infer the kind from a filename's extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Result<SourceKind, SourceError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(SourceKind::Pdf),
            "jpg" | "jpeg" => Ok(SourceKind::Jpeg),
            "png" => Ok(SourceKind::Png),
            _ => Err(SourceError::UnsupportedFormat(extension)),
        }
    }

    /// The decoder to use for single-image kinds
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            SourceKind::Pdf => None,
            SourceKind::Jpeg => Some(ImageFormat::Jpeg),
            SourceKind::Png => Some(ImageFormat::Png),
        }
    }
}

/// One uploaded file: its bytes, the name it was uploaded under, and optionally
/// an explicitly declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Overrides inference from `filename` when set
    pub declared_kind: Option<SourceKind>,
}

impl SourceDocument {
    pub fn new<S: ToString>(filename: S, bytes: Vec<u8>) -> SourceDocument {
        SourceDocument {
            filename: filename.to_string(),
            bytes,
            declared_kind: None,
        }
    }

    /// Read a source from disk, naming it after the file
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<SourceDocument> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(SourceDocument::new(filename, bytes))
    }

    pub fn with_kind(mut self, kind: SourceKind) -> SourceDocument {
        self.declared_kind = Some(kind);
        self
    }

    /// The declared kind, or the kind inferred from the filename
    pub fn kind(&self) -> Result<SourceKind, SourceError> {
        match self.declared_kind {
            Some(kind) => Ok(kind),
            None => SourceKind::from_filename(&self.filename),
        }
    }
}
