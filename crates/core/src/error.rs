//! Error types for document-to-slides conversion.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a conversion run.
///
/// Per-element problems (an image that cannot be resolved or downloaded)
/// are not errors at the run level; they are collected as
/// [`SkippedElement`] records instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The source document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The source document exists but could not be accessed.
    #[error("Access denied to document: {0}")]
    Access(String),

    /// The source document has no root or no body to extract from.
    #[error("Malformed source document '{document}': {reason}")]
    MalformedSource { document: String, reason: String },

    /// The paginator could not split the content stream.
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// The content stream reaching the paginator was empty.
    #[error("Content stream is empty: extraction must emit at least one section title")]
    EmptyContent,

    /// A configuration value is out of range or unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The destination presentation could not be created.
    #[error("Failed to create presentation: {0}")]
    PresentationCreation(String),

    /// A batch of slide operations was rejected by the destination.
    #[error("Write failed for slide '{slide}': {reason}")]
    Write { slide: String, reason: String },

    /// Image bytes could not be downloaded.
    #[error("Image download failed for '{uri}': {reason}")]
    ImageDownload { uri: String, reason: String },
}

/// The pipeline stage an error or skipped element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Fetching and decoding the source document.
    Read,
    /// Walking the source tree into content elements.
    Extraction,
    /// Splitting content elements into slide chunks.
    Pagination,
    /// Creating the presentation and writing slide operations.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Extraction => "extraction",
            Stage::Pagination => "pagination",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

impl Error {
    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Error::IoError(_) | Error::NotFound(_) | Error::Access(_) => Stage::Read,
            Error::MalformedSource { .. } => Stage::Extraction,
            Error::Pagination(_) | Error::EmptyContent | Error::InvalidConfig(_) => {
                Stage::Pagination
            }
            Error::PresentationCreation(_) | Error::Write { .. } | Error::ImageDownload { .. } => {
                Stage::Write
            }
        }
    }

    /// Whether the run can continue after this error by skipping one element.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ImageDownload { .. })
    }
}

/// Why a single element was dropped from the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The inline object id has no entry in the document's object map.
    MissingInlineObject,
    /// The inline object carries no embedded object.
    MissingEmbeddedObject,
    /// The embedded object has no image properties (no content URI).
    MissingImageProperties,
    /// The embedded object has no size metadata.
    MissingSize,
    /// The image bytes could not be downloaded.
    DownloadFailed(String),
    /// The destination cannot place an image from this kind of source.
    UnsupportedImageSource,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingInlineObject => f.write_str("inline object not found"),
            SkipReason::MissingEmbeddedObject => f.write_str("no embedded object"),
            SkipReason::MissingImageProperties => f.write_str("no image properties"),
            SkipReason::MissingSize => f.write_str("image size not available"),
            SkipReason::DownloadFailed(reason) => write!(f, "download failed: {}", reason),
            SkipReason::UnsupportedImageSource => f.write_str("unsupported image source"),
        }
    }
}

/// A recoverable, per-element failure recorded for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedElement {
    /// Stage where the element was dropped.
    pub stage: Stage,
    /// Identifier of the offending element (inline object id or image URI).
    pub element: String,
    /// Why it was dropped.
    pub reason: SkipReason,
}

impl SkippedElement {
    /// Create a new skip record.
    pub fn new(stage: Stage, element: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            stage,
            element: element.into(),
            reason,
        }
    }
}
