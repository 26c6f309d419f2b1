//! Contracts for the external collaborators around the conversion core.
//!
//! Reading the source document, downloading image bytes and talking to the
//! destination presentation service are owned by implementations of these
//! traits, including any retry policy.

use crate::error::Result;
use crate::ops::SlideOperation;
use crate::source::SourceDocument;

/// Fetches the root structural node of a source document.
pub trait SourceReader {
    /// Fails with [`Error::NotFound`] or [`Error::Access`]; a document with
    /// no usable root fails with [`Error::MalformedSource`].
    ///
    /// [`Error::NotFound`]: crate::Error::NotFound
    /// [`Error::Access`]: crate::Error::Access
    /// [`Error::MalformedSource`]: crate::Error::MalformedSource
    fn fetch(&self, handle: &str) -> Result<SourceDocument>;
}

/// Downloads raw image bytes.
pub trait ImageFetcher {
    fn download(&self, uri: &str) -> Result<Vec<u8>>;
}

/// A presentation created on the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationHandle {
    pub id: String,
    pub title: String,
}

/// Placeholder object ids of a created slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Accepts ordered batches of slide operations.
///
/// Placeholders only exist once a create-slide operation has been applied,
/// so callers apply the creation first and then ask for them.
pub trait DestinationWriter {
    /// Create an empty presentation.
    fn create_presentation(&mut self, title: &str) -> Result<PresentationHandle>;

    /// Apply one batch; the whole batch succeeds or fails.
    fn apply(&mut self, presentation: &PresentationHandle, batch: &[SlideOperation]) -> Result<()>;

    /// Look up the title and body placeholders of a created slide.
    fn resolve_placeholders(
        &mut self,
        presentation: &PresentationHandle,
        slide_id: &str,
    ) -> Result<Placeholders>;

    /// Whether images must be sent as bytes instead of URLs.
    fn requires_image_bytes(&self) -> bool {
        false
    }
}
