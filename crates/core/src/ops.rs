//! Declarative operations sent to the destination presentation service.

use crate::layout::{ImagePlacement, LayoutArchetype};

/// Text-bearing object an operation addresses.
#[derive(Debug, Clone, PartialEq)]
pub enum TextTarget {
    /// A shape or placeholder.
    Shape(String),
    /// One cell of a table.
    TableCell {
        table_id: String,
        row: usize,
        column: usize,
    },
}

impl TextTarget {
    /// Object id of the shape or table.
    pub fn object_id(&self) -> &str {
        match self {
            TextTarget::Shape(id) => id,
            TextTarget::TableCell { table_id, .. } => table_id,
        }
    }
}

/// Where image content comes from.
#[derive(Clone, PartialEq)]
pub enum ImageSource {
    /// A URL the destination fetches itself.
    Url(String),
    /// Raw bytes, for destinations that cannot fetch.
    Bytes(Vec<u8>),
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ImageSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

/// One declarative write operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideOperation {
    CreateSlide {
        slide_id: String,
        layout: LayoutArchetype,
    },
    InsertText {
        target: TextTarget,
        text: String,
    },
    CreateTable {
        table_id: String,
        slide_id: String,
        rows: usize,
        columns: usize,
    },
    CreateImage {
        image_id: String,
        slide_id: String,
        source: ImageSource,
        placement: ImagePlacement,
    },
    SetFontSize {
        target: TextTarget,
        size: f64,
    },
}

impl SlideOperation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SlideOperation::CreateSlide { .. } => "create-slide",
            SlideOperation::InsertText { .. } => "insert-text",
            SlideOperation::CreateTable { .. } => "create-table",
            SlideOperation::CreateImage { .. } => "create-image",
            SlideOperation::SetFontSize { .. } => "set-font-size",
        }
    }
}
