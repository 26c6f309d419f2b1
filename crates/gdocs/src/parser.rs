//! Docs JSON parser implementation.

use crate::api;
use docslides_core::{
    Block, Body, BreakKind, Cell, EmbeddedObject, Error, Inline, InlineObject, InlineObjects,
    Paragraph, Result, Size, SourceDocument, SourceReader, SourceTab, SourceTable,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

const MICROS_PER_INCH: f64 = 1_000_000.0;
const POINTS_PER_INCH: f64 = 72.0;
const EMU_PER_INCH: f64 = 914_400.0;

/// Parser for Docs API document resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocsParser;

impl DocsParser {
    /// Create a new Docs parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a document resource from a reader.
    ///
    /// `name` identifies the input in errors and stands in for the document
    /// id when the resource has none.
    pub fn parse<R: Read>(&self, reader: R, name: &str) -> Result<SourceDocument> {
        let document: api::Document =
            serde_json::from_reader(reader).map_err(|e| Error::MalformedSource {
                document: name.to_string(),
                reason: format!("Invalid document JSON: {}", e),
            })?;
        Ok(self.convert(document, name))
    }

    /// Parse a document resource from a string.
    pub fn parse_str(&self, json: &str, name: &str) -> Result<SourceDocument> {
        self.parse(json.as_bytes(), name)
    }

    fn convert(&self, document: api::Document, name: &str) -> SourceDocument {
        let document_id = if document.document_id.is_empty() {
            name.to_string()
        } else {
            document.document_id
        };

        let tabs: Vec<SourceTab> = document.tabs.iter().map(|tab| self.convert_tab(tab)).collect();
        let body = if tabs.is_empty() {
            document.body.as_ref().map(convert_body)
        } else {
            None
        };

        log::debug!(
            "Parsed document '{}': {} top-level tabs, body: {}",
            document_id,
            tabs.len(),
            body.is_some()
        );

        SourceDocument {
            document_id,
            title: document.title,
            tabs,
            body,
            inline_objects: convert_inline_objects(&document.inline_objects),
        }
    }

    fn convert_tab(&self, tab: &api::Tab) -> SourceTab {
        let (body, inline_objects) = match &tab.document_tab {
            Some(document_tab) => (
                document_tab.body.as_ref().map(convert_body),
                convert_inline_objects(&document_tab.inline_objects),
            ),
            None => (None, InlineObjects::new()),
        };

        SourceTab {
            id: tab.tab_properties.tab_id.clone(),
            title: tab.tab_properties.title.clone(),
            body,
            inline_objects,
            children: tab.child_tabs.iter().map(|child| self.convert_tab(child)).collect(),
        }
    }
}

fn convert_body(body: &api::Body) -> Body {
    let mut blocks = Vec::new();

    for element in &body.content {
        if let Some(paragraph) = &element.paragraph {
            let has_page_break = paragraph.elements.iter().any(|e| e.page_break.is_some());
            blocks.push(Block::Paragraph(convert_paragraph(paragraph)));
            if has_page_break {
                blocks.push(Block::Break(BreakKind::Page));
            }
        } else if let Some(table) = &element.table {
            blocks.push(Block::Table(convert_table(table)));
        } else if element.section_break.is_some() {
            // Every body opens with the break of its default section
            if blocks.is_empty() {
                continue;
            }
            blocks.push(Block::Break(BreakKind::Section));
        } else if element.table_of_contents.is_some() {
            log::debug!("Skipping table of contents");
        }
    }

    Body::new(blocks)
}

fn convert_paragraph(paragraph: &api::Paragraph) -> Paragraph {
    let inlines = paragraph
        .elements
        .iter()
        .filter_map(|element| {
            if let Some(run) = &element.text_run {
                Some(Inline::Text(run.content.clone()))
            } else {
                element
                    .inline_object_element
                    .as_ref()
                    .map(|object| Inline::Image(object.inline_object_id.clone()))
            }
        })
        .collect();

    Paragraph {
        style_name: paragraph
            .paragraph_style
            .as_ref()
            .and_then(|style| style.named_style_type.clone()),
        inlines,
    }
}

fn convert_table(table: &api::Table) -> SourceTable {
    SourceTable {
        rows: table
            .table_rows
            .iter()
            .map(|row| {
                row.table_cells
                    .iter()
                    .map(|cell| Cell {
                        paragraphs: cell
                            .content
                            .iter()
                            .filter_map(|element| element.paragraph.as_ref())
                            .map(convert_paragraph)
                            .collect(),
                    })
                    .collect()
            })
            .collect(),
    }
}

fn convert_inline_objects(objects: &HashMap<String, api::InlineObject>) -> InlineObjects {
    objects
        .iter()
        .map(|(id, object)| {
            let embedded = object
                .inline_object_properties
                .as_ref()
                .and_then(|properties| properties.embedded_object.as_ref())
                .map(|embedded| EmbeddedObject {
                    content_uri: embedded
                        .image_properties
                        .as_ref()
                        .and_then(|image| image.content_uri.clone()),
                    size: embedded.size.as_ref().and_then(convert_size),
                });
            (id.clone(), InlineObject { embedded })
        })
        .collect()
}

fn convert_size(size: &api::Size) -> Option<Size> {
    Some(Size {
        width_micros: to_micros(size.width.as_ref()?)?,
        height_micros: to_micros(size.height.as_ref()?)?,
    })
}

/// Convert a dimension to micro-inches. Unitless magnitudes are taken as
/// micro-inches already.
fn to_micros(dimension: &api::Dimension) -> Option<f64> {
    let magnitude = dimension.magnitude?;
    let micros = match dimension.unit.as_deref() {
        Some("PT") => magnitude / POINTS_PER_INCH * MICROS_PER_INCH,
        Some("EMU") => magnitude / EMU_PER_INCH * MICROS_PER_INCH,
        _ => magnitude,
    };
    Some(micros)
}

/// [`SourceReader`] over Docs JSON exports on disk.
///
/// Handles are file paths, resolved against an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct DocsJsonReader {
    base_dir: Option<PathBuf>,
    parser: DocsParser,
}

impl DocsJsonReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative handles against a directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, handle: &str) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(handle),
            None => PathBuf::from(handle),
        }
    }
}

impl SourceReader for DocsJsonReader {
    fn fetch(&self, handle: &str) -> Result<SourceDocument> {
        let path = self.resolve(handle);
        let file = File::open(&path).map_err(|e| open_error(&path, e))?;
        log::debug!("Reading Docs JSON from {}", path.display());
        self.parser.parse(BufReader::new(file), handle)
    }
}

fn open_error(path: &Path, error: io::Error) -> Error {
    match error.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        io::ErrorKind::PermissionDenied => Error::Access(path.display().to_string()),
        _ => Error::IoError(error),
    }
}
