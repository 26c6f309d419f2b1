//! Source document tree handed to the extractor by a [`SourceReader`].
//!
//! This is a format-neutral view of a hierarchical rich-text document:
//! nested tabs (sections), each with a body of paragraphs, tables and
//! break markers, plus a map of inline objects that paragraphs reference.
//!
//! [`SourceReader`]: crate::collab::SourceReader

use crate::error::SkipReason;
use std::collections::HashMap;

/// The root structural node of a source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    /// Identifier of the document at the source.
    pub document_id: String,

    /// Declared document title.
    pub title: String,

    /// Top-level tabs. Empty when the source has no explicit hierarchy.
    pub tabs: Vec<SourceTab>,

    /// Document-level body, used when there are no tabs.
    pub body: Option<Body>,

    /// Document-level inline objects, used with `body`.
    pub inline_objects: InlineObjects,
}

impl SourceDocument {
    /// Create an empty document with the given id and title.
    pub fn new(document_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Whether the source exposes an explicit section/tab hierarchy.
    pub fn has_tabs(&self) -> bool {
        !self.tabs.is_empty()
    }
}

/// A section node with its own body and child sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTab {
    pub id: String,
    pub title: String,
    pub body: Option<Body>,
    pub inline_objects: InlineObjects,
    pub children: Vec<SourceTab>,
}

impl SourceTab {
    /// Create a tab with a title and an empty body.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: Some(Body::default()),
            ..Default::default()
        }
    }

    /// Set the body blocks.
    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.body = Some(Body { blocks });
        self
    }

    /// Add a child tab.
    pub fn with_child(mut self, child: SourceTab) -> Self {
        self.children.push(child);
        self
    }

    /// Set the inline objects referenced from this tab's body.
    pub fn with_inline_objects(mut self, objects: InlineObjects) -> Self {
        self.inline_objects = objects;
        self
    }
}

/// Ordered structural content of a section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub blocks: Vec<Block>,
}

impl Body {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// One structural child of a body.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(SourceTable),
    Break(BreakKind),
}

/// Kind of break marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    Section,
    Page,
}

/// A paragraph: a sequence of inline runs and a declared style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Declared named style (e.g. `HEADING_1`, `TITLE`, `NORMAL_TEXT`).
    pub style_name: Option<String>,
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    /// A single-run paragraph with no style.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            style_name: None,
            inlines: vec![Inline::Text(text.into())],
        }
    }

    /// A single-run paragraph with a named style.
    pub fn styled(style: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            style_name: Some(style.into()),
            inlines: vec![Inline::Text(text.into())],
        }
    }

    /// Append an inline image reference.
    pub fn with_image(mut self, object_id: impl Into<String>) -> Self {
        self.inlines.push(Inline::Image(object_id.into()));
        self
    }

    /// Concatenation of all text runs, untrimmed.
    pub fn raw_text(&self) -> String {
        self.inlines
            .iter()
            .filter_map(|inline| match inline {
                Inline::Text(text) => Some(text.as_str()),
                Inline::Image(_) => None,
            })
            .collect()
    }

    /// Inline image ids in encounter order.
    pub fn image_ids(&self) -> impl Iterator<Item = &str> {
        self.inlines.iter().filter_map(|inline| match inline {
            Inline::Image(id) => Some(id.as_str()),
            Inline::Text(_) => None,
        })
    }
}

/// An inline run inside a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    /// Reference to an entry of the owning section's [`InlineObjects`].
    Image(String),
}

/// A table node. Rows may have different numbers of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub rows: Vec<Vec<Cell>>,
}

/// A table cell holding paragraphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

impl Cell {
    /// A cell with one plain paragraph per text.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paragraphs: texts.into_iter().map(Paragraph::plain).collect(),
        }
    }
}

/// Size of an embedded object in micro-inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width_micros: f64,
    pub height_micros: f64,
}

/// Embedded object behind an inline reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedObject {
    /// Content URI; `None` when the object has no image properties.
    pub content_uri: Option<String>,
    pub size: Option<Size>,
}

/// An entry of the inline object map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineObject {
    pub embedded: Option<EmbeddedObject>,
}

impl InlineObject {
    /// A fully described image object.
    pub fn image(uri: impl Into<String>, width_micros: f64, height_micros: f64) -> Self {
        Self {
            embedded: Some(EmbeddedObject {
                content_uri: Some(uri.into()),
                size: Some(Size {
                    width_micros,
                    height_micros,
                }),
            }),
        }
    }
}

/// A successfully resolved inline image.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub uri: String,
    pub width_micros: f64,
    pub height_micros: f64,
}

/// Resolves inline image references to their embedded-object descriptors.
///
/// Resolution fails softly: the caller drops the image and records the
/// reason, extraction continues.
pub trait ImageResolver {
    fn resolve(&self, object_id: &str) -> std::result::Result<ResolvedImage, SkipReason>;
}

/// Map from inline object id to object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineObjects {
    objects: HashMap<String, InlineObject>,
}

impl InlineObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, object: InlineObject) {
        self.objects.insert(id.into(), object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromIterator<(String, InlineObject)> for InlineObjects {
    fn from_iter<T: IntoIterator<Item = (String, InlineObject)>>(iter: T) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl ImageResolver for InlineObjects {
    fn resolve(&self, object_id: &str) -> std::result::Result<ResolvedImage, SkipReason> {
        let object = self
            .objects
            .get(object_id)
            .ok_or(SkipReason::MissingInlineObject)?;
        let embedded = object
            .embedded
            .as_ref()
            .ok_or(SkipReason::MissingEmbeddedObject)?;
        let uri = embedded
            .content_uri
            .as_ref()
            .ok_or(SkipReason::MissingImageProperties)?;
        let size = embedded.size.ok_or(SkipReason::MissingSize)?;

        Ok(ResolvedImage {
            uri: uri.clone(),
            width_micros: size.width_micros,
            height_micros: size.height_micros,
        })
    }
}
