//! The flat content model produced by extraction and consumed by pagination.

use serde::{Deserialize, Serialize};

/// Role of a content element in the linear stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    /// Title of a section (explicit tab or detected heading).
    SectionTitle,
    /// Paragraph styled as the document title.
    DocumentTitle,
    Heading1,
    Heading2,
    Heading3,
    /// Plain body text.
    Paragraph,
    Table,
    Image,
}

impl ElementKind {
    /// Classify a paragraph from its declared named style.
    pub fn from_style_name(style: Option<&str>) -> Self {
        match style.unwrap_or("") {
            "HEADING_1" => ElementKind::Heading1,
            "HEADING_2" => ElementKind::Heading2,
            "HEADING_3" => ElementKind::Heading3,
            "TITLE" => ElementKind::DocumentTitle,
            _ => ElementKind::Paragraph,
        }
    }

    /// Whether this kind always occupies a slide on its own.
    pub fn is_standalone(&self) -> bool {
        matches!(self, ElementKind::Table | ElementKind::Image)
    }

    /// Whether this kind is one of the heading levels.
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            ElementKind::Heading1 | ElementKind::Heading2 | ElementKind::Heading3
        )
    }
}

/// Informational placement hint in points. Never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Frame {
    /// A position-only hint.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: None,
            height: None,
        }
    }

    /// A hint with a size.
    pub fn sized(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Reference to image bytes held by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Fetchable URI of the image content.
    pub uri: String,

    /// Width in the source's native unit (micro-inches), if known.
    pub width_micros: Option<f64>,

    /// Height in the source's native unit (micro-inches), if known.
    pub height_micros: Option<f64>,
}

impl ImageRef {
    /// Create an image reference without size metadata.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            width_micros: None,
            height_micros: None,
        }
    }

    /// Create an image reference with explicit source dimensions.
    pub fn with_size(uri: impl Into<String>, width_micros: f64, height_micros: f64) -> Self {
        Self {
            uri: uri.into(),
            width_micros: Some(width_micros),
            height_micros: Some(height_micros),
        }
    }
}

/// Cell text of a table, row by row. Rows may be ragged.
///
/// Dimensions are always derived from the rows so they cannot drift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of cell strings.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length seen.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text at a position; `None` for cells past the end of a ragged row.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

impl From<Vec<Vec<String>>> for TableData {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

/// One unit of content moving through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentElement {
    /// Role of the element.
    pub kind: ElementKind,

    /// Trimmed text; empty for tables and images.
    pub text: String,

    /// Image reference, only for [`ElementKind::Image`].
    pub image: Option<ImageRef>,

    /// Cell data, only for [`ElementKind::Table`].
    pub table: Option<TableData>,

    /// Nesting depth of the owning section (0 = top level).
    pub section_level: usize,

    /// Debug placement hint.
    pub frame: Option<Frame>,
}

impl ContentElement {
    fn new(kind: ElementKind, text: impl Into<String>, section_level: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            image: None,
            table: None,
            section_level,
            frame: None,
        }
    }

    /// A section title at the given nesting depth.
    pub fn section_title(text: impl Into<String>, section_level: usize) -> Self {
        Self::new(ElementKind::SectionTitle, text, section_level)
    }

    /// A text element (paragraph, heading or document title).
    pub fn text(kind: ElementKind, text: impl Into<String>, section_level: usize) -> Self {
        Self::new(kind, text, section_level)
    }

    /// A plain paragraph.
    pub fn paragraph(text: impl Into<String>, section_level: usize) -> Self {
        Self::new(ElementKind::Paragraph, text, section_level)
    }

    /// A table element.
    pub fn table(data: TableData, section_level: usize) -> Self {
        Self {
            table: Some(data),
            ..Self::new(ElementKind::Table, "", section_level)
        }
    }

    /// An image element.
    pub fn image(image: ImageRef, section_level: usize) -> Self {
        Self {
            image: Some(image),
            ..Self::new(ElementKind::Image, "", section_level)
        }
    }

    /// Attach a placement hint.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Number of whitespace-separated words in the text.
    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count non-blank lines.
pub fn line_count(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_classification() {
        assert_eq!(
            ElementKind::from_style_name(Some("HEADING_1")),
            ElementKind::Heading1
        );
        assert_eq!(
            ElementKind::from_style_name(Some("HEADING_3")),
            ElementKind::Heading3
        );
        assert_eq!(
            ElementKind::from_style_name(Some("TITLE")),
            ElementKind::DocumentTitle
        );
        assert_eq!(
            ElementKind::from_style_name(Some("NORMAL_TEXT")),
            ElementKind::Paragraph
        );
        assert_eq!(
            ElementKind::from_style_name(Some("HEADING_4")),
            ElementKind::Paragraph
        );
        assert_eq!(ElementKind::from_style_name(None), ElementKind::Paragraph);
    }

    #[test]
    fn test_ragged_table_dimensions() {
        let table = TableData::from(vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string(), "e".to_string()],
            vec![
                "f".to_string(),
                "g".to_string(),
                "h".to_string(),
                "i".to_string(),
            ],
        ]);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.cell(1, 1), Some("e"));
        assert_eq!(table.cell(1, 2), None);
        assert_eq!(table.cell(3, 0), None);
    }

    #[test]
    fn test_empty_table() {
        let table = TableData::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_constructors_set_payloads() {
        let image = ContentElement::image(ImageRef::new("https://example.com/a.png"), 2);
        assert_eq!(image.kind, ElementKind::Image);
        assert_eq!(image.text, "");
        assert!(image.table.is_none());
        assert_eq!(image.section_level, 2);

        let table = ContentElement::table(TableData::new(), 1);
        assert_eq!(table.kind, ElementKind::Table);
        assert!(table.image.is_none());
    }

    #[test]
    fn test_kind_groups() {
        assert!(ElementKind::Heading2.is_heading());
        assert!(!ElementKind::DocumentTitle.is_heading());
        assert!(ElementKind::Table.is_standalone());
        assert!(ElementKind::Image.is_standalone());
        assert!(!ElementKind::Paragraph.is_standalone());
    }

    #[test]
    fn test_word_and_line_counts() {
        assert_eq!(word_count("  one two\tthree\nfour "), 4);
        assert_eq!(word_count(""), 0);
        assert_eq!(line_count("a\n\nb\n  \nc"), 3);
    }

    #[test]
    fn test_kind_serializes_screaming_case() {
        let json = serde_json::to_string(&ElementKind::SectionTitle).unwrap();
        assert_eq!(json, "\"SECTION_TITLE\"");
    }
}
