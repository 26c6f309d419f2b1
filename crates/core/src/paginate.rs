//! Pagination: re-chunks the linear content stream into slide-sized
//! windows under word and line budgets.

use crate::config::PaginationConfig;
use crate::error::{Error, Result};
use crate::model::{word_count, ContentElement, ElementKind, ImageRef, TableData};
use serde::Serialize;

/// What a chunk carries onto its slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChunkContent {
    /// Title only (section divider or document title).
    Title,
    /// Body text, lines separated by `\n`.
    Text(String),
    Table(TableData),
    Image(ImageRef),
}

/// How a chunk was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChunkOrigin {
    /// Divider for a section or document title.
    Divider,
    /// Paragraph lines packed under both budgets.
    Packed,
    /// Part of one oversized paragraph split on word boundaries.
    OversizedSplit,
    /// A table or image on its own.
    Standalone,
}

/// One slide's worth of content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideChunk {
    /// Slide title (section title, possibly with a continuation prefix).
    pub title: String,
    pub content: ChunkContent,
    /// Level of the section the chunk belongs to.
    pub section_level: usize,
    pub origin: ChunkOrigin,
}

impl SlideChunk {
    /// Body text, if this is a text chunk.
    pub fn body(&self) -> Option<&str> {
        match &self.content {
            ChunkContent::Text(body) => Some(body),
            _ => None,
        }
    }
}

/// Groups content elements into slide chunks.
#[derive(Debug, Clone)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    /// Create a paginator, validating its limits.
    pub fn new(config: PaginationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Split the element stream into chunks, preserving order.
    ///
    /// An empty stream is an invariant violation: extraction always emits
    /// at least one section title.
    pub fn paginate(&self, elements: &[ContentElement]) -> Result<Vec<SlideChunk>> {
        if elements.is_empty() {
            return Err(Error::EmptyContent);
        }

        let mut state = PageState::new(&self.config);

        for element in elements {
            match element.kind {
                ElementKind::SectionTitle => {
                    state.flush();
                    state.section_title = element.text.clone();
                    state.section_level = element.section_level;
                    if self.config.section_title_slides {
                        state.push(element.text.clone(), ChunkContent::Title, ChunkOrigin::Divider);
                    }
                }
                ElementKind::DocumentTitle => {
                    state.flush();
                    state.push(element.text.clone(), ChunkContent::Title, ChunkOrigin::Divider);
                }
                kind if kind.is_heading() => {
                    // A heading starts a fresh buffer so it stays with what follows
                    state.flush();
                    state.add_text(&element.text);
                }
                kind if kind.is_standalone() => {
                    state.flush();
                    let content = standalone_content(element)?;
                    let title = state.section_title.clone();
                    state.push(title, content, ChunkOrigin::Standalone);
                }
                _ => state.add_text(&element.text),
            }
        }

        state.flush();

        log::info!(
            "Paginated {} elements into {} chunks",
            elements.len(),
            state.chunks.len()
        );
        Ok(state.chunks)
    }
}

/// Payload of a table or image element.
fn standalone_content(element: &ContentElement) -> Result<ChunkContent> {
    match (element.kind, &element.table, &element.image) {
        (ElementKind::Table, Some(data), _) => Ok(ChunkContent::Table(data.clone())),
        (ElementKind::Table, None, _) => Err(Error::Pagination(
            "table element without table data".to_string(),
        )),
        (_, _, Some(image)) => Ok(ChunkContent::Image(image.clone())),
        (_, _, None) => Err(Error::Pagination(
            "image element without image reference".to_string(),
        )),
    }
}

/// Mutable pagination state for one run.
struct PageState<'a> {
    config: &'a PaginationConfig,
    chunks: Vec<SlideChunk>,
    section_title: String,
    section_level: usize,
    buffer: Vec<String>,
}

impl<'a> PageState<'a> {
    fn new(config: &'a PaginationConfig) -> Self {
        Self {
            config,
            chunks: Vec::new(),
            section_title: String::new(),
            section_level: 0,
            buffer: Vec::new(),
        }
    }

    fn push(&mut self, title: String, content: ChunkContent, origin: ChunkOrigin) {
        self.chunks.push(SlideChunk {
            title,
            content,
            section_level: self.section_level,
            origin,
        });
    }

    /// Buffer paragraph text, or split it directly when it alone is over
    /// the word budget.
    fn add_text(&mut self, text: &str) {
        if word_count(text) > self.config.max_words_per_chunk {
            self.flush();
            self.split_oversized(text);
        } else {
            self.buffer.push(text.to_string());
        }
    }

    /// Pack buffered lines greedily under the line and word budgets.
    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let joined = std::mem::take(&mut self.buffer).join("\n");
        let mut current: Vec<&str> = Vec::new();
        let mut words = 0;
        let mut packed = Vec::new();

        for line in joined.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let line_words = word_count(line);
            let over_lines = current.len() + 1 > self.config.max_lines_per_chunk;
            let over_words = words + line_words > self.config.max_words_per_chunk;

            if !current.is_empty() && (over_lines || over_words) {
                packed.push(current.join("\n"));
                current.clear();
                words = 0;
            }

            current.push(line);
            words += line_words;
        }

        if !current.is_empty() {
            packed.push(current.join("\n"));
        }

        for body in packed {
            let title = self.section_title.clone();
            self.push(title, ChunkContent::Text(body), ChunkOrigin::Packed);
        }
    }

    /// Split one paragraph into consecutive word-bounded chunks.
    fn split_oversized(&mut self, text: &str) {
        let words: Vec<&str> = text.split_whitespace().collect();
        log::debug!(
            "Splitting oversized paragraph of {} words under '{}'",
            words.len(),
            self.section_title
        );

        for (index, part) in words.chunks(self.config.max_words_per_chunk).enumerate() {
            let title = if index == 0 {
                self.section_title.clone()
            } else {
                format!("{} {}", self.config.continuation_prefix, self.section_title)
                    .trim_end()
                    .to_string()
            };
            self.push(title, ChunkContent::Text(part.join(" ")), ChunkOrigin::OversizedSplit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::line_count;

    fn paginator(words: usize, lines: usize) -> Paginator {
        Paginator::new(
            PaginationConfig::default()
                .with_max_words(words)
                .with_max_lines(lines)
                .with_section_title_slides(false),
        )
        .unwrap()
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_stream_rejected() {
        let result = paginator(300, 8).paginate(&[]);
        assert!(matches!(result, Err(Error::EmptyContent)));
    }

    #[test]
    fn test_invalid_limits_rejected() {
        assert!(Paginator::new(PaginationConfig::default().with_max_words(0)).is_err());
    }

    #[test]
    fn test_oversized_paragraph_continuation_titles() {
        let elements = vec![
            ContentElement::section_title("Overview", 0),
            ContentElement::paragraph(words(900), 1),
        ];

        let chunks = paginator(300, 8).paginate(&elements).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].title, "Overview");
        assert_eq!(chunks[1].title, "(Continued) Overview");
        assert_eq!(chunks[2].title, "(Continued) Overview");
        for chunk in &chunks {
            assert_eq!(chunk.origin, ChunkOrigin::OversizedSplit);
            assert_eq!(word_count(chunk.body().unwrap()), 300);
        }
        assert!(chunks[1].body().unwrap().starts_with("w300 "));
    }

    #[test]
    fn test_paragraphs_packed_under_line_limit() {
        let mut elements = vec![ContentElement::section_title("Notes", 0)];
        for i in 0..10 {
            elements.push(ContentElement::paragraph(format!("Line {}", i), 1));
        }

        let chunks = paginator(300, 4).paginate(&elements).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].body(), Some("Line 0\nLine 1\nLine 2\nLine 3"));
        assert_eq!(chunks[2].body(), Some("Line 8\nLine 9"));
        assert!(chunks.iter().all(|c| c.title == "Notes"));
        assert!(chunks.iter().all(|c| c.origin == ChunkOrigin::Packed));
    }

    #[test]
    fn test_paragraphs_packed_under_word_limit() {
        let elements = vec![
            ContentElement::section_title("Words", 0),
            ContentElement::paragraph(words(6), 1),
            ContentElement::paragraph(words(6), 1),
            ContentElement::paragraph(words(3), 1),
        ];

        let chunks = paginator(10, 8).paginate(&elements).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(word_count(chunks[0].body().unwrap()), 6);
        assert_eq!(word_count(chunks[1].body().unwrap()), 9);
    }

    #[test]
    fn test_multiline_paragraph_lines_counted() {
        let elements = vec![
            ContentElement::section_title("Poem", 0),
            ContentElement::paragraph("a\nb\nc", 1),
            ContentElement::paragraph("d\ne", 1),
        ];

        let chunks = paginator(300, 2).paginate(&elements).unwrap();
        let bodies: Vec<_> = chunks.iter().filter_map(|c| c.body()).collect();
        assert_eq!(bodies, vec!["a\nb", "c\nd", "e"]);
    }

    #[test]
    fn test_budgets_hold_for_packed_chunks() {
        let mut elements = vec![ContentElement::section_title("Mixed", 0)];
        for n in [5, 40, 12, 1, 33, 27, 8, 50, 3, 19] {
            elements.push(ContentElement::paragraph(words(n), 1));
        }

        let chunks = paginator(50, 3).paginate(&elements).unwrap();
        for chunk in &chunks {
            let body = chunk.body().unwrap();
            assert!(word_count(body) <= 50);
            assert!(line_count(body) <= 3);
        }
        let total: usize = chunks.iter().map(|c| word_count(c.body().unwrap())).sum();
        assert_eq!(total, 198);
    }

    #[test]
    fn test_standalone_elements_break_buffer() {
        let elements = vec![
            ContentElement::section_title("Data", 0),
            ContentElement::paragraph("Before", 1),
            ContentElement::table(
                TableData::from(vec![vec!["a".to_string(), "b".to_string()]]),
                1,
            ),
            ContentElement::paragraph("Between", 1),
            ContentElement::image(ImageRef::new("https://img/1"), 1),
            ContentElement::paragraph("After", 1),
        ];

        let chunks = paginator(300, 8).paginate(&elements).unwrap();
        let shapes: Vec<_> = chunks
            .iter()
            .map(|c| match &c.content {
                ChunkContent::Text(body) => body.clone(),
                ChunkContent::Table(_) => "<table>".to_string(),
                ChunkContent::Image(_) => "<image>".to_string(),
                ChunkContent::Title => "<title>".to_string(),
            })
            .collect();

        assert_eq!(
            shapes,
            vec!["Before", "<table>", "Between", "<image>", "After"]
        );
        assert!(chunks.iter().all(|c| c.title == "Data"));
    }

    #[test]
    fn test_section_change_flushes_and_retitles() {
        let elements = vec![
            ContentElement::paragraph("Orphan", 0),
            ContentElement::section_title("First", 0),
            ContentElement::paragraph("One", 1),
            ContentElement::section_title("Second", 1),
            ContentElement::paragraph("Two", 2),
        ];

        let chunks = paginator(300, 8).paginate(&elements).unwrap();
        let titled: Vec<_> = chunks
            .iter()
            .map(|c| (c.title.as_str(), c.body().unwrap(), c.section_level))
            .collect();

        assert_eq!(
            titled,
            vec![("", "Orphan", 0), ("First", "One", 0), ("Second", "Two", 1)]
        );
    }

    #[test]
    fn test_section_divider_slides() {
        let paginator = Paginator::new(PaginationConfig::default()).unwrap();
        let elements = vec![
            ContentElement::section_title("Intro", 0),
            ContentElement::paragraph("Hello", 1),
            ContentElement::section_title("Empty", 0),
        ];

        let chunks = paginator.paginate(&elements).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, ChunkContent::Title);
        assert_eq!(chunks[0].origin, ChunkOrigin::Divider);
        assert_eq!(chunks[1].body(), Some("Hello"));
        assert_eq!(chunks[2].title, "Empty");
    }

    #[test]
    fn test_headings_lead_their_text() {
        let elements = vec![
            ContentElement::section_title("S", 0),
            ContentElement::text(ElementKind::DocumentTitle, "Handbook", 1),
            ContentElement::paragraph("Intro text", 1),
            ContentElement::text(ElementKind::Heading1, "Setup", 1),
            ContentElement::paragraph("Install it", 1),
        ];

        let chunks = paginator(300, 8).paginate(&elements).unwrap();

        assert_eq!(chunks[0].title, "Handbook");
        assert_eq!(chunks[0].content, ChunkContent::Title);
        assert_eq!(chunks[1].body(), Some("Intro text"));
        assert_eq!(chunks[2].body(), Some("Setup\nInstall it"));
    }

    #[test]
    fn test_oversized_split_preserves_order_with_buffer() {
        let elements = vec![
            ContentElement::section_title("S", 0),
            ContentElement::paragraph("short", 1),
            ContentElement::paragraph(words(25), 1),
            ContentElement::paragraph("tail", 1),
        ];

        let chunks = paginator(10, 8).paginate(&elements).unwrap();
        let bodies: Vec<_> = chunks.iter().map(|c| c.body().unwrap().to_string()).collect();

        assert_eq!(bodies.len(), 5);
        assert_eq!(bodies[0], "short");
        assert_eq!(word_count(&bodies[3]), 5);
        assert_eq!(bodies[4], "tail");
        assert_eq!(chunks[1].title, "S");
        assert_eq!(chunks[2].title, "(Continued) S");
    }

    #[test]
    fn test_continuation_without_section_title() {
        let elements = vec![ContentElement::paragraph(words(4), 0)];
        let chunks = paginator(2, 8).paginate(&elements).unwrap();

        assert_eq!(chunks[0].title, "");
        assert_eq!(chunks[1].title, "(Continued)");
    }
}
