//! Structure extraction: flattens a nested source document into an
//! ordered, section-tagged stream of [`ContentElement`]s.
//!
//! Documents with tabs are walked depth-first, pre-order, with an explicit
//! stack: a tab's title, then its body, then its child tabs. The tab depth
//! becomes the title's section level and body content sits one level
//! deeper. Documents without tabs go through the [`SectionDetector`]
//! fallback instead.

use crate::config::{ConversionConfig, SectionConfig};
use crate::error::{Error, Result, SkippedElement, Stage};
use crate::model::{ContentElement, ElementKind, Frame, ImageRef, TableData};
use crate::normalize::TextNormalizer;
use crate::sections::{SectionAccumulator, SectionDetector};
use crate::source::{Block, ImageResolver, Paragraph, SourceDocument, SourceTab, SourceTable};

/// Horizontal position of every frame hint.
const FRAME_X: f64 = 50.0;

/// Vertical position of the first element of a section body.
const FRAME_START_Y: f64 = 100.0;

/// Vertical advance after a paragraph.
const PARAGRAPH_ADVANCE: f64 = 20.0;

/// Vertical advance per table row.
const TABLE_ROW_ADVANCE: f64 = 30.0;

/// Gap left below an image.
const IMAGE_GAP: f64 = 10.0;

/// Separator between paragraphs of one table cell.
const CELL_PARAGRAPH_SEPARATOR: &str = " | ";

/// Output of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Ordered content stream; never empty.
    pub elements: Vec<ContentElement>,

    /// Elements dropped along the way.
    pub skipped: Vec<SkippedElement>,
}

impl Extraction {
    /// Number of section titles in the stream.
    pub fn section_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.kind == ElementKind::SectionTitle)
            .count()
    }
}

/// Running vertical position for informational frame hints.
#[derive(Debug)]
struct FrameCursor {
    y: f64,
}

impl FrameCursor {
    fn new() -> Self {
        Self { y: FRAME_START_Y }
    }

    fn reset(&mut self) {
        self.y = FRAME_START_Y;
    }

    fn place(&mut self, advance: f64) -> Frame {
        let frame = Frame::at(FRAME_X, self.y);
        self.y += advance;
        frame
    }
}

/// Walks a [`SourceDocument`] into content elements.
#[derive(Debug, Clone)]
pub struct StructureExtractor {
    sections: SectionConfig,
    detector: SectionDetector,
    normalizer: TextNormalizer,
    source_to_points: f64,
}

impl StructureExtractor {
    /// Create an extractor from the run configuration.
    pub fn new(config: &ConversionConfig) -> Result<Self> {
        Ok(Self {
            sections: config.sections.clone(),
            detector: SectionDetector::new(&config.sections)?,
            normalizer: TextNormalizer::new(),
            source_to_points: config.layout.source_to_points,
        })
    }

    /// Extract the ordered content stream of a document.
    ///
    /// Fails with [`Error::MalformedSource`] when the document has neither
    /// tabs nor a body. Unresolvable images are skipped and recorded.
    pub fn extract(&self, document: &SourceDocument) -> Result<Extraction> {
        let mut extraction = if document.has_tabs() {
            self.extract_tabs(&document.tabs)
        } else {
            let body = document.body.as_ref().ok_or_else(|| Error::MalformedSource {
                document: document.document_id.clone(),
                reason: "document has neither tabs nor a body".to_string(),
            })?;
            log::debug!("No tabs in '{}', detecting sections from headings", document.document_id);
            self.extract_flat(&body.blocks, document)
        };

        if extraction.elements.is_empty() {
            log::debug!("Nothing extracted, adding default section");
            extraction.elements.push(ContentElement::section_title(
                self.sections.default_title.clone(),
                0,
            ));
        }

        log::info!(
            "Extracted {} content elements ({} sections) from '{}'",
            extraction.elements.len(),
            extraction.section_count(),
            document.document_id
        );

        Ok(extraction)
    }

    /// Depth-first, pre-order walk of the tab tree.
    fn extract_tabs(&self, tabs: &[SourceTab]) -> Extraction {
        let mut extraction = Extraction::default();
        let mut stack: Vec<(&SourceTab, usize)> = tabs.iter().rev().map(|tab| (tab, 0)).collect();

        while let Some((tab, depth)) = stack.pop() {
            let title = self.normalizer.normalize(&tab.title);
            log::debug!("Section title at level {}: {}", depth, title);
            extraction
                .elements
                .push(ContentElement::section_title(title, depth));

            match &tab.body {
                Some(body) => {
                    let mut cursor = FrameCursor::new();
                    for block in &body.blocks {
                        let elements = self.block_elements(
                            block,
                            &tab.inline_objects,
                            depth + 1,
                            &mut cursor,
                            &mut extraction.skipped,
                        );
                        extraction.elements.extend(elements);
                    }
                }
                None => log::debug!("Tab '{}' has no body", tab.id),
            }

            stack.extend(tab.children.iter().rev().map(|child| (child, depth + 1)));
        }

        extraction
    }

    /// Fallback walk over a flat body, inferring sections from headings
    /// and break markers.
    fn extract_flat(&self, blocks: &[Block], document: &SourceDocument) -> Extraction {
        let mut skipped = Vec::new();
        let mut accumulator = SectionAccumulator::new(&self.sections);
        let mut cursor = FrameCursor::new();

        for (index, block) in blocks.iter().enumerate() {
            match block {
                Block::Break(kind) => {
                    if self.break_opens_section(&blocks[index + 1..]) {
                        log::debug!("{:?} break opens a new section", kind);
                        accumulator.open_generic();
                        cursor.reset();
                    } else {
                        log::debug!("{:?} break followed by a heading or end of body", kind);
                    }
                }
                Block::Paragraph(paragraph) => {
                    let text = self.normalizer.normalize(&paragraph.raw_text());
                    if let Some(heading) = self.detector.detect(&text) {
                        accumulator.open_heading(&heading);
                        cursor.reset();
                        // Images anchored in the heading paragraph belong to the new section
                        for element in self.paragraph_images(
                            paragraph,
                            &document.inline_objects,
                            0,
                            &mut cursor,
                            &mut skipped,
                        ) {
                            accumulator.push(element);
                        }
                    } else {
                        for element in self.paragraph_elements(
                            paragraph,
                            &document.inline_objects,
                            0,
                            &mut cursor,
                            &mut skipped,
                        ) {
                            accumulator.push(element);
                        }
                    }
                }
                Block::Table(table) => {
                    accumulator.push(self.table_element(table, 0, &mut cursor));
                }
            }
        }

        log::debug!("Detected {} section boundaries", accumulator.section_count());

        Extraction {
            elements: accumulator.finish(),
            skipped,
        }
    }

    /// A break opens a section unless the next non-blank block is a
    /// heading paragraph (which opens its own), another break (which
    /// decides instead) or nothing follows.
    fn break_opens_section(&self, rest: &[Block]) -> bool {
        let next = rest.iter().find(|block| match block {
            Block::Paragraph(paragraph) => {
                !self.normalizer.normalize(&paragraph.raw_text()).is_empty()
                    || paragraph.image_ids().next().is_some()
            }
            _ => true,
        });

        match next {
            None | Some(Block::Break(_)) => false,
            Some(Block::Paragraph(paragraph)) => !self
                .detector
                .is_boundary(&self.normalizer.normalize(&paragraph.raw_text())),
            Some(_) => true,
        }
    }

    fn block_elements(
        &self,
        block: &Block,
        resolver: &dyn ImageResolver,
        level: usize,
        cursor: &mut FrameCursor,
        skipped: &mut Vec<SkippedElement>,
    ) -> Vec<ContentElement> {
        match block {
            Block::Paragraph(paragraph) => {
                self.paragraph_elements(paragraph, resolver, level, cursor, skipped)
            }
            Block::Table(table) => vec![self.table_element(table, level, cursor)],
            Block::Break(kind) => {
                log::debug!("{:?} break at level {}", kind, level);
                Vec::new()
            }
        }
    }

    /// The paragraph's text element (if non-empty) followed by its images.
    fn paragraph_elements(
        &self,
        paragraph: &Paragraph,
        resolver: &dyn ImageResolver,
        level: usize,
        cursor: &mut FrameCursor,
        skipped: &mut Vec<SkippedElement>,
    ) -> Vec<ContentElement> {
        let mut elements = Vec::new();

        let text = self.normalizer.normalize(&paragraph.raw_text());
        if !text.is_empty() {
            let kind = ElementKind::from_style_name(paragraph.style_name.as_deref());
            log::debug!("{:?} at level {}: {}", kind, level, text);
            elements.push(
                ContentElement::text(kind, text, level).with_frame(cursor.place(PARAGRAPH_ADVANCE)),
            );
        }

        elements.extend(self.paragraph_images(paragraph, resolver, level, cursor, skipped));
        elements
    }

    /// Resolve every inline image of a paragraph, in encounter order.
    fn paragraph_images(
        &self,
        paragraph: &Paragraph,
        resolver: &dyn ImageResolver,
        level: usize,
        cursor: &mut FrameCursor,
        skipped: &mut Vec<SkippedElement>,
    ) -> Vec<ContentElement> {
        let mut elements = Vec::new();

        for object_id in paragraph.image_ids() {
            match resolver.resolve(object_id) {
                Ok(resolved) => {
                    let width = resolved.width_micros * self.source_to_points;
                    let height = resolved.height_micros * self.source_to_points;
                    let frame = Frame::sized(FRAME_X, cursor.y, width, height);
                    cursor.y += height + IMAGE_GAP;

                    log::debug!(
                        "Image at level {}: uri={}, position=({}, {}), size=({}, {})",
                        level,
                        resolved.uri,
                        frame.x,
                        frame.y,
                        width,
                        height
                    );
                    let image = ImageRef::with_size(
                        resolved.uri,
                        resolved.width_micros,
                        resolved.height_micros,
                    );
                    elements.push(ContentElement::image(image, level).with_frame(frame));
                }
                Err(reason) => {
                    log::warn!("Skipping image '{}': {}", object_id, reason);
                    skipped.push(SkippedElement::new(Stage::Extraction, object_id, reason));
                }
            }
        }

        elements
    }

    fn table_element(
        &self,
        table: &SourceTable,
        level: usize,
        cursor: &mut FrameCursor,
    ) -> ContentElement {
        let mut data = TableData::new();
        for row in &table.rows {
            data.add_row(
                row.iter()
                    .map(|cell| {
                        cell.paragraphs
                            .iter()
                            .map(|p| self.normalizer.normalize(&p.raw_text()))
                            .filter(|text| !text.is_empty())
                            .collect::<Vec<_>>()
                            .join(CELL_PARAGRAPH_SEPARATOR)
                    })
                    .collect(),
            );
        }

        log::debug!(
            "Table at level {}: {}x{}",
            level,
            data.row_count(),
            data.column_count()
        );
        let frame = cursor.place(data.row_count() as f64 * TABLE_ROW_ADVANCE);
        ContentElement::table(data, level).with_frame(frame)
    }
}
