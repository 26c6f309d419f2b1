//! Conversion driver: extract, paginate, lay out and write one document.
//!
//! A run is single-threaded and owns its identifier allocator; nothing is
//! shared between runs. An unrecoverable error aborts the run, skipped
//! elements are reported.

use crate::collab::{DestinationWriter, ImageFetcher, PresentationHandle, SourceReader};
use crate::config::ConversionConfig;
use crate::error::{Error, Result, SkipReason, SkippedElement, Stage};
use crate::extract::{Extraction, StructureExtractor};
use crate::ids::{IdAllocator, ObjectKind};
use crate::layout::{LayoutArchetype, LayoutAssigner, LayoutDecision, SlideDesign};
use crate::model::{ContentElement, ImageRef, TableData};
use crate::ops::{ImageSource, SlideOperation, TextTarget};
use crate::paginate::{ChunkContent, Paginator, SlideChunk};
use crate::source::SourceDocument;
use serde::Serialize;

/// A chunk together with its layout decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedSlide {
    pub chunk: SlideChunk,
    pub layout: LayoutDecision,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub document_id: String,
    pub presentation_id: String,
    pub presentation_title: String,
    /// Content elements extracted from the source.
    pub element_count: usize,
    /// Slides written to the destination.
    pub slide_count: usize,
    /// Elements dropped during the run.
    pub skipped: Vec<SkippedElement>,
}

/// Runs the full pipeline for one document at a time.
#[derive(Debug, Clone)]
pub struct Converter {
    extractor: StructureExtractor,
    paginator: Paginator,
    layout: LayoutAssigner,
}

impl Converter {
    /// Create a converter, validating the configuration.
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: StructureExtractor::new(&config)?,
            paginator: Paginator::new(config.pagination)?,
            layout: LayoutAssigner::new(config.layout),
        })
    }

    /// Extract the content stream of a fetched document.
    pub fn extract(&self, document: &SourceDocument) -> Result<Extraction> {
        self.extractor.extract(document)
    }

    /// Paginate a content stream and assign a layout to every chunk.
    pub fn plan(&self, elements: &[ContentElement]) -> Result<Vec<PlannedSlide>> {
        let chunks = self.paginator.paginate(elements)?;
        Ok(chunks
            .into_iter()
            .map(|chunk| {
                let layout = self.layout.assign(&chunk);
                PlannedSlide { chunk, layout }
            })
            .collect())
    }

    /// Fetch a document, convert it and write the slides.
    ///
    /// `title` overrides the document title as presentation title. The
    /// fetcher is only consulted when the writer needs image bytes.
    pub fn convert(
        &self,
        reader: &dyn SourceReader,
        handle: &str,
        title: Option<&str>,
        writer: &mut dyn DestinationWriter,
        fetcher: Option<&dyn ImageFetcher>,
    ) -> Result<ConversionReport> {
        let document = reader.fetch(handle)?;
        self.convert_document(&document, title, writer, fetcher)
    }

    /// Convert an already fetched document and write the slides.
    pub fn convert_document(
        &self,
        document: &SourceDocument,
        title: Option<&str>,
        writer: &mut dyn DestinationWriter,
        fetcher: Option<&dyn ImageFetcher>,
    ) -> Result<ConversionReport> {
        let extraction = self.extract(document)?;
        self.convert_extraction(document, extraction, title, writer, fetcher)
    }

    /// Paginate and write a stream already extracted from `document`.
    pub fn convert_extraction(
        &self,
        document: &SourceDocument,
        extraction: Extraction,
        title: Option<&str>,
        writer: &mut dyn DestinationWriter,
        fetcher: Option<&dyn ImageFetcher>,
    ) -> Result<ConversionReport> {
        let plan = self.plan(&extraction.elements)?;

        let title = title.unwrap_or(document.title.as_str());
        let presentation = writer.create_presentation(title).map_err(|e| match e {
            Error::PresentationCreation(_) => e,
            other => Error::PresentationCreation(other.to_string()),
        })?;
        log::info!("Created presentation '{}' ({})", presentation.title, presentation.id);

        let mut run = WriteRun {
            writer,
            fetcher,
            presentation: &presentation,
            ids: IdAllocator::new(),
            skipped: extraction.skipped,
        };
        for slide in &plan {
            run.write_slide(slide)?;
        }

        log::info!(
            "Wrote {} slides for '{}' ({} elements skipped)",
            plan.len(),
            document.document_id,
            run.skipped.len()
        );

        Ok(ConversionReport {
            document_id: document.document_id.clone(),
            presentation_id: presentation.id.clone(),
            presentation_title: presentation.title.clone(),
            element_count: extraction.elements.len(),
            slide_count: plan.len(),
            skipped: run.skipped,
        })
    }
}

/// State of one write pass.
struct WriteRun<'a> {
    writer: &'a mut dyn DestinationWriter,
    fetcher: Option<&'a dyn ImageFetcher>,
    presentation: &'a PresentationHandle,
    ids: IdAllocator,
    skipped: Vec<SkippedElement>,
}

impl WriteRun<'_> {
    fn write_slide(&mut self, slide: &PlannedSlide) -> Result<()> {
        let slide_id = self.ids.allocate(ObjectKind::Slide);
        let chunk = &slide.chunk;

        match (&chunk.content, &slide.layout.design) {
            (
                ChunkContent::Title | ChunkContent::Text(_),
                SlideDesign::Text {
                    title_font,
                    body_font,
                },
            ) => self.write_text_slide(
                &slide_id,
                slide.layout.archetype,
                &chunk.title,
                chunk.body().zip(*body_font),
                *title_font,
            ),
            (ChunkContent::Table(data), SlideDesign::Table { cell_font, .. }) => {
                self.write_table_slide(&slide_id, slide.layout.archetype, data, *cell_font)
            }
            (ChunkContent::Image(image), SlideDesign::Image(placement)) => {
                let mut batch = vec![SlideOperation::CreateSlide {
                    slide_id: slide_id.clone(),
                    layout: slide.layout.archetype,
                }];
                if let Some(source) = self.image_source(image) {
                    batch.push(SlideOperation::CreateImage {
                        image_id: self.ids.allocate(ObjectKind::Image),
                        slide_id: slide_id.clone(),
                        source,
                        placement: placement.clone(),
                    });
                }
                self.apply(&slide_id, &batch)
            }
            _ => Err(Error::Write {
                slide: slide_id,
                reason: "layout does not match chunk content".to_string(),
            }),
        }
    }

    fn write_text_slide(
        &mut self,
        slide_id: &str,
        layout: LayoutArchetype,
        title: &str,
        body: Option<(&str, f64)>,
        title_font: f64,
    ) -> Result<()> {
        self.apply(
            slide_id,
            &[SlideOperation::CreateSlide {
                slide_id: slide_id.to_string(),
                layout,
            }],
        )?;

        let placeholders = self
            .writer
            .resolve_placeholders(self.presentation, slide_id)
            .map_err(|e| write_error(slide_id, e))?;

        let mut batch = Vec::new();
        match placeholders.title {
            Some(id) if !title.is_empty() => {
                batch.push(SlideOperation::InsertText {
                    target: TextTarget::Shape(id.clone()),
                    text: title.to_string(),
                });
                batch.push(SlideOperation::SetFontSize {
                    target: TextTarget::Shape(id),
                    size: title_font,
                });
            }
            Some(_) => {}
            None => log::warn!("Slide {} has no title placeholder", slide_id),
        }
        if let Some((text, font)) = body.filter(|(text, _)| !text.is_empty()) {
            match placeholders.body {
                Some(id) => {
                    batch.push(SlideOperation::InsertText {
                        target: TextTarget::Shape(id.clone()),
                        text: text.to_string(),
                    });
                    batch.push(SlideOperation::SetFontSize {
                        target: TextTarget::Shape(id),
                        size: font,
                    });
                }
                None => log::warn!("Slide {} has no body placeholder", slide_id),
            }
        }

        if batch.is_empty() {
            return Ok(());
        }
        self.apply(slide_id, &batch)
    }

    fn write_table_slide(
        &mut self,
        slide_id: &str,
        layout: LayoutArchetype,
        data: &TableData,
        cell_font: f64,
    ) -> Result<()> {
        let mut batch = vec![SlideOperation::CreateSlide {
            slide_id: slide_id.to_string(),
            layout,
        }];

        if data.row_count() > 0 && data.column_count() > 0 {
            let table_id = self.ids.allocate(ObjectKind::Table);
            batch.push(SlideOperation::CreateTable {
                table_id: table_id.clone(),
                slide_id: slide_id.to_string(),
                rows: data.row_count(),
                columns: data.column_count(),
            });

            // Missing trailing cells of ragged rows stay absent
            for (row, cells) in data.rows.iter().enumerate() {
                for (column, text) in cells.iter().enumerate() {
                    if text.is_empty() {
                        continue;
                    }
                    let target = TextTarget::TableCell {
                        table_id: table_id.clone(),
                        row,
                        column,
                    };
                    batch.push(SlideOperation::InsertText {
                        target: target.clone(),
                        text: text.clone(),
                    });
                    batch.push(SlideOperation::SetFontSize {
                        target,
                        size: cell_font,
                    });
                }
            }
        } else {
            log::debug!("Empty table on slide {}", slide_id);
        }

        self.apply(slide_id, &batch)
    }

    /// URL or downloaded bytes, depending on what the writer accepts.
    fn image_source(&mut self, image: &ImageRef) -> Option<ImageSource> {
        if !self.writer.requires_image_bytes() {
            return Some(ImageSource::Url(image.uri.clone()));
        }

        let Some(fetcher) = self.fetcher else {
            log::warn!("No image fetcher available for '{}'", image.uri);
            self.skipped.push(SkippedElement::new(
                Stage::Write,
                &image.uri,
                SkipReason::UnsupportedImageSource,
            ));
            return None;
        };

        match fetcher.download(&image.uri) {
            Ok(bytes) => {
                log::debug!("Downloaded {} bytes from {}", bytes.len(), image.uri);
                Some(ImageSource::Bytes(bytes))
            }
            Err(e) => {
                log::warn!("Failed to download image '{}': {}", image.uri, e);
                self.skipped.push(SkippedElement::new(
                    Stage::Write,
                    &image.uri,
                    SkipReason::DownloadFailed(e.to_string()),
                ));
                None
            }
        }
    }

    fn apply(&mut self, slide_id: &str, batch: &[SlideOperation]) -> Result<()> {
        log::debug!("Applying {} operations for slide {}", batch.len(), slide_id);
        self.writer
            .apply(self.presentation, batch)
            .map_err(|e| write_error(slide_id, e))
    }
}

fn write_error(slide_id: &str, error: Error) -> Error {
    match error {
        Error::Write { .. } => error,
        other => Error::Write {
            slide: slide_id.to_string(),
            reason: other.to_string(),
        },
    }
}
