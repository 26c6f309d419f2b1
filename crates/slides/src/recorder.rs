//! Destination writer that records `batchUpdate` requests.

use crate::encoder::{RequestEncoder, BODY_PLACEHOLDER_SUFFIX, TITLE_PLACEHOLDER_SUFFIX};
use docslides_core::{
    DestinationWriter, Error, LayoutArchetype, Placeholders, PresentationHandle, Result,
    SlideOperation,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// One recorded `batchUpdate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedBatch {
    pub requests: Vec<Value>,
}

/// Everything recorded for one presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedPresentation {
    pub presentation_id: String,
    pub title: String,
    pub batches: Vec<RecordedBatch>,
}

impl RecordedPresentation {
    /// Total number of requests across all batches.
    pub fn request_count(&self) -> usize {
        self.batches.iter().map(|b| b.requests.len()).sum()
    }
}

/// Records the requests of a single presentation.
#[derive(Debug, Default)]
pub struct BatchRecorder {
    encoder: RequestEncoder,
    presentation: Option<RecordedPresentation>,
    slides: HashMap<String, LayoutArchetype>,
}

impl BatchRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded presentation, if one was created.
    pub fn presentation(&self) -> Option<&RecordedPresentation> {
        self.presentation.as_ref()
    }

    /// Consume the recorder and return what was recorded.
    pub fn into_presentation(self) -> Option<RecordedPresentation> {
        self.presentation
    }

    fn recorded(&mut self, handle: &PresentationHandle) -> Result<&mut RecordedPresentation> {
        match &mut self.presentation {
            Some(presentation) if presentation.presentation_id == handle.id => Ok(presentation),
            _ => Err(Error::NotFound(format!("presentation {}", handle.id))),
        }
    }
}

impl DestinationWriter for BatchRecorder {
    fn create_presentation(&mut self, title: &str) -> Result<PresentationHandle> {
        if self.presentation.is_some() {
            return Err(Error::PresentationCreation(
                "recorder already holds a presentation".to_string(),
            ));
        }

        let id = format!("presentation_{}", Uuid::new_v4().simple());
        log::debug!("Recording presentation '{}' as {}", title, id);
        self.presentation = Some(RecordedPresentation {
            presentation_id: id.clone(),
            title: title.to_string(),
            batches: Vec::new(),
        });

        Ok(PresentationHandle {
            id,
            title: title.to_string(),
        })
    }

    fn apply(&mut self, presentation: &PresentationHandle, batch: &[SlideOperation]) -> Result<()> {
        // Encode everything first so a rejected batch leaves no trace
        let requests = self.encoder.encode_batch(batch)?;

        let mut created = Vec::new();
        for op in batch {
            if let SlideOperation::CreateSlide { slide_id, layout } = op {
                created.push((slide_id.clone(), *layout));
            }
        }

        self.recorded(presentation)?
            .batches
            .push(RecordedBatch { requests });
        self.slides.extend(created);

        log::debug!("Recorded batch of {} requests", batch.len());
        Ok(())
    }

    fn resolve_placeholders(
        &mut self,
        _presentation: &PresentationHandle,
        slide_id: &str,
    ) -> Result<Placeholders> {
        match self.slides.get(slide_id) {
            Some(LayoutArchetype::TitleAndBody) => Ok(Placeholders {
                title: Some(format!("{}{}", slide_id, TITLE_PLACEHOLDER_SUFFIX)),
                body: Some(format!("{}{}", slide_id, BODY_PLACEHOLDER_SUFFIX)),
            }),
            Some(LayoutArchetype::Blank) => Ok(Placeholders::default()),
            None => Err(Error::NotFound(format!("slide {}", slide_id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docslides_core::{
        Block, Cell, ConversionConfig, Converter, ImageSource, InlineObject, InlineObjects,
        Paragraph, SourceDocument, SourceTab, SourceTable, TextTarget,
    };

    #[test]
    fn test_single_presentation() {
        let mut recorder = BatchRecorder::new();
        let handle = recorder.create_presentation("Deck").unwrap();

        assert!(handle.id.starts_with("presentation_"));
        assert_eq!(recorder.presentation().unwrap().title, "Deck");
        assert!(matches!(
            recorder.create_presentation("Again"),
            Err(Error::PresentationCreation(_))
        ));
    }

    #[test]
    fn test_placeholders_follow_layout() {
        let mut recorder = BatchRecorder::new();
        let handle = recorder.create_presentation("Deck").unwrap();
        recorder
            .apply(
                &handle,
                &[
                    SlideOperation::CreateSlide {
                        slide_id: "slide_a".into(),
                        layout: LayoutArchetype::TitleAndBody,
                    },
                    SlideOperation::CreateSlide {
                        slide_id: "slide_b".into(),
                        layout: LayoutArchetype::Blank,
                    },
                ],
            )
            .unwrap();

        let placeholders = recorder.resolve_placeholders(&handle, "slide_a").unwrap();
        assert_eq!(placeholders.title.as_deref(), Some("slide_a_title"));
        assert_eq!(placeholders.body.as_deref(), Some("slide_a_body"));
        assert_eq!(
            recorder.resolve_placeholders(&handle, "slide_b").unwrap(),
            Placeholders::default()
        );
        assert!(recorder.resolve_placeholders(&handle, "slide_c").is_err());
    }

    #[test]
    fn test_rejected_batch_leaves_no_trace() {
        let mut recorder = BatchRecorder::new();
        let handle = recorder.create_presentation("Deck").unwrap();

        let result = recorder.apply(
            &handle,
            &[
                SlideOperation::CreateSlide {
                    slide_id: "slide_a".into(),
                    layout: LayoutArchetype::Blank,
                },
                SlideOperation::CreateImage {
                    image_id: "image_a".into(),
                    slide_id: "slide_a".into(),
                    source: ImageSource::Bytes(vec![1]),
                    placement: docslides_core::ImagePlacement {
                        x: 0.0,
                        y: 0.0,
                        width: None,
                        height: None,
                    },
                },
            ],
        );

        assert!(result.is_err());
        assert_eq!(recorder.presentation().unwrap().batches.len(), 0);
        assert!(recorder.resolve_placeholders(&handle, "slide_a").is_err());
    }

    #[test]
    fn test_unknown_presentation() {
        let mut recorder = BatchRecorder::new();
        let other = PresentationHandle {
            id: "elsewhere".into(),
            title: "x".into(),
        };
        let op = SlideOperation::InsertText {
            target: TextTarget::Shape("s".into()),
            text: "t".into(),
        };
        assert!(matches!(recorder.apply(&other, &[op]), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_full_conversion_is_recorded() {
        let mut objects = InlineObjects::new();
        objects.insert("img", InlineObject::image("https://img/a", 1_000_000.0, 500_000.0));

        let document = SourceDocument {
            tabs: vec![SourceTab::new("t1", "Budget")
                .with_inline_objects(objects)
                .with_blocks(vec![
                    Block::Paragraph(Paragraph::plain("Spending overview").with_image("img")),
                    Block::Table(SourceTable {
                        rows: vec![vec![Cell::from_texts(["Item"]), Cell::from_texts(["Cost"])]],
                    }),
                ])],
            ..SourceDocument::new("doc-1", "Finance")
        };

        let converter = Converter::new(ConversionConfig::default()).unwrap();
        let mut recorder = BatchRecorder::new();
        let report = converter
            .convert_document(&document, None, &mut recorder, None)
            .unwrap();

        let recorded = recorder.into_presentation().unwrap();
        assert_eq!(recorded.presentation_id, report.presentation_id);
        assert_eq!(recorded.title, "Finance");
        // divider, text, image, table
        assert_eq!(report.slide_count, 4);

        let kinds: Vec<String> = recorded
            .batches
            .iter()
            .flat_map(|b| b.requests.iter())
            .filter_map(|r| r.as_object().and_then(|o| o.keys().next().cloned()))
            .collect();
        assert_eq!(kinds.iter().filter(|k| *k == "createSlide").count(), 4);
        assert_eq!(kinds.iter().filter(|k| *k == "createImage").count(), 1);
        assert_eq!(kinds.iter().filter(|k| *k == "createTable").count(), 1);
        assert_eq!(kinds.iter().filter(|k| *k == "insertText").count(), 5);
        assert_eq!(recorded.request_count(), kinds.len());
    }
}
