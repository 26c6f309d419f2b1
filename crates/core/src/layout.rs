//! Layout assignment: picks a slide archetype and font sizes for a chunk.
//!
//! A pure function of the chunk's shape and the configured thresholds.

use crate::config::LayoutConfig;
use crate::paginate::{ChunkContent, SlideChunk};
use serde::Serialize;

/// Predefined slide layouts used by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutArchetype {
    /// Title placeholder plus body placeholder.
    TitleAndBody,
    /// No placeholders.
    Blank,
}

/// Where and how large an image is placed, in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    /// Explicit size; `None` keeps the image's natural size.
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Style decisions for one slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SlideDesign {
    /// Title and optional body text.
    Text {
        title_font: f64,
        /// `None` when the chunk has no body.
        body_font: Option<f64>,
    },
    /// A `rows x columns` grid.
    Table {
        rows: usize,
        columns: usize,
        cell_font: f64,
    },
    Image(ImagePlacement),
}

/// Layout decision for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutDecision {
    pub archetype: LayoutArchetype,
    pub design: SlideDesign,
}

/// Chooses layouts from chunk shape.
#[derive(Debug, Clone, Default)]
pub struct LayoutAssigner {
    config: LayoutConfig,
}

impl LayoutAssigner {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Decide the layout for a chunk.
    pub fn assign(&self, chunk: &SlideChunk) -> LayoutDecision {
        match &chunk.content {
            ChunkContent::Title => LayoutDecision {
                archetype: LayoutArchetype::TitleAndBody,
                design: SlideDesign::Text {
                    title_font: self.title_font(&chunk.title),
                    body_font: None,
                },
            },
            ChunkContent::Text(body) => LayoutDecision {
                archetype: LayoutArchetype::TitleAndBody,
                design: SlideDesign::Text {
                    title_font: self.title_font(&chunk.title),
                    body_font: Some(self.body_font(body)),
                },
            },
            ChunkContent::Table(data) => LayoutDecision {
                archetype: LayoutArchetype::Blank,
                design: SlideDesign::Table {
                    rows: data.row_count(),
                    columns: data.column_count(),
                    cell_font: self.config.table_cell_font,
                },
            },
            ChunkContent::Image(image) => {
                let to_points = |micros: Option<f64>| micros.map(|m| m * self.config.source_to_points);
                let (width, height) = match (image.width_micros, image.height_micros) {
                    (Some(_), Some(_)) => (to_points(image.width_micros), to_points(image.height_micros)),
                    _ => (None, None),
                };
                LayoutDecision {
                    archetype: LayoutArchetype::Blank,
                    design: SlideDesign::Image(ImagePlacement {
                        x: self.config.image_offset_x,
                        y: self.config.image_offset_y,
                        width,
                        height,
                    }),
                }
            }
        }
    }

    /// Title font tier from title length in characters.
    pub fn title_font(&self, title: &str) -> f64 {
        if title.chars().count() > self.config.title_length_threshold {
            self.config.title_font_small
        } else {
            self.config.title_font_default
        }
    }

    /// Body font tier from body length in characters.
    pub fn body_font(&self, body: &str) -> f64 {
        let length = body.chars().count();
        if length > self.config.body_small_threshold {
            self.config.body_font_small
        } else if length > self.config.body_medium_threshold {
            self.config.body_font_medium
        } else {
            self.config.body_font_default
        }
    }
}
