//! Tunable thresholds for pagination, layout and section detection.
//!
//! All values are configuration, not invariants. Each struct can be
//! deserialized from a partial JSON object; missing keys keep their
//! defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Limits used by the paginator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Maximum words in one text chunk.
    pub max_words_per_chunk: usize,

    /// Maximum lines in one text chunk.
    pub max_lines_per_chunk: usize,

    /// Emit a title-only divider slide for every section title.
    pub section_title_slides: bool,

    /// Prefix for slides continuing an oversized paragraph.
    pub continuation_prefix: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_words_per_chunk: 300,
            max_lines_per_chunk: 8,
            section_title_slides: true,
            continuation_prefix: "(Continued)".to_string(),
        }
    }
}

impl PaginationConfig {
    /// Set the maximum words per chunk.
    pub fn with_max_words(mut self, words: usize) -> Self {
        self.max_words_per_chunk = words;
        self
    }

    /// Set the maximum lines per chunk.
    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines_per_chunk = lines;
        self
    }

    /// Enable or disable section divider slides.
    pub fn with_section_title_slides(mut self, enabled: bool) -> Self {
        self.section_title_slides = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_words_per_chunk == 0 {
            return Err(Error::InvalidConfig(
                "max_words_per_chunk must be positive".to_string(),
            ));
        }
        if self.max_lines_per_chunk == 0 {
            return Err(Error::InvalidConfig(
                "max_lines_per_chunk must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Font tiers and placement defaults used by the layout assigner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Titles longer than this many characters use the small tier.
    pub title_length_threshold: usize,
    pub title_font_default: f64,
    pub title_font_small: f64,

    /// Bodies longer than this many characters use the medium tier.
    pub body_medium_threshold: usize,
    /// Bodies longer than this many characters use the small tier.
    pub body_small_threshold: usize,
    pub body_font_default: f64,
    pub body_font_medium: f64,
    pub body_font_small: f64,

    /// Font size for every table cell.
    pub table_cell_font: f64,

    /// Default image offset from the slide's top-left corner, in points.
    pub image_offset_x: f64,
    pub image_offset_y: f64,

    /// Factor converting source lengths (micro-inches) to points.
    pub source_to_points: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title_length_threshold: 50,
            title_font_default: 32.0,
            title_font_small: 24.0,
            body_medium_threshold: 500,
            body_small_threshold: 800,
            body_font_default: 18.0,
            body_font_medium: 14.0,
            body_font_small: 12.0,
            table_cell_font: 12.0,
            image_offset_x: 100.0,
            image_offset_y: 100.0,
            source_to_points: 72.0 / 1_000_000.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.body_small_threshold < self.body_medium_threshold {
            return Err(Error::InvalidConfig(format!(
                "body_small_threshold ({}) must not be below body_medium_threshold ({})",
                self.body_small_threshold, self.body_medium_threshold
            )));
        }
        let fonts = [
            self.title_font_default,
            self.title_font_small,
            self.body_font_default,
            self.body_font_medium,
            self.body_font_small,
            self.table_cell_font,
        ];
        if fonts.iter().any(|size| !size.is_finite() || *size <= 0.0) {
            return Err(Error::InvalidConfig(
                "font sizes must be positive".to_string(),
            ));
        }
        if !self.source_to_points.is_finite() || self.source_to_points <= 0.0 {
            return Err(Error::InvalidConfig(
                "source_to_points must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Heading recognition for documents without an explicit tab hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Case-insensitive words that introduce a numbered section heading.
    pub keywords: Vec<String>,

    /// Title of the synthetic section used when nothing else applies.
    pub default_title: String,

    /// Prefix for generically titled sections (`"<prefix> <n>"`).
    pub generic_title_prefix: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        let keywords = [
            "Section", "Chapter", "Part", "Lesson", "Module", "Unit", "Chapitre", "Partie",
            "Séance", "Leçon",
        ];
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            default_title: "Main Content".to_string(),
            generic_title_prefix: "Section".to_string(),
        }
    }
}

impl SectionConfig {
    /// Replace the heading keyword list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Generic title for the section at a zero-based index.
    pub fn generic_title(&self, index: usize) -> String {
        format!("{} {}", self.generic_title_prefix, index + 1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "section keywords must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete configuration for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub pagination: PaginationConfig,
    pub layout: LayoutConfig,
    pub sections: SectionConfig,
}

impl ConversionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_sections(mut self, sections: SectionConfig) -> Self {
        self.sections = sections;
        self
    }

    /// Check every nested configuration.
    pub fn validate(&self) -> Result<()> {
        self.pagination.validate()?;
        self.layout.validate()?;
        self.sections.validate()
    }
}
