//! Heuristic section detection for documents without explicit tabs.
//!
//! A paragraph reading `<Keyword> <integer>` (e.g. "Chapter 3",
//! "Séance 2") is taken as a section boundary. This is a precision/recall
//! trade-off: an ordinary paragraph that happens to read "Part 2" becomes
//! a boundary too. The keyword list is configuration.

use crate::config::SectionConfig;
use crate::error::{Error, Result};
use crate::model::ContentElement;
use regex::Regex;

/// Section level given to detected section titles.
const TITLE_LEVEL: usize = 0;

/// Section level back-filled into content of a detected section.
const CONTENT_LEVEL: usize = 1;

/// A heading paragraph recognised as a section boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedHeading {
    /// Keyword as written in the paragraph.
    pub keyword: String,
    /// Digits as written in the paragraph.
    pub digits: String,
    /// Section number, `None` if the digits could not be read as an integer.
    pub number: Option<u64>,
}

/// Decides which paragraphs are section boundaries.
#[derive(Debug, Clone)]
pub struct SectionDetector {
    pattern: Option<Regex>,
}

impl SectionDetector {
    /// Build a detector from the configured keyword list.
    ///
    /// An empty keyword list yields a detector that never matches.
    pub fn new(config: &SectionConfig) -> Result<Self> {
        config.validate()?;

        if config.keywords.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternatives = config
            .keywords
            .iter()
            .map(|k| regex::escape(k.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)^({})\s+(\d+)$", alternatives))
            .map_err(|e| Error::InvalidConfig(format!("section keyword pattern: {}", e)))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Match trimmed paragraph text against the heading pattern.
    pub fn detect(&self, text: &str) -> Option<DetectedHeading> {
        let captures = self.pattern.as_ref()?.captures(text.trim())?;
        let keyword = captures.get(1)?.as_str().to_string();
        let digits = captures.get(2)?.as_str().to_string();
        let number = digits.parse::<u64>().ok();

        Some(DetectedHeading {
            keyword,
            digits,
            number,
        })
    }

    /// Whether the text is a section heading.
    pub fn is_boundary(&self, text: &str) -> bool {
        self.detect(text).is_some()
    }
}

/// In-progress section awaiting finalization.
#[derive(Debug)]
struct OpenSection {
    title: String,
    content: Vec<ContentElement>,
}

/// Collects content into sections while the fallback traversal runs.
///
/// Owns the section index and the currently open section, so no state
/// survives between documents.
#[derive(Debug)]
pub struct SectionAccumulator<'a> {
    config: &'a SectionConfig,
    index: usize,
    open: Option<OpenSection>,
    output: Vec<ContentElement>,
}

impl<'a> SectionAccumulator<'a> {
    pub fn new(config: &'a SectionConfig) -> Self {
        Self {
            config,
            index: 0,
            open: None,
            output: Vec::new(),
        }
    }

    /// Number of boundary sections opened so far.
    pub fn section_count(&self) -> usize {
        self.index
    }

    /// Open a section for a detected heading.
    pub fn open_heading(&mut self, heading: &DetectedHeading) {
        let title = match heading.number {
            Some(_) => format!("{} {}", heading.keyword, heading.digits),
            None => self.config.generic_title(self.index),
        };
        self.open_section(title);
    }

    /// Open a generically titled section (break without a heading).
    pub fn open_generic(&mut self) {
        let title = self.config.generic_title(self.index);
        self.open_section(title);
    }

    fn open_section(&mut self, title: String) {
        self.finalize_open();
        log::debug!("Section {} opened: {}", self.index + 1, title);
        self.index += 1;
        self.open = Some(OpenSection {
            title,
            content: Vec::new(),
        });
    }

    /// Attach an element to the open section.
    ///
    /// Content before the first boundary goes into the default section.
    pub fn push(&mut self, element: ContentElement) {
        let config = self.config;
        let open = self.open.get_or_insert_with(|| {
            log::debug!("Content before first heading, using default section");
            OpenSection {
                title: config.default_title.clone(),
                content: Vec::new(),
            }
        });
        open.content.push(element);
    }

    fn finalize_open(&mut self) {
        if let Some(section) = self.open.take() {
            self.output
                .push(ContentElement::section_title(section.title, TITLE_LEVEL));
            self.output
                .extend(section.content.into_iter().map(|mut element| {
                    element.section_level = CONTENT_LEVEL;
                    element
                }));
        }
    }

    /// Finalize the open section and return the element stream.
    pub fn finish(mut self) -> Vec<ContentElement> {
        self.finalize_open();
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;

    fn detector() -> SectionDetector {
        SectionDetector::new(&SectionConfig::default()).unwrap()
    }

    #[test]
    fn test_detect_keyword_heading() {
        let detector = detector();

        let heading = detector.detect("Section 1").unwrap();
        assert_eq!(heading.keyword, "Section");
        assert_eq!(heading.number, Some(1));

        let heading = detector.detect("  chapter   12 ").unwrap();
        assert_eq!(heading.keyword, "chapter");
        assert_eq!(heading.number, Some(12));
    }

    #[test]
    fn test_detect_localized_keyword() {
        let detector = detector();

        assert!(detector.is_boundary("Séance 2"));
        assert!(detector.is_boundary("SÉANCE 3"));
        assert!(detector.is_boundary("Partie 4"));
    }

    #[test]
    fn test_non_headings_rejected() {
        let detector = detector();

        assert!(!detector.is_boundary("Section"));
        assert!(!detector.is_boundary("Section one"));
        assert!(!detector.is_boundary("See Section 2 for details"));
        assert!(!detector.is_boundary("Section 2: Overview"));
        assert!(!detector.is_boundary("Sections 2"));
    }

    #[test]
    fn test_custom_keywords() {
        let config = SectionConfig::default().with_keywords(["Kapitel"]);
        let detector = SectionDetector::new(&config).unwrap();

        assert!(detector.is_boundary("Kapitel 7"));
        assert!(!detector.is_boundary("Chapter 7"));
    }

    #[test]
    fn test_empty_keywords_never_match() {
        let config = SectionConfig::default().with_keywords(Vec::<String>::new());
        let detector = SectionDetector::new(&config).unwrap();

        assert!(!detector.is_boundary("Section 1"));
    }

    #[test]
    fn test_title_keeps_digits_as_written() {
        let config = SectionConfig::default();
        let detector = SectionDetector::new(&config).unwrap();
        let heading = detector.detect("Chapter 07").unwrap();
        assert_eq!(heading.digits, "07");
        assert_eq!(heading.number, Some(7));

        let mut acc = SectionAccumulator::new(&config);
        acc.open_heading(&heading);
        assert_eq!(acc.finish()[0].text, "Chapter 07");
    }

    #[test]
    fn test_overflowing_number_falls_back_to_index_title() {
        let config = SectionConfig::default();
        let detector = SectionDetector::new(&config).unwrap();
        let heading = detector
            .detect("Part 99999999999999999999999")
            .unwrap();
        assert_eq!(heading.number, None);

        let mut acc = SectionAccumulator::new(&config);
        acc.open_heading(&heading);
        let elements = acc.finish();
        assert_eq!(elements[0].text, "Section 1");
    }

    #[test]
    fn test_accumulator_backfills_levels() {
        let config = SectionConfig::default();
        let detector = SectionDetector::new(&config).unwrap();
        let mut acc = SectionAccumulator::new(&config);

        acc.open_heading(&detector.detect("Section 1").unwrap());
        acc.push(ContentElement::paragraph("Hello", 0));
        acc.open_heading(&detector.detect("Section 2").unwrap());
        acc.push(ContentElement::paragraph("World", 0));
        assert_eq!(acc.section_count(), 2);

        let elements = acc.finish();
        let summary: Vec<_> = elements
            .iter()
            .map(|e| (e.kind, e.text.as_str(), e.section_level))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ElementKind::SectionTitle, "Section 1", 0),
                (ElementKind::Paragraph, "Hello", 1),
                (ElementKind::SectionTitle, "Section 2", 0),
                (ElementKind::Paragraph, "World", 1),
            ]
        );
    }

    #[test]
    fn test_leading_content_gets_default_section() {
        let config = SectionConfig::default();
        let mut acc = SectionAccumulator::new(&config);

        acc.push(ContentElement::paragraph("Preface", 0));
        acc.open_generic();
        acc.push(ContentElement::paragraph("Body", 0));

        let elements = acc.finish();
        assert_eq!(elements[0].text, "Main Content");
        assert_eq!(elements[1].text, "Preface");
        assert_eq!(elements[2].text, "Section 1");
        assert_eq!(elements[3].text, "Body");
    }

    #[test]
    fn test_nothing_pushed_yields_nothing() {
        let config = SectionConfig::default();
        let acc = SectionAccumulator::new(&config);
        assert!(acc.finish().is_empty());
    }
}
