//! Text normalization for extracted paragraph and cell text.
//!
//! Source text runs arrive with platform line endings, soft line breaks
//! (U+000B), decomposed Unicode and stray runs of spaces. Classification
//! and word counting expect clean, trimmed lines.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple spaces and tabs into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\x{a0}]+").unwrap());

/// Soft line break used inside paragraphs by rich-text editors.
const SOFT_LINE_BREAK: char = '\u{000B}';

/// Form feed left behind by page breaks inside a run.
const FORM_FEED: char = '\u{000C}';

/// Text normalizer for extracted document text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a run of text.
    ///
    /// - Applies Unicode NFC composition
    /// - Converts `\r\n`, `\r`, soft line breaks and form feeds to `\n`
    /// - Collapses whitespace runs within a line to single spaces
    /// - Drops blank lines and trims the result
    pub fn normalize(&self, text: &str) -> String {
        let composed: String = text
            .nfc()
            .map(|c| match c {
                SOFT_LINE_BREAK | FORM_FEED => '\n',
                other => other,
            })
            .collect();
        let unified = composed.replace("\r\n", "\n").replace('\r', "\n");

        unified
            .lines()
            .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
