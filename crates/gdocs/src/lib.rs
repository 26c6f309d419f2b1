//! Google Docs reader backend for document-to-slides conversion.
//!
//! Parses documents exported from the Docs API as JSON, with or without
//! tab content, into the core's source tree.

pub mod api;
pub mod parser;

pub use parser::{DocsJsonReader, DocsParser};
