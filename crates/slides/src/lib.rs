//! Google Slides backend for document-to-slides conversion.
//!
//! Encodes slide operations as `batchUpdate` request JSON and records the
//! batches of one presentation instead of sending them.

pub mod encoder;
pub mod recorder;

pub use encoder::RequestEncoder;
pub use recorder::{BatchRecorder, RecordedBatch, RecordedPresentation};
