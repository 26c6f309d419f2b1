//! Core content model, structure extraction, pagination, layout
//! assignment and slide writing for document-to-slides conversion.

pub mod collab;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod ids;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod ops;
pub mod paginate;
pub mod sections;
pub mod source;

pub use collab::{DestinationWriter, ImageFetcher, Placeholders, PresentationHandle, SourceReader};
pub use config::{ConversionConfig, LayoutConfig, PaginationConfig, SectionConfig};
pub use convert::{ConversionReport, Converter, PlannedSlide};
pub use error::{Error, Result, SkipReason, SkippedElement, Stage};
pub use extract::{Extraction, StructureExtractor};
pub use ids::{IdAllocator, ObjectKind};
pub use layout::{ImagePlacement, LayoutArchetype, LayoutAssigner, LayoutDecision, SlideDesign};
pub use model::{ContentElement, ElementKind, Frame, ImageRef, TableData};
pub use normalize::TextNormalizer;
pub use ops::{ImageSource, SlideOperation, TextTarget};
pub use paginate::{ChunkContent, ChunkOrigin, Paginator, SlideChunk};
pub use sections::{DetectedHeading, SectionDetector};
pub use source::{
    Block, Body, BreakKind, Cell, EmbeddedObject, ImageResolver, Inline, InlineObject,
    InlineObjects, Paragraph, ResolvedImage, Size, SourceDocument, SourceTab, SourceTable,
};
