//! Core library for converting PDF vector illustrations to DXF drawings.
//!
//! This crate provides:
//! - Extraction of per-page vector files through `pdfalto`, in a scoped
//!   temporary directory
//! - Lookup of illustrated pages in ALTO page metadata
//! - Flattening of vector paths into polylines
//! - Mapping from PDF points to drawing millimetres and DXF output

pub mod alto;
pub mod convert;
pub mod drawing;
pub mod error;
pub mod geometry;
pub mod models;
pub mod pdf;
pub mod shape;

pub use alto::{IllustrationLocator, locate};
pub use convert::{ConversionReport, convert_pdf, convert_tree};
pub use drawing::{Assembler, AssemblyOptions, AssemblyStats, DrawingSink, DxfSink, MemorySink, assemble};
pub use error::{ConvertError, Result};
pub use geometry::{DrawingPoint, PageSpace, Polyline, SourcePoint, to_destination};
pub use models::{PageDescriptor, Pdf2DxfConfig};
pub use pdf::{ExtractionSession, Extractor, PdfAltoExtractor};
pub use shape::{OpaqueKind, PathCommand, PathShape, ShapeGroup, ShapeNode, ShapeTree};
