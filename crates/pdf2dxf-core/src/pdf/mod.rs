//! PDF illustration extraction.

mod pdfalto;
mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use pdfalto::{PdfAltoExtractor, default_executable, resolve_program};
pub use session::{ExtractionSession, IllustratedPage, IllustratedPages};

use std::path::Path;

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for tools that split a PDF into page metadata and vector files.
pub trait Extractor {
    /// Convert `pdf`, writing the metadata document `metadata_file` and the
    /// vector files it references into `workdir`.
    fn extract(&self, pdf: &Path, workdir: &Path, metadata_file: &str) -> Result<()>;
}
