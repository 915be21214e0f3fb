//! Error types for the pdf2dxf-core library.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Main error type for the pdf2dxf library.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The external extraction step failed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The page metadata document could not be read.
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// A vector file could not be loaded.
    #[error("vector file error: {0}")]
    Vector(#[from] VectorError),

    /// The output drawing could not be assembled or saved.
    #[error("drawing error: {0}")]
    Drawing(#[from] DrawingError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF contains no page with an illustration.
    #[error("no illustrated page found in PDF")]
    NoIllustrations,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised at the extraction subprocess boundary.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The extraction executable could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extraction executable exited unsuccessfully.
    #[error("{program} exited with {status}")]
    ExitStatus { program: PathBuf, status: ExitStatus },

    /// The temporary working directory could not be created or removed.
    #[error("temporary directory: {0}")]
    TempDir(#[source] std::io::Error),

    /// The extractor succeeded but wrote no metadata document.
    #[error("metadata document not produced: {}", .0.display())]
    MissingMetadata(PathBuf),
}

/// Errors related to the page metadata document.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The document is not well-formed XML.
    #[error("malformed metadata document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document could not be opened.
    #[error("failed to open metadata document: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to loading a vector file.
#[derive(Error, Debug)]
pub enum VectorError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a parsable vector document.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Errors related to the output drawing.
#[derive(Error, Debug)]
pub enum DrawingError {
    /// A transformed point is NaN or infinite.
    #[error("non-finite coordinate in polyline {polyline} at point {point}")]
    NonFinite { polyline: usize, point: usize },

    /// Serializing the drawing failed.
    #[error("failed to save drawing: {0}")]
    Save(#[from] dxf::DxfError),
}

/// Result type for the pdf2dxf library.
pub type Result<T> = std::result::Result<T, ConvertError>;
