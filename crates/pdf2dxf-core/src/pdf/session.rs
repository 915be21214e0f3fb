//! Scoped temporary workspace holding one extraction's output.
//!
//! The extracted vector files live in a temporary directory owned by
//! [`ExtractionSession`]. Pages handed out by [`ExtractionSession::pages`]
//! borrow the session, so no page can be used once the session is gone, and
//! the directory is removed whenever the session is dropped: after full
//! iteration, after an early `break`, or while unwinding an error.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use super::Extractor;
use crate::alto::IllustrationLocator;
use crate::error::{ExtractionError, MetadataError, Result, VectorError};
use crate::models::PageDescriptor;
use crate::models::config::{ExtractorConfig, IllustrationSelection};
use crate::shape::ShapeTree;

/// Output of one extractor run inside its own temporary directory.
#[derive(Debug)]
pub struct ExtractionSession {
    dir: TempDir,
    metadata: PathBuf,
    selection: IllustrationSelection,
}

impl ExtractionSession {
    /// Create the temporary directory and run the extractor inside it.
    pub fn open<E: Extractor + ?Sized>(
        extractor: &E,
        pdf: &Path,
        config: &ExtractorConfig,
        selection: IllustrationSelection,
    ) -> Result<Self> {
        let pdf = std::path::absolute(pdf)?;
        let dir = tempfile::Builder::new()
            .suffix(&config.temp_suffix)
            .tempdir()
            .map_err(ExtractionError::TempDir)?;
        debug!("In {}...", dir.path().display());

        extractor.extract(&pdf, dir.path(), &config.metadata_file)?;

        let metadata = dir.path().join(&config.metadata_file);
        if !metadata.is_file() {
            return Err(ExtractionError::MissingMetadata(metadata).into());
        }

        Ok(Self {
            dir,
            metadata,
            selection,
        })
    }

    /// Temporary directory of this session.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Illustrated pages in document order.
    pub fn pages(&self) -> std::result::Result<IllustratedPages<'_>, MetadataError> {
        let locator = IllustrationLocator::from_file(&self.metadata, self.selection)?;
        Ok(IllustratedPages {
            root: self.dir.path(),
            locator,
        })
    }

    /// Remove the temporary directory, reporting failures.
    pub fn close(self) -> Result<()> {
        debug!("Removing {}", self.dir.path().display());
        self.dir.close().map_err(ExtractionError::TempDir)?;
        Ok(())
    }
}

/// Iterator over the illustrated pages of a session.
pub struct IllustratedPages<'a> {
    root: &'a Path,
    locator: IllustrationLocator<BufReader<File>>,
}

impl<'a> Iterator for IllustratedPages<'a> {
    type Item = std::result::Result<IllustratedPage<'a>, MetadataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let root = self.root;
        self.locator.next().map(|result| {
            result.map(|descriptor| {
                debug!("Yielding {}", descriptor.vector_file);
                IllustratedPage { root, descriptor }
            })
        })
    }
}

/// A located page whose vector file lives in the session directory.
#[derive(Debug, Clone)]
pub struct IllustratedPage<'a> {
    root: &'a Path,
    descriptor: PageDescriptor,
}

impl IllustratedPage<'_> {
    pub fn descriptor(&self) -> &PageDescriptor {
        &self.descriptor
    }

    /// Location of the vector file; valid only while the session is alive.
    pub fn vector_path(&self) -> PathBuf {
        self.root.join(&self.descriptor.vector_file)
    }

    /// Parse the page's vector file.
    pub fn load(&self) -> std::result::Result<ShapeTree, VectorError> {
        ShapeTree::from_file(&self.vector_path())
    }
}
