//! Extractor double for tests.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Extractor, Result};
use crate::error::ExtractionError;

/// Writes fixed files and remembers the directory it was given.
#[derive(Default)]
pub(crate) struct FakeExtractor {
    metadata: Option<String>,
    files: Vec<(String, String)>,
    fail: bool,
    workdir: RefCell<Option<PathBuf>>,
}

impl FakeExtractor {
    pub(crate) fn with_metadata(metadata: impl Into<String>) -> Self {
        Self {
            metadata: Some(metadata.into()),
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Extractor that succeeds but writes nothing.
    pub(crate) fn silent() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(mut self, name: &str, content: impl Into<String>) -> Self {
        self.files.push((name.to_string(), content.into()));
        self
    }

    pub(crate) fn was_run(&self) -> bool {
        self.workdir.borrow().is_some()
    }

    pub(crate) fn workdir(&self) -> PathBuf {
        self.workdir.borrow().clone().expect("extractor was not run")
    }
}

impl Extractor for FakeExtractor {
    fn extract(&self, _pdf: &Path, workdir: &Path, metadata_file: &str) -> Result<()> {
        *self.workdir.borrow_mut() = Some(workdir.to_path_buf());
        if self.fail {
            return Err(ExtractionError::Spawn {
                program: PathBuf::from("fake"),
                source: std::io::Error::other("boom"),
            });
        }
        if let Some(metadata) = &self.metadata {
            fs::write(workdir.join(metadata_file), metadata).unwrap();
        }
        for (name, content) in &self.files {
            let path = workdir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        Ok(())
    }
}

/// ALTO document with one illustrated page per `(width, height, file)`.
pub(crate) fn alto_metadata(pages: &[(f64, f64, &str)]) -> String {
    let pages: String = pages
        .iter()
        .map(|(w, h, file)| {
            format!(r#"<Page WIDTH="{w}" HEIGHT="{h}"><PrintSpace><Illustration FILEID="{file}"/></PrintSpace></Page>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><alto xmlns="http://www.loc.gov/standards/alto/v3/alto.xsd"><Layout>{pages}</Layout></alto>"#
    )
}

/// SVG document with one stroked path per `d` attribute.
pub(crate) fn svg_document(paths: &[&str]) -> String {
    let body: String = paths
        .iter()
        .map(|d| format!(r#"<path d="{d}" stroke="black" fill="none"/>"#))
        .collect();
    format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="612" height="792">{body}</svg>"#)
}
