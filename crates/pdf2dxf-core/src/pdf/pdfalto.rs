//! Extraction through the `pdfalto` executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::{Extractor, Result};
use crate::error::ExtractionError;
use crate::models::config::ExtractorConfig;

#[cfg(windows)]
const EXECUTABLE_NAME: &str = "pdfalto.exe";
#[cfg(not(windows))]
const EXECUTABLE_NAME: &str = "pdfalto";

/// Locate pdfalto: next to the running binary if bundled there, else on `PATH`.
pub fn default_executable() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(EXECUTABLE_NAME)))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(EXECUTABLE_NAME))
}

/// Anchor a program path to the current directory.
///
/// The extractor runs inside its work directory, so a relative path such as
/// `bin/pdfalto` would otherwise resolve there. Bare names are kept for
/// `PATH` lookup.
pub fn resolve_program(program: PathBuf) -> PathBuf {
    if program.components().count() > 1 && program.is_relative() {
        return std::path::absolute(&program).unwrap_or(program);
    }
    program
}

/// Runs pdfalto as a blocking subprocess.
#[derive(Debug, Clone)]
pub struct PdfAltoExtractor {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl PdfAltoExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments placed before the input and output paths.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        let program = config
            .executable
            .clone()
            .map(resolve_program)
            .unwrap_or_else(default_executable);
        Self::new(program).with_args(config.extra_args.clone())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Extractor for PdfAltoExtractor {
    fn extract(&self, pdf: &Path, workdir: &Path, metadata_file: &str) -> Result<()> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.extra_args)
            .arg(pdf)
            .arg(metadata_file)
            .current_dir(workdir);

        debug!("Spawning {:?} in {}", command, workdir.display());

        let status = command.status().map_err(|source| ExtractionError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(ExtractionError::ExitStatus {
                program: self.program.clone(),
                status,
            });
        }

        debug!("{} finished", self.program.display());
        Ok(())
    }
}
