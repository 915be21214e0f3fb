//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the pdf2dxf pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pdf2DxfConfig {
    /// PDF extraction subprocess configuration.
    pub extractor: ExtractorConfig,

    /// Illustration lookup in the page metadata.
    pub locator: LocatorConfig,

    /// Path flattening and coordinate mapping.
    pub geometry: GeometryConfig,

    /// DXF output configuration.
    pub output: OutputConfig,
}

/// Extraction subprocess configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Path to the pdfalto executable (resolved automatically when unset).
    pub executable: Option<PathBuf>,

    /// File name of the metadata document written by the extractor.
    pub metadata_file: String,

    /// Extra arguments passed before the input and output paths.
    pub extra_args: Vec<String>,

    /// Suffix of the temporary working directory.
    pub temp_suffix: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            executable: None,
            metadata_file: "out.xml".to_string(),
            extra_args: Vec::new(),
            temp_suffix: ".pdfimport".to_string(),
        }
    }
}

/// Which illustration regions of a page are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IllustrationSelection {
    /// Only the first illustration of each page.
    #[default]
    First,
    /// Every illustration, one descriptor each.
    All,
}

/// Illustration locator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub illustrations: IllustrationSelection,
}

/// Where the page height used for the y-flip comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightSource {
    /// HEIGHT attribute of the page metadata.
    #[default]
    Declared,
    /// Maximum y of the flattened geometry.
    BoundingBox,
}

/// Geometry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Maximum distance (points) between a curve and its chords.
    pub curve_tolerance: f64,

    /// Source of the page height.
    pub height_source: HeightSource,

    /// Drop polylines with fewer than two points.
    pub skip_degenerate: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            curve_tolerance: 0.1,
            height_source: HeightSource::Declared,
            skip_degenerate: false,
        }
    }
}

/// DXF file format version. Lightweight polylines need R14 or later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DxfVersion {
    R14,
    #[default]
    R2000,
    R2004,
    R2007,
    R2010,
    R2013,
    R2018,
}

/// DXF output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format version written to the header.
    pub version: DxfVersion,

    /// Layer assigned to every polyline.
    pub layer: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            version: DxfVersion::default(),
            layer: "0".to_string(),
        }
    }
}

impl Pdf2DxfConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), String> {
        let tolerance = self.geometry.curve_tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(format!("geometry.curve_tolerance must be positive, got {tolerance}"));
        }
        if self.extractor.metadata_file.is_empty() {
            return Err("extractor.metadata_file must not be empty".to_string());
        }
        if self.output.layer.is_empty() {
            return Err("output.layer must not be empty".to_string());
        }
        Ok(())
    }
}
