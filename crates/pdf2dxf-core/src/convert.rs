//! PDF to DXF conversion of the first illustrated page.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::drawing::{AssemblyOptions, AssemblyStats, DrawingSink, DxfSink, assemble};
use crate::error::{ConvertError, Result};
use crate::geometry::PageSpace;
use crate::models::config::{GeometryConfig, HeightSource};
use crate::models::{PageDescriptor, Pdf2DxfConfig};
use crate::pdf::{ExtractionSession, Extractor};
use crate::shape::ShapeTree;

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    /// The converted page.
    pub page: PageDescriptor,
    /// Page height (points) used for the y-flip.
    pub page_height: f64,
    /// Polyline counters.
    pub stats: AssemblyStats,
    /// Written drawing file.
    pub output: PathBuf,
}

/// Page height for the y-flip, per the configured source.
pub fn page_height(tree: &ShapeTree, page: &PageDescriptor, geometry: &GeometryConfig) -> f64 {
    match geometry.height_source {
        HeightSource::Declared => page.height,
        HeightSource::BoundingBox => match tree.bounds(geometry.curve_tolerance) {
            Some(bounds) => bounds.max.y,
            None => {
                debug!("No geometry on page, using declared height {}", page.height);
                page.height
            }
        },
    }
}

/// Assemble one page's shape tree into `sink` and finalize it.
pub fn convert_tree<S: DrawingSink>(
    tree: &ShapeTree,
    page: &PageDescriptor,
    sink: S,
    geometry: &GeometryConfig,
) -> Result<(S::Output, AssemblyStats, f64)> {
    let height = page_height(tree, page, geometry);
    let space = PageSpace::new(height);
    let (output, stats) = assemble(tree, &space, sink, AssemblyOptions::from(geometry))?;
    Ok((output, stats, height))
}

/// Extract the illustrations of `pdf` and write the first illustrated page to `output`.
///
/// The extractor's temporary directory is removed before returning, on
/// success and on every error path.
pub fn convert_pdf<E: Extractor + ?Sized>(
    extractor: &E,
    pdf: &Path,
    output: &Path,
    config: &Pdf2DxfConfig,
) -> Result<ConversionReport> {
    config.validate().map_err(ConvertError::Config)?;
    info!("Converting {} into {}", pdf.display(), output.display());

    let session = ExtractionSession::open(extractor, pdf, &config.extractor, config.locator.illustrations)?;

    let report = {
        let mut pages = session.pages()?;
        let page = pages.next().transpose()?.ok_or(ConvertError::NoIllustrations)?;
        let descriptor = page.descriptor().clone();
        info!(
            "Page {} x {} pt, vector file {}",
            descriptor.width, descriptor.height, descriptor.vector_file
        );

        let tree = page.load()?;
        let sink = DxfSink::new(output, &config.output);
        let (written, stats, page_height) = convert_tree(&tree, &descriptor, sink, &config.geometry)?;

        if pages.next().is_some() {
            debug!("Only the first page is currently exported");
        }

        ConversionReport {
            page: descriptor,
            page_height,
            stats,
            output: written,
        }
    };

    session.close()?;
    info!(
        "Wrote {} polylines ({} points) to {}",
        report.stats.polylines,
        report.stats.points,
        report.output.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::MemorySink;
    use crate::error::ExtractionError;
    use crate::pdf::testing::{FakeExtractor, alto_metadata, svg_document};
    use dxf::Drawing;
    use dxf::entities::EntityType;
    use pretty_assertions::assert_eq;

    fn run(extractor: &FakeExtractor, config: &Pdf2DxfConfig) -> (tempfile::TempDir, Result<ConversionReport>) {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.dxf");
        let result = convert_pdf(extractor, Path::new("input.pdf"), &output, config);
        (dir, result)
    }

    fn polylines(path: &Path) -> Vec<Vec<(f64, f64)>> {
        Drawing::load_file(path)
            .unwrap()
            .entities()
            .filter_map(|entity| match &entity.specific {
                EntityType::LwPolyline(poly) => Some(poly.vertices.iter().map(|v| (v.x, v.y)).collect()),
                _ => None,
            })
            .collect()
    }

    fn three_pages() -> FakeExtractor {
        FakeExtractor::with_metadata(alto_metadata(&[
            (612.0, 792.0, "out.xml_data/image-1.vec"),
            (612.0, 792.0, "out.xml_data/image-2.vec"),
            (612.0, 792.0, "out.xml_data/image-3.vec"),
        ]))
        .with_file("out.xml_data/image-1.vec", svg_document(&["M0 792 L72 720"]))
        .with_file("out.xml_data/image-2.vec", svg_document(&["M144 792 L216 720"]))
        .with_file("out.xml_data/image-3.vec", svg_document(&["M288 792 L360 720", "M0 0 L1 1"]))
    }

    #[test]
    fn test_only_first_page_is_converted() {
        let extractor = three_pages();
        let (_dir, result) = run(&extractor, &Pdf2DxfConfig::default());
        let report = result.unwrap();

        assert_eq!(report.page.vector_file, "out.xml_data/image-1.vec");
        assert_eq!(report.stats.polylines, 1);
        assert_eq!(report.page_height, 792.0);

        let lines = polylines(&report.output);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0], (0.0, 0.0));
        assert!((lines[0][1].0 - 25.4).abs() < 1e-9);
        assert!((lines[0][1].1 - 25.4).abs() < 1e-9);
        assert!(!extractor.workdir().exists());
    }

    #[test]
    fn test_no_illustrations() {
        let extractor = FakeExtractor::with_metadata(alto_metadata(&[]));
        let (dir, result) = run(&extractor, &Pdf2DxfConfig::default());

        assert!(matches!(result, Err(ConvertError::NoIllustrations)));
        assert!(!dir.path().join("out.dxf").exists());
        assert!(!extractor.workdir().exists());
    }

    #[test]
    fn test_extraction_failure_writes_nothing() {
        let extractor = FakeExtractor::failing();
        let (dir, result) = run(&extractor, &Pdf2DxfConfig::default());

        assert!(matches!(
            result,
            Err(ConvertError::Extraction(ExtractionError::Spawn { .. }))
        ));
        assert!(!dir.path().join("out.dxf").exists());
    }

    #[test]
    fn test_missing_vector_file() {
        let extractor = FakeExtractor::with_metadata(alto_metadata(&[(612.0, 792.0, "missing.vec")]));
        let (_dir, result) = run(&extractor, &Pdf2DxfConfig::default());
        assert!(matches!(result, Err(ConvertError::Vector(_))));
        assert!(!extractor.workdir().exists());
    }

    #[test]
    fn test_invalid_config_is_rejected_first() {
        let extractor = three_pages();
        let mut config = Pdf2DxfConfig::default();
        config.geometry.curve_tolerance = -1.0;

        let (_dir, result) = run(&extractor, &config);
        assert!(matches!(result, Err(ConvertError::Config(_))));
        assert!(!extractor.was_run());
    }

    #[test]
    fn test_height_source() {
        let tree = ShapeTree::from_svg_data(svg_document(&["M0 0 L10 500"]).as_bytes()).unwrap();
        let page = PageDescriptor::new(612.0, 792.0, "p1.svg").unwrap();

        let declared = GeometryConfig::default();
        assert_eq!(page_height(&tree, &page, &declared), 792.0);

        let bbox = GeometryConfig {
            height_source: HeightSource::BoundingBox,
            ..GeometryConfig::default()
        };
        assert_eq!(page_height(&tree, &page, &bbox), 500.0);

        let (polylines, _, height) = convert_tree(&tree, &page, MemorySink::new(), &bbox).unwrap();
        assert_eq!(height, 500.0);
        assert_eq!(polylines[0].points()[1].y, 0.0);
    }

    #[test]
    fn test_bounding_box_height_falls_back_to_declared() {
        let page = PageDescriptor::new(612.0, 792.0, "p1.svg").unwrap();
        let bbox = GeometryConfig {
            height_source: HeightSource::BoundingBox,
            ..GeometryConfig::default()
        };
        assert_eq!(page_height(&ShapeTree::default(), &page, &bbox), 792.0);
    }
}
