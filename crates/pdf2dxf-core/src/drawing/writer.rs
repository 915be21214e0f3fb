//! DXF output using the dxf crate.

use std::path::{Path, PathBuf};

use dxf::entities::{Entity, EntityType, LwPolyline};
use dxf::enums::{AcadVersion, Units};
use dxf::tables::Layer;
use dxf::{Drawing, LwPolylineVertex};
use tracing::debug;

use super::DrawingSink;
use crate::error::DrawingError;
use crate::geometry::{DrawingPoint, Polyline};
use crate::models::config::{DxfVersion, OutputConfig};

impl From<DxfVersion> for AcadVersion {
    fn from(version: DxfVersion) -> Self {
        match version {
            DxfVersion::R14 => AcadVersion::R14,
            DxfVersion::R2000 => AcadVersion::R2000,
            DxfVersion::R2004 => AcadVersion::R2004,
            DxfVersion::R2007 => AcadVersion::R2007,
            DxfVersion::R2010 => AcadVersion::R2010,
            DxfVersion::R2013 => AcadVersion::R2013,
            DxfVersion::R2018 => AcadVersion::R2018,
        }
    }
}

/// Writes polylines as open LWPOLYLINE entities to a DXF file.
pub struct DxfSink {
    drawing: Drawing,
    path: PathBuf,
    layer: String,
}

impl DxfSink {
    /// Start a millimetre drawing that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>, config: &OutputConfig) -> Self {
        let mut drawing = Drawing::new();
        drawing.header.version = config.version.into();
        drawing.header.default_drawing_units = Units::Millimeters;

        if config.layer != "0" {
            drawing.add_layer(Layer {
                name: config.layer.clone(),
                ..Default::default()
            });
        }

        Self {
            drawing,
            path: path.into(),
            layer: config.layer.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }
}

impl DrawingSink for DxfSink {
    type Output = PathBuf;

    fn append(&mut self, polyline: Polyline<DrawingPoint>) {
        let vertices = polyline
            .into_points()
            .into_iter()
            .map(|p| LwPolylineVertex {
                x: p.x,
                y: p.y,
                ..Default::default()
            })
            .collect();

        let mut entity = Entity::new(EntityType::LwPolyline(LwPolyline {
            vertices,
            ..Default::default()
        }));
        entity.common.layer = self.layer.clone();
        self.drawing.add_entity(entity);
    }

    fn finalize(self) -> Result<PathBuf, DrawingError> {
        debug!("Saving drawing to {}", self.path.display());
        self.drawing.save_file(&self.path)?;
        Ok(self.path)
    }
}
