//! PDF points (bottom-left origin) to millimetres (top-left origin).

use super::{DrawingPoint, Polyline, SourcePoint};

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Map a source point to drawing space for a page of the given height.
///
/// No clamping: points outside the page map outside the drawing.
pub fn to_destination(point: SourcePoint, page_height: f64) -> DrawingPoint {
    DrawingPoint {
        x: point.x / POINTS_PER_INCH * MM_PER_INCH,
        y: (page_height - point.y) / POINTS_PER_INCH * MM_PER_INCH,
    }
}

/// The coordinate mapping of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpace {
    page_height: f64,
}

impl PageSpace {
    /// `page_height` is in source points.
    pub fn new(page_height: f64) -> Self {
        Self { page_height }
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn to_drawing(&self, point: SourcePoint) -> DrawingPoint {
        to_destination(point, self.page_height)
    }

    pub fn map_polyline(&self, polyline: Polyline<SourcePoint>) -> Polyline<DrawingPoint> {
        polyline.map(|p| self.to_drawing(p))
    }
}
