use super::DrawingSink;
use crate::error::DrawingError;
use crate::geometry::{DrawingPoint, Polyline};

/// Sink that keeps polylines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    polylines: Vec<Polyline<DrawingPoint>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polylines(&self) -> &[Polyline<DrawingPoint>] {
        &self.polylines
    }
}

impl DrawingSink for MemorySink {
    type Output = Vec<Polyline<DrawingPoint>>;

    fn append(&mut self, polyline: Polyline<DrawingPoint>) {
        self.polylines.push(polyline);
    }

    fn finalize(self) -> Result<Self::Output, DrawingError> {
        Ok(self.polylines)
    }
}
