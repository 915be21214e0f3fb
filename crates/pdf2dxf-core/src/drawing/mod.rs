//! Drawing assembly: flattened, transformed polylines into an output sink.

mod memory;
mod writer;

pub use memory::MemorySink;
pub use writer::DxfSink;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::DrawingError;
use crate::geometry::{DrawingPoint, PageSpace, Polyline};
use crate::models::config::GeometryConfig;
use crate::shape::ShapeTree;

/// Destination of assembled polylines.
///
/// `finalize` consumes the sink: persistence happens exactly once and
/// nothing can be appended afterwards.
pub trait DrawingSink {
    /// What a finalized sink produces.
    type Output;

    fn append(&mut self, polyline: Polyline<DrawingPoint>);

    fn finalize(self) -> Result<Self::Output, DrawingError>;
}

/// Options controlling assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyOptions {
    /// Curve flattening tolerance in source points.
    pub curve_tolerance: f64,
    /// Drop polylines with fewer than two points.
    pub skip_degenerate: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self::from(&GeometryConfig::default())
    }
}

impl From<&GeometryConfig> for AssemblyOptions {
    fn from(config: &GeometryConfig) -> Self {
        Self {
            curve_tolerance: config.curve_tolerance,
            skip_degenerate: config.skip_degenerate,
        }
    }
}

/// Counters of an assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    /// Polylines appended to the sink.
    pub polylines: usize,
    /// Points across appended polylines.
    pub points: usize,
    /// Degenerate polylines dropped.
    pub skipped: usize,
}

/// Feeds shape trees through the flattener and page mapping into a sink.
pub struct Assembler<S> {
    sink: S,
    options: AssemblyOptions,
    stats: AssemblyStats,
}

impl<S: DrawingSink> Assembler<S> {
    pub fn new(sink: S, options: AssemblyOptions) -> Self {
        Self {
            sink,
            options,
            stats: AssemblyStats::default(),
        }
    }

    /// Append every polyline of `tree`, mapped through `space`.
    ///
    /// Stops at the first polyline holding a non-finite point; polylines
    /// appended before it stay in the sink.
    pub fn append_tree(&mut self, tree: &ShapeTree, space: &PageSpace) -> Result<usize, DrawingError> {
        let mut appended = 0;

        for source in tree.flatten(self.options.curve_tolerance) {
            let index = self.stats.polylines + self.stats.skipped;
            let polyline = space.map_polyline(source);

            if let Some(point) = polyline.points().iter().position(|p| !p.is_finite()) {
                return Err(DrawingError::NonFinite {
                    polyline: index,
                    point,
                });
            }

            if self.options.skip_degenerate && polyline.len() < 2 {
                trace!("Dropping polyline {} with {} points", index, polyline.len());
                self.stats.skipped += 1;
                continue;
            }

            self.stats.polylines += 1;
            self.stats.points += polyline.len();
            self.sink.append(polyline);
            appended += 1;
        }

        Ok(appended)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stats(&self) -> AssemblyStats {
        self.stats
    }

    /// Finalize the sink.
    pub fn finish(self) -> Result<(S::Output, AssemblyStats), DrawingError> {
        debug!(
            "Finalizing drawing: {} polylines, {} points, {} skipped",
            self.stats.polylines, self.stats.points, self.stats.skipped
        );
        let output = self.sink.finalize()?;
        Ok((output, self.stats))
    }
}

/// Assemble one shape tree into `sink` and finalize it.
///
/// On error the sink is dropped without being finalized.
pub fn assemble<S: DrawingSink>(
    tree: &ShapeTree,
    space: &PageSpace,
    sink: S,
    options: AssemblyOptions,
) -> Result<(S::Output, AssemblyStats), DrawingError> {
    let mut assembler = Assembler::new(sink, options);
    assembler.append_tree(tree, space)?;
    assembler.finish()
}
