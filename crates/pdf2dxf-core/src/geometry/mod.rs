//! 2D points, polylines and the mapping between PDF and drawing space.
//!
//! Source and drawing coordinates are distinct types: a [`SourcePoint`] is in
//! PDF points with the origin at the bottom-left of the page, a
//! [`DrawingPoint`] is in millimetres with the origin at the top-left. The
//! only way from one to the other is [`PageSpace::to_drawing`].

mod flatten;
mod transform;

pub use flatten::{Flattener, flatten_commands};
pub use transform::{MM_PER_INCH, POINTS_PER_INCH, PageSpace, to_destination};

use serde::{Deserialize, Serialize};

/// A point in PDF page space (1/72 inch, y up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourcePoint {
    pub x: f64,
    pub y: f64,
}

impl SourcePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in drawing space (millimetres, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingPoint {
    pub x: f64,
    pub y: f64,
}

impl DrawingPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An open sequence of straight-line-connected points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline<P> {
    points: Vec<P>,
}

impl<P> Polyline<P> {
    pub fn new(points: Vec<P>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<P> {
        self.points
    }

    /// Map every point, preserving order.
    pub fn map<Q>(self, f: impl FnMut(P) -> Q) -> Polyline<Q> {
        Polyline {
            points: self.points.into_iter().map(f).collect(),
        }
    }
}

/// Axis-aligned bounding box in source space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: SourcePoint,
    pub max: SourcePoint,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for no points.
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a SourcePoint>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in points {
            bounds.include(*p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: SourcePoint) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(mut self, other: Bounds) -> Self {
        self.include(other.min);
        self.include(other.max);
        self
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
