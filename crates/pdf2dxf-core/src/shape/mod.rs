//! In-memory shape tree of one vector file.

mod svg;

use std::fmt;

use crate::geometry::{Bounds, Flattener, Polyline, SourcePoint, flatten_commands};

/// A drawing command of a path, in absolute source coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(SourcePoint),
    LineTo(SourcePoint),
    /// Control point, end point.
    QuadTo(SourcePoint, SourcePoint),
    /// Two control points, end point.
    CubicTo(SourcePoint, SourcePoint, SourcePoint),
    Close,
}

/// A path-bearing node.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    pub id: String,
    pub commands: Vec<PathCommand>,
}

impl PathShape {
    pub fn new(id: impl Into<String>, commands: Vec<PathCommand>) -> Self {
        Self {
            id: id.into(),
            commands,
        }
    }

    /// One polyline per subpath, curves flattened to `tolerance`.
    pub fn segments(&self, tolerance: f64) -> Vec<Polyline<SourcePoint>> {
        flatten_commands(&self.commands, tolerance)
    }
}

/// A container of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGroup {
    pub id: String,
    pub children: Vec<ShapeNode>,
}

impl ShapeGroup {
    pub fn new(id: impl Into<String>, children: Vec<ShapeNode>) -> Self {
        Self {
            id: id.into(),
            children,
        }
    }
}

/// Kinds of node that carry no line geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    Text,
    Image,
}

impl fmt::Display for OpaqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueKind::Text => f.write_str("text"),
            OpaqueKind::Image => f.write_str("image"),
        }
    }
}

/// A node of the shape tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeNode {
    Group(ShapeGroup),
    Path(PathShape),
    Opaque(OpaqueKind),
}

/// Ordered forest of shape nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeTree {
    nodes: Vec<ShapeNode>,
}

impl ShapeTree {
    pub fn new(nodes: Vec<ShapeNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[ShapeNode] {
        &self.nodes
    }

    /// Lazily flatten every path into polylines, in document order.
    pub fn flatten(&self, tolerance: f64) -> Flattener<'_> {
        Flattener::new(self, tolerance)
    }

    /// Bounding box of the flattened geometry.
    pub fn bounds(&self, tolerance: f64) -> Option<Bounds> {
        self.flatten(tolerance)
            .filter_map(|polyline| Bounds::of_points(polyline.points()))
            .reduce(Bounds::union)
    }
}
