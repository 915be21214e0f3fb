//! Loading shape trees from SVG vector files with usvg.

use std::path::{Path, PathBuf};

use tracing::debug;
use usvg::tiny_skia_path::{self, PathSegment};
use usvg::{Node, Transform};

use super::{OpaqueKind, PathCommand, PathShape, ShapeGroup, ShapeNode, ShapeTree};
use crate::error::VectorError;
use crate::geometry::SourcePoint;

impl ShapeTree {
    /// Parse a vector file written by the extractor.
    pub fn from_file(path: &Path) -> Result<Self, VectorError> {
        debug!("Parsing vector file {}", path.display());

        let data = std::fs::read(path).map_err(|source| VectorError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let options = usvg::Options {
            resources_dir: path.parent().map(Path::to_path_buf),
            ..usvg::Options::default()
        };

        parse(&data, &options).map_err(|message| VectorError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse SVG from memory.
    pub fn from_svg_data(data: &[u8]) -> Result<Self, VectorError> {
        parse(data, &usvg::Options::default()).map_err(|message| VectorError::Parse {
            path: PathBuf::from("<memory>"),
            message,
        })
    }
}

fn parse(data: &[u8], options: &usvg::Options) -> Result<ShapeTree, String> {
    let tree = usvg::Tree::from_data(data, options).map_err(|e| e.to_string())?;
    let nodes = convert_children(tree.root());
    debug!("Vector file has {} top-level nodes", nodes.len());
    Ok(ShapeTree::new(nodes))
}

fn convert_children(group: &usvg::Group) -> Vec<ShapeNode> {
    group.children().iter().map(convert_node).collect()
}

fn convert_node(node: &Node) -> ShapeNode {
    match node {
        Node::Group(group) => ShapeNode::Group(ShapeGroup::new(group.id(), convert_children(group))),
        Node::Path(path) => ShapeNode::Path(PathShape::new(
            path.id(),
            convert_path(path.data(), &path.abs_transform()),
        )),
        Node::Image(_) => ShapeNode::Opaque(OpaqueKind::Image),
        Node::Text(_) => ShapeNode::Opaque(OpaqueKind::Text),
    }
}

fn convert_path(data: &tiny_skia_path::Path, transform: &Transform) -> Vec<PathCommand> {
    let map = |p: tiny_skia_path::Point| map_point(transform, p);

    data.segments()
        .map(|segment| match segment {
            PathSegment::MoveTo(p) => PathCommand::MoveTo(map(p)),
            PathSegment::LineTo(p) => PathCommand::LineTo(map(p)),
            PathSegment::QuadTo(c, p) => PathCommand::QuadTo(map(c), map(p)),
            PathSegment::CubicTo(c1, c2, p) => PathCommand::CubicTo(map(c1), map(c2), map(p)),
            PathSegment::Close => PathCommand::Close,
        })
        .collect()
}

/// Apply the absolute transform in f64.
fn map_point(ts: &Transform, p: tiny_skia_path::Point) -> SourcePoint {
    let (x, y) = (f64::from(p.x), f64::from(p.y));
    SourcePoint::new(
        f64::from(ts.sx) * x + f64::from(ts.kx) * y + f64::from(ts.tx),
        f64::from(ts.ky) * x + f64::from(ts.sy) * y + f64::from(ts.ty),
    )
}
