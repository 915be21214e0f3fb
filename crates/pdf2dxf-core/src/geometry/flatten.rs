//! Path flattening: curves become chains of straight chords.
//!
//! Béziers are split into `n` uniform parameter steps, where `n` is derived
//! from the second difference of the control points so that the chord error
//! stays below the tolerance. The step count only depends on the control
//! points and the tolerance, so the output is deterministic.

use std::slice;
use std::vec;

use tracing::{debug, trace};

use super::{Polyline, SourcePoint};
use crate::shape::{PathCommand, ShapeNode, ShapeTree};

/// Upper bound on chords per curve.
const MAX_CHORDS: usize = 1024;

/// Split path commands into segments, one per subpath.
pub fn flatten_commands(commands: &[PathCommand], tolerance: f64) -> Vec<Polyline<SourcePoint>> {
    let mut segments = Vec::new();
    let mut current: Vec<SourcePoint> = Vec::new();
    let mut start: Option<SourcePoint> = None;

    for command in commands {
        match *command {
            PathCommand::MoveTo(p) => {
                finish_segment(&mut segments, &mut current);
                current.push(p);
                start = Some(p);
            }
            PathCommand::LineTo(p) => {
                resume(&mut current, start);
                current.push(p);
            }
            PathCommand::QuadTo(c, p) => match resume(&mut current, start) {
                Some(from) => push_quad(&mut current, from, c, p, tolerance),
                None => current.push(p),
            },
            PathCommand::CubicTo(c1, c2, p) => match resume(&mut current, start) {
                Some(from) => push_cubic(&mut current, from, c1, c2, p, tolerance),
                None => current.push(p),
            },
            PathCommand::Close => {
                if let (Some(first), Some(&last)) = (start, current.last()) {
                    if last != first {
                        current.push(first);
                    }
                }
                finish_segment(&mut segments, &mut current);
            }
        }
    }
    finish_segment(&mut segments, &mut current);

    segments
}

/// Reopen a subpath after `Close`, returning the current point.
fn resume(current: &mut Vec<SourcePoint>, start: Option<SourcePoint>) -> Option<SourcePoint> {
    if current.is_empty() {
        if let Some(p) = start {
            current.push(p);
        }
    }
    current.last().copied()
}

fn finish_segment(segments: &mut Vec<Polyline<SourcePoint>>, current: &mut Vec<SourcePoint>) {
    if !current.is_empty() {
        segments.push(Polyline::new(std::mem::take(current)));
    }
}

fn chord_count(second_difference: f64, factor: f64, tolerance: f64) -> usize {
    // NaN saturates to 0, infinity to usize::MAX.
    let n = (factor * second_difference / tolerance).sqrt().ceil();
    (n as usize).clamp(1, MAX_CHORDS)
}

fn second_difference(a: SourcePoint, b: SourcePoint, c: SourcePoint) -> f64 {
    let dx = a.x - 2.0 * b.x + c.x;
    let dy = a.y - 2.0 * b.y + c.y;
    dx.hypot(dy)
}

fn push_quad(
    out: &mut Vec<SourcePoint>,
    p0: SourcePoint,
    c: SourcePoint,
    p1: SourcePoint,
    tolerance: f64,
) {
    let n = chord_count(second_difference(p0, c, p1), 0.25, tolerance);
    trace!("Quadratic curve flattened into {} chords", n);

    for i in 1..n {
        let t = i as f64 / n as f64;
        let mt = 1.0 - t;
        let (a, b, d) = (mt * mt, 2.0 * mt * t, t * t);
        out.push(SourcePoint::new(
            a * p0.x + b * c.x + d * p1.x,
            a * p0.y + b * c.y + d * p1.y,
        ));
    }
    out.push(p1);
}

fn push_cubic(
    out: &mut Vec<SourcePoint>,
    p0: SourcePoint,
    c1: SourcePoint,
    c2: SourcePoint,
    p1: SourcePoint,
    tolerance: f64,
) {
    let d = second_difference(p0, c1, c2).max(second_difference(c1, c2, p1));
    let n = chord_count(d, 0.75, tolerance);
    trace!("Cubic curve flattened into {} chords", n);

    for i in 1..n {
        let t = i as f64 / n as f64;
        let mt = 1.0 - t;
        let (a, b, e, f) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
        out.push(SourcePoint::new(
            a * p0.x + b * c1.x + e * c2.x + f * p1.x,
            a * p0.y + b * c1.y + e * c2.y + f * p1.y,
        ));
    }
    out.push(p1);
}

/// Depth-first iterator over the segments of every path in a shape tree.
///
/// Non-geometric nodes produce nothing.
pub struct Flattener<'a> {
    stack: Vec<slice::Iter<'a, ShapeNode>>,
    pending: vec::IntoIter<Polyline<SourcePoint>>,
    tolerance: f64,
}

impl<'a> Flattener<'a> {
    pub fn new(tree: &'a ShapeTree, tolerance: f64) -> Self {
        Self {
            stack: vec![tree.nodes().iter()],
            pending: Vec::new().into_iter(),
            tolerance,
        }
    }

    fn next_node(&mut self) -> Option<&'a ShapeNode> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => return Some(node),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl Iterator for Flattener<'_> {
    type Item = Polyline<SourcePoint>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(segment) = self.pending.next() {
                return Some(segment);
            }

            match self.next_node()? {
                ShapeNode::Group(group) => {
                    trace!("Entering group {:?}", group.id);
                    self.stack.push(group.children.iter());
                }
                ShapeNode::Path(path) => {
                    let segments = path.segments(self.tolerance);
                    trace!("Path {:?} has {} segments", path.id, segments.len());
                    self.pending = segments.into_iter();
                }
                ShapeNode::Opaque(kind) => {
                    debug!("Unsupported vector element {}", kind);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{OpaqueKind, PathShape, ShapeGroup};
    use pretty_assertions::assert_eq;

    fn pt(x: f64, y: f64) -> SourcePoint {
        SourcePoint::new(x, y)
    }

    fn path(commands: Vec<PathCommand>) -> ShapeNode {
        ShapeNode::Path(PathShape::new("", commands))
    }

    #[test]
    fn test_lines_only() {
        let segments = flatten_commands(
            &[
                PathCommand::MoveTo(pt(0.0, 0.0)),
                PathCommand::LineTo(pt(10.0, 0.0)),
                PathCommand::LineTo(pt(10.0, 10.0)),
            ],
            0.1,
        );
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].points(), &[pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)]);
    }

    #[test]
    fn test_move_starts_new_segment() {
        let segments = flatten_commands(
            &[
                PathCommand::MoveTo(pt(0.0, 0.0)),
                PathCommand::LineTo(pt(1.0, 0.0)),
                PathCommand::MoveTo(pt(5.0, 5.0)),
                PathCommand::LineTo(pt(6.0, 5.0)),
            ],
            0.1,
        );
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].points(), &[pt(5.0, 5.0), pt(6.0, 5.0)]);
    }

    #[test]
    fn test_close_returns_to_start() {
        let segments = flatten_commands(
            &[
                PathCommand::MoveTo(pt(0.0, 0.0)),
                PathCommand::LineTo(pt(4.0, 0.0)),
                PathCommand::LineTo(pt(4.0, 3.0)),
                PathCommand::Close,
                PathCommand::LineTo(pt(-1.0, -1.0)),
            ],
            0.1,
        );
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0].points(),
            &[pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 3.0), pt(0.0, 0.0)]
        );
        assert_eq!(segments[1].points(), &[pt(0.0, 0.0), pt(-1.0, -1.0)]);
    }

    #[test]
    fn test_close_on_start_point_adds_nothing() {
        let segments = flatten_commands(
            &[
                PathCommand::MoveTo(pt(0.0, 0.0)),
                PathCommand::LineTo(pt(4.0, 0.0)),
                PathCommand::LineTo(pt(0.0, 0.0)),
                PathCommand::Close,
            ],
            0.1,
        );
        assert_eq!(segments[0].len(), 3);
    }

    #[test]
    fn test_straight_curve_is_single_chord() {
        let segments = flatten_commands(
            &[
                PathCommand::MoveTo(pt(0.0, 0.0)),
                PathCommand::CubicTo(pt(1.0, 0.0), pt(2.0, 0.0), pt(3.0, 0.0)),
            ],
            0.1,
        );
        assert_eq!(segments[0].points(), &[pt(0.0, 0.0), pt(3.0, 0.0)]);
    }

    #[test]
    fn test_cubic_within_tolerance() {
        // Quarter circle of radius 100.
        let k = 0.5522847498 * 100.0;
        let tolerance = 0.1;
        let segments = flatten_commands(
            &[
                PathCommand::MoveTo(pt(100.0, 0.0)),
                PathCommand::CubicTo(pt(100.0, k), pt(k, 100.0), pt(0.0, 100.0)),
            ],
            tolerance,
        );
        let points = segments[0].points();
        assert!(points.len() > 4);
        assert_eq!(points.first(), Some(&pt(100.0, 0.0)));
        assert_eq!(points.last(), Some(&pt(0.0, 100.0)));

        // Chord midpoints stay close to the arc.
        for pair in points.windows(2) {
            let mid = pt((pair[0].x + pair[1].x) / 2.0, (pair[0].y + pair[1].y) / 2.0);
            let radius = mid.x.hypot(mid.y);
            assert!((100.0 - radius).abs() < tolerance * 2.0, "radius {radius}");
        }
    }

    #[test]
    fn test_quad_is_deterministic() {
        let commands = [
            PathCommand::MoveTo(pt(0.0, 0.0)),
            PathCommand::QuadTo(pt(50.0, 100.0), pt(100.0, 0.0)),
        ];
        let a = flatten_commands(&commands, 0.05);
        let b = flatten_commands(&commands, 0.05);
        assert_eq!(a, b);
        assert!(a[0].len() > 2);
        assert_eq!(a[0].points().last(), Some(&pt(100.0, 0.0)));
    }

    #[test]
    fn test_only_opaque_nodes_yield_nothing() {
        let tree = ShapeTree::new(vec![
            ShapeNode::Opaque(OpaqueKind::Text),
            ShapeNode::Opaque(OpaqueKind::Image),
            ShapeNode::Group(ShapeGroup::new("g", vec![ShapeNode::Opaque(OpaqueKind::Text)])),
        ]);
        assert_eq!(Flattener::new(&tree, 0.1).count(), 0);
    }

    #[test]
    fn test_document_order_through_groups() {
        let tree = ShapeTree::new(vec![
            path(vec![PathCommand::MoveTo(pt(1.0, 1.0)), PathCommand::LineTo(pt(2.0, 2.0))]),
            ShapeNode::Group(ShapeGroup::new(
                "g",
                vec![
                    ShapeNode::Opaque(OpaqueKind::Image),
                    path(vec![
                        PathCommand::MoveTo(pt(3.0, 3.0)),
                        PathCommand::LineTo(pt(4.0, 4.0)),
                        PathCommand::MoveTo(pt(5.0, 5.0)),
                        PathCommand::LineTo(pt(6.0, 6.0)),
                    ]),
                ],
            )),
            path(vec![PathCommand::MoveTo(pt(7.0, 7.0)), PathCommand::LineTo(pt(8.0, 8.0))]),
        ]);

        let starts: Vec<f64> = Flattener::new(&tree, 0.1).map(|p| p.points()[0].x).collect();
        assert_eq!(starts, vec![1.0, 3.0, 5.0, 7.0]);
    }
}
