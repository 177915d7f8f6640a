// Error taxonomy for the layout core.
//
// Only invariant violations become error values. Too-few-anchor layouts are
// recovered internally by the pipeline (reset + fresh layout) and never
// surface here.

use thiserror::Error;
use super::geom::Point;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    /// Circumcircle of three collinear (or coincident) points. The input
    /// violated the generic-position precondition; the triangulation pass
    /// that hit this is aborted rather than patched around.
    #[error("degenerate circumcircle: collinear points ({a:?}, {b:?}, {c:?})")]
    DegenerateGeometry { a: Point, b: Point, c: Point },

    /// Kruskal accepted fewer than nodes-1 segments, meaning the
    /// triangulation edge set did not connect all corridor nodes. A valid
    /// triangulation of 3 or more points cannot produce this; treat it as a
    /// consistency fault, not a recoverable condition.
    #[error("corridor graph disconnected: {accepted} segments accepted for {nodes} nodes")]
    DisconnectedEdgeSet { accepted: usize, nodes: usize },
}
