//! Polygon decomposition via constrained Delaunay triangulation.
//!
//! The triangulation is a sweep-line implementation after Domiter and
//! Žalik, "Sweep-line algorithm for constrained Delaunay triangulation".
//!
//! Properties:
//! - Creates triangles with a large interior angle.
//! - Supports holes.
//! - Does not care about winding order.
//! - Running time is O(n^2), n = number of vertices.
//!
//! All sweep state is scratch data local to one call; nothing is cached
//! between calls. Inputs with duplicate or exactly collinear consecutive
//! points are rejected as degenerate; the result for self-intersecting
//! outlines or holes outside the outer boundary is undefined.

mod sweep;
mod triangle;

use crate::math::Vector2;
use crate::Result;

use self::sweep::SweepContext;

/// Triangulates a simple polygon.
///
/// Returns the triangles covering the polygon's interior. For a convex
/// polygon of `n` vertices this is exactly `n - 2` triangles.
pub fn triangulate(vertices: &[Vector2]) -> Result<Vec<[Vector2; 3]>> {
    SweepContext::new(vertices, &[])?.triangulate()
}

/// Triangulates a simple polygon with holes.
///
/// Holes are additional point rings that must lie strictly inside the
/// outer boundary; their interiors are excluded from the result.
pub fn triangulate_with_holes(
    outer: &[Vector2],
    holes: &[Vec<Vector2>],
) -> Result<Vec<[Vector2; 3]>> {
    SweepContext::new(outer, holes)?.triangulate()
}

/// Decomposes a simple polygon into convex vertex lists.
///
/// Each returned list is one triangle of the constrained Delaunay
/// triangulation, ready for convex shape construction.
pub fn convex_partition(vertices: &[Vector2]) -> Result<Vec<Vec<Vector2>>> {
    Ok(triangulate(vertices)?
        .into_iter()
        .map(|t| t.to_vec())
        .collect())
}
