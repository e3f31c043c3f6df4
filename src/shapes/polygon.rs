use crate::error::PhysicsError;
use crate::math::{Aabb, Rot2, Transform, Vector2};
use crate::shapes::Shape;
use crate::Result;

/// A convex polygon shape defined by its vertices in local space.
///
/// Vertices are stored in counter-clockwise order; input in clockwise
/// order is reversed on construction.
#[derive(Debug, Clone)]
pub struct ConvexPolygon {
    /// The vertices of the polygon in counter-clockwise order
    vertices: Vec<Vector2>,
}

impl ConvexPolygon {
    /// Creates a new convex polygon from the given vertices.
    ///
    /// Fails with an invalid-parameter error when fewer than three
    /// vertices are supplied or the polygon has (approximately) zero
    /// area. Convexity of the input is the caller's responsibility;
    /// concave outlines should go through [`ConvexPolygon::decompose`].
    pub fn new(vertices: Vec<Vector2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InvalidParameter(format!(
                "A polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        let signed = signed_area(&vertices);
        if signed.abs() < crate::math::EPSILON {
            return Err(PhysicsError::InvalidParameter(
                "Polygon has zero area".to_string(),
            ));
        }

        let mut vertices = vertices;
        if signed < 0.0 {
            vertices.reverse();
        }

        Ok(Self { vertices })
    }

    /// Creates an axis-aligned rectangle centered at the local origin
    pub fn rectangle(width: f32, height: f32) -> Result<Self> {
        let hw = width * 0.5;
        let hh = height * 0.5;

        Self::new(vec![
            Vector2::new(-hw, -hh),
            Vector2::new(hw, -hh),
            Vector2::new(hw, hh),
            Vector2::new(-hw, hh),
        ])
    }

    /// Creates a triangle from three points
    pub fn triangle(points: [Vector2; 3]) -> Result<Self> {
        Self::new(points.to_vec())
    }

    /// Decomposes an arbitrary simple polygon into convex pieces.
    ///
    /// Concave outlines are triangulated with the constrained Delaunay
    /// sweep; each resulting triangle becomes one convex piece.
    pub fn decompose(vertices: &[Vector2]) -> Result<Vec<ConvexPolygon>> {
        let triangles = crate::decomposition::triangulate(vertices)?;

        triangles
            .into_iter()
            .map(ConvexPolygon::triangle)
            .collect()
    }

    /// Decomposes a simple polygon with holes into convex pieces
    pub fn decompose_with_holes(
        outer: &[Vector2],
        holes: &[Vec<Vector2>],
    ) -> Result<Vec<ConvexPolygon>> {
        let triangles = crate::decomposition::triangulate_with_holes(outer, holes)?;

        triangles
            .into_iter()
            .map(ConvexPolygon::triangle)
            .collect()
    }

    /// Returns the vertices of the polygon
    pub fn get_vertices(&self) -> &[Vector2] {
        &self.vertices
    }

    /// Returns the centroid of the polygon in local space
    pub fn centroid(&self) -> Vector2 {
        let mut centroid = Vector2::zero();
        let mut area2 = 0.0;

        let n = self.vertices.len();
        for i in 0..n {
            let p0 = self.vertices[i];
            let p1 = self.vertices[(i + 1) % n];
            let cross = p0.cross(&p1);
            area2 += cross;
            centroid += (p0 + p1) * cross;
        }

        centroid / (3.0 * area2)
    }
}

impl Shape for ConvexPolygon {
    fn shape_type(&self) -> &'static str {
        "ConvexPolygon"
    }

    fn area(&self) -> f32 {
        signed_area(&self.vertices).abs()
    }

    fn moment_of_inertia(&self, mass: f32) -> f32 {
        // Second moment of a polygon about the local origin
        let n = self.vertices.len();
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for i in 0..n {
            let p0 = self.vertices[i];
            let p1 = self.vertices[(i + 1) % n];
            let cross = p0.cross(&p1);

            numerator += cross * (p0.dot(&p0) + p0.dot(&p1) + p1.dot(&p1));
            denominator += cross;
        }

        if denominator.abs() < crate::math::EPSILON {
            return 0.0;
        }

        mass * numerator / (6.0 * denominator)
    }

    fn local_bounds(&self) -> Aabb {
        // A polygon always has at least 3 vertices
        Aabb::from_points(&self.vertices).unwrap_or(Aabb::new(Vector2::zero(), Vector2::zero()))
    }

    fn world_bounds(&self, transform: &Transform) -> Aabb {
        let mut min = transform.transform_point(self.vertices[0]);
        let mut max = min;

        for vertex in self.vertices.iter().skip(1) {
            let p = transform.transform_point(*vertex);
            min = min.min(&p);
            max = max.max(&p);
        }

        Aabb::new(min, max)
    }

    fn bounds_in_frame(&self, frame: &Rot2, transform: &Transform) -> Aabb {
        let mut min = frame.rotate_vector(transform.transform_point(self.vertices[0]));
        let mut max = min;

        for vertex in self.vertices.iter().skip(1) {
            let p = frame.rotate_vector(transform.transform_point(*vertex));
            min = min.min(&p);
            max = max.max(&p);
        }

        Aabb::new(min, max)
    }
}

/// Computes the signed area of a polygon (positive for counter-clockwise winding)
fn signed_area(vertices: &[Vector2]) -> f32 {
    let n = vertices.len();
    let mut area2 = 0.0;

    for i in 0..n {
        area2 += vertices[i].cross(&vertices[(i + 1) % n]);
    }

    area2 * 0.5
}
