use crate::error::PhysicsError;
use crate::math::{Aabb, Rot2, Transform, Vector2};
use crate::shapes::{ConvexPolygon, Shape};
use crate::Result;

/// A shape composed of several convex pieces sharing one local space.
///
/// This is what a decomposed concave (or holed) outline becomes: each
/// triangle of the decomposition is one piece, all expressed in the same
/// body-local coordinates.
#[derive(Debug, Clone)]
pub struct Compound {
    /// The convex pieces making up the shape
    pieces: Vec<ConvexPolygon>,
}

impl Compound {
    /// Creates a new compound shape from convex pieces
    pub fn new(pieces: Vec<ConvexPolygon>) -> Result<Self> {
        if pieces.is_empty() {
            return Err(PhysicsError::InvalidParameter(
                "A compound shape needs at least one piece".to_string(),
            ));
        }

        Ok(Self { pieces })
    }

    /// Creates a compound shape by decomposing an arbitrary simple polygon
    pub fn from_outline(vertices: &[Vector2]) -> Result<Self> {
        Self::new(ConvexPolygon::decompose(vertices)?)
    }

    /// Creates a compound shape by decomposing a simple polygon with holes
    pub fn from_outline_with_holes(outer: &[Vector2], holes: &[Vec<Vector2>]) -> Result<Self> {
        Self::new(ConvexPolygon::decompose_with_holes(outer, holes)?)
    }

    /// Returns the convex pieces of the compound
    pub fn get_pieces(&self) -> &[ConvexPolygon] {
        &self.pieces
    }
}

impl Shape for Compound {
    fn shape_type(&self) -> &'static str {
        "Compound"
    }

    fn area(&self) -> f32 {
        self.pieces.iter().map(|p| p.area()).sum()
    }

    fn moment_of_inertia(&self, mass: f32) -> f32 {
        // Distribute the mass over the pieces by area fraction
        let total_area = self.area();
        if total_area < crate::math::EPSILON {
            return 0.0;
        }

        self.pieces
            .iter()
            .map(|p| p.moment_of_inertia(mass * p.area() / total_area))
            .sum()
    }

    fn local_bounds(&self) -> Aabb {
        let mut bounds = self.pieces[0].local_bounds();
        for piece in self.pieces.iter().skip(1) {
            bounds = bounds.merge(&piece.local_bounds());
        }
        bounds
    }

    fn world_bounds(&self, transform: &Transform) -> Aabb {
        let mut bounds = self.pieces[0].world_bounds(transform);
        for piece in self.pieces.iter().skip(1) {
            bounds = bounds.merge(&piece.world_bounds(transform));
        }
        bounds
    }

    fn bounds_in_frame(&self, frame: &Rot2, transform: &Transform) -> Aabb {
        let mut bounds = self.pieces[0].bounds_in_frame(frame, transform);
        for piece in self.pieces.iter().skip(1) {
            bounds = bounds.merge(&piece.bounds_in_frame(frame, transform));
        }
        bounds
    }
}
