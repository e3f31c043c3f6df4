use crate::core::{BodyHandle, JointHandle};
use crate::error::PhysicsError;
use crate::math::{Aabb, Vector2};
use crate::shapes::{Compound, ConvexPolygon, Shape};
use crate::Result;
use std::sync::Arc;

/// Shape description accepted by body creation.
///
/// Polygon outlines may be concave or holed; they are decomposed into
/// convex pieces during shape construction.
#[derive(Debug, Clone)]
pub enum BodyShape {
    /// A circle with diameter equal to the body width
    Circle,

    /// An axis-aligned rectangle covering the body extents
    Rectangle,

    /// An arbitrary simple polygon outline, scaled to the body extents
    Polygon(Vec<Vector2>),

    /// A simple polygon outline with holes, scaled to the body extents
    PolygonWithHoles {
        /// The outer boundary of the outline
        outer: Vec<Vector2>,

        /// The hole rings, each strictly inside the outer boundary
        holes: Vec<Vec<Vector2>>,
    },
}

/// The abstraction layer over a concrete physics solver.
///
/// Scene code talks to the solver only through this trait, so the
/// backend can be chosen at composition time. A backend without joint
/// support reports an unsupported-operation error from every joint
/// method instead of silently ignoring the call.
pub trait PhysicsClient: Send {
    /// Returns the identifier of the backend
    fn backend_name(&self) -> &'static str;

    /// Returns the gravity acceleration
    fn get_gravity(&self) -> Vector2;

    /// Sets the gravity acceleration
    fn set_gravity(&mut self, gravity: Vector2);

    /// Creates a dynamic body with the given extents and shape
    fn create_body(&mut self, width: f32, height: f32, shape: BodyShape) -> Result<BodyHandle>;

    /// Removes a body
    fn remove_body(&mut self, handle: BodyHandle) -> Result<()>;

    /// Creates an axle joint between two bodies (or between one body and
    /// a fixed world point) at the given pivot
    fn create_axle_joint(
        &mut self,
        body_a: BodyHandle,
        body_b: Option<BodyHandle>,
        pivot: Vector2,
    ) -> Result<JointHandle>;

    /// Creates an angle joint holding the relative angle of two bodies
    fn create_angle_joint(
        &mut self,
        body_a: BodyHandle,
        body_b: BodyHandle,
        target_angle: f32,
    ) -> Result<JointHandle>;

    /// Removes a joint
    fn remove_joint(&mut self, handle: JointHandle) -> Result<()>;

    /// Advances the simulation by the given time delta
    fn update(&mut self, dt: f32) -> Result<()>;

    /// Removes all bodies and joints
    fn clear(&mut self);

    /// Returns the position of a body
    fn get_position(&self, handle: BodyHandle) -> Result<Vector2>;

    /// Sets the position of a body
    fn set_position(&mut self, handle: BodyHandle, position: Vector2) -> Result<()>;

    /// Returns the linear velocity of a body
    fn get_velocity(&self, handle: BodyHandle) -> Result<Vector2>;

    /// Sets the linear velocity of a body
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vector2) -> Result<()>;

    /// Returns the mass of a body
    fn get_mass(&self, handle: BodyHandle) -> Result<f32>;

    /// Sets the mass of a body
    fn set_mass(&mut self, handle: BodyHandle, mass: f32) -> Result<()>;

    /// Returns the collision shape of a body
    fn get_shape(&self, handle: BodyHandle) -> Result<Arc<dyn Shape>>;
}

/// Builds a collision shape from a shape description and body extents
pub(crate) fn build_shape(width: f32, height: f32, shape: BodyShape) -> Result<Arc<dyn Shape>> {
    match shape {
        BodyShape::Circle => Ok(Arc::new(crate::shapes::Circle::new(width * 0.5))),
        BodyShape::Rectangle => Ok(Arc::new(ConvexPolygon::rectangle(width, height)?)),
        BodyShape::Polygon(outline) => {
            let scaled = scale_outline(&outline, &outline, width, height)?;
            Ok(Arc::new(Compound::from_outline(&scaled)?))
        }
        BodyShape::PolygonWithHoles { outer, holes } => {
            let scaled_outer = scale_outline(&outer, &outer, width, height)?;
            let scaled_holes = holes
                .iter()
                .map(|hole| scale_outline(&outer, hole, width, height))
                .collect::<Result<Vec<_>>>()?;
            Ok(Arc::new(Compound::from_outline_with_holes(
                &scaled_outer,
                &scaled_holes,
            )?))
        }
    }
}

/// Scales ring points so the reference outline's bounds match the body
/// extents, centered on the local origin
fn scale_outline(
    reference: &[Vector2],
    ring: &[Vector2],
    width: f32,
    height: f32,
) -> Result<Vec<Vector2>> {
    let bounds = Aabb::from_points(reference).ok_or_else(|| {
        PhysicsError::InvalidParameter("A polygon outline needs points".to_string())
    })?;

    let extents = bounds.extents();
    if extents.x < crate::math::EPSILON || extents.y < crate::math::EPSILON {
        return Err(PhysicsError::InvalidParameter(
            "Polygon outline has zero extent".to_string(),
        ));
    }

    let center = bounds.center();
    let scale_x = width / extents.x;
    let scale_y = height / extents.y;

    Ok(ring
        .iter()
        .map(|p| Vector2::new((p.x - center.x) * scale_x, (p.y - center.y) * scale_y))
        .collect())
}
