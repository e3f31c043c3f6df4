use crate::math::{Aabb, Rot2, Transform, Vector2};
use crate::shapes::Shape;

/// A circle shape centered at the local origin
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    /// The radius of the circle
    radius: f32,
}

impl Circle {
    /// Creates a new circle with the given radius
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }

    /// Returns the radius of the circle
    pub fn get_radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Circle {
    fn shape_type(&self) -> &'static str {
        "Circle"
    }

    fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius * self.radius
    }

    fn moment_of_inertia(&self, mass: f32) -> f32 {
        // Solid disc: I = m * r^2 / 2
        0.5 * mass * self.radius * self.radius
    }

    fn local_bounds(&self) -> Aabb {
        let r = Vector2::new(self.radius, self.radius);
        Aabb::new(-r, r)
    }

    fn world_bounds(&self, transform: &Transform) -> Aabb {
        let r = Vector2::new(self.radius, self.radius);
        Aabb::new(transform.position - r, transform.position + r)
    }

    fn bounds_in_frame(&self, frame: &Rot2, transform: &Transform) -> Aabb {
        let center = frame.rotate_vector(transform.position);
        let r = Vector2::new(self.radius, self.radius);
        Aabb::new(center - r, center + r)
    }
}
