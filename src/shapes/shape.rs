use crate::math::{Aabb, Rot2, Transform};

/// Base trait for 2D collision shapes
pub trait Shape: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the type name of the shape
    fn shape_type(&self) -> &'static str;

    /// Returns the area of the shape
    fn area(&self) -> f32;

    /// Returns the moment of inertia of the shape for the given mass,
    /// about the origin of the shape's local space
    fn moment_of_inertia(&self, mass: f32) -> f32;

    /// Returns the bounds of the shape in its local space
    fn local_bounds(&self) -> Aabb;

    /// Returns the bounds of the shape in world space
    fn world_bounds(&self, transform: &Transform) -> Aabb;

    /// Returns the bounds of the shape in the given direction frame.
    ///
    /// The frame rotation is applied on top of the world transform; the
    /// resulting extents are axis-aligned in the rotated frame. Used by
    /// directional collision filters.
    fn bounds_in_frame(&self, frame: &Rot2, transform: &Transform) -> Aabb;
}
