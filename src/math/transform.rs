use crate::math::{Rot2, Vector2};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Represents a transformation in 2D space (position and rotation)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position in 2D space
    pub position: Vector2,

    /// Orientation of the transform
    pub rotation: Rot2,
}

impl Transform {
    /// Creates a new transform with the given position and rotation
    #[inline]
    pub fn new(position: Vector2, rotation: Rot2) -> Self {
        Self { position, rotation }
    }

    /// Creates a new identity transform (no translation, no rotation)
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vector2::zero(),
            rotation: Rot2::identity(),
        }
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector2) -> Self {
        Self {
            position,
            rotation: Rot2::identity(),
        }
    }

    /// Creates a new transform from a position and an angle in radians
    #[inline]
    pub fn from_position_angle(position: Vector2, angle: f32) -> Self {
        Self {
            position,
            rotation: Rot2::from_angle(angle),
        }
    }

    /// Returns the orientation angle in radians
    #[inline]
    pub fn angle(&self) -> f32 {
        self.rotation.angle()
    }

    /// Sets the orientation angle in radians
    #[inline]
    pub fn set_angle(&mut self, angle: f32) {
        self.rotation = Rot2::from_angle(angle);
    }

    /// Transforms a point from local space to world space
    #[inline]
    pub fn transform_point(&self, point: Vector2) -> Vector2 {
        self.rotation.rotate_vector(point) + self.position
    }

    /// Transforms a point from world space to local space
    #[inline]
    pub fn inverse_transform_point(&self, point: Vector2) -> Vector2 {
        self.rotation.inverse_rotate_vector(point - self.position)
    }

    /// Transforms a direction from local space to world space (ignores translation)
    #[inline]
    pub fn transform_direction(&self, direction: Vector2) -> Vector2 {
        self.rotation.rotate_vector(direction)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
