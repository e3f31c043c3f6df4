use crate::math::Vector2;
use std::ops::Mul;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A 2D rotation stored as the sine and cosine of its angle.
///
/// Storing the trigonometric pair avoids recomputing it for every rotated
/// point during a solver step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Rot2 {
    /// Sine of the rotation angle
    pub s: f32,

    /// Cosine of the rotation angle
    pub c: f32,
}

impl Rot2 {
    /// Creates an identity rotation (zero angle)
    #[inline]
    pub fn identity() -> Self {
        Self { s: 0.0, c: 1.0 }
    }

    /// Creates a rotation from an angle in radians
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self { s, c }
    }

    /// Returns the angle of this rotation in radians
    #[inline]
    pub fn angle(&self) -> f32 {
        self.s.atan2(self.c)
    }

    /// Rotates a vector by this rotation
    #[inline]
    pub fn rotate_vector(&self, v: Vector2) -> Vector2 {
        Vector2::new(self.c * v.x - self.s * v.y, self.s * v.x + self.c * v.y)
    }

    /// Rotates a vector by the inverse of this rotation
    #[inline]
    pub fn inverse_rotate_vector(&self, v: Vector2) -> Vector2 {
        Vector2::new(self.c * v.x + self.s * v.y, -self.s * v.x + self.c * v.y)
    }

    /// Returns the inverse of this rotation
    #[inline]
    pub fn inverse(&self) -> Self {
        Self { s: -self.s, c: self.c }
    }

    /// Returns the local x axis of this rotation in world space
    #[inline]
    pub fn x_axis(&self) -> Vector2 {
        Vector2::new(self.c, self.s)
    }

    /// Returns the local y axis of this rotation in world space
    #[inline]
    pub fn y_axis(&self) -> Vector2 {
        Vector2::new(-self.s, self.c)
    }

    /// Creates the rotation that maps the given direction onto the x axis.
    ///
    /// Used to evaluate bounding extents in an arbitrary direction frame.
    /// The direction does not need to be normalized.
    #[inline]
    pub fn frame_from_direction(direction: Vector2) -> Self {
        let d = direction.normalize();
        // The inverse of the rotation whose x axis is `d`
        Self { s: -d.y, c: d.x }
    }
}

impl Default for Rot2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Rot2 {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        Self {
            s: self.s * other.c + self.c * other.s,
            c: self.c * other.c - self.s * other.s,
        }
    }
}
