use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage, StepContext};
use crate::ignorers::Ignorer;
use crate::math::{Rot2, Vector2};
use std::any::Any;

/// A collision ignorer implementing one-way platforms.
///
/// Both bodies' bounding extents are evaluated in the frame of the
/// allowed passage direction; the pair may not collide once the other
/// body has moved further along that direction than the platform's near
/// extent plus the allowed overlap depth. Bodies that ignore physics
/// logics or only participate in the broad phase always pass.
#[derive(Debug, Clone)]
pub struct OneWayPlatformIgnorer {
    /// Allowed overlap depth along the passage direction
    depth_allowed: f32,

    /// Rotation mapping the passage direction onto the x axis
    frame: Rot2,

    /// Whether the verdict is inverted
    inverted: bool,
}

impl OneWayPlatformIgnorer {
    /// Creates a new one-way platform ignorer.
    ///
    /// `allowed_direction` is the direction along which bodies may pass
    /// through; it does not need to be normalized.
    pub fn new(allowed_direction: Vector2, depth_allowed: f32) -> Self {
        Self {
            depth_allowed,
            frame: Rot2::frame_from_direction(allowed_direction),
            inverted: false,
        }
    }

    /// Returns the allowed overlap depth
    pub fn get_depth_allowed(&self) -> f32 {
        self.depth_allowed
    }

    /// Sets the allowed overlap depth
    pub fn set_depth_allowed(&mut self, depth_allowed: f32) {
        self.depth_allowed = depth_allowed;
    }

    /// Returns whether the verdict is inverted
    pub fn get_inverted(&self) -> bool {
        self.inverted
    }

    /// Sets whether the verdict is inverted
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }
}

impl Ignorer for OneWayPlatformIgnorer {
    fn ignorer_type(&self) -> &'static str {
        "OneWayPlatform"
    }

    fn both_needed(&self) -> bool {
        false
    }

    fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn can_collide(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        this: BodyHandle,
        other: BodyHandle,
        _other_ignorer: Option<&dyn Ignorer>,
        _ctx: &StepContext,
    ) -> bool {
        let other_body = match bodies.get_body(other) {
            Ok(body) => body,
            Err(_) => return true,
        };

        if other_body.ignores_physics_logics() || other_body.is_broad_phase_only() {
            return true;
        }

        let this_body = match bodies.get_body(this) {
            Ok(body) => body,
            Err(_) => return true,
        };

        let this_bounds = this_body.bounds_in_frame(&self.frame);
        let other_bounds = other_body.bounds_in_frame(&self.frame);

        this_bounds.min.x + self.depth_allowed > other_bounds.max.x
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
